use approx::assert_abs_diff_eq;
use ndarray as nd;
use num_complex::Complex64 as C64;
use tensor_net_sites::prelude::*;

fn matrix<S: SiteType>(sites: &SiteSet<S>, j: usize, name: &str) -> OpMatrix {
    sites.op(j, name, &Args::new()).unwrap().into_matrix().unwrap()
}

fn assert_close(a: &nd::Array2<f64>, b: &nd::Array2<f64>) {
    assert_eq!(a.shape(), b.shape());
    a.iter().zip(b.iter())
        .for_each(|(x, y)| { assert_abs_diff_eq!(x, y, epsilon = 1e-12); });
}

fn assert_close_c(a: &nd::Array2<C64>, b: &nd::Array2<C64>) {
    assert_eq!(a.shape(), b.shape());
    a.iter().zip(b.iter())
        .for_each(|(x, y)| { assert_abs_diff_eq!((x - y).norm(), 0.0, epsilon = 1e-12); });
}

#[test]
fn lowering_then_raising_returns_to_up() {
    let sites = SpinOne::new(3, &Args::new()).unwrap();
    let up = OpVector::basis(sites.state(2, "Up").unwrap());
    let sm = matrix(&sites, 2, "Sm");
    let sp = matrix(&sites, 2, "Sp");
    let z0 = sm.apply(&up).unwrap();
    assert_abs_diff_eq!(z0.get(1), std::f64::consts::SQRT_2, epsilon = 1e-12);
    let back = sp.apply(&z0).unwrap();
    assert_abs_diff_eq!(back.get(0), 2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(back.get(1), 0.0);
    assert_abs_diff_eq!(back.get(2), 0.0);
}

#[test]
fn ladder_identity_on_spin_one() {
    // Sp Sm + Sm Sp = 2 (S2 - Sz^2)
    let sites = SpinOne::new(3, &Args::new()).unwrap();
    let sp = matrix(&sites, 2, "Sp");
    let sm = matrix(&sites, 2, "Sm");
    let lhs = sp.product(&sm).unwrap().data() + sm.product(&sp).unwrap().data();
    let sz = matrix(&sites, 2, "Sz");
    let sz2 = sz.product(&sz).unwrap();
    let rhs = (matrix(&sites, 2, "S2").data() - sz2.data()) * 2.0;
    assert_close(&lhs, &rhs);
}

#[test]
fn ladder_identity_on_spin_half() {
    let sites = SpinOne::new(3, &Args::new().with("SHalfEdge", true)).unwrap();
    let sp = matrix(&sites, 1, "Sp");
    let sm = matrix(&sites, 1, "Sm");
    let lhs = sp.product(&sm).unwrap().data() + sm.product(&sp).unwrap().data();
    let sz = matrix(&sites, 1, "Sz");
    let sz2 = sz.product(&sz).unwrap();
    let rhs = (matrix(&sites, 1, "S2").data() - sz2.data()) * 2.0;
    assert_close(&lhs, &rhs);
}

#[test]
fn squares_match_products() {
    let sites = SpinOne::new(3, &Args::new()).unwrap();
    let sz = matrix(&sites, 2, "Sz");
    let sx = matrix(&sites, 2, "Sx");
    let isy = matrix(&sites, 2, "ISy");
    assert_close(matrix(&sites, 2, "Sz2").data(), sz.product(&sz).unwrap().data());
    assert_close(matrix(&sites, 2, "Sx2").data(), sx.product(&sx).unwrap().data());
    // (i Sy)^2 = -Sy^2
    let isy2 = isy.product(&isy).unwrap();
    assert_close(&matrix(&sites, 2, "Sy2").data().mapv(|x| -x), isy2.data());
}

#[test]
fn total_spin_is_sum_of_squares() {
    let sites = SpinOne::new(3, &Args::new()).unwrap();
    let sum =
        matrix(&sites, 2, "Sx2").data()
        + matrix(&sites, 2, "Sy2").data()
        + matrix(&sites, 2, "Sz2").data();
    assert_close(&sum, matrix(&sites, 2, "S2").data());
}

fn complex_sy<S: SiteType>(sites: &SiteSet<S>, j: usize) -> nd::Array2<C64> {
    matrix(sites, j, "ISy").to_complex().mapv(|x| -C64::i() * x)
}

#[test]
fn spin_half_commutator_with_complex_sy() {
    // [Sx, Sy] = i Sz with Sy = -i (i Sy)
    let sites = SpinOne::new(3, &Args::new().with("SHalfLeftEdge", true)).unwrap();
    let sx = matrix(&sites, 1, "Sx").to_complex();
    let sy = complex_sy(&sites, 1);
    let sz = matrix(&sites, 1, "Sz").to_complex();
    let comm = sx.dot(&sy) - sy.dot(&sx);
    assert_close_c(&comm, &sz.mapv(|x| C64::i() * x));
}

#[test]
fn spin_one_isy_carries_the_opposite_sign() {
    // the spin-1 ISy table is -i Sy in the [[out, in]] convention
    let sites = SpinOne::new(3, &Args::new()).unwrap();
    let sx = matrix(&sites, 2, "Sx").to_complex();
    let sy = complex_sy(&sites, 2);
    let sz = matrix(&sites, 2, "Sz").to_complex();
    let comm = sx.dot(&sy) - sy.dot(&sx);
    assert_close_c(&comm, &sz.mapv(|x| -C64::i() * x));
}

#[test]
fn complex_sy_is_hermitian() {
    let sites = SpinOne::new(3, &Args::new().with("SHalfLeftEdge", true)).unwrap();
    for j in [1, 2] {
        let sy = complex_sy(&sites, j);
        assert_close_c(&sy, &sy.t().mapv(|x| x.conj()));
    }
}

#[test]
fn compound_names_are_products() {
    let sites = SpinOne::new(3, &Args::new()).unwrap();
    let smsp = matrix(&sites, 2, "Sm*Sp");
    let expected = matrix(&sites, 2, "Sm").product(&matrix(&sites, 2, "Sp")).unwrap();
    assert_eq!(smsp.data(), expected.data());
    let triple = matrix(&sites, 2, "Sz*Sz*Sz");
    assert_close(triple.data(), matrix(&sites, 2, "Sz").data());
    assert!(matches!(
        sites.op(2, "Sz*XUp", &Args::new()),
        Err(SiteError::UnsupportedOperator { .. })
    ));
    assert!(matches!(
        sites.op(2, "Sz*Bogus", &Args::new()),
        Err(SiteError::UnrecognizedOperator(name)) if name == "Bogus"
    ));
}

#[test]
fn spin_operator_flux() {
    let sites = SpinOne::new(3, &Args::new().with("SHalfEdge", true)).unwrap();
    let plus2 = QN::new([(Charge::Sz, 2)]);
    for j in 1..=3 {
        assert_eq!(matrix(&sites, j, "Sp").flux(), Some(plus2));
        assert_eq!(matrix(&sites, j, "Sm").flux(), Some(-plus2));
        assert!(matrix(&sites, j, "Sz").flux().unwrap().is_zero());
        assert!(matrix(&sites, j, "S2").flux().unwrap().is_zero());
        assert_eq!(matrix(&sites, j, "Sx").flux(), None);
    }
}

#[test]
fn creation_then_annihilation() {
    let sites = TJ::new(3, &Args::new()).unwrap();
    let emp = OpVector::basis(sites.state(2, "Emp").unwrap());
    let up = sites.state(2, "Up").unwrap();
    let cdag = matrix(&sites, 2, "Cdagup");
    let c = matrix(&sites, 2, "Cup");

    let created = cdag.apply(&emp).unwrap();
    assert_eq!(created, OpVector::basis(up));
    let back = c.apply(&created).unwrap();
    assert_eq!(back, emp);

    // a second creation annihilates the state
    assert_eq!(cdag.apply(&created).unwrap().norm(), 0.0);
}

#[test]
fn fermion_flux_and_sign() {
    let sites = TJ::new(2, &Args::new()).unwrap();
    let up = QN::new([(Charge::Sz, 1), (Charge::Nf, 1)]);
    let dn = QN::new([(Charge::Sz, -1), (Charge::Nf, 1)]);
    assert_eq!(matrix(&sites, 1, "Cdagup").flux(), Some(up));
    assert_eq!(matrix(&sites, 1, "Cdagdn").flux(), Some(dn));
    assert_eq!(matrix(&sites, 1, "Cdn").flux(), Some(-dn));

    // F anticommutes with every single-fermion operator
    let f = matrix(&sites, 1, "F");
    for name in ["Cup", "Cdagup", "Cdn", "Cdagdn"] {
        let c = matrix(&sites, 1, name);
        let anti = f.product(&c).unwrap().data() + c.product(&f).unwrap().data();
        assert!(anti.iter().all(|x| *x == 0.0), "{name}");
    }
}

#[test]
fn operators_act_on_their_own_site_only() {
    let sites = TJ::new(2, &Args::new()).unwrap();
    let c1 = matrix(&sites, 1, "Cup");
    let c2 = matrix(&sites, 2, "Cdagup");
    assert!(matches!(c1.product(&c2), Err(SiteError::IndexMismatch)));
    let v = OpVector::basis(sites.state(2, "Up").unwrap());
    assert!(matches!(c1.apply(&v), Err(SiteError::IndexMismatch)));
}
