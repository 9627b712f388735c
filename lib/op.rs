//! Single-site operators and states produced by the operator builder.
//!
//! Most named operators are matrices over the index pair `(s.dag(), s')`,
//! stored densely with the output (primed) side along rows:
//!
//! ```text
//!          in: s.dag()
//!         +-----------+
//!   out:  | data[o,i] |    <s'=o| O |s=i>
//!    s'   +-----------+
//! ```
//!
//! A handful of names instead produce a single-index state vector; both shapes
//! are wrapped in [`SiteOp`]. Site dimensions are small (2 or 3), so dense
//! storage costs nothing, while [`OpMatrix::elems`] still gives the sparse
//! `(row, column, value)` view of the nonzero entries.

use ndarray as nd;
use num_complex::Complex64 as C64;
use num_traits::Zero;
use crate::{
    error::{ SiteError, SiteResult },
    index::{ IndexVal, SiteIndex },
    qn::QN,
};
use SiteError::*;

/// The output of the operator builder.
#[derive(Clone, Debug, PartialEq)]
pub enum SiteOp {
    /// An operator over `(s.dag(), s')`.
    Matrix(OpMatrix),
    /// A state over `s`.
    Vector(OpVector),
}

impl SiteOp {
    /// Return `true` if `self` is `Matrix`.
    pub fn is_matrix(&self) -> bool { matches!(self, Self::Matrix(..)) }

    /// Return `true` if `self` is `Vector`.
    pub fn is_vector(&self) -> bool { matches!(self, Self::Vector(..)) }

    /// Return a reference to the inner matrix, if `self` is `Matrix`.
    pub fn as_matrix(&self) -> Option<&OpMatrix> {
        match self {
            Self::Matrix(m) => Some(m),
            Self::Vector(_) => None,
        }
    }

    /// Return a reference to the inner vector, if `self` is `Vector`.
    pub fn as_vector(&self) -> Option<&OpVector> {
        match self {
            Self::Matrix(_) => None,
            Self::Vector(v) => Some(v),
        }
    }

    /// Convert into the inner matrix, if `self` is `Matrix`.
    pub fn into_matrix(self) -> Option<OpMatrix> {
        match self {
            Self::Matrix(m) => Some(m),
            Self::Vector(_) => None,
        }
    }

    /// Convert into the inner vector, if `self` is `Vector`.
    pub fn into_vector(self) -> Option<OpVector> {
        match self {
            Self::Matrix(_) => None,
            Self::Vector(v) => Some(v),
        }
    }
}

impl From<OpMatrix> for SiteOp {
    fn from(m: OpMatrix) -> Self { Self::Matrix(m) }
}

impl From<OpVector> for SiteOp {
    fn from(v: OpVector) -> Self { Self::Vector(v) }
}

/// A single-site operator.
#[derive(Clone, Debug, PartialEq)]
pub struct OpMatrix {
    inp: SiteIndex,
    out: SiteIndex,
    data: nd::Array2<f64>,
}

impl OpMatrix {
    /// Create the zero operator on a site.
    pub fn zeros(s: &SiteIndex) -> Self {
        let d = s.dim();
        Self {
            inp: s.noprime().dag(),
            out: s.noprime().prime(),
            data: nd::Array2::zeros((d, d)),
        }
    }

    /// Create the identity operator on a site.
    pub fn identity(s: &SiteIndex) -> Self {
        let mut op = Self::zeros(s);
        op.data.diag_mut().fill(1.0);
        op
    }

    /// Create an operator from `(input, output, value)` triples, where
    /// `input` and `output` are 0-based positions in `s`.
    ///
    /// Positions outside the index are skipped.
    pub fn from_elems<I>(s: &SiteIndex, elems: I) -> Self
    where I: IntoIterator<Item = (usize, usize, f64)>
    {
        let mut op = Self::zeros(s);
        elems.into_iter()
            .for_each(|(i, o, v)| { op.set(i, o, v); });
        op
    }

    /// Return the input-side index, `s.dag()`.
    pub fn inp(&self) -> &SiteIndex { &self.inp }

    /// Return the output-side index, `s'`.
    pub fn out(&self) -> &SiteIndex { &self.out }

    /// Return the dense data, indexed `[[out, in]]`.
    pub fn data(&self) -> &nd::Array2<f64> { &self.data }

    /// Set the element taking input state `inp` to output state `out`.
    ///
    /// Does nothing if either position is out of range.
    pub fn set(&mut self, inp: usize, out: usize, val: f64) -> &mut Self {
        if let Some(x) = self.data.get_mut((out, inp)) { *x = val; }
        self
    }

    /// Return the element taking input state `inp` to output state `out`,
    /// zero if either position is out of range.
    pub fn get(&self, inp: usize, out: usize) -> f64 {
        self.data.get((out, inp)).copied().unwrap_or(0.0)
    }

    /// Return the element between two resolved basis states.
    pub fn get_vals(&self, inp: IndexVal<'_>, out: IndexVal<'_>) -> f64 {
        self.get(inp.val(), out.val())
    }

    /// Return the number of nonzero elements.
    pub fn nnz(&self) -> usize { self.data.iter().filter(|x| **x != 0.0).count() }

    /// Iterate over the nonzero elements as `(row = output, column = input,
    /// value)`, in row-major order.
    pub fn elems(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.data.indexed_iter()
            .filter(|(_, x)| **x != 0.0)
            .map(|((o, i), x)| (o, i, *x))
    }

    /// Return the operator product `self · rhs`, in which `rhs` acts first.
    pub fn product(&self, rhs: &Self) -> SiteResult<Self> {
        if !self.inp.same_space(&rhs.inp) { return Err(IndexMismatch); }
        Ok(Self {
            inp: rhs.inp.clone(),
            out: self.out.clone(),
            data: self.data.dot(&rhs.data),
        })
    }

    /// Apply the operator to a state on the same site.
    pub fn apply(&self, state: &OpVector) -> SiteResult<OpVector> {
        if !self.inp.same_space(&state.index) { return Err(IndexMismatch); }
        Ok(OpVector {
            index: self.out.noprime(),
            data: self.data.dot(&state.data),
        })
    }

    /// Return the conserved-quantity shift induced by the operator, i.e. the
    /// common value of `qn(out) - qn(in)` over all nonzero elements.
    ///
    /// Returns `None` if the index is unlabeled, if the operator is zero, or
    /// if the nonzero elements do not share a single shift.
    pub fn flux(&self) -> Option<QN> {
        let mut flux: Option<QN> = None;
        for (o, i, _) in self.elems() {
            let d = self.out.qn(o)? - self.inp.qn(i)?;
            match flux {
                None => { flux = Some(d); },
                Some(f) if f == d => { },
                Some(_) => { return None; },
            }
        }
        flux
    }

    /// Return a dense copy converted to another element type.
    pub fn to_array<A>(&self) -> nd::Array2<A>
    where A: Clone + Zero + From<f64>
    {
        self.data.mapv(A::from)
    }

    /// Return a complex-valued dense copy.
    ///
    /// Operators such as `ISy` are stored as real matrices of `i` times a
    /// Hermitian operator; multiply by `-i` here to recover the latter.
    pub fn to_complex(&self) -> nd::Array2<C64> { self.to_array() }
}

/// A single-site state.
#[derive(Clone, Debug, PartialEq)]
pub struct OpVector {
    index: SiteIndex,
    data: nd::Array1<f64>,
}

impl OpVector {
    /// Create the zero vector on a site.
    pub fn zeros(s: &SiteIndex) -> Self {
        Self { index: s.clone(), data: nd::Array1::zeros(s.dim()) }
    }

    /// Create the unit vector for a resolved basis state.
    pub fn basis(val: IndexVal<'_>) -> Self {
        let mut v = Self::zeros(val.index());
        v.data[val.val()] = 1.0;
        v
    }

    /// Create a vector from `(position, value)` pairs.
    ///
    /// Positions outside the index are skipped.
    pub fn from_elems<I>(s: &SiteIndex, elems: I) -> Self
    where I: IntoIterator<Item = (usize, f64)>
    {
        let mut v = Self::zeros(s);
        elems.into_iter()
            .for_each(|(k, x)| { v.set(k, x); });
        v
    }

    /// Return the index of the state.
    pub fn index(&self) -> &SiteIndex { &self.index }

    /// Return the dense data.
    pub fn data(&self) -> &nd::Array1<f64> { &self.data }

    /// Set the amplitude at a position; does nothing if out of range.
    pub fn set(&mut self, k: usize, val: f64) -> &mut Self {
        if let Some(x) = self.data.get_mut(k) { *x = val; }
        self
    }

    /// Return the amplitude at a position, zero if out of range.
    pub fn get(&self, k: usize) -> f64 { self.data.get(k).copied().unwrap_or(0.0) }

    /// Return the Euclidean norm.
    pub fn norm(&self) -> f64 { self.data.dot(&self.data).sqrt() }
}
