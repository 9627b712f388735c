//! Spin-1 chains, optionally terminated by spin-1/2 edge sites.
//!
//! Bulk sites carry the states `Up`, `Z0`, `Dn` with doubled magnetization
//! `Sz = +2, 0, -2`. Edge sites selected by `SHalfEdge` (both ends) or
//! `SHalfLeftEdge` (left end only) carry just `Up`, `Dn` with `Sz = +1, -1`.
//! A single chain may therefore mix 3- and 2-dimensional sites.
//!
//! ```
//! use tensor_net_sites::{ args::Args, spinone::SpinOne };
//!
//! let sites = SpinOne::new(5, &Args::new().with("SHalfEdge", true)).unwrap();
//! let dims: Vec<usize> = sites.iter().map(|s| s.dim()).collect();
//! assert_eq!(dims, vec![2, 3, 3, 3, 2]);
//!
//! let sz = sites.op(1, "Sz", &Args::new()).unwrap().into_matrix().unwrap();
//! let up = sites.state(1, "Up").unwrap();
//! assert_eq!(sz.get_vals(up, up), 0.5);
//! ```

use std::str::FromStr;
use log::{ debug, info };
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap as HashMap;
use crate::{
    args::Args,
    error::{ SiteError, SiteResult },
    index::{ Block, IndexVal, SiteIndex },
    op::{ OpMatrix, OpVector, SiteOp },
    qn::{ Charge, QN },
    site::{ self, SiteType },
    siteset::SiteSet,
};
use SiteError::*;

const ISQRT2: f64 = std::f64::consts::FRAC_1_SQRT_2;
const SQRT2: f64 = std::f64::consts::SQRT_2;

/// A chain of spin-1 sites.
pub type SpinOne = SiteSet<SpinOneSite>;

/// Basis-state labels of a spin-1 site.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpinOneState {
    /// `"Up"` or `"+"`.
    Up,
    /// `"Z0"` or `"0"`; spin-1 sites only.
    Z0,
    /// `"Dn"` or `"-"`.
    Dn,
}

impl FromStr for SpinOneState {
    type Err = SiteError;

    fn from_str(s: &str) -> SiteResult<Self> {
        match s {
            "Up" | "+" => Ok(Self::Up),
            "Z0" | "0" => Ok(Self::Z0),
            "Dn" | "-" => Ok(Self::Dn),
            _ => Err(UnrecognizedState(s.to_string())),
        }
    }
}

/// Operator names of a spin-1 site.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpinOneOp {
    Id,
    Sz,
    Sx,
    /// `i` times `S_y`, which has real matrix elements.
    ISy,
    Sp,
    Sm,
    Sz2,
    Sx2,
    Sy2,
    ProjUp,
    ProjZ0,
    ProjDn,
    /// Total spin squared, `S(S+1)` on the diagonal.
    S2,
    /// `m = +1` state along the x axis.
    XUp,
    /// `m = 0` state along the x axis.
    XZ0,
    /// `m = -1` state along the x axis.
    XDn,
}

static SPINONE_OPS: Lazy<HashMap<&'static str, SpinOneOp>> = Lazy::new(|| {
    use SpinOneOp::*;
    [
        ("Id", Id),
        ("Sz", Sz),
        ("Sx", Sx),
        ("ISy", ISy),
        ("Sp", Sp),
        ("S+", Sp),
        ("Sm", Sm),
        ("S-", Sm),
        ("Sz2", Sz2),
        ("Sx2", Sx2),
        ("Sy2", Sy2),
        ("projUp", ProjUp),
        ("projZ0", ProjZ0),
        ("projDn", ProjDn),
        ("S2", S2),
        ("XUp", XUp),
        ("XZ0", XZ0),
        ("XDn", XDn),
    ]
    .into_iter()
    .collect()
});

impl FromStr for SpinOneOp {
    type Err = SiteError;

    fn from_str(s: &str) -> SiteResult<Self> {
        SPINONE_OPS.get(s).copied()
            .ok_or_else(|| UnrecognizedOperator(s.to_string()))
    }
}

impl SpinOneOp {
    /// Return the canonical name of the operator.
    pub fn name(self) -> &'static str {
        match self {
            Self::Id => "Id",
            Self::Sz => "Sz",
            Self::Sx => "Sx",
            Self::ISy => "ISy",
            Self::Sp => "Sp",
            Self::Sm => "Sm",
            Self::Sz2 => "Sz2",
            Self::Sx2 => "Sx2",
            Self::Sy2 => "Sy2",
            Self::ProjUp => "projUp",
            Self::ProjZ0 => "projZ0",
            Self::ProjDn => "projDn",
            Self::S2 => "S2",
            Self::XUp => "XUp",
            Self::XZ0 => "XZ0",
            Self::XDn => "XDn",
        }
    }

    /// Return `true` if the name builds a state rather than an operator.
    pub fn is_state(self) -> bool {
        matches!(self, Self::XUp | Self::XZ0 | Self::XDn)
    }

    /// Return `true` if the name is only defined on spin-1 sites.
    pub fn needs_spin_one(self) -> bool {
        matches!(
            self,
            Self::Sz2 | Self::Sx2 | Self::Sy2 | Self::ProjZ0
            | Self::XUp | Self::XZ0 | Self::XDn
        )
    }
}

/// Marker type for spin-1 sites; see [`SpinOne`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SpinOneSite;

fn is_half_edge(j: usize, n: usize, args: &Args) -> bool {
    (args.get_bool("SHalfEdge", false) && (j == 1 || j == n))
        || (args.get_bool("SHalfLeftEdge", false) && j == 1)
}

fn sz_blocks(szs: &[i32], conserve_qns: bool) -> Vec<Block> {
    if conserve_qns {
        szs.iter()
            .filter_map(|sz| Block::new(QN::new([(Charge::Sz, *sz)]), 1))
            .collect()
    } else {
        Block::unlabeled(szs.len()).into_iter().collect()
    }
}

fn site_tags(kind: &str, args: &Args) -> String {
    if args.defined("SiteNumber") {
        format!("Site,{kind},n={}", args.get_int("SiteNumber", 0))
    } else {
        format!("Site,{kind}")
    }
}

const SHALF_SZ: [i32; 2] = [1, -1];
const SONE_SZ: [i32; 3] = [2, 0, -2];

impl SiteType for SpinOneSite {
    type State = SpinOneState;
    type Op = SpinOneOp;

    const NAME: &'static str = "SpinOne";

    const CHARGES: &'static [Charge] = &[Charge::Sz];

    fn index(j: usize, n: usize, args: &Args) -> SiteResult<SiteIndex> {
        site::check_position(j, n)?;
        let conserve_qns = args.get_bool("ConserveQNs", true);
        if is_half_edge(j, n, args) {
            if args.get_bool("Verbose", false) {
                info!("placing a S=1/2 at site {j}");
            }
            debug!("site {j}: S=1/2, conserve_qns={conserve_qns}");
            Ok(SiteIndex::new(
                site_tags("S=1/2", args), sz_blocks(&SHALF_SZ, conserve_qns)))
        } else {
            debug!("site {j}: S=1, conserve_qns={conserve_qns}");
            Ok(SiteIndex::new(
                site_tags("S=1", args), sz_blocks(&SONE_SZ, conserve_qns)))
        }
    }

    fn check_index(s: &SiteIndex) -> SiteResult<()> {
        let szs: &[i32] =
            match s.dim() {
                2 => &SHALF_SZ,
                3 => &SONE_SZ,
                d => {
                    return Err(CorruptData(format!(
                        "spin site of dimension {d}, expected 2 or 3")));
                },
            };
        let expected_labeled = sz_blocks(szs, true);
        let expected_plain = sz_blocks(szs, false);
        if s.blocks() == expected_labeled.as_slice()
            || s.blocks() == expected_plain.as_slice()
        {
            Ok(())
        } else {
            Err(CorruptData(format!("unexpected block structure for spin site {s}")))
        }
    }

    fn make_state(s: &SiteIndex, state: SpinOneState) -> SiteResult<IndexVal<'_>> {
        let m = s.dim();
        let val =
            match state {
                SpinOneState::Up => 0,
                SpinOneState::Z0 if m == 2 => {
                    return Err(site::unsupported_state(
                        "Z0", "Z0 not defined for spin 1/2 site"));
                },
                SpinOneState::Z0 => 1,
                SpinOneState::Dn => m - 1,
            };
        s.val(val)
            .ok_or_else(|| CorruptData(format!("state out of range on {s}")))
    }

    fn make_op(s: &SiteIndex, op: SpinOneOp, _args: &Args) -> SiteResult<SiteOp> {
        let half = s.dim() == 2;
        if half && op.needs_spin_one() {
            return Err(site::unsupported_op(
                op.name(), "only defined for S=1 sites"));
        }
        let (up, z0, dn) = (0, 1, s.dim() - 1);
        let elems: Vec<(usize, usize, f64)> =
            match op {
                SpinOneOp::Id => return Ok(OpMatrix::identity(s).into()),
                SpinOneOp::XUp => return Ok(make_x_state(s, XUP_AMPS).into()),
                SpinOneOp::XZ0 => return Ok(make_x_state(s, XZ0_AMPS).into()),
                SpinOneOp::XDn => return Ok(make_x_state(s, XDN_AMPS).into()),
                SpinOneOp::Sz if half => vec![(up, up, 0.5), (dn, dn, -0.5)],
                SpinOneOp::Sz => vec![(up, up, 1.0), (dn, dn, -1.0)],
                SpinOneOp::Sx if half => vec![(up, dn, 0.5), (dn, up, 0.5)],
                SpinOneOp::Sx => vec![
                    (up, z0, ISQRT2), (z0, up, ISQRT2),
                    (z0, dn, ISQRT2), (dn, z0, ISQRT2),
                ],
                SpinOneOp::ISy if half => vec![(up, dn, -0.5), (dn, up, 0.5)],
                SpinOneOp::ISy => vec![
                    (up, z0, ISQRT2), (z0, up, -ISQRT2),
                    (z0, dn, ISQRT2), (dn, z0, -ISQRT2),
                ],
                SpinOneOp::Sp if half => vec![(dn, up, 1.0)],
                SpinOneOp::Sp => vec![(dn, z0, SQRT2), (z0, up, SQRT2)],
                SpinOneOp::Sm if half => vec![(up, dn, 1.0)],
                SpinOneOp::Sm => vec![(up, z0, SQRT2), (z0, dn, SQRT2)],
                SpinOneOp::Sz2 => vec![(up, up, 1.0), (dn, dn, 1.0)],
                SpinOneOp::Sx2 => vec![
                    (up, up, 0.5), (up, dn, 0.5),
                    (z0, z0, 1.0),
                    (dn, dn, 0.5), (dn, up, 0.5),
                ],
                SpinOneOp::Sy2 => vec![
                    (up, up, 0.5), (up, dn, -0.5),
                    (z0, z0, 1.0),
                    (dn, dn, 0.5), (dn, up, -0.5),
                ],
                SpinOneOp::ProjUp => vec![(up, up, 1.0)],
                SpinOneOp::ProjZ0 => vec![(z0, z0, 1.0)],
                SpinOneOp::ProjDn => vec![(dn, dn, 1.0)],
                SpinOneOp::S2 if half => vec![(up, up, 0.75), (dn, dn, 0.75)],
                SpinOneOp::S2 => vec![(up, up, 2.0), (z0, z0, 2.0), (dn, dn, 2.0)],
            };
        Ok(OpMatrix::from_elems(s, elems).into())
    }
}

// amplitudes on (Up, Z0, Dn) of the Sx eigenstates
const XUP_AMPS: [f64; 3] = [0.5, ISQRT2, 0.5];
const XZ0_AMPS: [f64; 3] = [ISQRT2, 0.0, -ISQRT2];
const XDN_AMPS: [f64; 3] = [0.5, -ISQRT2, 0.5];

fn make_x_state(s: &SiteIndex, amps: [f64; 3]) -> OpVector {
    OpVector::from_elems(s, amps.into_iter().enumerate())
}
