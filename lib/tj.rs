//! Sites of the t-J model: at most one electron per site.
//!
//! Every site has the three states `Emp`, `Up`, `Dn`, labeled by
//! `{Sz, Nf}` = `{0, 0}`, `{+1, 1}`, `{-1, 1}`.
//!
//! The creation and annihilation operators here are plain single-site
//! transition matrices. They are not dressed with a Jordan-Wigner string;
//! code assembling multi-site fermionic operators must insert `F` (or
//! `Fup`/`Fdn`) on the intervening sites itself.

use std::str::FromStr;
use log::debug;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap as HashMap;
use crate::{
    args::Args,
    error::{ SiteError, SiteResult },
    index::{ Block, IndexVal, SiteIndex },
    op::{ OpMatrix, SiteOp },
    qn::{ Charge, QN },
    site::{ self, SiteType },
    siteset::SiteSet,
};
use SiteError::*;

/// A chain of t-J sites.
pub type TJ = SiteSet<TJSite>;

/// Basis-state labels of a t-J site.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TJState {
    /// `"Emp"` or `"0"`.
    Emp,
    /// `"Up"` or `"+"`.
    Up,
    /// `"Dn"` or `"-"`.
    Dn,
}

impl TJState {
    fn val(self) -> usize {
        match self {
            Self::Emp => 0,
            Self::Up => 1,
            Self::Dn => 2,
        }
    }
}

impl FromStr for TJState {
    type Err = SiteError;

    fn from_str(s: &str) -> SiteResult<Self> {
        match s {
            "Emp" | "0" => Ok(Self::Emp),
            "Up" | "+" => Ok(Self::Up),
            "Dn" | "-" => Ok(Self::Dn),
            _ => Err(UnrecognizedState(s.to_string())),
        }
    }
}

/// Operator names of a t-J site.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TJOp {
    Id,
    Nup,
    Ndn,
    Ntot,
    Cup,
    Cdagup,
    Cdn,
    Cdagdn,
    Aup,
    Adagup,
    Adn,
    Adagdn,
    /// Jordan-Wigner sign, `(-1)^Nf`.
    F,
    Fup,
    Fdn,
    Sz,
    Sx,
    Sp,
    Sm,
}

static TJ_OPS: Lazy<HashMap<&'static str, TJOp>> = Lazy::new(|| {
    use TJOp::*;
    [
        ("Id", Id),
        ("Nup", Nup),
        ("Ndn", Ndn),
        ("Ntot", Ntot),
        ("Cup", Cup),
        ("Cdagup", Cdagup),
        ("Cdn", Cdn),
        ("Cdagdn", Cdagdn),
        ("Aup", Aup),
        ("Adagup", Adagup),
        ("Adn", Adn),
        ("Adagdn", Adagdn),
        ("F", F),
        ("FermiPhase", F),
        ("Fup", Fup),
        ("Fdn", Fdn),
        ("Sz", Sz),
        ("Sx", Sx),
        ("Sp", Sp),
        ("S+", Sp),
        ("Sm", Sm),
        ("S-", Sm),
    ]
    .into_iter()
    .collect()
});

impl FromStr for TJOp {
    type Err = SiteError;

    fn from_str(s: &str) -> SiteResult<Self> {
        TJ_OPS.get(s).copied()
            .ok_or_else(|| UnrecognizedOperator(s.to_string()))
    }
}

/// Marker type for t-J sites; see [`TJ`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TJSite;

fn tj_blocks(conserve_qns: bool) -> Vec<Block> {
    if conserve_qns {
        [(0, 0), (1, 1), (-1, 1)].into_iter()
            .filter_map(|(sz, nf)| {
                Block::new(QN::new([(Charge::Sz, sz), (Charge::Nf, nf)]), 1)
            })
            .collect()
    } else {
        Block::unlabeled(3).into_iter().collect()
    }
}

impl SiteType for TJSite {
    type State = TJState;
    type Op = TJOp;

    const NAME: &'static str = "tJ";

    const CHARGES: &'static [Charge] = &[Charge::Sz, Charge::Nf];

    fn index(j: usize, n: usize, args: &Args) -> SiteResult<SiteIndex> {
        site::check_position(j, n)?;
        let conserve_qns = args.get_bool("ConserveQNs", true);
        debug!("site {j}: tJ, conserve_qns={conserve_qns}");
        let tags =
            if args.defined("SiteNumber") {
                format!("Site,tJ,n={}", args.get_int("SiteNumber", 0))
            } else {
                "Site,tJ".to_string()
            };
        Ok(SiteIndex::new(tags, tj_blocks(conserve_qns)))
    }

    fn check_index(s: &SiteIndex) -> SiteResult<()> {
        if s.blocks() == tj_blocks(true).as_slice()
            || s.blocks() == tj_blocks(false).as_slice()
        {
            Ok(())
        } else {
            Err(CorruptData(format!("unexpected block structure for tJ site {s}")))
        }
    }

    fn make_state(s: &SiteIndex, state: TJState) -> SiteResult<IndexVal<'_>> {
        s.val(state.val())
            .ok_or_else(|| CorruptData(format!("state out of range on {s}")))
    }

    fn make_op(s: &SiteIndex, op: TJOp, _args: &Args) -> SiteResult<SiteOp> {
        let (em, up, dn) = (0, 1, 2);
        let elems: Vec<(usize, usize, f64)> =
            match op {
                TJOp::Id => return Ok(OpMatrix::identity(s).into()),
                TJOp::Nup => vec![(up, up, 1.0)],
                TJOp::Ndn => vec![(dn, dn, 1.0)],
                TJOp::Ntot => vec![(up, up, 1.0), (dn, dn, 1.0)],
                TJOp::Cup | TJOp::Aup => vec![(up, em, 1.0)],
                TJOp::Cdagup | TJOp::Adagup => vec![(em, up, 1.0)],
                TJOp::Cdn | TJOp::Adn => vec![(dn, em, 1.0)],
                TJOp::Cdagdn | TJOp::Adagdn => vec![(em, dn, 1.0)],
                TJOp::F => vec![(em, em, 1.0), (up, up, -1.0), (dn, dn, -1.0)],
                TJOp::Fup => vec![(em, em, 1.0), (up, up, -1.0), (dn, dn, 1.0)],
                TJOp::Fdn => vec![(em, em, 1.0), (up, up, 1.0), (dn, dn, -1.0)],
                TJOp::Sz => vec![(up, up, 0.5), (dn, dn, -0.5)],
                TJOp::Sx => vec![(up, dn, 1.0), (dn, up, 1.0)],
                TJOp::Sp => vec![(dn, up, 1.0)],
                TJOp::Sm => vec![(up, dn, 1.0)],
            };
        Ok(OpMatrix::from_elems(s, elems).into())
    }
}
