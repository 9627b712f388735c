//! Symmetry-graded site indices.
//!
//! A [`SiteIndex`] describes the local Hilbert space of one lattice site as an
//! ordered sequence of [`Block`]s, each a contiguous span of basis states that
//! share one (optional) [`QN`] label. Block order and the order of states
//! within a block are fixed at construction and never rearranged: position
//! `k` in the index is the `k`-th basis state everywhere in this crate.
//!
//! ```text
//!   spin-1 site, ConserveQNs=true        t-J site, ConserveQNs=false
//!   +-------+-------+-------+            +-----------------------+
//!   | Sz=+2 | Sz= 0 | Sz=-2 |            |       (no label)      |
//!   | dim 1 | dim 1 | dim 1 |            |         dim 3         |
//!   +-------+-------+-------+            +-----------------------+
//!     Up      Z0      Dn                   Emp      Up      Dn
//! ```
//!
//! Besides its blocks, each index carries a random identity, a tag string, a
//! prime level, and an [`Arrow`]. Operators are built over the pair
//! `(s.dag(), s.prime())`, so the input and output sides of an operator refer
//! to the same space but remain distinguishable.

use std::fmt;
use itertools::Itertools;
use serde::{ Serialize, Deserialize };
use crate::qn::QN;

/// Describes a tensor index as seen by a tensor engine.
///
/// This is the boundary through which indices built here are handed to
/// contraction code: only the dimension and a printable label are needed.
pub trait Idx: Clone + PartialEq + fmt::Debug {
    /// Return the number of values the index can take.
    ///
    /// This value must never be zero.
    fn dim(&self) -> usize;

    /// Return an identifying label for the index. This method is used only for
    /// printing purposes.
    ///
    /// The default implementation renders `self` using `Debug`.
    fn label(&self) -> String { format!("{self:?}") }
}

/// Direction of an index.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
pub enum Arrow {
    /// Index of a ket-side (input) leg.
    In,
    /// Index of a bra-side (output) leg; the default for site indices.
    #[default]
    Out,
}

impl Arrow {
    /// Return the opposite direction.
    pub fn flip(self) -> Self {
        match self {
            Self::In => Self::Out,
            Self::Out => Self::In,
        }
    }

    /// Integer code used in persisted data: `-1` for `In`, `+1` for `Out`.
    pub fn to_code(self) -> i8 {
        match self {
            Self::In => -1,
            Self::Out => 1,
        }
    }

    /// Inverse of [`Self::to_code`].
    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            -1 => Some(Self::In),
            1 => Some(Self::Out),
            _ => None,
        }
    }
}

/// A contiguous span of basis states sharing one label.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    qn: Option<QN>,
    dim: usize,
}

impl Block {
    /// Create a new labeled block. Returns `None` if `dim` is zero.
    pub fn new(qn: QN, dim: usize) -> Option<Self> {
        (dim > 0).then_some(Self { qn: Some(qn), dim })
    }

    /// Create a new unlabeled block. Returns `None` if `dim` is zero.
    pub fn unlabeled(dim: usize) -> Option<Self> {
        (dim > 0).then_some(Self { qn: None, dim })
    }

    /// Create a block from an optional label.
    pub fn with_qn(qn: Option<QN>, dim: usize) -> Option<Self> {
        (dim > 0).then_some(Self { qn, dim })
    }

    /// Return the label of the block, if any.
    pub fn qn(&self) -> Option<QN> { self.qn }

    /// Return the number of basis states in the block.
    pub fn dim(&self) -> usize { self.dim }
}

/// The local Hilbert space of one site.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SiteIndex {
    id: u64,
    tags: String,
    plev: u32,
    dir: Arrow,
    blocks: Vec<Block>,
    dim: usize,
}

impl SiteIndex {
    /// Create a new index with a fresh random identity, outgoing direction,
    /// and prime level zero.
    ///
    /// `blocks` must be non-empty.
    pub fn new<T>(tags: T, blocks: Vec<Block>) -> Self
    where T: Into<String>
    {
        Self::from_parts(rand::random(), tags, 0, Arrow::Out, blocks)
    }

    /// Create an index from all of its parts, as when reading persisted data.
    pub fn from_parts<T>(
        id: u64,
        tags: T,
        plev: u32,
        dir: Arrow,
        blocks: Vec<Block>,
    ) -> Self
    where T: Into<String>
    {
        let dim: usize = blocks.iter().map(Block::dim).sum();
        Self { id, tags: tags.into(), plev, dir, blocks, dim }
    }

    /// Return the identity of the index.
    pub fn id(&self) -> u64 { self.id }

    /// Return the tag string.
    pub fn tags(&self) -> &str { &self.tags }

    /// Return `true` if the comma-separated tag string contains `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.split(',').any(|t| t == tag)
    }

    /// Return the prime level.
    pub fn plev(&self) -> u32 { self.plev }

    /// Return the direction.
    pub fn dir(&self) -> Arrow { self.dir }

    /// Return the total dimension.
    pub fn dim(&self) -> usize { self.dim }

    /// Return the blocks in order.
    pub fn blocks(&self) -> &[Block] { &self.blocks }

    /// Return the number of blocks.
    pub fn nblocks(&self) -> usize { self.blocks.len() }

    /// Return `true` if the blocks carry conserved-quantity labels.
    pub fn has_qns(&self) -> bool { self.blocks.iter().any(|b| b.qn.is_some()) }

    /// Return a copy with the direction flipped.
    pub fn dag(&self) -> Self {
        let mut new = self.clone();
        new.dir = self.dir.flip();
        new
    }

    /// Return a copy with the prime level raised by one.
    pub fn prime(&self) -> Self {
        let mut new = self.clone();
        new.plev += 1;
        new
    }

    /// Return a copy with prime level zero.
    pub fn noprime(&self) -> Self {
        let mut new = self.clone();
        new.plev = 0;
        new
    }

    /// Return `true` if `other` refers to the same space, irrespective of
    /// prime level and direction.
    pub fn same_space(&self, other: &Self) -> bool { self.id == other.id }

    /// Locate the `val`-th basis state as `(block, offset within block)`.
    pub fn locate(&self, val: usize) -> Option<(usize, usize)> {
        let mut start: usize = 0;
        for (k, b) in self.blocks.iter().enumerate() {
            if val < start + b.dim { return Some((k, val - start)); }
            start += b.dim;
        }
        None
    }

    /// Return a handle to the `val`-th basis state (0-based), or `None` if
    /// out of range.
    pub fn val(&self, val: usize) -> Option<IndexVal<'_>> {
        self.locate(val)
            .map(|(block, offset)| IndexVal { index: self, val, block, offset })
    }

    /// Return the label of the `val`-th basis state.
    pub fn qn(&self, val: usize) -> Option<QN> {
        self.locate(val).and_then(|(k, _)| self.blocks[k].qn)
    }
}

impl PartialEq for SiteIndex {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.plev == other.plev
    }
}

impl Eq for SiteIndex { }

impl Idx for SiteIndex {
    fn dim(&self) -> usize { self.dim }

    fn label(&self) -> String {
        format!("({}){}", self.tags, "'".repeat(self.plev as usize))
    }
}

impl fmt::Display for SiteIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let blocks =
            self.blocks.iter()
            .map(|b| match b.qn {
                Some(qn) => format!("{qn}:{}", b.dim),
                None => format!("{}", b.dim),
            })
            .join(", ");
        write!(f, "{} {:?} [{}]", self.label(), self.dir, blocks)
    }
}

/// A handle to one basis state of a [`SiteIndex`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IndexVal<'a> {
    index: &'a SiteIndex,
    val: usize,
    block: usize,
    offset: usize,
}

impl<'a> IndexVal<'a> {
    /// Return the index the state belongs to.
    pub fn index(&self) -> &'a SiteIndex { self.index }

    /// Return the 0-based position of the state within the index.
    pub fn val(&self) -> usize { self.val }

    /// Return the block containing the state.
    pub fn block(&self) -> usize { self.block }

    /// Return the position of the state within its block.
    pub fn offset(&self) -> usize { self.offset }

    /// Return the label of the state's block, if any.
    pub fn qn(&self) -> Option<QN> { self.index.blocks[self.block].qn }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qn::Charge;

    fn spin_one() -> SiteIndex {
        let blocks =
            [2, 0, -2].into_iter()
            .filter_map(|sz| Block::new(QN::new([(Charge::Sz, sz)]), 1))
            .collect();
        SiteIndex::new("Site,S=1", blocks)
    }

    #[test]
    fn total_dim_is_sum_of_blocks() {
        let s = spin_one();
        assert_eq!(s.dim(), 3);
        assert_eq!(s.nblocks(), 3);
        assert!(s.has_qns());
        assert!(s.has_tag("S=1"));
        assert!(!s.has_tag("S=1/2"));
    }

    #[test]
    fn prime_and_dag() {
        let s = spin_one();
        let sp = s.prime();
        assert_ne!(s, sp);
        assert_eq!(s, sp.noprime());
        assert!(s.same_space(&sp));
        assert_eq!(s.dag().dir(), Arrow::In);
        assert_eq!(s.dag(), s);
        assert_eq!(sp.label(), "(Site,S=1)'");
    }

    #[test]
    fn locate_in_multi_state_block() {
        let blocks = vec![
            Block::unlabeled(1).unwrap(),
            Block::unlabeled(2).unwrap(),
        ];
        let s = SiteIndex::new("x", blocks);
        assert_eq!(s.locate(0), Some((0, 0)));
        assert_eq!(s.locate(2), Some((1, 1)));
        assert_eq!(s.locate(3), None);
        let v = s.val(2).unwrap();
        assert_eq!((v.block(), v.offset()), (1, 1));
        assert!(s.val(3).is_none());
    }

    #[test]
    fn zero_dim_blocks_are_rejected() {
        assert!(Block::unlabeled(0).is_none());
        assert!(Block::new(QN::default(), 0).is_none());
    }

    #[test]
    fn serde_keeps_every_field() {
        let s = spin_one().dag().prime();
        let json = serde_json::to_string(&s).unwrap();
        let t: SiteIndex = serde_json::from_str(&json).unwrap();
        assert_eq!(t, s);
        assert_eq!(t.dir(), Arrow::In);
        assert_eq!(t.tags(), s.tags());
        assert_eq!(t.blocks(), s.blocks());
    }

    #[test]
    fn arrow_codes() {
        assert_eq!(Arrow::from_code(Arrow::In.to_code()), Some(Arrow::In));
        assert_eq!(Arrow::from_code(Arrow::Out.to_code()), Some(Arrow::Out));
        assert_eq!(Arrow::from_code(0), None);
    }
}
