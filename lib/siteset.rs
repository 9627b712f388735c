//! Chains of site indices for a single model.
//!
//! A [`SiteSet`] owns one [`SiteIndex`] per chain position, built through the
//! model's [`SiteType`] rules, and answers state and operator queries by
//! position. Positions are 1-based throughout.
//!
//! ```text
//!   position:   1       2       3     ...     N
//!             +---+   +---+   +---+         +---+
//!   index:    | s1|   | s2|   | s3|   ...   | sN|    (dimensions may differ)
//!             +---+   +---+   +---+         +---+
//! ```
//!
//! Rebuilding ([`SiteSet::construct_sites`]) or decoding
//! ([`SiteSet::read_into`]) replaces the whole chain and takes `&mut self`,
//! while every query takes `&self`; a built chain can be shared freely between
//! threads.

use std::{
    fs::File,
    io::{ BufReader, BufWriter, Read, Write },
    marker::PhantomData,
    path::Path,
};
use log::{ debug, trace };
use crate::{
    args::Args,
    error::{ SiteError, SiteResult },
    index::{ IndexVal, SiteIndex },
    io,
    op::SiteOp,
    site::SiteType,
};
use SiteError::*;

/// An ordered chain of site indices for the model `S`.
#[derive(Debug)]
pub struct SiteSet<S> {
    sites: Vec<SiteIndex>,
    model: PhantomData<S>,
}

impl<S> Clone for SiteSet<S> {
    fn clone(&self) -> Self {
        Self { sites: self.sites.clone(), model: PhantomData }
    }
}

impl<S> PartialEq for SiteSet<S> {
    fn eq(&self, other: &Self) -> bool { self.sites == other.sites }
}

impl<S> Default for SiteSet<S> {
    fn default() -> Self { Self { sites: Vec::new(), model: PhantomData } }
}

impl<S> SiteSet<S>
where S: SiteType
{
    /// Build a chain of `n` sites.
    pub fn new(n: usize, args: &Args) -> SiteResult<Self> {
        let mut new = Self::default();
        new.construct_sites(n, args)?;
        Ok(new)
    }

    /// Create a chain from pre-built indices, checking each against the
    /// model.
    pub fn from_indices(sites: Vec<SiteIndex>) -> SiteResult<Self> {
        sites.iter().try_for_each(S::check_index)?;
        Ok(Self { sites, model: PhantomData })
    }

    /// Rebuild the chain with `n` sites, discarding the previous one.
    ///
    /// Each position `j` sees `args` with `SiteNumber` set to `j`.
    pub fn construct_sites(&mut self, n: usize, args: &Args) -> SiteResult<()> {
        debug!("building {} chain of {n} sites", S::NAME);
        let sites: Vec<SiteIndex> =
            (1..=n)
            .map(|j| S::index(j, n, &args.clone().with("SiteNumber", j)))
            .collect::<SiteResult<_>>()?;
        self.sites = sites;
        Ok(())
    }

    /// Return the number of sites.
    pub fn len(&self) -> usize { self.sites.len() }

    /// Return `true` if the chain has no sites.
    pub fn is_empty(&self) -> bool { self.sites.is_empty() }

    /// Iterate over the site indices in chain order.
    pub fn iter(&self) -> std::slice::Iter<'_, SiteIndex> { self.sites.iter() }

    /// Return all site indices in chain order.
    pub fn sites(&self) -> &[SiteIndex] { &self.sites }

    /// Return the index at position `j`.
    pub fn si(&self, j: usize) -> SiteResult<&SiteIndex> {
        j.checked_sub(1)
            .and_then(|k| self.sites.get(k))
            .ok_or(IndexOutOfRange { pos: j, len: self.sites.len() })
    }

    /// Return the primed index at position `j`.
    pub fn si_p(&self, j: usize) -> SiteResult<SiteIndex> {
        self.si(j).map(SiteIndex::prime)
    }

    /// Resolve a basis-state label at position `j`.
    pub fn state(&self, j: usize, label: &str) -> SiteResult<IndexVal<'_>> {
        trace!("state {label:?} at site {j}");
        S::state(self.si(j)?, label)
    }

    /// Build a named operator at position `j`.
    pub fn op(&self, j: usize, opname: &str, args: &Args) -> SiteResult<SiteOp> {
        trace!("operator {opname:?} at site {j}");
        S::op(self.si(j)?, opname, args)
    }

    /// Encode the chain to a stream; see [`crate::io`] for the layout.
    pub fn write<W>(&self, w: &mut W) -> SiteResult<()>
    where W: Write
    {
        io::write_sites(w, &self.sites)
    }

    /// Decode a chain from a stream.
    pub fn read<R>(r: &mut R) -> SiteResult<Self>
    where R: Read
    {
        Self::from_indices(io::read_sites(r, S::CHARGES)?)
    }

    /// Decode a chain from a stream, replacing `self`.
    ///
    /// `self` is left unchanged if decoding fails.
    pub fn read_into<R>(&mut self, r: &mut R) -> SiteResult<()>
    where R: Read
    {
        *self = Self::read(r)?;
        Ok(())
    }

    /// Write the chain to a file, creating or truncating it.
    pub fn save<P>(&self, path: P) -> SiteResult<()>
    where P: AsRef<Path>
    {
        let mut w = BufWriter::new(File::create(path)?);
        self.write(&mut w)?;
        w.flush()?;
        Ok(())
    }

    /// Read a chain from a file.
    pub fn load<P>(path: P) -> SiteResult<Self>
    where P: AsRef<Path>
    {
        let mut r = BufReader::new(File::open(path)?);
        Self::read(&mut r)
    }
}

impl<'a, S> IntoIterator for &'a SiteSet<S> {
    type Item = &'a SiteIndex;
    type IntoIter = std::slice::Iter<'a, SiteIndex>;

    fn into_iter(self) -> Self::IntoIter { self.sites.iter() }
}
