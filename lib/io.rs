//! Binary encoding of site chains.
//!
//! All integers are fixed-width little-endian.
//!
//! ```text
//! chain = [i32 N] index{N}
//! index = [i32 nblocks] block{nblocks}
//!         [u64 id] [i32 plev] [i8 dir] [u32 taglen] [u8 tag{taglen}]
//! block = [i32 dim] [u8 haslabel] label?
//! label = [i32 Sz] [i32 Nf]
//! ```
//!
//! `dir` is `-1` for an incoming and `+1` for an outgoing index. Every charge
//! value is written in declaration order, zero for charges the label does not
//! name, so a label occupies a fixed eight bytes. Which charges a decoded
//! label names is supplied by the caller; a nonzero value for any other
//! charge is rejected.
//!
//! Decoding checks each field for consistency and reports
//! [`CorruptData`][SiteError::CorruptData] on anything malformed, including a
//! premature end of the stream. Checking indices against a particular model
//! happens one level up, in [`SiteSet::read`][crate::siteset::SiteSet::read].

use std::io::{ Read, Write };
use log::trace;
use crate::{
    error::{ SiteError, SiteResult },
    index::{ Arrow, Block, SiteIndex },
    qn::{ Charge, NUM_CHARGES, QN },
};
use SiteError::*;

/// Upper bound on the length of a decoded tag string.
pub const MAX_TAG_LEN: usize = 1024;

// guards against preallocating from an untrusted count
const PREALLOC_LIMIT: usize = 64;

fn write_i32<W: Write>(w: &mut W, x: i32) -> SiteResult<()> {
    w.write_all(&x.to_le_bytes())?;
    Ok(())
}

fn read_i32<R: Read>(r: &mut R) -> SiteResult<i32> {
    let mut buf = [0_u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

fn write_u32<W: Write>(w: &mut W, x: u32) -> SiteResult<()> {
    w.write_all(&x.to_le_bytes())?;
    Ok(())
}

fn read_u32<R: Read>(r: &mut R) -> SiteResult<u32> {
    let mut buf = [0_u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn write_u64<W: Write>(w: &mut W, x: u64) -> SiteResult<()> {
    w.write_all(&x.to_le_bytes())?;
    Ok(())
}

fn read_u64<R: Read>(r: &mut R) -> SiteResult<u64> {
    let mut buf = [0_u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

fn write_u8<W: Write>(w: &mut W, x: u8) -> SiteResult<()> {
    w.write_all(&[x])?;
    Ok(())
}

fn read_u8<R: Read>(r: &mut R) -> SiteResult<u8> {
    let mut buf = [0_u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

// decode a non-negative count stored as an i32
fn read_count<R: Read>(r: &mut R, what: &str) -> SiteResult<usize> {
    let n = read_i32(r)?;
    usize::try_from(n)
        .map_err(|_| CorruptData(format!("negative {what}: {n}")))
}

fn to_i32(n: usize, what: &str) -> SiteResult<i32> {
    i32::try_from(n)
        .map_err(|_| CorruptData(format!("{what} {n} does not fit in an i32")))
}

/// Encode a conserved-quantity label.
pub fn write_qn<W: Write>(w: &mut W, qn: &QN) -> SiteResult<()> {
    Charge::ALL.into_iter().try_for_each(|c| write_i32(w, qn.get(c)))
}

/// Decode a conserved-quantity label naming `charges`.
pub fn read_qn<R: Read>(r: &mut R, charges: &[Charge]) -> SiteResult<QN> {
    let mut vals = [0_i32; NUM_CHARGES];
    for v in vals.iter_mut() { *v = read_i32(r)?; }
    QN::from_raw(QN::mask_of(charges), vals)
        .ok_or_else(|| CorruptData(format!("unexpected charge values {vals:?}")))
}

/// Encode a single block.
pub fn write_block<W: Write>(w: &mut W, block: &Block) -> SiteResult<()> {
    write_i32(w, to_i32(block.dim(), "block dimension")?)?;
    match block.qn() {
        Some(qn) => {
            write_u8(w, 1)?;
            write_qn(w, &qn)
        },
        None => write_u8(w, 0),
    }
}

/// Decode a single block whose label names `charges`.
pub fn read_block<R: Read>(r: &mut R, charges: &[Charge]) -> SiteResult<Block> {
    let dim = read_count(r, "block dimension")?;
    let qn =
        match read_u8(r)? {
            0 => None,
            1 => Some(read_qn(r, charges)?),
            x => { return Err(CorruptData(format!("bad label flag {x}"))); },
        };
    Block::with_qn(qn, dim)
        .ok_or_else(|| CorruptData("zero-dimensional block".into()))
}

/// Encode a single site index.
pub fn write_index<W: Write>(w: &mut W, s: &SiteIndex) -> SiteResult<()> {
    write_i32(w, to_i32(s.nblocks(), "block count")?)?;
    s.blocks().iter().try_for_each(|b| write_block(w, b))?;
    write_u64(w, s.id())?;
    write_i32(w, to_i32(s.plev() as usize, "prime level")?)?;
    write_u8(w, s.dir().to_code() as u8)?;
    let tags = s.tags().as_bytes();
    if tags.len() > MAX_TAG_LEN {
        return Err(CorruptData(format!("tag string of {} bytes", tags.len())));
    }
    write_u32(w, tags.len() as u32)?;
    w.write_all(tags)?;
    Ok(())
}

/// Decode a single site index whose labels name `charges`.
pub fn read_index<R: Read>(r: &mut R, charges: &[Charge]) -> SiteResult<SiteIndex> {
    let nblocks = read_count(r, "block count")?;
    if nblocks == 0 {
        return Err(CorruptData("index without blocks".into()));
    }
    let mut blocks: Vec<Block> = Vec::with_capacity(nblocks.min(PREALLOC_LIMIT));
    for _ in 0..nblocks { blocks.push(read_block(r, charges)?); }
    if blocks.iter().any(|b| b.qn().is_some())
        && blocks.iter().any(|b| b.qn().is_none())
    {
        return Err(CorruptData("index mixes labeled and unlabeled blocks".into()));
    }
    let id = read_u64(r)?;
    let plev = read_count(r, "prime level")? as u32;
    let code = read_u8(r)? as i8;
    let dir =
        Arrow::from_code(code)
        .ok_or_else(|| CorruptData(format!("bad direction code {code}")))?;
    let taglen = read_u32(r)? as usize;
    if taglen > MAX_TAG_LEN {
        return Err(CorruptData(format!("tag string of {taglen} bytes")));
    }
    let mut tagbuf = vec![0_u8; taglen];
    r.read_exact(&mut tagbuf)?;
    let tags =
        String::from_utf8(tagbuf)
        .map_err(|_| CorruptData("tag string is not UTF-8".into()))?;
    Ok(SiteIndex::from_parts(id, tags, plev, dir, blocks))
}

/// Encode a chain of site indices.
pub fn write_sites<W: Write>(w: &mut W, sites: &[SiteIndex]) -> SiteResult<()> {
    trace!("writing {} site indices", sites.len());
    write_i32(w, to_i32(sites.len(), "chain length")?)?;
    sites.iter().try_for_each(|s| write_index(w, s))
}

/// Decode a chain of site indices whose labels name `charges`.
pub fn read_sites<R: Read>(r: &mut R, charges: &[Charge])
    -> SiteResult<Vec<SiteIndex>>
{
    let n = read_count(r, "chain length")?;
    trace!("reading {n} site indices");
    let mut sites: Vec<SiteIndex> = Vec::with_capacity(n.min(PREALLOC_LIMIT));
    for _ in 0..n { sites.push(read_index(r, charges)?); }
    Ok(sites)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TJ_CHARGES: &[Charge] = &[Charge::Sz, Charge::Nf];

    fn index() -> SiteIndex {
        let blocks =
            [(0, 0), (1, 1), (-1, 1)].into_iter()
            .filter_map(|(sz, nf)| {
                Block::new(QN::new([(Charge::Sz, sz), (Charge::Nf, nf)]), 1)
            })
            .collect();
        SiteIndex::new("Site,tJ,n=1", blocks).dag().prime()
    }

    fn encode(s: &SiteIndex) -> Vec<u8> {
        let mut buf: Vec<u8> = Vec::new();
        write_index(&mut buf, s).unwrap();
        buf
    }

    #[test]
    fn layout_of_an_index() {
        let s = index();
        let buf = encode(&s);
        // 4 + 3 * (4 + 1 + 8) + 8 + 4 + 1 + 4 + tags
        assert_eq!(buf.len(), 4 + 3 * 13 + 17 + s.tags().len());
        assert_eq!(&buf[0..4], &3_i32.to_le_bytes());
        // first block: dim, flag, Sz = 0, Nf = 0
        assert_eq!(&buf[4..8], &1_i32.to_le_bytes());
        assert_eq!(buf[8], 1);
        assert_eq!(&buf[9..13], &0_i32.to_le_bytes());
        assert_eq!(&buf[13..17], &0_i32.to_le_bytes());
        // second block: dim, flag, Sz = +1, Nf = 1
        assert_eq!(&buf[17..21], &1_i32.to_le_bytes());
        assert_eq!(buf[21], 1);
        assert_eq!(&buf[22..26], &1_i32.to_le_bytes());
        assert_eq!(&buf[26..30], &1_i32.to_le_bytes());
        // third block starts with Sz = -1
        assert_eq!(&buf[35..39], &(-1_i32).to_le_bytes());
    }

    #[test]
    fn spin_label_is_charge_values_only() {
        let b = Block::new(QN::new([(Charge::Sz, 2)]), 1).unwrap();
        let mut buf: Vec<u8> = Vec::new();
        write_block(&mut buf, &b).unwrap();
        assert_eq!(buf, vec![1, 0, 0, 0, 1, 2, 0, 0, 0, 0, 0, 0, 0]);
        let back = read_block(&mut buf.as_slice(), &[Charge::Sz]).unwrap();
        assert_eq!(back, b);
        assert_eq!(back.qn().unwrap().to_raw(), (0b01, [2, 0]));
    }

    #[test]
    fn index_fields_survive() {
        let s = index();
        let t = read_index(&mut encode(&s).as_slice(), TJ_CHARGES).unwrap();
        assert_eq!(t.id(), s.id());
        assert_eq!(t.plev(), 1);
        assert_eq!(t.dir(), Arrow::In);
        assert_eq!(t.tags(), s.tags());
        assert_eq!(t.blocks(), s.blocks());
        let raw: Vec<_> =
            t.blocks().iter().map(|b| b.qn().unwrap().to_raw()).collect();
        let raw0: Vec<_> =
            s.blocks().iter().map(|b| b.qn().unwrap().to_raw()).collect();
        assert_eq!(raw, raw0);
    }

    #[test]
    fn every_truncation_is_corrupt() {
        let buf = encode(&index());
        for k in 0..buf.len() {
            let res = read_index(&mut &buf[..k], TJ_CHARGES);
            assert!(matches!(res, Err(CorruptData(_))), "truncated at {k}");
        }
    }

    #[test]
    fn bad_fields_are_corrupt() {
        let good = encode(&index());
        fn read(buf: &[u8]) -> SiteResult<SiteIndex> {
            read_index(&mut &buf[..], TJ_CHARGES)
        }

        let mut zero_dim = good.clone();
        zero_dim[4..8].copy_from_slice(&0_i32.to_le_bytes());
        assert!(matches!(read(&zero_dim), Err(CorruptData(_))));

        let mut neg_count = good.clone();
        neg_count[0..4].copy_from_slice(&(-1_i32).to_le_bytes());
        assert!(matches!(read(&neg_count), Err(CorruptData(_))));

        let mut bad_flag = good.clone();
        bad_flag[8] = 7;
        assert!(matches!(read(&bad_flag), Err(CorruptData(_))));

        let mut unlabeled_first = good.clone();
        unlabeled_first[8] = 0;
        // the label bytes of the first block are now read as the next block
        assert!(read(&unlabeled_first).is_err());

        // Nf = 1 cannot be decoded as a label naming only Sz
        assert!(matches!(
            read_index(&mut good.as_slice(), &[Charge::Sz]),
            Err(CorruptData(_))
        ));
    }
}
