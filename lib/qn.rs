//! Conserved quantum numbers used to grade the blocks of a site index.
//!
//! A [`QN`] is a small, fixed-size vector of additive integer charges. Each
//! slot belongs to one [`Charge`]; a slot that was never named behaves as if
//! it held zero, so `QN({"Sz",0})` and `QN({"Sz",0},{"Nf",0})` compare equal.
//!
//! ```
//! use tensor_net_sites::qn::{ Charge, QN };
//!
//! let up = QN::new([(Charge::Sz, 1), (Charge::Nf, 1)]);
//! let emp = QN::new([(Charge::Sz, 0), (Charge::Nf, 0)]);
//! assert_eq!(up - emp, up);
//! assert_eq!(format!("{up}"), "QN({\"Sz\",1},{\"Nf\",1})");
//! ```

use std::{
    fmt,
    hash::{ Hash, Hasher },
    ops::{ Add, Neg, Sub },
};
use itertools::Itertools;
use serde::{ Serialize, Deserialize };

/// Number of charge slots carried by every [`QN`].
pub const NUM_CHARGES: usize = 2;

/// Names of the conserved charges, in their fixed storage order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize)]
pub enum Charge {
    /// Magnetization. Spin models use twice the physical value so that all
    /// charges stay integral.
    Sz = 0,
    /// Fermion number.
    Nf = 1,
}

impl Charge {
    /// All charges in storage order.
    pub const ALL: [Charge; NUM_CHARGES] = [Charge::Sz, Charge::Nf];

    /// Return the printed name of the charge.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sz => "Sz",
            Self::Nf => "Nf",
        }
    }

    pub(crate) fn bit(self) -> u8 { 1 << (self as u8) }
}

impl fmt::Display for Charge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A conserved-quantity label.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub struct QN {
    vals: [i32; NUM_CHARGES],
    named: u8,
}

impl QN {
    /// Create a new label from `(charge, value)` pairs. Later pairs overwrite
    /// earlier ones for the same charge.
    pub fn new<I>(charges: I) -> Self
    where I: IntoIterator<Item = (Charge, i32)>
    {
        let mut qn = Self::default();
        charges.into_iter()
            .for_each(|(c, v)| { qn.set(c, v); });
        qn
    }

    /// Reassemble a label from its raw storage.
    ///
    /// Returns `None` if `named` has bits set beyond the known charges, or if
    /// a slot that is not named holds a nonzero value.
    pub fn from_raw(named: u8, vals: [i32; NUM_CHARGES]) -> Option<Self> {
        let known: u8 = Charge::ALL.iter().fold(0, |acc, c| acc | c.bit());
        let unnamed_zero =
            Charge::ALL.iter()
            .all(|c| named & c.bit() != 0 || vals[*c as usize] == 0);
        (named & !known == 0 && unnamed_zero).then_some(Self { vals, named })
    }

    /// Return the mask naming exactly `charges`.
    pub fn mask_of(charges: &[Charge]) -> u8 {
        charges.iter().fold(0, |acc, c| acc | c.bit())
    }

    /// Return the raw storage `(named mask, values)`.
    pub fn to_raw(&self) -> (u8, [i32; NUM_CHARGES]) { (self.named, self.vals) }

    /// Set the value of a charge, marking it as named.
    pub fn set(&mut self, charge: Charge, val: i32) -> &mut Self {
        self.vals[charge as usize] = val;
        self.named |= charge.bit();
        self
    }

    /// Return the value of a charge, zero if the charge is not named.
    pub fn get(&self, charge: Charge) -> i32 { self.vals[charge as usize] }

    /// Return `true` if `charge` was explicitly named.
    pub fn has(&self, charge: Charge) -> bool { self.named & charge.bit() != 0 }

    /// Return `true` if every charge is zero.
    pub fn is_zero(&self) -> bool { self.vals.iter().all(|v| *v == 0) }

    /// Iterate over the named charges in storage order.
    pub fn charges(&self) -> impl Iterator<Item = (Charge, i32)> + '_ {
        Charge::ALL.into_iter()
            .filter(|c| self.has(*c))
            .map(|c| (c, self.get(c)))
    }
}

impl PartialEq for QN {
    fn eq(&self, other: &Self) -> bool { self.vals == other.vals }
}

impl Eq for QN { }

impl Hash for QN {
    fn hash<H: Hasher>(&self, state: &mut H) { self.vals.hash(state); }
}

impl Add for QN {
    type Output = QN;

    fn add(mut self, rhs: QN) -> QN {
        self.vals.iter_mut().zip(rhs.vals)
            .for_each(|(l, r)| { *l += r; });
        self.named |= rhs.named;
        self
    }
}

impl Sub for QN {
    type Output = QN;

    fn sub(self, rhs: QN) -> QN { self + (-rhs) }
}

impl Neg for QN {
    type Output = QN;

    fn neg(mut self) -> QN {
        self.vals.iter_mut().for_each(|v| { *v = -*v; });
        self
    }
}

impl fmt::Display for QN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body =
            self.charges()
            .map(|(c, v)| format!("{{\"{c}\",{v}}}"))
            .join(",");
        write!(f, "QN({body})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unnamed_charges_read_as_zero() {
        let a = QN::new([(Charge::Sz, 0)]);
        let b = QN::new([(Charge::Sz, 0), (Charge::Nf, 0)]);
        assert_eq!(a, b);
        assert!(a.has(Charge::Sz));
        assert!(!a.has(Charge::Nf));
        assert_eq!(a.get(Charge::Nf), 0);
    }

    #[test]
    fn arithmetic_is_additive() {
        let up = QN::new([(Charge::Sz, 2)]);
        let dn = QN::new([(Charge::Sz, -2)]);
        assert!((up + dn).is_zero());
        assert_eq!(up - dn, QN::new([(Charge::Sz, 4)]));
        assert_eq!(-up, dn);
    }

    #[test]
    fn sum_keeps_names_of_both_sides() {
        let s = QN::new([(Charge::Sz, 1)]);
        let n = QN::new([(Charge::Nf, 1)]);
        let sum = s + n;
        assert!(sum.has(Charge::Sz) && sum.has(Charge::Nf));
        assert_eq!(format!("{sum}"), "QN({\"Sz\",1},{\"Nf\",1})");
    }

    #[test]
    fn raw_rejects_unknown_bits() {
        assert!(QN::from_raw(0b100, [0, 0]).is_none());
        let qn = QN::from_raw(0b11, [-1, 1]).unwrap();
        assert_eq!(qn.to_raw(), (0b11, [-1, 1]));
    }

    #[test]
    fn raw_rejects_values_in_unnamed_slots() {
        assert!(QN::from_raw(0b01, [2, 7]).is_none());
        let qn = QN::from_raw(0b01, [2, 0]).unwrap();
        assert_eq!(qn.get(Charge::Nf), 0);
        assert_eq!(format!("{qn}"), "QN({\"Sz\",2})");
        assert_eq!(QN::mask_of(&[Charge::Sz]), 0b01);
        assert_eq!(QN::mask_of(&Charge::ALL), 0b11);
    }
}
