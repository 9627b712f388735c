//! Local Hilbert spaces and named single-site operators for one-dimensional
//! lattice models, as consumed by matrix product state algorithms.
//!
//! Each lattice site is described by a [`SiteIndex`][index::SiteIndex]: an
//! ordered list of blocks of basis states, optionally graded by conserved
//! quantum numbers ([`QN`][qn::QN]) so that block-sparse tensor code can
//! exploit the symmetry. A [`SiteSet`][siteset::SiteSet] builds one such index
//! per chain position for a given model and resolves basis-state labels and
//! operator names against it.
//!
//! Two models are provided:
//! - [`SpinOne`][spinone::SpinOne]: spin-1 chains, optionally with spin-1/2
//!   edge sites;
//! - [`TJ`][tj::TJ]: t-J sites with empty, spin-up and spin-down states.
//!
//! ```
//! use tensor_net_sites::prelude::*;
//!
//! let sites = TJ::new(4, &Args::new()).unwrap();
//! let cdag = sites.op(2, "Cdagup", &Args::new()).unwrap().into_matrix().unwrap();
//! let emp = sites.state(2, "Emp").unwrap();
//! let up = sites.state(2, "Up").unwrap();
//! assert_eq!(cdag.get_vals(emp, up), 1.0);
//!
//! // chains can be written out and read back exactly
//! let mut buf: Vec<u8> = Vec::new();
//! sites.write(&mut buf).unwrap();
//! let restored = TJ::read(&mut buf.as_slice()).unwrap();
//! assert_eq!(restored, sites);
//! ```
//!
//! Operator coefficients are real. Operators that would need an imaginary
//! unit are provided premultiplied by `i` (`ISy` is `i S_y`);
//! [`OpMatrix::to_complex`][op::OpMatrix::to_complex] gives a complex copy
//! for callers that want to undo this.

pub mod error;
pub mod qn;
pub mod index;
pub mod args;
pub mod op;
pub mod site;
pub mod siteset;
pub mod io;

pub mod spinone;
pub mod tj;

/// Re-exports of the most commonly used items.
pub mod prelude {
    pub use crate::{
        args::{ ArgVal, Args },
        error::{ SiteError, SiteResult },
        index::{ Arrow, Block, Idx, IndexVal, SiteIndex },
        op::{ OpMatrix, OpVector, SiteOp },
        qn::{ Charge, QN },
        site::SiteType,
        siteset::SiteSet,
        spinone::{ SpinOne, SpinOneOp, SpinOneSite, SpinOneState },
        tj::{ TJ, TJOp, TJSite, TJState },
    };
}
