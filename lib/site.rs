//! The per-model interface used by [`SiteSet`][crate::siteset::SiteSet].
//!
//! A site model decides three things: how the index at a given chain position
//! is built from an option bag, which labels name basis states, and which
//! names build operators. Everything else (position bookkeeping, compound
//! operator names, persistence) is shared.

use std::{ fmt, str::FromStr };
use crate::{
    args::Args,
    error::{ SiteError, SiteResult },
    index::{ IndexVal, SiteIndex },
    op::{ OpMatrix, SiteOp },
    qn::Charge,
};
use SiteError::*;

/// Separator between factors of a compound operator name, e.g. `"Sp*Sm"`.
pub const OP_PRODUCT: char = '*';

/// Describes one family of lattice sites.
pub trait SiteType {
    /// Closed set of basis-state labels.
    type State: FromStr<Err = SiteError> + Copy + fmt::Debug;

    /// Closed set of operator names.
    type Op: FromStr<Err = SiteError> + Copy + fmt::Debug;

    /// Name of the model, for diagnostics.
    const NAME: &'static str;

    /// Charges carried by the labeled indices of the model, in storage
    /// order. Decoded labels name exactly these charges.
    const CHARGES: &'static [Charge];

    /// Build the index for position `j` (1-based) of a chain of `n` sites.
    ///
    /// Fails with [`IndexOutOfRange`] unless `1 <= j <= n`.
    fn index(j: usize, n: usize, args: &Args) -> SiteResult<SiteIndex>;

    /// Check that an index could have been produced by [`Self::index`].
    fn check_index(s: &SiteIndex) -> SiteResult<()>;

    /// Resolve a parsed state label on an index.
    fn make_state(s: &SiteIndex, state: Self::State) -> SiteResult<IndexVal<'_>>;

    /// Build a parsed operator on an index.
    fn make_op(s: &SiteIndex, op: Self::Op, args: &Args) -> SiteResult<SiteOp>;

    /// Resolve a basis-state label on an index.
    fn state<'a>(s: &'a SiteIndex, label: &str) -> SiteResult<IndexVal<'a>> {
        Self::make_state(s, label.parse()?)
    }

    /// Build a named operator on an index.
    ///
    /// Names of the form `"A*B*..."` build the product `A·B·...`, where the
    /// right-most factor acts first.
    fn op(s: &SiteIndex, opname: &str, args: &Args) -> SiteResult<SiteOp> {
        if !opname.contains(OP_PRODUCT) {
            return Self::make_op(s, opname.parse()?, args);
        }
        let mut factors =
            opname.split(OP_PRODUCT)
            .map(|name| factor::<Self>(s, opname, name, args));
        let first = factors.next().unwrap_or_else(|| Ok(OpMatrix::identity(s)))?;
        factors.try_fold(first, |acc, f| acc.product(&f?))
            .map(SiteOp::Matrix)
    }
}

fn factor<S>(s: &SiteIndex, opname: &str, name: &str, args: &Args)
    -> SiteResult<OpMatrix>
where S: SiteType + ?Sized
{
    match S::make_op(s, name.trim().parse()?, args)? {
        SiteOp::Matrix(m) => Ok(m),
        SiteOp::Vector(_) => Err(UnsupportedOperator {
            name: opname.to_string(),
            reason: format!("\"{name}\" is a state and cannot appear in a product"),
        }),
    }
}

/// Check that `j` is a valid 1-based position in a chain of `n` sites.
pub(crate) fn check_position(j: usize, n: usize) -> SiteResult<()> {
    if j == 0 || j > n {
        Err(IndexOutOfRange { pos: j, len: n })
    } else {
        Ok(())
    }
}

/// Shorthand for the error returned when a name is valid for the model but
/// not for a particular site.
pub(crate) fn unsupported_op(name: &str, reason: &str) -> SiteError {
    UnsupportedOperator { name: name.to_string(), reason: reason.to_string() }
}

/// Shorthand for the error returned when a state is valid for the model but
/// not for a particular site.
pub(crate) fn unsupported_state(state: &str, reason: &str) -> SiteError {
    UnsupportedState { state: state.to_string(), reason: reason.to_string() }
}
