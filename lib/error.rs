//! Error taxonomy shared by every component of the crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiteError {
    /// Returned when a site position falls outside `1..=len`.
    #[error("site position {pos} out of range for a chain of {len} sites")]
    IndexOutOfRange { pos: usize, len: usize },

    /// Returned when a basis state label is not known to the site model.
    #[error("state \"{0}\" not recognized")]
    UnrecognizedState(String),

    /// Returned when an operator name is not known to the site model.
    #[error("operator \"{0}\" name not recognized")]
    UnrecognizedOperator(String),

    /// Returned when a known state label is not defined for a particular
    /// site, e.g. `Z0` on a spin-1/2 edge.
    #[error("state \"{state}\" not available: {reason}")]
    UnsupportedState { state: String, reason: String },

    /// Returned when a known operator name is not defined for a particular
    /// site, e.g. `Sz2` on a spin-1/2 edge.
    #[error("operator \"{name}\" not available: {reason}")]
    UnsupportedOperator { name: String, reason: String },

    /// Returned when two site objects that must refer to the same index do
    /// not.
    #[error("error in operator application: non-matching site indices")]
    IndexMismatch,

    /// Returned when a persisted stream is malformed or describes sites that
    /// the model could not have produced.
    #[error("corrupt site data: {0}")]
    CorruptData(String),

    /// Returned when an option bag cannot be parsed.
    #[error("invalid options: {0}")]
    InvalidArgs(#[from] serde_json::Error),

    /// Any stream fault other than a premature end of data.
    #[error("i/o error: {0}")]
    Io(std::io::Error),
}
pub type SiteResult<T> = Result<T, SiteError>;

impl From<std::io::Error> for SiteError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof
                => Self::CorruptData("unexpected end of stream".into()),
            _ => Self::Io(err),
        }
    }
}
