//! Errors which may be raised by this crate.
//!

use crate::fitting::ConvergenceError;

/// Possible errors raised by this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An input value is outside of the domain accepted by the computation.
    #[error("{0}")]
    ValueError(String),

    /// An iterative solver failed to converge.
    #[error("{0}")]
    Convergence(String),
}

/// Result type for the crate, mostly used by functions which validate inputs
/// or run iterative solvers.
pub type OrreryResult<T> = Result<T, Error>;

impl From<ConvergenceError> for Error {
    fn from(error: ConvergenceError) -> Self {
        Self::Convergence(error.to_string())
    }
}
