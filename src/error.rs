//! Error taxonomy for the composition engine.
//!
//! Everything is value-returned to the caller. Partial success (some types
//! satisfied, others not) travels on the success path as warnings and
//! adjustment records, never as an error.

use thiserror::Error;

/// Errors surfaced by the question bank. The in-memory bank is infallible;
/// a remote-backed bank maps its transport failures here.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("question bank unavailable: {0}")]
    Unavailable(String),
}

/// Fatal composition errors. Anything recoverable (a type falling back or
/// coming up empty, a manual list getting truncated) is reported on the
/// success path instead.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// Structurally invalid request; nothing was composed.
    #[error("invalid compose request: {0}")]
    Validation(String),

    /// Every requested type was unsatisfiable after full relaxation.
    #[error("no requested type could be satisfied; paper would be empty")]
    EmptyPaper,

    #[error(transparent)]
    Bank(#[from] BankError),
}
