// ================================================================
// File: rollcall-common/src/error.rs
// ================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Nothing to operate on: no thread, guild, role or member set could be resolved.
    #[error("Missing context: {what}")]
    MissingContext { what: String },

    /// A single token is too long to ever fit in one message.
    #[error(
        "Token #{index} is {length} characters long, which does not fit a {budget}-character message budget"
    )]
    PreconditionViolation {
        index: usize,
        length: usize,
        budget: usize,
    },

    /// The chat platform rejected a send, edit or fetch.
    #[error("Transport failure during {operation}: {reason}")]
    TransportFailure {
        operation: &'static str,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn missing(what: impl Into<String>) -> Self {
        Error::MissingContext { what: what.into() }
    }

    pub fn transport(operation: &'static str, reason: impl std::fmt::Display) -> Self {
        Error::TransportFailure {
            operation,
            reason: reason.to_string(),
        }
    }
}
