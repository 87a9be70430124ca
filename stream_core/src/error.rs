//! Error types for the stream reconciler.

use thiserror::Error;
use universe::UniverseError;

/// A fragment did not contain the value its kind promises.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("no integer in {0:?}")]
    NoInteger(String),

    #[error("no printable text in {0:?}")]
    NoPrintable(String),

    #[error("malformed {what} in {text:?}")]
    Malformed { what: &'static str, text: String },

    #[error("unparseable date {0:?}")]
    BadDate(String),

    /// The tokenizer passed a span that does not lie inside its source.
    #[error("span {offset}+{len} is outside a source of {source_len} bytes")]
    Span {
        offset: usize,
        len: usize,
        source_len: usize,
    },
}

/// Failures while applying a fragment.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Universe(#[from] UniverseError),

    /// A detail fragment arrived with nothing to attach it to.
    #[error("no {0} in context")]
    MissingContext(&'static str),

    /// Parsing stopped after an integrity fault.
    #[error("reconciler halted")]
    Halted,

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl ReconcileError {
    /// True for faults that end the model session.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ReconcileError::Universe(UniverseError::Integrity { .. }) | ReconcileError::Halted
        )
    }
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
