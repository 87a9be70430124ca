//! Error types for the universe model.

use thiserror::Error;

/// Errors raised by the universe model.
#[derive(Debug, Error)]
pub enum UniverseError {
    /// A sector number outside `1..=size`.
    #[error("sector {sector} is outside the universe (size {size})")]
    OutOfRange { sector: u32, size: u32 },

    /// The sector array has not been allocated yet.
    #[error("universe size is not known yet")]
    NotInitialized,

    /// A product index outside `0..3`.
    #[error("invalid product index {0}")]
    InvalidProduct(usize),

    /// A stats refresh disagreed with the recorded session identity.
    #[error("game integrity mismatch on '{key}': recorded {recorded:?}, reported {reported:?}")]
    Integrity {
        key: String,
        recorded: String,
        reported: Option<String>,
    },

    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, UniverseError>;
