//! Error types for vdb-core.

use thiserror::Error;

/// The main error type for grid decoding.
#[derive(Error, Debug)]
pub enum ParseError {
    /// A read would run past the end of the buffer.
    #[error("buffer underrun at byte {position}: requested {requested}, {available} available")]
    BufferUnderrun {
        position: usize,
        requested: usize,
        available: usize,
    },

    /// No token terminator was found within the attempt bound.
    #[error("no token found at byte {position} within {attempts} attempts")]
    TokenScanExhausted { position: usize, attempts: usize },

    /// The leading format byte is not a supported version.
    #[error("unsupported format version {0} (only 32 is supported)")]
    FormatVersionUnsupported(u8),

    /// The metadata table hit its entry bound with bytes still pending.
    #[error("metadata table limit of {limit} entries reached at byte {position} without an end marker")]
    LimitExceeded { limit: usize, position: usize },

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for decoding operations.
pub type Result<T> = std::result::Result<T, ParseError>;
