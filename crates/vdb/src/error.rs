//! Error types for loading grids.

use thiserror::Error;
use vdb_core::ParseError;

/// Errors that can occur while loading a grid resource.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The resource could not be fetched.
    #[error("failed to fetch '{url}': {source}")]
    Io {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// The fetched bytes could not be decoded.
    #[error("failed to decode grid: {0}")]
    Parse(#[from] ParseError),
}

/// A specialized Result type for loading operations.
pub type Result<T> = std::result::Result<T, LoadError>;
