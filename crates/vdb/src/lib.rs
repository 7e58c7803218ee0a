//! vdb-rs: load OpenVDB-style grid headers and metadata.
//!
//! The decoding itself lives in `vdb-core`; this crate adds resource
//! fetching, load lifecycle tracking, and logging setup.
//!
//! # Quick Start
//!
//! ```no_run
//! use vdb_rs::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let bytes = std::fs::read("smoke.vdb").expect("read failed");
//!     let grid = parse(&bytes)?;
//!     println!("{}: half float = {}", grid.grid_type, grid.is_half_float);
//!     Ok(())
//! }
//! ```

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod loader;
pub mod manager;

pub use error::{LoadError, Result};
pub use loader::{extract_url_base, FsFetcher, LoadedGrid, ResourceFetcher, VdbLoader};
pub use manager::{LoadingManager, ProgressCallback};

// Re-export core types
pub use vdb_core::{
    grid::{is_half_float_type, GridClass, GridDescriptor, GridValueType},
    metadata::MetadataEntry,
    options::ParseOptions,
    scanner::Token,
    trace::{LogObserver, NullObserver, ParseObserver, RecordingObserver, TraceEvent},
    value::TypedValue,
    IVec3, ParseError,
};

/// Decodes a grid descriptor from an in-memory buffer with default options.
pub fn parse(bytes: &[u8]) -> Result<GridDescriptor> {
    Ok(vdb_core::parse(bytes)?)
}

/// Initializes `env_logger` if no logger is installed yet.
///
/// Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::try_init();
}

/// Reads parse options from a JSON file.
pub fn load_options(path: impl AsRef<std::path::Path>) -> Result<ParseOptions> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        url: path.display().to_string(),
        source,
    })?;
    Ok(ParseOptions::from_json_str(&json)?)
}
