//! Core decoding for vdb-rs.
//!
//! This crate reads the leading bytes of an OpenVDB-style grid and produces a
//! [`GridDescriptor`]:
//! - [`ByteCursor`] for bounds-checked sequential reads
//! - [`WordScanner`] for delimiter-terminated tokens
//! - [`ValueDecoder`] for typed metadata values
//! - [`MetadataTable`] for the bounded `(name, type, value)` table
//! - [`parse`] / [`parse_with`] to assemble the descriptor
//!
//! Decoding is synchronous and holds no state beyond one call, so independent
//! buffers may be parsed on separate threads freely.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Accessors return plain values which don't need must_use
#![allow(clippy::must_use_candidate)]

pub mod cursor;
pub mod error;
pub mod grid;
pub mod metadata;
pub mod options;
pub mod scanner;
pub mod trace;
pub mod value;

pub use cursor::ByteCursor;
pub use error::{ParseError, Result};
pub use grid::{
    is_half_float_type, parse, parse_with, GridClass, GridDescriptor, GridValueType,
    SUPPORTED_FORMAT_VERSION,
};
pub use metadata::{MetadataEntry, MetadataTable, META_FILE_DELAYED_LOAD};
pub use options::{ParseOptions, MAX_METADATA_ENTRIES};
pub use scanner::{Token, WordScanner};
pub use trace::{LogObserver, MetadataEnd, NullObserver, ParseObserver, RecordingObserver, TraceEvent};
pub use value::{TypedValue, ValueDecoder};

// Re-export glam types for convenience
pub use glam::IVec3;
pub use half::f16;
