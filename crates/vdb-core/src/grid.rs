//! Grid descriptor assembly.
//!
//! Layout consumed, in order: format version byte, two unknown tokens, file
//! id, grid id, grid type, three unknown tokens, then the metadata table.

use glam::IVec3;
use serde::Serialize;

use crate::cursor::ByteCursor;
use crate::error::{ParseError, Result};
use crate::metadata::{
    MetadataEntry, MetadataTable, META_FILE_BBOX_MAX, META_FILE_BBOX_MIN, META_FILE_COMPRESSION,
    META_FILE_DELAYED_LOAD, META_FILE_MEM_BYTES, META_FILE_VOXEL_COUNT, META_GRID_CLASS,
    META_GRID_CREATOR, META_GRID_NAME, META_IS_LOCAL_SPACE, META_SAVE_HALF_FLOAT,
    META_VECTOR_TYPE,
};
use crate::options::ParseOptions;
use crate::scanner::{Token, WordScanner};
use crate::trace::{LogObserver, ParseObserver, TraceEvent};
use crate::value::TypedValue;

/// The only supported format version byte.
pub const SUPPORTED_FORMAT_VERSION: u8 = 32;

/// The decoded header and metadata of one grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridDescriptor {
    pub format_version: u8,
    /// File UUID, unrelated to grid content.
    pub file_id: Token,
    pub grid_id: Token,
    pub grid_type: Token,
    pub is_half_float: bool,
    pub metadata: Vec<MetadataEntry>,
    /// True if the entry bound cut the metadata table short.
    pub metadata_truncated: bool,
}

/// Semantic class of a grid, from the `class` metadata entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum GridClass {
    FogVolume,
    LevelSet,
    Staggered,
    #[default]
    Unknown,
}

impl GridClass {
    pub fn from_name(name: &str) -> Self {
        match name {
            "fog_volume" => Self::FogVolume,
            "level_set" => Self::LevelSet,
            "staggered" => Self::Staggered,
            _ => Self::Unknown,
        }
    }
}

/// Voxel value type encoded in a grid type string such as `Tree_float_5_4_3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GridValueType {
    Bool,
    Double,
    Float,
    Int32,
    Int64,
    Mask,
    String,
    UInt32,
    Vec2d,
    Vec2i,
    Vec2s,
    Vec3d,
    Vec3i,
    Vec3s,
    Unknown,
}

impl GridValueType {
    /// Classifies a grid type string. Unrecognized strings map to `Unknown`.
    pub fn from_grid_type(grid_type: &str) -> Self {
        let Some(value) = grid_type
            .strip_prefix("Tree_")
            .and_then(|rest| rest.split('_').next())
        else {
            return Self::Unknown;
        };
        match value {
            "bool" => Self::Bool,
            "double" => Self::Double,
            "float" => Self::Float,
            "int32" => Self::Int32,
            "int64" => Self::Int64,
            "mask" | "ValueMask" => Self::Mask,
            "string" => Self::String,
            "uint32" => Self::UInt32,
            "vec2d" => Self::Vec2d,
            "vec2i" => Self::Vec2i,
            "vec2s" => Self::Vec2s,
            "vec3d" => Self::Vec3d,
            "vec3i" => Self::Vec3i,
            "vec3s" => Self::Vec3s,
            _ => Self::Unknown,
        }
    }
}

/// Returns true if `grid_type` contains "half" followed later by "float",
/// ignoring case.
pub fn is_half_float_type(grid_type: &str) -> bool {
    let lower = grid_type.to_ascii_lowercase();
    lower
        .find("half")
        .is_some_and(|at| lower[at + "half".len()..].contains("float"))
}

impl GridDescriptor {
    /// Returns the value of the first metadata entry named `name`.
    pub fn metadata_value(&self, name: &str) -> Option<&TypedValue> {
        self.metadata
            .iter()
            .find(|entry| entry.name.eq_str(name))
            .and_then(|entry| entry.value.as_ref())
    }

    fn metadata_string(&self, name: &str) -> Option<String> {
        self.metadata_value(name)
            .and_then(TypedValue::as_token)
            .map(ToString::to_string)
    }

    pub fn grid_class(&self) -> GridClass {
        self.metadata_string(META_GRID_CLASS)
            .map_or(GridClass::Unknown, |name| GridClass::from_name(&name))
    }

    pub fn grid_value_type(&self) -> GridValueType {
        GridValueType::from_grid_type(&self.grid_type.decode())
    }

    pub fn creator(&self) -> Option<String> {
        self.metadata_string(META_GRID_CREATOR)
    }

    pub fn grid_name(&self) -> Option<String> {
        self.metadata_string(META_GRID_NAME)
    }

    pub fn vector_type(&self) -> Option<String> {
        self.metadata_string(META_VECTOR_TYPE)
    }

    pub fn file_compression(&self) -> Option<String> {
        self.metadata_string(META_FILE_COMPRESSION)
    }

    /// Returns the `is_saved_as_half_float` flag if it was decoded.
    ///
    /// `bool` metadata is kept as [`TypedValue::Unhandled`], so this is
    /// always `None` for now.
    pub fn is_saved_as_half_float(&self) -> Option<bool> {
        self.metadata_value(META_SAVE_HALF_FLOAT)
            .and_then(TypedValue::as_bool)
    }

    /// Returns the `is_local_space` flag if it was decoded. Always `None`
    /// for now, see [`Self::is_saved_as_half_float`].
    pub fn is_local_space(&self) -> Option<bool> {
        self.metadata_value(META_IS_LOCAL_SPACE)
            .and_then(TypedValue::as_bool)
    }

    /// Returns the stored index-space bounding box `(min, max)`.
    pub fn file_bbox(&self) -> Option<(IVec3, IVec3)> {
        let min = self.metadata_value(META_FILE_BBOX_MIN)?.as_ivec3()?;
        let max = self.metadata_value(META_FILE_BBOX_MAX)?.as_ivec3()?;
        Some((min, max))
    }

    pub fn file_voxel_count(&self) -> Option<i64> {
        self.metadata_value(META_FILE_VOXEL_COUNT)?.as_i64()
    }

    pub fn file_mem_bytes(&self) -> Option<i64> {
        self.metadata_value(META_FILE_MEM_BYTES)?.as_i64()
    }

    /// Returns true if the grid carries the delayed-load marker.
    pub fn is_delayed_load(&self) -> bool {
        self.metadata
            .iter()
            .any(|entry| entry.name.eq_str(META_FILE_DELAYED_LOAD))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Decodes a grid descriptor with default options, logging through `log`.
///
/// # Errors
///
/// Fails on the first [`ParseError::BufferUnderrun`],
/// [`ParseError::TokenScanExhausted`] or
/// [`ParseError::FormatVersionUnsupported`].
///
/// Default options never fail with [`ParseError::LimitExceeded`]: a metadata
/// table cut short by the entry bound sets
/// [`GridDescriptor::metadata_truncated`] instead. Use [`parse_with`] and
/// [`ParseOptions::strict_metadata_limit`] to make it an error.
pub fn parse(bytes: &[u8]) -> Result<GridDescriptor> {
    parse_with(bytes, &ParseOptions::default(), &mut LogObserver)
}

/// Decodes a grid descriptor with explicit options and observer.
pub fn parse_with(
    bytes: &[u8],
    options: &ParseOptions,
    observer: &mut dyn ParseObserver,
) -> Result<GridDescriptor> {
    let mut cursor = ByteCursor::new(bytes);

    let format_version = cursor.read_byte()?;
    if format_version != SUPPORTED_FORMAT_VERSION {
        return Err(ParseError::FormatVersionUnsupported(format_version));
    }
    observer.on_event(&TraceEvent::Header { format_version });

    let mut scanner = WordScanner::with_max_attempts(&mut cursor, options.max_token_attempts);
    discard_tokens(&mut scanner, 2, observer)?;
    let file_id = scanner.scan_token()?;
    let grid_id = scanner.scan_token()?;
    let grid_type = scanner.scan_token()?;
    let is_half_float = is_half_float_type(&grid_type.decode());
    discard_tokens(&mut scanner, 3, observer)?;

    observer.on_event(&TraceEvent::GridIdentified {
        file_id: file_id.to_string(),
        grid_id: grid_id.to_string(),
        grid_type: grid_type.to_string(),
        is_half_float,
    });

    let table = MetadataTable::decode(&mut cursor, options, observer)?;

    Ok(GridDescriptor {
        format_version,
        file_id,
        grid_id,
        grid_type,
        is_half_float,
        metadata: table.entries,
        metadata_truncated: table.truncated,
    })
}

fn discard_tokens(
    scanner: &mut WordScanner<'_, '_>,
    count: usize,
    observer: &mut dyn ParseObserver,
) -> Result<()> {
    for _ in 0..count {
        let token = scanner.scan_token()?;
        observer.on_event(&TraceEvent::TokenDiscarded {
            position: scanner.position() - token.len(),
            token: token.to_string(),
        });
    }
    Ok(())
}
