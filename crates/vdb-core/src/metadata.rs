//! Grid metadata entries and the bounded metadata table.

use serde::Serialize;

use crate::cursor::ByteCursor;
use crate::error::{ParseError, Result};
use crate::options::ParseOptions;
use crate::scanner::{Token, WordScanner};
use crate::trace::{MetadataEnd, ParseObserver, TraceEvent};
use crate::value::{TypedValue, ValueDecoder};

// Well-known grid metadata keys.
pub const META_GRID_CLASS: &str = "class";
pub const META_GRID_CREATOR: &str = "creator";
pub const META_GRID_NAME: &str = "name";
pub const META_SAVE_HALF_FLOAT: &str = "is_saved_as_half_float";
pub const META_IS_LOCAL_SPACE: &str = "is_local_space";
pub const META_VECTOR_TYPE: &str = "vector_type";
pub const META_FILE_BBOX_MIN: &str = "file_bbox_min";
pub const META_FILE_BBOX_MAX: &str = "file_bbox_max";
pub const META_FILE_COMPRESSION: &str = "file_compression";
pub const META_FILE_MEM_BYTES: &str = "file_mem_bytes";
pub const META_FILE_VOXEL_COUNT: &str = "file_voxel_count";
pub const META_FILE_DELAYED_LOAD: &str = "file_delayed_load";

/// One `(name, type, value)` triple. A `None` value marks a delayed load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataEntry {
    pub name: Token,
    #[serde(rename = "type")]
    pub type_name: Token,
    pub value: Option<TypedValue>,
}

/// Result of decoding the metadata table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataTable {
    pub entries: Vec<MetadataEntry>,
    /// True if the entry bound stopped decoding before the end of the buffer.
    pub truncated: bool,
}

impl MetadataTable {
    /// Decodes entries until the end marker or the configured bound.
    ///
    /// The table ends cleanly when no token bytes remain. Any failure inside
    /// an entry aborts the decode.
    pub fn decode(
        cursor: &mut ByteCursor<'_>,
        options: &ParseOptions,
        observer: &mut dyn ParseObserver,
    ) -> Result<Self> {
        let limit = options.metadata_limit();
        let mut table = Self::default();

        loop {
            let scanner = WordScanner::with_max_attempts(cursor, options.max_token_attempts);
            if scanner.at_end() {
                observer.on_event(&TraceEvent::MetadataFinished {
                    entries: table.entries.len(),
                    position: cursor.position(),
                    end: MetadataEnd::EndOfBuffer,
                });
                return Ok(table);
            }

            if table.entries.len() == limit {
                if options.strict_metadata_limit {
                    return Err(ParseError::LimitExceeded {
                        limit,
                        position: cursor.position(),
                    });
                }
                observer.on_event(&TraceEvent::MetadataFinished {
                    entries: limit,
                    position: cursor.position(),
                    end: MetadataEnd::LimitReached,
                });
                table.truncated = true;
                return Ok(table);
            }

            let entry = decode_entry(cursor, options, observer)?;
            observer.on_event(&TraceEvent::MetadataEntry {
                index: table.entries.len(),
                name: entry.name.to_string(),
                type_name: entry.type_name.to_string(),
            });
            table.entries.push(entry);
        }
    }
}

fn decode_entry(
    cursor: &mut ByteCursor<'_>,
    options: &ParseOptions,
    observer: &mut dyn ParseObserver,
) -> Result<MetadataEntry> {
    let mut scanner = WordScanner::with_max_attempts(cursor, options.max_token_attempts);
    let name = scanner.scan_token()?;
    let type_name = scanner.scan_token()?;

    // The delayed-load marker is keyed by name and carries no value.
    if name.eq_str(META_FILE_DELAYED_LOAD) {
        ValueDecoder::new(cursor).decode_int32(false)?;
        return Ok(MetadataEntry {
            name,
            type_name,
            value: None,
        });
    }

    let value = match type_name.as_bytes() {
        b"int64" | b"float" => {
            let mut decoder = ValueDecoder::new(cursor);
            decoder.skip_word()?;
            decoder.decode_int64()?
        }
        b"bool" => {
            observer.on_event(&TraceEvent::UnhandledValue {
                name: name.to_string(),
                type_name: type_name.to_string(),
            });
            ValueDecoder::new(cursor).decode_unhandled(0)?
        }
        b"vec3i" => {
            let mut decoder = ValueDecoder::new(cursor);
            decoder.skip_word()?;
            decoder.decode_vec3_int32()?
        }
        _ => TypedValue::String(
            WordScanner::with_max_attempts(cursor, options.max_token_attempts).scan_token()?,
        ),
    };

    Ok(MetadataEntry {
        name,
        type_name,
        value: Some(value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::RecordingObserver;
    use glam::IVec3;

    fn word(out: &mut Vec<u8>, s: &str) {
        out.push(0);
        out.extend_from_slice(s.as_bytes());
    }

    fn decode(data: &[u8], options: &ParseOptions) -> (Result<MetadataTable>, RecordingObserver) {
        let mut cursor = ByteCursor::new(data);
        let mut observer = RecordingObserver::new();
        let table = MetadataTable::decode(&mut cursor, options, &mut observer);
        (table, observer)
    }

    #[test]
    fn test_empty_table() {
        let (table, observer) = decode(&[0, 0, 1], &ParseOptions::default());
        let table = table.unwrap();
        assert!(table.entries.is_empty());
        assert!(!table.truncated);
        assert!(matches!(
            observer.events.last(),
            Some(TraceEvent::MetadataFinished {
                entries: 0,
                end: MetadataEnd::EndOfBuffer,
                ..
            })
        ));
    }

    #[test]
    fn test_dispatch_by_type() {
        let mut data = Vec::new();
        word(&mut data, "file_voxel_count");
        word(&mut data, "int64");
        data.push(0);
        data.extend_from_slice(&8i32.to_le_bytes()[1..]);
        data.extend_from_slice(&1234i64.to_le_bytes());
        word(&mut data, "file_bbox_min");
        word(&mut data, "vec3i");
        data.push(0);
        data.extend_from_slice(&12i32.to_le_bytes()[1..]);
        for v in [12i32, -3, 4, 5] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        word(&mut data, "is_local_space");
        word(&mut data, "bool");
        word(&mut data, "class");
        word(&mut data, "string");
        word(&mut data, "fog_volume");

        let (table, observer) = decode(&data, &ParseOptions::default());
        let table = table.unwrap();
        assert_eq!(table.entries.len(), 4);

        assert!(table.entries[0].name.eq_str("file_voxel_count"));
        assert_eq!(table.entries[0].value, Some(TypedValue::Int64(1234)));
        assert_eq!(
            table.entries[1].value,
            Some(TypedValue::Vec3Int32(IVec3::new(-3, 4, 5)))
        );
        assert_eq!(table.entries[2].value, Some(TypedValue::Unhandled(vec![])));
        assert_eq!(
            table.entries[3].value.as_ref().and_then(TypedValue::as_token).map(ToString::to_string),
            Some("fog_volume".to_string())
        );
        assert!(observer
            .events
            .iter()
            .any(|e| matches!(e, TraceEvent::UnhandledValue { name, .. } if name == "is_local_space")));
    }

    #[test]
    fn test_float_entry_reads_eight_bytes() {
        let mut data = Vec::new();
        word(&mut data, "background");
        word(&mut data, "float");
        data.push(0);
        data.extend_from_slice(&4i32.to_le_bytes()[1..]);
        data.extend_from_slice(&7i64.to_le_bytes());
        word(&mut data, "class");
        word(&mut data, "string");
        word(&mut data, "level_set");

        let (table, _) = decode(&data, &ParseOptions::default());
        let table = table.unwrap();
        assert_eq!(table.entries.len(), 2);
        assert!(table.entries[0].type_name.eq_str("float"));
        assert_eq!(table.entries[0].value, Some(TypedValue::Int64(7)));
        assert!(table.entries[1].name.eq_str("class"));
    }

    #[test]
    fn test_delayed_load_has_no_value() {
        let mut data = Vec::new();
        word(&mut data, META_FILE_DELAYED_LOAD);
        word(&mut data, "__delayedLoadMeta");
        data.extend_from_slice(&[0, 0, 0, 0]);
        word(&mut data, "creator");
        word(&mut data, "string");
        word(&mut data, "houdini");

        let (table, _) = decode(&data, &ParseOptions::default());
        let table = table.unwrap();
        assert_eq!(table.entries.len(), 2);
        assert_eq!(table.entries[0].value, None);
        assert!(table.entries[1].name.eq_str("creator"));
    }

    fn many_entries(n: usize) -> Vec<u8> {
        let mut data = Vec::new();
        for i in 0..n {
            word(&mut data, &format!("key{i}"));
            word(&mut data, "string");
            word(&mut data, "v");
        }
        data
    }

    #[test]
    fn test_bound_truncates() {
        let (table, observer) = decode(&many_entries(40), &ParseOptions::default());
        let table = table.unwrap();
        assert_eq!(table.entries.len(), 32);
        assert!(table.truncated);
        assert!(matches!(
            observer.events.last(),
            Some(TraceEvent::MetadataFinished {
                end: MetadataEnd::LimitReached,
                ..
            })
        ));
    }

    #[test]
    fn test_exactly_at_bound_is_complete() {
        let (table, _) = decode(&many_entries(32), &ParseOptions::default());
        let table = table.unwrap();
        assert_eq!(table.entries.len(), 32);
        assert!(!table.truncated);
    }

    #[test]
    fn test_strict_bound_fails() {
        let options = ParseOptions {
            strict_metadata_limit: true,
            max_metadata_entries: 2,
            ..Default::default()
        };
        let (table, _) = decode(&many_entries(3), &options);
        assert!(matches!(
            table,
            Err(ParseError::LimitExceeded { limit: 2, .. })
        ));
    }

    #[test]
    fn test_truncated_entry_is_fatal() {
        let mut data = Vec::new();
        word(&mut data, "file_mem_bytes");
        word(&mut data, "int64");
        data.extend_from_slice(&[0, 0, 0, 0, 1, 2]);
        let (table, _) = decode(&data, &ParseOptions::default());
        assert!(matches!(table, Err(ParseError::BufferUnderrun { .. })));
    }
}
