//! Structured trace events emitted while decoding.
//!
//! The decoder never logs directly. It reports [`TraceEvent`]s to a
//! [`ParseObserver`]; [`LogObserver`] forwards them to the `log` facade.

/// Why the metadata table stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataEnd {
    /// No token bytes remain in the buffer.
    EndOfBuffer,
    /// The entry bound was reached with bytes still pending.
    LimitReached,
}

/// A decoding step worth reporting.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    /// The format version byte was read.
    Header { format_version: u8 },
    /// A token of unknown purpose was skipped.
    TokenDiscarded { position: usize, token: String },
    /// The grid identity fields were read.
    GridIdentified {
        file_id: String,
        grid_id: String,
        grid_type: String,
        is_half_float: bool,
    },
    /// A metadata entry was decoded.
    MetadataEntry {
        index: usize,
        name: String,
        type_name: String,
    },
    /// A metadata entry of a recognized type was kept undecoded.
    UnhandledValue { name: String, type_name: String },
    /// The metadata table finished.
    MetadataFinished {
        entries: usize,
        position: usize,
        end: MetadataEnd,
    },
}

/// Receives trace events during a parse.
pub trait ParseObserver {
    fn on_event(&mut self, event: &TraceEvent);
}

/// Forwards events to the `log` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ParseObserver for LogObserver {
    fn on_event(&mut self, event: &TraceEvent) {
        match event {
            TraceEvent::Header { format_version } => {
                log::debug!("vdb format version {format_version}");
            }
            TraceEvent::TokenDiscarded { position, token } => {
                log::trace!("discarded token '{token}' at byte {position}");
            }
            TraceEvent::GridIdentified {
                grid_id, grid_type, ..
            } => {
                log::info!("grid: {grid_id} ({grid_type})");
            }
            TraceEvent::MetadataEntry {
                index,
                name,
                type_name,
            } => {
                log::debug!("metadata[{index}] {name}: {type_name}");
            }
            TraceEvent::UnhandledValue { name, type_name } => {
                log::warn!("metadata '{name}' of type '{type_name}' is not decoded");
            }
            TraceEvent::MetadataFinished {
                entries,
                position,
                end: MetadataEnd::LimitReached,
            } => {
                log::warn!("metadata table stopped at {entries} entries (byte {position}) with data pending");
            }
            TraceEvent::MetadataFinished { entries, .. } => {
                log::debug!("metadata table complete with {entries} entries");
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ParseObserver for NullObserver {
    fn on_event(&mut self, _event: &TraceEvent) {}
}

/// Collects events in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    pub events: Vec<TraceEvent>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ParseObserver for RecordingObserver {
    fn on_event(&mut self, event: &TraceEvent) {
        self.events.push(event.clone());
    }
}

impl<F: FnMut(&TraceEvent)> ParseObserver for F {
    fn on_event(&mut self, event: &TraceEvent) {
        self(event);
    }
}
