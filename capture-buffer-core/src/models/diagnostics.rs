use serde::{Deserialize, Serialize};

/// Diagnostics for debugging capture stream sessions.
///
/// Serializable for JSON export alongside a recording.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDiagnostics {
    /// Chunks the source callback delivered.
    pub chunks_enqueued: u64,
    /// Bytes the source callback delivered.
    pub bytes_enqueued: u64,
    /// Samples handed to the sink.
    pub samples_delivered: u64,
    /// Bytes handed to the sink.
    pub bytes_delivered: u64,
    /// Samples delivered shorter than the configured size.
    pub short_reads: u64,
    /// Backlog bytes discarded on resume.
    pub stale_bytes_discarded: u64,
}
