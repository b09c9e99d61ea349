use std::sync::Arc;

use crate::models::error::StreamError;

/// Callback invoked when a chunk of captured bytes is available.
///
/// The chunk is a variable-length run of the stream's PCM bytes — whatever
/// the device layer delivered, not a sample boundary.
pub type ByteChunkCallback = Arc<dyn Fn(&[u8]) + Send + Sync + 'static>;

/// Interface for platform-specific capture byte sources.
///
/// Implemented outside this crate by the device layer (Windows WASAPI or
/// DirectShow filters, macOS Core Audio taps) and by test fixtures.
pub trait SampleSource: Send + Sync {
    /// Whether this capture source is currently available.
    fn is_available(&self) -> bool;

    /// Start capturing, delivering byte chunks via `callback`.
    ///
    /// The callback fires on a dedicated capture thread — keep processing
    /// minimal.
    fn start(&mut self, callback: ByteChunkCallback) -> Result<(), StreamError>;

    /// Stop capturing and release resources.
    fn stop(&mut self) -> Result<(), StreamError>;
}
