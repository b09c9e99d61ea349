use crate::models::error::StreamError;

/// Destination for pulled media samples.
///
/// Called from the pull thread, one call per sample. A sample shorter than
/// the configured size is a legitimate short read, delivered as-is; the
/// sink must not treat it as corruption.
pub trait SampleSink: Send {
    fn write_sample(&mut self, sample: &[u8]) -> Result<(), StreamError>;
}
