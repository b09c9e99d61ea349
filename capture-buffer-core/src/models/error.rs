use thiserror::Error;

/// Errors that can occur during capture stream buffering.
///
/// Short reads are deliberately absent: a `dequeue` that returns fewer
/// bytes than requested is a normal outcome, not a failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("invalid capacity: {0}")]
    InvalidCapacity(usize),

    #[error("capacity {requested} cannot hold {len} buffered bytes")]
    CapacityTooSmall { requested: usize, len: usize },

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("source not available")]
    SourceNotAvailable,

    #[error("sink error: {0}")]
    SinkError(String),
}
