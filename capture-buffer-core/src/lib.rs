//! # capture-buffer-core
//!
//! Platform-agnostic capture stream buffering core.
//!
//! Decouples a device-driven capture callback (variable-rate byte chunks)
//! from a pull-model sample consumer through a growable, lock-protected
//! circular byte buffer. Platform-specific byte sources (Windows WASAPI /
//! DirectShow, macOS Core Audio) implement the `SampleSource` trait and
//! plug into the generic `PullStream`.
//!
//! ## Architecture
//!
//! ```text
//! capture-buffer-core (this crate)
//! ├── traits/       ← SampleSource, SampleSink
//! ├── models/       ← StreamError, StreamState, StreamConfiguration, StreamDiagnostics
//! ├── processing/   ← ByteRingBuffer, SharedByteRing, PCM byte packing
//! └── session/      ← PullStream (generic orchestrator)
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::config::StreamConfiguration;
pub use models::diagnostics::StreamDiagnostics;
pub use models::error::StreamError;
pub use models::state::StreamState;
pub use processing::byte_ring::{ByteRingBuffer, GROWTH_QUANTUM};
pub use processing::shared_ring::SharedByteRing;
pub use session::pull_stream::PullStream;
pub use traits::sample_sink::SampleSink;
pub use traits::sample_source::{ByteChunkCallback, SampleSource};
