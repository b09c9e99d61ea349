use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use crate::models::config::StreamConfiguration;
use crate::models::diagnostics::StreamDiagnostics;
use crate::models::error::StreamError;
use crate::models::state::StreamState;
use crate::processing::shared_ring::SharedByteRing;
use crate::traits::sample_sink::SampleSink;
use crate::traits::sample_source::{ByteChunkCallback, SampleSource};

/// Internal mutable session state, protected by `parking_lot::Mutex`.
struct SessionState {
    state: StreamState,
    diagnostics: StreamDiagnostics,
}

impl SessionState {
    fn new() -> Self {
        Self {
            state: StreamState::Idle,
            diagnostics: StreamDiagnostics::default(),
        }
    }
}

/// Pull-model capture stream orchestrator.
///
/// Generic over the capture backend via the `SampleSource` trait, with the
/// data flow:
/// ```text
/// [SampleSource callback] → [SharedByteRing] → [pull thread] → [SampleSink]
/// ```
///
/// The source callback enqueues variable-sized chunks on the capture
/// thread; the pull thread dequeues fixed-size samples on a poll cadence
/// and hands them to the sink. Neither side blocks: a full ring grows, an
/// under-filled ring yields a short read.
pub struct PullStream<S: SampleSource> {
    source: S,
    config: Option<StreamConfiguration>,

    // Ring shared between the capture callback and the pull thread
    ring: Option<Arc<SharedByteRing>>,

    // Sink (accessed from the pull thread)
    sink: Arc<Mutex<Option<Box<dyn SampleSink>>>>,

    session_state: Arc<Mutex<SessionState>>,

    // Pull thread control
    pull_running: Arc<AtomicBool>,
    pull_handle: Option<thread::JoinHandle<()>>,
}

impl<S: SampleSource> PullStream<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            config: None,
            ring: None,
            sink: Arc::new(Mutex::new(None)),
            session_state: Arc::new(Mutex::new(SessionState::new())),
            pull_running: Arc::new(AtomicBool::new(false)),
            pull_handle: None,
        }
    }

    pub fn state(&self) -> StreamState {
        self.session_state.lock().state
    }

    pub fn diagnostics(&self) -> StreamDiagnostics {
        self.session_state.lock().diagnostics.clone()
    }

    /// Apply configuration and size the ring. Transitions: idle → ready.
    pub fn configure(&mut self, config: StreamConfiguration) -> Result<(), StreamError> {
        {
            let state = self.session_state.lock().state;
            if !state.is_idle() {
                return Err(StreamError::ConfigurationFailed(
                    "can only configure from idle state".into(),
                ));
            }
        }

        config.validate().map_err(StreamError::ConfigurationFailed)?;

        self.ring = Some(Arc::new(SharedByteRing::with_capacity(
            config.initial_capacity(),
        )?));
        self.config = Some(config);

        let mut s = self.session_state.lock();
        s.diagnostics = StreamDiagnostics::default();
        s.state = StreamState::Ready;
        Ok(())
    }

    /// Start the stream. Transitions: ready → streaming.
    pub fn start(&mut self, sink: Box<dyn SampleSink>) -> Result<(), StreamError> {
        let (config, ring) = match (&self.config, &self.ring) {
            (Some(config), Some(ring)) => (config.clone(), Arc::clone(ring)),
            _ => {
                return Err(StreamError::ConfigurationFailed("not configured".into()));
            }
        };
        {
            let state = self.session_state.lock().state;
            if !state.is_ready() {
                return Err(StreamError::ConfigurationFailed(
                    "can only start from ready state".into(),
                ));
            }
        }
        if !self.source.is_available() {
            return Err(StreamError::SourceNotAvailable);
        }

        // Stream boundary: neither producer nor consumer is up yet, which
        // is the contract the full reset requires.
        let stale = ring.len();
        if stale > 0 {
            log::debug!("discarding {} stale bytes at stream start", stale);
        }
        ring.reset();

        *self.sink.lock() = Some(sink);

        // Producer side: the capture callback enqueues on the device thread.
        let callback_ring = Arc::clone(&ring);
        let callback_state = Arc::clone(&self.session_state);
        let callback: ByteChunkCallback = Arc::new(move |chunk: &[u8]| {
            callback_ring.enqueue(chunk);
            let mut s = callback_state.lock();
            s.diagnostics.chunks_enqueued += 1;
            s.diagnostics.bytes_enqueued += chunk.len() as u64;
        });
        if let Err(e) = self.source.start(callback) {
            *self.sink.lock() = None;
            return Err(e);
        }

        self.session_state.lock().state = StreamState::Streaming;
        self.start_pull_loop(ring, &config);
        Ok(())
    }

    /// Pause delivery. Transitions: streaming → paused.
    ///
    /// The source keeps producing; the backlog accumulated while paused is
    /// discarded on resume rather than delivered late.
    pub fn pause(&mut self) -> Result<(), StreamError> {
        let mut s = self.session_state.lock();
        if !s.state.is_streaming() {
            return Err(StreamError::ConfigurationFailed(
                "can only pause from streaming state".into(),
            ));
        }
        s.state = StreamState::Paused;
        Ok(())
    }

    /// Resume delivery. Transitions: paused → streaming.
    pub fn resume(&mut self) -> Result<(), StreamError> {
        {
            let state = self.session_state.lock().state;
            if !state.is_paused() {
                return Err(StreamError::ConfigurationFailed(
                    "can only resume from paused state".into(),
                ));
            }
        }

        if let Some(ring) = &self.ring {
            // Stale audio the consumer never wants. A chunk arriving
            // between the length read and the skip stays buffered, which
            // is the right outcome for fresh data.
            let stale = ring.len();
            ring.skip(stale);
            if stale > 0 {
                log::debug!("discarded {} stale bytes on resume", stale);
            }
            self.session_state.lock().diagnostics.stale_bytes_discarded += stale as u64;
        }

        self.session_state.lock().state = StreamState::Streaming;
        Ok(())
    }

    /// Stop the stream, drain the ring into the sink, return diagnostics.
    /// Transitions: streaming/paused → stopping → idle.
    pub fn stop(&mut self) -> Result<StreamDiagnostics, StreamError> {
        {
            let mut s = self.session_state.lock();
            if !s.state.is_streaming() && !s.state.is_paused() {
                return Err(StreamError::ConfigurationFailed(
                    "can only stop from streaming or paused state".into(),
                ));
            }
            s.state = StreamState::Stopping;
        }

        if let Err(e) = self.source.stop() {
            log::warn!("capture source failed to stop cleanly: {}", e);
        }

        self.pull_running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.pull_handle.take() {
            let _ = handle.join();
        }

        // Producer stopped and pull thread joined; hand the sink whatever
        // is left, short final sample included.
        if let (Some(ring), Some(config)) = (&self.ring, &self.config) {
            let mut sample = vec![0u8; config.sample_bytes];
            while Self::pull_once(ring, &self.sink, &self.session_state, &mut sample) > 0 {}
        }

        *self.sink.lock() = None;

        let mut s = self.session_state.lock();
        s.state = StreamState::Idle;
        Ok(s.diagnostics.clone())
    }

    // --- Internal helpers ---

    /// Start the pull thread that moves samples from the ring to the sink.
    fn start_pull_loop(&mut self, ring: Arc<SharedByteRing>, config: &StreamConfiguration) {
        self.pull_running.store(true, Ordering::SeqCst);

        let running = Arc::clone(&self.pull_running);
        let session_state = Arc::clone(&self.session_state);
        let sink = Arc::clone(&self.sink);
        let poll_interval = Duration::from_millis(config.poll_interval_ms);
        let sample_bytes = config.sample_bytes;

        let handle = thread::Builder::new()
            .name("sample-pull".into())
            .spawn(move || {
                let mut sample = vec![0u8; sample_bytes];
                while running.load(Ordering::SeqCst) {
                    thread::sleep(poll_interval);

                    // Only pull while streaming.
                    let is_streaming = session_state.lock().state.is_streaming();
                    if !is_streaming {
                        continue;
                    }

                    Self::pull_once(&ring, &sink, &session_state, &mut sample);
                }
            })
            .expect("failed to spawn pull thread");

        self.pull_handle = Some(handle);
    }

    /// Pull one sample from the ring into the sink. Returns bytes delivered.
    fn pull_once(
        ring: &SharedByteRing,
        sink: &Mutex<Option<Box<dyn SampleSink>>>,
        session_state: &Mutex<SessionState>,
        sample: &mut [u8],
    ) -> usize {
        let n = ring.dequeue(sample);
        if n == 0 {
            return 0;
        }

        {
            let mut s = session_state.lock();
            s.diagnostics.samples_delivered += 1;
            s.diagnostics.bytes_delivered += n as u64;
            if n < sample.len() {
                s.diagnostics.short_reads += 1;
            }
        }

        if let Some(ref mut w) = *sink.lock() {
            if let Err(e) = w.write_sample(&sample[..n]) {
                log::error!("failed to deliver sample: {}", e);
            }
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> StreamConfiguration {
        StreamConfiguration {
            sample_rate: 8000.0,
            bit_depth: 16,
            channels: 1,
            sample_bytes: 64,
            poll_interval_ms: 5,
            buffer_seconds: 0.05,
        }
    }

    /// Delivers a fixed chunk script on its own thread, like a device
    /// callback would.
    struct ScriptedSource {
        chunks: Vec<Vec<u8>>,
        feeder: Option<thread::JoinHandle<()>>,
    }

    impl ScriptedSource {
        fn new(chunks: Vec<Vec<u8>>) -> Self {
            Self {
                chunks,
                feeder: None,
            }
        }
    }

    impl SampleSource for ScriptedSource {
        fn is_available(&self) -> bool {
            true
        }

        fn start(&mut self, callback: ByteChunkCallback) -> Result<(), StreamError> {
            let chunks = self.chunks.clone();
            self.feeder = Some(thread::spawn(move || {
                for chunk in chunks {
                    callback(&chunk);
                }
            }));
            Ok(())
        }

        fn stop(&mut self) -> Result<(), StreamError> {
            if let Some(handle) = self.feeder.take() {
                let _ = handle.join();
            }
            Ok(())
        }
    }

    /// Hands its callback to the test so chunks can be pushed by hand.
    struct ManualSource {
        slot: Arc<Mutex<Option<ByteChunkCallback>>>,
    }

    impl SampleSource for ManualSource {
        fn is_available(&self) -> bool {
            true
        }

        fn start(&mut self, callback: ByteChunkCallback) -> Result<(), StreamError> {
            *self.slot.lock() = Some(callback);
            Ok(())
        }

        fn stop(&mut self) -> Result<(), StreamError> {
            *self.slot.lock() = None;
            Ok(())
        }
    }

    struct UnavailableSource;

    impl SampleSource for UnavailableSource {
        fn is_available(&self) -> bool {
            false
        }

        fn start(&mut self, _callback: ByteChunkCallback) -> Result<(), StreamError> {
            Err(StreamError::SourceNotAvailable)
        }

        fn stop(&mut self) -> Result<(), StreamError> {
            Ok(())
        }
    }

    struct CollectingSink {
        data: Arc<Mutex<Vec<u8>>>,
    }

    impl SampleSink for CollectingSink {
        fn write_sample(&mut self, sample: &[u8]) -> Result<(), StreamError> {
            self.data.lock().extend_from_slice(sample);
            Ok(())
        }
    }

    #[test]
    fn delivers_all_bytes_in_order() {
        let payload: Vec<u8> = (0..10_000).map(|i| (i % 251) as u8).collect();
        let chunks: Vec<Vec<u8>> = payload.chunks(333).map(|c| c.to_vec()).collect();
        let chunk_count = chunks.len() as u64;

        let mut stream = PullStream::new(ScriptedSource::new(chunks));
        stream.configure(test_config()).unwrap();

        let data = Arc::new(Mutex::new(Vec::new()));
        stream
            .start(Box::new(CollectingSink {
                data: Arc::clone(&data),
            }))
            .unwrap();
        let diagnostics = stream.stop().unwrap();

        assert_eq!(*data.lock(), payload);
        assert_eq!(diagnostics.chunks_enqueued, chunk_count);
        assert_eq!(diagnostics.bytes_enqueued, 10_000);
        assert_eq!(diagnostics.bytes_delivered, 10_000);
        assert!(stream.state().is_idle());
    }

    #[test]
    fn resume_discards_paused_backlog() {
        let slot = Arc::new(Mutex::new(None));
        let mut stream = PullStream::new(ManualSource {
            slot: Arc::clone(&slot),
        });
        let mut config = test_config();
        config.poll_interval_ms = 20;
        stream.configure(config).unwrap();

        let data = Arc::new(Mutex::new(Vec::new()));
        stream
            .start(Box::new(CollectingSink {
                data: Arc::clone(&data),
            }))
            .unwrap();
        stream.pause().unwrap();

        let callback = slot.lock().clone().unwrap();
        callback(&[0xDD; 500]);
        callback(&[0xDD; 250]);

        stream.resume().unwrap();
        let diagnostics = stream.stop().unwrap();

        assert_eq!(diagnostics.stale_bytes_discarded, 750);
        assert_eq!(diagnostics.bytes_enqueued, 750);
        assert_eq!(diagnostics.bytes_delivered, 0);
        assert!(data.lock().is_empty());
    }

    #[test]
    fn guards_reject_out_of_order_calls() {
        let slot = Arc::new(Mutex::new(None));
        let mut stream = PullStream::new(ManualSource { slot });

        let sink = || {
            Box::new(CollectingSink {
                data: Arc::new(Mutex::new(Vec::new())),
            })
        };
        assert!(stream.start(sink()).is_err()); // not configured
        assert!(stream.pause().is_err());
        assert!(stream.resume().is_err());
        assert!(stream.stop().is_err());

        stream.configure(test_config()).unwrap();
        assert!(stream.configure(test_config()).is_err()); // not idle
    }

    #[test]
    fn configure_rejects_invalid_config() {
        let slot = Arc::new(Mutex::new(None));
        let mut stream = PullStream::new(ManualSource { slot });

        let mut config = test_config();
        config.bit_depth = 12;
        assert!(matches!(
            stream.configure(config),
            Err(StreamError::ConfigurationFailed(_))
        ));
        assert!(stream.state().is_idle());
    }

    #[test]
    fn start_fails_when_source_unavailable() {
        let mut stream = PullStream::new(UnavailableSource);
        stream.configure(test_config()).unwrap();

        let sink = Box::new(CollectingSink {
            data: Arc::new(Mutex::new(Vec::new())),
        });
        assert_eq!(stream.start(sink).unwrap_err(), StreamError::SourceNotAvailable);
        assert!(stream.state().is_ready());
    }
}
