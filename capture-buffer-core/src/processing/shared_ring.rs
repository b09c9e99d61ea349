use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::models::error::StreamError;
use crate::processing::byte_ring::ByteRingBuffer;

/// Byte ring with its own instance-wide lock, shared between one producer
/// thread (a device-driven capture callback) and one consumer thread (a
/// pull-model sample puller).
///
/// `enqueue`, `dequeue`, and `skip` hold the lock for their full duration.
/// Capacity growth happens inside the enqueue critical section — the
/// storage replacement is never observable half-done. Hold time is bounded
/// by a memcpy of the buffered content; neither side ever blocks waiting
/// for data or space.
///
/// `reset` and `peek` take the lock too, so the boundary-only calling
/// discipline for `reset` (see [`reset`](Self::reset)) is a scheduling
/// convention, not a memory safety requirement. `len` stays lock-free via
/// an atomic mirror of the buffered length, cheap enough for a polling
/// consumer to call every cycle.
#[derive(Debug)]
pub struct SharedByteRing {
    inner: Mutex<ByteRingBuffer>,
    len: AtomicUsize,
}

impl SharedByteRing {
    /// Allocate a shared ring with `initial` bytes of storage.
    pub fn with_capacity(initial: usize) -> Result<Self, StreamError> {
        Ok(Self {
            inner: Mutex::new(ByteRingBuffer::with_capacity(initial)?),
            len: AtomicUsize::new(0),
        })
    }

    /// Append a chunk from the producer. Grows instead of dropping.
    pub fn enqueue(&self, data: &[u8]) {
        let mut ring = self.inner.lock();
        ring.enqueue(data);
        self.len.store(ring.len(), Ordering::Release);
    }

    /// Pull up to `out.len()` bytes for the consumer, oldest first.
    ///
    /// Returns the number of bytes copied; a short read is a normal
    /// outcome when the producer has not kept up.
    pub fn dequeue(&self, out: &mut [u8]) -> usize {
        let mut ring = self.inner.lock();
        let n = ring.dequeue(out);
        self.len.store(ring.len(), Ordering::Release);
        n
    }

    /// Discard the oldest `n` buffered bytes without copying them out.
    /// `n` is clamped to the buffered length.
    pub fn skip(&self, n: usize) {
        let mut ring = self.inner.lock();
        ring.consume(n);
        self.len.store(ring.len(), Ordering::Release);
    }

    /// Drop all buffered bytes, keeping the grown capacity.
    ///
    /// Intended for stream start/stop boundaries, when producer and
    /// consumer are known to be quiescent. Mid-stream, prefer
    /// [`skip`](Self::skip), which composes with concurrent traffic.
    pub fn reset(&self) {
        let mut ring = self.inner.lock();
        ring.clear();
        self.len.store(0, Ordering::Release);
    }

    /// Byte at logical offset `index` from the oldest buffered byte,
    /// without consuming it. Same caveats as [`ByteRingBuffer::peek`].
    pub fn peek(&self, index: usize) -> u8 {
        self.inner.lock().peek(index)
    }

    /// Buffered length, read without taking the lock.
    ///
    /// May trail an in-flight operation by one update; treat it as the
    /// hint a polling consumer needs, not a synchronized snapshot.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current storage capacity.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }
}
