/// Pull-stream state machine.
///
/// State transitions:
/// ```text
/// idle → ready → streaming ↔ paused
///                    ↓         ↓
///                     stopping → idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Idle,
    Ready,
    Streaming,
    Paused,
    Stopping,
}

impl StreamState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self, Self::Streaming)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused)
    }
}
