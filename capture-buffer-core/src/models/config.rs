use crate::processing::byte_ring::GROWTH_QUANTUM;

/// Configuration for a pull-model capture stream.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamConfiguration {
    /// Sample rate of the captured audio in Hz (default: 48000).
    pub sample_rate: f64,

    /// Bit depth of the PCM byte stream (default: 16). Valid values: 16, 24, 32.
    pub bit_depth: u16,

    /// Number of interleaved channels (default: 2 for stereo).
    pub channels: u16,

    /// Bytes pulled per media sample (default: 100 ms at the default format).
    pub sample_bytes: usize,

    /// Poll cadence of the pull thread in milliseconds (default: 100).
    pub poll_interval_ms: u64,

    /// Seconds of audio the ring is sized for up front (default: 5.0).
    pub buffer_seconds: f64,
}

impl StreamConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate <= 0.0 {
            return Err("sample rate must be positive".into());
        }
        if ![16, 24, 32].contains(&self.bit_depth) {
            return Err(format!("unsupported bit depth: {}", self.bit_depth));
        }
        if ![1, 2].contains(&self.channels) {
            return Err(format!("unsupported channel count: {}", self.channels));
        }
        if self.sample_bytes == 0 {
            return Err("sample size must be positive".into());
        }
        if self.poll_interval_ms == 0 {
            return Err("poll interval must be positive".into());
        }
        if self.buffer_seconds <= 0.0 {
            return Err("buffer length must be positive".into());
        }
        Ok(())
    }

    /// Bytes per second of the configured PCM format.
    pub fn bytes_per_second(&self) -> usize {
        (self.sample_rate * self.channels as f64) as usize * (self.bit_depth as usize / 8)
    }

    /// Initial ring capacity: `buffer_seconds` of audio, rounded up to the
    /// growth quantum so the first on-demand growth lands on the same grid.
    pub fn initial_capacity(&self) -> usize {
        ((self.buffer_seconds * self.bytes_per_second() as f64) as usize)
            .max(1)
            .next_multiple_of(GROWTH_QUANTUM)
    }
}

impl Default for StreamConfiguration {
    fn default() -> Self {
        Self {
            sample_rate: 48000.0,
            bit_depth: 16,
            channels: 2,
            sample_bytes: 19_200, // 100 ms of 48 kHz stereo 16-bit
            poll_interval_ms: 100,
            buffer_seconds: 5.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(StreamConfiguration::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_fields() {
        let mut config = StreamConfiguration::default();
        config.bit_depth = 12;
        assert!(config.validate().is_err());

        let mut config = StreamConfiguration::default();
        config.sample_bytes = 0;
        assert!(config.validate().is_err());

        let mut config = StreamConfiguration::default();
        config.sample_rate = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn initial_capacity_is_quantum_aligned() {
        let config = StreamConfiguration::default();
        // 5 s of 48 kHz stereo 16-bit = 960_000 bytes.
        assert_eq!(config.bytes_per_second(), 192_000);
        assert_eq!(config.initial_capacity() % GROWTH_QUANTUM, 0);
        assert!(config.initial_capacity() >= 960_000);
    }
}
