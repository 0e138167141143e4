//! Mock codec for host-side testing.
//!
//! Implements [`platform::AudioCodec`] without any hardware dependency and
//! records all calls for assertion in tests.

use platform::{AudioCodec, AudioConfig};

/// Mock codec — records all calls for test assertions.
pub struct MockCodec {
    /// Current volume setting (0–100)
    pub volume: u8,
    /// Config from the last [`AudioCodec::init`]
    pub config: Option<AudioConfig>,
    /// Whether [`AudioCodec::start`] has been called (and not followed by `stop`)
    pub started: bool,
    /// Current mute state
    pub muted: bool,
}

impl MockCodec {
    /// Create a new mock codec with sensible defaults.
    pub fn new() -> Self {
        Self {
            volume: 80,
            config: None,
            started: false,
            muted: true,
        }
    }
}

impl Default for MockCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioCodec for MockCodec {
    type Error = core::convert::Infallible;

    async fn init(&mut self, config: AudioConfig) -> Result<(), Self::Error> {
        self.config = Some(config);
        Ok(())
    }

    async fn start(&mut self) -> Result<(), Self::Error> {
        self.started = true;
        self.muted = false;
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), Self::Error> {
        self.started = false;
        self.muted = true;
        Ok(())
    }

    async fn set_volume(&mut self, volume: u8) -> Result<(), Self::Error> {
        self.volume = volume.min(100);
        Ok(())
    }

    async fn set_mute(&mut self, mute: bool) -> Result<(), Self::Error> {
        self.muted = mute;
        Ok(())
    }
}
