//! Audio codec abstraction

/// Audio codec trait
///
/// Control-plane only: the PCM stream itself is delivered by the circular
/// DMA + I²S path and never passes through this trait.
pub trait AudioCodec {
    /// Error type
    type Error: core::fmt::Debug;

    /// Initialize codec with configuration
    fn init(
        &mut self,
        config: AudioConfig,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Start playback
    fn start(&mut self) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Stop playback
    fn stop(&mut self) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Set volume (0-100)
    fn set_volume(
        &mut self,
        volume: u8,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Mute or unmute the output stage
    fn set_mute(&mut self, mute: bool) -> impl core::future::Future<Output = Result<(), Self::Error>>;
}

/// Audio configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AudioConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u8,
    /// Bit depth (16 or 24)
    pub bit_depth: u8,
}

impl AudioConfig {
    /// Check the configuration against what the codec path supports.
    ///
    /// # Errors
    ///
    /// Returns the offending field name.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.sample_rate == 0 || self.sample_rate > 192_000 {
            return Err("sample_rate");
        }
        if self.channels == 0 || self.channels > 2 {
            return Err("channels");
        }
        if self.bit_depth != 16 && self.bit_depth != 24 {
            return Err("bit_depth");
        }
        Ok(())
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            channels: 2,
            bit_depth: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(AudioConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_sample_rate_rejected() {
        let cfg = AudioConfig {
            sample_rate: 0,
            ..AudioConfig::default()
        };
        assert_eq!(cfg.validate(), Err("sample_rate"));
    }

    #[test]
    fn odd_bit_depth_rejected() {
        let cfg = AudioConfig {
            bit_depth: 12,
            ..AudioConfig::default()
        };
        assert_eq!(cfg.validate(), Err("bit_depth"));
    }
}
