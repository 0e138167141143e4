//! CS42L51 hardware driver.
//!
//! Communicates with the chip via I²C using the
//! `embedded_hal_async::i2c::I2c` trait, so it is HAL-agnostic while
//! remaining async. The PCM stream itself is delivered over I²S by the
//! STM32 SPI/I2S + DMA peripheral — that path does not go through this
//! driver.
//!
//! # I²C Address
//!
//! AD0 is strapped to ground on the target board, giving address `0x4A`.

use embedded_hal_async::i2c::I2c;
use platform::{AudioCodec, AudioConfig};

use super::registers::*;

/// I²C address (AD0 = GND)
const I2C_ADDR: u8 = 0x4A;

/// Driver error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cs42l51Error<E> {
    /// I²C transaction failed.
    Bus(E),
    /// [`REG_CHIP_ID`] did not identify a CS42L51; contains the byte read.
    BadChipId(u8),
    /// The requested [`AudioConfig`] is outside what the codec path
    /// supports; contains the offending field name.
    BadConfig(&'static str),
}

/// CS42L51 codec driver.
pub struct Cs42l51Driver<I> {
    i2c: I,
    volume: u8,
}

impl<I: I2c> Cs42l51Driver<I> {
    /// Create a new CS42L51 driver.
    ///
    /// `i2c` must be a configured async I²C peripheral pointing at the chip.
    pub fn new(i2c: I) -> Self {
        Self { i2c, volume: 80 }
    }

    /// Write a single register over I²C.
    async fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), Cs42l51Error<I::Error>> {
        self.i2c
            .write(I2C_ADDR, &[reg, value])
            .await
            .map_err(Cs42l51Error::Bus)
    }

    /// Read a single register over I²C.
    async fn read_reg(&mut self, reg: u8) -> Result<u8, Cs42l51Error<I::Error>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(I2C_ADDR, &[reg], &mut buf)
            .await
            .map_err(Cs42l51Error::Bus)?;
        let [value] = buf;
        Ok(value)
    }

    /// Verify the chip answers with the CS42L51 ID.
    async fn verify_chip_id(&mut self) -> Result<(), Cs42l51Error<I::Error>> {
        let id = self.read_reg(REG_CHIP_ID).await?;
        if id & CHIP_ID_MASK != CHIP_ID {
            return Err(Cs42l51Error::BadChipId(id));
        }
        Ok(())
    }

    /// Write the percent volume to both output channels.
    async fn apply_volume(&mut self) -> Result<(), Cs42l51Error<I::Error>> {
        let ctrl = playback::volume_to_ctrl(self.volume);
        // Register takes the signed attenuation as a raw byte.
        #[allow(clippy::cast_sign_loss)]
        let raw = ctrl as u8;
        self.write_reg(REG_AOUTA_VOL, raw).await?;
        self.write_reg(REG_AOUTB_VOL, raw).await
    }
}

impl<I: I2c> AudioCodec for Cs42l51Driver<I> {
    type Error = Cs42l51Error<I::Error>;

    async fn init(&mut self, config: AudioConfig) -> Result<(), Self::Error> {
        config.validate().map_err(Cs42l51Error::BadConfig)?;

        self.verify_chip_id().await?;

        // Configure while powered down, then release PDN. The DMA stream
        // is brought up by the caller only after this returns.
        self.write_reg(REG_POWER_CTL, POWER_CTL_PDN).await?;
        self.write_reg(REG_MIC_POWER_SPEED, SPEED_SINGLE).await?;
        self.write_reg(REG_INTERFACE_CTL, INTF_I2S_SLAVE).await?;
        self.write_reg(REG_DAC_CTL, DAC_CTL_PCM_SOFT_RAMP).await?;
        self.write_reg(REG_DAC_OUT_CTL, DAC_OUT_MUTE_BOTH).await?;
        self.apply_volume().await?;
        self.write_reg(REG_POWER_CTL, POWER_CTL_ACTIVE).await
    }

    async fn start(&mut self) -> Result<(), Self::Error> {
        self.set_mute(false).await
    }

    async fn stop(&mut self) -> Result<(), Self::Error> {
        self.set_mute(true).await
    }

    async fn set_volume(&mut self, volume: u8) -> Result<(), Self::Error> {
        self.volume = volume.min(100);
        if self.volume == 0 {
            // Full attenuation still bleeds; use the hard mute instead.
            return self.set_mute(true).await;
        }
        self.apply_volume().await
    }

    async fn set_mute(&mut self, mute: bool) -> Result<(), Self::Error> {
        let ctl = if mute {
            DAC_OUT_MUTE_BOTH
        } else {
            DAC_OUT_UNMUTED
        };
        self.write_reg(REG_DAC_OUT_CTL, ctl).await
    }
}
