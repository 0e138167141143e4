//! CS42L51 register map.
//!
//! Source: Cirrus Logic CS42L51 datasheet (DS668F2).
//!
//! # Key I²C constraints
//!
//! ## Power-down gate
//! The chip must be configured while PDN is asserted: interface format,
//! speed mode and initial volume are only latched reliably when written
//! with the device powered down, after which PDN is released. The driver
//! therefore writes the whole configuration before the final power-up.
//!
//! ## Output volume registers
//! `AOUTA_VOL`/`AOUTB_VOL` take a signed byte: `0x00` = 0 dB, down to
//! `-102` (`0x9A` two's complement) = −102 dB, half-dB steps above that.
//! The playback crate's percent mapping produces exactly this range.

// ---------------------------------------------------------------------------
// Register addresses
// ---------------------------------------------------------------------------

/// Chip ID and revision (read-only)
pub const REG_CHIP_ID: u8 = 0x01;

/// Power control — bit 0 = PDN (global power down)
pub const REG_POWER_CTL: u8 = 0x02;

/// MIC power control and speed mode — bits \[7:6\] select the speed class
pub const REG_MIC_POWER_SPEED: u8 = 0x03;

/// Serial interface control — format, master/slave, word length
pub const REG_INTERFACE_CTL: u8 = 0x04;

/// DAC output control — HP gain, analogue mute bits
pub const REG_DAC_OUT_CTL: u8 = 0x08;

/// DAC control — serial-port data selection, soft ramp
pub const REG_DAC_CTL: u8 = 0x09;

/// Analogue output volume, channel A (signed, 0x00 = 0 dB)
pub const REG_AOUTA_VOL: u8 = 0x16;

/// Analogue output volume, channel B (signed, 0x00 = 0 dB)
pub const REG_AOUTB_VOL: u8 = 0x17;

// ---------------------------------------------------------------------------
// Register values
// ---------------------------------------------------------------------------

/// Chip ID field of [`REG_CHIP_ID`] (upper five bits; lower three are the
/// silicon revision)
pub const CHIP_ID: u8 = 0xD8;

/// Mask selecting the ID field of [`REG_CHIP_ID`]
pub const CHIP_ID_MASK: u8 = 0xF8;

/// [`REG_POWER_CTL`]: everything powered, PDN released
pub const POWER_CTL_ACTIVE: u8 = 0x00;

/// [`REG_POWER_CTL`]: global power down
pub const POWER_CTL_PDN: u8 = 0x01;

/// [`REG_MIC_POWER_SPEED`]: single-speed mode (4–50 kHz sample rates,
/// covers the fixed 48 kHz stream)
pub const SPEED_SINGLE: u8 = 0x20;

/// [`REG_INTERFACE_CTL`]: slave mode, I²S up to 24-bit data
pub const INTF_I2S_SLAVE: u8 = 0x0C;

/// [`REG_DAC_CTL`]: DAC fed from the serial port, soft-ramp enabled
pub const DAC_CTL_PCM_SOFT_RAMP: u8 = 0x42;

/// [`REG_DAC_OUT_CTL`]: both analogue outputs live
pub const DAC_OUT_UNMUTED: u8 = 0x00;

/// [`REG_DAC_OUT_CTL`]: mute bits for channels A and B
pub const DAC_OUT_MUTE_BOTH: u8 = 0x03;
