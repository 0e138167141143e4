//! Display rendering: spectrogram bars over `embedded-graphics`.

pub mod spectrogram;

pub use spectrogram::{map_range_u, SpectrogramView};
