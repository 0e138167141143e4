//! Display-side spectrum consumer abstraction.

/// Consumer of computed spectrum magnitudes.
///
/// Called at audio-buffer cadence from task context; implementations must
/// not block the audio path. The firmware's bar renderer implements this
/// over an `embedded-graphics` draw target, test fakes just record the
/// values they were handed.
pub trait SpectrumSink {
    /// Error type for sink operations.
    type Error: core::fmt::Debug;

    /// Accept one freshly computed magnitude vector.
    ///
    /// `max_value` is the normalization ceiling: a bin at `max_value` (or
    /// above) maps to a full-height bar. Bins above the ceiling are clamped,
    /// not an error.
    fn set_spectrogram(&mut self, bins: &[u32], max_value: u32) -> Result<(), Self::Error>;
}
