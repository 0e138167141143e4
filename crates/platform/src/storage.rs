//! Storage-side sample supply abstraction.
//!
//! The playback core never touches the filesystem. It pulls interleaved
//! stereo PCM halfwords from a [`SampleSource`] and treats a short read as
//! the defined end-of-stream signal, exactly like the WAV reader it fronts.

/// Pull-based supplier of 16-bit PCM samples.
///
/// Implemented by the WAV track reader in the library crate and by test
/// fakes. The player calls [`read`](SampleSource::read) once per drained
/// buffer half, from task context only.
pub trait SampleSource {
    /// Error type. Errors are consumed by the player and treated as
    /// end-of-stream; they never cross the audio path.
    type Error: core::fmt::Debug;

    /// Fill `buffer` with up to `buffer.len()` halfwords of interleaved
    /// stereo PCM and return the count actually written.
    ///
    /// Returning less than `buffer.len()` signals end-of-stream: the caller
    /// will silence-fill the remainder and begin its stop sequence.
    fn read(&mut self, buffer: &mut [i16]) -> Result<usize, Self::Error>;
}

impl<S: SampleSource> SampleSource for &mut S {
    type Error = S::Error;

    fn read(&mut self, buffer: &mut [i16]) -> Result<usize, Self::Error> {
        (**self).read(buffer)
    }
}
