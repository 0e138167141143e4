//! Track bookkeeping for the now-playing view.

use heapless::String;

use crate::wav::{WavInfo, MAX_TAG_LEN};

/// Interleaved stereo at 48 kHz: two halfwords per sample instant.
const SAMPLES_PER_SECOND: usize = 2 * 48_000;

/// A playable track: tags plus a read cursor over its PCM stream.
///
/// The cursor is advanced by whoever feeds the playback ring, so the UI can
/// derive elapsed/total time without touching the file again.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Track {
    /// Track title.
    pub title: String<MAX_TAG_LEN>,
    /// Artist name.
    pub artist: String<MAX_TAG_LEN>,
    samples: usize,
    samples_read: usize,
}

impl Track {
    /// Wrap parsed header metadata with a fresh cursor.
    pub fn new(info: WavInfo) -> Self {
        Self {
            title: info.title,
            artist: info.artist,
            samples: info.samples,
            samples_read: 0,
        }
    }

    /// Record that `n` more samples have been read from the stream.
    /// The cursor never runs past the end of the track.
    pub fn advance(&mut self, n: usize) {
        self.samples_read = self.samples_read.saturating_add(n).min(self.samples);
    }

    /// Rewind the cursor (track restarted).
    pub fn rewind(&mut self) {
        self.samples_read = 0;
    }

    /// Total samples in the PCM stream (halfwords, both channels).
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Samples consumed so far.
    pub fn samples_read(&self) -> usize {
        self.samples_read
    }

    /// `true` once every sample has been read.
    pub fn is_finished(&self) -> bool {
        self.samples_read >= self.samples
    }

    /// Elapsed playing time, whole seconds.
    // Safety: divisor is a nonzero constant.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn progress_seconds(&self) -> usize {
        self.samples_read / SAMPLES_PER_SECOND
    }

    /// Total track length, whole seconds.
    // Safety: divisor is a nonzero constant.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn total_seconds(&self) -> usize {
        self.samples / SAMPLES_PER_SECOND
    }
}
