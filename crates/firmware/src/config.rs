//! Compile-time configuration of the audio and analysis geometry.
//!
//! Everything here is a `const`; the asserts below make a bad combination
//! a build failure rather than a runtime surprise.

/// PCM stream rate the whole chain is clocked at.
pub const SAMPLE_RATE_HZ: u32 = 48_000;

/// Samples (i16 halfwords) per ring-buffer half handed to the DMA engine.
pub const HALF_BUFFER_SAMPLES: usize = 1024;

/// Total ring size: two halves, transmitted circularly.
pub const RING_SAMPLES: usize = 2 * HALF_BUFFER_SAMPLES;

/// Spectrogram bars shown on the display.
pub const MAGNITUDE_BINS: usize = 30;

/// DFT length. Only bins below the Nyquist line carry information, so the
/// transform is run at twice the bar count.
pub const DFT_N: usize = 2 * MAGNITUDE_BINS;

/// Only every n-th stereo frame enters the DFT. Trades bandwidth for CPU:
/// the effective analysis rate is 48 kHz / 8 = 6 kHz.
pub const UNDERSAMPLING: usize = 8;

/// Stereo samples held back per spectrum update. With the undersampling
/// above this is 20 ms of audio, split into [`DFT_PARTS`] averaged batches.
pub const WINDOW_SAMPLES: usize = 1920;

/// Halfwords one DFT batch consumes (stereo frames, undersampled).
pub const BATCH_SAMPLES: usize = 2 * DFT_N * UNDERSAMPLING;

/// Batches averaged per window.
pub const DFT_PARTS: usize = WINDOW_SAMPLES / BATCH_SAMPLES;

const _: () = assert!(RING_SAMPLES % 2 == 0, "ring must split into equal halves");
const _: () = assert!(
    DFT_N % 4 == 0,
    "sine lookup offsets the cosine table by a quarter period"
);
const _: () = assert!(
    WINDOW_SAMPLES % BATCH_SAMPLES == 0,
    "window must divide into whole DFT batches"
);
const _: () = assert!(DFT_PARTS >= 1, "window shorter than one DFT batch");
const _: () = assert!(
    MAGNITUDE_BINS * 2 == DFT_N,
    "one display bar per DFT bin below Nyquist"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_covers_whole_batches() {
        assert_eq!(WINDOW_SAMPLES, BATCH_SAMPLES * DFT_PARTS);
    }

    #[test]
    fn geometry_matches_the_analyzer() {
        let analyzer =
            spectrum::SpectrumAnalyzer::<DFT_N>::new(UNDERSAMPLING, spectrum::Channel::Left);
        assert_eq!(analyzer.batch_len(), BATCH_SAMPLES);
        assert_eq!(analyzer.bins(), MAGNITUDE_BINS);
    }
}
