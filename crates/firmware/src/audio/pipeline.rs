//! Spectrum tap: holds back loaded sample chunks until a full analysis
//! window is available, then runs the DFT and pushes the result to the
//! display sink.
//!
//! The tap sits entirely in task context and reads the same chunks that go
//! into the playback ring; it never touches DMA-owned memory. One window
//! of results must be produced faster than the ring drains one half, but
//! that deadline is a quality-of-display concern, not a correctness one —
//! a late update only skips a frame.

use platform::SpectrumSink;
use spectrum::{SpectrumAnalyzer, SpectrumError};

/// Collects sample chunks until `W` halfwords are held back.
///
/// Chunks arrive in half-buffer units which rarely divide the window size
/// evenly; whatever does not fit into the current window is dropped and
/// the next window starts with the next chunk. For a visualization that
/// loss is invisible.
pub struct WindowAccumulator<const W: usize> {
    samples: [i16; W],
    len: usize,
}

impl<const W: usize> WindowAccumulator<W> {
    /// An empty window.
    pub const fn new() -> Self {
        Self {
            samples: [0; W],
            len: 0,
        }
    }

    /// Absorb as much of `chunk` as still fits. Returns `true` when the
    /// window just became full.
    pub fn push(&mut self, chunk: &[i16]) -> bool {
        if self.len >= W {
            return true;
        }
        let space = W.saturating_sub(self.len);
        let take = chunk.len().min(space);
        if let (Some(dst), Some(src)) = (
            self.samples.get_mut(self.len..self.len.saturating_add(take)),
            chunk.get(..take),
        ) {
            dst.copy_from_slice(src);
        }
        self.len = self.len.saturating_add(take);
        self.len >= W
    }

    /// The held-back window. Only meaningful once [`push`](Self::push)
    /// reported full.
    pub fn window(&self) -> &[i16; W] {
        &self.samples
    }

    /// Halfwords currently held.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` while nothing has been absorbed yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Discard the window and start collecting the next one.
    pub fn reset(&mut self) {
        self.len = 0;
    }
}

impl<const W: usize> Default for WindowAccumulator<W> {
    fn default() -> Self {
        Self::new()
    }
}

/// Why a pipeline step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineError<E> {
    /// The window geometry does not divide into whole DFT batches.
    Geometry,
    /// The display sink rejected the update.
    Sink(E),
}

impl<E> From<SpectrumError> for PipelineError<E> {
    fn from(_: SpectrumError) -> Self {
        PipelineError::Geometry
    }
}

/// Accumulator + analyzer + sink, wired together.
///
/// `N` is the DFT length (bins shown = `N / 2`), `W` the window size in
/// halfwords. Feed it every chunk that goes into the playback ring.
pub struct SpectrumPipeline<S, const N: usize, const W: usize> {
    analyzer: SpectrumAnalyzer<N>,
    window: WindowAccumulator<W>,
    sink: S,
    ceiling: u32,
}

impl<S: SpectrumSink, const N: usize, const W: usize> SpectrumPipeline<S, N, W> {
    /// Wire an analyzer to a sink. `ceiling` is the magnitude mapped to a
    /// full-height bar; larger magnitudes clip.
    pub fn new(analyzer: SpectrumAnalyzer<N>, sink: S, ceiling: u32) -> Self {
        Self {
            analyzer,
            window: WindowAccumulator::new(),
            sink,
            ceiling,
        }
    }

    /// Offer the next loaded chunk. Runs the transform and updates the
    /// sink whenever the chunk completes a window; returns `true` in that
    /// case.
    pub fn feed(&mut self, chunk: &[i16]) -> Result<bool, PipelineError<S::Error>> {
        if !self.window.push(chunk) {
            return Ok(false);
        }
        let mut magnitude = [0u32; N];
        let (bins, _) = magnitude.split_at_mut(N / 2);
        self.analyzer.transform(self.window.window(), bins)?;
        self.sink
            .set_spectrogram(bins, self.ceiling)
            .map_err(PipelineError::Sink)?;
        self.window.reset();
        Ok(true)
    }

    /// Drop any partial window (track change, stop).
    pub fn flush(&mut self) {
        self.window.reset();
    }

    /// Borrow the sink (test assertions, display handover).
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing
)]
mod tests {
    use platform::mocks::MockSink;
    use spectrum::{Channel, SpectrumAnalyzer};

    use super::*;

    const N: usize = 8;
    const W: usize = 256; // two batches of 2 * 8 * 8 halfwords

    fn pipeline() -> SpectrumPipeline<MockSink, N, W> {
        let analyzer = SpectrumAnalyzer::<N>::new(8, Channel::Left);
        assert_eq!(W % analyzer.batch_len(), 0);
        SpectrumPipeline::new(analyzer, MockSink::new(), 1000)
    }

    #[test]
    fn accumulator_reports_full_once_window_is_reached() {
        let mut acc = WindowAccumulator::<16>::new();
        assert!(!acc.push(&[1; 8]));
        assert_eq!(acc.len(), 8);
        assert!(acc.push(&[2; 8]));
        assert_eq!(acc.window(), &{
            let mut expected = [1i16; 16];
            expected[8..].fill(2);
            expected
        });
    }

    #[test]
    fn accumulator_drops_chunk_tail_past_the_window() {
        let mut acc = WindowAccumulator::<16>::new();
        assert!(acc.push(&[3; 24]));
        assert_eq!(acc.len(), 16);
        acc.reset();
        assert!(acc.is_empty());
    }

    #[test]
    fn no_update_until_a_window_is_complete() {
        let mut p = pipeline();
        assert!(!p.feed(&[0; W / 2]).expect("partial window"));
        assert_eq!(p.sink().updates, 0);
    }

    #[test]
    fn full_window_produces_one_update() {
        let mut p = pipeline();
        assert!(!p.feed(&[0; W / 2]).expect("first half"));
        assert!(p.feed(&[0; W / 2]).expect("second half"));

        let sink = p.sink();
        assert_eq!(sink.updates, 1);
        assert_eq!(sink.last_bins.len(), N / 2);
        assert!(sink.last_bins.iter().all(|&b| b == 0));
        assert_eq!(sink.last_max, 1000);
    }

    #[test]
    fn next_window_starts_after_an_update() {
        let mut p = pipeline();
        assert!(p.feed(&[0; W]).expect("whole window"));
        assert!(!p.feed(&[0; W / 2]).expect("fresh window"));
        assert!(p.feed(&[0; W / 2]).expect("completes again"));
        assert_eq!(p.sink().updates, 2);
    }

    #[test]
    fn flush_discards_the_partial_window() {
        let mut p = pipeline();
        assert!(!p.feed(&[0; W - 1]).expect("partial"));
        p.flush();
        assert!(!p.feed(&[0; W - 1]).expect("still one short"));
        assert_eq!(p.sink().updates, 0);
    }
}
