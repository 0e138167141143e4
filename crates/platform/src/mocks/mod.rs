//! Mock implementations for testing
//!
//! Fakes for every platform seam so the playback and spectrum cores can be
//! exercised on the host. Available in unit tests and, for dependent
//! crates' integration tests, behind the `std` feature.

#![cfg(any(test, feature = "std"))]
#![allow(clippy::arithmetic_side_effects)] // test fixture bookkeeping

use core::cell::Cell;

use crate::dma::DmaChannel;
use crate::storage::SampleSource;
use crate::SpectrumSink;

/// Error type of [`MockSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockSourceError;

/// A scripted [`SampleSource`].
///
/// Supplies `fill`-valued samples until `remaining` is exhausted, then
/// returns short (and eventually zero-length) reads like a real file tail.
pub struct MockSource {
    remaining: usize,
    fill: i16,
    reads: usize,
    fail_on_read: Option<usize>,
}

impl MockSource {
    /// A source holding exactly `total_samples` halfwords.
    pub fn new(total_samples: usize) -> Self {
        Self {
            remaining: total_samples,
            fill: 0,
            reads: 0,
            fail_on_read: None,
        }
    }

    /// A source that always satisfies the full request.
    pub fn endless() -> Self {
        Self::new(usize::MAX)
    }

    /// Use `value` instead of silence for supplied samples.
    #[must_use]
    pub fn with_fill(mut self, value: i16) -> Self {
        self.fill = value;
        self
    }

    /// Return `Err` on the `n`-th call to `read` (0-based).
    #[must_use]
    pub fn failing_on_read(mut self, n: usize) -> Self {
        self.fail_on_read = Some(n);
        self
    }

    /// Number of `read` calls made so far.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl SampleSource for MockSource {
    type Error = MockSourceError;

    fn read(&mut self, buffer: &mut [i16]) -> Result<usize, Self::Error> {
        let call = self.reads;
        self.reads += 1;
        if self.fail_on_read == Some(call) {
            return Err(MockSourceError);
        }
        let n = buffer.len().min(self.remaining);
        for slot in buffer.iter_mut().take(n) {
            *slot = self.fill;
        }
        self.remaining -= n;
        Ok(n)
    }
}

/// A [`SpectrumSink`] that records what it was handed.
#[derive(Default)]
pub struct MockSink {
    /// Most recently received magnitude vector.
    pub last_bins: heapless::Vec<u32, 64>,
    /// Most recently received normalization ceiling.
    pub last_max: u32,
    /// Number of `set_spectrogram` calls.
    pub updates: usize,
}

impl MockSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpectrumSink for MockSink {
    type Error = core::convert::Infallible;

    fn set_spectrogram(&mut self, bins: &[u32], max_value: u32) -> Result<(), Self::Error> {
        self.last_bins.clear();
        for &bin in bins.iter().take(self.last_bins.capacity()) {
            // capacity checked by the take() above
            let _ = self.last_bins.push(bin);
        }
        self.last_max = max_value;
        self.updates += 1;
        Ok(())
    }
}

/// A [`DmaChannel`] that acknowledges requests after a fixed poll latency.
pub struct MockDmaChannel {
    enabled: Cell<bool>,
    pending: Cell<Option<(bool, usize)>>,
    latency: usize,
    stuck: bool,
}

impl MockDmaChannel {
    /// Channel that acknowledges after `latency` status polls.
    pub fn new(latency: usize) -> Self {
        Self {
            enabled: Cell::new(false),
            pending: Cell::new(None),
            latency,
            stuck: false,
        }
    }

    /// Channel that never acknowledges any request.
    pub fn stuck() -> Self {
        Self {
            stuck: true,
            ..Self::new(0)
        }
    }
}

impl DmaChannel for MockDmaChannel {
    fn request_enable(&mut self) {
        if !self.stuck {
            self.pending.set(Some((true, self.latency)));
        }
    }

    fn request_disable(&mut self) {
        if !self.stuck {
            self.pending.set(Some((false, self.latency)));
        }
    }

    fn is_enabled(&self) -> bool {
        if let Some((target, left)) = self.pending.get() {
            if left == 0 {
                self.enabled.set(target);
                self.pending.set(None);
            } else {
                self.pending.set(Some((target, left - 1)));
            }
        }
        self.enabled.get()
    }
}
