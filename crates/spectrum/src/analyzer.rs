//! Batch DFT and window-level spectrum aggregation.

use crate::twiddle::TwiddleTable;

/// Largest power value a magnitude bin can carry before clamping.
const MAGNITUDE_CEILING: f32 = u32::MAX as f32;

/// Which channel of the interleaved stereo stream feeds the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Even halfwords (offset 0).
    Left,
    /// Odd halfwords (offset 1).
    Right,
}

impl Channel {
    #[inline]
    const fn offset(self) -> usize {
        match self {
            Channel::Left => 0,
            Channel::Right => 1,
        }
    }
}

/// Errors reported by [`SpectrumAnalyzer::transform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpectrumError {
    /// The window does not split into a whole, nonzero number of batches.
    ///
    /// Firmware configuration guarantees this statically; the check exists
    /// because this crate cannot see its caller's constants.
    WindowGeometry,
}

/// Direct-DFT spectrum analyzer producing `N / 2` magnitude bins.
///
/// `N` is the DFT length (twice the number of output bins). A window is
/// partitioned into equal batches of [`batch_len`](Self::batch_len)
/// halfwords; each batch is transformed independently and the per-bin
/// results are averaged with truncating integer division.
///
/// Undersampling reads only every `undersampling`-th stereo frame, letting
/// the fixed small `N` cover a wider time window at the cost of a lower
/// effective Nyquist frequency.
pub struct SpectrumAnalyzer<const N: usize> {
    twiddle: TwiddleTable<N>,
    undersampling: usize,
    channel: Channel,
}

impl<const N: usize> SpectrumAnalyzer<N> {
    /// Build the analyzer, computing the twiddle table once.
    ///
    /// `undersampling` must be at least 1; a value of 0 is treated as 1.
    pub fn new(undersampling: usize, channel: Channel) -> Self {
        Self {
            twiddle: TwiddleTable::new(),
            undersampling: undersampling.max(1),
            channel,
        }
    }

    /// Number of output magnitude bins (bin 0 = DC).
    pub const fn bins(&self) -> usize {
        N / 2
    }

    /// Halfwords consumed by one batch: `2 * N * undersampling`
    /// (N undersampled stereo frames).
    #[allow(clippy::arithmetic_side_effects)] // Safety: compile-time geometry, tiny values
    pub const fn batch_len(&self) -> usize {
        2 * N * self.undersampling
    }

    /// Transform one batch of interleaved stereo samples into `N / 2`
    /// magnitude-squared bins.
    ///
    /// The caller guarantees `samples.len() >= batch_len()` and
    /// `magnitude.len() == N / 2` (debug-asserted). Magnitudes are clamped
    /// to `u32::MAX`; the conversion never wraps.
    ///
    /// The inner loop walks the full twiddle period `n in 0..N` even though
    /// only half the bins are produced — a real-valued input has a
    /// symmetric spectrum, so the upper half would be redundant.
    #[allow(clippy::indexing_slicing)] // Safety: n < N, idx < 2*N*undersampling <= samples.len()
    #[allow(clippy::arithmetic_side_effects)] // Safety: index arithmetic bounded by batch geometry
    pub fn transform_batch(&self, samples: &[i16], magnitude: &mut [u32]) {
        debug_assert!(samples.len() >= self.batch_len());
        debug_assert_eq!(magnitude.len(), N / 2);
        for (k, out) in magnitude.iter_mut().enumerate() {
            let mut xre = 0.0f32;
            let mut xim = 0.0f32;
            let mut a = 0;
            let mut b = TwiddleTable::<N>::SIN_OFFSET;
            for n in 0..N {
                let s = f32::from(samples[self.channel.offset() + 2 * n * self.undersampling]);
                xre += s * self.twiddle.at(a);
                xim -= s * self.twiddle.at(b);
                a += k;
                b += k;
            }
            let power = xre * xre + xim * xim;
            // Clamp before narrowing so an over-range power saturates
            // instead of wrapping.
            *out = if power >= MAGNITUDE_CEILING {
                u32::MAX
            } else {
                power as u32
            };
        }
    }

    /// Transform a full sample window: split into batches, transform each,
    /// average per bin.
    ///
    /// `magnitude.len()` must equal `N / 2`. The per-bin accumulator is
    /// 64-bit, so the sum of clamped 32-bit batch results cannot overflow;
    /// the average truncates toward zero like the integer division it is.
    ///
    /// # Errors
    ///
    /// [`SpectrumError::WindowGeometry`] if the window is empty or not a
    /// whole multiple of [`batch_len`](Self::batch_len).
    #[allow(clippy::indexing_slicing)] // Safety: bins() == N/2 <= N bounds all scratch access
    #[allow(clippy::arithmetic_side_effects)] // Safety: parts >= 1 checked; u64 accumulator cannot overflow
    #[allow(clippy::cast_possible_truncation)] // Safety: average of u32 terms fits u32
    pub fn transform(&self, window: &[i16], magnitude: &mut [u32]) -> Result<(), SpectrumError> {
        debug_assert_eq!(magnitude.len(), N / 2);
        let batch = self.batch_len();
        if window.is_empty() || window.len() % batch != 0 {
            return Err(SpectrumError::WindowGeometry);
        }
        let parts = (window.len() / batch) as u64;

        // Scratch sized by the const param; only the first N/2 slots carry
        // bins, the rest stay zero.
        let mut acc = [0u64; N];
        let mut part = [0u32; N];
        for chunk in window.chunks_exact(batch) {
            self.transform_batch(chunk, &mut part[..N / 2]);
            for (slot, &p) in acc.iter_mut().zip(part.iter().take(N / 2)) {
                *slot += u64::from(p);
            }
        }
        for (out, &sum) in magnitude.iter_mut().zip(acc.iter()) {
            *out = (sum / parts) as u32;
        }
        Ok(())
    }
}
