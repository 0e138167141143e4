//! Precomputed cosine twiddle factors — the N-th roots of unity.

use core::f32::consts::TAU;

/// Cosine samples of one full turn of the unit circle.
///
/// `factors[n] = cos(TAU * n / N)`. Sine values are read from the same
/// table with a quarter-cycle offset ([`TwiddleTable::SIN_OFFSET`]), which
/// saves a second table and a separate `sinf` call.
///
/// The table is computed once at construction and read-only afterwards.
pub struct TwiddleTable<const N: usize> {
    factors: [f32; N],
}

impl<const N: usize> TwiddleTable<N> {
    /// Index offset that turns a cosine lookup into a sine lookup.
    ///
    /// `cos(x + 3/4 turn) = sin(x)`, so `factors[(i + 3N/4) % N]` is
    /// `sin(TAU * i / N)` read forward as the DFT walks the circle.
    /// Requires `N % 4 == 0`.
    pub const SIN_OFFSET: usize = 3 * N / 4;

    /// Fill the table.
    pub fn new() -> Self {
        let mut factors = [0.0f32; N];
        for (n, f) in factors.iter_mut().enumerate() {
            *f = libm::cosf(TAU * n as f32 / N as f32);
        }
        Self { factors }
    }

    /// Look up a factor, wrapping the index around the table period.
    #[inline]
    #[allow(clippy::indexing_slicing)] // Safety: index % N < N == factors.len()
    #[allow(clippy::arithmetic_side_effects)] // Safety: wrap via % N; N > 0 for any real table
    pub fn at(&self, index: usize) -> f32 {
        self.factors[index % N]
    }

    /// Number of entries (the full DFT length).
    pub const fn len(&self) -> usize {
        N
    }

    /// `true` for the degenerate zero-length table.
    pub const fn is_empty(&self) -> bool {
        N == 0
    }
}

impl<const N: usize> Default for TwiddleTable<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const N: usize = 60;

    #[test]
    fn starts_at_unity() {
        let t: TwiddleTable<N> = TwiddleTable::new();
        assert_eq!(t.at(0), 1.0);
    }

    #[test]
    fn half_turn_is_minus_one() {
        let t: TwiddleTable<N> = TwiddleTable::new();
        assert!((t.at(N / 2) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn indexing_is_periodic() {
        let t: TwiddleTable<N> = TwiddleTable::new();
        for n in 0..N {
            assert_eq!(t.at(n), t.at(n + N));
            assert_eq!(t.at(n), t.at(n + 7 * N));
        }
    }

    #[test]
    fn sin_offset_turns_cosine_into_sine() {
        let t: TwiddleTable<N> = TwiddleTable::new();
        // sin(quarter turn) == 1 via the offset trick: 3N/4 + N/4 wraps to 0
        let quarter = N / 4;
        assert!((t.at(TwiddleTable::<N>::SIN_OFFSET + quarter) - 1.0).abs() < 1e-6);
        // sin of a small positive angle is positive
        assert!(t.at(TwiddleTable::<N>::SIN_OFFSET + 1) > 0.0);
    }
}
