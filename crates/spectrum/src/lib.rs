//! Batched direct-DFT spectrum analysis for the on-screen spectrogram.
//!
//! The analyzer deliberately uses a direct O(N²) DFT instead of an FFT: at
//! the small N used here (tens of bins) the twiddle-table walk is cheap,
//! deterministic, and free of the bit-reversal bookkeeping an FFT would
//! drag in. A full sample window is split into equal batches, each batch is
//! transformed on its own, and the per-bin results are averaged — bounding
//! the per-call cost while still observing the whole window.
//!
//! The computation is synchronous and runs in task context; it must finish
//! within one half-buffer playback period or audio will underrun. That is a
//! soft deadline owned by the caller's configuration, not enforced here.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
// Sample indices and bin counts are derived from const-generic geometry;
// f32 holds them exactly at the sizes involved.
#![allow(clippy::cast_precision_loss)]

pub mod analyzer;
pub mod twiddle;

pub use analyzer::{Channel, SpectrumAnalyzer, SpectrumError};
pub use twiddle::TwiddleTable;
