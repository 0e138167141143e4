//! Hardware abstraction seams for the WAV player / visualizer firmware.
//!
//! This crate defines the trait boundaries between the streaming/analysis
//! core and its collaborators, so the core is fully testable on the host.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate)
//!         ↓
//! Feature Layers (playback, spectrum, library)
//!         ↓
//! Platform seams (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (Embassy HAL + PAC)
//! ```
//!
//! # Seams
//!
//! - [`SampleSource`] - pull-based PCM sample supplier (storage side)
//! - [`SpectrumSink`] - consumer of computed magnitude bins (display side)
//! - [`AudioCodec`] - async codec control (volume, mute, start/stop)
//! - [`DmaChannel`] - DMA stream control with bounded enable/disable polling
//!
//! # Features
//!
//! - `std`: expose the mock implementations outside of `cfg(test)`
//! - `defmt`: enable defmt logging derives on platform types

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::must_use_candidate)] // hardware accessors — callers decide
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

pub mod audio;
pub mod display;
pub mod dma;
pub mod storage;

pub mod mocks;

// Re-export main high-level traits
pub use audio::{AudioCodec, AudioConfig};
pub use display::SpectrumSink;
pub use dma::{DmaChannel, DmaTimeout, DMA_POLL_BUDGET};
pub use storage::SampleSource;
