//! WaveGauge firmware
//!
//! Music player and spectrum visualizer for the STM32F407: WAV tracks are
//! streamed from storage into a circular DMA ring feeding the CS42L51
//! codec over I²S, while a tap on the loaded samples runs a batched DFT
//! and renders a live bar spectrogram.
//!
//! # Architecture
//!
//! ```text
//! Application Layer (main.rs)
//!         ↓
//! Pipeline Glue (audio, display modules)
//!         ↓
//! Domain Crates (playback, spectrum, library)
//!         ↓
//! Platform Seams (platform traits, Embassy, STM32)
//! ```
//!
//! # Features
//!
//! - `hardware` — Build for the STM32F407 target (embassy, defmt-rtt)
//! - `std` — Enable the standard library (host tests)
//!
//! ```bash
//! cargo build --release --target thumbv7em-none-eabihf --features hardware
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![deny(clippy::await_holding_lock)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::dbg_macro)]
// Pedantic lints too noisy for firmware application code:
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod audio;
pub mod config;
pub mod display;

pub use audio::{PipelineError, SpectrumPipeline, WindowAccumulator};
pub use display::SpectrogramView;
