//! Audio codec drivers.
//!
//! Concrete drivers behind the [`platform::AudioCodec`] seam:
//! - `cs42l51` — Cirrus Logic CS42L51 over async I²C
//! - `mock` — in-process recorder for host tests

#![allow(async_fn_in_trait)]

pub mod cs42l51;
pub mod mock;

pub use cs42l51::Cs42l51Driver;
pub use mock::MockCodec;
