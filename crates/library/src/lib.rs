//! Track metadata — WAV header parsing and playback-progress bookkeeping.
//!
//! The parser reads headers through `embedded_io::Read` so it is storage
//! agnostic; nothing in this crate touches a filesystem or the audio path.
#![cfg_attr(not(test), no_std)]

pub mod track;
pub mod wav;

pub use track::Track;
pub use wav::{WavError, WavInfo, MAX_TAG_LEN};
