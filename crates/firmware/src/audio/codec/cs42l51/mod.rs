//! Cirrus Logic CS42L51 stereo codec.

pub mod driver;
pub mod registers;

pub use driver::{Cs42l51Driver, Cs42l51Error};
