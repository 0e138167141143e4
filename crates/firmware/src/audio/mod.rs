//! Audio path: codec control, half-buffer feeding and the spectrum tap.

pub mod codec;
pub mod pipeline;
pub mod source;

pub use pipeline::{PipelineError, SpectrumPipeline, WindowAccumulator};
pub use source::WavSource;
