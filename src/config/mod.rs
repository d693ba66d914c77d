//! Configuration module

mod pipeline;

pub use pipeline::PipelineConfig;
