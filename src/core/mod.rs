pub mod archive;
pub mod dimension;
pub mod encode;
pub mod engine;
pub mod pipeline;
pub mod processor;
pub mod resample;

pub use crate::domain::model::{
    BatchManifest, BatchOutput, Dimensions, ExtractResult, ItemOutcome, ItemReport, ItemStatus,
    OutputFormat, ProcessedImage, ResampleFilter, SourceImage, TransformResult,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Resampler, Storage};
pub use crate::utils::error::Result;
