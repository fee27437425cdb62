pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use self::core::{
    dimension::{round_to_texture_dimension, target_dimensions},
    engine::ResizeEngine,
    pipeline::ImagePipeline,
    resample::FilterResampler,
};
pub use utils::error::{ResizeError, Result};
