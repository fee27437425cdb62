pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::{ConfigProvider, OutputFormat, ResampleFilter};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_ARCHIVE_NAME: &str = "resized_images.zip";
pub const DEFAULT_JPEG_QUALITY: u8 = 90;
pub const DEFAULT_CONCURRENT_JOBS: usize = 4;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "crunch-resize")]
#[command(about = "Resize images to crunch-compatible (multiple of 4) dimensions and bundle them")]
pub struct CliConfig {
    /// Image files or directories to process
    #[arg(required = true, num_args = 1..)]
    pub inputs: Vec<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_ARCHIVE_NAME)]
    pub archive_name: String,

    /// Write individual files instead of a single ZIP archive
    #[arg(long)]
    pub no_archive: bool,

    #[arg(long, value_enum, default_value_t = ResampleFilter::Lanczos3)]
    pub filter: ResampleFilter,

    #[arg(long, value_enum, default_value_t = OutputFormat::Original)]
    pub format: OutputFormat,

    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY)]
    pub jpeg_quality: u8,

    #[arg(long, default_value_t = DEFAULT_CONCURRENT_JOBS)]
    pub concurrent_jobs: usize,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Only print target dimensions, write nothing")]
    pub dry_run: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_paths(&self) -> &[String] {
        &self.inputs
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn archive_name(&self) -> &str {
        &self.archive_name
    }

    fn write_archive(&self) -> bool {
        !self.no_archive
    }

    fn resample_filter(&self) -> ResampleFilter {
        self.filter
    }

    fn output_format(&self) -> OutputFormat {
        self.format
    }

    fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    fn concurrent_jobs(&self) -> usize {
        self.concurrent_jobs
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_paths("inputs", &self.inputs)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_positive_number("concurrent_jobs", self.concurrent_jobs, 1)?;
        validation::validate_range("jpeg_quality", self.jpeg_quality, 1, 100)?;

        if !self.no_archive {
            validation::validate_file_name("archive_name", &self.archive_name)?;
            validation::validate_file_extensions(
                "archive_name",
                std::slice::from_ref(&self.archive_name),
                &["zip"],
            )?;
        }

        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let config = CliConfig::parse_from(["crunch-resize", "textures/"]);

        assert_eq!(config.inputs, vec!["textures/"]);
        assert_eq!(config.output_path, "./output");
        assert_eq!(config.archive_name, DEFAULT_ARCHIVE_NAME);
        assert!(config.write_archive());
        assert_eq!(config.resample_filter(), ResampleFilter::Lanczos3);
        assert_eq!(config.output_format(), OutputFormat::Original);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_overrides() {
        let config = CliConfig::parse_from([
            "crunch-resize",
            "a.png",
            "b.png",
            "--no-archive",
            "--filter",
            "catmull-rom",
            "--format",
            "jpeg",
            "--jpeg-quality",
            "75",
            "--concurrent-jobs",
            "8",
        ]);

        assert_eq!(config.inputs.len(), 2);
        assert!(!config.write_archive());
        assert_eq!(config.filter, ResampleFilter::CatmullRom);
        assert_eq!(config.format, OutputFormat::Jpeg);
        assert_eq!(config.jpeg_quality(), 75);
        assert_eq!(config.concurrent_jobs(), 8);
    }

    #[test]
    fn test_inputs_are_required() {
        assert!(CliConfig::try_parse_from(["crunch-resize"]).is_err());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = CliConfig::parse_from(["crunch-resize", "a.png"]);
        config.jpeg_quality = 0;
        assert!(config.validate().is_err());

        let mut config = CliConfig::parse_from(["crunch-resize", "a.png"]);
        config.archive_name = "out.tar".to_string();
        assert!(config.validate().is_err());

        // 不寫壓縮檔時不檢查壓縮檔名
        config.no_archive = true;
        assert!(config.validate().is_ok());
    }
}
