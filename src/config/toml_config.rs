use crate::config::{DEFAULT_ARCHIVE_NAME, DEFAULT_CONCURRENT_JOBS, DEFAULT_JPEG_QUALITY};
use crate::core::{ConfigProvider, OutputFormat, ResampleFilter};
use crate::utils::error::{ResizeError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub batch: BatchConfig,
    #[serde(default)]
    pub resize: ResizeConfig,
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    pub name: Option<String>,
    pub inputs: Vec<String>,
    pub concurrent_jobs: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResizeConfig {
    pub filter: Option<ResampleFilter>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub format: Option<OutputFormat>,
    pub jpeg_quality: Option<u8>,
    pub archive: Option<bool>,
    pub archive_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
    pub json_logs: Option<bool>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex is valid"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ResizeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${TEXTURE_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_paths("batch.inputs", &self.batch.inputs)?;
        validation::validate_path("output.path", &self.output.path)?;

        if let Some(jobs) = self.batch.concurrent_jobs {
            validation::validate_positive_number("batch.concurrent_jobs", jobs, 1)?;
        }

        if let Some(quality) = self.output.jpeg_quality {
            validation::validate_range("output.jpeg_quality", quality, 1, 100)?;
        }

        if self.write_archive() {
            if let Some(name) = &self.output.archive_name {
                validation::validate_file_name("output.archive_name", name)?;
                validation::validate_file_extensions(
                    "output.archive_name",
                    std::slice::from_ref(name),
                    &["zip"],
                )?;
            }
        }

        Ok(())
    }

    /// 取得批次名稱，未設定時回傳 MissingConfigError
    pub fn batch_name(&self) -> Result<&str> {
        validation::validate_required_field("batch.name", &self.batch.name).map(String::as_str)
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    /// `log_level = "debug"` 等同命令列的 --verbose
    pub fn verbose_logging(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_level.as_deref())
            .map(|level| level.eq_ignore_ascii_case("debug") || level.eq_ignore_ascii_case("trace"))
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_paths(&self) -> &[String] {
        &self.batch.inputs
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn archive_name(&self) -> &str {
        self.output
            .archive_name
            .as_deref()
            .unwrap_or(DEFAULT_ARCHIVE_NAME)
    }

    fn write_archive(&self) -> bool {
        self.output.archive.unwrap_or(true)
    }

    fn resample_filter(&self) -> ResampleFilter {
        self.resize.filter.unwrap_or_default()
    }

    fn output_format(&self) -> OutputFormat {
        self.output.format.unwrap_or_default()
    }

    fn jpeg_quality(&self) -> u8 {
        self.output.jpeg_quality.unwrap_or(DEFAULT_JPEG_QUALITY)
    }

    fn concurrent_jobs(&self) -> usize {
        self.batch.concurrent_jobs.unwrap_or(DEFAULT_CONCURRENT_JOBS)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
