use chrono::{DateTime, Utc};
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// 一張待處理圖片的原始內容
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub index: usize,
    pub name: String,
    pub path: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemStatus {
    Pending,
    Resized,
    Unchanged,
    Failed { reason: String },
}

impl ItemStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Resized | Self::Unchanged)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemReport {
    pub index: usize,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original: Option<Dimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Dimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_name: Option<String>,
    #[serde(flatten)]
    pub status: ItemStatus,
}

impl ItemReport {
    pub fn pending(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            original: None,
            target: None,
            output_name: None,
            status: ItemStatus::Pending,
        }
    }

    pub fn failed(index: usize, name: impl Into<String>, reason: impl Into<String>) -> Self {
        let mut report = Self::pending(index, name);
        report.fail(reason);
        report
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        self.status = ItemStatus::Failed {
            reason: reason.into(),
        };
    }
}

#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub index: usize,
    pub entry_name: String,
    pub dimensions: Dimensions,
    pub data: Vec<u8>,
}

/// 單張圖片的處理結果：報告一定存在，成功時才有輸出
#[derive(Debug, Clone)]
pub struct ItemOutcome {
    pub report: ItemReport,
    pub image: Option<ProcessedImage>,
}

#[derive(Debug, Clone, Default)]
pub struct ExtractResult {
    pub sources: Vec<SourceImage>,
    pub failures: Vec<ItemReport>,
}

impl ExtractResult {
    pub fn total(&self) -> usize {
        self.sources.len() + self.failures.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub processed: Vec<ProcessedImage>,
    pub reports: Vec<ItemReport>,
}

impl TransformResult {
    pub fn failed_count(&self) -> usize {
        self.reports.iter().filter(|r| r.status.is_failed()).count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchManifest {
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub items: Vec<ItemReport>,
}

impl BatchManifest {
    pub fn from_reports(items: Vec<ItemReport>) -> Self {
        let succeeded = items.iter().filter(|r| r.status.is_success()).count();
        let failed = items.iter().filter(|r| r.status.is_failed()).count();
        Self {
            generated_at: Utc::now(),
            total: items.len(),
            succeeded,
            failed,
            items,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

#[derive(Debug, Clone)]
pub struct BatchOutput {
    pub output_path: String,
    pub manifest: BatchManifest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl ResampleFilter {
    pub fn filter_type(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// 沿用來源格式
    #[default]
    Original,
    Png,
    Jpeg,
}
