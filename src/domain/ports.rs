use crate::domain::model::{
    BatchOutput, Dimensions, ExtractResult, OutputFormat, ResampleFilter, TransformResult,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use image::DynamicImage;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn is_dir(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
    /// 列出目錄下的檔案（不遞迴），依路徑排序
    fn list_files(
        &self,
        dir: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_paths(&self) -> &[String];
    fn output_path(&self) -> &str;
    fn archive_name(&self) -> &str;
    fn write_archive(&self) -> bool;
    fn resample_filter(&self) -> ResampleFilter;
    fn output_format(&self) -> OutputFormat;
    fn jpeg_quality(&self) -> u8;
    fn concurrent_jobs(&self) -> usize;
}

pub trait Resampler: Send + Sync + 'static {
    fn resample(&self, image: &DynamicImage, target: Dimensions) -> Result<DynamicImage>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ExtractResult>;
    async fn transform(&self, extracted: ExtractResult) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<BatchOutput>;
}
