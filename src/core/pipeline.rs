use crate::core::archive::{ArchiveBuilder, MANIFEST_NAME};
use crate::core::encode::is_supported_image;
use crate::core::dimension::target_dimensions;
use crate::core::processor::{probe_image, process_image, ProcessOptions};
use crate::core::{
    BatchManifest, BatchOutput, ConfigProvider, ExtractResult, ItemOutcome, ItemReport, Pipeline,
    Resampler, SourceImage, Storage, TransformResult,
};
use crate::utils::error::{ResizeError, Result};
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub struct ImagePipeline<S: Storage, C: ConfigProvider, R: Resampler> {
    storage: S,
    config: C,
    resampler: Arc<R>,
}

impl<S: Storage, C: ConfigProvider, R: Resampler> ImagePipeline<S, C, R> {
    pub fn new(storage: S, config: C, resampler: R) -> Self {
        Self {
            storage,
            config,
            resampler: Arc::new(resampler),
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    fn process_options(&self) -> ProcessOptions {
        ProcessOptions {
            output_format: self.config.output_format(),
            jpeg_quality: self.config.jpeg_quality(),
        }
    }

    fn output_file(&self, name: &str) -> String {
        join_path(self.config.output_path(), name)
    }

    /// 展開輸入路徑：目錄列出其中的圖片檔，單一檔案直接採用
    async fn collect_input_files(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();

        for input in self.config.input_paths() {
            if self.storage.is_dir(input).await {
                let entries = self.storage.list_files(input).await?;
                let before = files.len();
                files.extend(entries.into_iter().filter(|f| is_supported_image(f)));
                tracing::debug!("📂 {}: {} image(s)", input, files.len() - before);
            } else {
                files.push(input.clone());
            }
        }

        Ok(files)
    }

    /// 只讀檔頭計算目標尺寸，不解碼像素也不寫出任何檔案
    pub async fn plan(&self) -> Result<Vec<ItemReport>> {
        let extracted = self.extract().await?;
        let mut reports = extracted.failures;

        for source in extracted.sources {
            let mut report = ItemReport::pending(source.index, &source.name);
            match probe_image(&source.data, &source.path) {
                Ok((_, original)) => {
                    report.original = Some(original);
                    match target_dimensions(original) {
                        Ok(target) => report.target = Some(target),
                        Err(e) => report.fail(e.to_string()),
                    }
                }
                Err(e) => report.fail(e.to_string()),
            }
            reports.push(report);
        }

        reports.sort_by_key(|r| r.index);
        Ok(reports)
    }

    async fn load_archive(&self, result: TransformResult) -> Result<BatchOutput> {
        let TransformResult {
            processed,
            mut reports,
        } = result;
        let mut builder = ArchiveBuilder::new();

        tracing::debug!("Creating ZIP file with {} image(s)", processed.len());

        for image in processed {
            match builder.add_file(&image.entry_name, &image.data) {
                Ok(()) => {}
                Err(e @ ResizeError::DuplicateEntry { .. }) => {
                    tracing::warn!("⚠️ {}", e);
                    if let Some(report) = reports.iter_mut().find(|r| r.index == image.index) {
                        report.fail(e.to_string());
                    }
                }
                Err(e) => return Err(e),
            }
        }

        let manifest = BatchManifest::from_reports(reports);
        builder.add_json(MANIFEST_NAME, &manifest)?;
        let zip_data = builder.finish()?;

        let output_path = self.output_file(self.config.archive_name());
        tracing::debug!("Writing ZIP file ({} bytes) to {}", zip_data.len(), output_path);
        self.storage.write_file(&output_path, &zip_data).await?;

        Ok(BatchOutput {
            output_path,
            manifest,
        })
    }

    async fn load_directory(&self, result: TransformResult) -> Result<BatchOutput> {
        let TransformResult {
            processed,
            mut reports,
        } = result;
        let mut written = HashSet::new();

        for image in processed {
            let failure = if !written.insert(image.entry_name.clone()) {
                Some(
                    ResizeError::DuplicateEntry {
                        name: image.entry_name.clone(),
                    }
                    .to_string(),
                )
            } else {
                let path = self.output_file(&image.entry_name);
                self.storage
                    .write_file(&path, &image.data)
                    .await
                    .err()
                    .map(|e| e.to_string())
            };

            if let Some(reason) = failure {
                tracing::warn!("⚠️ {}: {}", image.entry_name, reason);
                if let Some(report) = reports.iter_mut().find(|r| r.index == image.index) {
                    report.fail(reason);
                }
            }
        }

        let manifest = BatchManifest::from_reports(reports);
        let json = serde_json::to_vec_pretty(&manifest)?;
        self.storage
            .write_file(&self.output_file(MANIFEST_NAME), &json)
            .await?;

        Ok(BatchOutput {
            output_path: self.config.output_path().to_string(),
            manifest,
        })
    }
}

/// 乾跑模式下每張圖片的一行摘要
pub fn plan_line(item: &ItemReport) -> String {
    match (item.original, item.target) {
        (Some(original), Some(target)) if original == target => {
            format!("{}: {} (unchanged)", item.name, original)
        }
        (Some(original), Some(target)) => format!("{}: {} -> {}", item.name, original, target),
        _ => format!("{}: {:?}", item.name, item.status),
    }
}

pub fn join_path(base: &str, name: &str) -> String {
    Path::new(base).join(name).to_string_lossy().into_owned()
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, R: Resampler> Pipeline for ImagePipeline<S, C, R> {
    async fn extract(&self) -> Result<ExtractResult> {
        let files = self.collect_input_files().await?;
        let mut extracted = ExtractResult::default();

        for (index, path) in files.into_iter().enumerate() {
            let name = file_name(&path);
            match self.storage.read_file(&path).await {
                Ok(data) => extracted.sources.push(SourceImage {
                    index,
                    name,
                    path,
                    data,
                }),
                Err(e) => {
                    tracing::warn!("⚠️ Cannot read {}: {}", path, e);
                    extracted
                        .failures
                        .push(ItemReport::failed(index, name, e.to_string()));
                }
            }
        }

        Ok(extracted)
    }

    async fn transform(&self, extracted: ExtractResult) -> Result<TransformResult> {
        let ExtractResult { sources, failures } = extracted;
        let options = self.process_options();
        let semaphore = Arc::new(Semaphore::new(self.config.concurrent_jobs().max(1)));
        let mut tasks = JoinSet::new();

        for source in sources {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| ResizeError::processing(format!("worker pool closed: {}", e)))?;
            let resampler = Arc::clone(&self.resampler);

            tasks.spawn_blocking(move || {
                let _permit = permit;
                // 單張圖片 panic 時轉成失敗報告，不影響其他圖片
                catch_unwind(AssertUnwindSafe(|| {
                    process_image(&source, resampler.as_ref(), &options)
                }))
                .unwrap_or_else(|_| ItemOutcome {
                    report: ItemReport::failed(
                        source.index,
                        &source.name,
                        "image processing panicked",
                    ),
                    image: None,
                })
            });
        }

        let mut processed = Vec::new();
        let mut reports = failures;

        while let Some(joined) = tasks.join_next().await {
            let outcome = joined
                .map_err(|e| ResizeError::processing(format!("worker task failed: {}", e)))?;
            reports.push(outcome.report);
            if let Some(image) = outcome.image {
                processed.push(image);
            }
        }

        reports.sort_by_key(|r| r.index);
        processed.sort_by_key(|p| p.index);

        Ok(TransformResult { processed, reports })
    }

    async fn load(&self, result: TransformResult) -> Result<BatchOutput> {
        let output = if self.config.write_archive() {
            self.load_archive(result).await?
        } else {
            self.load_directory(result).await?
        };

        tracing::debug!(
            "Saved {} of {} image(s) to {}",
            output.manifest.succeeded,
            output.manifest.total,
            output.output_path
        );

        Ok(output)
    }
}
