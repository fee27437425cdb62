use crate::core::{BatchOutput, Pipeline};
use crate::utils::error::{ResizeError, Result};
use crate::utils::monitor::SystemMonitor;

pub struct ResizeEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> ResizeEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<BatchOutput> {
        tracing::info!("🚀 Starting resize batch...");
        self.monitor.log_phase("Start", 0);

        // Extract
        tracing::info!("📥 Reading images...");
        let extracted = self.pipeline.extract().await?;
        if extracted.total() == 0 {
            return Err(ResizeError::processing("no images found in the given inputs"));
        }
        tracing::info!(
            "Read {} image(s), {} unreadable",
            extracted.sources.len(),
            extracted.failures.len()
        );
        self.monitor.log_phase("Extract", extracted.sources.len());

        // Transform
        tracing::info!("🔧 Resizing to texture dimensions...");
        let transformed = self.pipeline.transform(extracted).await?;
        tracing::info!(
            "Processed {} image(s), {} failed",
            transformed.processed.len(),
            transformed.failed_count()
        );
        self.monitor.log_phase("Transform", transformed.processed.len());

        // Load
        tracing::info!("💾 Writing output...");
        let output = self.pipeline.load(transformed).await?;
        tracing::info!("Output saved to: {}", output.output_path);
        self.monitor.log_phase("Load", output.manifest.succeeded);

        if output.manifest.has_failures() {
            for item in output.manifest.items.iter().filter(|i| i.status.is_failed()) {
                tracing::warn!("⚠️ {} was not included: {:?}", item.name, item.status);
            }
        }

        self.monitor.log_final_stats(output.manifest.total);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        BatchManifest, Dimensions, ExtractResult, ItemReport, ItemStatus, ProcessedImage,
        SourceImage, TransformResult,
    };

    struct StubPipeline {
        sources: usize,
    }

    #[async_trait::async_trait]
    impl Pipeline for StubPipeline {
        async fn extract(&self) -> Result<ExtractResult> {
            let sources = (0..self.sources)
                .map(|index| SourceImage {
                    index,
                    name: format!("{}.png", index),
                    path: format!("in/{}.png", index),
                    data: vec![],
                })
                .collect();
            Ok(ExtractResult {
                sources,
                failures: vec![],
            })
        }

        async fn transform(&self, extracted: ExtractResult) -> Result<TransformResult> {
            let mut result = TransformResult::default();
            for source in extracted.sources {
                let mut report = ItemReport::pending(source.index, &source.name);
                if source.index == 0 {
                    report.fail("stub failure");
                } else {
                    report.status = ItemStatus::Resized;
                    result.processed.push(ProcessedImage {
                        index: source.index,
                        entry_name: source.name,
                        dimensions: Dimensions::new(4, 4),
                        data: vec![],
                    });
                }
                result.reports.push(report);
            }
            Ok(result)
        }

        async fn load(&self, result: TransformResult) -> Result<BatchOutput> {
            Ok(BatchOutput {
                output_path: "out/textures.zip".to_string(),
                manifest: BatchManifest::from_reports(result.reports),
            })
        }
    }

    #[tokio::test]
    async fn test_run_reports_partial_failure_without_error() {
        let engine = ResizeEngine::new(StubPipeline { sources: 3 });

        let output = engine.run().await.unwrap();

        assert_eq!(output.output_path, "out/textures.zip");
        assert_eq!(output.manifest.total, 3);
        assert_eq!(output.manifest.succeeded, 2);
        assert_eq!(output.manifest.failed, 1);
    }

    #[tokio::test]
    async fn test_run_rejects_empty_batch() {
        let engine = ResizeEngine::new_with_monitoring(StubPipeline { sources: 0 }, false);

        let err = engine.run().await.unwrap_err();

        assert!(matches!(err, ResizeError::ProcessingError { .. }));
    }
}
