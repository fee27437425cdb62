use clap::Parser;
use crunch_resize::core::pipeline::plan_line;
use crunch_resize::core::{BatchOutput, ConfigProvider, ItemReport};
use crunch_resize::utils::error::ErrorSeverity;
use crunch_resize::utils::{logger, validation::Validate};
use crunch_resize::{CliConfig, FilterResampler, ImagePipeline, LocalStorage, ResizeEngine};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(config.verbose, config.json_logs);

    tracing::info!("Starting crunch-resize");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    let dry_run = config.dry_run;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 創建存儲和管道
    let storage = LocalStorage::current_dir();
    let resampler = FilterResampler::new(config.resample_filter());
    let pipeline = ImagePipeline::new(storage, config, resampler);

    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be written");
        match pipeline.plan().await {
            Ok(plan) => {
                print_plan(&plan);
                return Ok(());
            }
            Err(e) => exit_with_error(&e),
        }
    }

    let engine = ResizeEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output) => {
            print_summary(&output);
            if output.manifest.has_failures() {
                std::process::exit(2);
            }
        }
        Err(e) => exit_with_error(&e),
    }

    Ok(())
}

fn print_plan(plan: &[ItemReport]) {
    for item in plan {
        println!("  {}", plan_line(item));
    }
}

fn print_summary(output: &BatchOutput) {
    let manifest = &output.manifest;
    tracing::info!("✅ Resize batch completed");
    println!(
        "✅ {} of {} image(s) processed, {} failed",
        manifest.succeeded, manifest.total, manifest.failed
    );
    println!("📁 Output saved to: {}", output.output_path);

    for item in manifest.items.iter().filter(|i| i.status.is_failed()) {
        eprintln!("❌ {}: {:?}", item.name, item.status);
    }
}

fn exit_with_error(e: &crunch_resize::ResizeError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Resize failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
