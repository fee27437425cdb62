use anyhow::Context;
use clap::Parser;
use crunch_resize::config::toml_config::TomlConfig;
use crunch_resize::core::pipeline::plan_line;
use crunch_resize::core::ConfigProvider;
use crunch_resize::utils::{logger, validation::Validate};
use crunch_resize::{FilterResampler, ImagePipeline, LocalStorage, ResizeEngine};

#[derive(Parser)]
#[command(name = "toml-resize")]
#[command(about = "Texture resize batches driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "crunch-resize.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override output path from config
    #[arg(long)]
    output_path: Option<String>,

    /// Dry run - show target dimensions without writing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 先載入配置，才知道日誌格式
    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    logger::init_logger(args.verbose || config.verbose_logging(), config.json_logs());

    tracing::info!("🚀 Starting TOML-based resize batch");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(output_path) = args.output_path {
        tracing::info!("🔧 Output path overridden to: {}", output_path);
        config.output.path = output_path;
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        anyhow::bail!(e.user_friendly_message());
    }

    display_config_summary(&config);

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    let resampler = FilterResampler::new(config.resample_filter());
    let pipeline = ImagePipeline::new(LocalStorage::current_dir(), config, resampler);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be written");
        let plan = pipeline.plan().await.context("dry run failed")?;
        for item in &plan {
            println!("  {}", plan_line(item));
        }
        return Ok(());
    }

    let engine = ResizeEngine::new_with_monitoring(pipeline, monitor_enabled);
    let output = engine.run().await.context("resize batch failed")?;

    println!(
        "✅ {} of {} image(s) processed, {} failed",
        output.manifest.succeeded, output.manifest.total, output.manifest.failed
    );
    println!("📁 Output saved to: {}", output.output_path);

    if output.manifest.has_failures() {
        anyhow::bail!("{} image(s) failed, see manifest.json", output.manifest.failed);
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("📋 Batch Summary:");
    if let Ok(name) = config.batch_name() {
        tracing::info!("   Name: {}", name);
    }
    tracing::info!("   Inputs: {}", config.input_paths().join(", "));
    tracing::info!("   Filter: {:?}", config.resample_filter());
    tracing::info!("   Format: {:?}", config.output_format());
    if config.write_archive() {
        tracing::info!(
            "   Output: {}/{}",
            config.output_path(),
            config.archive_name()
        );
    } else {
        tracing::info!("   Output: {}/ (individual files)", config.output_path());
    }
}
