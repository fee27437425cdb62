use crate::core::dimension::target_dimensions;
use crate::core::encode::{encode_image, output_entry_name, resolve_format};
use crate::domain::model::{
    Dimensions, ItemOutcome, ItemReport, ItemStatus, OutputFormat, ProcessedImage, SourceImage,
};
use crate::domain::ports::Resampler;
use crate::utils::error::{ResizeError, Result};
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, ImageFormat, ImageReader};
use std::io::Cursor;

#[derive(Debug, Clone, Copy)]
pub struct ProcessOptions {
    pub output_format: OutputFormat,
    pub jpeg_quality: u8,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Original,
            jpeg_quality: 90,
        }
    }
}

/// 只讀取檔頭，取得格式與原始尺寸。
///
/// 先看檔頭的 magic bytes；TGA 之類沒有 magic bytes 的格式改用副檔名判斷。
pub fn probe_image(data: &[u8], path: &str) -> Result<(ImageFormat, Dimensions)> {
    let mut reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    let format = match reader.format() {
        Some(format) => format,
        None => {
            let format = ImageFormat::from_path(path)
                .map_err(|_| ResizeError::processing("unrecognized image format"))?;
            reader.set_format(format);
            format
        }
    };
    let (width, height) = reader.into_dimensions()?;
    Ok((format, Dimensions::new(width, height)))
}

/// GIF 是否含有多個影格
pub(crate) fn is_animated_gif(data: &[u8]) -> bool {
    GifDecoder::new(Cursor::new(data))
        .map(|decoder| decoder.into_frames().take(2).count() > 1)
        .unwrap_or(false)
}

/// 處理單張圖片：解碼、計算目標尺寸、重新取樣、編碼。
///
/// 任何一步失敗都只會反映在這張圖的報告上，不會中斷整個批次。
pub fn process_image<R: Resampler + ?Sized>(
    source: &SourceImage,
    resampler: &R,
    options: &ProcessOptions,
) -> ItemOutcome {
    let mut report = ItemReport::pending(source.index, &source.name);

    match process_inner(source, resampler, options, &mut report) {
        Ok(image) => {
            tracing::debug!(
                "{}: {} -> {} ({:?})",
                source.name,
                report
                    .original
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                image.dimensions,
                report.status
            );
            ItemOutcome {
                report,
                image: Some(image),
            }
        }
        Err(e) => {
            tracing::warn!("⚠️ {} failed: {}", source.name, e);
            report.fail(e.to_string());
            ItemOutcome {
                report,
                image: None,
            }
        }
    }
}

fn process_inner<R: Resampler + ?Sized>(
    source: &SourceImage,
    resampler: &R,
    options: &ProcessOptions,
    report: &mut ItemReport,
) -> Result<ProcessedImage> {
    let (source_format, original) = probe_image(&source.data, &source.path)?;
    report.original = Some(original);

    let target = target_dimensions(original)?;
    report.target = Some(target);

    let output_format = resolve_format(source_format, options.output_format);
    let entry_name = output_entry_name(&source.name, source_format, output_format);

    // 檔頭正確但像素資料損壞的檔案，要在這裡就失敗
    let decoded = image::load_from_memory_with_format(&source.data, source_format)?;

    // 尺寸與格式都不變時直接沿用原始位元組，避免重新編碼造成失真
    let (data, status) = if target == original && output_format == source_format {
        (source.data.clone(), ItemStatus::Unchanged)
    } else {
        if source_format == ImageFormat::Gif && is_animated_gif(&source.data) {
            tracing::warn!(
                "⚠️ {}: animated GIF, only the first frame is kept",
                source.name
            );
        }
        let resampled = resampler.resample(&decoded, target)?;
        let encoded = encode_image(&resampled, output_format, options.jpeg_quality)?;
        (encoded, ItemStatus::Resized)
    };

    report.output_name = Some(entry_name.clone());
    report.status = status;

    Ok(ProcessedImage {
        index: source.index,
        entry_name,
        dimensions: target,
        data,
    })
}
