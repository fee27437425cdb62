use crate::domain::model::OutputFormat;
use crate::utils::error::{ResizeError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;

/// 目錄掃描時視為圖片的副檔名
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "tif", "tiff", "webp", "tga",
];

pub fn is_supported_image(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// 決定輸出使用的實際格式
pub fn resolve_format(source: ImageFormat, requested: OutputFormat) -> ImageFormat {
    match requested {
        OutputFormat::Original => source,
        OutputFormat::Png => ImageFormat::Png,
        OutputFormat::Jpeg => ImageFormat::Jpeg,
    }
}

/// 格式不變時沿用原檔名，否則換成新格式的副檔名
pub fn output_entry_name(name: &str, source: ImageFormat, output: ImageFormat) -> String {
    if source == output {
        return name.to_string();
    }

    let extension = output.extensions_str().first().copied().unwrap_or("bin");
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name);
    format!("{}.{}", stem, extension)
}

pub fn encode_image(img: &DynamicImage, format: ImageFormat, jpeg_quality: u8) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());

    match format {
        ImageFormat::Jpeg => {
            // JPEG 不支援 alpha
            let encoder = JpegEncoder::new_with_quality(&mut buf, jpeg_quality);
            img.to_rgb8().write_with_encoder(encoder)?;
        }
        ImageFormat::Gif | ImageFormat::WebP => {
            DynamicImage::ImageRgba8(img.to_rgba8()).write_to(&mut buf, format)?;
        }
        ImageFormat::Png
        | ImageFormat::Bmp
        | ImageFormat::Tiff
        | ImageFormat::Tga => {
            img.write_to(&mut buf, format)?;
        }
        other => {
            return Err(ResizeError::processing(format!(
                "no encoder available for {:?}",
                other
            )));
        }
    }

    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image("textures/button.PNG"));
        assert!(is_supported_image("photo.jpeg"));
        assert!(!is_supported_image("notes.txt"));
        assert!(!is_supported_image("Makefile"));
    }

    #[test]
    fn test_resolve_format() {
        assert_eq!(
            resolve_format(ImageFormat::Bmp, OutputFormat::Original),
            ImageFormat::Bmp
        );
        assert_eq!(
            resolve_format(ImageFormat::Bmp, OutputFormat::Png),
            ImageFormat::Png
        );
    }

    #[test]
    fn test_output_entry_name() {
        assert_eq!(
            output_entry_name("icon.png", ImageFormat::Png, ImageFormat::Png),
            "icon.png"
        );
        assert_eq!(
            output_entry_name("icon.png", ImageFormat::Png, ImageFormat::Jpeg),
            "icon.jpg"
        );
        assert_eq!(
            output_entry_name("atlas.v2.bmp", ImageFormat::Bmp, ImageFormat::Png),
            "atlas.v2.png"
        );
    }

    #[test]
    fn test_encode_png() {
        let img = DynamicImage::new_rgba8(8, 4);
        let data = encode_image(&img, ImageFormat::Png, 90).unwrap();
        // PNG 檔頭
        assert_eq!(&data[0..8], &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_encode_jpeg_drops_alpha() {
        let img = DynamicImage::new_rgba8(8, 8);
        let data = encode_image(&img, ImageFormat::Jpeg, 85).unwrap();
        assert_eq!(&data[0..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(&data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 8));
    }

    #[test]
    fn test_encode_webp_from_luma() {
        let img = DynamicImage::new_luma8(4, 4);
        let data = encode_image(&img, ImageFormat::WebP, 90).unwrap();
        assert_eq!(&data[0..4], b"RIFF");
    }
}
