use crunch_resize::core::{
    ConfigProvider, Dimensions, ItemStatus, OutputFormat, ResampleFilter, Resampler,
};
use crunch_resize::domain::model::BatchManifest;
use crunch_resize::{
    FilterResampler, ImagePipeline, LocalStorage, ResizeEngine, ResizeError, Result,
};
use image::{DynamicImage, ImageFormat};
use std::io::{Cursor, Read};
use std::path::Path;
use tempfile::TempDir;

struct TestConfig {
    inputs: Vec<String>,
    output_path: String,
    write_archive: bool,
    output_format: OutputFormat,
}

impl TestConfig {
    fn new(inputs: Vec<String>, output_path: &Path) -> Self {
        Self {
            inputs,
            output_path: output_path.to_string_lossy().into_owned(),
            write_archive: true,
            output_format: OutputFormat::Original,
        }
    }
}

impl ConfigProvider for TestConfig {
    fn input_paths(&self) -> &[String] {
        &self.inputs
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn archive_name(&self) -> &str {
        "textures.zip"
    }

    fn write_archive(&self) -> bool {
        self.write_archive
    }

    fn resample_filter(&self) -> ResampleFilter {
        ResampleFilter::Lanczos3
    }

    fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    fn jpeg_quality(&self) -> u8 {
        90
    }

    fn concurrent_jobs(&self) -> usize {
        4
    }
}

/// Fails every image whose source size matches `fail_on`.
struct InjectedFailure {
    fail_on: Dimensions,
}

impl Resampler for InjectedFailure {
    fn resample(&self, image: &DynamicImage, target: Dimensions) -> Result<DynamicImage> {
        if Dimensions::new(image.width(), image.height()) == self.fail_on {
            return Err(ResizeError::processing("injected resampler failure"));
        }
        FilterResampler::default().resample(image, target)
    }
}

fn write_image(dir: &Path, name: &str, width: u32, height: u32, format: ImageFormat) -> String {
    let path = dir.join(name);
    DynamicImage::new_rgb8(width, height)
        .save_with_format(&path, format)
        .unwrap();
    path.to_string_lossy().into_owned()
}

fn open_archive(path: &str) -> zip::ZipArchive<Cursor<Vec<u8>>> {
    let data = std::fs::read(path).unwrap();
    zip::ZipArchive::new(Cursor::new(data)).unwrap()
}

fn read_entry(archive: &mut zip::ZipArchive<Cursor<Vec<u8>>>, name: &str) -> Vec<u8> {
    let mut data = Vec::new();
    archive.by_name(name).unwrap().read_to_end(&mut data).unwrap();
    data
}

#[tokio::test]
async fn test_end_to_end_batch_with_injected_failure() {
    let input_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();

    let big = write_image(input_dir.path(), "big.png", 33, 35, ImageFormat::Png);
    let small = write_image(input_dir.path(), "small.png", 2, 2, ImageFormat::Png);

    let config = TestConfig::new(vec![big, small], output_dir.path());
    let resampler = InjectedFailure {
        fail_on: Dimensions::new(33, 35),
    };
    let pipeline = ImagePipeline::new(LocalStorage::current_dir(), config, resampler);
    let engine = ResizeEngine::new(pipeline);

    let output = engine.run().await.unwrap();

    let manifest = &output.manifest;
    assert_eq!(manifest.total, 2);
    assert_eq!(manifest.succeeded, 1);
    assert_eq!(manifest.failed, 1);

    assert_eq!(manifest.items[0].name, "big.png");
    assert_eq!(manifest.items[0].target, Some(Dimensions::new(32, 36)));
    assert!(manifest.items[0].status.is_failed());

    assert_eq!(manifest.items[1].name, "small.png");
    assert_eq!(manifest.items[1].target, Some(Dimensions::new(2, 2)));
    assert_eq!(manifest.items[1].status, ItemStatus::Unchanged);

    let mut archive = open_archive(&output.output_path);
    let mut names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["manifest.json", "small.png"]);

    let small_out = image::load_from_memory(&read_entry(&mut archive, "small.png")).unwrap();
    assert_eq!((small_out.width(), small_out.height()), (2, 2));

    let stored: BatchManifest =
        serde_json::from_slice(&read_entry(&mut archive, "manifest.json")).unwrap();
    assert_eq!(stored.failed, 1);
    assert_eq!(stored.items[0].name, "big.png");
}

#[tokio::test]
async fn test_end_to_end_directory_input() {
    let input_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();

    write_image(input_dir.path(), "a.png", 33, 35, ImageFormat::Png);
    write_image(input_dir.path(), "b.bmp", 130, 7, ImageFormat::Bmp);
    std::fs::write(input_dir.path().join("notes.txt"), b"not an image").unwrap();

    let config = TestConfig::new(
        vec![input_dir.path().to_string_lossy().into_owned()],
        output_dir.path(),
    );
    let pipeline = ImagePipeline::new(
        LocalStorage::current_dir(),
        config,
        FilterResampler::default(),
    );
    let engine = ResizeEngine::new(pipeline);

    let output = engine.run().await.unwrap();

    assert_eq!(output.manifest.total, 2);
    assert!(!output.manifest.has_failures());
    assert!(output_dir.path().join("textures.zip").exists());

    let mut archive = open_archive(&output.output_path);
    let a = image::load_from_memory(&read_entry(&mut archive, "a.png")).unwrap();
    assert_eq!((a.width(), a.height()), (32, 36));
    let b = image::load_from_memory(&read_entry(&mut archive, "b.bmp")).unwrap();
    assert_eq!((b.width(), b.height()), (128, 8));
}

#[tokio::test]
async fn test_end_to_end_individual_files_with_format_change() {
    let input_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();

    let photo = write_image(input_dir.path(), "photo.png", 101, 66, ImageFormat::Png);
    let missing = input_dir
        .path()
        .join("missing.png")
        .to_string_lossy()
        .into_owned();

    let mut config = TestConfig::new(vec![photo, missing], output_dir.path());
    config.write_archive = false;
    config.output_format = OutputFormat::Jpeg;
    let pipeline = ImagePipeline::new(
        LocalStorage::current_dir(),
        config,
        FilterResampler::default(),
    );

    let output = ResizeEngine::new(pipeline).run().await.unwrap();

    assert_eq!(output.manifest.succeeded, 1);
    assert_eq!(output.manifest.failed, 1);
    assert_eq!(output.manifest.items[1].name, "missing.png");

    let jpeg = std::fs::read(output_dir.path().join("photo.jpg")).unwrap();
    let decoded = image::load_from_memory(&jpeg).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (100, 64));
    assert!(output_dir.path().join("manifest.json").exists());
    assert!(!output_dir.path().join("textures.zip").exists());
}

#[tokio::test]
async fn test_empty_directory_is_an_error() {
    let input_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();

    let config = TestConfig::new(
        vec![input_dir.path().to_string_lossy().into_owned()],
        output_dir.path(),
    );
    let pipeline = ImagePipeline::new(
        LocalStorage::current_dir(),
        config,
        FilterResampler::default(),
    );

    let err = ResizeEngine::new(pipeline).run().await.unwrap_err();

    assert!(matches!(err, ResizeError::ProcessingError { .. }));
    assert!(!output_dir.path().join("textures.zip").exists());
}

#[tokio::test]
async fn test_end_to_end_tga_textures_in_directory() {
    let input_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();

    write_image(input_dir.path(), "grass.tga", 33, 35, ImageFormat::Tga);
    write_image(input_dir.path(), "rock.tga", 16, 16, ImageFormat::Tga);

    let config = TestConfig::new(
        vec![input_dir.path().to_string_lossy().into_owned()],
        output_dir.path(),
    );
    let pipeline = ImagePipeline::new(
        LocalStorage::current_dir(),
        config,
        FilterResampler::default(),
    );

    let output = ResizeEngine::new(pipeline).run().await.unwrap();

    assert_eq!(output.manifest.total, 2);
    assert!(!output.manifest.has_failures());
    assert_eq!(output.manifest.items[0].status, ItemStatus::Resized);
    assert_eq!(output.manifest.items[1].status, ItemStatus::Unchanged);

    let mut archive = open_archive(&output.output_path);
    let grass = image::load_from_memory_with_format(
        &read_entry(&mut archive, "grass.tga"),
        ImageFormat::Tga,
    )
    .unwrap();
    assert_eq!((grass.width(), grass.height()), (32, 36));
}
