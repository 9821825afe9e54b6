//! End-to-end pipeline behavior with mocked removal capabilities
//!
//! Each test works in its own temporary directory and captures the status
//! lines the user would see on the console.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use remove_bg::{
    BackgroundRemover, BgRemovalError, ConsoleStatusReporter, ErrorKind, MockBackend, RemovalConfig,
    Result, SegmentationRemover,
};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Workspace {
    _dir: TempDir,
    input: PathBuf,
    output: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let images = dir.path().join("frontend").join("public").join("images");
        std::fs::create_dir_all(&images).unwrap();
        Self {
            input: images.join("profile.png"),
            output: images.join("profile_transparent.png"),
            _dir: dir,
        }
    }

    fn with_input(bytes: &[u8]) -> Self {
        let workspace = Self::new();
        std::fs::write(&workspace.input, bytes).unwrap();
        workspace
    }

    fn config(&self) -> RemovalConfig {
        RemovalConfig::builder()
            .input_path(&self.input)
            .output_path(&self.output)
            .build()
            .unwrap()
    }
}

fn run_with<F>(config: RemovalConfig, capability: F) -> (Result<()>, String)
where
    F: FnMut(&[u8]) -> Result<Vec<u8>>,
{
    let mut reporter = ConsoleStatusReporter::new(Vec::new());
    let result = BackgroundRemover::new(config, capability).run(&mut reporter);
    (result, String::from_utf8(reporter.into_inner()).unwrap())
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

#[test]
fn test_success_writes_capability_output() {
    let workspace = Workspace::with_input(b"input-image-bytes");
    let mocked = vec![0xAB; 42];
    let returned = mocked.clone();

    let (result, text) = run_with(workspace.config(), move |_: &[u8]| Ok(returned.clone()));

    assert!(result.is_ok());
    let written = std::fs::read(&workspace.output).unwrap();
    assert_eq!(written.len(), mocked.len());
    assert!(text.contains(&display(&workspace.output)));
    assert!(text.contains("✅ 완료!"));
}

#[test]
fn test_missing_input_writes_nothing() {
    let workspace = Workspace::new();

    let (result, text) = run_with(workspace.config(), |b: &[u8]| Ok(b.to_vec()));

    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileNotFound);
    assert!(!workspace.output.exists());
    assert!(text.contains("파일을 찾을 수 없습니다"));
    assert!(text.contains(&display(&workspace.input)));
    assert!(!text.contains("✅"));
}

#[test]
fn test_capability_failure_writes_nothing() {
    let workspace = Workspace::with_input(b"valid-looking-bytes");

    let (result, text) = run_with(workspace.config(), |_: &[u8]| {
        Err(BgRemovalError::inference("segmentation model rejected the image"))
    });

    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GenericFailure);
    assert!(!workspace.output.exists());
    assert!(text.contains("❌ 오류 발생:"));
    assert!(text.contains("segmentation model rejected the image"));

    // No stray temporary file either
    let siblings = std::fs::read_dir(workspace.input.parent().unwrap()).unwrap().count();
    assert_eq!(siblings, 1);
}

#[test]
fn test_failure_keeps_previous_output() {
    let workspace = Workspace::with_input(b"input");
    std::fs::write(&workspace.output, b"earlier result").unwrap();

    let (result, _) = run_with(workspace.config(), |_: &[u8]| Err(BgRemovalError::processing("boom")));

    assert!(result.is_err());
    assert_eq!(std::fs::read(&workspace.output).unwrap(), b"earlier result");
}

#[test]
fn test_write_failure_is_reported_as_generic_error() {
    let workspace = Workspace::with_input(b"input");
    std::fs::create_dir(&workspace.output).unwrap();

    let (result, text) = run_with(workspace.config(), |_: &[u8]| Ok(b"cut-out".to_vec()));

    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GenericFailure);
    assert!(text.contains("❌ 오류 발생:"));
    assert!(!text.contains("✅"));
    assert!(!text.contains("파일을 찾을 수 없습니다"));
    assert!(workspace.output.is_dir());
}

#[test]
fn test_rerun_is_byte_identical() {
    let workspace = Workspace::with_input(b"same input every time");
    let deterministic = |b: &[u8]| -> Result<Vec<u8>> { Ok(b.iter().map(|v| v ^ 0x5A).collect()) };

    run_with(workspace.config(), deterministic).0.unwrap();
    let first = std::fs::read(&workspace.output).unwrap();
    run_with(workspace.config(), deterministic).0.unwrap();
    let second = std::fs::read(&workspace.output).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_bytes_pass_through_unchanged() {
    let input_bytes: Vec<u8> = (0..=255).collect();
    let workspace = Workspace::with_input(&input_bytes);
    let mut seen = Vec::new();
    let returned = b"\x89PNG returned by capability".to_vec();

    {
        let returned = returned.clone();
        let (result, _) = run_with(workspace.config(), |b: &[u8]| {
            seen = b.to_vec();
            Ok(returned.clone())
        });
        result.unwrap();
    }

    assert_eq!(seen, input_bytes);
    assert_eq!(std::fs::read(&workspace.output).unwrap(), returned);
    assert_eq!(std::fs::read(&workspace.input).unwrap(), input_bytes);
}

#[test]
fn test_ten_byte_input_seven_byte_output_scenario() {
    let workspace = Workspace::with_input(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    let mock_output = vec![7u8, 6, 5, 4, 3, 2, 1];
    let returned = mock_output.clone();

    let (result, text) = run_with(workspace.config(), move |input: &[u8]| {
        assert_eq!(input.len(), 10);
        Ok(returned.clone())
    });
    result.unwrap();

    assert_eq!(std::fs::read(&workspace.output).unwrap(), mock_output);

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], format!("배경 제거 중: {}", display(&workspace.input)));
    assert_eq!(lines[1], format!("✅ 완료! 저장 위치: {}", display(&workspace.output)));
    assert_eq!(lines[2], "원본 파일을 교체하려면:");
    assert_eq!(
        lines[3],
        format!("  mv {} {}", display(&workspace.output), display(&workspace.input))
    );
}

#[test]
fn test_output_directory_is_created() {
    let workspace = Workspace::with_input(b"abc");
    let nested = workspace.input.parent().unwrap().join("cutouts").join("profile.png");
    let config = RemovalConfig::builder()
        .input_path(&workspace.input)
        .output_path(&nested)
        .build()
        .unwrap();

    run_with(config, |b: &[u8]| Ok(b.to_vec())).0.unwrap();
    assert_eq!(std::fs::read(&nested).unwrap(), b"abc");
}

#[test]
fn test_segmentation_remover_end_to_end() {
    let image = RgbImage::from_fn(48, 32, |x, y| {
        if (12..36).contains(&x) && (8..24).contains(&y) {
            Rgb([250, 250, 250])
        } else {
            Rgb([5, 5, 5])
        }
    });
    let mut png = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .unwrap();
    let workspace = Workspace::with_input(&png);

    let mut reporter = ConsoleStatusReporter::new(Vec::new());
    let capability = SegmentationRemover::new(MockBackend::new().with_target_size(64));
    BackgroundRemover::new(workspace.config(), capability)
        .run(&mut reporter)
        .unwrap();

    let cutout = image::open(&workspace.output).unwrap().to_rgba8();
    assert_eq!(cutout.dimensions(), (48, 32));
    assert_eq!(cutout.get_pixel(24, 16)[3], 255);
    assert_eq!(cutout.get_pixel(0, 0)[3], 0);
}

#[cfg(all(feature = "tract", feature = "download"))]
#[test]
fn test_empty_model_dir_triggers_download_on_first_use() {
    use remove_bg::{ModelDownloader, ModelFetcher, ModelLocation, ModelSource, TractBackend};
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingFetcher(Rc<Cell<usize>>);

    impl ModelFetcher for CountingFetcher {
        fn fetch(&mut self, _url: &str, dest: &mut dyn std::io::Write) -> Result<u64> {
            self.0.set(self.0.get() + 1);
            dest.write_all(b"placeholder model")?;
            Ok(17)
        }
    }

    let mut png = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::new(8, 8))
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .unwrap();
    let workspace = Workspace::with_input(&png);
    let model_home = TempDir::new().unwrap();
    let location = ModelLocation::from_path(model_home.path().join("u2net.onnx"));

    let fetches = Rc::new(Cell::new(0));
    let downloader = ModelDownloader::new(
        ModelSource::new("https://models.test/u2net.onnx"),
        CountingFetcher(Rc::clone(&fetches)),
    );
    let backend = TractBackend::new(location.clone()).with_downloader(downloader);
    let capability = SegmentationRemover::new(backend);

    let mut reporter = ConsoleStatusReporter::new(Vec::new());
    let result = BackgroundRemover::new(workspace.config(), capability).run(&mut reporter);

    // The placeholder is not a real graph, so loading still fails, but only
    // after the missing model was fetched into the model directory.
    assert!(result.is_err());
    assert_eq!(fetches.get(), 1);
    assert_eq!(std::fs::read(location.path()).unwrap(), b"placeholder model");
    assert!(!workspace.output.exists());
}
