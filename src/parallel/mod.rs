//! Batch orchestration over the worker pool

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::thumb_dir;
use crate::error::{Result, GalleryError};
use crate::processing::ThumbnailWriter;

pub mod dispatcher;
pub mod progress;

pub use dispatcher::*;
pub use progress::*;

/// Lifecycle of a [`BatchDriver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    NotStarted,
    Running,
    Completed,
}

/// Runs one thumbnail batch for a source directory
pub struct BatchDriver {
    writer: ThumbnailWriter,
    dispatcher: WorkDispatcher,
    show_progress: bool,
    state: BatchState,
}

impl BatchDriver {
    /// Create a driver with one worker per logical CPU
    pub fn new(writer: ThumbnailWriter) -> Self {
        Self::with_dispatcher(writer, WorkDispatcher::with_available_parallelism())
    }

    pub fn with_dispatcher(writer: ThumbnailWriter, dispatcher: WorkDispatcher) -> Self {
        Self {
            writer,
            dispatcher,
            show_progress: false,
            state: BatchState::NotStarted,
        }
    }

    /// Draw a terminal progress bar while running
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Generate thumbnails for `images` (file names inside `source_dir`) into
    /// `source_dir/.thumb`.
    ///
    /// Per-image failures end up in [`BatchReport::failed`]. An output
    /// directory that cannot be created aborts the run before any image is
    /// touched.
    pub fn run(&mut self, source_dir: &Path, images: Vec<String>) -> Result<BatchReport> {
        if self.state != BatchState::NotStarted {
            return Err(GalleryError::parallel(format!(
                "Batch driver already used (state: {:?})",
                self.state
            )));
        }

        let start_time = Instant::now();
        let output_dir = thumb_dir(source_dir);
        ensure_output_dir(&output_dir)?;

        self.state = BatchState::Running;
        let total = images.len();
        info!("Generating thumbnails for {} images into {:?}", total, output_dir);

        let progress = if self.show_progress {
            ProgressTracker::with_progress_bar(total)
        } else {
            ProgressTracker::new(total)
        };

        let writer = &self.writer;
        let failed = self.dispatcher.run(images, &progress, |image| {
            writer
                .ensure_thumbnails_with(source_dir, &output_dir, image, |_| {
                    progress.record_artifacts(1)
                })
                .map(|_| ())
        });
        progress.finish();

        let failed = failed?;
        self.state = BatchState::Completed;

        let report = BatchReport {
            output_dir,
            total,
            artifacts_written: progress.snapshot().artifacts_written,
            failed,
            elapsed: start_time.elapsed(),
        };

        if report.failed.is_empty() {
            info!("Finished thumbnails in {:.2}s", report.elapsed.as_secs_f64());
        } else {
            warn!(
                "Finished thumbnails in {:.2}s, {} of {} images failed",
                report.elapsed.as_secs_f64(),
                report.failed.len(),
                total
            );
        }

        Ok(report)
    }
}

/// Create `path` if needed; an already existing directory is success.
///
/// Only the last component is created, so a missing parent is an error.
pub fn ensure_output_dir(path: &Path) -> Result<()> {
    match std::fs::create_dir(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(e) => Err(GalleryError::output_directory(path.to_path_buf(), e)),
    }
}

/// Outcome of a completed batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub output_dir: PathBuf,
    pub total: usize,
    pub artifacts_written: usize,
    pub failed: BTreeSet<String>,
    #[serde(serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.total - self.failed.len()
    }
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::decode_image;
    use image::{DynamicImage, RgbImage};
    use tempfile::TempDir;

    fn write_jpeg(path: &Path, width: u32, height: u32) {
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
            .save_with_format(path, image::ImageFormat::Jpeg)
            .unwrap();
    }

    fn thumb_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(thumb_dir(dir))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn driver(workers: usize) -> BatchDriver {
        BatchDriver::with_dispatcher(ThumbnailWriter::new(), WorkDispatcher::new(workers))
    }

    #[test]
    fn test_mixed_directory_scenario() {
        let dir = TempDir::new().unwrap();
        write_jpeg(&dir.path().join("a.jpg"), 300, 200);
        DynamicImage::new_rgb8(120, 90)
            .save_with_format(dir.path().join("b.png"), image::ImageFormat::Png)
            .unwrap();
        std::fs::write(dir.path().join("c.jpg"), "just text").unwrap();

        let mut driver = driver(4);
        assert_eq!(driver.state(), BatchState::NotStarted);

        let images = vec!["a.jpg".to_string(), "b.png".to_string(), "c.jpg".to_string()];
        let report = driver.run(dir.path(), images).unwrap();

        assert_eq!(driver.state(), BatchState::Completed);
        assert_eq!(report.failed.iter().collect::<Vec<_>>(), vec!["c.jpg"]);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.artifacts_written, 4);
        assert_eq!(
            thumb_files(dir.path()),
            vec![
                "a.jpg.big.thumb",
                "a.jpg.small.thumb",
                "b.png.big.thumb",
                "b.png.small.thumb",
            ]
        );

        let small = decode_image(&thumb_dir(dir.path()).join("a.jpg.small.thumb")).unwrap();
        assert_eq!((small.width(), small.height()), (300, 200));
        let big = decode_image(&thumb_dir(dir.path()).join("a.jpg.big.thumb")).unwrap();
        assert_eq!((big.width(), big.height()), (1200, 800));
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let images: Vec<String> = (0..4).map(|i| format!("p{}.jpg", i)).collect();
        for name in &images {
            write_jpeg(&dir.path().join(name), 40, 30);
        }

        let first = driver(2).run(dir.path(), images.clone()).unwrap();
        assert_eq!(first.artifacts_written, 8);
        let snapshot: Vec<Vec<u8>> = thumb_files(dir.path())
            .iter()
            .map(|name| std::fs::read(thumb_dir(dir.path()).join(name)).unwrap())
            .collect();

        let second = driver(2).run(dir.path(), images).unwrap();
        assert_eq!(second.artifacts_written, 0);
        assert!(second.failed.is_empty());

        let again: Vec<Vec<u8>> = thumb_files(dir.path())
            .iter()
            .map(|name| std::fs::read(thumb_dir(dir.path()).join(name)).unwrap())
            .collect();
        assert_eq!(snapshot, again);
    }

    #[test]
    fn test_single_corrupt_image_is_isolated() {
        let dir = TempDir::new().unwrap();
        let mut images = Vec::new();
        for i in 0..6 {
            let name = format!("ok{}.jpg", i);
            write_jpeg(&dir.path().join(&name), 32, 24);
            images.push(name);
        }
        std::fs::write(dir.path().join("broken.jpg"), [0xFF, 0xD8, 0xFF, 0x00]).unwrap();
        images.insert(3, "broken.jpg".to_string());

        let report = driver(3).run(dir.path(), images).unwrap();

        assert_eq!(report.failed.len(), 1);
        assert!(report.failed.contains("broken.jpg"));
        assert_eq!(thumb_files(dir.path()).len(), 12);
    }

    #[test]
    fn test_artifact_count_independent_of_scheduling() {
        let seed = fastrand::u64(..);
        let mut rng = fastrand::Rng::with_seed(seed);

        let dir = TempDir::new().unwrap();
        let mut images: Vec<String> = (0..12).map(|i| format!("m{}.jpg", i)).collect();
        for name in &images {
            write_jpeg(&dir.path().join(name), 16, 16);
        }

        for round in 0..16 {
            std::fs::remove_dir_all(thumb_dir(dir.path())).ok();
            rng.shuffle(&mut images);
            let workers = rng.usize(2..=8);

            let report = driver(workers).run(dir.path(), images.clone()).unwrap();

            let context = format!("seed {} round {} workers {}", seed, round, workers);
            assert!(report.failed.is_empty(), "{}", context);
            assert_eq!(report.artifacts_written, images.len() * 2, "{}", context);

            let mut expected: Vec<String> = images
                .iter()
                .flat_map(|name| [format!("{}.big.thumb", name), format!("{}.small.thumb", name)])
                .collect();
            expected.sort();
            assert_eq!(thumb_files(dir.path()), expected, "{}", context);
        }
    }

    #[test]
    fn test_partial_failure_counts_written_artifacts() {
        let dir = TempDir::new().unwrap();
        write_jpeg(&dir.path().join("a.jpg"), 30, 20);
        write_jpeg(&dir.path().join("b.jpg"), 30, 20);
        std::fs::create_dir(thumb_dir(dir.path())).unwrap();
        std::fs::create_dir(thumb_dir(dir.path()).join("a.jpg.big.thumb.partial")).unwrap();

        let images = vec!["a.jpg".to_string(), "b.jpg".to_string()];
        let report = driver(2).run(dir.path(), images).unwrap();

        assert_eq!(report.failed.iter().collect::<Vec<_>>(), vec!["a.jpg"]);
        assert_eq!(report.artifacts_written, 3);
        assert_eq!(
            thumb_files(dir.path()),
            vec![
                "a.jpg.big.thumb.partial",
                "a.jpg.small.thumb",
                "b.jpg.big.thumb",
                "b.jpg.small.thumb",
            ]
        );
    }

    #[test]
    fn test_zero_height_image_fails_alone() {
        let dir = TempDir::new().unwrap();
        let output_dir = thumb_dir(dir.path());
        ensure_output_dir(&output_dir).unwrap();
        for name in ["a.jpg", "b.jpg"] {
            write_jpeg(&dir.path().join(name), 30, 20);
        }

        let writer = ThumbnailWriter::new();
        let progress = ProgressTracker::new(3);
        let images = vec!["a.jpg".to_string(), "flat.jpg".to_string(), "b.jpg".to_string()];

        let failed = WorkDispatcher::new(2)
            .run(images, &progress, |image| {
                let count = |_: &crate::config::ThumbnailSpec| progress.record_artifacts(1);
                if image == "flat.jpg" {
                    let targets = writer.missing_artifacts(&output_dir, image);
                    let raster = DynamicImage::new_rgb8(10, 0);
                    writer
                        .write_renditions(&raster, &dir.path().join(image), targets, count)
                        .map(|_| ())
                } else {
                    writer
                        .ensure_thumbnails_with(dir.path(), &output_dir, image, count)
                        .map(|_| ())
                }
            })
            .unwrap();

        assert_eq!(failed.iter().collect::<Vec<_>>(), vec!["flat.jpg"]);
        assert_eq!(progress.snapshot().completed, 2);
        assert_eq!(progress.snapshot().artifacts_written, 4);
        assert_eq!(thumb_files(dir.path()).len(), 4);
    }

    #[test]
    fn test_unwritable_output_dir_is_fatal() {
        let dir = TempDir::new().unwrap();
        let not_a_dir = dir.path().join("file");
        std::fs::write(&not_a_dir, "x").unwrap();

        let mut driver = driver(2);
        let err = driver.run(&not_a_dir, vec!["a.jpg".to_string()]).unwrap_err();

        assert!(matches!(err, GalleryError::OutputDirectory { .. }));
        assert!(!err.is_recoverable());
        assert_eq!(driver.state(), BatchState::NotStarted);
    }

    #[test]
    fn test_missing_source_dir_is_fatal() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("typo");

        let err = driver(1).run(&missing, vec!["a.jpg".to_string()]).unwrap_err();

        assert!(matches!(err, GalleryError::OutputDirectory { .. }));
        assert!(!missing.exists());
    }

    #[test]
    fn test_existing_output_dir_accepted() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(thumb_dir(dir.path())).unwrap();

        assert!(ensure_output_dir(&thumb_dir(dir.path())).is_ok());
        let report = driver(1).run(dir.path(), Vec::new()).unwrap();
        assert_eq!(report.total, 0);
        assert!(report.failed.is_empty());
    }

    #[test]
    fn test_driver_runs_once() {
        let dir = TempDir::new().unwrap();
        let mut driver = driver(1);
        driver.run(dir.path(), Vec::new()).unwrap();

        assert!(matches!(
            driver.run(dir.path(), Vec::new()),
            Err(GalleryError::ParallelError { .. })
        ));
    }

    #[test]
    fn test_report_serializes() {
        let report = BatchReport {
            output_dir: PathBuf::from("/p/.thumb"),
            total: 3,
            artifacts_written: 4,
            failed: ["c.jpg".to_string()].into_iter().collect(),
            elapsed: Duration::from_millis(1500),
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["failed"][0], "c.jpg");
        assert_eq!(json["elapsed"], 1500);
        assert_eq!(report.succeeded(), 2);
    }
}
