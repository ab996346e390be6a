//! Idempotent thumbnail generation for a single source image

use std::path::{Path, PathBuf};
use image::DynamicImage;
use tracing::{debug, warn};

use crate::config::{ThumbnailConfig, ThumbnailSpec, THUMBNAIL_SPECS};
use crate::error::{Result, ErrorContext};
use crate::processing::{decode_image, encode_jpeg, ImageResizer};

/// Produces every thumbnail rendition of a source image, skipping the ones already on disk
#[derive(Debug, Clone)]
pub struct ThumbnailWriter {
    resizer: ImageResizer,
    quality: u8,
    specs: &'static [ThumbnailSpec],
}

impl ThumbnailWriter {
    /// Create a writer with the default filter and quality
    pub fn new() -> Self {
        Self::from_config(&ThumbnailConfig::default())
    }

    pub fn from_config(config: &ThumbnailConfig) -> Self {
        Self {
            resizer: ImageResizer::with_filter(config.filter),
            quality: config.quality,
            specs: &THUMBNAIL_SPECS,
        }
    }

    pub fn specs(&self) -> &'static [ThumbnailSpec] {
        self.specs
    }

    /// Make sure every rendition of `image_name` exists in `output_dir`.
    ///
    /// Returns how many artifacts were written; zero means everything was
    /// already present and the source was not even opened.
    pub fn ensure_thumbnails(
        &self,
        source_dir: &Path,
        output_dir: &Path,
        image_name: &str,
    ) -> Result<usize> {
        self.ensure_thumbnails_with(source_dir, output_dir, image_name, |_| {})
    }

    /// Like [`ThumbnailWriter::ensure_thumbnails`], calling `on_written` for
    /// every artifact as soon as it lands on disk.
    ///
    /// The source is decoded at most once. A failing rendition does not stop
    /// the others, but the first error is returned; artifacts written before
    /// or after it have still been reported through `on_written`.
    pub fn ensure_thumbnails_with<F>(
        &self,
        source_dir: &Path,
        output_dir: &Path,
        image_name: &str,
        on_written: F,
    ) -> Result<usize>
    where
        F: FnMut(&ThumbnailSpec),
    {
        let missing = self.missing_artifacts(output_dir, image_name);

        if missing.is_empty() {
            debug!("Thumbnails for {} already exist", image_name);
            return Ok(0);
        }

        let source_path = source_dir.join(image_name);
        let image = decode_image(&source_path)?;

        self.write_renditions(&image, &source_path, missing, on_written)
    }

    pub(crate) fn missing_artifacts(
        &self,
        output_dir: &Path,
        image_name: &str,
    ) -> Vec<(ThumbnailSpec, PathBuf)> {
        self.specs
            .iter()
            .map(|spec| (*spec, spec.artifact_path(output_dir, image_name)))
            .filter(|(_, path)| !path.exists())
            .collect()
    }

    /// Resize and encode an already decoded source into each of `targets`
    pub(crate) fn write_renditions<F>(
        &self,
        image: &DynamicImage,
        source_path: &Path,
        targets: Vec<(ThumbnailSpec, PathBuf)>,
        mut on_written: F,
    ) -> Result<usize>
    where
        F: FnMut(&ThumbnailSpec),
    {
        let mut written = 0;
        let mut first_error = None;

        for (spec, path) in targets {
            let result = self
                .resizer
                .resize_to_height(image, spec.height)
                .and_then(|thumb| encode_jpeg(&thumb, &path, self.quality))
                .with_file_context(source_path.to_path_buf());

            match result {
                Ok(()) => {
                    written += 1;
                    on_written(&spec);
                }
                Err(e) => {
                    warn!("Failed to write {} thumbnail for {:?}: {}", spec.suffix, source_path, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(written),
        }
    }
}

impl Default for ThumbnailWriter {
    fn default() -> Self {
        Self::new()
    }
}
