//! Directory listing for the gallery: discovery, ordering and exclusion of failed images

use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Result, GalleryError};
use crate::processing::ImageValidator;

pub mod export;
pub use export::*;

/// List the image files directly inside `dir`, sorted for display.
///
/// Files are kept based on their content, whatever their extension.
/// Subdirectories (including the thumbnail directory) are skipped.
pub fn list_images(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Err(GalleryError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a directory", dir.display()),
        )));
    }

    let validator = ImageValidator::new();
    let mut images = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(GalleryError::IoError(e.into())),
            Err(e) => {
                warn!("Skipping unreadable entry in {:?}: {}", dir, e);
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            warn!("Skipping non UTF-8 file name {:?}", entry.file_name());
            continue;
        };

        if validator.is_supported_image(entry.path()) {
            images.push(name.to_string());
        }
    }

    sort_image_names(&mut images);
    debug!("Found {} images in {:?}", images.len(), dir);

    Ok(images)
}

/// Shorter names first, then byte-wise, so `img2` sorts before `img10`
pub fn sort_image_names(names: &mut [String]) {
    names.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
}

/// Drop every image that failed thumbnailing, keeping the original order
pub fn filter_out_failed(images: Vec<String>, failed: &BTreeSet<String>) -> Vec<String> {
    images
        .into_iter()
        .filter(|image| !failed.contains(image))
        .collect()
}
