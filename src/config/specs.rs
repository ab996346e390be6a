//! Fixed thumbnail renditions and their on-disk naming

use std::path::{Path, PathBuf};

/// Name of the thumbnail directory created inside the source directory
pub const THUMB_DIR_NAME: &str = ".thumb";

/// Extension shared by every thumbnail artifact
pub const THUMB_EXTENSION: &str = "thumb";

/// One derivative rendition: a target height and the filename suffix it is stored under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailSpec {
    pub height: u32,
    pub suffix: &'static str,
}

/// Grid thumbnail
pub const SMALL: ThumbnailSpec = ThumbnailSpec {
    height: 200,
    suffix: "small",
};

/// Preview thumbnail
pub const BIG: ThumbnailSpec = ThumbnailSpec {
    height: 800,
    suffix: "big",
};

/// Every rendition produced for each source image
pub const THUMBNAIL_SPECS: [ThumbnailSpec; 2] = [SMALL, BIG];

impl ThumbnailSpec {
    /// File name of this rendition for `image_name`, e.g. `a.jpg.small.thumb`
    pub fn artifact_name(&self, image_name: &str) -> String {
        format!("{}.{}.{}", image_name, self.suffix, THUMB_EXTENSION)
    }

    /// Deterministic artifact path inside `output_dir`
    pub fn artifact_path(&self, output_dir: &Path, image_name: &str) -> PathBuf {
        output_dir.join(self.artifact_name(image_name))
    }
}

/// Thumbnail directory for a source directory
pub fn thumb_dir(source_dir: &Path) -> PathBuf {
    source_dir.join(THUMB_DIR_NAME)
}
