//! Content-based validation of candidate source files

use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::error::{Result, GalleryError, ErrorContext};
use crate::processing::formats::{detect_format_from_header, ImageFormat, SNIFF_LEN};

/// Classifies candidate files by their leading bytes; the extension is never consulted
pub struct ImageValidator {
    sniff_len: usize,
}

impl ImageValidator {
    /// Create a validator reading the default prefix length
    pub fn new() -> Self {
        Self { sniff_len: SNIFF_LEN }
    }

    /// Detect the format of `path` from its content
    pub fn sniff<P: AsRef<Path>>(&self, path: P) -> Result<ImageFormat> {
        let path = path.as_ref();

        let file = File::open(path).with_file_context(path.to_path_buf())?;
        let mut header = Vec::with_capacity(self.sniff_len);
        file.take(self.sniff_len as u64)
            .read_to_end(&mut header)
            .with_file_context(path.to_path_buf())?;

        detect_format_from_header(&header)
            .map_err(|mime| GalleryError::unsupported_format(mime, Some(path.to_path_buf())))
    }

    /// Whether `path` holds a supported image; unreadable files count as unsupported
    pub fn is_supported_image<P: AsRef<Path>>(&self, path: P) -> bool {
        let path = path.as_ref();
        match self.sniff(path) {
            Ok(format) => {
                debug!("Sniffed {:?} as {}", path, format.mime_type());
                true
            }
            Err(e) => {
                debug!("Skipping {:?}: {}", path, e);
                false
            }
        }
    }
}

impl Default for ImageValidator {
    fn default() -> Self {
        Self::new()
    }
}
