//! Image format detection from file content

use serde::{Deserialize, Serialize};

/// Number of leading bytes inspected when sniffing a file
pub const SNIFF_LEN: usize = 512;

/// Source image formats accepted by the gallery
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    WebP,
    Gif,
    Tiff,
    Bmp,
}

impl ImageFormat {
    /// Map a sniffed MIME type onto a supported format
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::WebP),
            "image/gif" => Some(Self::Gif),
            "image/tiff" => Some(Self::Tiff),
            "image/bmp" => Some(Self::Bmp),
            _ => None,
        }
    }

    /// Get MIME type for this format
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
            Self::Gif => "image/gif",
            Self::Tiff => "image/tiff",
            Self::Bmp => "image/bmp",
        }
    }
}

/// Detect a supported image format from the leading bytes of a file.
///
/// Returns the sniffed MIME type as the error value when the content is
/// recognised but not a supported image, or `"unknown"` when nothing matches.
pub fn detect_format_from_header(data: &[u8]) -> std::result::Result<ImageFormat, &'static str> {
    match infer::get(data) {
        Some(kind) => ImageFormat::from_mime_type(kind.mime_type()).ok_or(kind.mime_type()),
        None => Err("unknown"),
    }
}
