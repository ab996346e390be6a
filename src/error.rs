//! Error types and handling for thumbgallery

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for thumbgallery operations
pub type Result<T> = std::result::Result<T, GalleryError>;

/// Main error type for thumbgallery operations
#[derive(Debug, Error)]
pub enum GalleryError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Image decoding or encoding errors
    #[error("Image processing error: {0}")]
    ImageError(#[from] image::ImageError),

    /// File content is not a supported image
    #[error("Unsupported image format: {format} (file: {file:?})")]
    UnsupportedFormat {
        format: String,
        file: Option<PathBuf>,
    },

    /// Source raster cannot be scaled (zero width or height)
    #[error("Invalid image dimensions: {width}x{height} (file: {file:?})")]
    InvalidDimensions {
        width: u32,
        height: u32,
        file: Option<PathBuf>,
    },

    /// Thumbnail output directory is missing and cannot be created
    #[error("Cannot prepare output directory {path:?}: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A worker panicked while processing an image
    #[error("Worker panicked while processing {image}")]
    WorkerPanic { image: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Worker pool errors
    #[error("Parallel processing error: {message}")]
    ParallelError { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    SerdeError(String),
}

impl GalleryError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new unsupported format error
    pub fn unsupported_format<S: Into<String>>(format: S, file: Option<PathBuf>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
            file,
        }
    }

    /// Create a new invalid dimensions error
    pub fn invalid_dimensions(width: u32, height: u32, file: Option<PathBuf>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            file,
        }
    }

    /// Create a new output directory error
    pub fn output_directory(path: PathBuf, source: std::io::Error) -> Self {
        Self::OutputDirectory { path, source }
    }

    /// Create a new parallel processing error
    pub fn parallel<S: Into<String>>(message: S) -> Self {
        Self::ParallelError {
            message: message.into(),
        }
    }

    /// Check if this error is recoverable (the batch can continue)
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Scoped to a single image
            Self::IoError(_)
            | Self::ImageError(_)
            | Self::UnsupportedFormat { .. }
            | Self::InvalidDimensions { .. }
            | Self::WorkerPanic { .. } => true,

            // These stop the whole run
            Self::OutputDirectory { .. }
            | Self::ConfigError { .. }
            | Self::ParallelError { .. }
            | Self::SerdeError(_) => false,
        }
    }

    /// Get the associated file path if available
    pub fn file_path(&self) -> Option<&PathBuf> {
        match self {
            Self::UnsupportedFormat { file, .. } | Self::InvalidDimensions { file, .. } => {
                file.as_ref()
            }

            Self::OutputDirectory { path, .. } => Some(path),

            _ => None,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::IoError(e) => format!("File system error: {}", e),
            Self::ImageError(e) => format!("Image could not be decoded or encoded: {}", e),
            Self::UnsupportedFormat { format, .. } => {
                format!(
                    "Unsupported image format: {}. Supported formats: JPEG, PNG, GIF, WebP, TIFF, BMP",
                    format
                )
            }
            Self::InvalidDimensions { width, height, .. } => {
                format!("Image has unusable dimensions ({}x{})", width, height)
            }
            Self::OutputDirectory { path, .. } => {
                format!(
                    "Thumbnail directory {} does not exist and could not be created",
                    path.display()
                )
            }
            other => other.to_string(),
        }
    }
}

impl From<toml::de::Error> for GalleryError {
    fn from(err: toml::de::Error) -> Self {
        Self::SerdeError(format!("TOML parsing error: {}", err))
    }
}

impl From<serde_yaml::Error> for GalleryError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::SerdeError(format!("YAML parsing error: {}", err))
    }
}

/// Error context extension for adding file path information
pub trait ErrorContext<T> {
    /// Add file context to an error
    fn with_file_context(self, file: PathBuf) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<GalleryError>,
{
    fn with_file_context(self, file: PathBuf) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();

            match &mut error {
                GalleryError::UnsupportedFormat { file: ref mut f, .. }
                | GalleryError::InvalidDimensions { file: ref mut f, .. } => {
                    if f.is_none() {
                        *f = Some(file);
                    }
                }
                _ => {}
            }

            error
        })
    }
}
