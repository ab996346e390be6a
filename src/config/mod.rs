//! Configuration management for thumbgallery

use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::{Result, GalleryError};
use crate::processing::resize::FilterType;

pub mod specs;
pub use specs::*;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Thumbnail encoding settings
    pub thumbnails: ThumbnailConfig,

    /// Static gallery export settings
    pub gallery: GalleryConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Thumbnail encoding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    /// JPEG quality (1-100)
    pub quality: u8,

    /// Interpolation filter used when scaling
    pub filter: FilterType,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            quality: 75,
            filter: FilterType::Lanczos3,
        }
    }
}

/// Static gallery export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Page title written into the exported index
    pub title: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            title: "Gallery".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON logging
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .map_err(|e| GalleryError::config(
                format!("Failed to read config file {:?}: {}", path.as_ref(), e)
            ))?;

        let extension = path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        let config: Config = match extension.to_lowercase().as_str() {
            "toml" => toml::from_str(&content)?,
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            _ => return Err(GalleryError::config(
                "Unsupported config file format. Use .toml or .yaml"
            )),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.thumbnails.quality == 0 || self.thumbnails.quality > 100 {
            return Err(GalleryError::config(format!(
                "Thumbnail quality must be between 1 and 100, got {}",
                self.thumbnails.quality
            )));
        }

        if self.logging.level.trim().is_empty() {
            return Err(GalleryError::config("Log level must not be empty"));
        }

        Ok(())
    }
}
