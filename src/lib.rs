//! thumbgallery - thumbnails and a static page for a directory of photos
//!
//! Scans a directory for images (classified by content, not extension),
//! renders two JPEG thumbnails per image on a fixed pool of worker threads and
//! reports the images that could not be processed, so they can be left out of
//! the gallery listing.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use thumbgallery::{gallery, BatchDriver, ThumbnailWriter};
//!
//! let dir = Path::new("photos");
//! let images = gallery::list_images(dir)?;
//!
//! let mut driver = BatchDriver::new(ThumbnailWriter::new());
//! let report = driver.run(dir, images.clone())?;
//!
//! let visible = gallery::filter_out_failed(images, &report.failed);
//! println!("{} images ready, {} failed", visible.len(), report.failed.len());
//! # Ok::<(), thumbgallery::GalleryError>(())
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod gallery;
pub mod parallel;
pub mod processing;

pub use config::{Config, LoggingConfig, ThumbnailSpec, THUMBNAIL_SPECS};
pub use error::{Result, GalleryError};
pub use parallel::{BatchDriver, BatchReport, BatchState, WorkDispatcher};
pub use processing::ThumbnailWriter;

use tracing::info;
use tracing_subscriber::EnvFilter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set. Calling this more
/// than once is harmless; only the first subscriber is installed.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = if config.json_format {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };

    if installed {
        info!("thumbgallery v{} initialized", VERSION);
    }
}
