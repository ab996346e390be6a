//! Image decoding, resizing and thumbnail encoding

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use image::codecs::jpeg::JpegEncoder;
use image::io::Reader as ImageReader;
use image::{ColorType, DynamicImage};
use tracing::debug;

use crate::error::{Result, GalleryError, ErrorContext};

pub mod formats;
pub mod resize;
pub mod thumbnails;
pub mod validation;

pub use formats::*;
pub use resize::*;
pub use thumbnails::*;
pub use validation::*;

/// Decode an image, detecting the concrete format from its content only
pub fn decode_image(path: &Path) -> Result<DynamicImage> {
    let file = File::open(path).with_file_context(path.to_path_buf())?;

    let reader = ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .with_file_context(path.to_path_buf())?;

    if reader.format().is_none() {
        return Err(GalleryError::unsupported_format(
            "unknown",
            Some(path.to_path_buf()),
        ));
    }

    let image = reader.decode()?;

    debug!("Decoded {:?}: {}x{}", path, image.width(), image.height());

    Ok(image)
}

/// Encode `image` as JPEG at `output_path`.
///
/// Bytes go to a sibling `.partial` file that is renamed into place once
/// complete, so the final path only ever holds a finished artifact.
pub fn encode_jpeg(image: &DynamicImage, output_path: &Path, quality: u8) -> Result<()> {
    let partial_path = partial_path(output_path);

    let written = write_jpeg(image, &partial_path, quality)
        .and_then(|()| fs::rename(&partial_path, output_path).map_err(GalleryError::from));

    if written.is_err() {
        let _ = fs::remove_file(&partial_path);
    }
    written?;

    debug!(
        "Encoded {:?}: {}x{} (quality {})",
        output_path,
        image.width(),
        image.height(),
        quality
    );

    Ok(())
}

fn write_jpeg(image: &DynamicImage, path: &Path, quality: u8) -> Result<()> {
    let rgb = image.to_rgb8();

    let mut output = BufWriter::new(File::create(path)?);
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut output, quality);
        encoder.encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)?;
    }
    output.flush()?;

    Ok(())
}

fn partial_path(output_path: &Path) -> PathBuf {
    let mut name = output_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    output_path.with_file_name(name)
}
