//! Height-driven image resizing

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use crate::error::{Result, GalleryError};
use tracing::debug;

/// Available resize filters. Nearest neighbour is deliberately absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Triangle (linear interpolation)
    Triangle,
    /// Catmull-Rom cubic spline
    CatmullRom,
    /// Gaussian blur
    Gaussian,
    /// Lanczos with radius 3
    #[default]
    Lanczos3,
}

impl From<FilterType> for image::imageops::FilterType {
    fn from(filter: FilterType) -> Self {
        match filter {
            FilterType::Triangle => image::imageops::FilterType::Triangle,
            FilterType::CatmullRom => image::imageops::FilterType::CatmullRom,
            FilterType::Gaussian => image::imageops::FilterType::Gaussian,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Scales rasters to a fixed height, keeping the source aspect ratio
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageResizer {
    filter: FilterType,
}

impl ImageResizer {
    /// Create a new resizer with the default filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resizer with custom filter
    pub fn with_filter(filter: FilterType) -> Self {
        Self { filter }
    }

    /// Resize `image` to exactly `target_height` rows
    pub fn resize_to_height(&self, image: &DynamicImage, target_height: u32) -> Result<DynamicImage> {
        if target_height == 0 {
            return Err(GalleryError::invalid_dimensions(image.width(), 0, None));
        }

        let target_width = target_width(image.width(), image.height(), target_height)?;

        debug!(
            "Resizing {}x{} -> {}x{} using {:?}",
            image.width(),
            image.height(),
            target_width,
            target_height,
            self.filter
        );

        if target_width == image.width() && target_height == image.height() {
            return Ok(image.clone());
        }

        Ok(image.resize_exact(target_width, target_height, self.filter.into()))
    }
}

/// `round(source_width * target_height / source_height)`, at least one pixel.
///
/// Integer arithmetic, rounding halves up.
pub fn target_width(source_width: u32, source_height: u32, target_height: u32) -> Result<u32> {
    if source_width == 0 || source_height == 0 {
        return Err(GalleryError::invalid_dimensions(source_width, source_height, None));
    }

    let numerator = u64::from(source_width) * u64::from(target_height);
    let height = u64::from(source_height);
    let width = (numerator + height / 2) / height;

    u32::try_from(width.max(1))
        .map_err(|_| GalleryError::invalid_dimensions(source_width, source_height, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn create_test_image(width: u32, height: u32) -> DynamicImage {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            let intensity = ((x + y) % 255) as u8;
            Rgb([intensity, intensity, intensity])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_target_width_rounding() {
        assert_eq!(target_width(300, 200, 200).unwrap(), 300);
        assert_eq!(target_width(300, 200, 800).unwrap(), 1200);
        // 1000 * 200 / 3 = 66666.67
        assert_eq!(target_width(1000, 3, 200).unwrap(), 66667);
        // 5 * 1 / 2 = 2.5 rounds up
        assert_eq!(target_width(5, 2, 1).unwrap(), 3);
        // very tall source never collapses to zero width
        assert_eq!(target_width(1, 10_000, 200).unwrap(), 1);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let err = target_width(640, 0, 200).unwrap_err();
        assert!(matches!(err, GalleryError::InvalidDimensions { height: 0, .. }));
        assert!(err.is_recoverable());

        assert!(target_width(0, 480, 200).is_err());
    }

    #[test]
    fn test_zero_height_raster_rejected() {
        let resizer = ImageResizer::new();
        let empty = DynamicImage::new_rgb8(10, 0);
        assert!(matches!(
            resizer.resize_to_height(&empty, 200),
            Err(GalleryError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_resize_preserves_aspect_ratio() {
        let resizer = ImageResizer::new();

        for (w, h, t) in [(300, 200, 200), (300, 200, 800), (640, 427, 200), (97, 331, 800)] {
            let image = create_test_image(w, h);
            let resized = resizer.resize_to_height(&image, t).unwrap();

            let expected = (f64::from(w) * f64::from(t) / f64::from(h)).round() as i64;
            assert_eq!(resized.height(), t);
            assert!((i64::from(resized.width()) - expected).abs() <= 1);
        }
    }

    #[test]
    fn test_no_resize_needed() {
        let resizer = ImageResizer::with_filter(FilterType::Triangle);
        let image = create_test_image(300, 200);

        let resized = resizer.resize_to_height(&image, 200).unwrap();
        assert_eq!((resized.width(), resized.height()), (300, 200));
    }

    #[test]
    fn test_filter_conversion() {
        let filters = [
            FilterType::Triangle,
            FilterType::CatmullRom,
            FilterType::Gaussian,
            FilterType::Lanczos3,
        ];

        for filter in filters {
            let converted: image::imageops::FilterType = filter.into();
            assert_ne!(converted, image::imageops::FilterType::Nearest);
        }
    }
}
