use std::{io::Cursor, path::Path};

use image::{DynamicImage, ImageFormat};
use serde::Serialize;
use tracing::debug;

use super::types::{ColorName, HsiColor, RgbColor};
use crate::config::ClassifierConfig;
use crate::error::ColorError;

/// Result of classifying one image. Serializes to the public response shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorReport {
    pub rgb: RgbColor,
    pub hsi: HsiColor,
    pub color_name: ColorName,
    pub hex_code: String,
}

impl ColorReport {
    pub fn from_rgb(rgb: RgbColor) -> Self {
        let hsi = HsiColor::from(rgb);
        Self {
            rgb,
            hsi,
            color_name: ColorName::from_hue(hsi.h),
            hex_code: rgb.hex_code(),
        }
    }
}

/// Average color detection and hue classification.
///
/// Stateless apart from its sampling configuration; safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct ColorClassifier {
    config: ClassifierConfig,
}

impl ColorClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Channel-wise mean of the image after resizing it to the configured sample grid.
    ///
    /// Images without at least three color channels contribute no pixels. Alpha is ignored,
    /// and each mean is truncated toward zero. Palette sources are rejected earlier, in
    /// [`ColorClassifier::classify`], since decoding has already expanded them.
    pub fn average_color(&self, image: &DynamicImage) -> Result<RgbColor, ColorError> {
        if image.color().channel_count() < 3 || image.width() == 0 || image.height() == 0 {
            return Err(ColorError::NoProcessablePixels);
        }

        let sample = image.resize_exact(
            self.config.sample_width,
            self.config.sample_height,
            self.config.resize_filter.into(),
        );
        let rgb_image = sample.to_rgb8();

        let mut totals = [0u64; 3];
        let mut count = 0u64;
        for px in rgb_image.pixels() {
            totals[0] += px[0] as u64;
            totals[1] += px[1] as u64;
            totals[2] += px[2] as u64;
            count += 1;
        }

        if count == 0 {
            return Err(ColorError::NoProcessablePixels);
        }

        Ok(RgbColor::new(
            (totals[0] / count) as u8,
            (totals[1] / count) as u8,
            (totals[2] / count) as u8,
        ))
    }

    pub fn classify_image(&self, image: &DynamicImage) -> Result<ColorReport, ColorError> {
        let rgb = self.average_color(image)?;
        let report = ColorReport::from_rgb(rgb);
        debug!(
            "Classified {}x{} image as {} ({})",
            image.width(),
            image.height(),
            report.color_name,
            report.hex_code
        );
        Ok(report)
    }

    /// Decodes `bytes` (format sniffed from content) and classifies the result.
    ///
    /// GIFs and indexed PNGs store palette indices rather than color channels, so they have
    /// no processable pixels even though the decoder hands them back as RGB(A).
    pub fn classify(&self, bytes: &[u8]) -> Result<ColorReport, ColorError> {
        let image = image::load_from_memory(bytes)?;
        if is_palette_source(bytes) {
            debug!("Rejecting palette image ({}x{})", image.width(), image.height());
            return Err(ColorError::NoProcessablePixels);
        }
        self.classify_image(&image)
    }

    pub fn classify_path(&self, path: &Path) -> Result<ColorReport, ColorError> {
        let bytes = std::fs::read(path).map_err(|e| ColorError::from_io(path, e))?;
        self.classify(&bytes)
    }
}

fn is_palette_source(bytes: &[u8]) -> bool {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Gif) => true,
        Ok(ImageFormat::Png) => png::Decoder::new(Cursor::new(bytes))
            .read_info()
            .is_ok_and(|reader| reader.info().color_type == png::ColorType::Indexed),
        _ => false,
    }
}
