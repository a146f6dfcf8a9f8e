//! Palette extraction
//!
//! Turns an image reference into a structured [`ColorPalette`]:
//!
//! - `source` - image references, decoding and downsampling
//! - `cache` - bounded cache of decoded pixel buffers
//! - `sampler` - strategy-driven sampling, filtering and weighting
//! - `palette` - dominant/secondary/accent/neutral and mood buckets

pub mod cache;
pub mod palette;
pub mod sampler;
pub mod source;

pub use cache::{DecodedImageCache, DEFAULT_CACHE_CAPACITY};
pub use palette::{ColorPalette, PaletteBuilder};
pub use sampler::{
    ColorSample, ColorSampler, ExtractionOptions, SamplePosition, SamplingStrategy,
};
pub use source::{prepare_pixels, ImageSource, MAX_SAMPLE_DIMENSION};

use crate::core::error::Result;
use image::RgbaImage;
use log::info;

/// Runs decode, sampling and palette construction in one call
pub struct ColorExtractor;

impl ColorExtractor {
    /// Extract a palette from an image reference
    pub fn extract(source: &ImageSource, options: &ExtractionOptions) -> Result<ColorPalette> {
        let image = source.load()?;
        let pixels = prepare_pixels(&image, MAX_SAMPLE_DIMENSION)?;
        let palette = Self::extract_from_pixels(&pixels, options)?;
        info!(
            "Extracted palette from {} (dominant {})",
            source.describe(),
            palette.dominant.hex()
        );
        Ok(palette)
    }

    /// Extract a palette from an already prepared pixel buffer
    pub fn extract_from_pixels(
        pixels: &RgbaImage,
        options: &ExtractionOptions,
    ) -> Result<ColorPalette> {
        let ranked = ColorSampler::sample(pixels, options)?;
        PaletteBuilder::build(&ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::source::test_images::{encode_png, solid};
    use super::*;
    use crate::color::Color;
    use crate::core::error::ThemeError;

    #[test]
    fn test_extract_solid_color() {
        let source = ImageSource::Bytes(encode_png(&solid(64, 48, [40, 120, 200, 255])));
        let palette = ColorExtractor::extract(&source, &ExtractionOptions::default()).unwrap();

        let dominant = palette.dominant.color;
        let expected = Color::from_rgb(40, 120, 200);
        assert!((dominant.r as i32 - expected.r as i32).abs() <= 12);
        assert!((dominant.g as i32 - expected.g as i32).abs() <= 12);
        assert!((dominant.b as i32 - expected.b as i32).abs() <= 12);
        assert!(palette.secondary.is_empty());
    }

    #[test]
    fn test_extract_large_image_is_downsampled() {
        let source = ImageSource::Bytes(encode_png(&solid(900, 450, [200, 80, 40, 255])));
        let palette = ColorExtractor::extract(&source, &ExtractionOptions::default()).unwrap();
        assert_eq!(palette.dominant.color, Color::from_rgb(192, 72, 48));
    }

    #[test]
    fn test_extract_transparent_pixel_fails() {
        let source = ImageSource::Bytes(encode_png(&solid(1, 1, [0, 0, 0, 0])));
        let err = ColorExtractor::extract(&source, &ExtractionOptions::default()).unwrap_err();
        assert!(matches!(err, ThemeError::NoColorsExtracted));
    }

    #[test]
    fn test_every_strategy_handles_solid_image() {
        let pixels = solid(30, 20, [90, 160, 60, 255]);
        for strategy in SamplingStrategy::ALL {
            let options = ExtractionOptions {
                strategy,
                ..Default::default()
            };
            let palette = ColorExtractor::extract_from_pixels(&pixels, &options).unwrap();
            assert_eq!(palette.dominant.color, Color::from_rgb(96, 168, 72));
        }
    }
}
