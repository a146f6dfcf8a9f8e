//! Palette construction from ranked color samples
//!
//! The builder is deterministic: the same ranked list always yields the same
//! palette. Bucket membership is not exclusive, so one color can be both
//! warm and vibrant, and at the hue-300 boundary both warm and cool.

use super::sampler::ColorSample;
use crate::core::error::{Result, ThemeError};
use log::debug;
use serde::{Deserialize, Serialize};

/// Maximum entries per classification bucket
pub const BUCKET_CAPACITY: usize = 3;

/// Maximum secondary colors
pub const MAX_SECONDARY: usize = 3;

/// Contrast an accent needs against the dominant color
pub const ACCENT_MIN_CONTRAST: f64 = 4.0;

/// Structured palette extracted from an image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorPalette {
    /// Highest-weight sample
    pub dominant: ColorSample,
    /// Ranks 2-4
    pub secondary: Vec<ColorSample>,
    pub accent: ColorSample,
    pub neutral: ColorSample,
    pub warm: Vec<ColorSample>,
    pub cool: Vec<ColorSample>,
    pub vibrant: Vec<ColorSample>,
    pub muted: Vec<ColorSample>,
    pub light: Vec<ColorSample>,
    pub dark: Vec<ColorSample>,
}

/// Hue in [0,60] or [300,360], or (60,120]
pub fn is_warm_hue(hue: f64) -> bool {
    (0.0..=60.0).contains(&hue)
        || (300.0..=360.0).contains(&hue)
        || (hue > 60.0 && hue <= 120.0)
}

/// Hue in [180,300], or (120,180)
pub fn is_cool_hue(hue: f64) -> bool {
    (180.0..=300.0).contains(&hue) || (hue > 120.0 && hue < 180.0)
}

pub fn is_vibrant(sample: &ColorSample) -> bool {
    sample.hsl.s >= 50.0
}

pub fn is_light(sample: &ColorSample) -> bool {
    sample.hsl.l >= 60.0
}

/// Builds a [`ColorPalette`] from samples ranked highest weight first
pub struct PaletteBuilder;

impl PaletteBuilder {
    pub fn build(ranked: &[ColorSample]) -> Result<ColorPalette> {
        let dominant = ranked.first().ok_or(ThemeError::EmptyPalette)?;

        let secondary: Vec<ColorSample> = ranked
            .iter()
            .skip(1)
            .take(MAX_SECONDARY)
            .cloned()
            .collect();

        let accent = ranked
            .iter()
            .skip(1)
            .find(|s| s.color.contrast_ratio(&dominant.color) > ACCENT_MIN_CONTRAST)
            .or_else(|| ranked.get(1))
            .unwrap_or(dominant)
            .clone();

        let bucket = |predicate: &dyn Fn(&ColorSample) -> bool| -> Vec<ColorSample> {
            ranked
                .iter()
                .filter(|s| predicate(s))
                .take(BUCKET_CAPACITY)
                .cloned()
                .collect()
        };

        let warm = bucket(&|s: &ColorSample| is_warm_hue(s.hsl.h));
        let cool = bucket(&|s: &ColorSample| is_cool_hue(s.hsl.h));
        let vibrant = bucket(&is_vibrant);
        let muted = bucket(&|s: &ColorSample| !is_vibrant(s));
        let light = bucket(&is_light);
        let dark = bucket(&|s: &ColorSample| !is_light(s));

        let neutral = muted
            .iter()
            .find(|s| s.hsl.s < 30.0)
            .or_else(|| ranked.last())
            .unwrap_or(dominant)
            .clone();

        debug!(
            "Built palette: dominant {}, {} secondary, accent {}, neutral {} \
             (warm {}, cool {}, vibrant {}, muted {}, light {}, dark {})",
            dominant.hex(),
            secondary.len(),
            accent.hex(),
            neutral.hex(),
            warm.len(),
            cool.len(),
            vibrant.len(),
            muted.len(),
            light.len(),
            dark.len()
        );

        Ok(ColorPalette {
            dominant: dominant.clone(),
            secondary,
            accent,
            neutral,
            warm,
            cool,
            vibrant,
            muted,
            light,
            dark,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn sample(hex: &str, weight: f64) -> ColorSample {
        ColorSample::from_color(Color::from_hex(hex).unwrap(), weight)
    }

    #[test]
    fn test_empty_list_fails() {
        assert!(matches!(
            PaletteBuilder::build(&[]),
            Err(ThemeError::EmptyPalette)
        ));
    }

    #[test]
    fn test_single_color_degrades_gracefully() {
        let ranked = vec![sample("#FF0000", 10.0)];
        let palette = PaletteBuilder::build(&ranked).unwrap();
        assert_eq!(palette.dominant.color, Color::from_rgb(255, 0, 0));
        assert!(palette.secondary.is_empty());
        assert_eq!(palette.accent.color, palette.dominant.color);
        assert_eq!(palette.neutral.color, palette.dominant.color);
        assert_eq!(palette.warm.len(), 1);
        assert_eq!(palette.vibrant.len(), 1);
        assert!(palette.cool.is_empty());
        assert!(palette.muted.is_empty());
    }

    #[test]
    fn test_secondary_takes_ranks_two_to_four() {
        let ranked: Vec<_> = ["#CC3333", "#33CC33", "#3333CC", "#CCCC33", "#33CCCC"]
            .iter()
            .enumerate()
            .map(|(i, hex)| sample(hex, 10.0 - i as f64))
            .collect();
        let palette = PaletteBuilder::build(&ranked).unwrap();
        assert_eq!(palette.secondary.len(), 3);
        assert_eq!(palette.secondary[0].hex(), "#33CC33");
        assert_eq!(palette.secondary[2].hex(), "#CCCC33");
    }

    #[test]
    fn test_accent_needs_contrast() {
        let ranked = vec![
            sample("#203040", 10.0),
            sample("#304050", 9.0),
            sample("#F0E0C0", 8.0),
        ];
        let palette = PaletteBuilder::build(&ranked).unwrap();
        assert_eq!(palette.accent.hex(), "#F0E0C0");
    }

    #[test]
    fn test_accent_falls_back_to_second_rank() {
        let ranked = vec![sample("#203040", 10.0), sample("#304050", 9.0)];
        let palette = PaletteBuilder::build(&ranked).unwrap();
        assert_eq!(palette.accent.hex(), "#304050");
    }

    #[test]
    fn test_neutral_prefers_low_saturation_muted() {
        let ranked = vec![
            sample("#FF2020", 10.0),
            sample("#8A7F75", 9.0),
            sample("#2040FF", 8.0),
        ];
        let palette = PaletteBuilder::build(&ranked).unwrap();
        assert_eq!(palette.neutral.hex(), "#8A7F75");
    }

    #[test]
    fn test_neutral_falls_back_to_last_rank() {
        let ranked = vec![sample("#FF2020", 10.0), sample("#2040FF", 8.0)];
        let palette = PaletteBuilder::build(&ranked).unwrap();
        assert_eq!(palette.neutral.hex(), "#2040FF");
    }

    #[test]
    fn test_buckets_capped_and_ordered() {
        let ranked: Vec<_> = ["#FF0000", "#EE1100", "#DD2200", "#CC3300", "#0000FF"]
            .iter()
            .enumerate()
            .map(|(i, hex)| sample(hex, 10.0 - i as f64))
            .collect();
        let palette = PaletteBuilder::build(&ranked).unwrap();
        assert_eq!(palette.warm.len(), 3);
        assert_eq!(palette.warm[0].hex(), "#FF0000");
        assert_eq!(palette.cool.len(), 1);
        assert_eq!(palette.vibrant.len(), 3);
    }

    #[test]
    fn test_hue_buckets() {
        assert!(is_warm_hue(30.0));
        assert!(is_warm_hue(100.0));
        assert!(!is_cool_hue(100.0));
        assert!(is_cool_hue(150.0));
        assert!(is_cool_hue(240.0));
        assert!(!is_warm_hue(240.0));
        // Boundary hue belongs to both
        assert!(is_warm_hue(300.0) && is_cool_hue(300.0));
    }
}
