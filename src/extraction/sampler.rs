//! Spatial color sampling
//!
//! Reads pixels from a downsampled buffer according to a [`SamplingStrategy`],
//! rejects transparent and (optionally) extreme pixels, quantizes the rest to
//! a coarse RGB grid and accumulates frequency and weight per bucket.
//!
//! Quantization rounds each channel to the nearest multiple of 24 (capped at
//! 255), so a sampled color is within ±12 of the source on every channel.

use crate::color::{Color, Hsl};
use crate::core::error::{Result, ThemeError};
use image::RgbaImage;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Channel quantization step
pub const QUANTIZATION_STEP: f64 = 24.0;

/// Pixels below this alpha are treated as transparent
pub const MIN_ALPHA: u8 = 128;

// =============================================================================
// Options
// =============================================================================

/// Which region of the image contributes samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingStrategy {
    /// Full grid, ranked by accumulated weight
    #[default]
    Dominant,
    /// Full grid
    Average,
    /// Border band of 20% of the shorter side
    Edge,
    /// Centered square of 60% of the shorter side
    Center,
    /// Four corner squares of 30% of the shorter side
    Corners,
    /// Full grid
    Distributed,
}

impl SamplingStrategy {
    pub const ALL: [SamplingStrategy; 6] = [
        SamplingStrategy::Dominant,
        SamplingStrategy::Average,
        SamplingStrategy::Edge,
        SamplingStrategy::Center,
        SamplingStrategy::Corners,
        SamplingStrategy::Distributed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SamplingStrategy::Dominant => "dominant",
            SamplingStrategy::Average => "average",
            SamplingStrategy::Edge => "edge",
            SamplingStrategy::Center => "center",
            SamplingStrategy::Corners => "corners",
            SamplingStrategy::Distributed => "distributed",
        }
    }
}

impl std::fmt::Display for SamplingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SamplingStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown sampling strategy '{}'", s))
    }
}

/// Options controlling a single extraction
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionOptions {
    pub strategy: SamplingStrategy,
    /// Reject near-white, near-black, neon and flat-gray pixels
    pub filter_extremes: bool,
    /// Favor pixels close to the image center
    pub weight_by_position: bool,
    /// Favor saturated pixels
    pub weight_by_saturation: bool,
    /// Number of ranked colors kept (at least 1)
    pub max_colors: usize,
    /// Pixel stride (at least 1)
    pub sample_rate: u32,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            strategy: SamplingStrategy::Dominant,
            filter_extremes: true,
            weight_by_position: true,
            weight_by_saturation: true,
            max_colors: 12,
            sample_rate: 4,
        }
    }
}

// =============================================================================
// Samples
// =============================================================================

/// Where in the image a color mostly appeared
///
/// Informational only; downstream stages do not branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplePosition {
    Center,
    Edge,
    Corner,
    Distributed,
}

impl SamplePosition {
    /// Classify from the mean distance to the center, normalized to [0, 1]
    pub fn from_mean_distance(distance: f64) -> Self {
        if distance < 0.3 {
            SamplePosition::Center
        } else if distance >= 0.8 {
            SamplePosition::Corner
        } else if distance >= 0.55 {
            SamplePosition::Edge
        } else {
            SamplePosition::Distributed
        }
    }
}

/// Summary of the pixel positions that fed a sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePositions {
    pub count: u32,
    /// Mean distance from the image center, normalized by the half-diagonal
    pub mean_distance: f64,
}

/// A quantized color with its accumulated statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorSample {
    pub color: Color,
    pub hsl: Hsl,
    /// Packed quantized RGB (`0xRRGGBB`)
    pub key: u32,
    /// Number of accepted pixels in this bucket
    pub frequency: u32,
    /// Accumulated position/saturation/lightness weight
    pub weight: f64,
    pub positions: SamplePositions,
    /// Fraction of accepted pixels in this bucket
    pub area: f64,
    pub position: SamplePosition,
}

impl ColorSample {
    /// Build a standalone sample (used when palettes come from outside an image)
    pub fn from_color(color: Color, weight: f64) -> Self {
        Self {
            color,
            hsl: color.to_hsl(),
            key: pack_key(color),
            frequency: 1,
            weight,
            positions: SamplePositions {
                count: 1,
                mean_distance: 0.0,
            },
            area: 0.0,
            position: SamplePosition::Distributed,
        }
    }

    pub fn hex(&self) -> String {
        self.color.to_hex()
    }
}

#[derive(Debug, Default)]
struct Accumulator {
    frequency: u32,
    weight: f64,
    distance_sum: f64,
}

// =============================================================================
// Sampler
// =============================================================================

/// Stateless sampler over a pixel buffer
pub struct ColorSampler;

impl ColorSampler {
    /// Sample `pixels` and return colors ranked by weight (highest first)
    ///
    /// Fails with [`ThemeError::NoColorsExtracted`] when no pixel survives the
    /// alpha and extreme-color filters.
    pub fn sample(pixels: &RgbaImage, options: &ExtractionOptions) -> Result<Vec<ColorSample>> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(ThemeError::PixelAccess("pixel buffer is empty".to_string()));
        }

        let center_x = width as f64 / 2.0;
        let center_y = height as f64 / 2.0;
        let max_distance = (center_x * center_x + center_y * center_y).sqrt();

        let coordinates = sample_coordinates(options.strategy, width, height, options.sample_rate);
        let mut buckets: HashMap<u32, Accumulator> = HashMap::new();
        let mut accepted: u32 = 0;
        let mut transparent: u32 = 0;
        let mut extreme: u32 = 0;

        for (x, y) in &coordinates {
            let pixel = pixels.get_pixel_checked(*x, *y).ok_or_else(|| {
                ThemeError::PixelAccess(format!("pixel ({}, {}) out of bounds", x, y))
            })?;
            let [r, g, b, a] = pixel.0;

            if a < MIN_ALPHA {
                transparent += 1;
                continue;
            }

            let hsl = Color::from_rgb(r, g, b).to_hsl();
            if options.filter_extremes && is_extreme(&hsl) {
                extreme += 1;
                continue;
            }

            let dx = *x as f64 + 0.5 - center_x;
            let dy = *y as f64 + 0.5 - center_y;
            let distance = ((dx * dx + dy * dy).sqrt() / max_distance).min(1.0);

            let weight = pixel_weight(distance, &hsl, options);

            let quantized = Color::from_rgb(quantize(r), quantize(g), quantize(b));
            let entry = buckets.entry(pack_key(quantized)).or_default();
            entry.frequency += 1;
            entry.weight += weight;
            entry.distance_sum += distance;
            accepted += 1;
        }

        debug!(
            "Sampled {} coordinates ({}): {} accepted, {} transparent, {} extreme, {} buckets",
            coordinates.len(),
            options.strategy,
            accepted,
            transparent,
            extreme,
            buckets.len()
        );

        if buckets.is_empty() {
            return Err(ThemeError::NoColorsExtracted);
        }

        let mut samples: Vec<ColorSample> = buckets
            .into_iter()
            .map(|(key, acc)| {
                let color = unpack_key(key);
                let mean_distance = acc.distance_sum / acc.frequency as f64;
                ColorSample {
                    color,
                    hsl: color.to_hsl(),
                    key,
                    frequency: acc.frequency,
                    weight: acc.weight,
                    positions: SamplePositions {
                        count: acc.frequency,
                        mean_distance,
                    },
                    area: acc.frequency as f64 / accepted as f64,
                    position: SamplePosition::from_mean_distance(mean_distance),
                }
            })
            .collect();

        samples.sort_by(|a, b| {
            b.weight
                .total_cmp(&a.weight)
                .then_with(|| b.frequency.cmp(&a.frequency))
                .then_with(|| a.key.cmp(&b.key))
        });
        samples.truncate(options.max_colors.max(1));

        Ok(samples)
    }
}

/// Weight of one accepted pixel at normalized `distance` from the center
///
/// Position and saturation factors apply only when enabled; the lightness
/// factor always favors mid-lightness colors.
pub fn pixel_weight(distance: f64, hsl: &Hsl, options: &ExtractionOptions) -> f64 {
    let mut weight = 1.0;
    if options.weight_by_position {
        weight *= 1.0 - 0.5 * distance;
    }
    if options.weight_by_saturation {
        weight *= 0.5 + 0.5 * (hsl.s / 100.0);
    }
    weight * (1.0 - 0.3 * ((hsl.l - 50.0).abs() / 50.0))
}

/// Coordinates visited by a strategy, in row-major order
pub fn sample_coordinates(
    strategy: SamplingStrategy,
    width: u32,
    height: u32,
    sample_rate: u32,
) -> Vec<(u32, u32)> {
    let step = sample_rate.max(1) as usize;
    let min_side = width.min(height) as f64;
    let region = |fraction: f64| ((min_side * fraction) as u32).max(1);

    let grid = |x_range: std::ops::Range<u32>, y_range: std::ops::Range<u32>| {
        let xs: Vec<u32> = x_range.step_by(step).collect();
        y_range
            .step_by(step)
            .flat_map(|y| xs.iter().map(move |&x| (x, y)))
            .collect::<Vec<_>>()
    };

    match strategy {
        SamplingStrategy::Center => {
            let size = region(0.6);
            let start_x = (width - size) / 2;
            let start_y = (height - size) / 2;
            grid(start_x..start_x + size, start_y..start_y + size)
        }
        SamplingStrategy::Edge => {
            let band = region(0.2);
            let far_x = width.saturating_sub(band);
            let far_y = height.saturating_sub(band);
            grid(0..width, 0..height)
                .into_iter()
                .filter(|&(x, y)| x < band || y < band || x >= far_x || y >= far_y)
                .collect()
        }
        SamplingStrategy::Corners => {
            let size = region(0.3);
            let near_x = |x: u32| x < size || x >= width.saturating_sub(size);
            let near_y = |y: u32| y < size || y >= height.saturating_sub(size);
            grid(0..width, 0..height)
                .into_iter()
                .filter(|&(x, y)| near_x(x) && near_y(y))
                .collect()
        }
        SamplingStrategy::Dominant | SamplingStrategy::Average | SamplingStrategy::Distributed => {
            grid(0..width, 0..height)
        }
    }
}

/// Near-white, near-black, neon-bright/neon-dark, or flat mid gray
pub fn is_extreme(hsl: &Hsl) -> bool {
    if hsl.l > 95.0 || hsl.l < 5.0 {
        return true;
    }
    if hsl.s > 90.0 && (hsl.l < 15.0 || hsl.l > 85.0) {
        return true;
    }
    hsl.s < 5.0 && (20.0..=80.0).contains(&hsl.l)
}

/// Round a channel to the nearest multiple of the quantization step
pub fn quantize(channel: u8) -> u8 {
    ((channel as f64 / QUANTIZATION_STEP).round() * QUANTIZATION_STEP).min(255.0) as u8
}

fn pack_key(color: Color) -> u32 {
    ((color.r as u32) << 16) | ((color.g as u32) << 8) | color.b as u32
}

fn unpack_key(key: u32) -> Color {
    Color::from_rgb((key >> 16) as u8, (key >> 8) as u8, key as u8)
}
