//! Color primitives shared by every pipeline stage
//!
//! This module provides:
//! - 8-bit sRGB [`Color`] with hex parsing/formatting
//! - [`Hsl`] conversion and adjustment helpers
//! - WCAG 2.x relative luminance and contrast ratio
//!
//! # Example
//!
//! ```rust
//! use tab_theme_studio::color::{Color, WcagLevel};
//!
//! let red = Color::from_hex("#FF0000").unwrap();
//! let ratio = red.contrast_ratio(&Color::WHITE);
//! assert_eq!(WcagLevel::from_ratio(ratio), WcagLevel::AaLarge);
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// =============================================================================
// Color
// =============================================================================

/// Opaque sRGB color with 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Pure white
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Pure black
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    /// Create a color from RGB values (0-255)
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex string
    ///
    /// Supports `#RGB` and `#RRGGBB`; the `#` prefix is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');

        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
                Some(Self::from_rgb(r * 17, g * 17, b * 17))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::from_rgb(r, g, b))
            }
            _ => None,
        }
    }

    /// Convert to hex string (#RRGGBB)
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Convert to HSL (hue in degrees, saturation/lightness in percent)
    pub fn to_hsl(&self) -> Hsl {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if (max - min).abs() < f64::EPSILON {
            return Hsl::new(0.0, 0.0, l * 100.0);
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };

        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Hsl::new(h * 60.0, s * 100.0, l * 100.0)
    }

    /// Create a color from HSL
    pub fn from_hsl(hsl: Hsl) -> Self {
        let h = hsl.h / 360.0;
        let s = hsl.s / 100.0;
        let l = hsl.l / 100.0;

        if s <= 0.0 {
            let v = to_channel(l);
            return Self::from_rgb(v, v, v);
        }

        let q = if l < 0.5 {
            l * (1.0 + s)
        } else {
            l + s - l * s
        };
        let p = 2.0 * l - q;

        Self::from_rgb(
            to_channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
            to_channel(hue_to_rgb(p, q, h)),
            to_channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
        )
    }

    /// Relative luminance per WCAG 2.x (linearized sRGB)
    pub fn relative_luminance(&self) -> f64 {
        let lin = |c: u8| {
            let c = c as f64 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        };
        0.2126 * lin(self.r) + 0.7152 * lin(self.g) + 0.0722 * lin(self.b)
    }

    /// Calculate contrast ratio with another color (WCAG 2.x), in [1, 21]
    pub fn contrast_ratio(&self, other: &Color) -> f64 {
        let l1 = self.relative_luminance();
        let l2 = other.relative_luminance();
        let lighter = l1.max(l2);
        let darker = l1.min(l2);
        (lighter + 0.05) / (darker + 0.05)
    }

    /// Raise HSL lightness by `points` (0-100 scale)
    pub fn lighten(&self, points: f64) -> Self {
        let hsl = self.to_hsl();
        Self::from_hsl(hsl.with_lightness(hsl.l + points))
    }

    /// Lower HSL lightness by `points` (0-100 scale)
    pub fn darken(&self, points: f64) -> Self {
        self.lighten(-points)
    }

    /// Whether black text reads better on this color than white text
    pub fn is_light(&self) -> bool {
        self.contrast_ratio(&Self::BLACK) >= self.contrast_ratio(&Self::WHITE)
    }

    /// Black or white, whichever contrasts more with this color
    pub fn best_text_color(&self) -> Self {
        if self.is_light() {
            Self::BLACK
        } else {
            Self::WHITE
        }
    }
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn to_channel(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::str::FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or_else(|| format!("invalid hex color '{}'", s))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Color::from_hex(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color '{}'", raw)))
    }
}

// =============================================================================
// HSL
// =============================================================================

/// Hue in degrees [0, 360), saturation and lightness in percent [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    /// Create a new HSL value, wrapping hue and clamping saturation/lightness
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Self {
            h: normalize_hue(h),
            s: s.clamp(0.0, 100.0),
            l: l.clamp(0.0, 100.0),
        }
    }

    /// Rotate the hue by `degrees` (may be negative)
    pub fn rotate(&self, degrees: f64) -> Self {
        Self::new(self.h + degrees, self.s, self.l)
    }

    pub fn with_saturation(&self, s: f64) -> Self {
        Self::new(self.h, s, self.l)
    }

    pub fn with_lightness(&self, l: f64) -> Self {
        Self::new(self.h, self.s, l)
    }

    pub fn clamp_saturation(&self, min: f64, max: f64) -> Self {
        self.with_saturation(self.s.clamp(min, max))
    }

    pub fn clamp_lightness(&self, min: f64, max: f64) -> Self {
        self.with_lightness(self.l.clamp(min, max))
    }

    pub fn to_color(&self) -> Color {
        Color::from_hsl(*self)
    }
}

/// Wrap any hue into [0, 360)
pub fn normalize_hue(h: f64) -> f64 {
    let h = h.rem_euclid(360.0);
    if h >= 360.0 {
        0.0
    } else {
        h
    }
}

/// Human-readable name for a hue, used in theme names
pub fn hue_name(h: f64) -> &'static str {
    match normalize_hue(h) {
        h if h < 15.0 => "Red",
        h if h < 45.0 => "Orange",
        h if h < 70.0 => "Yellow",
        h if h < 160.0 => "Green",
        h if h < 195.0 => "Teal",
        h if h < 255.0 => "Blue",
        h if h < 290.0 => "Purple",
        h if h < 345.0 => "Pink",
        _ => "Red",
    }
}

// =============================================================================
// WCAG levels
// =============================================================================

/// WCAG conformance level reached by a contrast ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WcagLevel {
    #[serde(rename = "AAA")]
    Aaa,
    #[serde(rename = "AA")]
    Aa,
    #[serde(rename = "AA-large")]
    AaLarge,
    #[serde(rename = "fail")]
    Fail,
}

impl WcagLevel {
    pub const AAA_NORMAL: f64 = 7.0;
    pub const AA_NORMAL: f64 = 4.5;
    pub const AA_LARGE: f64 = 3.0;

    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= Self::AAA_NORMAL {
            WcagLevel::Aaa
        } else if ratio >= Self::AA_NORMAL {
            WcagLevel::Aa
        } else if ratio >= Self::AA_LARGE {
            WcagLevel::AaLarge
        } else {
            WcagLevel::Fail
        }
    }

    pub fn as_label(&self) -> &'static str {
        match self {
            WcagLevel::Aaa => "AAA",
            WcagLevel::Aa => "AA",
            WcagLevel::AaLarge => "AA (large text)",
            WcagLevel::Fail => "Fail",
        }
    }
}

impl std::fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex("#FF0000"), Some(Color::from_rgb(255, 0, 0)));
        assert_eq!(Color::from_hex("00ff80"), Some(Color::from_rgb(0, 255, 128)));
        assert_eq!(Color::from_hex("#FFF"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#GG0000"), None);
    }

    #[test]
    fn test_color_to_hex() {
        let color = Color::from_rgb(255, 128, 0);
        assert_eq!(color.to_hex(), "#FF8000");
        assert_eq!(format!("{}", color), "#FF8000");
    }

    #[test]
    fn test_hsl_of_primaries() {
        let red = Color::from_rgb(255, 0, 0).to_hsl();
        assert!(red.h.abs() < 0.01);
        assert!((red.s - 100.0).abs() < 0.01);
        assert!((red.l - 50.0).abs() < 0.01);

        let blue = Color::from_rgb(0, 0, 255).to_hsl();
        assert!((blue.h - 240.0).abs() < 0.01);

        let gray = Color::from_rgb(128, 128, 128).to_hsl();
        assert_eq!(gray.s, 0.0);
    }

    #[test]
    fn test_hsl_conversion_is_stable() {
        for color in [
            Color::from_rgb(18, 52, 86),
            Color::from_rgb(240, 200, 10),
            Color::from_rgb(99, 0, 177),
            Color::from_rgb(7, 7, 7),
        ] {
            let back = Color::from_hsl(color.to_hsl());
            assert!((back.r as i32 - color.r as i32).abs() <= 1);
            assert!((back.g as i32 - color.g as i32).abs() <= 1);
            assert!((back.b as i32 - color.b as i32).abs() <= 1);
        }
    }

    #[test]
    fn test_contrast_extremes() {
        let ratio = Color::WHITE.contrast_ratio(&Color::BLACK);
        assert!((ratio - 21.0).abs() < 0.01);
        assert!((Color::WHITE.contrast_ratio(&Color::WHITE) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_contrast_is_symmetric() {
        let a = Color::from_rgb(200, 30, 90);
        let b = Color::from_rgb(250, 250, 240);
        assert!((a.contrast_ratio(&b) - b.contrast_ratio(&a)).abs() < 1e-12);
    }

    #[test]
    fn test_best_text_color_always_passes_aa() {
        for v in (0..=255).step_by(5) {
            let bg = Color::from_rgb(v as u8, v as u8, v as u8);
            assert!(bg.best_text_color().contrast_ratio(&bg) >= 4.5);
        }
    }

    #[test]
    fn test_lighten_darken() {
        let base = Color::from_hex("#336699").unwrap();
        assert!(base.lighten(20.0).relative_luminance() > base.relative_luminance());
        assert!(base.darken(20.0).relative_luminance() < base.relative_luminance());
        assert_eq!(base.darken(100.0), Color::BLACK);
    }

    #[test]
    fn test_hsl_wraps_and_clamps() {
        let hsl = Hsl::new(-30.0, 150.0, -5.0);
        assert!((hsl.h - 330.0).abs() < 1e-9);
        assert_eq!(hsl.s, 100.0);
        assert_eq!(hsl.l, 0.0);
        assert!((Hsl::new(350.0, 50.0, 50.0).rotate(20.0).h - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_wcag_levels() {
        assert_eq!(WcagLevel::from_ratio(21.0), WcagLevel::Aaa);
        assert_eq!(WcagLevel::from_ratio(5.0), WcagLevel::Aa);
        assert_eq!(WcagLevel::from_ratio(3.2), WcagLevel::AaLarge);
        assert_eq!(WcagLevel::from_ratio(1.5), WcagLevel::Fail);
    }

    #[test]
    fn test_hue_names() {
        assert_eq!(hue_name(0.0), "Red");
        assert_eq!(hue_name(359.0), "Red");
        assert_eq!(hue_name(210.0), "Blue");
        assert_eq!(hue_name(120.0), "Green");
    }

    #[test]
    fn test_color_serde_as_hex() {
        let json = serde_json::to_string(&Color::from_rgb(1, 2, 3)).unwrap();
        assert_eq!(json, "\"#010203\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::from_rgb(1, 2, 3));
    }
}
