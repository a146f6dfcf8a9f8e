//! Named, described, accessibility-checked themes
//!
//! An [`IntelligentTheme`] wraps one [`ColorScheme`] with the card settings
//! derived from it, the palette colors it came from and an accessibility
//! verdict. Themes are immutable; regeneration produces new ones.

pub mod generator;
pub mod settings;

pub use generator::{GenerationStage, ThemeGenerationOptions, ThemeGenerator};
pub use settings::CardStyleSettings;

use crate::accessibility::AccessibilityVerdict;
use crate::color::{hue_name, Color};
use crate::extraction::ColorPalette;
use crate::scheme::ColorScheme;
use serde::{Deserialize, Serialize};

/// Palette colors a theme was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceColors {
    pub dominant: Color,
    pub accent: Color,
    pub neutral: Color,
}

impl SourceColors {
    pub fn from_palette(palette: &ColorPalette) -> Self {
        Self {
            dominant: palette.dominant.color,
            accent: palette.accent.color,
            neutral: palette.neutral.color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntelligentTheme {
    pub id: String,
    pub name: String,
    pub description: String,
    pub settings: CardStyleSettings,
    pub color_scheme: ColorScheme,
    pub source_colors: SourceColors,
    pub accessibility: AccessibilityVerdict,
}

impl IntelligentTheme {
    /// Wrap a (validated) scheme
    ///
    /// `rank` is the scheme's position in the ranked list and keeps ids
    /// unique within one generation.
    pub fn from_scheme(
        scheme: ColorScheme,
        palette: &ColorPalette,
        variation_seed: u64,
        rank: usize,
    ) -> Self {
        let hue = hue_name(scheme.colors.primary.to_hsl().h);
        let accessibility = AccessibilityVerdict::for_scheme(&scheme);

        let id = format!(
            "{}-{}-s{}-{}",
            scheme.name.to_lowercase(),
            hue.to_lowercase(),
            variation_seed,
            rank
        );
        let name = format!("{} {} {}", scheme.mood.adjective(), hue, scheme.name);
        let description = format!(
            "A {} {} theme built around {} {}, accented with {}. \
             Text contrast {:.1}:1 ({}).",
            scheme.mood,
            scheme.harmony,
            hue.to_lowercase(),
            scheme.colors.primary,
            scheme.colors.accent,
            accessibility.contrast_ratio,
            accessibility.wcag_level
        );

        Self {
            id,
            name,
            description,
            settings: CardStyleSettings::from_scheme(&scheme),
            source_colors: SourceColors::from_palette(palette),
            color_scheme: scheme,
            accessibility,
        }
    }
}
