//! Color schemes derived from a palette
//!
//! A [`ColorScheme`] is a complete set of semantic UI color roles tagged with
//! a harmony category and a mood, plus two 0-100 scores used for ranking.
//!
//! - `synthesizer` - palette to schemes, filtering and ranking
//! - `variation` - seeded jitter so regeneration is reproducible per seed

pub mod synthesizer;
pub mod variation;

pub use synthesizer::{SchemeSynthesizer, MAX_SCHEMES};
pub use variation::Variation;

use crate::color::{Color, Hsl};
use crate::extraction::palette::is_warm_hue;
use serde::{Deserialize, Serialize};

// =============================================================================
// Harmony
// =============================================================================

/// Color-theory relationship between a scheme's hues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HarmonyType {
    Monochromatic,
    Analogous,
    Complementary,
    Triadic,
    Tetradic,
    SplitComplementary,
}

impl HarmonyType {
    pub const ALL: [HarmonyType; 6] = [
        HarmonyType::Monochromatic,
        HarmonyType::Analogous,
        HarmonyType::Complementary,
        HarmonyType::Triadic,
        HarmonyType::Tetradic,
        HarmonyType::SplitComplementary,
    ];

    /// Score before jitter
    pub fn base_score(&self) -> f64 {
        match self {
            HarmonyType::Monochromatic => 85.0,
            HarmonyType::Analogous => 80.0,
            HarmonyType::Complementary => 75.0,
            HarmonyType::Triadic => 70.0,
            HarmonyType::Tetradic => 65.0,
            HarmonyType::SplitComplementary => 72.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HarmonyType::Monochromatic => "monochromatic",
            HarmonyType::Analogous => "analogous",
            HarmonyType::Complementary => "complementary",
            HarmonyType::Triadic => "triadic",
            HarmonyType::Tetradic => "tetradic",
            HarmonyType::SplitComplementary => "split-complementary",
        }
    }
}

impl std::fmt::Display for HarmonyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HarmonyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|h| h.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("unknown harmony '{}'", s))
    }
}

// =============================================================================
// Mood
// =============================================================================

/// Qualitative tone of a scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodType {
    Warm,
    Cool,
    Neutral,
    Vibrant,
    Muted,
    Elegant,
}

impl MoodType {
    pub const ALL: [MoodType; 6] = [
        MoodType::Warm,
        MoodType::Cool,
        MoodType::Neutral,
        MoodType::Vibrant,
        MoodType::Muted,
        MoodType::Elegant,
    ];

    /// Classify the tone of a base color
    pub fn from_hsl(hsl: &Hsl) -> Self {
        if hsl.s < 12.0 {
            MoodType::Neutral
        } else if hsl.l < 30.0 && hsl.s < 45.0 {
            MoodType::Elegant
        } else if hsl.s >= 65.0 {
            MoodType::Vibrant
        } else if hsl.s < 35.0 {
            MoodType::Muted
        } else if is_warm_hue(hsl.h) {
            MoodType::Warm
        } else {
            MoodType::Cool
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodType::Warm => "warm",
            MoodType::Cool => "cool",
            MoodType::Neutral => "neutral",
            MoodType::Vibrant => "vibrant",
            MoodType::Muted => "muted",
            MoodType::Elegant => "elegant",
        }
    }

    /// Capitalized form used in theme names
    pub fn adjective(&self) -> &'static str {
        match self {
            MoodType::Warm => "Warm",
            MoodType::Cool => "Cool",
            MoodType::Neutral => "Neutral",
            MoodType::Vibrant => "Vibrant",
            MoodType::Muted => "Muted",
            MoodType::Elegant => "Elegant",
        }
    }
}

impl std::fmt::Display for MoodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MoodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown mood '{}'", s))
    }
}

// =============================================================================
// Scheme
// =============================================================================

/// The fifteen semantic color roles of a scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeColors {
    pub primary: Color,
    pub primary_hover: Color,
    pub secondary: Color,
    pub accent: Color,
    pub background: Color,
    pub surface: Color,
    pub surface_hover: Color,
    pub text: Color,
    pub text_secondary: Color,
    pub text_on_primary: Color,
    pub border: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
}

impl SchemeColors {
    /// Role name and color pairs, in declaration order
    pub fn roles(&self) -> [(&'static str, Color); 15] {
        [
            ("primary", self.primary),
            ("primaryHover", self.primary_hover),
            ("secondary", self.secondary),
            ("accent", self.accent),
            ("background", self.background),
            ("surface", self.surface),
            ("surfaceHover", self.surface_hover),
            ("text", self.text),
            ("textSecondary", self.text_secondary),
            ("textOnPrimary", self.text_on_primary),
            ("border", self.border),
            ("success", self.success),
            ("warning", self.warning),
            ("error", self.error),
            ("info", self.info),
        ]
    }
}

/// Status colors shared by every scheme
pub mod status {
    use crate::color::Color;

    pub const SUCCESS: Color = Color::from_rgb(0x10, 0xB9, 0x81);
    pub const WARNING: Color = Color::from_rgb(0xF5, 0x9E, 0x0B);
    pub const ERROR: Color = Color::from_rgb(0xEF, 0x44, 0x44);
    pub const INFO: Color = Color::from_rgb(0x3B, 0x82, 0xF6);
}

/// A named bundle of UI color roles with ranking scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorScheme {
    pub name: String,
    pub harmony: HarmonyType,
    pub mood: MoodType,
    pub colors: SchemeColors,
    /// Step score of the background/text contrast, one of 20/40/60/80/100
    pub contrast_score: u8,
    /// Harmony base score plus jitter, within [0, 100]
    pub harmony_score: f64,
}

impl ColorScheme {
    /// Background/text contrast ratio
    pub fn text_contrast(&self) -> f64 {
        self.colors.text.contrast_ratio(&self.colors.background)
    }

    /// Ranking key: harmony score plus contrast score
    pub fn total_score(&self) -> f64 {
        self.harmony_score + self.contrast_score as f64
    }
}

/// Step function of a background/text contrast ratio
pub fn contrast_score(ratio: f64) -> u8 {
    if ratio >= 7.0 {
        100
    } else if ratio >= 4.5 {
        80
    } else if ratio >= 3.0 {
        60
    } else if ratio >= 2.0 {
        40
    } else {
        20
    }
}

/// Synthesis preferences
#[derive(Debug, Clone, PartialEq)]
pub struct SchemeOptions {
    pub preferred_mood: Option<MoodType>,
    pub preferred_harmony: Option<HarmonyType>,
    /// Force text to tested near-black/near-white literals
    pub ensure_accessibility: bool,
    /// Threshold for choosing the text literal; validation stays at WCAG AA
    pub min_contrast_ratio: f64,
    /// Same seed and palette always yield the same schemes
    pub variation_seed: u64,
}

impl Default for SchemeOptions {
    fn default() -> Self {
        Self {
            preferred_mood: None,
            preferred_harmony: None,
            ensure_accessibility: true,
            min_contrast_ratio: 4.5,
            variation_seed: 0,
        }
    }
}
