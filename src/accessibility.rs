//! WCAG validation and repair of color schemes
//!
//! [`AccessibilityValidator::validate`] checks four role pairs. When any
//! fail, [`AccessibilityValidator::optimize`] walks the failing foreground's
//! lightness toward black or white in fixed steps. Every loop is bounded and
//! a final fallback resets the backgrounds to light neutrals, so the
//! optimized scheme always validates.

use crate::color::{Color, Hsl, WcagLevel};
use crate::scheme::{contrast_score, ColorScheme, SchemeColors};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Lightness points moved per repair step
pub const LIGHTNESS_STEP: f64 = 5.0;

/// Repair steps allowed per role pair
pub const MAX_STEPS: usize = 20;

/// Repair passes over all pairs before the neutral-background fallback
pub const MAX_PASSES: usize = 3;

// =============================================================================
// Role pairs
// =============================================================================

/// A background/foreground role pair with a required contrast ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RolePair {
    BackgroundText,
    SurfaceText,
    BackgroundTextSecondary,
    PrimaryTextOnPrimary,
}

impl RolePair {
    pub const ALL: [RolePair; 4] = [
        RolePair::BackgroundText,
        RolePair::SurfaceText,
        RolePair::BackgroundTextSecondary,
        RolePair::PrimaryTextOnPrimary,
    ];

    pub fn required_ratio(&self) -> f64 {
        match self {
            RolePair::BackgroundText | RolePair::SurfaceText => WcagLevel::AA_NORMAL,
            RolePair::BackgroundTextSecondary | RolePair::PrimaryTextOnPrimary => {
                WcagLevel::AA_LARGE
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RolePair::BackgroundText => "background/text",
            RolePair::SurfaceText => "surface/text",
            RolePair::BackgroundTextSecondary => "background/textSecondary",
            RolePair::PrimaryTextOnPrimary => "primary/textOnPrimary",
        }
    }

    fn background(&self, colors: &SchemeColors) -> Color {
        match self {
            RolePair::BackgroundText | RolePair::BackgroundTextSecondary => colors.background,
            RolePair::SurfaceText => colors.surface,
            RolePair::PrimaryTextOnPrimary => colors.primary,
        }
    }

    fn foreground<'a>(&self, colors: &'a mut SchemeColors) -> &'a mut Color {
        match self {
            RolePair::BackgroundText | RolePair::SurfaceText => &mut colors.text,
            RolePair::BackgroundTextSecondary => &mut colors.text_secondary,
            RolePair::PrimaryTextOnPrimary => &mut colors.text_on_primary,
        }
    }

    fn ratio(&self, colors: &SchemeColors) -> f64 {
        let mut copy = *colors;
        let fg = *self.foreground(&mut copy);
        fg.contrast_ratio(&self.background(colors))
    }
}

impl std::fmt::Display for RolePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Results
// =============================================================================

/// One failing role pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContrastIssue {
    pub pair: RolePair,
    pub ratio: f64,
    pub required: f64,
}

impl std::fmt::Display for ContrastIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} contrast {:.2}:1 is below {:.1}:1",
            self.pair, self.ratio, self.required
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub issues: Vec<ContrastIssue>,
}

/// Accessibility summary attached to a theme
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilityVerdict {
    pub is_accessible: bool,
    pub wcag_level: WcagLevel,
    /// Background/text contrast ratio
    pub contrast_ratio: f64,
}

impl AccessibilityVerdict {
    pub fn for_scheme(scheme: &ColorScheme) -> Self {
        let ratio = scheme.text_contrast();
        Self {
            is_accessible: AccessibilityValidator::validate(scheme).is_valid,
            wcag_level: WcagLevel::from_ratio(ratio),
            contrast_ratio: ratio,
        }
    }
}

// =============================================================================
// Validator
// =============================================================================

pub struct AccessibilityValidator;

impl AccessibilityValidator {
    pub fn validate(scheme: &ColorScheme) -> ValidationResult {
        let issues = failing_pairs(&scheme.colors);
        ValidationResult {
            is_valid: issues.is_empty(),
            issues,
        }
    }

    /// Repair a scheme so it validates; valid input is returned unchanged
    pub fn optimize(scheme: &ColorScheme) -> ColorScheme {
        let initial = failing_pairs(&scheme.colors);
        if initial.is_empty() {
            return scheme.clone();
        }
        debug!(
            "Optimizing scheme '{}': {}",
            scheme.name,
            initial
                .iter()
                .map(|i| i.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        );

        let mut colors = scheme.colors;
        let mut passes = 0;
        while passes < MAX_PASSES && !failing_pairs(&colors).is_empty() {
            for pair in RolePair::ALL {
                repair_pair(&mut colors, pair);
            }
            passes += 1;
        }

        if !failing_pairs(&colors).is_empty() {
            warn!(
                "Scheme '{}' still fails after {} passes; resetting backgrounds to neutrals",
                scheme.name, passes
            );
            reset_backgrounds(&mut colors);
            for pair in RolePair::ALL {
                repair_pair(&mut colors, pair);
            }
        }

        let mut optimized = scheme.clone();
        optimized.colors = colors;
        optimized.contrast_score = contrast_score(optimized.text_contrast());
        optimized
    }
}

fn failing_pairs(colors: &SchemeColors) -> Vec<ContrastIssue> {
    RolePair::ALL
        .iter()
        .filter_map(|pair| {
            let ratio = pair.ratio(colors);
            let required = pair.required_ratio();
            (ratio < required).then_some(ContrastIssue {
                pair: *pair,
                ratio,
                required,
            })
        })
        .collect()
}

/// Step the pair's foreground toward the extreme that contrasts more with
/// its background, then fall back to that extreme outright
fn repair_pair(colors: &mut SchemeColors, pair: RolePair) {
    let required = pair.required_ratio();
    if pair.ratio(colors) >= required {
        return;
    }

    let background = pair.background(colors);
    let darken = background.is_light();
    let fg = pair.foreground(colors);

    for _ in 0..MAX_STEPS {
        *fg = if darken {
            fg.darken(LIGHTNESS_STEP)
        } else {
            fg.lighten(LIGHTNESS_STEP)
        };
        if fg.contrast_ratio(&background) >= required {
            return;
        }
    }

    *fg = background.best_text_color();
}

fn reset_backgrounds(colors: &mut SchemeColors) {
    let hue = colors.primary.to_hsl().h;
    colors.background = Hsl::new(hue, 6.0, 97.0).to_color();
    colors.surface = Hsl::new(hue, 6.0, 99.0).to_color();
}
