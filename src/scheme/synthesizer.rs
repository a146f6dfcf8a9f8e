//! Scheme synthesis
//!
//! Derives up to seven schemes from a palette, one per populated source:
//!
//! | Scheme        | Source           | Harmony             |
//! |---------------|------------------|---------------------|
//! | Monochromatic | dominant         | monochromatic       |
//! | Analogous     | dominant + secondary | analogous       |
//! | Warm          | warm bucket      | analogous           |
//! | Cool          | cool bucket      | analogous           |
//! | Vibrant       | vibrant bucket   | triadic             |
//! | Muted         | muted bucket     | split-complementary |
//! | Complementary | dominant         | complementary       |
//!
//! Background, surface and border are low-saturation tints of the base hue;
//! status colors are fixed.

use super::variation::Variation;
use super::{
    contrast_score, status, ColorScheme, HarmonyType, MoodType, SchemeColors, SchemeOptions,
};
use crate::color::{Color, Hsl};
use crate::extraction::ColorPalette;
use log::{debug, warn};

/// Maximum schemes returned by one synthesis
pub const MAX_SCHEMES: usize = 8;

/// Tested near-black text literal
pub const NEAR_BLACK: Color = Color::from_rgb(0x1F, 0x29, 0x37);
/// Tested near-white text literal
pub const NEAR_WHITE: Color = Color::from_rgb(0xF9, 0xFA, 0xFB);
/// Secondary text on light backgrounds
const SECONDARY_ON_LIGHT: Color = Color::from_rgb(0x4B, 0x55, 0x63);
/// Secondary text on dark backgrounds
const SECONDARY_ON_DARK: Color = Color::from_rgb(0xD1, 0xD5, 0xDB);

/// The seven scheme constructions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchemeKind {
    Monochromatic,
    Analogous,
    Warm,
    Cool,
    Vibrant,
    Muted,
    Complementary,
}

impl SchemeKind {
    fn label(&self) -> &'static str {
        match self {
            SchemeKind::Monochromatic => "Monochromatic",
            SchemeKind::Analogous => "Analogous",
            SchemeKind::Warm => "Warm",
            SchemeKind::Cool => "Cool",
            SchemeKind::Vibrant => "Vibrant",
            SchemeKind::Muted => "Muted",
            SchemeKind::Complementary => "Complementary",
        }
    }

    fn salt(&self) -> u64 {
        *self as u64
    }

    /// Salt of the ranking jitter, disjoint from every hue salt
    fn score_salt(&self) -> u64 {
        SCORE_SALT | self.salt()
    }
}

/// High bit that separates ranking-jitter streams from hue streams
const SCORE_SALT: u64 = 1 << 32;

/// Seeded ±5 harmony jitter of one scheme kind
fn harmony_jitter(kind: SchemeKind, seed: u64) -> f64 {
    Variation::new(seed, kind.score_salt()).spread(5.0)
}

/// Hues and tags of a scheme before role derivation
struct SchemeDraft {
    kind: SchemeKind,
    harmony: HarmonyType,
    mood: MoodType,
    primary: Hsl,
    secondary: Hsl,
    accent: Hsl,
}

/// Turns a palette into ranked color schemes
pub struct SchemeSynthesizer;

impl SchemeSynthesizer {
    /// Synthesize, filter by preference and rank
    pub fn synthesize(palette: &ColorPalette, options: &SchemeOptions) -> Vec<ColorScheme> {
        let seed = options.variation_seed;
        let variation = |kind: SchemeKind| Variation::new(seed, kind.salt());
        let mut drafts = Vec::new();

        let dominant = palette.dominant.hsl;
        drafts.push(monochromatic(dominant, &mut variation(SchemeKind::Monochromatic)));

        if let Some(second) = palette.secondary.first() {
            drafts.push(analogous(
                dominant,
                second.hsl,
                &mut variation(SchemeKind::Analogous),
            ));
        }
        if let Some(warm) = palette.warm.first() {
            drafts.push(warm_scheme(warm.hsl, &mut variation(SchemeKind::Warm)));
        }
        if let Some(cool) = palette.cool.first() {
            drafts.push(cool_scheme(cool.hsl, &mut variation(SchemeKind::Cool)));
        }
        if let Some(vibrant) = palette.vibrant.first() {
            drafts.push(vibrant_scheme(vibrant.hsl, &mut variation(SchemeKind::Vibrant)));
        }
        if let Some(muted) = palette.muted.first() {
            drafts.push(muted_scheme(muted.hsl, &mut variation(SchemeKind::Muted)));
        }
        drafts.push(complementary(
            dominant,
            &mut variation(SchemeKind::Complementary),
        ));

        let schemes: Vec<ColorScheme> = drafts
            .into_iter()
            .map(|draft| finish(draft, options))
            .collect();

        let mut ranked = apply_preferences(schemes, options);
        ranked.sort_by(|a, b| b.total_score().total_cmp(&a.total_score()));
        ranked.truncate(MAX_SCHEMES);

        debug!(
            "Synthesized {} schemes (seed {}): {}",
            ranked.len(),
            seed,
            ranked
                .iter()
                .map(|s| format!("{}={:.1}", s.name, s.total_score()))
                .collect::<Vec<_>>()
                .join(", ")
        );
        ranked
    }
}

/// Keep schemes matching the preferred mood/harmony; never empty the list
fn apply_preferences(schemes: Vec<ColorScheme>, options: &SchemeOptions) -> Vec<ColorScheme> {
    if options.preferred_mood.is_none() && options.preferred_harmony.is_none() {
        return schemes;
    }

    let matching: Vec<ColorScheme> = schemes
        .iter()
        .filter(|s| options.preferred_mood.map_or(true, |m| s.mood == m))
        .filter(|s| options.preferred_harmony.map_or(true, |h| s.harmony == h))
        .cloned()
        .collect();

    if matching.is_empty() {
        warn!(
            "No scheme matches mood {:?} / harmony {:?}; keeping all {} schemes",
            options.preferred_mood,
            options.preferred_harmony,
            schemes.len()
        );
        schemes
    } else {
        matching
    }
}

// =============================================================================
// Scheme constructions
// =============================================================================

fn monochromatic(base: Hsl, v: &mut Variation) -> SchemeDraft {
    let primary = base
        .clamp_saturation(20.0, 100.0)
        .clamp_lightness(25.0, 70.0)
        .rotate(v.spread(6.0));
    let secondary = primary
        .with_saturation((primary.s * 0.7).max(20.0))
        .with_lightness((primary.l + 15.0).min(85.0));
    let accent = primary
        .with_saturation((primary.s + 10.0).min(100.0))
        .with_lightness((primary.l - 15.0).max(15.0));

    SchemeDraft {
        kind: SchemeKind::Monochromatic,
        harmony: HarmonyType::Monochromatic,
        mood: MoodType::from_hsl(&primary),
        primary,
        secondary,
        accent,
    }
}

fn analogous(base: Hsl, second: Hsl, v: &mut Variation) -> SchemeDraft {
    let spread = 30.0 + v.offset(45.0);
    let base = base.clamp_saturation(35.0, 90.0).clamp_lightness(30.0, 65.0);
    let saturation = (base.s + second.s.clamp(35.0, 90.0)) / 2.0;
    let primary = base.with_saturation(saturation);
    let secondary = primary.rotate(spread);
    let accent = primary
        .rotate(-spread)
        .with_lightness((primary.l + 10.0).min(70.0));

    SchemeDraft {
        kind: SchemeKind::Analogous,
        harmony: HarmonyType::Analogous,
        mood: MoodType::from_hsl(&primary),
        primary,
        secondary,
        accent,
    }
}

fn warm_scheme(base: Hsl, v: &mut Variation) -> SchemeDraft {
    let primary = Hsl::new(
        clamp_warm_hue(base.h),
        base.s.clamp(45.0, 90.0),
        base.l.clamp(35.0, 60.0),
    );
    let spread = v.offset(15.0);
    let secondary = primary.rotate(20.0 + spread);
    let accent = primary
        .rotate(-(25.0 + spread))
        .with_lightness((primary.l + 8.0).min(65.0));

    SchemeDraft {
        kind: SchemeKind::Warm,
        harmony: HarmonyType::Analogous,
        mood: MoodType::Warm,
        primary,
        secondary,
        accent,
    }
}

fn cool_scheme(base: Hsl, v: &mut Variation) -> SchemeDraft {
    let primary = Hsl::new(
        clamp_cool_hue(base.h),
        base.s.clamp(35.0, 85.0),
        base.l.clamp(35.0, 60.0),
    );
    let spread = v.offset(15.0);
    let secondary = primary.rotate(25.0 + spread);
    let accent = primary
        .rotate(-(40.0 + spread))
        .with_lightness((primary.l + 8.0).min(65.0));

    SchemeDraft {
        kind: SchemeKind::Cool,
        harmony: HarmonyType::Analogous,
        mood: MoodType::Cool,
        primary,
        secondary,
        accent,
    }
}

fn vibrant_scheme(base: Hsl, v: &mut Variation) -> SchemeDraft {
    let primary = base.with_saturation(base.s.max(70.0)).clamp_lightness(40.0, 60.0);
    let jitter = v.spread(15.0);
    let secondary = primary.rotate(120.0 + jitter);
    let accent = primary.rotate(240.0 + jitter);

    SchemeDraft {
        kind: SchemeKind::Vibrant,
        harmony: HarmonyType::Triadic,
        mood: MoodType::Vibrant,
        primary,
        secondary,
        accent,
    }
}

fn muted_scheme(base: Hsl, v: &mut Variation) -> SchemeDraft {
    let primary = base.clamp_saturation(10.0, 35.0).clamp_lightness(35.0, 60.0);
    let jitter = v.spread(10.0);
    let secondary = primary.rotate(150.0 + jitter);
    let accent = primary.rotate(210.0 + jitter);

    SchemeDraft {
        kind: SchemeKind::Muted,
        harmony: HarmonyType::SplitComplementary,
        mood: MoodType::Muted,
        primary,
        secondary,
        accent,
    }
}

fn complementary(base: Hsl, v: &mut Variation) -> SchemeDraft {
    let primary = base.clamp_saturation(30.0, 85.0).clamp_lightness(35.0, 60.0);
    let jitter = v.spread(15.0);
    let secondary = primary.rotate(180.0 + jitter);
    let accent = primary
        .rotate(150.0 + jitter)
        .with_lightness((primary.l + 10.0).min(70.0));

    SchemeDraft {
        kind: SchemeKind::Complementary,
        harmony: HarmonyType::Complementary,
        mood: MoodType::from_hsl(&primary),
        primary,
        secondary,
        accent,
    }
}

/// Pull a hue into [0,60] or [300,360)
fn clamp_warm_hue(h: f64) -> f64 {
    if h <= 60.0 || h >= 300.0 {
        h
    } else if h < 180.0 {
        60.0
    } else {
        300.0
    }
}

/// Pull a hue into [180,300]
fn clamp_cool_hue(h: f64) -> f64 {
    h.clamp(180.0, 300.0)
}

// =============================================================================
// Role derivation
// =============================================================================

fn finish(draft: SchemeDraft, options: &SchemeOptions) -> ColorScheme {
    let hue = draft.primary.h;
    let background = Hsl::new(hue, 8.0, 97.0).to_color();
    let surface = Hsl::new(hue, 10.0, 99.0).to_color();
    let surface_hover = Hsl::new(hue, 14.0, 94.0).to_color();
    let border = Hsl::new(hue, 16.0, 86.0).to_color();

    let (text, text_secondary) = if options.ensure_accessibility {
        accessible_text(background, options.min_contrast_ratio)
    } else {
        (
            Hsl::new(hue, 30.0, 15.0).to_color(),
            Hsl::new(hue, 15.0, 40.0).to_color(),
        )
    };

    let primary = draft.primary.to_color();
    let colors = SchemeColors {
        primary,
        primary_hover: primary.darken(8.0),
        secondary: draft.secondary.to_color(),
        accent: draft.accent.to_color(),
        background,
        surface,
        surface_hover,
        text,
        text_secondary,
        text_on_primary: primary.best_text_color(),
        border,
        success: status::SUCCESS,
        warning: status::WARNING,
        error: status::ERROR,
        info: status::INFO,
    };

    let harmony_score = (draft.harmony.base_score()
        + harmony_jitter(draft.kind, options.variation_seed))
    .clamp(0.0, 100.0);

    ColorScheme {
        name: draft.kind.label().to_string(),
        harmony: draft.harmony,
        mood: draft.mood,
        contrast_score: contrast_score(text.contrast_ratio(&background)),
        harmony_score,
        colors,
    }
}

/// Near-black/near-white text literals for a background
fn accessible_text(background: Color, min_ratio: f64) -> (Color, Color) {
    let (text, secondary) = if background.is_light() {
        (NEAR_BLACK, SECONDARY_ON_LIGHT)
    } else {
        (NEAR_WHITE, SECONDARY_ON_DARK)
    };

    if text.contrast_ratio(&background) >= min_ratio {
        (text, secondary)
    } else {
        let best = background.best_text_color();
        (best, secondary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::sampler::ColorSample;
    use crate::extraction::PaletteBuilder;

    fn palette(hexes: &[&str]) -> ColorPalette {
        let ranked: Vec<ColorSample> = hexes
            .iter()
            .enumerate()
            .map(|(i, hex)| ColorSample::from_color(Color::from_hex(hex).unwrap(), 100.0 - i as f64))
            .collect();
        PaletteBuilder::build(&ranked).unwrap()
    }

    fn rich_palette() -> ColorPalette {
        palette(&["#C0392B", "#2E86C1", "#7D8C6A", "#F4D03F", "#1B2631"])
    }

    #[test]
    fn test_single_red_palette() {
        let schemes = SchemeSynthesizer::synthesize(&palette(&["#FF0000"]), &SchemeOptions::default());
        let names: Vec<&str> = schemes.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(schemes.len(), 4);
        assert!(names.contains(&"Monochromatic"));
        assert!(names.contains(&"Warm"));
        assert!(names.contains(&"Vibrant"));
        assert!(names.contains(&"Complementary"));
        assert!(schemes
            .iter()
            .any(|s| s.mood == MoodType::Warm || s.mood == MoodType::Vibrant));
    }

    #[test]
    fn test_rich_palette_generates_all_kinds() {
        let schemes = SchemeSynthesizer::synthesize(&rich_palette(), &SchemeOptions::default());
        assert_eq!(schemes.len(), 7);
        assert!(schemes.len() <= MAX_SCHEMES);
    }

    #[test]
    fn test_scores_within_bounds() {
        for seed in 0..20 {
            let options = SchemeOptions {
                variation_seed: seed,
                ..Default::default()
            };
            for scheme in SchemeSynthesizer::synthesize(&rich_palette(), &options) {
                assert!([20, 40, 60, 80, 100].contains(&scheme.contrast_score));
                let base = scheme.harmony.base_score();
                assert!(scheme.harmony_score >= base - 5.0 && scheme.harmony_score <= base + 5.0);
                assert!((0.0..=100.0).contains(&scheme.harmony_score));
            }
        }
    }

    #[test]
    fn test_ranked_by_total_score() {
        let schemes = SchemeSynthesizer::synthesize(&rich_palette(), &SchemeOptions::default());
        for pair in schemes.windows(2) {
            assert!(pair[0].total_score() >= pair[1].total_score());
        }
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let options = SchemeOptions {
            variation_seed: 11,
            ..Default::default()
        };
        let a = SchemeSynthesizer::synthesize(&rich_palette(), &options);
        let b = SchemeSynthesizer::synthesize(&rich_palette(), &options);
        assert_eq!(a, b);
    }

    #[test]
    fn test_new_seed_perturbs_hues_but_keeps_labels() {
        let first = SchemeSynthesizer::synthesize(
            &rich_palette(),
            &SchemeOptions {
                variation_seed: 1,
                ..Default::default()
            },
        );
        let second = SchemeSynthesizer::synthesize(
            &rich_palette(),
            &SchemeOptions {
                variation_seed: 2,
                ..Default::default()
            },
        );

        let find = |list: &[ColorScheme], name: &str| {
            list.iter().find(|s| s.name == name).cloned().unwrap()
        };
        let a = find(&first, "Analogous");
        let b = find(&second, "Analogous");
        assert_ne!(a.colors.secondary, b.colors.secondary);
        assert_eq!(a.harmony, b.harmony);
        assert_eq!(a.mood, b.mood);

        let warm_a = find(&first, "Warm");
        let warm_b = find(&second, "Warm");
        assert_eq!(warm_a.mood, MoodType::Warm);
        assert_eq!(warm_a.mood, warm_b.mood);
    }

    #[test]
    fn test_harmony_jitter_independent_of_hue_spread() {
        let samples: Vec<(f64, f64)> = (0..200u64)
            .map(|seed| {
                let spread = Variation::new(seed, SchemeKind::Analogous.salt()).offset(45.0);
                (spread, harmony_jitter(SchemeKind::Analogous, seed))
            })
            .collect();

        let n = samples.len() as f64;
        let mean_x = samples.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = samples.iter().map(|(_, y)| y).sum::<f64>() / n;
        let cov: f64 = samples
            .iter()
            .map(|(x, y)| (x - mean_x) * (y - mean_y))
            .sum();
        let var_x: f64 = samples.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
        let var_y: f64 = samples.iter().map(|(_, y)| (y - mean_y).powi(2)).sum();
        let correlation = cov / (var_x * var_y).sqrt();

        assert!(correlation.abs() < 0.3, "correlation {}", correlation);
        assert!(samples.iter().all(|(_, y)| (-5.0..=5.0).contains(y)));
    }

    #[test]
    fn test_harmony_score_uses_ranking_jitter() {
        let palette = palette(&["#C0392B", "#2E86C1"]);
        for seed in 0..12u64 {
            let options = SchemeOptions {
                variation_seed: seed,
                ..Default::default()
            };
            let schemes = SchemeSynthesizer::synthesize(&palette, &options);
            let analogous = schemes.iter().find(|s| s.name == "Analogous").unwrap();
            let expected = (HarmonyType::Analogous.base_score()
                + harmony_jitter(SchemeKind::Analogous, seed))
            .clamp(0.0, 100.0);
            assert!((analogous.harmony_score - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_strict_ratio_swaps_literal_for_black() {
        let options = SchemeOptions {
            min_contrast_ratio: 19.0,
            ..Default::default()
        };
        let schemes = SchemeSynthesizer::synthesize(&rich_palette(), &options);
        for scheme in &schemes {
            assert!(scheme.colors.background.is_light());
            assert_eq!(scheme.colors.text, Color::BLACK);
        }
    }

    #[test]
    fn test_accessible_text_literals() {
        let schemes = SchemeSynthesizer::synthesize(&rich_palette(), &SchemeOptions::default());
        for scheme in &schemes {
            assert_eq!(scheme.colors.text, NEAR_BLACK);
            assert!(scheme.text_contrast() >= 4.5);
            assert_eq!(scheme.contrast_score, 100);
        }
    }

    #[test]
    fn test_derived_text_without_accessibility() {
        let options = SchemeOptions {
            ensure_accessibility: false,
            ..Default::default()
        };
        let schemes = SchemeSynthesizer::synthesize(&rich_palette(), &options);
        assert!(schemes.iter().all(|s| s.colors.text != NEAR_BLACK));
    }

    #[test]
    fn test_background_is_light_tint() {
        let schemes = SchemeSynthesizer::synthesize(&rich_palette(), &SchemeOptions::default());
        for scheme in schemes {
            assert!(scheme.colors.background.to_hsl().l >= 95.0);
            assert!(scheme.colors.surface.to_hsl().l >= 95.0);
            assert_eq!(scheme.colors.success, status::SUCCESS);
        }
    }

    #[test]
    fn test_preferred_mood_filters() {
        let options = SchemeOptions {
            preferred_mood: Some(MoodType::Cool),
            ..Default::default()
        };
        let schemes = SchemeSynthesizer::synthesize(&rich_palette(), &options);
        assert!(!schemes.is_empty());
        assert!(schemes.iter().all(|s| s.mood == MoodType::Cool));
    }

    #[test]
    fn test_preferred_harmony_filters() {
        let options = SchemeOptions {
            preferred_harmony: Some(HarmonyType::Triadic),
            ..Default::default()
        };
        let schemes = SchemeSynthesizer::synthesize(&rich_palette(), &options);
        assert_eq!(schemes.len(), 1);
        assert_eq!(schemes[0].name, "Vibrant");
    }

    #[test]
    fn test_unsatisfiable_preference_falls_back() {
        let options = SchemeOptions {
            preferred_harmony: Some(HarmonyType::Tetradic),
            ..Default::default()
        };
        let schemes = SchemeSynthesizer::synthesize(&rich_palette(), &options);
        assert_eq!(schemes.len(), 7);
    }

    #[test]
    fn test_warm_and_cool_hue_clamps() {
        assert_eq!(clamp_warm_hue(30.0), 30.0);
        assert_eq!(clamp_warm_hue(330.0), 330.0);
        assert_eq!(clamp_warm_hue(100.0), 60.0);
        assert_eq!(clamp_warm_hue(200.0), 300.0);
        assert_eq!(clamp_cool_hue(90.0), 180.0);
        assert_eq!(clamp_cool_hue(350.0), 300.0);
        assert_eq!(clamp_cool_hue(220.0), 220.0);
    }

    #[test]
    fn test_monochromatic_bands() {
        let dark = Hsl::new(200.0, 5.0, 10.0);
        let draft = monochromatic(dark, &mut Variation::new(0, 0));
        assert!(draft.primary.s >= 20.0);
        assert!(draft.primary.l >= 25.0 && draft.primary.l <= 70.0);
    }
}
