//! Theme generation pipeline
//!
//! Stages run in order, each to completion:
//!
//! ```text
//! Idle -> Sampling -> Synthesizing -> Validating -> Done
//!             \______________\______________\-----> Failed
//! ```
//!
//! A failure at any stage aborts the call with the originating error; no
//! partial theme list is returned.

use super::IntelligentTheme;
use crate::accessibility::AccessibilityValidator;
use crate::core::error::Result;
use crate::extraction::{
    prepare_pixels, ColorExtractor, ColorPalette, DecodedImageCache, ExtractionOptions,
    ImageSource, SamplingStrategy, MAX_SAMPLE_DIMENSION,
};
use crate::scheme::{HarmonyType, MoodType, SchemeOptions, SchemeSynthesizer};
use image::RgbaImage;
use log::{debug, error, info};
use std::sync::Arc;

/// Default number of themes returned
pub const DEFAULT_MAX_THEMES: usize = 6;

// =============================================================================
// Options
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ThemeGenerationOptions {
    pub max_themes: usize,
    pub ensure_accessibility: bool,
    pub extraction_strategy: SamplingStrategy,
    /// Same image and seed reproduce the same themes
    pub variation_seed: u64,
    pub preferred_mood: Option<MoodType>,
    pub preferred_harmony: Option<HarmonyType>,
    pub min_contrast_ratio: f64,
}

impl Default for ThemeGenerationOptions {
    fn default() -> Self {
        Self {
            max_themes: DEFAULT_MAX_THEMES,
            ensure_accessibility: true,
            extraction_strategy: SamplingStrategy::Dominant,
            variation_seed: 0,
            preferred_mood: None,
            preferred_harmony: None,
            min_contrast_ratio: 4.5,
        }
    }
}

impl ThemeGenerationOptions {
    /// Options for a "try again" regeneration
    pub fn next_variation(&self) -> Self {
        Self {
            variation_seed: self.variation_seed.wrapping_add(1),
            ..self.clone()
        }
    }

    pub fn scheme_options(&self) -> SchemeOptions {
        SchemeOptions {
            preferred_mood: self.preferred_mood,
            preferred_harmony: self.preferred_harmony,
            ensure_accessibility: self.ensure_accessibility,
            min_contrast_ratio: self.min_contrast_ratio,
            variation_seed: self.variation_seed,
        }
    }
}

// =============================================================================
// Stages
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationStage {
    Idle,
    Sampling,
    Synthesizing,
    Validating,
    Done,
    Failed,
}

impl GenerationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStage::Idle => "idle",
            GenerationStage::Sampling => "sampling",
            GenerationStage::Synthesizing => "synthesizing",
            GenerationStage::Validating => "validating",
            GenerationStage::Done => "done",
            GenerationStage::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationStage::Done | GenerationStage::Failed)
    }
}

impl std::fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

type StageObserver = Box<dyn FnMut(GenerationStage)>;

// =============================================================================
// Generator
// =============================================================================

/// Runs the palette -> scheme -> theme pipeline
///
/// Owns a [`DecodedImageCache`] so regenerating from the same source skips
/// decoding. Call [`ThemeGenerator::release`] once a source is no longer
/// needed.
pub struct ThemeGenerator {
    cache: DecodedImageCache,
    extraction: ExtractionOptions,
    stage: GenerationStage,
    observer: Option<StageObserver>,
}

impl Default for ThemeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeGenerator {
    pub fn new() -> Self {
        Self {
            cache: DecodedImageCache::default(),
            extraction: ExtractionOptions::default(),
            stage: GenerationStage::Idle,
            observer: None,
        }
    }

    /// Sampling defaults; the strategy is still taken from each request
    pub fn with_extraction_defaults(mut self, extraction: ExtractionOptions) -> Self {
        self.extraction = extraction;
        self
    }

    pub fn with_cache(mut self, cache: DecodedImageCache) -> Self {
        self.cache = cache;
        self
    }

    /// Notify `observer` on every stage transition
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: FnMut(GenerationStage) + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn stage(&self) -> GenerationStage {
        self.stage
    }

    /// Drop the cached pixels of a source
    pub fn release(&mut self, source: &ImageSource) -> bool {
        self.cache.release(&source.cache_key())
    }

    pub fn cached_sources(&self) -> usize {
        self.cache.len()
    }

    /// Generate ranked themes for an image
    pub fn generate_themes(
        &mut self,
        source: &ImageSource,
        options: &ThemeGenerationOptions,
    ) -> Result<Vec<IntelligentTheme>> {
        info!(
            "Generating themes for {} (strategy {}, seed {})",
            source.describe(),
            options.extraction_strategy,
            options.variation_seed
        );

        let result = self.extract_palette(source, options).and_then(|palette| {
            self.transition(GenerationStage::Synthesizing);
            Ok(self.themes_for(&palette, options))
        });
        self.finish(result)
    }

    /// Generate ranked themes for an already extracted palette
    pub fn generate_from_palette(
        &mut self,
        palette: &ColorPalette,
        options: &ThemeGenerationOptions,
    ) -> Result<Vec<IntelligentTheme>> {
        self.transition(GenerationStage::Synthesizing);
        let themes = self.themes_for(palette, options);
        self.finish(Ok(themes))
    }

    /// Sampling stage
    pub fn extract_palette(
        &mut self,
        source: &ImageSource,
        options: &ThemeGenerationOptions,
    ) -> Result<ColorPalette> {
        self.transition(GenerationStage::Sampling);
        let pixels = self.pixels_for(source)?;
        let extraction = ExtractionOptions {
            strategy: options.extraction_strategy,
            ..self.extraction.clone()
        };
        ColorExtractor::extract_from_pixels(&pixels, &extraction)
    }

    fn pixels_for(&mut self, source: &ImageSource) -> Result<Arc<RgbaImage>> {
        let key = source.cache_key();
        if let Some(pixels) = self.cache.get(&key) {
            debug!("Reusing decoded pixels for {}", source.describe());
            return Ok(pixels);
        }

        let image = source.load()?;
        let pixels = Arc::new(prepare_pixels(&image, MAX_SAMPLE_DIMENSION)?);
        self.cache.put(key, Arc::clone(&pixels));
        Ok(pixels)
    }

    /// Synthesizing and validating stages
    fn themes_for(
        &mut self,
        palette: &ColorPalette,
        options: &ThemeGenerationOptions,
    ) -> Vec<IntelligentTheme> {
        let schemes = SchemeSynthesizer::synthesize(palette, &options.scheme_options());

        self.transition(GenerationStage::Validating);
        let mut repaired = 0;
        let themes: Vec<IntelligentTheme> = schemes
            .into_iter()
            .map(|scheme| {
                if AccessibilityValidator::validate(&scheme).is_valid {
                    scheme
                } else {
                    repaired += 1;
                    AccessibilityValidator::optimize(&scheme)
                }
            })
            .take(options.max_themes)
            .enumerate()
            .map(|(rank, scheme)| {
                IntelligentTheme::from_scheme(scheme, palette, options.variation_seed, rank)
            })
            .collect();

        debug!("Repaired {} schemes for accessibility", repaired);
        themes
    }

    fn finish(
        &mut self,
        result: Result<Vec<IntelligentTheme>>,
    ) -> Result<Vec<IntelligentTheme>> {
        match result {
            Ok(themes) => {
                self.transition(GenerationStage::Done);
                info!("Generated {} themes", themes.len());
                Ok(themes)
            }
            Err(e) => {
                error!("Theme generation failed during {}: {}", self.stage, e);
                self.transition(GenerationStage::Failed);
                Err(e)
            }
        }
    }

    fn transition(&mut self, next: GenerationStage) {
        debug!("Generation stage: {} -> {}", self.stage, next);
        self.stage = next;
        if let Some(observer) = self.observer.as_mut() {
            observer(next);
        }
    }
}
