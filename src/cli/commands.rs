//! Command handler implementations
//!
//! This module contains the implementation of all CLI commands.

use crate::cli::progress::{
    print_divider, print_error, print_header, print_info, print_success, print_warning,
    GenerationSpinner,
};
use crate::cli::{Args, Commands};
use crate::color::{Color, WcagLevel};
use crate::core::config::{get_config_path, init_config, Config};
use crate::extraction::{
    ColorExtractor, ColorPalette, ColorSample, DecodedImageCache, ImageSource, SamplingStrategy,
};
use crate::scheme::{HarmonyType, MoodType};
use crate::settings::{SettingsStore, BACKGROUND_IMAGE_KEY};
use crate::theme::{IntelligentTheme, ThemeGenerator};
use anyhow::{anyhow, bail, Result};
use clap::CommandFactory;
use log::{debug, info};
use std::fs;
use std::path::PathBuf;

/// Per-invocation overrides of the `generate` command
#[derive(Debug, Clone, Default)]
pub struct GenerateOverrides {
    pub strategy: Option<SamplingStrategy>,
    pub max_themes: Option<usize>,
    pub seed: Option<u64>,
    pub mood: Option<MoodType>,
    pub harmony: Option<HarmonyType>,
    pub no_accessibility: bool,
}

pub fn run_command(args: &Args, config: &Config) -> Result<()> {
    match &args.command {
        Some(Commands::Generate {
            image,
            strategy,
            max_themes,
            seed,
            mood,
            harmony,
            no_accessibility,
            json,
            apply,
        }) => {
            let overrides = GenerateOverrides {
                strategy: *strategy,
                max_themes: *max_themes,
                seed: *seed,
                mood: *mood,
                harmony: *harmony,
                no_accessibility: *no_accessibility,
            };
            generate_themes(config, image.as_deref(), &overrides, *json, *apply)?;
        }
        Some(Commands::Palette {
            image,
            strategy,
            json,
        }) => {
            show_palette(config, image, *strategy, *json)?;
        }
        Some(Commands::Contrast {
            foreground,
            background,
        }) => {
            check_contrast(foreground, background)?;
        }
        Some(Commands::Config { path, reset }) => {
            handle_config_command(*path, *reset)?;
        }
        Some(Commands::GenerateConfig { output }) => {
            generate_config_file(output.clone())?;
        }
        Some(Commands::ShowConfig) => {
            show_config(config);
        }
        None => {
            Args::command().print_help()?;
        }
    }

    Ok(())
}

// ============================================================================
// generate
// ============================================================================

/// Generate themes and optionally apply the top one
pub fn generate_themes(
    config: &Config,
    image: Option<&str>,
    overrides: &GenerateOverrides,
    json: bool,
    apply: bool,
) -> Result<Vec<IntelligentTheme>> {
    let settings_path = config.settings_path();
    let source = match image {
        Some(reference) => ImageSource::parse(reference)?,
        None => {
            let store = SettingsStore::open(&settings_path)?;
            store.background_image()?.ok_or_else(|| {
                anyhow!(
                    "No image given and no '{}' set in {}",
                    BACKGROUND_IMAGE_KEY,
                    settings_path.display()
                )
            })?
        }
    };

    let mut options = config.to_generation_options();
    if let Some(strategy) = overrides.strategy {
        options.extraction_strategy = strategy;
    }
    if let Some(max) = overrides.max_themes {
        if max == 0 {
            bail!("--max-themes must be at least 1");
        }
        options.max_themes = max;
    }
    if let Some(seed) = overrides.seed {
        options.variation_seed = seed;
    }
    if overrides.mood.is_some() {
        options.preferred_mood = overrides.mood;
    }
    if overrides.harmony.is_some() {
        options.preferred_harmony = overrides.harmony;
    }
    if overrides.no_accessibility {
        options.ensure_accessibility = false;
    }
    debug!("Generation options: {:?}", options);

    let mut generator = ThemeGenerator::new()
        .with_extraction_defaults(config.extraction.to_extraction_options())
        .with_cache(DecodedImageCache::new(config.extraction.cache_capacity));

    // JSON output stays clean of spinner frames
    let spinner = (!json).then(GenerationSpinner::new);
    if let Some(spinner) = &spinner {
        generator = generator.with_observer(spinner.observer());
    }

    let result = generator.generate_themes(&source, &options);
    if let Some(spinner) = &spinner {
        spinner.finish();
    }

    let themes = match result {
        Ok(themes) => themes,
        Err(e) => {
            if !json {
                print_error(&e.to_string());
                if e.suggests_different_image() {
                    print_info("Try a different image, or set filter_extremes = false");
                } else {
                    print_info("Run again with --seed to try another variation");
                }
            }
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&themes)?);
    } else {
        print_header(&format!("Themes for {}", source.describe()));
        for (index, theme) in themes.iter().enumerate() {
            print_theme(index + 1, theme);
        }
        print_info(&format!(
            "Regenerate with --seed {} for a different set",
            options.next_variation().variation_seed
        ));
    }

    if apply {
        match themes.first() {
            Some(top) => {
                let mut store = SettingsStore::open(&settings_path)?;
                store.apply_theme(top)?;
                store.save()?;
                if !json {
                    print_success(&format!(
                        "Applied '{}' to {}",
                        top.name,
                        settings_path.display()
                    ));
                }
            }
            None => print_warning("No theme to apply"),
        }
    }

    Ok(themes)
}

fn print_theme(rank: usize, theme: &IntelligentTheme) {
    let scheme = &theme.color_scheme;
    println!("  {}. {}  [{}]", rank, theme.name, theme.id);
    println!("     {}", theme.description);
    println!(
        "     mood: {}  harmony: {}  harmony score: {:.1}  contrast score: {}",
        scheme.mood, scheme.harmony, scheme.harmony_score, scheme.contrast_score
    );
    let verdict = &theme.accessibility;
    let marker = if verdict.is_accessible { "✓" } else { "✗" };
    println!(
        "     {} WCAG {} ({:.2}:1)",
        marker, verdict.wcag_level, verdict.contrast_ratio
    );
    for chunk in scheme.colors.roles().chunks(5) {
        let line: Vec<String> = chunk
            .iter()
            .map(|(role, color)| format!("{}={}", role, color))
            .collect();
        println!("       {}", line.join("  "));
    }
    println!();
}

// ============================================================================
// palette
// ============================================================================

/// Extract and print a palette
pub fn show_palette(
    config: &Config,
    image: &str,
    strategy: Option<SamplingStrategy>,
    json: bool,
) -> Result<ColorPalette> {
    let source = ImageSource::parse(image)?;
    let mut options = config.extraction.to_extraction_options();
    if let Some(strategy) = strategy {
        options.strategy = strategy;
    }

    let palette = ColorExtractor::extract(&source, &options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&palette)?);
        return Ok(palette);
    }

    print_header(&format!("Palette ({})", options.strategy));
    print_sample("dominant", &palette.dominant);
    for sample in &palette.secondary {
        print_sample("secondary", sample);
    }
    print_sample("accent", &palette.accent);
    print_sample("neutral", &palette.neutral);
    print_divider();

    let buckets: [(&str, &Vec<ColorSample>); 6] = [
        ("warm", &palette.warm),
        ("cool", &palette.cool),
        ("vibrant", &palette.vibrant),
        ("muted", &palette.muted),
        ("light", &palette.light),
        ("dark", &palette.dark),
    ];
    for (name, samples) in buckets {
        let hexes: Vec<String> = samples.iter().map(|s| s.hex()).collect();
        print_info(&format!("{:<8} {}", name, hexes.join(" ")));
    }

    Ok(palette)
}

fn print_sample(role: &str, sample: &ColorSample) {
    print_info(&format!(
        "{:<10} {}  hsl({:.0}, {:.0}%, {:.0}%)  area {:.1}%  {:?}",
        role,
        sample.hex(),
        sample.hsl.h,
        sample.hsl.s,
        sample.hsl.l,
        sample.area * 100.0,
        sample.position
    ));
}

// ============================================================================
// contrast
// ============================================================================

/// Print the WCAG contrast of two colors
pub fn check_contrast(foreground: &str, background: &str) -> Result<f64> {
    let fg = Color::from_hex(foreground)
        .ok_or_else(|| anyhow!("Invalid foreground color '{}'", foreground))?;
    let bg = Color::from_hex(background)
        .ok_or_else(|| anyhow!("Invalid background color '{}'", background))?;

    let ratio = fg.contrast_ratio(&bg);
    let level = WcagLevel::from_ratio(ratio);

    println!("  {} on {}: {:.2}:1 ({})", fg, bg, ratio, level);
    let check = |label: &str, required: f64| {
        if ratio >= required {
            print_success(&format!("{} (≥ {}:1)", label, required));
        } else {
            print_error(&format!("{} (≥ {}:1)", label, required));
        }
    };
    check("AA normal text", WcagLevel::AA_NORMAL);
    check("AA large text", WcagLevel::AA_LARGE);
    check("AAA normal text", WcagLevel::AAA_NORMAL);

    if level == WcagLevel::Fail {
        print_info(&format!("Best text color on {}: {}", bg, bg.best_text_color()));
    }

    Ok(ratio)
}

// ============================================================================
// config
// ============================================================================

/// Handle the `config` command - show path, or create/reset the config file
pub fn handle_config_command(show_path: bool, reset: bool) -> Result<()> {
    if reset {
        let path = init_config(true)?;
        info!("Created fresh config file at: {}", path.display());
        return Ok(());
    }

    if show_path {
        let path = Config::get_active_config_path();
        println!("{}", path.display());
        if path.exists() {
            info!("Config file exists at: {}", path.display());
        } else {
            info!("Config file would be created at: {}", path.display());
        }
        return Ok(());
    }

    let path = init_config(false)?;
    info!("Config file: {}", path.display());
    info!("Edit this file to customize theme generation.");
    info!("Run 'tab-theme show-config' to verify your settings.");
    Ok(())
}

/// Generate a configuration file at the specified or default location
pub fn generate_config_file(output: Option<PathBuf>) -> Result<()> {
    let output_path = match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(&path, Config::generate_default_config())?;
            path
        }
        None => init_config(false)?,
    };

    info!("Configuration file: {}", output_path.display());
    info!("Edit this file to customize theme generation.");
    Ok(())
}

/// Show the current configuration settings
pub fn show_config(config: &Config) {
    let config_path = Config::get_active_config_path();
    info!("Configuration file: {}", config_path.display());
    if !config_path.exists() {
        info!("(Using default settings - no config file found)");
        if let Some(standard) = get_config_path() {
            debug!("Standard location: {}", standard.display());
        }
    }
    info!("");
    info!("Current Configuration:");
    info!("----------------------");
    info!("[extraction]");
    info!("  strategy = \"{}\"", config.extraction.strategy);
    info!("  filter_extremes = {}", config.extraction.filter_extremes);
    info!(
        "  weight_by_position = {}",
        config.extraction.weight_by_position
    );
    info!(
        "  weight_by_saturation = {}",
        config.extraction.weight_by_saturation
    );
    info!("  max_colors = {}", config.extraction.max_colors);
    info!("  sample_rate = {}", config.extraction.sample_rate);
    info!("  cache_capacity = {}", config.extraction.cache_capacity);
    info!("");
    info!("[generation]");
    info!("  max_themes = {}", config.generation.max_themes);
    info!(
        "  ensure_accessibility = {}",
        config.generation.ensure_accessibility
    );
    info!(
        "  min_contrast_ratio = {}",
        config.generation.min_contrast_ratio
    );
    info!("  variation_seed = {}", config.generation.variation_seed);
    info!(
        "  preferred_mood = {}",
        config
            .generation
            .preferred_mood
            .map_or("(any)".to_string(), |m| format!("\"{}\"", m))
    );
    info!(
        "  preferred_harmony = {}",
        config
            .generation
            .preferred_harmony
            .map_or("(any)".to_string(), |h| format!("\"{}\"", h))
    );
    info!("");
    info!("[logging]");
    info!("  level = \"{}\"", config.logging.level);
    info!("  log_to_file = {}", config.logging.log_to_file);
    info!("  log_file = \"{}\"", config.logging.log_file.display());
    info!("");
    info!("[storage]");
    info!(
        "  settings_file = \"{}\"",
        config.settings_path().display()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::source::test_images::{encode_png, solid};
    use serde_json::json;
    use tempfile::TempDir;

    fn config_in(temp: &TempDir) -> Config {
        let mut config = Config::default();
        config.storage.settings_file = temp.path().join("settings.json");
        config
    }

    fn write_image(temp: &TempDir, rgba: [u8; 4]) -> String {
        let path = temp.path().join("wallpaper.png");
        fs::write(&path, encode_png(&solid(32, 24, rgba))).unwrap();
        path.display().to_string()
    }

    #[test]
    fn test_generate_and_apply() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp);
        let image = write_image(&temp, [220, 40, 40, 255]);

        let overrides = GenerateOverrides {
            max_themes: Some(2),
            seed: Some(5),
            ..Default::default()
        };
        let themes = generate_themes(&config, Some(&image), &overrides, true, true).unwrap();
        assert_eq!(themes.len(), 2);

        let store = SettingsStore::open(config.settings_path()).unwrap();
        assert_eq!(
            store.get(crate::settings::ACTIVE_THEME_KEY),
            Some(&json!(themes[0].id))
        );
    }

    #[test]
    fn test_generate_falls_back_to_background_image() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp);
        let image = write_image(&temp, [40, 90, 200, 255]);

        let mut store = SettingsStore::open(config.settings_path()).unwrap();
        store.set(BACKGROUND_IMAGE_KEY, json!(image));
        store.save().unwrap();

        let themes =
            generate_themes(&config, None, &GenerateOverrides::default(), true, false).unwrap();
        assert!(!themes.is_empty());
    }

    #[test]
    fn test_generate_without_any_image_fails() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp);
        let err =
            generate_themes(&config, None, &GenerateOverrides::default(), true, false).unwrap_err();
        assert!(err.to_string().contains(BACKGROUND_IMAGE_KEY));
    }

    #[test]
    fn test_generate_rejects_zero_max_themes() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp);
        let image = write_image(&temp, [220, 40, 40, 255]);
        let overrides = GenerateOverrides {
            max_themes: Some(0),
            ..Default::default()
        };
        assert!(generate_themes(&config, Some(&image), &overrides, true, false).is_err());
    }

    #[test]
    fn test_show_palette_with_strategy() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp);
        let image = write_image(&temp, [40, 160, 90, 255]);
        let palette =
            show_palette(&config, &image, Some(SamplingStrategy::Center), true).unwrap();
        assert!(palette.secondary.is_empty());
    }

    #[test]
    fn test_check_contrast() {
        let ratio = check_contrast("#000", "#FFFFFF").unwrap();
        assert!((ratio - 21.0).abs() < 0.01);
        assert!(check_contrast("nope", "#FFFFFF").is_err());
    }

    #[test]
    fn test_generate_config_file_at_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out").join("tab_theme.toml");
        generate_config_file(Some(path.clone())).unwrap();
        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, Config::default());
    }
}
