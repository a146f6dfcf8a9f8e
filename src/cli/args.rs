//! Command-line argument definitions
//!
//! This module defines all CLI arguments and subcommands using clap.

use crate::extraction::SamplingStrategy;
use crate::scheme::{HarmonyType, MoodType};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Generate accessible new-tab themes from an image
#[derive(Parser, Debug)]
#[command(name = "tab-theme")]
#[command(author = "Vihaan Reddy M")]
#[command(version)]
#[command(about = "Generate accessible new-tab themes from a background image", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace (overrides config)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate ranked themes from an image
    ///
    /// Without IMAGE, the settings store's background image is used.
    Generate {
        /// Image path, file:// URL or data: URI
        image: Option<String>,

        /// Sampling strategy (overrides config)
        #[arg(short, long, value_parser = parse_strategy)]
        strategy: Option<SamplingStrategy>,

        /// Maximum number of themes (overrides config)
        #[arg(short, long)]
        max_themes: Option<usize>,

        /// Variation seed; bump it to get a different set
        #[arg(long)]
        seed: Option<u64>,

        /// Preferred mood: warm, cool, neutral, vibrant, muted, elegant
        #[arg(long, value_parser = parse_mood)]
        mood: Option<MoodType>,

        /// Preferred harmony: monochromatic, analogous, complementary, triadic,
        /// tetradic, split-complementary
        #[arg(long, value_parser = parse_harmony)]
        harmony: Option<HarmonyType>,

        /// Keep derived text colors instead of tested near-black/near-white
        #[arg(long)]
        no_accessibility: bool,

        /// Print themes as JSON
        #[arg(long)]
        json: bool,

        /// Apply the top-ranked theme to the settings store
        #[arg(long)]
        apply: bool,
    },

    /// Extract and show the palette of an image
    Palette {
        /// Image path, file:// URL or data: URI
        image: String,

        /// Sampling strategy (overrides config)
        #[arg(short, long, value_parser = parse_strategy)]
        strategy: Option<SamplingStrategy>,

        /// Print the palette as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check the WCAG contrast of two colors
    Contrast {
        /// Foreground color (#RGB or #RRGGBB)
        foreground: String,

        /// Background color (#RGB or #RRGGBB)
        background: String,
    },

    /// Show or create the configuration file
    ///
    /// If no config file exists, a default one will be created.
    Config {
        /// Show the config file path only
        #[arg(long)]
        path: bool,

        /// Reset config to defaults (creates a fresh config file)
        #[arg(long)]
        reset: bool,
    },

    /// Generate a configuration file at a specific location
    GenerateConfig {
        /// Output path for the config file (defaults to standard location)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show current configuration
    ShowConfig,
}

fn parse_strategy(s: &str) -> Result<SamplingStrategy, String> {
    s.parse()
}

fn parse_mood(s: &str) -> Result<MoodType, String> {
    s.parse()
}

fn parse_harmony(s: &str) -> Result<HarmonyType, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let args = Args::parse_from([
            "tab-theme",
            "generate",
            "wallpaper.png",
            "--strategy",
            "corners",
            "--seed",
            "7",
            "--harmony",
            "split_complementary",
            "--apply",
        ]);
        match args.command {
            Some(Commands::Generate {
                image,
                strategy,
                seed,
                harmony,
                apply,
                json,
                ..
            }) => {
                assert_eq!(image.as_deref(), Some("wallpaper.png"));
                assert_eq!(strategy, Some(SamplingStrategy::Corners));
                assert_eq!(seed, Some(7));
                assert_eq!(harmony, Some(HarmonyType::SplitComplementary));
                assert!(apply);
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_mood() {
        let result = Args::try_parse_from(["tab-theme", "generate", "--mood", "gloomy"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let args = Args::parse_from(["tab-theme", "show-config", "--log-level", "debug"]);
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(matches!(args.command, Some(Commands::ShowConfig)));
    }
}
