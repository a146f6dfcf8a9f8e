//! Configuration module for the theme generator
//!
//! Supports loading configuration from a TOML file.
//! Configuration is stored in a standard location:
//! - Windows: %APPDATA%\tab_theme_studio\config.toml
//! - Linux: ~/.config/tab_theme_studio/config.toml
//! - macOS: ~/Library/Application Support/tab_theme_studio/config.toml

use crate::extraction::{ExtractionOptions, SamplingStrategy, DEFAULT_CACHE_CAPACITY};
use crate::scheme::{HarmonyType, MoodType};
use crate::settings::DEFAULT_SETTINGS_FILE;
use crate::theme::ThemeGenerationOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application name used for config directory
const APP_NAME: &str = "tab_theme_studio";

/// Default config file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Project-local override, checked before the standard location
const LOCAL_CONFIG_FILE: &str = "./tab_theme.toml";

/// Get the standard configuration directory for the application.
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME))
}

/// Get the standard configuration file path.
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Ensure the configuration directory exists.
pub fn ensure_config_dir() -> Result<PathBuf, ConfigError> {
    let config_dir = get_config_dir().ok_or(ConfigError::ConfigDirNotFound)?;

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)
            .map_err(|e| ConfigError::WriteError(config_dir.clone(), e.to_string()))?;
    }

    Ok(config_dir)
}

/// Initialize the configuration file if it doesn't exist.
///
/// With `reset`, an existing file is overwritten by the default template.
/// Returns the path to the config file.
pub fn init_config(reset: bool) -> Result<PathBuf, ConfigError> {
    let config_dir = ensure_config_dir()?;
    let config_path = config_dir.join(CONFIG_FILE_NAME);

    if reset || !config_path.exists() {
        fs::write(&config_path, Config::generate_default_config())
            .map_err(|e| ConfigError::WriteError(config_path.clone(), e.to_string()))?;
    }

    Ok(config_path)
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Palette extraction settings
    pub extraction: ExtractionConfig,

    /// Scheme and theme generation settings
    pub generation: GenerationConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Settings store location
    pub storage: StorageConfig,
}

/// Palette extraction configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// dominant, average, edge, center, corners or distributed
    pub strategy: SamplingStrategy,

    /// Drop near-white, near-black, neon and flat-gray pixels
    pub filter_extremes: bool,

    pub weight_by_position: bool,

    pub weight_by_saturation: bool,

    /// Ranked colors kept per image
    pub max_colors: usize,

    /// Pixel stride
    pub sample_rate: u32,

    /// Decoded images kept for regeneration
    pub cache_capacity: usize,
}

/// Generation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub max_themes: usize,

    /// Force text to tested near-black/near-white colors
    pub ensure_accessibility: bool,

    /// Contrast the text literal must reach before falling back to black/white
    pub min_contrast_ratio: f64,

    /// Starting variation seed
    pub variation_seed: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_mood: Option<MoodType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_harmony: Option<HarmonyType>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log to file
    pub log_to_file: bool,

    /// Log file path
    pub log_file: PathBuf,
}

/// Storage configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Settings JSON file; empty means `settings.json` in the config directory
    pub settings_file: PathBuf,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        let defaults = ExtractionOptions::default();
        Self {
            strategy: defaults.strategy,
            filter_extremes: defaults.filter_extremes,
            weight_by_position: defaults.weight_by_position,
            weight_by_saturation: defaults.weight_by_saturation,
            max_colors: defaults.max_colors,
            sample_rate: defaults.sample_rate,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        let defaults = ThemeGenerationOptions::default();
        Self {
            max_themes: defaults.max_themes,
            ensure_accessibility: defaults.ensure_accessibility,
            min_contrast_ratio: defaults.min_contrast_ratio,
            variation_seed: defaults.variation_seed,
            preferred_mood: None,
            preferred_harmony: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_to_file: false,
            log_file: PathBuf::from("./tab_theme.log"),
        }
    }
}

impl ExtractionConfig {
    pub fn to_extraction_options(&self) -> ExtractionOptions {
        ExtractionOptions {
            strategy: self.strategy,
            filter_extremes: self.filter_extremes,
            weight_by_position: self.weight_by_position,
            weight_by_saturation: self.weight_by_saturation,
            max_colors: self.max_colors.max(1),
            sample_rate: self.sample_rate.max(1),
        }
    }
}

impl Config {
    /// Generation options seeded from the config
    pub fn to_generation_options(&self) -> ThemeGenerationOptions {
        ThemeGenerationOptions {
            max_themes: self.generation.max_themes,
            ensure_accessibility: self.generation.ensure_accessibility,
            extraction_strategy: self.extraction.strategy,
            variation_seed: self.generation.variation_seed,
            preferred_mood: self.generation.preferred_mood,
            preferred_harmony: self.generation.preferred_harmony,
            min_contrast_ratio: self.generation.min_contrast_ratio,
        }
    }

    /// Resolved settings store path
    pub fn settings_path(&self) -> PathBuf {
        if !self.storage.settings_file.as_os_str().is_empty() {
            return self.storage.settings_file.clone();
        }
        get_config_dir()
            .map(|dir| dir.join(DEFAULT_SETTINGS_FILE))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extraction.max_colors == 0 {
            return Err(ConfigError::Invalid(
                "extraction.max_colors must be at least 1".to_string(),
            ));
        }
        if self.extraction.sample_rate == 0 {
            return Err(ConfigError::Invalid(
                "extraction.sample_rate must be at least 1".to_string(),
            ));
        }
        if self.generation.max_themes == 0 {
            return Err(ConfigError::Invalid(
                "generation.max_themes must be at least 1".to_string(),
            ));
        }
        if !(1.0..=21.0).contains(&self.generation.min_contrast_ratio) {
            return Err(ConfigError::Invalid(format!(
                "generation.min_contrast_ratio must be within 1-21, got {}",
                self.generation.min_contrast_ratio
            )));
        }
        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e.to_string()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./tab_theme.toml (current directory - project override)
    /// 2. Standard config location
    ///
    /// If no config file is found, returns default configuration.
    pub fn load_default() -> Result<Self, ConfigError> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Self::load(&local);
        }

        if let Some(config_path) = get_config_path() {
            if config_path.exists() {
                return Self::load(&config_path);
            }
        }

        Ok(Self::default())
    }

    /// Get the path where the config file is (or would be) located.
    pub fn get_active_config_path() -> PathBuf {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return local;
        }

        get_config_path().unwrap_or(local)
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        fs::write(path.as_ref(), content)
            .map_err(|e| ConfigError::WriteError(path.as_ref().to_path_buf(), e.to_string()))?;

        Ok(())
    }

    /// Generate a default config file with comments
    pub fn generate_default_config() -> String {
        include_str!("../../config.example.toml").to_string()
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    /// Configuration file was not found at the specified path
    FileNotFound(PathBuf),
    /// Failed to read the configuration file
    ReadError(PathBuf, String),
    /// Failed to parse the configuration file (invalid TOML)
    ParseError(PathBuf, String),
    /// Failed to serialize configuration to TOML
    SerializeError(String),
    /// Failed to write configuration file
    WriteError(PathBuf, String),
    /// Could not determine config directory
    ConfigDirNotFound,
    /// A value is out of range
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ReadError(path, err) => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::ParseError(path, err) => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::SerializeError(err) => {
                write!(f, "Failed to serialize configuration: {}", err)
            }
            ConfigError::WriteError(path, err) => {
                write!(
                    f,
                    "Failed to write config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::ConfigDirNotFound => {
                write!(f, "Could not determine configuration directory")
            }
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
