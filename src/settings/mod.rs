//! JSON-file-backed settings store
//!
//! The new-tab surface keeps its settings as one flat JSON object. This
//! module reads and writes that object, applies a generated theme to it and
//! resolves the stored background image into an [`ImageSource`].

use crate::core::error::{Result, ThemeError};
use crate::extraction::ImageSource;
use crate::theme::IntelligentTheme;
use log::{debug, info, trace};
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// Key holding the applied card style
pub const CARD_STYLE_KEY: &str = "cardStyle";
/// Key holding the id of the applied theme
pub const ACTIVE_THEME_KEY: &str = "activeThemeId";
/// Key holding the background image reference
pub const BACKGROUND_IMAGE_KEY: &str = "backgroundImage";

/// Default settings file name
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

pub struct SettingsStore {
    path: PathBuf,
    values: Map<String, Value>,
    dirty: bool,
}

impl SettingsStore {
    /// Open a store; a missing file yields an empty store
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            Self::load(&path)?
        } else {
            debug!("Settings file {} not found, starting empty", path.display());
            Map::new()
        };

        Ok(Self {
            path,
            values,
            dirty: false,
        })
    }

    fn load(path: &Path) -> Result<Map<String, Value>> {
        let file = File::open(path).map_err(|e| {
            ThemeError::Settings(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let reader = BufReader::new(file);
        let value: Value = serde_json::from_reader(reader).map_err(|e| {
            ThemeError::Settings(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        match value {
            Value::Object(map) => Ok(map),
            other => Err(ThemeError::Settings(format!(
                "Expected a JSON object in {}, found {}",
                path.display(),
                json_kind(&other)
            ))),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
        self.dirty = true;
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let removed = self.values.remove(key);
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write the store if modified
    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            trace!("Settings not modified, skipping save");
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    ThemeError::Settings(format!("Failed to create settings directory: {}", e))
                })?;
            }
        }

        let file = File::create(&self.path).map_err(|e| {
            ThemeError::Settings(format!("Failed to create {}: {}", self.path.display(), e))
        })?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.values).map_err(|e| {
            ThemeError::Settings(format!("Failed to write {}: {}", self.path.display(), e))
        })?;

        debug!("Saved settings to: {}", self.path.display());
        self.dirty = false;
        Ok(())
    }

    /// Store a theme's card style and mark it active
    pub fn apply_theme(&mut self, theme: &IntelligentTheme) -> Result<()> {
        let style = serde_json::to_value(&theme.settings)
            .map_err(|e| ThemeError::Settings(format!("Failed to serialize card style: {}", e)))?;
        self.set(CARD_STYLE_KEY, style);
        self.set(ACTIVE_THEME_KEY, Value::String(theme.id.clone()));
        info!("Applied theme '{}' ({})", theme.name, theme.id);
        Ok(())
    }

    /// Resolve the stored background image, if any
    pub fn background_image(&self) -> Result<Option<ImageSource>> {
        match self.values.get(BACKGROUND_IMAGE_KEY) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => ImageSource::parse(s).map(Some),
            Some(other) => Err(ThemeError::Settings(format!(
                "'{}' must be a string, found {}",
                BACKGROUND_IMAGE_KEY,
                json_kind(other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::source::test_images::{encode_png, solid};
    use crate::theme::{ThemeGenerationOptions, ThemeGenerator};
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_opens_empty() {
        let temp = TempDir::new().unwrap();
        let store = SettingsStore::open(temp.path().join("missing.json")).unwrap();
        assert!(store.get("anything").is_none());
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_set_save_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("settings.json");

        let mut store = SettingsStore::open(&path).unwrap();
        store.set("dockSize", json!(48));
        store.set("showClock", json!(true));
        store.save().unwrap();
        assert!(!store.is_dirty());

        let mut reopened = SettingsStore::open(&path).unwrap();
        assert_eq!(reopened.get("dockSize"), Some(&json!(48)));
        assert_eq!(reopened.remove("showClock"), Some(json!(true)));
        assert_eq!(reopened.remove("showClock"), None);
        reopened.save().unwrap();

        let again = SettingsStore::open(&path).unwrap();
        assert!(again.get("showClock").is_none());
    }

    #[test]
    fn test_non_object_file_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(matches!(
            SettingsStore::open(&path),
            Err(ThemeError::Settings(_))
        ));
    }

    #[test]
    fn test_background_image_resolution() {
        let temp = TempDir::new().unwrap();
        let mut store = SettingsStore::open(temp.path().join("s.json")).unwrap();
        assert!(store.background_image().unwrap().is_none());

        store.set(BACKGROUND_IMAGE_KEY, json!("/tmp/wallpaper.png"));
        assert_eq!(
            store.background_image().unwrap(),
            Some(ImageSource::Path(PathBuf::from("/tmp/wallpaper.png")))
        );

        store.set(BACKGROUND_IMAGE_KEY, json!(""));
        assert!(store.background_image().unwrap().is_none());

        store.set(BACKGROUND_IMAGE_KEY, json!(42));
        assert!(store.background_image().is_err());
    }

    #[test]
    fn test_apply_theme_writes_card_style() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        let source = ImageSource::Bytes(encode_png(&solid(16, 16, [30, 140, 90, 255])));
        let theme = ThemeGenerator::new()
            .generate_themes(&source, &ThemeGenerationOptions::default())
            .unwrap()
            .remove(0);

        let mut store = SettingsStore::open(&path).unwrap();
        store.set("dockSize", json!(48));
        store.apply_theme(&theme).unwrap();
        store.save().unwrap();

        let reopened = SettingsStore::open(&path).unwrap();
        assert_eq!(reopened.get(ACTIVE_THEME_KEY), Some(&json!(theme.id)));
        let style = reopened.get(CARD_STYLE_KEY).unwrap();
        assert_eq!(
            style["cardBackgroundColor"],
            json!(theme.settings.card_background_color.to_hex())
        );
        assert_eq!(reopened.get("dockSize"), Some(&json!(48)));
    }
}
