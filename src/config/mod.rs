//! Preference files.
//!
//! Two JSON documents live under the config directory: `prefs.json` (the
//! theme choice) and `accent.json` (the accent colours). Both are handled
//! the same way: read the whole document as a raw JSON object, set the
//! keys being changed, write the whole object back. Every other key keeps
//! its value and position, whatever its type.
//!
//! Reads are forgiving. A missing or corrupt file loads as the default
//! document so the calculator can always start, and a known key holding
//! the wrong JSON type reads as if it were absent.

mod accent;
mod prefs;

pub use accent::AccentConfig;
pub use prefs::Prefs;

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::theme::{ThemeChoice, DARK_ACCENT, LIGHT_ACCENT};
use crate::types::Colour;

pub const PREFS_FILENAME: &str = "prefs.json";
pub const ACCENT_FILENAME: &str = "accent.json";

const THEME_KEY: &str = "theme";
const MAIN_KEY: &str = "accent_color_main";
const FETCHED_KEY: &str = "accent_color_fetched";

/// Default config directory, relative to the working directory.
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// The directory holding `prefs.json` and `accent.json`.
#[derive(Debug, Clone)]
pub struct ConfigDir {
    root: PathBuf,
}

impl Default for ConfigDir {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_DIR)
    }
}

impl ConfigDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn prefs_path(&self) -> PathBuf {
        self.root.join(PREFS_FILENAME)
    }

    pub fn accent_path(&self) -> PathBuf {
        self.root.join(ACCENT_FILENAME)
    }

    /// Load `prefs.json`, defaulting on any failure.
    pub fn load_prefs(&self) -> Prefs {
        load_or_default(&self.prefs_path())
    }

    /// Load `accent.json`, defaulting on any failure.
    pub fn load_accent(&self) -> AccentConfig {
        load_or_default(&self.accent_path())
    }

    /// Record a colour fetched from a wallpaper as uppercase `#RRGGBB`,
    /// keeping every other key.
    pub fn store_fetched(&self, colour: Colour) -> Result<(), ConfigError> {
        let path = self.accent_path();
        let mut accent: Map<String, Value> = load_or_default(&path);
        accent
            .entry(MAIN_KEY)
            .or_insert_with(|| Value::String(String::new()));
        accent.insert(FETCHED_KEY.to_string(), Value::String(colour.to_string()));

        write_document(&path, &accent)?;
        debug!(colour = %colour, "stored fetched accent");
        Ok(())
    }

    /// Apply a theme picked in settings and rewrite both documents.
    ///
    /// `light` and `dark` reset the accent to their fixed greys; `fetched`
    /// promotes the stored fetched colour and fails when there is none.
    /// Returns the new main accent.
    pub fn commit_theme(&self, choice: ThemeChoice) -> Result<Colour, ConfigError> {
        let mut prefs: Map<String, Value> = load_or_default(&self.prefs_path());
        let mut accent: Map<String, Value> = load_or_default(&self.accent_path());
        let current = AccentConfig::from_object(&accent);

        let main = match choice {
            ThemeChoice::Light => LIGHT_ACCENT,
            ThemeChoice::Dark => DARK_ACCENT,
            ThemeChoice::Fetched => current.fetched_colour().ok_or_else(|| ConfigError::Setting {
                message: "No fetched colour is stored yet".to_string(),
                help: Some("Run `matucalc fetch <IMAGE>` first".to_string()),
            })?,
        };
        let main_text = match choice {
            ThemeChoice::Fetched => current.accent_color_fetched,
            _ => main.to_hex_lower(),
        };

        prefs.insert(THEME_KEY.to_string(), Value::String(choice.as_str().to_string()));
        accent.insert(MAIN_KEY.to_string(), Value::String(main_text));
        accent
            .entry(FETCHED_KEY)
            .or_insert_with(|| Value::String(String::new()));

        write_document(&self.prefs_path(), &prefs)?;
        write_document(&self.accent_path(), &accent)?;
        debug!(theme = choice.as_str(), main = %main, "committed theme");
        Ok(main)
    }
}

/// Field deserializer that treats a value of the wrong JSON type as absent.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Read and parse a JSON document.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    serde_json::from_str(&content).map_err(|e| ConfigError::Json {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Read a JSON document, falling back to the default on any failure.
pub fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match read_document(path) {
        Ok(doc) => doc,
        Err(ConfigError::Io { .. }) if !path.exists() => {
            debug!(path = %path.display(), "config file missing, using defaults");
            T::default()
        }
        Err(e) => {
            warn!("{}; using defaults", e);
            T::default()
        }
    }
}

/// Write a whole JSON document with four-space indentation, creating the
/// parent directory if needed.
pub fn write_document<T: Serialize>(path: &Path, doc: &T) -> Result<(), ConfigError> {
    let io_error = |e: std::io::Error| ConfigError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut serializer).map_err(|e| ConfigError::Json {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    fs::write(path, buf).map_err(io_error)
}
