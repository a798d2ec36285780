//! Runtime configuration.
//!
//! Read from `config.toml` (if present) and then overridden by environment
//! variables.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, CoreResult};

/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default Generative Language API URL.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";

const APP_DIR: &str = "busybee";
const CONFIG_FILE: &str = "config.toml";

/// Busy Bee settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Provider API key. Usually supplied through `GEMINI_API_KEY`.
    pub api_key: Option<String>,
    pub model: String,
    pub api_base_url: String,
    /// Where the search history is kept.
    pub data_dir: Option<PathBuf>,
    /// Default destination for exported files.
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_API_URL.to_string(),
            data_dir: None,
            export_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default location when
    /// `path` is `None`, then apply environment overrides.
    ///
    /// A missing file at the default location is not an error.
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) => match Self::from_file(&path) {
                    Ok(config) => config,
                    Err(CoreError::Io(e)) if e.kind() == ErrorKind::NotFound => Self::default(),
                    Err(e) => return Err(e),
                },
                None => Self::default(),
            },
        };

        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)
            .map_err(|e| CoreError::config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse TOML text.
    pub fn from_toml(content: &str) -> CoreResult<Self> {
        toml::from_str(content).map_err(|e| CoreError::config(e.to_string()))
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(model) = non_empty("BUSYBEE_MODEL") {
            self.model = model;
        }
        if let Some(url) = non_empty("BUSYBEE_API_URL") {
            self.api_base_url = url;
        }
        if let Some(dir) = non_empty("BUSYBEE_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(dir));
        }
    }

    /// Directory holding persisted state.
    ///
    /// Falls back to `.busybee` in the working directory when the platform
    /// has no data directory.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR)))
            .unwrap_or_else(|| PathBuf::from(".busybee"))
    }

    /// Directory exported files go to unless the caller says otherwise.
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// `<config_dir>/busybee/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml("model = \"gemini-2.5-pro\"\n").unwrap();
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml("model = [").unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("API_KEY", "fallback-key"),
            ("GEMINI_API_KEY", "primary-key"),
            ("BUSYBEE_DATA_DIR", "/tmp/bee"),
            ("BUSYBEE_MODEL", "  "),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.api_key.as_deref(), Some("primary-key"));
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/bee"));
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_legacy_api_key_variable() {
        let mut config = Config::default();
        config.apply_env(|name| (name == "API_KEY").then(|| "legacy".to_string()));
        assert_eq!(config.api_key.as_deref(), Some("legacy"));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "export_dir = \"reports\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.export_dir(), PathBuf::from("reports"));
    }
}
