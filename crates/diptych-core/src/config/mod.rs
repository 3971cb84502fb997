//! Configuration management for Diptych.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Every section implements `Default`, so a partial file only needs
//! to name the values it changes.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Diptych.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Resource limits
    pub limits: LimitsConfig,

    /// Font resolution chain
    pub fonts: FontConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Image-generation service settings
    pub generation: GenerationConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.diptych.diptych/config.toml
    /// - Linux: ~/.config/diptych/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\diptych\config\config.toml
    ///
    /// Falls back to ~/.diptych/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "diptych", "diptych")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".diptych").join("config.toml")
            })
    }

    /// Get the resolved output directory (with ~ expansion).
    pub fn output_dir(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.output.dir);
        PathBuf::from(expanded.into_owned())
    }

    /// Get the font search paths with ~ expanded, in resolution order.
    pub fn font_paths(&self) -> Vec<PathBuf> {
        self.fonts
            .search_paths
            .iter()
            .map(|p| PathBuf::from(shellexpand::tilde(p).into_owned()))
            .collect()
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output.jpeg_quality, 95);
        assert_eq!(config.output.watermark, "pikadesign.me");
        assert_eq!(config.limits.fetch_timeout_ms, 30000);
        assert!(config.fonts.use_builtin_fallback);
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[limits]"));
        assert!(toml.contains("[generation]"));
        assert!(toml.contains("jpeg_quality = 95"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[output]\nwatermark = \"example.com\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.output.watermark, "example.com");
        assert_eq!(config.output.jpeg_quality, 95);
        assert_eq!(config.generation.secret_header, "X-Marketing-Secret");
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[output]\njpeg_quality = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("jpeg_quality"));
    }

    #[test]
    fn test_font_paths_expand_tilde() {
        let mut config = Config::default();
        config.fonts.search_paths = vec!["~/fonts/bold.ttf".to_string()];
        let paths = config.font_paths();
        assert_eq!(paths.len(), 1);
        assert!(!paths[0].to_string_lossy().starts_with('~'));
    }
}
