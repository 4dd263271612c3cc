// ABOUTME: Application configuration handling.
// ABOUTME: Loads and saves layout and surface settings from TOML config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings consumed by the pane tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Thickness in pixels of the separator drawn between two split panes
    pub separator_size: f32,

    /// Fraction of a split moved by one resize step (0.05 = 5%)
    pub resize_step: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            separator_size: 4.0,
            resize_step: 0.05,
        }
    }
}

/// Character grid metrics for hosted surfaces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceSettings {
    /// Width of one character cell in pixels
    pub cell_width: f32,

    /// Height of one character cell in pixels
    pub cell_height: f32,

    /// Non-grid padding on each side of a surface, in pixels
    pub padding: f32,
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self {
            cell_width: 9.0,
            cell_height: 18.0,
            padding: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pane tree settings
    pub layout: LayoutSettings,

    /// Surface grid settings
    pub surface: SurfaceSettings,

    /// Window dimensions
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: LayoutSettings::default(),
            surface: SurfaceSettings::default(),
            window_width: 1200,
            window_height: 800,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,
}

impl Config {
    /// Get the default config file path (~/.config/gridpane/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gridpane").join("config.toml"))
    }

    /// Load config from a path
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from default path, or return default config if not found
    pub fn load_or_default() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_or_default_from(&path),
            None => {
                tracing::warn!("No config directory, using default settings");
                Self::default()
            }
        }
    }

    /// Load config from `path`. A missing file quietly yields the defaults;
    /// an unreadable or malformed one is logged and replaced by them.
    pub fn load_or_default_from(path: &std::path::Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(ConfigError::ReadError(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                Self::default()
            }
            Err(err) => {
                tracing::warn!("Ignoring config at {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Save config to a path
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save config to default path
    pub fn save_to_default(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::default_path().ok_or(ConfigError::NoConfigDir)?;
        self.save(&path)?;
        Ok(path)
    }
}
