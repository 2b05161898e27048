//! Configuration file handling.
//!
//! Loads configuration from `~/.config/ascii-cam/config.toml` or a custom
//! path. CLI flags override anything set here.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration file structure for ascii-cam.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub ascii: AsciiConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    /// Camera device index
    #[serde(default)]
    pub device: u32,
    /// Mirror horizontally (selfie view)
    #[serde(default = "default_true")]
    pub mirror: bool,
    /// Requested capture resolution, "WIDTHxHEIGHT"
    #[serde(default)]
    pub resolution: Option<String>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: 0,
            mirror: true,
            resolution: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GridConfig {
    /// ASCII grid width in characters
    #[serde(default = "default_grid_width")]
    pub width: u16,
    /// ASCII grid height in characters
    #[serde(default = "default_grid_height")]
    pub height: u16,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: default_grid_width(),
            height: default_grid_height(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct AsciiConfig {
    /// Invert brightness (for light terminals)
    #[serde(default)]
    pub invert: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct ExportConfig {
    /// Directory exports are written to (default: current directory)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct DisplayConfig {
    /// Display refresh rate the render loop synchronizes to
    #[serde(default = "default_fps")]
    pub fps: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { fps: default_fps() }
    }
}

fn default_true() -> bool {
    true
}

fn default_grid_width() -> u16 {
    150
}

fn default_grid_height() -> u16 {
    90
}

fn default_fps() -> u32 {
    60
}

impl Config {
    /// Load configuration from a file path.
    ///
    /// Returns default config if the file doesn't exist, an error if it
    /// exists but cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    directories::ProjectDirs::from("com", "ascii-cam", "ascii-cam")
        .map(|d| d.config_dir().to_path_buf().join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/ascii-cam/config.toml")
        })
}
