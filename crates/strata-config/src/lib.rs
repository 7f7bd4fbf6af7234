//! Configuration file handling for strata.
//!
//! Settings live in `config.toml` under the platform config directory. Every
//! field is optional; a missing file yields the defaults.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use strata_core::{AnimationSpeed, CellSize, ColorTheme, Layers};
use thiserror::Error;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Frame rates accepted by [`Config::validate`].
pub const FPS_RANGE: std::ops::RangeInclusive<u32> = 1..=240;

/// Largest accepted cell width or height, in virtual pixels.
pub const MAX_CELL_SIZE: f64 = 64.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Effective settings for the viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: ColorTheme,
    pub speed: AnimationSpeed,
    /// Fixed seed for noise and spawns; random when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub fps: u32,
    /// Scrollable distance in virtual pixels.
    pub document_length: f64,
    pub scroll_step: f64,
    pub autoscroll: bool,
    /// Virtual pixels advanced per frame while autoscrolling.
    pub autoscroll_rate: f64,
    pub cell: CellSize,
    pub layers: Layers,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: ColorTheme::default(),
            speed: AnimationSpeed::default(),
            seed: None,
            fps: 60,
            document_length: 10_000.0,
            scroll_step: 100.0,
            autoscroll: false,
            autoscroll_rate: 6.0,
            cell: CellSize::default(),
            layers: Layers::default(),
        }
    }
}

impl Config {
    /// Default location of the config file, if the platform has one.
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "strata").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load from the default location, or defaults when there is none.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load and validate a config file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Write the config as TOML, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        let contents = toml::to_string_pretty(self)?;

        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(path, contents).map_err(io_error)?;

        debug!(path = %path.display(), "saved config");
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !FPS_RANGE.contains(&self.fps) {
            return Err(ConfigError::Invalid(format!(
                "fps must be between {} and {}, got {}",
                FPS_RANGE.start(),
                FPS_RANGE.end(),
                self.fps
            )));
        }
        let cell_range = f64::MIN_POSITIVE..=MAX_CELL_SIZE;
        if !(cell_range.contains(&self.cell.width) && cell_range.contains(&self.cell.height)) {
            return Err(ConfigError::Invalid(format!(
                "cell width and height must be positive and at most {MAX_CELL_SIZE}"
            )));
        }
        if !(self.document_length.is_finite() && self.document_length >= 0.0) {
            return Err(ConfigError::Invalid(
                "document_length must be a finite, non-negative distance".to_string(),
            ));
        }
        if !(self.scroll_step.is_finite() && self.scroll_step > 0.0) {
            return Err(ConfigError::Invalid(
                "scroll_step must be positive".to_string(),
            ));
        }
        if !(self.autoscroll_rate.is_finite() && self.autoscroll_rate >= 0.0) {
            return Err(ConfigError::Invalid(
                "autoscroll_rate must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
