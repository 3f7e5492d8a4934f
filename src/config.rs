//! Application configuration
//!
//! Read from a RON file at startup:
//!
//! ```ron
//! (
//!   manifest: "assets/manifest.json",
//!   canvas_width: 634,
//!   canvas_height: 444,
//!   continuous_render: true,
//! )
//! ```
//!
//! Every field is optional. A missing file means defaults; a broken file is
//! logged and also means defaults.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "SCCVIEW_CONFIG";
/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "sccview.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Manifest path (relative to `asset_root`) or http(s) URL
    pub manifest: String,
    /// Base directory for local manifests
    pub asset_root: PathBuf,
    pub canvas_width: usize,
    pub canvas_height: usize,
    pub channels: usize,
    /// Seconds the "Loading..." frame stays up before a palette swap
    pub palette_switch_delay: f64,
    /// Seconds a pressed button stays drawn pressed
    pub press_feedback_delay: f64,
    /// Redraw channel meters every frame while playing
    pub continuous_render: bool,
    pub project_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            manifest: "assets/manifest.json".to_string(),
            asset_root: PathBuf::from("."),
            canvas_width: 634,
            canvas_height: 444,
            channels: crate::song::DEFAULT_CHANNELS,
            palette_switch_delay: 0.01,
            press_feedback_delay: 0.05,
            continuous_render: true,
            project_url: "https://github.com/milkey-mouse/JSSCC".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `$SCCVIEW_CONFIG` or `./sccview.ron`, falling back to
    /// defaults
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

        match Self::load_from(&path) {
            Ok(config) => {
                info!("loaded config from {}", path.display());
                config
            }
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("no config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                warn!("{} ({}), using defaults", e, path.display());
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&contents)?)
    }
}
