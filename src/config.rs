//! Configuration persistence for doodlewhisper settings

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Resolution, SurfaceSize};
use crate::render::Brush;
use crate::session::SessionSettings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Relay endpoint that accepts the multipart edit request
    pub endpoint: String,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Mask resolution the service expects
    pub target: Resolution,
    /// Size of the editing canvas
    pub display: SurfaceSize,
    /// Free-hand brush
    pub brush: Brush,
}

/// Side of the square mask and canvas
const DEFAULT_SIDE: NonZeroU32 = match NonZeroU32::new(512) {
    Some(side) => side,
    None => unreachable!(),
};

fn default_resolution() -> Resolution {
    Resolution::square(DEFAULT_SIDE)
}

impl EditorConfig {
    /// Application directory name under the platform config dir
    pub const ID: &'static str = "doodlewhisper";

    pub const FILE_NAME: &'static str = "config.json";

    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::ID).join(Self::FILE_NAME))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            log::warn!("Could not locate config directory, using defaults");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {}", err);
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) {
        match Self::path() {
            Some(path) => {
                if let Err(err) = self.save_to(&path) {
                    log::error!("Failed to save config: {}", err);
                }
            }
            None => log::error!("Could not locate config directory for saving"),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        log::debug!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            display: self.display,
            target: self.target,
            brush: self.brush,
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000/api/edit-image".to_string(),
            request_timeout_secs: 120,
            target: default_resolution(),
            display: default_resolution().into(),
            brush: Brush::default(),
        }
    }
}
