use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::game::{GameConfig, MAX_SPEED_LEVEL, MIN_SPEED_LEVEL};

/// User preferences persisted between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub speed_level: u8,
    pub grid_width: usize,
    pub grid_height: usize,
}

impl Default for Settings {
    fn default() -> Self {
        let config = GameConfig::default();
        Self {
            speed_level: config.speed_level,
            grid_width: config.grid_width,
            grid_height: config.grid_height,
        }
    }
}

impl Settings {
    /// Read settings from `path`, using defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;
        let mut settings: Settings = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse settings {:?}", path))?;
        settings.speed_level = settings.speed_level.clamp(MIN_SPEED_LEVEL, MAX_SPEED_LEVEL);

        Ok(settings)
    }

    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("Using default settings: {:#}", e);
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write settings to {:?}", path))?;

        Ok(())
    }

    /// Game configuration for a new session using these preferences
    pub fn game_config(&self) -> GameConfig {
        GameConfig::new(self.grid_width, self.grid_height).with_speed_level(self.speed_level)
    }
}
