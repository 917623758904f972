//! Simulation settings
//!
//! Loaded from JSON. The debug footprint flag is plain data handed to whatever
//! renders the world; nothing in the simulation reads it.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::Rect;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("arena must have a positive size, got {0:?}")]
    InvalidArena(Rect),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Draw collision footprints on top of sprites
    pub debug_footprints: bool,
    /// Playable region for the current level
    pub arena: Rect,
    /// Max player speed (pixels/s)
    pub player_speed: f32,
    /// Default speed for moveable sprites (pixels/s)
    pub moveable_speed: f32,
    /// Used to turn footprint y into a draw depth
    pub viewport_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_footprints: false,
            arena: Rect::new(0, 0, DEFAULT_ARENA_WIDTH, DEFAULT_ARENA_HEIGHT),
            player_speed: PLAYER_SPEED,
            moveable_speed: MOVEABLE_SPEED,
            viewport_height: DEFAULT_ARENA_HEIGHT as f32,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load from `path`, falling back to defaults if it is missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("{err}; using default settings");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.arena.is_empty() {
            return Err(SettingsError::InvalidArena(self.arena));
        }
        Ok(())
    }
}
