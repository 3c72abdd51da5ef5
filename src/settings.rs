//! Run configuration
//!
//! Read once at startup: LocalStorage on the web, a JSON file next to the
//! native binary. Gameplay tuning lives in `consts`, not here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::Playfield;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed RNG seed for reproducible runs; random when absent
    pub seed: Option<u64>,
    pub playfield_width: f32,
    pub playfield_height: f32,
    /// Length of a headless native run
    pub max_ticks: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            playfield_width: 800.0,
            playfield_height: 600.0,
            max_ticks: 20_000,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "gun_game_settings";

    /// Settings file the native runner looks for
    pub const DEFAULT_PATH: &'static str = "gun_game_settings.json";

    /// The configured playfield, or `None` if the dimensions are unusable
    pub fn playfield(&self) -> Option<Playfield> {
        Playfield::new(self.playfield_width, self.playfield_height)
    }

    /// Configured seed, or a fresh one from the OS
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Read settings from a JSON file. Missing fields take their defaults.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match Self::load_from(Self::DEFAULT_PATH) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", Self::DEFAULT_PATH);
                settings
            }
            Err(e) => {
                log::info!("Using default settings ({e})");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.seed, None);
        assert_eq!(settings.max_ticks, 20_000);
        let field = settings.playfield().unwrap();
        assert_eq!((field.width, field.height), (800.0, 600.0));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"seed": 7}"#).unwrap();
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.resolve_seed(), 7);
        assert_eq!(settings.playfield_width, 800.0);
    }

    #[test]
    fn test_bad_dimensions_have_no_playfield() {
        let settings = Settings {
            playfield_width: 0.0,
            ..Settings::default()
        };
        assert!(settings.playfield().is_none());
    }

    #[test]
    fn test_load_from_errors() {
        let missing = std::env::temp_dir().join("gun_game_settings_missing.json");
        let _ = std::fs::remove_file(&missing);
        assert!(matches!(Settings::load_from(&missing), Err(SettingsError::Io(_))));

        let bad = std::env::temp_dir().join(format!("gun_game_settings_{}.json", std::process::id()));
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(Settings::load_from(&bad), Err(SettingsError::Parse(_))));
        let _ = std::fs::remove_file(&bad);
    }
}
