//! Game settings and preferences
//!
//! Persisted as JSON next to the score file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::TICK_RATE;
use crate::tuning::Tuning;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// High score file
    pub scores_path: PathBuf,
    /// Frames per second for the main loop
    pub fps: u32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Silence all cues
    pub muted: bool,

    // === Gameplay ===
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scores_path: PathBuf::from("scores.txt"),
            fps: TICK_RATE,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Frames per second, never zero
    pub fn effective_fps(&self) -> u32 {
        self.fps.max(1)
    }

    /// Load settings from `path`. A missing file yields defaults and a
    /// default file is written; an unreadable or invalid file yields defaults.
    pub fn load_or_init(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring invalid settings file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let settings = Self::default();
                match settings.save(path) {
                    Ok(()) => log::info!("Wrote default settings to {}", path.display()),
                    Err(e) => log::warn!("Could not write default settings to {}: {}", path.display(), e),
                }
                settings
            }
            Err(e) => {
                log::warn!("Could not read settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "bear-guard-settings-{}-{}.json",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_missing_file_writes_defaults() {
        let path = temp_path("missing");
        let settings = Settings::load_or_init(&path);
        assert_eq!(settings, Settings::default());
        assert!(path.exists());
        assert_eq!(Settings::load_or_init(&path), settings);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_path("partial");
        fs::write(&path, r#"{ "muted": true, "tuning": { "starting_lives": 5 } }"#).unwrap();
        let settings = Settings::load_or_init(&path);
        assert!(settings.muted);
        assert_eq!(settings.tuning.starting_lives, 5);
        assert_eq!(settings.tuning.fire_cooldown, 30);
        assert_eq!(settings.scores_path, PathBuf::from("scores.txt"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let path = temp_path("invalid");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_or_init(&path), Settings::default());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_effective_fps() {
        let settings = Settings {
            fps: 0,
            ..Default::default()
        };
        assert_eq!(settings.effective_fps(), 1);
    }
}
