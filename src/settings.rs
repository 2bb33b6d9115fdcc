//! Game settings and preferences
//!
//! Persisted as a JSON file next to the game data. Every field has a
//! default, so a partial file only overrides what it names.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::{AmbientTrack, SoundCue};
use crate::consts::FPS;

/// Errors reading or writing the settings file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Resources ===
    /// Directory holding `level{n}.txt`
    pub levels_dir: PathBuf,
    /// JSON object mapping stage index to stage name
    pub names_file: PathBuf,
    /// Directory holding sound and music assets
    pub audio_dir: PathBuf,
    /// Where screenshots are written
    pub screenshot_dir: PathBuf,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,

    // === Timing ===
    /// Frame rate the loop is paced at
    pub fps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            levels_dir: PathBuf::from("levels"),
            names_file: PathBuf::from("levels/names.json"),
            audio_dir: PathBuf::from("audio"),
            screenshot_dir: PathBuf::from("."),

            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 1.0,

            fps: FPS,
        }
    }
}

impl Settings {
    /// Load settings from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse settings JSON and clamp out-of-range values
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Save settings to `path` as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    fn sanitize(&mut self) {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        if self.fps == 0 {
            log::warn!("fps of 0 is invalid, using {}", FPS);
            self.fps = FPS;
        }
    }

    /// Screenshot file for the `n`th capture of the run
    pub fn screenshot_path(&self, n: u32) -> PathBuf {
        self.screenshot_dir.join(format!("screenshot{}.jpeg", n))
    }

    /// Effective volume for a sound cue
    pub fn cue_volume(&self, cue: SoundCue) -> f32 {
        cue.default_volume() * self.sfx_volume * self.master_volume
    }

    /// Effective volume for an ambient track
    pub fn track_volume(&self, track: AmbientTrack) -> f32 {
        track.default_volume() * self.music_volume * self.master_volume
    }

    /// Time budget of one frame
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }
}
