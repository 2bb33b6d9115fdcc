//! Sound cues and ambient tracks
//!
//! The simulation never touches an audio device. It emits these symbolic
//! requests and the frame loop forwards them to an `AudioSink`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One-shot sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Jump fired
    Jump,
    /// Coin collected
    Coin,
    /// Stage exit reached, or a secret area left forward
    NextStage,
    /// Player died
    Death,
    /// Respawn point activated
    Respawn,
    /// Chest opened (cancel upgrade)
    Chest,
    /// Special key picked up
    SpecialKey,
    /// Secret door entered
    SecretDoor,
    /// Return door taken back one stage
    Return,
    /// Last key collected, locks open
    Open,
    /// Key collected, more remain
    Partial,
    Ring,
    Sword,
}

impl SoundCue {
    pub const ALL: [SoundCue; 13] = [
        SoundCue::Jump,
        SoundCue::Coin,
        SoundCue::NextStage,
        SoundCue::Death,
        SoundCue::Respawn,
        SoundCue::Chest,
        SoundCue::SpecialKey,
        SoundCue::SecretDoor,
        SoundCue::Return,
        SoundCue::Open,
        SoundCue::Partial,
        SoundCue::Ring,
        SoundCue::Sword,
    ];

    /// Mix level relative to full scale
    pub fn default_volume(&self) -> f32 {
        match self {
            SoundCue::Jump => 0.2,
            SoundCue::Coin => 0.4,
            SoundCue::NextStage => 1.0,
            SoundCue::Death => 0.4,
            SoundCue::Respawn => 1.0,
            SoundCue::Chest | SoundCue::SpecialKey | SoundCue::Ring | SoundCue::Sword => 0.3,
            SoundCue::SecretDoor | SoundCue::Return | SoundCue::Open | SoundCue::Partial => 0.2,
        }
    }

    /// Asset file under the audio directory
    pub fn asset(&self) -> &'static str {
        match self {
            SoundCue::Jump => "jump.flac",
            SoundCue::Coin => "coin.wav",
            SoundCue::NextStage => "next.flac",
            SoundCue::Death => "death.wav",
            SoundCue::Respawn => "respawn.wav",
            SoundCue::Chest | SoundCue::Ring => "chest.wav",
            SoundCue::SpecialKey => "specialkey1.wav",
            SoundCue::SecretDoor => "specialdoor.wav",
            SoundCue::Return => "return.wav",
            SoundCue::Open => "open.wav",
            SoundCue::Partial => "partial.wav",
            SoundCue::Sword => "sword.wav",
        }
    }
}

/// Looping background tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmbientTrack {
    /// Regular stages
    Main,
    /// First secret area
    SecretFirst,
    /// Layered over stage 13
    Haunted,
    /// Second secret area
    SecretSecond,
}

impl AmbientTrack {
    pub const ALL: [AmbientTrack; 4] = [
        AmbientTrack::Main,
        AmbientTrack::SecretFirst,
        AmbientTrack::Haunted,
        AmbientTrack::SecretSecond,
    ];

    pub fn default_volume(&self) -> f32 {
        match self {
            AmbientTrack::Main => 0.6,
            AmbientTrack::SecretFirst => 0.5,
            AmbientTrack::Haunted => 0.6,
            AmbientTrack::SecretSecond => 0.5,
        }
    }

    pub fn asset(&self) -> &'static str {
        match self {
            AmbientTrack::Main => "background.ogg",
            AmbientTrack::SecretFirst => "sbkgd1.ogg",
            AmbientTrack::Haunted => "sbkgd2.ogg",
            AmbientTrack::SecretSecond => "sbkgd3.ogg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmbientCommand {
    Play(AmbientTrack),
    Stop(AmbientTrack),
}

/// Audio backend the frame loop talks to
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue, volume: f32);
    fn ambient(&mut self, command: AmbientCommand, volume: f32);
}

/// Asset files under `audio_dir` that do not exist, sorted and deduplicated
pub fn missing_assets(audio_dir: &Path) -> Vec<PathBuf> {
    let mut assets: Vec<&str> = SoundCue::ALL
        .iter()
        .map(SoundCue::asset)
        .chain(AmbientTrack::ALL.iter().map(AmbientTrack::asset))
        .collect();
    assets.sort_unstable();
    assets.dedup();

    assets
        .into_iter()
        .map(|asset| audio_dir.join(asset))
        .filter(|path| !path.is_file())
        .collect()
}

/// Sink that only logs the asset it would have played, for headless runs
#[derive(Debug, Clone, Default)]
pub struct SilentAudio {
    audio_dir: PathBuf,
}

impl SilentAudio {
    pub fn new(audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            audio_dir: audio_dir.into(),
        }
    }

    /// Where the asset for `cue` would be loaded from
    pub fn cue_path(&self, cue: SoundCue) -> PathBuf {
        self.audio_dir.join(cue.asset())
    }

    pub fn track_path(&self, track: AmbientTrack) -> PathBuf {
        self.audio_dir.join(track.asset())
    }
}

impl AudioSink for SilentAudio {
    fn play(&mut self, cue: SoundCue, volume: f32) {
        log::debug!("sound {} @ {:.2}", self.cue_path(cue).display(), volume);
    }

    fn ambient(&mut self, command: AmbientCommand, volume: f32) {
        let (verb, track) = match command {
            AmbientCommand::Play(track) => ("play", track),
            AmbientCommand::Stop(track) => ("stop", track),
        };
        log::debug!(
            "ambient {} {} @ {:.2}",
            verb,
            self.track_path(track).display(),
            volume
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chest_and_ring_share_asset() {
        assert_eq!(SoundCue::Chest.asset(), SoundCue::Ring.asset());
        assert_eq!(SoundCue::Ring.default_volume(), 0.3);
    }

    #[test]
    fn test_silent_sink_resolves_under_audio_dir() {
        let sink = SilentAudio::new("assets/audio");
        assert_eq!(
            sink.cue_path(SoundCue::SpecialKey),
            PathBuf::from("assets/audio/specialkey1.wav")
        );
        assert_eq!(
            sink.track_path(AmbientTrack::Haunted),
            PathBuf::from("assets/audio/sbkgd2.ogg")
        );
    }

    #[test]
    fn test_missing_assets_lists_each_file_once() {
        let dir = std::env::temp_dir().join(format!("lymynal-audio-{}", std::process::id()));
        let _ = std::fs::create_dir_all(&dir);
        std::fs::write(dir.join("coin.wav"), b"").unwrap();

        let missing = missing_assets(&dir);
        let _ = std::fs::remove_dir_all(&dir);

        // 13 cues share 12 files, plus 4 tracks, minus the one on disk
        assert_eq!(missing.len(), 15);
        assert!(!missing.contains(&dir.join("coin.wav")));
        assert!(missing.contains(&dir.join("chest.wav")));
        assert!(missing.contains(&dir.join("background.ogg")));
    }

    #[test]
    fn test_silent_sink_accepts_everything() {
        let mut sink = SilentAudio::default();
        sink.play(SoundCue::Jump, SoundCue::Jump.default_volume());
        sink.ambient(
            AmbientCommand::Play(AmbientTrack::Haunted),
            AmbientTrack::Haunted.default_volume(),
        );
    }
}
