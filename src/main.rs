//! Lymynal Labrynthe level checker
//!
//! Loads the settings and stage-name table, warns about missing audio
//! assets, then parses every stage file in index order until the end
//! sentinel and logs what each stage contains.
//!
//! Usage: `lymynal [settings.json]` (set `RUST_LOG=info` to see the report)

use std::path::PathBuf;
use std::process::ExitCode;

use lymynal::Settings;
use lymynal::audio::missing_assets;
use lymynal::consts::SK2_COINS;
use lymynal::sim::{EntityRegistry, Flags, StageLoad, parse};
use lymynal::stages::{DirStageSource, StageError, StageNames, StageSource};

fn main() -> ExitCode {
    env_logger::init();

    let settings_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("settings.json"));

    let settings = match Settings::load(&settings_path) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    for path in missing_assets(&settings.audio_dir) {
        log::warn!("Missing audio asset {}", path.display());
    }

    match check_stages(&settings) {
        Ok(count) => {
            log::info!("{} stages parsed cleanly", count);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Parse stages until the end sentinel, returning how many were playable
fn check_stages(settings: &Settings) -> Result<u32, StageError> {
    let names = StageNames::load(&settings.names_file).unwrap_or_else(|e| {
        log::warn!("{}; captions will fall back to stage numbers", e);
        StageNames::default()
    });
    let mut source = DirStageSource::new(&settings.levels_dir);

    // Every conditional tile unlocked, so the report shows the full layout
    let flags = Flags {
        has_ring: true,
        coins: SK2_COINS,
        ..Default::default()
    };
    let mut registry = EntityRegistry::new();

    let mut stage = 0;
    loop {
        let text = source.stage_text(stage)?;
        let result = match parse(&text, stage, &flags)
            .map_err(|source| StageError::Level { stage, source })?
        {
            StageLoad::EndOfGame => return Ok(stage),
            StageLoad::Stage(result) => result,
        };

        let spawn = registry.replace(result);
        log::info!(
            "{} | spawn ({}, {}) | {} entities",
            names.caption(stage),
            spawn.x,
            spawn.y,
            registry.total_len()
        );
        for (category, count) in registry.counts() {
            log::info!("    {:<18} {}", category.as_str(), count);
        }
        stage += 1;
    }
}
