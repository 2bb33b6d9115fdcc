//! Fixed-cadence frame step
//!
//! One call to `tick` is one rendered frame: input, physics, collision,
//! progression, then the animation pass. Stage loads happen between frames
//! through `load_stage`, so a transition requested by progression is never
//! observed half-way through resolution.

use super::collision::{Outcome, resolve_contact};
use super::entity::Category;
use super::level::{LevelError, StageLoad, parse};
use super::physics::HeldKeys;
use super::progression::{SideEffect, StageAction, StageView, apply};
use super::state::{FlagDelta, GamePhase, GameState, HAUNTED_STAGE, Player, grid_cell};
use crate::audio::{AmbientCommand, AmbientTrack, SoundCue};

/// Input commands for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub held: HeldKeys,
    /// Jump key went down this frame
    pub jump_pressed: bool,
    /// Jump key came up this frame
    pub jump_released: bool,
}

/// Result of one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub outcome: Outcome,
    pub effects: Vec<SideEffect>,
}

/// Parse the pending stage and swap it in.
///
/// On the end sentinel the run is marked finished and no effects are
/// returned. A parse error leaves the state untouched.
pub fn load_stage(state: &mut GameState, text: &str) -> Result<Vec<SideEffect>, LevelError> {
    let stage = state.stage_index;
    let result = match parse(text, stage, &state.flags)? {
        StageLoad::EndOfGame => {
            log::info!("Stage {} is the end sentinel, run finished", stage);
            state.phase = GamePhase::Finished;
            return Ok(Vec::new());
        }
        StageLoad::Stage(result) => result,
    };

    state.spawn = state.registry.replace(result);
    state.respawn_player();
    state.stage_loaded = true;
    // Coin suppression lasts exactly one load
    state.flags.returned = false;

    log::info!(
        "Loaded stage {} ({} entities, spawn {:?})",
        stage,
        state.registry.total_len(),
        state.spawn
    );

    let mut effects = vec![SideEffect::StageCaption(stage)];
    if stage == HAUNTED_STAGE {
        effects.push(SideEffect::Ambient(AmbientCommand::Play(AmbientTrack::Haunted)));
    }
    Ok(effects)
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) -> FrameReport {
    if state.phase != GamePhase::Playing || !state.stage_loaded {
        return FrameReport::default();
    }
    state.time_ticks += 1;

    let mut effects = Vec::new();
    if input.jump_pressed && state.player.jump() {
        effects.push(SideEffect::Sound(SoundCue::Jump));
    }
    if input.jump_released {
        state.player.cancel_jump();
    }

    state.player.integrate(input.held, state.flags.has_xcancel);
    let (outcome, consumed) = resolve_contact(&mut state.player, &mut state.registry, &state.flags);

    // A taken coin stays gone from its stage for the rest of the run
    if let (Outcome::Coin, Some(coin)) = (outcome, consumed) {
        let (col, row) = grid_cell(coin.bounds.center());
        state.flags.apply(FlagDelta::TakeCoinCell {
            stage: state.stage_index,
            col,
            row,
        });
    }

    let view = StageView {
        keys_remaining: state.registry.len(Category::Key),
    };
    let transition = apply(outcome, state.stage_index, &state.flags, view);

    for delta in &transition.deltas {
        state.flags.apply(*delta);
    }
    for action in &transition.actions {
        match action {
            StageAction::RespawnPlayer => state.respawn_player(),
            StageAction::SpawnAtRespawnAnchor => {
                if let Some(anchor) = state.registry.respawn_anchor() {
                    state.spawn = anchor;
                }
            }
            StageAction::Dampen => dampen(&mut state.player),
            StageAction::OpenLocks => {
                let opened = state.registry.open_locks();
                log::debug!("Opened {} locks", opened);
            }
        }
    }
    if let Some(next) = transition.next_stage {
        log::info!("Stage {} -> {} (outcome {})", state.stage_index, next, outcome.code());
        state.stage_index = next;
        state.stage_loaded = false;
    }
    effects.extend(transition.effects);

    state.registry.advance(&state.flags);
    state.advance_backdrop();

    FrameReport { outcome, effects }
}

/// Slow-zone drag: regains the jump and caps speed
fn dampen(player: &mut Player) {
    player.air = 0;
    player.vel.x = player.vel.x.clamp(-2.0, 2.0);
    if player.vel.y > 2.0 {
        player.vel.y = 2.0;
    } else if player.vel.y < -5.0 {
        player.vel.y = -5.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use glam::Vec2;

    fn loaded(text: &str, stage: u32) -> GameState {
        let mut state = GameState::new();
        state.stage_index = stage;
        load_stage(&mut state, text).expect("load");
        state
    }

    #[test]
    fn test_tick_without_stage_is_noop() {
        let mut state = GameState::new();
        let report = tick(&mut state, &TickInput::default());
        assert_eq!(report, FrameReport::default());
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_load_stage_emits_caption() {
        let mut state = GameState::new();
        state.stage_index = HAUNTED_STAGE;
        let effects = load_stage(&mut state, "100200\n1").unwrap();
        assert_eq!(
            effects,
            vec![
                SideEffect::StageCaption(HAUNTED_STAGE),
                SideEffect::Ambient(AmbientCommand::Play(AmbientTrack::Haunted)),
            ]
        );
        assert!(state.stage_loaded);
        assert_eq!(state.player.pos, Vec2::new(100.0, 200.0));
        assert_eq!(state.pending_stage(), None);
    }

    #[test]
    fn test_end_sentinel_finishes_run() {
        let mut state = GameState::new();
        assert!(load_stage(&mut state, "000000\nx").unwrap().is_empty());
        assert_eq!(state.phase, GamePhase::Finished);
        assert_eq!(state.pending_stage(), None);
    }

    #[test]
    fn test_parse_error_keeps_state() {
        let mut state = GameState::new();
        assert!(load_stage(&mut state, "abc").is_err());
        assert!(!state.stage_loaded);
        assert_eq!(state.pending_stage(), Some(0));
    }

    #[test]
    fn test_jump_plays_sound_and_counts() {
        let mut state = loaded("100200\n", 0);
        let report = tick(
            &mut state,
            &TickInput {
                jump_pressed: true,
                ..Default::default()
            },
        );
        assert!(report.effects.contains(&SideEffect::Sound(SoundCue::Jump)));
        assert_eq!(state.player.jumps, 1);
        assert!(state.player.vel.y < 0.0);
    }

    #[test]
    fn test_fall_into_exit_requests_next_stage() {
        // Exit centered at (40, 88), straight below the spawn
        let mut state = loaded("040060\n\n\n\n\n\n,,4", 7);

        let mut reached = None;
        for _ in 0..60 {
            let report = tick(&mut state, &TickInput::default());
            if report.outcome == Outcome::StageExit {
                reached = Some(report);
                break;
            }
        }
        let report = reached.expect("player should fall into the exit");
        assert!(report.effects.contains(&SideEffect::Sound(SoundCue::NextStage)));
        assert_eq!(state.stage_index, 9);
        assert_eq!(state.pending_stage(), Some(9));
        assert_eq!(tick(&mut state, &TickInput::default()), FrameReport::default());
    }

    #[test]
    fn test_death_respawns_at_spawn() {
        let mut state = loaded("040100\n,3", 0);
        state.player.pos = Vec2::new(30.0, 20.0);
        state.player.jumps = 2;

        let report = tick(&mut state, &TickInput::default());
        assert_eq!(report.outcome, Outcome::Death);
        assert_eq!(state.flags.player_deaths, 1);
        assert_eq!(state.flags.total_jumps, 2);
        assert_eq!(state.player.pos, Vec2::new(40.0, 100.0));
    }

    #[test]
    fn test_last_key_opens_locks() {
        let mut state = loaded("200200\n,K,,,,l,L", 0);
        state.player.pos = Vec2::new(PLAYER_EDGE_MARGIN, 20.0);
        state.player.vel = Vec2::ZERO;

        let report = tick(&mut state, &TickInput::default());
        assert_eq!(report.outcome, Outcome::Key);
        assert!(report.effects.contains(&SideEffect::Sound(SoundCue::Open)));
        assert_eq!(state.registry.len(Category::LockLeaf), 0);
        assert_eq!(state.registry.len(Category::Lock), 0);
    }

    #[test]
    fn test_returned_flag_lasts_one_load() {
        let mut state = GameState::new();
        state.flags.returned = true;
        load_stage(&mut state, "000000\n5").unwrap();
        assert_eq!(state.registry.len(Category::Collectible), 0);
        assert!(!state.flags.returned);

        state.stage_loaded = false;
        load_stage(&mut state, "000000\n5").unwrap();
        assert_eq!(state.registry.len(Category::Collectible), 1);
    }

    #[test]
    fn test_slow_zone_dampens() {
        // Bush centered at (24, 56)
        let mut state = loaded("200200\n,\n\n\n8", 0);
        state.player.pos = Vec2::new(PLAYER_EDGE_MARGIN, 80.0);
        state.player.vel = Vec2::new(6.0, -10.0);
        state.player.air = 5;

        let report = tick(&mut state, &TickInput::default());
        assert_eq!(report.outcome, Outcome::Slow);
        assert_eq!(state.player.air, 0);
        assert_eq!(state.player.vel.x, 2.0);
        assert_eq!(state.player.vel.y, -5.0);
    }

    #[test]
    fn test_collected_coin_never_respawns() {
        // Coin centered at (40, 88), straight below the spawn
        const STAGE: &str = "040060\n\n\n\n\n\n,,5";
        let mut state = loaded(STAGE, 20);

        let mut collected = false;
        for _ in 0..60 {
            if tick(&mut state, &TickInput::default()).outcome == Outcome::Coin {
                collected = true;
                break;
            }
        }
        assert!(collected, "player should fall onto the coin");
        assert_eq!(state.flags.coins, 1);

        // Return door 20 -> 19 leaves `returned` unset; the same stage text
        // loaded again must not hand the coin back
        state.stage_loaded = false;
        assert!(!state.flags.returned);
        load_stage(&mut state, STAGE).unwrap();
        assert_eq!(state.registry.len(Category::Collectible), 0);

        for _ in 0..60 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.flags.coins, 1);

        // Other stages keep their coins
        state.stage_index = 19;
        state.stage_loaded = false;
        load_stage(&mut state, STAGE).unwrap();
        assert_eq!(state.registry.len(Category::Collectible), 1);
    }

    #[test]
    fn test_respawn_point_moves_spawn() {
        // Respawn point centered at (40, 88) below the spawn, hazard at (104, 88)
        let mut state = loaded("040060\n\n\n\n\n\n,,6,,,,3", 0);
        assert_eq!(state.spawn, Vec2::new(40.0, 60.0));

        let mut touched = None;
        for _ in 0..60 {
            let report = tick(&mut state, &TickInput::default());
            if report.outcome == Outcome::RespawnPoint {
                touched = Some(report);
                break;
            }
        }
        let report = touched.expect("player should fall onto the respawn point");
        assert!(report.effects.contains(&SideEffect::Sound(SoundCue::Respawn)));
        assert_eq!(state.spawn, Vec2::new(40.0, 72.0));
        assert_eq!(state.registry.len(Category::RespawnPoint), 0);

        state.player.pos = Vec2::new(104.0, 95.0);
        state.player.vel = Vec2::ZERO;
        let report = tick(&mut state, &TickInput::default());
        assert_eq!(report.outcome, Outcome::Death);
        assert_eq!(state.flags.player_deaths, 1);
        assert_eq!(state.player.pos, Vec2::new(40.0, 72.0));
    }
}
