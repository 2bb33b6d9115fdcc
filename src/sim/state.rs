//! Game state and core simulation types
//!
//! Everything the frame step reads or writes lives here and is passed
//! explicitly; there is no process-wide mutable state.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::entity::{AnimState, Animation};
use super::registry::EntityRegistry;
use crate::consts::*;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Stages are being played
    Playing,
    /// The stage sequence reached its end sentinel
    Finished,
}

/// Persistent progression flags and counters (lifetime = one run)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags {
    /// First special key (found on stage 6), opens the stage 7 secret door
    pub has_sk1: bool,
    /// Second special key, opens the later secret door
    pub has_sk2: bool,
    pub has_ring: bool,
    pub has_sword: bool,
    /// Down input stops horizontal motion dead
    pub has_xcancel: bool,
    /// Set by a return-door trip; suppresses coins for the next stage load only
    pub returned: bool,
    pub coins: u32,
    pub player_deaths: u32,
    /// Jumps of discarded player instances
    pub total_jumps: u32,
    /// Coin cells taken so far, as `(stage, col, row)`; never respawn
    pub collected_coins: BTreeSet<(u32, u32, u32)>,
}

/// A single mutation of `Flags`, produced by progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagDelta {
    CollectCoin,
    RecordDeath,
    GrantSpecialKey1,
    GrantSpecialKey2,
    ClearSpecialKeys,
    GrantXCancel,
    GrantRing,
    GrantSword,
    MarkReturned,
    /// Remove a coin cell from its stage for the rest of the run
    TakeCoinCell { stage: u32, col: u32, row: u32 },
}

impl Flags {
    pub fn apply(&mut self, delta: FlagDelta) {
        match delta {
            FlagDelta::CollectCoin => self.coins += 1,
            FlagDelta::RecordDeath => self.player_deaths += 1,
            FlagDelta::GrantSpecialKey1 => self.has_sk1 = true,
            FlagDelta::GrantSpecialKey2 => self.has_sk2 = true,
            FlagDelta::ClearSpecialKeys => {
                self.has_sk1 = false;
                self.has_sk2 = false;
            }
            FlagDelta::GrantXCancel => self.has_xcancel = true,
            FlagDelta::GrantRing => self.has_ring = true,
            FlagDelta::GrantSword => self.has_sword = true,
            FlagDelta::MarkReturned => self.returned = true,
            FlagDelta::TakeCoinCell { stage, col, row } => {
                self.collected_coins.insert((stage, col, row));
            }
        }
    }

    /// Whether the coin whose tile is centered at `center` was already taken
    pub fn coin_taken(&self, stage: u32, center: Vec2) -> bool {
        let (col, row) = grid_cell(center);
        self.collected_coins.contains(&(stage, col, row))
    }
}

/// Grid cell containing `point`
pub fn grid_cell(point: Vec2) -> (u32, u32) {
    let cell = (point / TILE_SIZE).floor().max(Vec2::ZERO);
    (cell.x as u32, cell.y as u32)
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Midbottom of the collision box
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
    /// Frames since last grounded
    pub air: u32,
    /// Jumps performed by this instance
    pub jumps: u32,
}

impl Player {
    pub fn new(spawn: Vec2) -> Self {
        Self {
            pos: spawn,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            air: 0,
            jumps: 0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_midbottom(self.pos, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT))
    }
}

/// Full-screen backdrop behind the tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Backdrop {
    Plain,
    /// First secret stage, animated
    SecretFirst { frame: u8 },
    /// Second secret stage, animated
    SecretSecond { frame: u8 },
    Win,
}

const BACKDROP_CYCLE: Animation = Animation {
    period: 10,
    frames: &[0, 1, 2],
};

/// First secret stage (behind the stage 7 door)
pub const SECRET_STAGE_FIRST: u32 = 8;
/// Second secret stage (behind the later door)
pub const SECRET_STAGE_SECOND: u32 = 17;
/// Stage that starts the second secret ambient track on load
pub const HAUNTED_STAGE: u32 = 13;
/// Last stage, reached through the final door
pub const FINAL_STAGE: u32 = 20;

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub flags: Flags,
    pub stage_index: u32,
    /// False until the current `stage_index` has been parsed and swapped in
    pub stage_loaded: bool,
    pub phase: GamePhase,
    /// Where the player reappears after death
    pub spawn: Vec2,
    pub player: Player,
    pub registry: EntityRegistry,
    /// Frames simulated
    pub time_ticks: u64,
    /// Each secret backdrop keeps its own phase
    backdrop_first: AnimState,
    backdrop_second: AnimState,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            flags: Flags::default(),
            stage_index: 0,
            stage_loaded: false,
            phase: GamePhase::Playing,
            spawn: Vec2::ZERO,
            player: Player::new(Vec2::ZERO),
            registry: EntityRegistry::new(),
            time_ticks: 0,
            backdrop_first: AnimState::default(),
            backdrop_second: AnimState::default(),
        }
    }

    /// Stage the loop must parse before the next tick, if any
    pub fn pending_stage(&self) -> Option<u32> {
        match self.phase {
            GamePhase::Playing if !self.stage_loaded => Some(self.stage_index),
            _ => None,
        }
    }

    /// Replace the player at the current spawn, folding its jumps into the total
    pub fn respawn_player(&mut self) {
        self.flags.total_jumps += self.player.jumps;
        self.player = Player::new(self.spawn);
    }

    /// Lifetime jumps including the live player instance
    pub fn lifetime_jumps(&self) -> u32 {
        self.flags.total_jumps + self.player.jumps
    }

    pub fn backdrop(&self) -> Backdrop {
        match self.stage_index {
            SECRET_STAGE_FIRST => Backdrop::SecretFirst {
                frame: self.backdrop_first.frame,
            },
            SECRET_STAGE_SECOND => Backdrop::SecretSecond {
                frame: self.backdrop_second.frame,
            },
            FINAL_STAGE => Backdrop::Win,
            _ => Backdrop::Plain,
        }
    }

    pub(crate) fn advance_backdrop(&mut self) {
        match self.stage_index {
            SECRET_STAGE_FIRST => self.backdrop_first.advance(&BACKDROP_CYCLE),
            SECRET_STAGE_SECOND => self.backdrop_second.advance(&BACKDROP_CYCLE),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_wants_stage_zero() {
        let state = GameState::new();
        assert_eq!(state.pending_stage(), Some(0));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_respawn_folds_jumps() {
        let mut state = GameState::new();
        state.spawn = Vec2::new(50.0, 60.0);
        state.player.jumps = 4;
        state.flags.total_jumps = 3;

        state.respawn_player();
        assert_eq!(state.flags.total_jumps, 7);
        assert_eq!(state.player.jumps, 0);
        assert_eq!(state.player.pos, Vec2::new(50.0, 60.0));
        assert_eq!(state.lifetime_jumps(), 7);
    }

    #[test]
    fn test_clear_special_keys() {
        let mut flags = Flags {
            has_sk1: true,
            has_sk2: true,
            has_ring: true,
            ..Default::default()
        };
        flags.apply(FlagDelta::ClearSpecialKeys);
        assert!(!flags.has_sk1);
        assert!(!flags.has_sk2);
        assert!(flags.has_ring);
    }

    #[test]
    fn test_backdrop_cycles_on_secret_stage() {
        let mut state = GameState::new();
        state.stage_index = SECRET_STAGE_FIRST;
        assert_eq!(state.backdrop(), Backdrop::SecretFirst { frame: 0 });
        for _ in 0..10 {
            state.advance_backdrop();
        }
        assert_eq!(state.backdrop(), Backdrop::SecretFirst { frame: 1 });

        state.stage_index = FINAL_STAGE;
        assert_eq!(state.backdrop(), Backdrop::Win);
    }

    #[test]
    fn test_secret_backdrops_keep_own_phase() {
        let mut state = GameState::new();
        state.stage_index = SECRET_STAGE_FIRST;
        for _ in 0..20 {
            state.advance_backdrop();
        }
        assert_eq!(state.backdrop(), Backdrop::SecretFirst { frame: 2 });

        state.stage_index = SECRET_STAGE_SECOND;
        assert_eq!(state.backdrop(), Backdrop::SecretSecond { frame: 0 });
        for _ in 0..10 {
            state.advance_backdrop();
        }

        state.stage_index = SECRET_STAGE_FIRST;
        assert_eq!(state.backdrop(), Backdrop::SecretFirst { frame: 2 });
        state.stage_index = SECRET_STAGE_SECOND;
        assert_eq!(state.backdrop(), Backdrop::SecretSecond { frame: 1 });
    }

    #[test]
    fn test_coin_cells_are_per_stage() {
        let mut flags = Flags::default();
        flags.apply(FlagDelta::TakeCoinCell {
            stage: 19,
            col: 2,
            row: 5,
        });
        assert!(flags.coin_taken(19, Vec2::new(40.0, 88.0)));
        assert!(!flags.coin_taken(18, Vec2::new(40.0, 88.0)));
        assert!(!flags.coin_taken(19, Vec2::new(56.0, 88.0)));
        assert_eq!(grid_cell(Vec2::new(40.0, 88.0)), (2, 5));
    }
}
