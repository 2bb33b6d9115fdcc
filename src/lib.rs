//! Lymynal Labrynthe - a tile-grid platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (level parsing, physics, collisions, progression)
//! - `platform`: External collaborator traits and the frame loop that drives them
//! - `audio`: Symbolic sound cues and ambient-track commands
//! - `stages`: Stage files and the stage-name table
//! - `settings`: Data-driven configuration
//! - `summary`: End-of-run statistics

pub mod audio;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod stages;
pub mod summary;

pub use settings::Settings;
pub use summary::RunSummary;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Frame rate the loop is paced at
    pub const FPS: u32 = 60;

    /// Screen dimensions (pixels)
    pub const SCREEN_WIDTH: f32 = 640.0;
    pub const SCREEN_HEIGHT: f32 = 480.0;

    /// Grid cell size (pixels)
    pub const TILE_SIZE: f32 = 16.0;

    /// Horizontal acceleration from left/right input
    pub const ACCEL: f32 = 0.6;
    /// Proportional drag applied to horizontal velocity (negative)
    pub const FRICTION: f32 = -0.12;
    /// Gravitational acceleration per frame
    pub const GRAVITY: f32 = 0.45;
    /// Vertical velocity applied by a jump (upward)
    pub const JUMP_VELOCITY: f32 = -12.0;
    /// Upward speed a released jump is capped to
    pub const JUMP_MIN: f32 = -3.0;
    /// Airborne frames during which a jump is still honored
    pub const JUMP_WINDOW: u32 = 6;
    /// Fall speed cap, keeps the player from tunneling through a 16px floor
    pub const MAX_FALL_SPEED: f32 = 14.0;

    /// Player x is kept this far from either screen edge
    pub const PLAYER_EDGE_MARGIN: f32 = 24.0;
    /// Player feet never go above this y
    pub const PLAYER_CEILING: f32 = 32.0;
    /// Player collision box
    pub const PLAYER_WIDTH: f32 = 16.0;
    pub const PLAYER_HEIGHT: f32 = 32.0;

    /// Coins needed before the first special key appears (stage 6)
    pub const SK1_COINS: u32 = 35;
    /// Coins needed before the second special key appears (past stage 6)
    pub const SK2_COINS: u32 = 94;

    /// Window caption prefix
    pub const GAME_TITLE: &str = "Lymynal Labrynthe";
}

/// Center of the grid cell whose top-left corner is `(col, row)`
#[inline]
pub fn tile_center(col: f32, row: f32) -> Vec2 {
    Vec2::new(col + consts::TILE_SIZE / 2.0, row + consts::TILE_SIZE / 2.0)
}
