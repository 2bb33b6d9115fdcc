//! Player kinematics
//!
//! Semi-implicit Euler with a half-step acceleration term on position, run
//! once per frame at a fixed cadence. Floor contact is not handled here; the
//! collision pass snaps the player onto solids afterwards.

use glam::Vec2;

use super::state::Player;
use crate::consts::*;

/// Movement keys held during a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
    /// Stops horizontal motion once the chest upgrade is owned
    pub down: bool,
}

impl Player {
    /// Cap downward speed; applied before integration so a landing frame never overshoots
    pub fn clamp_fall_speed(&mut self) {
        if self.vel.y > MAX_FALL_SPEED {
            self.vel.y = MAX_FALL_SPEED;
        }
    }

    /// Advance one frame of motion from held input
    pub fn integrate(&mut self, keys: HeldKeys, has_xcancel: bool) {
        self.clamp_fall_speed();

        self.acc = Vec2::new(0.0, GRAVITY);
        if keys.left {
            self.acc.x = -ACCEL;
        }
        if keys.right {
            self.acc.x = ACCEL;
        }
        if keys.down && has_xcancel {
            self.vel.x = 0.0;
        }

        // Proportional drag, not a fixed decelerator
        self.acc.x += self.vel.x * FRICTION;
        self.vel += self.acc;
        self.pos += self.vel + 0.5 * self.acc;

        self.clamp_to_screen();
    }

    fn clamp_to_screen(&mut self) {
        if self.pos.x + PLAYER_EDGE_MARGIN > SCREEN_WIDTH {
            self.pos.x = SCREEN_WIDTH - PLAYER_EDGE_MARGIN;
        }
        if self.pos.x < PLAYER_EDGE_MARGIN {
            self.pos.x = PLAYER_EDGE_MARGIN;
        }
        if self.pos.y < PLAYER_CEILING {
            self.pos.y = PLAYER_CEILING;
            self.vel.y = 0.0;
        }
    }

    /// Start a jump if still inside the coyote window. Returns whether it fired.
    pub fn jump(&mut self) -> bool {
        if self.air >= JUMP_WINDOW {
            return false;
        }
        self.vel.y = JUMP_VELOCITY;
        self.jumps += 1;
        true
    }

    /// Jump key released: cut the rise short for variable jump height
    pub fn cancel_jump(&mut self) {
        if self.air > 0 && self.vel.y < JUMP_MIN {
            self.vel.y = JUMP_MIN;
        }
    }
}
