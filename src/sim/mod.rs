//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - No randomness
//! - Stable iteration order (category order, then placement order)
//! - No rendering, audio or platform dependencies

pub mod aabb;
pub mod collision;
pub mod entity;
pub mod level;
pub mod physics;
pub mod progression;
pub mod registry;
pub mod state;
pub mod tick;

pub use aabb::Aabb;
pub use collision::{Outcome, land, resolve, resolve_contact};
pub use entity::{Animation, Categorized, Category, Entity, EntityKind, Placement};
pub use level::{END_SENTINEL, LevelError, LevelLoadResult, StageLoad, parse, tile_kind};
pub use physics::HeldKeys;
pub use progression::{SideEffect, StageAction, StageView, Transition, next_stage};
pub use registry::EntityRegistry;
pub use state::{
    Backdrop, FINAL_STAGE, FlagDelta, Flags, GamePhase, GameState, HAUNTED_STAGE, Player,
    SECRET_STAGE_FIRST, SECRET_STAGE_SECOND,
};
pub use tick::{FrameReport, TickInput, load_stage, tick};
