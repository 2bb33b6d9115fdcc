//! Stage text parser
//!
//! A stage file starts with a six digit spawn header (`xxxyyy`), optionally
//! followed by a line break. An `x` right after the header marks the end of
//! the stage sequence. Everything after that is a tile grid: `,` steps one
//! cell right (wrapping at the screen edge), a newline steps one cell down,
//! and any other character is looked up in the tile table.

use glam::Vec2;
use thiserror::Error;

use super::entity::{Categorized, EntityKind, Placement};
use super::state::Flags;
use crate::consts::*;
use crate::tile_center;

/// Marker after the spawn header meaning "no further stage"
pub const END_SENTINEL: char = 'x';

/// Errors that abort a stage parse
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("stage text too short for spawn header ({0} chars)")]
    TruncatedHeader(usize),

    #[error("invalid spawn coordinate {0:?}")]
    Spawn(String),
}

/// Parsed stage: spawn point plus every placement, grouped by category
#[derive(Debug, Clone, Default)]
pub struct LevelLoadResult {
    pub spawn: Vec2,
    pub placements: Categorized<Placement>,
}

impl LevelLoadResult {
    fn push(&mut self, kind: EntityKind, center: Vec2) {
        self.placements[kind.category()].push(Placement { kind, center });
    }
}

/// Result of parsing one stage file
#[derive(Debug, Clone)]
pub enum StageLoad {
    Stage(LevelLoadResult),
    EndOfGame,
}

/// Parse stage text for `stage` against the current progression flags
pub fn parse(text: &str, stage: u32, flags: &Flags) -> Result<StageLoad, LevelError> {
    let (x_str, y_str, rest) = split_header(text)?;

    let grid = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);

    if grid.starts_with(END_SENTINEL) {
        return Ok(StageLoad::EndOfGame);
    }

    let spawn = Vec2::new(parse_coord(x_str)?, parse_coord(y_str)?);
    let mut result = LevelLoadResult {
        spawn,
        ..Default::default()
    };

    let mut col = 0.0;
    let mut row = 0.0;
    for ch in grid.chars() {
        match ch {
            ',' => {
                col += TILE_SIZE;
                if col >= SCREEN_WIDTH {
                    col = 0.0;
                }
            }
            // Column is not reset here, rows wrap through their commas
            '\n' => row += TILE_SIZE,
            'f' => result.push(EntityKind::FinalDoor, Vec2::new(col + 16.0, row + 24.0)),
            _ => {
                let center = tile_center(col, row);
                match tile_kind(ch, stage, flags) {
                    Some(EntityKind::Coin) if flags.coin_taken(stage, center) => {}
                    Some(kind) => result.push(kind, center),
                    None => {}
                }
            }
        }
    }

    Ok(StageLoad::Stage(result))
}

/// Tile glyph to entity kind, applying the stage and inventory conditions
pub fn tile_kind(ch: char, stage: u32, flags: &Flags) -> Option<EntityKind> {
    use EntityKind::*;
    let kind = match ch {
        '1' if stage < 10 => Wall,
        '1' if stage < 18 => Wall2,
        '1' => Wall3,
        '2' => Platform,
        '3' => BadLeaf,
        '4' => Exit,
        '5' if !flags.returned => Coin,
        '6' => RespawnPoint,
        '7' => Grass,
        '8' => Bush,
        '9' => Spike,
        'L' => Lock,
        'l' => LockLeaf,
        'K' => Key,
        's' if stage == 6 && flags.coins >= SK1_COINS => SpecialKey,
        's' if stage > 6 && flags.coins >= SK2_COINS => SpecialKey2,
        'D' if stage == 7 => SecretDoor,
        'D' if stage > 7 => SecretDoor2,
        'r' => Tombstone,
        'b' => BrokenTombstone,
        'G' => Guts,
        'C' => Chest,
        'B' => ReturnDoor,
        'w' => SecretWall,
        'F' => FloatingPlatform,
        'R' => Ring,
        'E' => EyeEnemy,
        'I' => EyeEnemyInvert,
        'S' if flags.has_ring => Sword,
        'f' => FinalDoor,
        _ => return None,
    };
    Some(kind)
}

fn split_header(text: &str) -> Result<(&str, &str, &str), LevelError> {
    if text.len() < 6 {
        return Err(LevelError::TruncatedHeader(text.chars().count()));
    }
    if !text.is_char_boundary(3) || !text.is_char_boundary(6) {
        return Err(LevelError::Spawn(text.chars().take(6).collect()));
    }
    let (header, rest) = text.split_at(6);
    let (x, y) = header.split_at(3);
    Ok((x, y, rest))
}

fn parse_coord(digits: &str) -> Result<f32, LevelError> {
    digits
        .trim()
        .parse::<u32>()
        .map(|v| v as f32)
        .map_err(|_| LevelError::Spawn(digits.to_string()))
}
