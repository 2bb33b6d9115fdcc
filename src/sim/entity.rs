//! Stage entities: kinds, categories and animation
//!
//! Every tile the parser recognizes becomes one `Entity` tagged with a closed
//! `EntityKind`. The kind decides the entity's category (and therefore its
//! collision semantics), its box size and its animation sequence.

use std::ops::{Index, IndexMut};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::state::Flags;
use crate::consts::*;

/// Collision/bookkeeping category an entity is stored under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Obstacle,
    Hazard,
    StageExit,
    Collectible,
    RespawnPoint,
    Spike,
    SlowZone,
    Decorative,
    Lock,
    LockLeaf,
    Key,
    SpecialKey,
    SecretDoor,
    Tombstone,
    Chest,
    ReturnDoor,
    FloatingPlatform,
    Ring,
    Sword,
    FinalDoor,
}

impl Category {
    pub const COUNT: usize = 20;

    pub const ALL: [Category; Category::COUNT] = [
        Category::Obstacle,
        Category::Hazard,
        Category::StageExit,
        Category::Collectible,
        Category::RespawnPoint,
        Category::Spike,
        Category::SlowZone,
        Category::Decorative,
        Category::Lock,
        Category::LockLeaf,
        Category::Key,
        Category::SpecialKey,
        Category::SecretDoor,
        Category::Tombstone,
        Category::Chest,
        Category::ReturnDoor,
        Category::FloatingPlatform,
        Category::Ring,
        Category::Sword,
        Category::FinalDoor,
    ];

    /// Categories the player stands on
    pub const SOLID: [Category; 2] = [Category::Obstacle, Category::FloatingPlatform];

    /// Categories that kill on any contact
    pub const LETHAL: [Category; 3] = [Category::Hazard, Category::Lock, Category::LockLeaf];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Obstacle => "obstacle",
            Category::Hazard => "hazard",
            Category::StageExit => "stage-exit",
            Category::Collectible => "collectible",
            Category::RespawnPoint => "respawn-point",
            Category::Spike => "spike",
            Category::SlowZone => "slow-zone",
            Category::Decorative => "decorative",
            Category::Lock => "lock",
            Category::LockLeaf => "lock-leaf",
            Category::Key => "key",
            Category::SpecialKey => "special-key",
            Category::SecretDoor => "secret-door",
            Category::Tombstone => "tombstone",
            Category::Chest => "chest",
            Category::ReturnDoor => "return-door",
            Category::FloatingPlatform => "floating-platform",
            Category::Ring => "ring",
            Category::Sword => "sword",
            Category::FinalDoor => "final-door",
        }
    }
}

/// One list per category, indexable by `Category`
#[derive(Debug, Clone)]
pub struct Categorized<T> {
    lists: [Vec<T>; Category::COUNT],
}

impl<T> Default for Categorized<T> {
    fn default() -> Self {
        Self {
            lists: std::array::from_fn(|_| Vec::new()),
        }
    }
}

impl<T> Categorized<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-empty and empty lists alike, in `Category::ALL` order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &Vec<T>)> {
        Category::ALL.into_iter().zip(self.lists.iter())
    }

    /// Total number of items across all categories
    pub fn total_len(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    /// Map every item into a new container, keeping categories and order
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Categorized<U> {
        let mut out = Categorized::new();
        for (category, list) in Category::ALL.into_iter().zip(self.lists) {
            out[category] = list.into_iter().map(&mut f).collect();
        }
        out
    }

    pub(crate) fn lists_mut(&mut self) -> impl Iterator<Item = &mut Vec<T>> {
        self.lists.iter_mut()
    }
}

impl<T> Index<Category> for Categorized<T> {
    type Output = Vec<T>;

    fn index(&self, category: Category) -> &Vec<T> {
        &self.lists[category as usize]
    }
}

impl<T> IndexMut<Category> for Categorized<T> {
    fn index_mut(&mut self, category: Category) -> &mut Vec<T> {
        &mut self.lists[category as usize]
    }
}

/// Entity types, one per tile glyph (and stage-dependent variant)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Wall,
    Wall2,
    Wall3,
    Platform,
    SecretWall,
    BadLeaf,
    EyeEnemy,
    EyeEnemyInvert,
    Exit,
    Coin,
    RespawnPoint,
    Spike,
    Grass,
    Bush,
    Guts,
    Lock,
    LockLeaf,
    Key,
    SpecialKey,
    SpecialKey2,
    SecretDoor,
    SecretDoor2,
    Tombstone,
    BrokenTombstone,
    Chest,
    ReturnDoor,
    FloatingPlatform,
    Ring,
    Sword,
    FinalDoor,
}

impl EntityKind {
    pub fn category(&self) -> Category {
        use EntityKind::*;
        match self {
            Wall | Wall2 | Wall3 | Platform | SecretWall => Category::Obstacle,
            BadLeaf | EyeEnemy | EyeEnemyInvert => Category::Hazard,
            Exit => Category::StageExit,
            Coin => Category::Collectible,
            RespawnPoint => Category::RespawnPoint,
            Spike => Category::Spike,
            Bush | Guts => Category::SlowZone,
            Grass => Category::Decorative,
            Lock => Category::Lock,
            LockLeaf => Category::LockLeaf,
            Key => Category::Key,
            SpecialKey | SpecialKey2 => Category::SpecialKey,
            SecretDoor | SecretDoor2 => Category::SecretDoor,
            Tombstone | BrokenTombstone => Category::Tombstone,
            Chest => Category::Chest,
            ReturnDoor => Category::ReturnDoor,
            FloatingPlatform => Category::FloatingPlatform,
            Ring => Category::Ring,
            Sword => Category::Sword,
            FinalDoor => Category::FinalDoor,
        }
    }

    /// Sprite footprint in pixels
    pub fn size(&self) -> Vec2 {
        match self {
            EntityKind::FinalDoor => Vec2::new(32.0, 48.0),
            _ => Vec2::splat(TILE_SIZE),
        }
    }

    /// Frame sequence for kinds that animate on a timer
    pub fn animation(&self) -> Option<&'static Animation> {
        use EntityKind::*;
        match self {
            BadLeaf | Bush | Lock | LockLeaf => Some(&ALTERNATE_30),
            Grass => Some(&ALTERNATE_15),
            Sword => Some(&ALTERNATE_20),
            Exit => Some(&EXIT_BLINK),
            Coin => Some(&COIN_SPIN),
            RespawnPoint => Some(&RESPAWN_PULSE),
            Key => Some(&KEY_SPIN),
            SpecialKey | SpecialKey2 => Some(&SPECIAL_KEY_SPIN),
            Ring => Some(&RING_SPIN),
            _ => None,
        }
    }
}

/// Timer-driven frame sequence
///
/// Every `period` frames the tick advances and the shown frame becomes
/// `frames[tick % frames.len()]`. Frame 0 is shown before the first advance.
#[derive(Debug, PartialEq, Eq)]
pub struct Animation {
    pub period: u32,
    pub frames: &'static [u8],
}

const ALTERNATE_15: Animation = Animation { period: 15, frames: &[0, 1] };
const ALTERNATE_20: Animation = Animation { period: 20, frames: &[0, 1] };
const ALTERNATE_30: Animation = Animation { period: 30, frames: &[0, 1] };
// Alternate frame on every 8th tick only
const EXIT_BLINK: Animation = Animation {
    period: 30,
    frames: &[1, 0, 0, 0, 0, 0, 0, 0],
};
// Cycles 1..=n start from the first image on the first tick
const COIN_SPIN: Animation = Animation { period: 5, frames: &[3, 0, 1, 2] };
const RESPAWN_PULSE: Animation = Animation { period: 10, frames: &[3, 0, 1, 2] };
const KEY_SPIN: Animation = Animation { period: 10, frames: &[4, 0, 1, 2, 3] };
const SPECIAL_KEY_SPIN: Animation = Animation { period: 10, frames: &[3, 0, 1, 2] };
const RING_SPIN: Animation = Animation { period: 10, frames: &[2, 0, 1] };

/// Animation phase of one entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimState {
    pub timer: u32,
    pub tick: u32,
    /// Index into the kind's preloaded image sequence
    pub frame: u8,
}

impl AnimState {
    pub fn advance(&mut self, anim: &Animation) {
        self.timer += 1;
        if self.timer == anim.period {
            self.timer = 0;
            self.tick = (self.tick + 1) % anim.frames.len() as u32;
            self.frame = anim.frames[self.tick as usize];
        }
    }
}

/// Parser output: what to spawn and where
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub kind: EntityKind,
    pub center: Vec2,
}

/// A live entity on the current stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub bounds: Aabb,
    pub anim: AnimState,
    /// Signed pixels per frame for moving kinds
    pub speed: f32,
}

impl Entity {
    pub fn new(kind: EntityKind, center: Vec2) -> Self {
        let speed = match kind {
            EntityKind::FloatingPlatform => 2.0,
            EntityKind::EyeEnemy | EntityKind::EyeEnemyInvert => 3.0,
            _ => 0.0,
        };
        Self {
            kind,
            bounds: Aabb::from_center(center, kind.size()),
            anim: AnimState::default(),
            speed,
        }
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    /// Advance animation and motion by one frame
    pub fn advance(&mut self, flags: &Flags) {
        if let Some(anim) = self.kind.animation() {
            self.anim.advance(anim);
        }

        match self.kind {
            EntityKind::SecretDoor => self.anim.frame = flags.has_sk1 as u8,
            EntityKind::SecretDoor2 => self.anim.frame = flags.has_sk2 as u8,
            EntityKind::FinalDoor => self.anim.frame = flags.has_sword as u8,
            EntityKind::FloatingPlatform => {
                self.bounds.min.x += self.speed;
                if self.bounds.left() < 32.0 {
                    self.speed = -self.speed;
                }
                if self.bounds.left() > SCREEN_WIDTH - 48.0 {
                    self.speed = -self.speed;
                }
            }
            EntityKind::EyeEnemy => {
                self.bounds.min.y += self.speed;
                if self.bounds.top() > SCREEN_HEIGHT - 32.0 {
                    self.bounds.min.y = SCREEN_HEIGHT / 2.0;
                }
            }
            EntityKind::EyeEnemyInvert => {
                self.bounds.min.y -= self.speed;
                if self.bounds.top() < 16.0 {
                    self.bounds.min.y = SCREEN_HEIGHT - 32.0;
                }
            }
            _ => {}
        }
    }
}

impl From<Placement> for Entity {
    fn from(placement: Placement) -> Self {
        Entity::new(placement.kind, placement.center)
    }
}
