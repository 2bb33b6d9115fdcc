//! Player-versus-stage collision resolution
//!
//! Many overlaps can happen in one frame; the resolver reduces them to a
//! single `Outcome` by testing categories in a fixed priority order and
//! stopping at the first match. Landing on solids always runs first and only
//! moves the player, it never produces an outcome.

use serde::{Deserialize, Serialize};

use super::entity::{Category, Entity};
use super::registry::EntityRegistry;
use super::state::{Flags, Player};

/// What the player touched this frame, highest priority only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Outcome {
    #[default]
    None = 0,
    Death = 1,
    StageExit = 2,
    Coin = 3,
    RespawnPoint = 4,
    Slow = 5,
    Key = 6,
    SpecialKey = 7,
    Chest = 8,
    SecretDoor = 9,
    ReturnDoor = 10,
    Ring = 11,
    Sword = 12,
    FinalDoor = 13,
}

impl Outcome {
    /// Stable integer code
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        let outcome = match code {
            0 => Outcome::None,
            1 => Outcome::Death,
            2 => Outcome::StageExit,
            3 => Outcome::Coin,
            4 => Outcome::RespawnPoint,
            5 => Outcome::Slow,
            6 => Outcome::Key,
            7 => Outcome::SpecialKey,
            8 => Outcome::Chest,
            9 => Outcome::SecretDoor,
            10 => Outcome::ReturnDoor,
            11 => Outcome::Ring,
            12 => Outcome::Sword,
            13 => Outcome::FinalDoor,
            _ => return None,
        };
        Some(outcome)
    }
}

/// How a rule treats the entity it matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Contact {
    /// Entity stays
    Touch,
    /// Entity is removed in the same step as the match
    Consume,
}

/// Rules after landing, in priority order
const RULES: [(Category, Contact, Outcome); 13] = [
    (Category::StageExit, Contact::Touch, Outcome::StageExit),
    (Category::Collectible, Contact::Consume, Outcome::Coin),
    (Category::RespawnPoint, Contact::Consume, Outcome::RespawnPoint),
    (Category::Spike, Contact::Touch, Outcome::Death),
    (Category::SlowZone, Contact::Touch, Outcome::Slow),
    (Category::Key, Contact::Consume, Outcome::Key),
    (Category::SpecialKey, Contact::Consume, Outcome::SpecialKey),
    (Category::Chest, Contact::Consume, Outcome::Chest),
    (Category::SecretDoor, Contact::Touch, Outcome::SecretDoor),
    (Category::ReturnDoor, Contact::Touch, Outcome::ReturnDoor),
    (Category::Ring, Contact::Consume, Outcome::Ring),
    (Category::Sword, Contact::Consume, Outcome::Sword),
    (Category::FinalDoor, Contact::Touch, Outcome::FinalDoor),
];

/// Snap a falling player onto the first solid it overlaps.
///
/// Returns whether the player is grounded this frame; the airborne counter
/// is reset or incremented accordingly.
pub fn land(player: &mut Player, registry: &EntityRegistry) -> bool {
    let bounds = player.bounds();
    let mut grounded = false;

    if player.vel.y > 0.0 {
        if let Some(solid) = registry.first_overlap(&Category::SOLID, &bounds) {
            // Feet must not have passed the solid's bottom edge
            if player.pos.y < solid.bounds.bottom() {
                player.pos.y = solid.bounds.top() + 1.0;
                player.vel.y = 0.0;
                player.air = 0;
                grounded = true;
            }
        }
    }

    if !grounded {
        player.air += 1;
    }
    grounded
}

/// Resolve all contacts for this frame and return the winning outcome
pub fn resolve(player: &mut Player, registry: &mut EntityRegistry, flags: &Flags) -> Outcome {
    resolve_contact(player, registry, flags).0
}

/// Same as `resolve`, also handing back the entity the winning rule consumed
pub fn resolve_contact(
    player: &mut Player,
    registry: &mut EntityRegistry,
    flags: &Flags,
) -> (Outcome, Option<Entity>) {
    land(player, registry);

    let bounds = player.bounds();
    if registry.overlaps_any(&Category::LETHAL, &bounds) {
        return (Outcome::Death, None);
    }

    let falling = player.vel.y > 0.0;
    for (category, contact, outcome) in RULES {
        // Spikes only bite from above, the final door only opens for the sword
        let armed = match category {
            Category::Spike => falling,
            Category::FinalDoor => flags.has_sword,
            _ => true,
        };
        if !armed {
            continue;
        }

        let (hit, consumed) = match contact {
            Contact::Touch => (registry.overlaps_any(&[category], &bounds), None),
            Contact::Consume => {
                let consumed = registry.consume_first(category, &bounds);
                (consumed.is_some(), consumed)
            }
        };
        if hit {
            log::debug!("Collision with {} -> outcome {}", category.as_str(), outcome.code());
            return (outcome, consumed);
        }
    }

    (Outcome::None, None)
}
