//! Progression state machine
//!
//! Interprets a collision outcome against the current stage index and
//! progression flags. `apply` is pure: it only describes what should happen
//! (stage change, flag deltas, stage actions, side effects) and the frame
//! step carries it out.

use serde::{Deserialize, Serialize};

use super::collision::Outcome;
use super::state::{FINAL_STAGE, FlagDelta, Flags, SECRET_STAGE_FIRST, SECRET_STAGE_SECOND};
use crate::audio::{AmbientCommand, AmbientTrack, SoundCue};

/// Last stage that hands out the first special key
const SK1_LAST_STAGE: u32 = 6;
/// Stage that exits the second secret area
const SECRET_EXIT_STAGE: u32 = 18;
/// Stage both secret-area return doors lead forward to
const REJOIN_STAGE: u32 = 19;

/// Changes to the live stage, applied by the frame step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageAction {
    /// Replace the player at the current spawn
    RespawnPlayer,
    /// Move the spawn to the last respawn point
    SpawnAtRespawnAnchor,
    /// Clamp velocity and reset the airborne counter
    Dampen,
    /// Remove every lock and lock-leaf
    OpenLocks,
}

/// Requests for the external collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SideEffect {
    Sound(SoundCue),
    Ambient(AmbientCommand),
    /// A stage finished loading; the caption should show its name
    StageCaption(u32),
}

/// What the stage looks like after collision consumption
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageView {
    pub keys_remaining: usize,
}

/// Everything one outcome causes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    pub next_stage: Option<u32>,
    pub deltas: Vec<FlagDelta>,
    pub actions: Vec<StageAction>,
    pub effects: Vec<SideEffect>,
}

impl Transition {
    fn goto(mut self, stage: u32) -> Self {
        self.next_stage = Some(stage);
        self
    }

    fn delta(mut self, delta: FlagDelta) -> Self {
        self.deltas.push(delta);
        self
    }

    fn action(mut self, action: StageAction) -> Self {
        self.actions.push(action);
        self
    }

    fn sound(mut self, cue: SoundCue) -> Self {
        self.effects.push(SideEffect::Sound(cue));
        self
    }

    fn ambient(mut self, command: AmbientCommand) -> Self {
        self.effects.push(SideEffect::Ambient(command));
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Transition::default()
    }
}

/// Stage reached through a stage exit; two branch stages are skipped
pub fn next_stage(stage: u32) -> u32 {
    match stage {
        7 => 9,
        16 => 18,
        _ => stage + 1,
    }
}

/// Map one outcome to its transition
pub fn apply(outcome: Outcome, stage: u32, flags: &Flags, view: StageView) -> Transition {
    use AmbientCommand::{Play, Stop};

    let t = Transition::default();
    match outcome {
        Outcome::None => t,
        Outcome::Death => t
            .delta(FlagDelta::RecordDeath)
            .action(StageAction::RespawnPlayer)
            .sound(SoundCue::Death),
        Outcome::StageExit => t.goto(next_stage(stage)).sound(SoundCue::NextStage),
        Outcome::Coin => t.delta(FlagDelta::CollectCoin).sound(SoundCue::Coin),
        Outcome::RespawnPoint => t
            .action(StageAction::SpawnAtRespawnAnchor)
            .sound(SoundCue::Respawn),
        Outcome::Slow => t.action(StageAction::Dampen),
        Outcome::Key if view.keys_remaining == 0 => {
            t.action(StageAction::OpenLocks).sound(SoundCue::Open)
        }
        Outcome::Key => t.sound(SoundCue::Partial),
        Outcome::SpecialKey => {
            let delta = if stage <= SK1_LAST_STAGE {
                FlagDelta::GrantSpecialKey1
            } else {
                FlagDelta::GrantSpecialKey2
            };
            t.delta(delta).sound(SoundCue::SpecialKey)
        }
        Outcome::Chest => t.delta(FlagDelta::GrantXCancel).sound(SoundCue::Chest),
        Outcome::SecretDoor => {
            // The later key wins if both are somehow held
            let (target, track) = if flags.has_sk2 {
                (SECRET_STAGE_SECOND, AmbientTrack::SecretSecond)
            } else if flags.has_sk1 {
                (SECRET_STAGE_FIRST, AmbientTrack::SecretFirst)
            } else {
                return t;
            };
            t.goto(target)
                .sound(SoundCue::SecretDoor)
                .ambient(Stop(AmbientTrack::Main))
                .ambient(Play(track))
        }
        Outcome::ReturnDoor if matches!(stage, SECRET_EXIT_STAGE | FINAL_STAGE) => t
            .goto(REJOIN_STAGE)
            .sound(SoundCue::NextStage)
            .ambient(Stop(AmbientTrack::Main)),
        Outcome::ReturnDoor => t
            .goto(stage.saturating_sub(1))
            .delta(FlagDelta::MarkReturned)
            .delta(FlagDelta::ClearSpecialKeys)
            .sound(SoundCue::Return)
            .ambient(Stop(AmbientTrack::SecretFirst))
            .ambient(Stop(AmbientTrack::SecretSecond))
            .ambient(Play(AmbientTrack::Main)),
        Outcome::Ring => t.delta(FlagDelta::GrantRing).sound(SoundCue::Ring),
        Outcome::Sword => t.delta(FlagDelta::GrantSword).sound(SoundCue::Sword),
        Outcome::FinalDoor if flags.has_sword => {
            t.goto(FINAL_STAGE).ambient(Stop(AmbientTrack::Main))
        }
        Outcome::FinalDoor => t,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(outcome: Outcome, stage: u32, flags: &Flags) -> Transition {
        apply(outcome, stage, flags, StageView::default())
    }

    #[test]
    fn test_none_does_nothing() {
        assert!(run(Outcome::None, 4, &Flags::default()).is_empty());
    }

    #[test]
    fn test_stage_exit_skips_branches() {
        let flags = Flags::default();
        assert_eq!(run(Outcome::StageExit, 0, &flags).next_stage, Some(1));
        assert_eq!(run(Outcome::StageExit, 7, &flags).next_stage, Some(9));
        assert_eq!(run(Outcome::StageExit, 8, &flags).next_stage, Some(9));
        assert_eq!(run(Outcome::StageExit, 16, &flags).next_stage, Some(18));
        assert_eq!(run(Outcome::StageExit, 17, &flags).next_stage, Some(18));
    }

    #[test]
    fn test_death_respawns_and_counts() {
        let t = run(Outcome::Death, 3, &Flags::default());
        assert_eq!(t.next_stage, None);
        assert_eq!(t.deltas, vec![FlagDelta::RecordDeath]);
        assert_eq!(t.actions, vec![StageAction::RespawnPlayer]);
        assert_eq!(t.effects, vec![SideEffect::Sound(SoundCue::Death)]);
    }

    #[test]
    fn test_key_opens_locks_when_last() {
        let flags = Flags::default();
        let last = apply(Outcome::Key, 2, &flags, StageView { keys_remaining: 0 });
        assert_eq!(last.actions, vec![StageAction::OpenLocks]);

        let partial = apply(Outcome::Key, 2, &flags, StageView { keys_remaining: 2 });
        assert!(partial.actions.is_empty());
        assert_eq!(partial.effects, vec![SideEffect::Sound(SoundCue::Partial)]);
    }

    #[test]
    fn test_special_key_by_stage() {
        let flags = Flags::default();
        assert_eq!(
            run(Outcome::SpecialKey, 6, &flags).deltas,
            vec![FlagDelta::GrantSpecialKey1]
        );
        assert_eq!(
            run(Outcome::SpecialKey, 7, &flags).deltas,
            vec![FlagDelta::GrantSpecialKey2]
        );
    }

    #[test]
    fn test_secret_door_targets() {
        let none = Flags::default();
        assert!(run(Outcome::SecretDoor, 7, &none).is_empty());

        let sk1 = Flags {
            has_sk1: true,
            ..Default::default()
        };
        let t = run(Outcome::SecretDoor, 7, &sk1);
        assert_eq!(t.next_stage, Some(8));
        assert!(t.effects.contains(&SideEffect::Ambient(AmbientCommand::Play(
            AmbientTrack::SecretFirst
        ))));

        let both = Flags {
            has_sk1: true,
            has_sk2: true,
            ..Default::default()
        };
        assert_eq!(run(Outcome::SecretDoor, 16, &both).next_stage, Some(17));
    }

    #[test]
    fn test_return_door_from_secret_exits() {
        let flags = Flags {
            has_sk2: true,
            ..Default::default()
        };
        for stage in [18, 20] {
            let t = run(Outcome::ReturnDoor, stage, &flags);
            assert_eq!(t.next_stage, Some(19));
            // Forward exits keep the keys
            assert!(t.deltas.is_empty());
        }
    }

    #[test]
    fn test_return_door_steps_back() {
        let flags = Flags {
            has_sk1: true,
            ..Default::default()
        };
        let t = run(Outcome::ReturnDoor, 8, &flags);
        assert_eq!(t.next_stage, Some(7));
        assert_eq!(
            t.deltas,
            vec![FlagDelta::MarkReturned, FlagDelta::ClearSpecialKeys]
        );
        assert!(
            t.effects
                .contains(&SideEffect::Ambient(AmbientCommand::Play(AmbientTrack::Main)))
        );
    }

    #[test]
    fn test_final_door_needs_sword() {
        assert!(run(Outcome::FinalDoor, 19, &Flags::default()).is_empty());

        let armed = Flags {
            has_ring: true,
            has_sword: true,
            ..Default::default()
        };
        assert_eq!(run(Outcome::FinalDoor, 19, &armed).next_stage, Some(20));
    }

    #[test]
    fn test_item_grants() {
        let flags = Flags::default();
        assert_eq!(run(Outcome::Chest, 5, &flags).deltas, vec![FlagDelta::GrantXCancel]);
        assert_eq!(run(Outcome::Ring, 19, &flags).deltas, vec![FlagDelta::GrantRing]);
        assert_eq!(run(Outcome::Sword, 19, &flags).deltas, vec![FlagDelta::GrantSword]);
        assert_eq!(run(Outcome::Coin, 1, &flags).deltas, vec![FlagDelta::CollectCoin]);
        assert_eq!(run(Outcome::Slow, 1, &flags).actions, vec![StageAction::Dampen]);
    }
}
