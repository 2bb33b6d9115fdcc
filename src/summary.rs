//! End-of-run statistics
//!
//! Built once the stage sequence hits its end sentinel and shown on the
//! score screen.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::sim::GameState;

/// Totals for one completed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Wall time from start to the end sentinel, whole seconds
    pub elapsed_secs: u64,
    pub deaths: u32,
    pub coins: u32,
    pub jumps: u32,
}

impl RunSummary {
    pub fn from_state(state: &GameState, elapsed: Duration) -> Self {
        Self {
            elapsed_secs: elapsed.as_secs(),
            deaths: state.flags.player_deaths,
            coins: state.flags.coins,
            jumps: state.lifetime_jumps(),
        }
    }

    /// Clock reading for the elapsed time; hours wrap at a day
    pub fn clock(&self) -> (u64, u64, u64) {
        let secs = self.elapsed_secs;
        ((secs / 3600) % 24, (secs / 60) % 60, secs % 60)
    }

    /// Score screen lines, top to bottom
    pub fn lines(&self) -> [String; 4] {
        let (h, m, s) = self.clock();
        [
            format!("Total time: {}:{}:{}", h, m, s),
            format!("Deaths: {}", self.deaths),
            format!("Coins: {}", self.coins),
            format!("Jumps: {}", self.jumps),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_are_not_zero_padded() {
        let summary = RunSummary {
            elapsed_secs: 3725,
            deaths: 12,
            coins: 94,
            jumps: 301,
        };
        assert_eq!(
            summary.lines(),
            [
                "Total time: 1:2:5".to_string(),
                "Deaths: 12".to_string(),
                "Coins: 94".to_string(),
                "Jumps: 301".to_string(),
            ]
        );
    }

    #[test]
    fn test_clock_wraps_hours() {
        let summary = RunSummary {
            elapsed_secs: 25 * 3600 + 7,
            deaths: 0,
            coins: 0,
            jumps: 0,
        };
        assert_eq!(summary.clock(), (1, 0, 7));
    }

    #[test]
    fn test_from_state_counts_live_jumps() {
        let mut state = GameState::new();
        state.flags.total_jumps = 10;
        state.flags.coins = 3;
        state.flags.player_deaths = 2;
        state.player.jumps = 4;

        let summary = RunSummary::from_state(&state, Duration::from_millis(61_900));
        assert_eq!(summary.jumps, 14);
        assert_eq!(summary.coins, 3);
        assert_eq!(summary.deaths, 2);
        assert_eq!(summary.lines()[0], "Total time: 0:1:1");
    }
}
