/// Game configuration constants.
///
/// This module defines the main gameplay parameters such as board size, turn
/// pacing, and the starting resources of every player.
use std::time::Duration;

/// Number of cells on the perimeter loop.
pub const BOARD_SIZE: u8 = 40;

/// Position of the Start tile. New players spawn here.
pub const START_POSITION: u8 = 20;

/// Position of the Quarantine tile.
pub const QUARANTINE_POSITION: u8 = 30;

/// Duration of a turn countdown in seconds.
pub const TURN_DURATION: u64 = 60;

/// Window (in milliseconds) a human has to act after landing before the turn ends on its own.
pub const INACTIVITY_DURATION_MS: u64 = 5_000;

/// Delay (in milliseconds) before an AI player rolls.
pub const AI_ROLL_DELAY_MS: u64 = 800;

/// Delay (in milliseconds) between an AI landing and the turn passing on.
pub const AI_ADVANCE_DELAY_MS: u64 = 2_000;

/// Minimum and maximum number of players in a session.
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// Starting resources.
pub const STARTING_HEALTH: i32 = 1_500;
pub const STARTING_MONEY: i32 = 1_000;
pub const STARTING_ATTACK: i32 = 100;

/// Health restored by one unit of medicine.
pub const MEDICINE_HEAL: i32 = 50;

/// Lab cure funding.
pub const LAB_CURE_COST: i32 = 500;
pub const LAB_CURE_PASSES: u8 = 3;

/// Highest upgrade level a tile can reach.
pub const MAX_UPGRADE_LEVEL: u8 = 3;

/// Scheduler pacing. Defaults come from the constants above; tests and the
/// command line shorten them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnTimings {
    pub turn: Duration,
    pub inactivity: Duration,
    pub ai_roll_delay: Duration,
    pub ai_advance_delay: Duration,
}

impl Default for TurnTimings {
    fn default() -> Self {
        Self {
            turn: Duration::from_secs(TURN_DURATION),
            inactivity: Duration::from_millis(INACTIVITY_DURATION_MS),
            ai_roll_delay: Duration::from_millis(AI_ROLL_DELAY_MS),
            ai_advance_delay: Duration::from_millis(AI_ADVANCE_DELAY_MS),
        }
    }
}

impl TurnTimings {
    /// Same pacing, different countdown length.
    pub fn with_turn_seconds(mut self, secs: u64) -> Self {
        self.turn = Duration::from_secs(secs);
        self
    }
}
