use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable player identifier assigned at roster creation. Tile ownership and
/// turn order refer to players through it, never through names.
pub type PlayerId = u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TileKind {
    Start,
    Free,
    Checkpost,
    Quarantine,
    SafeHaven,
    Territory,
    Zombie,
    Resource,
    Scenario,
    Special,
}

impl TileKind {
    /// Influence a tile of this kind is worth.
    pub fn influence_value(self) -> i32 {
        match self {
            TileKind::Start | TileKind::Free | TileKind::Zombie => 0,
            TileKind::Checkpost | TileKind::Quarantine => 1,
            TileKind::Resource => 2,
            TileKind::Territory => 3,
            TileKind::Scenario => 4,
            TileKind::SafeHaven => 5,
            TileKind::Special => 6,
        }
    }
}

/// Play style of a computer-controlled player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strategy {
    Aggressive,
    Defensive,
    Balanced,
    Economic,
}

impl Strategy {
    /// Assignment order for AI seats.
    pub const ROTATION: [Strategy; 4] = [
        Strategy::Aggressive,
        Strategy::Defensive,
        Strategy::Balanced,
        Strategy::Economic,
    ];
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Aggressive => "AGGRESSIVE",
            Strategy::Defensive => "DEFENSIVE",
            Strategy::Balanced => "BALANCED",
            Strategy::Economic => "ECONOMIC",
        };
        f.write_str(name)
    }
}

/// Outcome of one dice roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    pub player: PlayerId,
    pub dice1: u8,
    pub dice2: u8,
    pub total: u8,
    pub from: u8,
    pub to: u8,
}

/// Resources granted at the start of a turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusSummary {
    pub money: i32,
    pub attack: i32,
    pub medicine: i32,
    pub influence: i32,
}

impl BonusSummary {
    pub fn is_empty(&self) -> bool {
        self.money == 0 && self.attack == 0 && self.medicine == 0 && self.influence == 0
    }

    pub(crate) fn add(&mut self, other: BonusSummary) {
        self.money += other.money;
        self.attack += other.attack;
        self.medicine += other.medicine;
        self.influence += other.influence;
    }
}

/// Who runs a session and which way snapshots flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionRole {
    /// Hot seat or against AI on one machine.
    Standalone,
    /// Owns the authoritative state and relays peer updates.
    Host,
    /// Follows the host.
    Client,
}
