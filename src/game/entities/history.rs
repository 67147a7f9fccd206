//! Per-player transaction log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryKind {
    BoughtTile,
    SoldTile,
    UpgradedTile,
    Income,
    Expense,
    Attack,
    Defend,
    MedicineUsed,
    Bonus,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub kind: HistoryKind,
    pub description: String,
    pub amount: i32,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(kind: HistoryKind, description: impl Into<String>, amount: i32) -> Self {
        Self {
            kind,
            description: description.into(),
            amount,
            timestamp: Utc::now(),
        }
    }

    /// Whether this entry moved money into the player's pocket.
    pub fn is_income(&self) -> bool {
        matches!(self.kind, HistoryKind::Income | HistoryKind::SoldTile | HistoryKind::Bonus)
    }

    /// Whether this entry moved money out of the player's pocket.
    pub fn is_expense(&self) -> bool {
        matches!(
            self.kind,
            HistoryKind::Expense | HistoryKind::BoughtTile | HistoryKind::UpgradedTile
        )
    }
}
