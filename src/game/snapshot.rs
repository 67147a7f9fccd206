//! Snapshot: the wire and save-file projection of `GameState`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::game::entities::{Player, Tile};

/// Complete copy of the shared state. Tiles are keyed by board position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub players: Vec<Player>,
    pub current_index: usize,
    pub last_roll: u8,
    #[serde(default)]
    pub dice1: u8,
    #[serde(default)]
    pub dice2: u8,
    #[serde(default)]
    pub tiles: BTreeMap<u8, Tile>,
    #[serde(default = "first_turn")]
    pub turn: u32,
    #[serde(default)]
    pub version: u64,
}

fn first_turn() -> u32 {
    1
}

impl Snapshot {
    /// Single-line JSON, as sent over the wire.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::GameState;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_snapshot_round_trip_keeps_state() {
        let mut state = GameState::new();
        state.tiles_mut().get_or_create(21).claim(1);
        state.tiles_mut().get_or_create(5).claim(2);
        state.current_mut().unwrap().set_money(42);
        state.end_turn().unwrap();

        let before = state.create_snapshot();
        let json = before.to_json().unwrap();
        state.apply_snapshot(Snapshot::from_json(&json).unwrap());
        assert_eq!(state.create_snapshot(), before);
    }

    #[test]
    fn test_snapshot_json_field_names() {
        let json = GameState::new().create_snapshot().to_json().unwrap();
        for key in ["\"players\"", "\"currentIndex\"", "\"lastRoll\"", "\"dice1\"", "\"dice2\"", "\"tiles\"", "\"version\""] {
            assert!(json.contains(key), "missing {key}");
        }
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_snapshot_without_optional_fields_decodes() {
        let json = r#"{"players":[],"currentIndex":0,"lastRoll":0}"#;
        let snap = Snapshot::from_json(json).unwrap();
        assert!(snap.tiles.is_empty());
        assert_eq!(snap.version, 0);
        assert_eq!(snap.turn, 1);
    }

    #[test]
    fn test_garbage_does_not_decode() {
        assert!(Snapshot::from_json("hello").is_err());
        assert!(Snapshot::from_json("{\"players\": 3}").is_err());
    }
}
