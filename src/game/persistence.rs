//! Save files: one JSON snapshot per file, written and read whole.

use std::fs;
use std::path::Path;

use log::info;

use crate::error::SaveError;
use crate::game::snapshot::Snapshot;
use crate::game::state::GameState;

/// Writes the current state to `path`. Co-op sessions cannot be saved.
pub fn save_to(state: &GameState, path: &Path) -> Result<(), SaveError> {
    if state.is_coop_mode() {
        return Err(SaveError::CoopMode);
    }
    let json = serde_json::to_string_pretty(&state.create_snapshot())?;
    fs::write(path, json)?;
    info!("[Save] Game saved to {}", path.display());
    Ok(())
}

/// Reads a snapshot from `path` without touching any state.
pub fn read_save(path: &Path) -> Result<Snapshot, SaveError> {
    let raw = fs::read_to_string(path)?;
    let snapshot = serde_json::from_str(&raw)?;
    Ok(snapshot)
}

/// Replaces `state` with the save at `path`. On error `state` is unchanged.
pub fn load_from(state: &mut GameState, path: &Path) -> Result<(), SaveError> {
    let snapshot = read_save(path)?;
    let version = state.version().max(snapshot.version) + 1;
    state.apply_snapshot(Snapshot { version, ..snapshot });
    let has_ai = state.players().iter().any(|p| p.is_ai());
    state.set_ai_mode(has_ai);
    info!("[Save] Game loaded from {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");

        let mut state = GameState::new();
        state.tiles_mut().get_or_create(29).claim(2);
        state.end_turn().unwrap();
        save_to(&state, &path).unwrap();

        let mut loaded = GameState::empty();
        load_from(&mut loaded, &path).unwrap();
        assert_eq!(loaded.players(), state.players());
        assert_eq!(loaded.current_index(), 1);
        assert_eq!(loaded.tiles().get(29).and_then(|t| t.owner()), Some(2));
    }

    #[test]
    fn test_load_failure_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let mut state = GameState::new();
        let before = state.clone();
        assert!(matches!(load_from(&mut state, &path), Err(SaveError::Format(_))));
        assert!(matches!(
            load_from(&mut state, &dir.path().join("missing.json")),
            Err(SaveError::Io(_))
        ));
        assert_eq!(state, before);
    }

    #[test]
    fn test_coop_save_refused() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = GameState::new();
        state.reset_players_for_coop_mode(&["Host".to_string(), "Guest".to_string()]);
        let path = dir.path().join("coop.json");
        assert!(matches!(save_to(&state, &path), Err(SaveError::CoopMode)));
        assert!(!path.exists());
    }
}
