//! Line protocol between host and clients. One UTF-8 line per message:
//! a lobby token or a JSON snapshot.

use log::debug;

use crate::config::roster::UNKNOWN_PLAYER_NAME;
use crate::game::snapshot::Snapshot;

pub const PLAYER_JOINED: &str = "PLAYER_JOINED";
pub const START_GAME: &str = "START_GAME";

#[derive(Debug, Clone, PartialEq)]
pub enum WireMessage {
    PlayerJoined(String),
    StartGame,
    Snapshot(Snapshot),
}

impl WireMessage {
    /// Decodes one line. Anything that is neither a token nor a snapshot is dropped.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line == START_GAME {
            return Some(WireMessage::StartGame);
        }
        if line == PLAYER_JOINED {
            return Some(WireMessage::PlayerJoined(UNKNOWN_PLAYER_NAME.to_string()));
        }
        if let Some(name) = line.strip_prefix(PLAYER_JOINED).and_then(|rest| rest.strip_prefix(':')) {
            let name = name.trim();
            let name = if name.is_empty() { UNKNOWN_PLAYER_NAME } else { name };
            return Some(WireMessage::PlayerJoined(name.to_string()));
        }
        match Snapshot::from_json(line) {
            Ok(snapshot) => Some(WireMessage::Snapshot(snapshot)),
            Err(e) => {
                debug!("[Wire] dropped line ({} bytes): {}", line.len(), e);
                None
            }
        }
    }

    /// Encodes to a single line without the trailing newline.
    pub fn encode(&self) -> serde_json::Result<String> {
        match self {
            WireMessage::PlayerJoined(name) => Ok(format!("{PLAYER_JOINED}:{name}")),
            WireMessage::StartGame => Ok(START_GAME.to_string()),
            WireMessage::Snapshot(snapshot) => snapshot.to_json(),
        }
    }
}
