use std::path::PathBuf;

use actix::prelude::*;
use serde::Serialize;

use crate::error::{SaveError, TurnError};
use crate::game::ai::AiAction;
use crate::game::entities::Player;
use crate::game::snapshot::Snapshot;
use crate::game::systems::{Effect, Landing};
use crate::game::types::{BonusSummary, PlayerId, RollOutcome};
use crate::server::game_session::turn::TurnStatus;

/// Rolls for the current player.
#[derive(Message)]
#[rtype(result = "Result<RollOutcome, TurnError>")]
pub struct RollDice;

/// Ends the current turn after the roll. A pending fallback still applies.
#[derive(Message)]
#[rtype(result = "Result<(), TurnError>")]
pub struct EndTurn;

/// Accepts one of the offers of the pending landing, by index.
#[derive(Message)]
#[rtype(result = "Result<Vec<Effect>, TurnError>")]
pub struct AcceptOffer {
    pub index: usize,
}

/// The player is done with the landed tile; the turn passes on exactly once.
#[derive(Message)]
#[rtype(result = "Result<(), TurnError>")]
pub struct TileResolutionComplete;

/// Something changed out of band; push the state to peers and observers.
#[derive(Message)]
#[rtype(result = "()")]
pub struct NotifyChanged;

#[derive(Message)]
#[rtype(result = "Snapshot")]
pub struct GetSnapshot;

#[derive(Message)]
#[rtype(result = "Result<Player, TurnError>")]
pub struct GetCurrentPlayer;

#[derive(Message)]
#[rtype(result = "TurnStatus")]
pub struct GetTurnStatus;

#[derive(Message)]
#[rtype(result = "()")]
pub struct ResetPlayers {
    pub names: Vec<String>,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct ResetForAiMode {
    pub human_name: String,
    pub count: usize,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct ResetForCoop {
    pub names: Vec<String>,
}

/// Starts play with the current roster.
#[derive(Message)]
#[rtype(result = "Result<(), TurnError>")]
pub struct StartGame;

/// Client side of the lobby: tells the host who we are.
#[derive(Message)]
#[rtype(result = "()")]
pub struct AnnounceJoin {
    pub name: String,
}

#[derive(Message)]
#[rtype(result = "Result<(), SaveError>")]
pub struct SaveGame {
    pub path: PathBuf,
}

#[derive(Message)]
#[rtype(result = "Result<(), SaveError>")]
pub struct LoadGame {
    pub path: PathBuf,
}

/// Stops the running game and empties the roster.
#[derive(Message)]
#[rtype(result = "()")]
pub struct ReturnToLobby;

/// Registers an observer. It immediately receives the current state.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Subscribe(pub Recipient<SessionEvent>);

/// Everything a view layer needs to follow the game.
#[derive(Message, Debug, Clone, PartialEq, Serialize)]
#[rtype(result = "()")]
pub enum SessionEvent {
    StateChanged(Snapshot),
    TurnStarted {
        player: PlayerId,
        name: String,
        turn: u32,
        local: bool,
    },
    Rolled(RollOutcome),
    Landed(Landing),
    EffectsApplied {
        player: PlayerId,
        effects: Vec<Effect>,
    },
    BonusesApplied {
        player: PlayerId,
        summary: BonusSummary,
    },
    AiActions {
        player: PlayerId,
        actions: Vec<AiAction>,
    },
    TurnSkipped {
        player: PlayerId,
        name: String,
    },
    PlayerJoined(String),
    GameStarted,
    ConnectionLost,
}
