//! Error types shared across the game core.
//!
//! Resource invariants are clamped at the mutation boundary and never surface
//! here. What remains are rejected player actions, failed persistence, and
//! transport setup failures.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Why an offered action could not be carried out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OfferError {
    #[error("not enough money: need {needed}, have {available}")]
    InsufficientFunds { needed: i32, available: i32 },

    #[error("not enough medicine: need {needed}, have {available}")]
    InsufficientMedicine { needed: i32, available: i32 },

    #[error("not enough influence: need {needed}, have {available}")]
    InsufficientInfluence { needed: i32, available: i32 },

    /// A failed claim costs health.
    #[error("not enough attack: need {needed}, have {available} (lost {health_lost} health)")]
    InsufficientAttack {
        needed: i32,
        available: i32,
        health_lost: i32,
    },

    #[error("tile is already at its maximum level")]
    MaxLevel,

    #[error("tile cannot be upgraded")]
    NotUpgradable,

    #[error("tile is already owned")]
    AlreadyOwned,

    #[error("tile cannot be claimed")]
    Unclaimable,
}

/// Rejected turn actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnError {
    #[error("no players in the session")]
    NoPlayers,

    #[error("the game has not started")]
    GameNotStarted,

    #[error("it is {expected}'s turn, not {local}'s")]
    NotYourTurn { expected: String, local: String },

    #[error("dice already rolled this turn")]
    AlreadyRolled,

    #[error("dice not rolled yet")]
    NotRolled,

    #[error("only the host can do that")]
    HostOnly,

    #[error("no tile resolution pending")]
    NoResolutionPending,

    #[error("unknown offer #{0}")]
    UnknownOffer(usize),

    #[error(transparent)]
    Offer(#[from] OfferError),
}

/// Save and load failures. The in-memory game is left untouched.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("save file is not a valid game: {0}")]
    Format(#[from] serde_json::Error),

    #[error("co-op sessions cannot be saved")]
    CoopMode,
}

/// Transport setup failures.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("could not listen on port {port}: {source}")]
    Bind { port: u16, source: io::Error },

    #[error("could not reach host at {addr}: {source}")]
    Connect { addr: SocketAddr, source: io::Error },

    #[error("invalid host address {0}")]
    Address(String),

    #[error(transparent)]
    RoomCode(#[from] RoomCodeError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Room codes are four-digit numbers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomCodeError {
    #[error("room code must be numeric, got {0:?}")]
    NotNumeric(String),

    #[error("room code {0} is out of range (0-9999)")]
    OutOfRange(u32),
}
