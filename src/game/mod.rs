//! Game core: entities, board, authoritative turn state, landing rules and
//! the computer opponent.

pub mod ai;
pub mod board;
pub mod entities;
pub mod persistence;
pub mod snapshot;
pub mod state;
pub mod systems;
pub mod types;

pub use snapshot::Snapshot;
pub use state::GameState;
pub use types::*;
