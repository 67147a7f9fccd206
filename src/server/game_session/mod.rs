pub mod lobby;
pub mod messages;
pub mod server;
pub mod turn;

pub use messages::*;
pub use server::{GameSession, SessionConfig};
pub use turn::{PhaseKind, TurnStatus};
