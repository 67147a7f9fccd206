//! Computer opponent: pure per-strategy decisions and the turn routines
//! that apply them.

pub mod decisions;
pub mod turn;

pub use decisions::*;
pub use turn::{choose_offers, play_landing, process_ai_turn, AiAction};
