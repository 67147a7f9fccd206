//! Game core for The Last Defenders.
//!
//! `game` holds the rules and the authoritative state, `server` the session
//! actor that schedules turns and the transports that keep peers in sync.

pub mod config;
pub mod error;
pub mod game;
pub mod server;

#[cfg(test)]
mod tests;
