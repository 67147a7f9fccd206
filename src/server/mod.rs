// src/server/mod.rs

//! Session layer root module.
//!
//! - Game session orchestration (turn scheduling, player actions, lobby)
//! - Snapshot synchronization (in-process, TCP host and client)

pub mod game_session;
pub mod sync;
