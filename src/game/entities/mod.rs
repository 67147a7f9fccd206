//! Game entities module.
//!
//! This module organizes player, tile and history entity logic.

pub mod history;
pub mod player;
pub mod tile;

pub use history::*;
pub use player::*;
pub use tile::*;
