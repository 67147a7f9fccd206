//! Player movement system.
//!
//! This module handles dice and moving players around the perimeter loop.

use rand::Rng;

use crate::game::board::advance;
use crate::game::entities::Player;

/// Two independent fair dice.
pub fn roll_dice(rng: &mut impl Rng) -> (u8, u8) {
    (rng.random_range(1..=6), rng.random_range(1..=6))
}

/// Move the player `steps` cells forward.
/// Returns the new position.
pub fn move_player(player: &mut Player, steps: u8) -> u8 {
    let new_pos = advance(player.position(), steps);
    player.set_position(new_pos);
    new_pos
}
