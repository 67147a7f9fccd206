//! Fixed 40-cell perimeter layout.

use crate::config::game::BOARD_SIZE;
use crate::game::types::TileKind;

const LAYOUT: [(TileKind, &str); BOARD_SIZE as usize] = [
    (TileKind::Free, "Free Parking"),
    (TileKind::Territory, "Factory 1"),
    (TileKind::Territory, "Factory 2"),
    (TileKind::Scenario, "Scenario"),
    (TileKind::Territory, "Power Plant"),
    (TileKind::SafeHaven, "Safe Haven"),
    (TileKind::Territory, "Warehouse 1"),
    (TileKind::Special, "Events"),
    (TileKind::Zombie, "Zombie Attack"),
    (TileKind::Territory, "Radio Tower"),
    (TileKind::Checkpost, "Checkpost"),
    (TileKind::Special, "Super Market 1"),
    (TileKind::Territory, "Research Lab"),
    (TileKind::Special, "Super Market 2"),
    (TileKind::Scenario, "Scenario"),
    (TileKind::SafeHaven, "Safe Haven"),
    (TileKind::Special, "Events"),
    (TileKind::Territory, "Military Base"),
    (TileKind::Territory, "Hospital"),
    (TileKind::Territory, "Airport"),
    (TileKind::Start, "Start"),
    (TileKind::Territory, "Abandoned House 1"),
    (TileKind::Zombie, "Zombie Attack"),
    (TileKind::Territory, "Abandoned House 2"),
    (TileKind::Resource, "Resource Reward"),
    (TileKind::SafeHaven, "Safe Haven"),
    (TileKind::Territory, "Apartment Complex 1"),
    (TileKind::Scenario, "Scenario"),
    (TileKind::Territory, "Apartment Complex 2"),
    (TileKind::Territory, "Motel Shelter"),
    (TileKind::Quarantine, "Quarantine"),
    (TileKind::Territory, "Territory"),
    (TileKind::Territory, "Supermarket"),
    (TileKind::Resource, "Resource Reward"),
    (TileKind::Territory, "Gas Station"),
    (TileKind::SafeHaven, "Safe Haven"),
    (TileKind::Territory, "Pharmacy"),
    (TileKind::Scenario, "Scenario"),
    (TileKind::Zombie, "Zombie Attack"),
    (TileKind::Territory, "Hardware Store"),
];

/// Kind and display name of the cell at `position` (wrapped onto the board).
pub fn cell(position: u8) -> (TileKind, &'static str) {
    LAYOUT[usize::from(position % BOARD_SIZE)]
}

/// Moves `steps` cells forward around the loop.
pub fn advance(position: u8, steps: u8) -> u8 {
    ((u16::from(position) + u16::from(steps)) % u16::from(BOARD_SIZE)) as u8
}
