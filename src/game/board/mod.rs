//! Board module: layout of the perimeter loop, the territory catalog, and the
//! lazily materialized tile registry.

pub mod catalog;
pub mod layout;

use std::collections::BTreeMap;

use crate::game::entities::Tile;
use crate::game::types::PlayerId;

pub use catalog::{territory_spec, TerritorySpec, Zone};
pub use layout::{advance, cell};

/// Tiles keyed by board position. A tile exists once something looked at it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileRegistry {
    tiles: BTreeMap<u8, Tile>,
}

impl TileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, position: u8) -> Option<&Tile> {
        self.tiles.get(&position)
    }

    /// Tile at `position`, created from the layout on first access.
    pub fn get_or_create(&mut self, position: u8) -> &mut Tile {
        self.tiles.entry(position).or_insert_with(|| {
            let (kind, name) = layout::cell(position);
            Tile::new(position, kind, name)
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.values_mut()
    }

    pub fn owned_by(&self, player: PlayerId) -> impl Iterator<Item = &Tile> {
        self.tiles.values().filter(move |t| t.is_owned_by(player))
    }

    /// Positions owned by `player`, in board order.
    pub fn positions_owned_by(&self, player: PlayerId) -> Vec<u8> {
        self.owned_by(player).map(|t| t.position()).collect()
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub(crate) fn from_map(tiles: BTreeMap<u8, Tile>) -> Self {
        Self { tiles }
    }

    pub(crate) fn to_map(&self) -> BTreeMap<u8, Tile> {
        self.tiles.clone()
    }
}
