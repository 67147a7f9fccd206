//! Tile entity logic.

use serde::{Deserialize, Serialize};

use crate::config::game::MAX_UPGRADE_LEVEL;
use crate::error::OfferError;
use crate::game::types::{PlayerId, TileKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    position: u8,
    kind: TileKind,
    name: String,
    #[serde(default)]
    owner: Option<PlayerId>,
    #[serde(default)]
    upgrade_level: u8,
    #[serde(default)]
    can_set_prices: bool,
}

impl Tile {
    pub fn new(position: u8, kind: TileKind, name: impl Into<String>) -> Self {
        Self {
            position,
            kind,
            name: name.into(),
            owner: None,
            upgrade_level: 0,
            can_set_prices: false,
        }
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owner == Some(player)
    }

    pub fn upgrade_level(&self) -> u8 {
        self.upgrade_level
    }

    pub fn can_set_prices(&self) -> bool {
        self.can_set_prices
    }

    pub fn influence_value(&self) -> i32 {
        self.kind.influence_value()
    }

    /// Hands the tile to a new owner at level 0.
    pub fn claim(&mut self, owner: PlayerId) {
        self.owner = Some(owner);
        self.upgrade_level = 0;
    }

    /// Drops the owner. An unowned tile always sits at level 0.
    pub fn release(&mut self) {
        self.owner = None;
        self.upgrade_level = 0;
        self.can_set_prices = false;
    }

    /// Raises the level by one and returns the new level.
    pub fn upgrade(&mut self) -> Result<u8, OfferError> {
        if self.owner.is_none() {
            return Err(OfferError::NotUpgradable);
        }
        if self.upgrade_level >= MAX_UPGRADE_LEVEL {
            return Err(OfferError::MaxLevel);
        }
        self.upgrade_level += 1;
        Ok(self.upgrade_level)
    }

    pub fn set_can_set_prices(&mut self, enabled: bool) {
        self.can_set_prices = enabled;
    }

    /// Share of a safe-haven trade credited to the haven's owner.
    pub fn trade_percentage(&self) -> i32 {
        match self.upgrade_level {
            0 => 40,
            1 => 50,
            _ => 60,
        }
    }

    /// Medicine handed to a visitor of someone else's safe haven.
    pub fn medicine_reward(&self) -> i32 {
        5 + i32::from(self.upgrade_level.min(3))
    }

    /// Attack handed to a visitor of someone else's safe haven.
    pub fn attack_reward(&self) -> i32 {
        12 + (2 * i32::from(self.upgrade_level)).min(4)
    }

    /// Re-establishes invariants on a tile decoded from untrusted input.
    pub(crate) fn normalize(&mut self, position: u8) {
        self.position = position;
        if self.owner.is_none() {
            self.upgrade_level = 0;
            self.can_set_prices = false;
        }
        self.upgrade_level = self.upgrade_level.min(MAX_UPGRADE_LEVEL);
    }
}
