//! Player entity logic.
//!
//! Resource fields are private so every write goes through a clamping setter:
//! health stays within `[0, max_health]`, everything else stays non-negative,
//! and the position stays on the board.

use serde::{Deserialize, Serialize};

use crate::config::game::{
    BOARD_SIZE, MEDICINE_HEAL, STARTING_ATTACK, STARTING_HEALTH, STARTING_MONEY, START_POSITION,
};
use crate::error::OfferError;
use crate::game::entities::history::{HistoryEntry, HistoryKind};
use crate::game::types::{PlayerId, Strategy};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    id: PlayerId,
    name: String,
    color: String,
    position: u8,
    health: i32,
    max_health: i32,
    money: i32,
    attack: i32,
    influence: i32,
    medicine: i32,
    #[serde(default)]
    in_quarantine: bool,
    #[serde(default)]
    lab_cure_funded: bool,
    #[serde(default)]
    lab_passes_remaining: u8,
    #[serde(default)]
    lab_cure_complete: bool,
    #[serde(default)]
    strategy: Option<Strategy>,
    #[serde(default)]
    history: Vec<HistoryEntry>,
}

impl Player {
    /// Human player with the starting resources, standing on Start.
    pub fn new(id: PlayerId, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            position: START_POSITION,
            health: STARTING_HEALTH,
            max_health: STARTING_HEALTH,
            money: STARTING_MONEY,
            attack: STARTING_ATTACK,
            influence: 0,
            medicine: 0,
            in_quarantine: false,
            lab_cure_funded: false,
            lab_passes_remaining: 0,
            lab_cure_complete: false,
            strategy: None,
            history: Vec::new(),
        }
    }

    /// Computer-controlled player.
    pub fn new_ai(
        id: PlayerId,
        name: impl Into<String>,
        color: impl Into<String>,
        strategy: Strategy,
    ) -> Self {
        let mut player = Self::new(id, name, color);
        player.strategy = Some(strategy);
        player
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn money(&self) -> i32 {
        self.money
    }

    pub fn attack(&self) -> i32 {
        self.attack
    }

    pub fn influence(&self) -> i32 {
        self.influence
    }

    pub fn medicine(&self) -> i32 {
        self.medicine
    }

    pub fn is_ai(&self) -> bool {
        self.strategy.is_some()
    }

    pub fn strategy(&self) -> Option<Strategy> {
        self.strategy
    }

    pub fn in_quarantine(&self) -> bool {
        self.in_quarantine
    }

    pub fn lab_cure_funded(&self) -> bool {
        self.lab_cure_funded
    }

    pub fn lab_passes_remaining(&self) -> u8 {
        self.lab_passes_remaining
    }

    pub fn lab_cure_complete(&self) -> bool {
        self.lab_cure_complete
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn health_ratio(&self) -> f64 {
        if self.max_health <= 0 {
            return 0.0;
        }
        f64::from(self.health) / f64::from(self.max_health)
    }

    pub fn set_position(&mut self, position: u8) {
        self.position = position % BOARD_SIZE;
    }

    pub fn set_health(&mut self, health: i32) {
        self.health = health.clamp(0, self.max_health);
    }

    pub fn set_money(&mut self, money: i32) {
        self.money = money.max(0);
    }

    pub fn set_attack(&mut self, attack: i32) {
        self.attack = attack.max(0);
    }

    pub fn set_influence(&mut self, influence: i32) {
        self.influence = influence.max(0);
    }

    pub fn set_medicine(&mut self, medicine: i32) {
        self.medicine = medicine.max(0);
    }

    /// Raw adjustments with clamping and no history entry.
    pub fn adjust_money(&mut self, delta: i32) {
        self.set_money(self.money.saturating_add(delta));
    }

    pub fn adjust_attack(&mut self, delta: i32) {
        self.set_attack(self.attack.saturating_add(delta));
    }

    pub fn adjust_influence(&mut self, delta: i32) {
        self.set_influence(self.influence.saturating_add(delta));
    }

    pub fn adjust_medicine(&mut self, delta: i32) {
        self.set_medicine(self.medicine.saturating_add(delta));
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.set_health(self.health.saturating_sub(amount.max(0)));
    }

    pub fn heal(&mut self, amount: i32) {
        self.set_health(self.health.saturating_add(amount.max(0)));
    }

    /// Raises the health cap and heals by the same amount.
    pub fn increase_max_health(&mut self, amount: i32) {
        self.max_health = self.max_health.saturating_add(amount).max(0);
        self.set_health(self.health.saturating_add(amount));
    }

    pub fn add_money(&mut self, amount: i32, description: impl Into<String>) {
        if amount <= 0 {
            return;
        }
        self.adjust_money(amount);
        self.record(HistoryKind::Income, description, amount);
    }

    /// Spends `amount` if the player can afford it.
    pub fn spend_money(
        &mut self,
        amount: i32,
        description: impl Into<String>,
    ) -> Result<(), OfferError> {
        self.ensure_funds(amount)?;
        self.adjust_money(-amount);
        self.record(HistoryKind::Expense, description, amount);
        Ok(())
    }

    pub fn ensure_funds(&self, amount: i32) -> Result<(), OfferError> {
        if self.money < amount {
            return Err(OfferError::InsufficientFunds {
                needed: amount,
                available: self.money,
            });
        }
        Ok(())
    }

    /// Consumes one medicine to restore health. Returns false with no medicine left.
    pub fn use_medicine(&mut self) -> bool {
        if self.medicine <= 0 {
            return false;
        }
        self.medicine -= 1;
        self.heal(MEDICINE_HEAL);
        self.record(HistoryKind::MedicineUsed, "Used medicine", MEDICINE_HEAL);
        true
    }

    /// Hits `target` for this player's attack value and returns the damage dealt.
    pub fn attack_player(&mut self, target: &mut Player) -> i32 {
        let damage = self.attack;
        target.take_damage(damage);
        self.record(HistoryKind::Attack, format!("Attacked {}", target.name), damage);
        target.record(HistoryKind::Defend, format!("Attacked by {}", self.name), damage);
        damage
    }

    pub fn record(&mut self, kind: HistoryKind, description: impl Into<String>, amount: i32) {
        self.history.push(HistoryEntry::new(kind, description, amount));
    }

    pub fn total_income(&self) -> i32 {
        self.history.iter().filter(|e| e.is_income()).map(|e| e.amount).sum()
    }

    pub fn total_expenses(&self) -> i32 {
        self.history.iter().filter(|e| e.is_expense()).map(|e| e.amount).sum()
    }

    pub fn send_to_quarantine(&mut self, quarantine_position: u8) {
        self.in_quarantine = true;
        self.set_position(quarantine_position);
    }

    pub fn release_from_quarantine(&mut self) {
        self.in_quarantine = false;
    }

    pub fn fund_lab_cure(&mut self, passes: u8) {
        self.lab_cure_funded = true;
        self.lab_passes_remaining = passes;
    }

    /// Counts one pass over Start toward a funded cure.
    pub fn tick_lab_pass(&mut self) {
        if !self.lab_cure_funded || self.lab_passes_remaining == 0 {
            return;
        }
        self.lab_passes_remaining -= 1;
        if self.lab_passes_remaining == 0 {
            self.lab_cure_complete = true;
        }
    }

    /// Re-establishes the invariants on a player decoded from untrusted input.
    pub(crate) fn normalize(&mut self) {
        self.position %= BOARD_SIZE;
        self.max_health = self.max_health.max(0);
        self.health = self.health.clamp(0, self.max_health);
        self.money = self.money.max(0);
        self.attack = self.attack.max(0);
        self.influence = self.influence.max(0);
        self.medicine = self.medicine.max(0);
    }

    pub(crate) fn set_id(&mut self, id: PlayerId) {
        self.id = id;
    }
}
