//! Tile landing resolution.
//!
//! Landing on a tile produces immediate effects, a list of offers the mover
//! may accept, and possibly a fallback that applies when resolution completes
//! without the relevant offer being taken. Humans accept offers through the
//! session; the AI picks offers and accepts them through the same
//! `accept_offer` entry point.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::game::{MAX_UPGRADE_LEVEL, QUARANTINE_POSITION};
use crate::error::OfferError;
use crate::game::board::catalog::{HOSPITAL, HOSPITAL_OWNER_MEDICINE, RADIO_TOWER};
use crate::game::board::territory_spec;
use crate::game::entities::HistoryKind;
use crate::game::state::GameState;
use crate::game::systems::encounters::{
    attempt_scenario, pick_event, pick_scenario, scenario_chance, zombie_attack, ResourceDelta,
    SAFE_OUTCOME, SCENARIOS,
};
use crate::game::types::{PlayerId, TileKind};

pub const START_REWARD: ResourceDelta = ResourceDelta {
    money: 200,
    medicine: 2,
    attack: 0,
    influence: 0,
    health: 0,
    max_health: 0,
};

pub const RESOURCE_REWARD: ResourceDelta = ResourceDelta {
    money: 100,
    medicine: 1,
    attack: 0,
    influence: 0,
    health: 0,
    max_health: 0,
};

pub const BRIBE_MONEY: i32 = 150;
pub const BRIBE_MEDICINE: i32 = 1;

pub const SAFE_HAVEN_COST: i32 = 1_000;
pub const SAFE_HAVEN_INFLUENCE: i32 = 180;

/// Price of taking a safe haven from `level` to `level + 1`.
pub fn safe_haven_upgrade_cost(level: u8) -> i32 {
    500 * (i32::from(level) + 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeItem {
    Medicine,
    AttackBoost,
    Armor,
}

impl TradeItem {
    pub const ALL: [TradeItem; 3] = [TradeItem::Medicine, TradeItem::AttackBoost, TradeItem::Armor];

    pub fn cost(self) -> i32 {
        match self {
            TradeItem::Medicine => 50,
            TradeItem::AttackBoost => 100,
            TradeItem::Armor => 200,
        }
    }

    pub fn delta(self) -> ResourceDelta {
        match self {
            TradeItem::Medicine => ResourceDelta { medicine: 1, ..ResourceDelta::default() },
            TradeItem::AttackBoost => ResourceDelta { attack: 10, ..ResourceDelta::default() },
            TradeItem::Armor => ResourceDelta { max_health: 20, ..ResourceDelta::default() },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Offer {
    BuyTerritory { position: u8, cost: i32 },
    UpgradeTerritory { position: u8, cost: i32, next_level: u8 },
    BuySafeHaven { position: u8, cost: i32 },
    UpgradeSafeHaven { position: u8, cost: i32, next_level: u8 },
    Trade { position: u8, item: TradeItem },
    PayBribe { money: i32, medicine: i32 },
    TakeRisk { scenario: usize },
    Attack { target: PlayerId },
}

impl Offer {
    /// Trades can be taken any number of times; everything else once.
    pub fn is_repeatable(&self) -> bool {
        matches!(self, Offer::Trade { .. })
    }

    /// Whether accepting this offer cancels the landing's fallback.
    pub fn settles_fallback(&self) -> bool {
        matches!(self, Offer::PayBribe { .. } | Offer::TakeRisk { .. })
    }
}

/// What happens when resolution completes and the matching offer was not taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fallback {
    Quarantine,
    PlaySafe,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Resources { reason: String, delta: ResourceDelta },
    RentPaid { owner: PlayerId, money: i32, medicine: i32 },
    OwnerCredited { owner: PlayerId, amount: i32 },
    Claimed { position: u8 },
    Upgraded { position: u8, level: u8 },
    Quarantined,
    ScenarioDrawn { title: String, chance: u8 },
    ScenarioResolved { title: String, success: bool },
    Attacked { target: PlayerId, damage: i32 },
    Unclaimable { position: u8 },
}

/// Result of landing on a tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Landing {
    pub player: PlayerId,
    pub position: u8,
    pub kind: TileKind,
    pub name: String,
    pub effects: Vec<Effect>,
    pub offers: Vec<Offer>,
    pub fallback: Option<Fallback>,
}

impl Landing {
    pub fn is_settled(&self) -> bool {
        self.offers.is_empty() && self.fallback.is_none()
    }
}

fn resources(reason: impl Into<String>, delta: ResourceDelta) -> Effect {
    Effect::Resources { reason: reason.into(), delta }
}

/// Resolves the tile under `player_id`, applying immediate effects.
pub fn resolve_landing(state: &mut GameState, player_id: PlayerId, rng: &mut impl Rng) -> Landing {
    let (position, in_quarantine) = match state.player(player_id) {
        Some(p) => (p.position(), p.in_quarantine()),
        None => (0, false),
    };
    let tile = state.tiles_mut().get_or_create(position).clone();
    let mut landing = Landing {
        player: player_id,
        position,
        kind: tile.kind(),
        name: tile.name().to_string(),
        effects: Vec::new(),
        offers: Vec::new(),
        fallback: None,
    };

    match tile.kind() {
        TileKind::Start => {
            if !in_quarantine {
                apply_delta(state, player_id, START_REWARD);
                landing.effects.push(resources("Passed through Start", START_REWARD));
            }
        }
        TileKind::Free | TileKind::Quarantine => {}
        TileKind::Checkpost => {
            landing.offers.push(Offer::PayBribe {
                money: BRIBE_MONEY,
                medicine: BRIBE_MEDICINE,
            });
            landing.fallback = Some(Fallback::Quarantine);
        }
        TileKind::SafeHaven => match tile.owner() {
            None => {
                landing.offers.push(Offer::BuySafeHaven { position, cost: SAFE_HAVEN_COST });
                push_trades(&mut landing, position);
            }
            Some(owner) if owner == player_id => {
                if tile.upgrade_level() < MAX_UPGRADE_LEVEL {
                    landing.offers.push(Offer::UpgradeSafeHaven {
                        position,
                        cost: safe_haven_upgrade_cost(tile.upgrade_level()),
                        next_level: tile.upgrade_level() + 1,
                    });
                }
            }
            Some(_) => {
                let reward = ResourceDelta {
                    medicine: tile.medicine_reward(),
                    attack: tile.attack_reward(),
                    ..ResourceDelta::default()
                };
                apply_delta(state, player_id, reward);
                landing.effects.push(resources("Sheltered at a safe haven", reward));
                push_trades(&mut landing, position);
            }
        },
        TileKind::Territory => match territory_spec(position) {
            None => landing.effects.push(Effect::Unclaimable { position }),
            Some(spec) => match tile.owner() {
                None => landing.offers.push(Offer::BuyTerritory { position, cost: spec.buy_cost }),
                Some(owner) if owner == player_id => {
                    if position != HOSPITAL && tile.upgrade_level() < MAX_UPGRADE_LEVEL {
                        let next_level = tile.upgrade_level() + 1;
                        landing.offers.push(Offer::UpgradeTerritory {
                            position,
                            cost: spec.upgrade_cost(next_level),
                            next_level,
                        });
                    }
                }
                Some(owner) => {
                    let (money, medicine) = spec.rent(tile.upgrade_level());
                    if let Some(effect) = pay_rent(state, player_id, owner, money, medicine, position) {
                        landing.effects.push(effect);
                    }
                }
            },
        },
        TileKind::Zombie => {
            let attack = state.player(player_id).map(|p| p.attack()).unwrap_or(0);
            let delta = zombie_attack(position, attack);
            apply_delta(state, player_id, delta);
            landing.effects.push(resources("Zombie attack", delta));
        }
        TileKind::Resource => {
            apply_delta(state, player_id, RESOURCE_REWARD);
            landing.effects.push(resources("Scavenged resources", RESOURCE_REWARD));
        }
        TileKind::Scenario => {
            let scenario = pick_scenario(rng);
            let chance = state
                .player(player_id)
                .map(|p| scenario_chance(p, &SCENARIOS[scenario]))
                .unwrap_or(0.0);
            landing.effects.push(Effect::ScenarioDrawn {
                title: SCENARIOS[scenario].title.to_string(),
                chance: chance.round() as u8,
            });
            landing.offers.push(Offer::TakeRisk { scenario });
            landing.fallback = Some(Fallback::PlaySafe);
        }
        TileKind::Special => {
            let event = pick_event(rng);
            apply_delta(state, player_id, event.delta);
            landing.effects.push(resources(event.name, event.delta));
        }
    }

    for other in state.players() {
        if other.id() != player_id && other.position() == position {
            landing.offers.push(Offer::Attack { target: other.id() });
        }
    }

    debug!(
        "[Landing] player={} pos={} kind={:?} effects={} offers={}",
        player_id,
        position,
        landing.kind,
        landing.effects.len(),
        landing.offers.len()
    );
    landing
}

fn push_trades(landing: &mut Landing, position: u8) {
    for item in TradeItem::ALL {
        landing.offers.push(Offer::Trade { position, item });
    }
}

fn apply_delta(state: &mut GameState, player_id: PlayerId, delta: ResourceDelta) {
    if let Some(player) = state.player_mut(player_id) {
        delta.apply_to(player);
    }
}

/// Moves what the payer can afford to the owner. Rent never changes ownership.
fn pay_rent(
    state: &mut GameState,
    payer: PlayerId,
    owner: PlayerId,
    money: i32,
    medicine: i32,
    position: u8,
) -> Option<Effect> {
    let (payer, owner_player) = state.pair_mut(payer, owner)?;
    let paid = money.min(payer.money());
    let medicine_paid = medicine.min(payer.medicine());
    payer.adjust_money(-paid);
    payer.adjust_medicine(-medicine_paid);
    payer.record(HistoryKind::Expense, format!("Rent to {}", owner_player.name()), paid);
    owner_player.add_money(paid, format!("Rent from {}", payer.name()));
    if position == HOSPITAL {
        owner_player.adjust_medicine(HOSPITAL_OWNER_MEDICINE);
    }
    Some(Effect::RentPaid {
        owner,
        money: paid,
        medicine: medicine_paid,
    })
}

/// Carries out `offer` for `player_id`. Failed checks leave resources
/// untouched except a failed territory claim, which costs health.
pub fn accept_offer(
    state: &mut GameState,
    player_id: PlayerId,
    offer: &Offer,
    rng: &mut impl Rng,
) -> Result<Vec<Effect>, OfferError> {
    match *offer {
        Offer::BuyTerritory { position, .. } => buy_territory(state, player_id, position),
        Offer::UpgradeTerritory { position, .. } => upgrade_territory(state, player_id, position),
        Offer::BuySafeHaven { position, .. } => buy_safe_haven(state, player_id, position),
        Offer::UpgradeSafeHaven { position, .. } => upgrade_safe_haven(state, player_id, position),
        Offer::Trade { position, item } => trade(state, player_id, position, item),
        Offer::PayBribe { money, medicine } => {
            let player = state.player_mut(player_id).ok_or(OfferError::Unclaimable)?;
            player.ensure_funds(money)?;
            if player.medicine() < medicine {
                return Err(OfferError::InsufficientMedicine {
                    needed: medicine,
                    available: player.medicine(),
                });
            }
            player.spend_money(money, "Checkpost bribe")?;
            player.adjust_medicine(-medicine);
            Ok(vec![resources(
                "Bribed the checkpost guards",
                ResourceDelta { money: -money, medicine: -medicine, ..ResourceDelta::default() },
            )])
        }
        Offer::TakeRisk { scenario } => {
            let scenario = SCENARIOS.get(scenario).ok_or(OfferError::Unclaimable)?;
            let player = state.player_mut(player_id).ok_or(OfferError::Unclaimable)?;
            let success = attempt_scenario(player, scenario, rng);
            Ok(vec![Effect::ScenarioResolved {
                title: scenario.title.to_string(),
                success,
            }])
        }
        Offer::Attack { target } => {
            let (attacker, defender) = state.pair_mut(player_id, target).ok_or(OfferError::Unclaimable)?;
            let damage = attacker.attack_player(defender);
            Ok(vec![Effect::Attacked { target, damage }])
        }
    }
}

/// Applies what happens when an offer tied to a fallback was never taken.
pub fn apply_fallback(state: &mut GameState, player_id: PlayerId, fallback: Fallback) -> Vec<Effect> {
    let Some(player) = state.player_mut(player_id) else {
        return Vec::new();
    };
    match fallback {
        Fallback::Quarantine => {
            player.send_to_quarantine(QUARANTINE_POSITION);
            vec![Effect::Quarantined]
        }
        Fallback::PlaySafe => {
            SAFE_OUTCOME.apply_to(player);
            vec![resources("Played it safe", SAFE_OUTCOME)]
        }
    }
}

fn buy_territory(state: &mut GameState, player_id: PlayerId, position: u8) -> Result<Vec<Effect>, OfferError> {
    let spec = territory_spec(position).ok_or(OfferError::Unclaimable)?;
    if state.tiles_mut().get_or_create(position).owner().is_some() {
        return Err(OfferError::AlreadyOwned);
    }
    let player = state.player_mut(player_id).ok_or(OfferError::Unclaimable)?;
    if player.influence() < spec.influence_required {
        return Err(OfferError::InsufficientInfluence {
            needed: spec.influence_required,
            available: player.influence(),
        });
    }
    if player.attack() < spec.attack_required {
        player.take_damage(spec.fail_health_loss);
        return Err(OfferError::InsufficientAttack {
            needed: spec.attack_required,
            available: player.attack(),
            health_lost: spec.fail_health_loss,
        });
    }
    player.ensure_funds(spec.buy_cost)?;
    player.adjust_money(-spec.buy_cost);
    player.adjust_influence(spec.influence_on_claim);
    player.adjust_attack(spec.attack_on_claim);
    player.adjust_medicine(spec.medicine_on_claim);
    player.record(HistoryKind::BoughtTile, format!("Bought {}", spec.name), spec.buy_cost);

    state.tiles_mut().get_or_create(position).claim(player_id);
    if position == RADIO_TOWER {
        for tile in state.tiles_mut().iter_mut() {
            if tile.kind() == TileKind::SafeHaven && tile.is_owned_by(player_id) {
                tile.set_can_set_prices(true);
            }
        }
    }
    Ok(vec![Effect::Claimed { position }])
}

pub(crate) fn upgrade_territory(state: &mut GameState, player_id: PlayerId, position: u8) -> Result<Vec<Effect>, OfferError> {
    let spec = territory_spec(position).ok_or(OfferError::NotUpgradable)?;
    if position == HOSPITAL {
        return Err(OfferError::NotUpgradable);
    }
    let tile = state.tiles_mut().get_or_create(position);
    if !tile.is_owned_by(player_id) {
        return Err(OfferError::NotUpgradable);
    }
    if tile.upgrade_level() >= MAX_UPGRADE_LEVEL {
        return Err(OfferError::MaxLevel);
    }
    let next_level = tile.upgrade_level() + 1;
    let cost = spec.upgrade_cost(next_level);
    let (attack, medicine) = spec.per_round_yield(next_level);

    let player = state.player_mut(player_id).ok_or(OfferError::NotUpgradable)?;
    player.ensure_funds(cost)?;
    player.adjust_money(-cost);
    player.adjust_attack(attack);
    player.adjust_medicine(medicine);
    player.record(
        HistoryKind::UpgradedTile,
        format!("Upgraded {} to level {}", spec.name, next_level),
        cost,
    );
    let level = state.tiles_mut().get_or_create(position).upgrade()?;
    Ok(vec![Effect::Upgraded { position, level }])
}

fn buy_safe_haven(state: &mut GameState, player_id: PlayerId, position: u8) -> Result<Vec<Effect>, OfferError> {
    let tile = state.tiles_mut().get_or_create(position);
    if tile.kind() != TileKind::SafeHaven {
        return Err(OfferError::Unclaimable);
    }
    if tile.owner().is_some() {
        return Err(OfferError::AlreadyOwned);
    }
    let owns_radio_tower = state.tiles().get(RADIO_TOWER).is_some_and(|t| t.is_owned_by(player_id));
    let player = state.player_mut(player_id).ok_or(OfferError::Unclaimable)?;
    if player.influence() < SAFE_HAVEN_INFLUENCE {
        return Err(OfferError::InsufficientInfluence {
            needed: SAFE_HAVEN_INFLUENCE,
            available: player.influence(),
        });
    }
    player.ensure_funds(SAFE_HAVEN_COST)?;
    player.adjust_money(-SAFE_HAVEN_COST);
    player.record(HistoryKind::BoughtTile, "Bought a safe haven", SAFE_HAVEN_COST);

    let tile = state.tiles_mut().get_or_create(position);
    tile.claim(player_id);
    tile.set_can_set_prices(owns_radio_tower);
    Ok(vec![Effect::Claimed { position }])
}

fn upgrade_safe_haven(state: &mut GameState, player_id: PlayerId, position: u8) -> Result<Vec<Effect>, OfferError> {
    let tile = state.tiles_mut().get_or_create(position);
    if tile.kind() != TileKind::SafeHaven || !tile.is_owned_by(player_id) {
        return Err(OfferError::NotUpgradable);
    }
    if tile.upgrade_level() >= MAX_UPGRADE_LEVEL {
        return Err(OfferError::MaxLevel);
    }
    let cost = safe_haven_upgrade_cost(tile.upgrade_level());
    let player = state.player_mut(player_id).ok_or(OfferError::NotUpgradable)?;
    player.ensure_funds(cost)?;
    player.adjust_money(-cost);
    player.record(HistoryKind::UpgradedTile, "Upgraded a safe haven", cost);
    let level = state.tiles_mut().get_or_create(position).upgrade()?;
    Ok(vec![Effect::Upgraded { position, level }])
}

fn trade(
    state: &mut GameState,
    player_id: PlayerId,
    position: u8,
    item: TradeItem,
) -> Result<Vec<Effect>, OfferError> {
    let tile = state.tiles_mut().get_or_create(position).clone();
    if tile.kind() != TileKind::SafeHaven {
        return Err(OfferError::Unclaimable);
    }
    let cost = item.cost();
    let player = state.player_mut(player_id).ok_or(OfferError::Unclaimable)?;
    player.spend_money(cost, format!("Safe haven trade: {item:?}"))?;
    item.delta().apply_to(player);
    let mut effects = vec![resources(format!("Traded for {item:?}"), item.delta())];

    if let Some(owner) = tile.owner().filter(|o| *o != player_id) {
        let credit = cost * tile.trade_percentage().clamp(0, 100) / 100;
        if credit > 0 {
            if let Some(owner_player) = state.player_mut(owner) {
                owner_player.add_money(credit, "Safe haven trade share");
                effects.push(Effect::OwnerCredited { owner, amount: credit });
            }
        }
    }
    Ok(effects)
}
