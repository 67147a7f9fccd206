//! AI turn processing: the fixed upkeep sequence run at the start of an AI
//! turn, and offer selection after an AI player lands.

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::game::LAB_CURE_COST;
use crate::game::ai::decisions::{
    should_attack_player, should_buy_property, should_fund_lab_cure, should_upgrade_property,
    should_use_medicine,
};
use crate::game::board::catalog::HOSPITAL;
use crate::game::board::territory_spec;
use crate::game::entities::Player;
use crate::game::state::GameState;
use crate::game::systems::encounters::{scenario_chance, SCENARIOS};
use crate::game::systems::landing::{
    accept_offer, apply_fallback, upgrade_territory, Effect, Landing, Offer, TradeItem,
    SAFE_HAVEN_INFLUENCE,
};
use crate::game::types::{PlayerId, TileKind};

/// Something the AI did on its own during upkeep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiAction {
    UsedMedicine,
    Upgraded { position: u8, level: u8 },
    FundedLabCure,
}

/// Upkeep for an AI player: medicine, then upgrades of owned territories,
/// then the lab cure. Returns what was done; human players get nothing.
pub fn process_ai_turn(state: &mut GameState, player_id: PlayerId) -> Vec<AiAction> {
    let mut actions = Vec::new();
    let Some(strategy) = state.player(player_id).and_then(Player::strategy) else {
        return actions;
    };

    if let Some(player) = state.player_mut(player_id) {
        if should_use_medicine(player, strategy) && player.use_medicine() {
            actions.push(AiAction::UsedMedicine);
        }
    }

    for position in state.tiles().positions_owned_by(player_id) {
        if position == HOSPITAL {
            continue;
        }
        let Some(spec) = territory_spec(position) else {
            continue;
        };
        let level = state.tiles().get(position).map(|t| t.upgrade_level()).unwrap_or(0);
        let cost = spec.upgrade_cost(level + 1);
        let wants = state
            .player(player_id)
            .is_some_and(|p| should_upgrade_property(p, strategy, position, level, cost));
        if !wants {
            continue;
        }
        if let Ok(effects) = upgrade_territory(state, player_id, position) {
            for effect in effects {
                if let Effect::Upgraded { position, level } = effect {
                    actions.push(AiAction::Upgraded { position, level });
                }
            }
        }
    }

    let wants_cure = state
        .player(player_id)
        .is_some_and(|p| should_fund_lab_cure(p, strategy, LAB_CURE_COST));
    if wants_cure && state.fund_lab_cure(player_id).is_ok() {
        actions.push(AiAction::FundedLabCure);
    }

    if !actions.is_empty() {
        info!("[AI] player={} strategy={} actions={:?}", player_id, strategy, actions);
    }
    actions
}

fn wants_trade(player: &Player) -> bool {
    player.medicine() < 3 || (player.money() >= 100 && player.attack() < 200)
}

fn pick_trade(player: &Player) -> Option<TradeItem> {
    if player.medicine() < 3 && player.money() >= TradeItem::Medicine.cost() {
        Some(TradeItem::Medicine)
    } else if player.money() >= TradeItem::AttackBoost.cost() {
        Some(TradeItem::AttackBoost)
    } else if player.money() >= TradeItem::Armor.cost() {
        Some(TradeItem::Armor)
    } else {
        None
    }
}

/// Offers an AI player would take from `landing`, judged against the current state.
pub fn choose_offers(state: &GameState, player_id: PlayerId, landing: &Landing) -> Vec<Offer> {
    let Some(player) = state.player(player_id) else {
        return Vec::new();
    };
    let Some(strategy) = player.strategy() else {
        return Vec::new();
    };

    let mut chosen = Vec::new();
    let mut traded = false;
    let mut attacked = false;
    for offer in &landing.offers {
        let take = match *offer {
            Offer::BuyTerritory { position, cost } => territory_spec(position).is_some_and(|spec| {
                player.influence() >= spec.influence_required
                    && player.attack() >= spec.attack_required
                    && player.money() >= cost
                    && should_buy_property(player, strategy, position, TileKind::Territory, cost)
            }),
            Offer::UpgradeTerritory { position, cost, next_level } => {
                should_upgrade_property(player, strategy, position, next_level - 1, cost)
            }
            Offer::BuySafeHaven { position, cost } => {
                player.influence() >= SAFE_HAVEN_INFLUENCE
                    && player.money() >= cost
                    && should_buy_property(player, strategy, position, TileKind::SafeHaven, cost)
            }
            Offer::UpgradeSafeHaven { cost, .. } => player.money() >= cost,
            Offer::Trade { item, .. } => {
                !traded && wants_trade(player) && pick_trade(player) == Some(item)
            }
            Offer::PayBribe { money, medicine } => player.money() >= money && player.medicine() >= medicine,
            Offer::TakeRisk { scenario } => SCENARIOS
                .get(scenario)
                .is_some_and(|s| scenario_chance(player, s) > 50.0),
            Offer::Attack { target } => {
                !attacked
                    && state
                        .player(target)
                        .is_some_and(|t| should_attack_player(player, t, strategy))
            }
        };
        if take {
            traded |= matches!(offer, Offer::Trade { .. });
            attacked |= matches!(offer, Offer::Attack { .. });
            chosen.push(offer.clone());
        }
    }
    chosen
}

/// Lets the AI settle `landing`: accepts the chosen offers in order, then
/// applies the fallback unless an accepted offer settled it.
pub fn play_landing(
    state: &mut GameState,
    player_id: PlayerId,
    landing: &Landing,
    rng: &mut impl Rng,
) -> Vec<Effect> {
    let mut effects = Vec::new();
    let mut settled = false;
    for offer in choose_offers(state, player_id, landing) {
        match accept_offer(state, player_id, &offer, rng) {
            Ok(mut done) => {
                settled |= offer.settles_fallback();
                effects.append(&mut done);
            }
            Err(e) => debug!("[AI] player={} offer {:?} rejected: {}", player_id, offer, e),
        }
    }
    if let Some(fallback) = landing.fallback.filter(|_| !settled) {
        effects.extend(apply_fallback(state, player_id, fallback));
    }
    effects
}
