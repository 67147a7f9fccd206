//! Pure AI decisions. Each one scores the situation and compares the score
//! against the strategy's threshold; nothing here touches game state.

use crate::config::game::MAX_UPGRADE_LEVEL;
use crate::game::board::territory_spec;
use crate::game::entities::Player;
use crate::game::types::{Strategy, TileKind};

/// Minimum score each decision needs for a given strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub buy: f64,
    pub upgrade: f64,
    pub medicine: f64,
    pub attack: f64,
    pub lab_cure: f64,
}

pub fn thresholds(strategy: Strategy) -> Thresholds {
    match strategy {
        Strategy::Aggressive => Thresholds { buy: 0.6, upgrade: 0.5, medicine: 0.3, attack: 0.4, lab_cure: 0.7 },
        Strategy::Defensive => Thresholds { buy: 0.7, upgrade: 0.6, medicine: 0.6, attack: 0.8, lab_cure: 0.5 },
        Strategy::Economic => Thresholds { buy: 0.5, upgrade: 0.4, medicine: 0.4, attack: 0.6, lab_cure: 0.8 },
        Strategy::Balanced => Thresholds { buy: 0.65, upgrade: 0.55, medicine: 0.5, attack: 0.6, lab_cure: 0.6 },
    }
}

/// How much a tile kind is worth holding, before strategy and budget.
pub fn property_base_value(kind: TileKind) -> f64 {
    match kind {
        TileKind::SafeHaven => 2.0,
        TileKind::Territory => 1.5,
        TileKind::Resource => 1.3,
        TileKind::Scenario => 1.0,
        TileKind::Special => 0.8,
        TileKind::Checkpost => 0.6,
        TileKind::Quarantine => 0.5,
        TileKind::Zombie => 0.3,
        TileKind::Free => 0.1,
        TileKind::Start => 0.0,
    }
}

/// What the tile at `position` produces each round: (attack, medicine).
fn yields(position: u8, kind: TileKind) -> (bool, bool) {
    match kind {
        TileKind::SafeHaven => (true, true),
        TileKind::Territory => territory_spec(position)
            .map(|spec| (spec.yields_attack(), spec.yields_medicine()))
            .unwrap_or((false, false)),
        _ => (false, false),
    }
}

fn strategy_multiplier(strategy: Strategy, position: u8, kind: TileKind) -> f64 {
    let (attack, medicine) = yields(position, kind);
    match strategy {
        Strategy::Aggressive if attack => 1.5,
        Strategy::Aggressive => 0.8,
        Strategy::Defensive if medicine => 1.5,
        Strategy::Defensive => 0.8,
        Strategy::Economic => 1.2,
        Strategy::Balanced => 1.0,
    }
}

/// Score for buying the tile at `position`. Only catalogued territories are
/// worth anything; safe havens and unmapped territories score zero.
pub fn buy_value(player: &Player, strategy: Strategy, position: u8, kind: TileKind) -> f64 {
    if kind != TileKind::Territory || territory_spec(position).is_none() {
        return 0.0;
    }
    let money_factor = (f64::from(player.money()) / 2000.0).min(2.0);
    property_base_value(kind) * strategy_multiplier(strategy, position, kind) * money_factor
}

pub fn should_buy_property(
    player: &Player,
    strategy: Strategy,
    position: u8,
    kind: TileKind,
    price: i32,
) -> bool {
    if player.money() < price {
        return false;
    }
    buy_value(player, strategy, position, kind) >= thresholds(strategy).buy
}

/// Whether to take the territory at `position` from `level` to the next one for `cost`.
pub fn should_upgrade_property(
    player: &Player,
    strategy: Strategy,
    position: u8,
    level: u8,
    cost: i32,
) -> bool {
    if player.money() < cost || level >= MAX_UPGRADE_LEVEL {
        return false;
    }
    let Some(spec) = territory_spec(position) else {
        return false;
    };
    let (atk_now, med_now) = spec.per_round_yield(level);
    let (atk_next, med_next) = spec.per_round_yield(level + 1);
    let gain = f64::from((atk_next - atk_now) + (med_next - med_now));
    let money = f64::from(player.money().max(1));
    let value = gain / (1.0 + f64::from(cost) / money);
    value >= thresholds(strategy).upgrade
}

pub fn should_use_medicine(player: &Player, strategy: Strategy) -> bool {
    player.medicine() > 0 && player.health_ratio() < thresholds(strategy).medicine
}

pub fn should_attack_player(player: &Player, target: &Player, strategy: Strategy) -> bool {
    if player.id() == target.id() || player.attack() < target.attack() {
        return false;
    }
    let weight = match strategy {
        Strategy::Aggressive => 1.5,
        Strategy::Defensive => 0.5,
        Strategy::Economic => 0.8,
        Strategy::Balanced => 1.0,
    };
    let ratio = f64::from(player.attack()) / f64::from(target.attack().max(1));
    target.health_ratio() * ratio * weight >= thresholds(strategy).attack
}

pub fn should_fund_lab_cure(player: &Player, strategy: Strategy, cost: i32) -> bool {
    if player.lab_cure_funded() || player.money() < cost {
        return false;
    }
    let money = f64::from(player.money().max(1));
    let value = (1.0 - f64::from(cost) / money) * player.health_ratio();
    value >= thresholds(strategy).lab_cure
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bot(money: i32, attack: i32) -> Player {
        let mut p = Player::new_ai(1, "AI AGGRESSIVE", "#34c759", Strategy::Aggressive);
        p.set_money(money);
        p.set_attack(attack);
        p
    }

    #[test]
    fn test_aggressive_buys_attack_territory() {
        let p = bot(1000, 250);
        let value = buy_value(&p, Strategy::Aggressive, 32, TileKind::Territory);
        assert!((value - 1.125).abs() < 1e-9);
        assert!(should_buy_property(&p, Strategy::Aggressive, 32, TileKind::Territory, 220));
    }

    #[test]
    fn test_buy_requires_money_and_spec() {
        let p = bot(1000, 250);
        assert!(!should_buy_property(&p, Strategy::Economic, 32, TileKind::Territory, 1500));
        assert_eq!(buy_value(&p, Strategy::Economic, 22, TileKind::Territory), 0.0);
    }

    #[test]
    fn test_safe_havens_are_never_bought() {
        let p = bot(4000, 250);
        for strategy in Strategy::ROTATION {
            assert_eq!(buy_value(&p, strategy, 5, TileKind::SafeHaven), 0.0);
            assert!(!should_buy_property(&p, strategy, 5, TileKind::SafeHaven, 1000));
        }
    }

    #[test]
    fn test_poor_bot_passes_on_residential() {
        // 1.5 * 0.8 * 0.25 = 0.3
        let p = bot(500, 250);
        assert!(!should_buy_property(&p, Strategy::Aggressive, 21, TileKind::Territory, 100));
    }

    #[test]
    fn test_decisions_are_pure() {
        let p = bot(1200, 180);
        let target = Player::new(0, "Alice", "#ff3b30");
        for strategy in Strategy::ROTATION {
            let first = (
                should_buy_property(&p, strategy, 34, TileKind::Territory, 250),
                should_attack_player(&p, &target, strategy),
                should_use_medicine(&p, strategy),
                should_fund_lab_cure(&p, strategy, 500),
            );
            for _ in 0..10 {
                let again = (
                    should_buy_property(&p, strategy, 34, TileKind::Territory, 250),
                    should_attack_player(&p, &target, strategy),
                    should_use_medicine(&p, strategy),
                    should_fund_lab_cure(&p, strategy, 500),
                );
                assert_eq!(first, again);
            }
        }
    }

    #[test]
    fn test_upgrade_needs_yield_and_budget() {
        let p = bot(1000, 100);
        assert!(should_upgrade_property(&p, Strategy::Balanced, 32, 0, 80));
        assert!(!should_upgrade_property(&p, Strategy::Balanced, 21, 0, 40));
        assert!(!should_upgrade_property(&p, Strategy::Balanced, 32, 3, 0));
        assert!(!should_upgrade_property(&bot(50, 100), Strategy::Balanced, 32, 0, 80));
    }

    #[test]
    fn test_medicine_depends_on_health_ratio() {
        let mut p = bot(1000, 100);
        p.set_medicine(1);
        p.take_damage(900);
        assert!(should_use_medicine(&p, Strategy::Defensive));
        assert!(!should_use_medicine(&p, Strategy::Aggressive));
        p.set_medicine(0);
        assert!(!should_use_medicine(&p, Strategy::Defensive));
    }

    #[test]
    fn test_attack_rules() {
        let p = bot(1000, 100);
        let weak = Player::new(0, "Alice", "#ff3b30");
        assert!(should_attack_player(&p, &weak, Strategy::Aggressive));
        assert!(!should_attack_player(&p, &weak, Strategy::Defensive));
        assert!(!should_attack_player(&p, &p, Strategy::Aggressive));

        let mut strong = Player::new(2, "Bob", "#007aff");
        strong.set_attack(300);
        assert!(!should_attack_player(&p, &strong, Strategy::Aggressive));
    }

    #[test]
    fn test_lab_cure_rules() {
        // (1 - 500/2000) * 1.0 = 0.75
        let p = bot(2000, 100);
        assert!(should_fund_lab_cure(&p, Strategy::Aggressive, 500));
        assert!(!should_fund_lab_cure(&p, Strategy::Economic, 500));
        assert!(!should_fund_lab_cure(&bot(400, 100), Strategy::Defensive, 500));

        let mut funded = bot(2000, 100);
        funded.fund_lab_cure(3);
        assert!(!should_fund_lab_cure(&funded, Strategy::Defensive, 500));
    }
}
