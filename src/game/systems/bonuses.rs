//! Start-of-turn income: per-round tile yields, safe-haven upkeep, and
//! zone-completion sets.

use crate::game::board::TileRegistry;
use crate::game::board::catalog::{territory_spec, SAFE_HAVEN_ROUND_BONUS, ZONE_SETS};
use crate::game::entities::{HistoryKind, Player};
use crate::game::types::{BonusSummary, PlayerId, TileKind};

/// What `player` earns this round from the tiles they own. Pure.
pub fn compute_round_bonus(tiles: &TileRegistry, player: PlayerId) -> BonusSummary {
    let mut summary = BonusSummary::default();
    let owned = tiles.positions_owned_by(player);

    for tile in tiles.owned_by(player) {
        if let Some(spec) = territory_spec(tile.position()) {
            let (attack, medicine) = spec.per_round_yield(tile.upgrade_level());
            summary.attack += attack;
            summary.medicine += medicine;
        }
        if tile.kind() == TileKind::SafeHaven {
            summary.add(SAFE_HAVEN_ROUND_BONUS);
        }
    }

    for set in ZONE_SETS {
        if set.positions.iter().all(|p| owned.contains(p)) {
            summary.add(set.bonus);
        }
    }
    summary
}

/// Computes and pays the round bonus to `player`.
pub fn apply_start_of_turn_bonuses(tiles: &TileRegistry, player: &mut Player) -> BonusSummary {
    let summary = compute_round_bonus(tiles, player.id());
    if summary.is_empty() {
        return summary;
    }
    player.adjust_money(summary.money);
    player.adjust_attack(summary.attack);
    player.adjust_medicine(summary.medicine);
    player.adjust_influence(summary.influence);
    player.record(HistoryKind::Bonus, "Start of turn income", summary.money);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_owning(owner: PlayerId, positions: &[u8]) -> TileRegistry {
        let mut tiles = TileRegistry::new();
        for pos in positions {
            tiles.get_or_create(*pos).claim(owner);
        }
        tiles
    }

    #[test]
    fn test_no_tiles_no_bonus() {
        let tiles = TileRegistry::new();
        let mut player = Player::new(0, "A", "#fff");
        let summary = apply_start_of_turn_bonuses(&tiles, &mut player);
        assert!(summary.is_empty());
        assert!(player.history().is_empty());
    }

    #[test]
    fn test_residential_set_bonus() {
        let tiles = registry_owning(0, &[21, 23, 29]);
        let summary = compute_round_bonus(&tiles, 0);
        assert_eq!(summary, BonusSummary { money: 1500, attack: 0, medicine: 1, influence: 25 });
    }

    #[test]
    fn test_incomplete_set_pays_nothing() {
        let tiles = registry_owning(0, &[21, 23]);
        assert!(compute_round_bonus(&tiles, 0).is_empty());
        assert!(compute_round_bonus(&registry_owning(1, &[21, 23, 29]), 0).is_empty());
    }

    #[test]
    fn test_set_bonus_is_stable_between_evaluations() {
        let tiles = registry_owning(0, &[21, 23, 29, 5]);
        let mut player = Player::new(0, "A", "#fff");
        let first = apply_start_of_turn_bonuses(&tiles, &mut player);
        let second = apply_start_of_turn_bonuses(&tiles, &mut player);
        assert_eq!(first, second);
        assert_eq!(player.money(), 1000 + 2 * 1500);
        assert_eq!(player.attack(), 100 + 2 * 10);
        assert_eq!(player.medicine(), 2 * 6);
    }

    #[test]
    fn test_upgraded_territory_yields() {
        let mut tiles = registry_owning(0, &[1]);
        tiles.get_or_create(1).upgrade().unwrap();
        tiles.get_or_create(1).upgrade().unwrap();
        let summary = compute_round_bonus(&tiles, 0);
        assert_eq!((summary.attack, summary.medicine), (10, 15));
    }
}
