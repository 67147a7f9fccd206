//! Territory catalog: purchase, rent, upgrade and yield tables for every
//! claimable territory, plus the zone sets that grant completion bonuses.

use crate::game::types::BonusSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    Residential,
    Commercial,
    Industrial,
    Military,
}

/// Economics of one claimable territory. Arrays indexed by level run 0..=3;
/// `upgrade_costs[n]` is the price of going from level `n` to `n + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerritorySpec {
    pub name: &'static str,
    pub zone: Zone,
    pub buy_cost: i32,
    pub attack_required: i32,
    pub fail_health_loss: i32,
    pub influence_required: i32,
    pub influence_on_claim: i32,
    pub attack_on_claim: i32,
    pub medicine_on_claim: i32,
    pub rent_money: [i32; 4],
    pub rent_medicine: [i32; 4],
    pub upgrade_costs: [i32; 3],
    pub per_round_attack: [i32; 4],
    pub per_round_medicine: [i32; 4],
}

impl TerritorySpec {
    /// Whether any level of this territory produces attack each round.
    pub fn yields_attack(&self) -> bool {
        self.per_round_attack.iter().any(|v| *v > 0)
    }

    /// Whether any level of this territory produces medicine each round.
    pub fn yields_medicine(&self) -> bool {
        self.per_round_medicine.iter().any(|v| *v > 0)
    }

    /// Price of reaching `next_level` (1..=3).
    pub fn upgrade_cost(&self, next_level: u8) -> i32 {
        let idx = usize::from(next_level.clamp(1, 3) - 1);
        self.upgrade_costs[idx]
    }

    /// Attack and medicine gained per round at `level`.
    pub fn per_round_yield(&self, level: u8) -> (i32, i32) {
        let idx = usize::from(level.min(3));
        (self.per_round_attack[idx], self.per_round_medicine[idx])
    }

    pub fn rent(&self, level: u8) -> (i32, i32) {
        let idx = usize::from(level.min(3));
        (self.rent_money[idx], self.rent_medicine[idx])
    }
}

/// Position of the Radio Tower. Owning it lets the owner set safe-haven prices.
pub const RADIO_TOWER: u8 = 9;

/// Position of the Hospital. It cannot be upgraded and pays its owner medicine on visits.
pub const HOSPITAL: u8 = 18;

/// Medicine a Hospital owner receives whenever someone pays rent there.
pub const HOSPITAL_OWNER_MEDICINE: i32 = 5;

const NO_YIELD: [i32; 4] = [0, 0, 0, 0];

const ABANDONED_HOUSE: TerritorySpec = TerritorySpec {
    name: "Abandoned House",
    zone: Zone::Residential,
    buy_cost: 100,
    attack_required: 3,
    fail_health_loss: 15,
    influence_required: 0,
    influence_on_claim: 15,
    attack_on_claim: 2,
    medicine_on_claim: 0,
    rent_money: [20, 30, 40, 40],
    rent_medicine: NO_YIELD,
    upgrade_costs: [40, 80, 120],
    per_round_attack: NO_YIELD,
    per_round_medicine: NO_YIELD,
};

const APARTMENT_COMPLEX: TerritorySpec = TerritorySpec {
    name: "Apartment Complex",
    zone: Zone::Residential,
    buy_cost: 150,
    attack_required: 3,
    fail_health_loss: 15,
    influence_required: 0,
    influence_on_claim: 20,
    attack_on_claim: 3,
    medicine_on_claim: 0,
    rent_money: [30, 50, 70, 70],
    rent_medicine: NO_YIELD,
    upgrade_costs: [60, 90, 130],
    per_round_attack: NO_YIELD,
    per_round_medicine: NO_YIELD,
};

const MOTEL_SHELTER: TerritorySpec = TerritorySpec {
    name: "Motel Shelter",
    zone: Zone::Residential,
    buy_cost: 180,
    attack_required: 3,
    fail_health_loss: 15,
    influence_required: 0,
    influence_on_claim: 25,
    attack_on_claim: 0,
    medicine_on_claim: 1,
    rent_money: [40, 60, 80, 80],
    rent_medicine: NO_YIELD,
    upgrade_costs: [70, 100, 150],
    per_round_attack: NO_YIELD,
    per_round_medicine: NO_YIELD,
};

const SUPERMARKET: TerritorySpec = TerritorySpec {
    name: "Supermarket",
    zone: Zone::Commercial,
    buy_cost: 220,
    attack_required: 6,
    fail_health_loss: 25,
    influence_required: 0,
    influence_on_claim: 40,
    attack_on_claim: 5,
    medicine_on_claim: 0,
    rent_money: [50, 70, 90, 90],
    rent_medicine: NO_YIELD,
    upgrade_costs: [80, 120, 160],
    per_round_attack: [0, 5, 9, 13],
    per_round_medicine: NO_YIELD,
};

const GAS_STATION: TerritorySpec = TerritorySpec {
    name: "Gas Station",
    zone: Zone::Commercial,
    buy_cost: 250,
    attack_required: 6,
    fail_health_loss: 25,
    influence_required: 0,
    influence_on_claim: 50,
    attack_on_claim: 6,
    medicine_on_claim: 0,
    rent_money: [60, 80, 100, 100],
    rent_medicine: NO_YIELD,
    upgrade_costs: [100, 140, 180],
    per_round_attack: [0, 6, 10, 14],
    per_round_medicine: NO_YIELD,
};

const PHARMACY: TerritorySpec = TerritorySpec {
    name: "Pharmacy",
    zone: Zone::Commercial,
    buy_cost: 280,
    attack_required: 6,
    fail_health_loss: 25,
    influence_required: 0,
    influence_on_claim: 60,
    attack_on_claim: 0,
    medicine_on_claim: 0,
    rent_money: [70, 90, 110, 110],
    rent_medicine: [1, 1, 2, 3],
    upgrade_costs: [110, 150, 190],
    per_round_attack: NO_YIELD,
    per_round_medicine: [0, 1, 2, 3],
};

const HARDWARE_STORE: TerritorySpec = TerritorySpec {
    name: "Hardware Store",
    zone: Zone::Commercial,
    buy_cost: 300,
    attack_required: 6,
    fail_health_loss: 25,
    influence_required: 0,
    influence_on_claim: 70,
    attack_on_claim: 7,
    medicine_on_claim: 0,
    rent_money: [75, 95, 120, 120],
    rent_medicine: NO_YIELD,
    upgrade_costs: [130, 170, 210],
    per_round_attack: [0, 9, 12, 15],
    per_round_medicine: NO_YIELD,
};

const FACTORY: TerritorySpec = TerritorySpec {
    name: "Factory",
    zone: Zone::Industrial,
    buy_cost: 350,
    attack_required: 10,
    fail_health_loss: 40,
    influence_required: 65,
    influence_on_claim: 95,
    attack_on_claim: 0,
    medicine_on_claim: 0,
    rent_money: [90, 110, 140, 140],
    rent_medicine: NO_YIELD,
    upgrade_costs: [150, 175, 220],
    per_round_attack: [0, 5, 10, 15],
    per_round_medicine: [0, 10, 15, 20],
};

const POWER_PLANT: TerritorySpec = TerritorySpec {
    name: "Power Plant",
    zone: Zone::Industrial,
    buy_cost: 400,
    attack_required: 10,
    fail_health_loss: 40,
    influence_required: 65,
    influence_on_claim: 95,
    attack_on_claim: 0,
    medicine_on_claim: 0,
    rent_money: [100, 120, 160, 160],
    rent_medicine: NO_YIELD,
    upgrade_costs: [170, 195, 230],
    per_round_attack: [0, 10, 15, 20],
    per_round_medicine: [0, 3, 4, 5],
};

const WAREHOUSE: TerritorySpec = TerritorySpec {
    name: "Warehouse",
    zone: Zone::Industrial,
    buy_cost: 420,
    attack_required: 10,
    fail_health_loss: 40,
    influence_required: 85,
    influence_on_claim: 105,
    attack_on_claim: 0,
    medicine_on_claim: 0,
    rent_money: [110, 130, 170, 170],
    rent_medicine: NO_YIELD,
    upgrade_costs: [190, 210, 250],
    per_round_attack: [0, 10, 15, 20],
    per_round_medicine: NO_YIELD,
};

const RADIO_TOWER_SPEC: TerritorySpec = TerritorySpec {
    name: "Radio Tower",
    zone: Zone::Industrial,
    buy_cost: 450,
    attack_required: 10,
    fail_health_loss: 40,
    influence_required: 180,
    influence_on_claim: 115,
    attack_on_claim: 0,
    medicine_on_claim: 0,
    rent_money: [120, 130, 130, 130],
    rent_medicine: NO_YIELD,
    upgrade_costs: [200, 600, 600],
    per_round_attack: NO_YIELD,
    per_round_medicine: NO_YIELD,
};

const RESEARCH_LAB: TerritorySpec = TerritorySpec {
    name: "Research Lab",
    zone: Zone::Military,
    buy_cost: 500,
    attack_required: 32,
    fail_health_loss: 60,
    influence_required: 200,
    influence_on_claim: 0,
    attack_on_claim: 0,
    medicine_on_claim: 0,
    rent_money: [130, 130, 130, 130],
    rent_medicine: NO_YIELD,
    upgrade_costs: [0, 0, 0],
    per_round_attack: NO_YIELD,
    per_round_medicine: NO_YIELD,
};

const MILITARY_BASE: TerritorySpec = TerritorySpec {
    name: "Military Base",
    zone: Zone::Military,
    buy_cost: 600,
    attack_required: 40,
    fail_health_loss: 60,
    influence_required: 350,
    influence_on_claim: 200,
    attack_on_claim: 0,
    medicine_on_claim: 0,
    rent_money: [150, 170, 220, 220],
    rent_medicine: NO_YIELD,
    upgrade_costs: [0, 0, 0],
    per_round_attack: [0, 20, 25, 30],
    per_round_medicine: NO_YIELD,
};

const HOSPITAL_SPEC: TerritorySpec = TerritorySpec {
    name: "Hospital",
    zone: Zone::Military,
    buy_cost: 650,
    attack_required: 35,
    fail_health_loss: 60,
    influence_required: 180,
    influence_on_claim: 120,
    attack_on_claim: 0,
    medicine_on_claim: 0,
    rent_money: [160, 160, 160, 160],
    rent_medicine: NO_YIELD,
    upgrade_costs: [0, 0, 0],
    per_round_attack: NO_YIELD,
    per_round_medicine: NO_YIELD,
};

/// Spec of the claimable territory at `position`, if any.
pub fn territory_spec(position: u8) -> Option<&'static TerritorySpec> {
    let spec = match position {
        21 | 23 => &ABANDONED_HOUSE,
        26 | 28 => &APARTMENT_COMPLEX,
        29 => &MOTEL_SHELTER,
        32 => &SUPERMARKET,
        34 => &GAS_STATION,
        36 => &PHARMACY,
        39 => &HARDWARE_STORE,
        1 => &FACTORY,
        2 => &POWER_PLANT,
        4 => &WAREHOUSE,
        RADIO_TOWER => &RADIO_TOWER_SPEC,
        12 => &RESEARCH_LAB,
        17 => &MILITARY_BASE,
        HOSPITAL => &HOSPITAL_SPEC,
        _ => return None,
    };
    Some(spec)
}

/// A set of positions that pays a bundle each round once one player owns all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneSet {
    pub zone: Zone,
    pub positions: &'static [u8],
    pub bonus: BonusSummary,
}

pub const ZONE_SETS: [ZoneSet; 3] = [
    ZoneSet {
        zone: Zone::Residential,
        positions: &[21, 23, 29],
        bonus: BonusSummary { money: 1500, attack: 0, medicine: 1, influence: 25 },
    },
    ZoneSet {
        zone: Zone::Commercial,
        positions: &[32, 34, 36, 39],
        bonus: BonusSummary { money: 0, attack: 5, medicine: 1, influence: 5 },
    },
    ZoneSet {
        zone: Zone::Industrial,
        positions: &[1, 2, 4, 9],
        bonus: BonusSummary { money: 0, attack: 0, medicine: 0, influence: 2 },
    },
];

/// Per-round income of every owned safe haven.
pub const SAFE_HAVEN_ROUND_BONUS: BonusSummary =
    BonusSummary { money: 0, attack: 10, medicine: 5, influence: 0 };

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_zone_set_position_has_a_spec() {
        for set in ZONE_SETS {
            for pos in set.positions {
                let spec = territory_spec(*pos).expect("zone position without spec");
                assert_eq!(spec.zone, set.zone);
            }
        }
    }

    #[test]
    fn test_yield_flags() {
        assert!(territory_spec(32).unwrap().yields_attack());
        assert!(!territory_spec(32).unwrap().yields_medicine());
        assert!(territory_spec(36).unwrap().yields_medicine());
        assert!(!territory_spec(21).unwrap().yields_attack());
    }

    #[test]
    fn test_upgrade_cost_indexing() {
        let factory = territory_spec(1).unwrap();
        assert_eq!(factory.upgrade_cost(1), 150);
        assert_eq!(factory.upgrade_cost(3), 220);
        assert_eq!(factory.per_round_yield(2), (10, 15));
    }

    #[test]
    fn test_unmapped_territories() {
        assert!(territory_spec(6).is_none());
        assert!(territory_spec(19).is_none());
        assert!(territory_spec(31).is_none());
    }
}
