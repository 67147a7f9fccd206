//! Scenario and random-event catalogs, zombie damage, and the resource
//! deltas they produce.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::game::entities::Player;

/// Change to a player's resources. Negative health is damage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDelta {
    pub money: i32,
    pub medicine: i32,
    pub attack: i32,
    pub influence: i32,
    pub health: i32,
    pub max_health: i32,
}

impl ResourceDelta {
    pub fn money(money: i32) -> Self {
        Self { money, ..Self::default() }
    }

    pub fn apply_to(&self, player: &mut Player) {
        player.adjust_money(self.money);
        player.adjust_medicine(self.medicine);
        player.adjust_attack(self.attack);
        player.adjust_influence(self.influence);
        if self.max_health != 0 {
            player.increase_max_health(self.max_health);
        }
        if self.health < 0 {
            player.take_damage(-self.health);
        } else if self.health > 0 {
            player.heal(self.health);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenario {
    pub title: &'static str,
    pub description: &'static str,
    pub difficulty: i32,
    pub reward_money: i32,
    pub reward_attack: i32,
    pub reward_influence: i32,
    pub reward_medicine: i32,
    pub penalty_health: i32,
    pub penalty_attack: i32,
}

impl Scenario {
    pub fn reward(&self) -> ResourceDelta {
        ResourceDelta {
            money: self.reward_money,
            medicine: self.reward_medicine,
            attack: self.reward_attack,
            influence: self.reward_influence,
            ..ResourceDelta::default()
        }
    }

    pub fn penalty(&self) -> ResourceDelta {
        ResourceDelta {
            health: -self.penalty_health,
            attack: -self.penalty_attack,
            ..ResourceDelta::default()
        }
    }
}

/// Outcome of walking away from a scenario.
pub const SAFE_OUTCOME: ResourceDelta = ResourceDelta {
    money: 100,
    medicine: 0,
    attack: 0,
    influence: 0,
    health: -10,
    max_health: 0,
};

const fn scenario(
    title: &'static str,
    description: &'static str,
    difficulty: i32,
    rewards: [i32; 4],
    penalties: [i32; 2],
) -> Scenario {
    Scenario {
        title,
        description,
        difficulty,
        reward_money: rewards[0],
        reward_attack: rewards[1],
        reward_influence: rewards[2],
        reward_medicine: rewards[3],
        penalty_health: penalties[0],
        penalty_attack: penalties[1],
    }
}

pub const SCENARIOS: [Scenario; 10] = [
    scenario("Mall Ambush", "A mall full of supplies, overrun by zombies.", 300, [500, 1, 10, 10], [100, 5]),
    scenario("Radio Distress Call", "A faint voice calls for help over the radio.", 280, [400, 0, 8, 12], [80, 4]),
    scenario("Hospital Raid", "A hospital storage room locked behind barricades.", 320, [300, 3, 12, 8], [120, 6]),
    scenario("Military Checkpoint", "A deserted checkpoint with working turrets.", 350, [600, 0, 20, 10], [150, 10]),
    scenario("Warehouse Cache", "A massive stash inside a warehouse crawling with infected.", 400, [800, 2, 25, 15], [200, 15]),
    scenario("Bridge Blockade", "A collapsed bridge with wreckage worth looting.", 270, [350, 0, 8, 6], [80, 5]),
    scenario("Underground Bunker", "A sealed bunker that could hold supplies or a trap.", 380, [900, 2, 15, 25], [160, 8]),
    scenario("Refugee Convoy", "A stranded convoy of survivors asks for protection.", 310, [500, 1, 10, 20], [100, 4]),
    scenario("Quarantine Zone Breach", "A government quarantine zone with infected soldiers.", 420, [1000, 3, 25, 30], [200, 10]),
    scenario("Supply Train", "A running supply train passes nearby.", 350, [800, 2, 18, 15], [150, 6]),
];

/// Success chance in percent for `player` attempting `scenario`.
pub fn scenario_chance(player: &Player, scenario: &Scenario) -> f64 {
    let bonus = f64::from(player.attack() + player.influence()) * 0.5;
    let penalty = f64::from(scenario.difficulty) * 2.0;
    (50.0 + bonus - penalty).clamp(0.0, 100.0)
}

/// Rolls the scenario and applies the reward or the penalty. Returns whether it succeeded.
pub fn attempt_scenario(player: &mut Player, scenario: &Scenario, rng: &mut impl Rng) -> bool {
    let chance = scenario_chance(player, scenario);
    let success = rng.random::<f64>() * 100.0 < chance;
    if success {
        scenario.reward().apply_to(player);
    } else {
        scenario.penalty().apply_to(player);
    }
    success
}

pub fn pick_scenario(rng: &mut impl Rng) -> usize {
    rng.random_range(0..SCENARIOS.len())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomEvent {
    pub name: &'static str,
    pub description: &'static str,
    pub delta: ResourceDelta,
}

const fn event(name: &'static str, description: &'static str, d: [i32; 5]) -> RandomEvent {
    RandomEvent {
        name,
        description,
        delta: ResourceDelta {
            money: d[0],
            medicine: d[1],
            attack: d[2],
            influence: d[3],
            health: d[4],
            max_health: 0,
        },
    }
}

pub const RANDOM_EVENTS: [RandomEvent; 10] = [
    event("Abandoned Car", "You found a stash of cash in an abandoned car.", [50, 0, 0, 0, 0]),
    event("Medical Crate", "You discovered some medicine supplies.", [0, 2, 0, 0, 0]),
    event("Weapon Stash", "You found working weapons.", [0, 0, 5, 0, 0]),
    event("Zombie Camp Raid", "You raided a zombie camp for loot.", [100, 1, 0, 0, 0]),
    event("Helping Survivors", "You helped survivors and gained reputation.", [0, 0, 0, 5, 0]),
    event("Police Station Find", "You scavenged a police station for resources.", [75, 0, 3, 0, 0]),
    event("Zombie Ambush", "You were attacked by zombies!", [0, 0, 0, 0, -40]),
    event("Spoiled Medicine", "Your medicine stash went bad.", [0, -1, 0, 0, 0]),
    event("Bandit Toll", "Bandits robbed you at gunpoint.", [-100, 0, 0, 0, 0]),
    event("Broken Weapon", "Your weapon broke during combat.", [0, 0, -5, 0, 0]),
];

pub fn pick_event(rng: &mut impl Rng) -> &'static RandomEvent {
    RANDOM_EVENTS.choose(rng).unwrap_or(&RANDOM_EVENTS[0])
}

/// Damage and attack loss from a zombie tile at `position`. Stronger
/// players take the lighter hit of their zone.
pub fn zombie_attack(position: u8, attack: i32) -> ResourceDelta {
    let (threshold, light, heavy, attack_loss) = match position {
        21..=29 => (50, 50, 100, 10),
        31..=39 => (120, 75, 150, 12),
        1..=9 => (200, 100, 200, 16),
        _ => (300, 120, 250, 20),
    };
    let damage = if attack >= threshold { light } else { heavy };
    ResourceDelta {
        health: -damage,
        attack: -attack_loss,
        ..ResourceDelta::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_scenario_chance_is_clamped() {
        let mut player = Player::new(0, "A", "#fff");
        assert_eq!(scenario_chance(&player, &SCENARIOS[0]), 0.0);
        player.set_attack(2000);
        player.set_influence(2000);
        assert_eq!(scenario_chance(&player, &SCENARIOS[0]), 100.0);
        player.set_attack(600);
        player.set_influence(600);
        assert_eq!(scenario_chance(&player, &SCENARIOS[0]), 50.0);
    }

    #[test]
    fn test_hopeless_scenario_always_fails() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut player = Player::new(0, "A", "#fff");
        assert!(!attempt_scenario(&mut player, &SCENARIOS[4], &mut rng));
        assert_eq!(player.health(), 1300);
        assert_eq!(player.attack(), 85);
    }

    #[test]
    fn test_zombie_zones() {
        assert_eq!(zombie_attack(22, 100), ResourceDelta { health: -50, attack: -10, ..Default::default() });
        assert_eq!(zombie_attack(22, 10).health, -100);
        assert_eq!(zombie_attack(38, 120).health, -75);
        assert_eq!(zombie_attack(8, 100), ResourceDelta { health: -200, attack: -16, ..Default::default() });
        assert_eq!(zombie_attack(15, 300).health, -120);
    }

    #[test]
    fn test_event_delta_clamps() {
        let mut player = Player::new(0, "A", "#fff");
        player.set_money(30);
        RANDOM_EVENTS[8].delta.apply_to(&mut player);
        assert_eq!(player.money(), 0);
    }
}
