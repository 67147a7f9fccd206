//! Authoritative turn state.
//!
//! One `GameState` exists per running session. It owns the roster (in turn
//! order) and the tile registry; the session actor is the only writer.
//! Mutating operations do not broadcast on their own: the owner bumps the
//! version and pushes a snapshot after every change it wants peers to see.

use rand::Rng;

use crate::config::game::{LAB_CURE_COST, LAB_CURE_PASSES, MAX_PLAYERS, MIN_PLAYERS, START_POSITION};
use crate::config::roster::{DEFAULT_HUMAN_NAME, DEFAULT_NAMES, PLAYER_COLORS};
use crate::error::{OfferError, TurnError};
use crate::game::board::TileRegistry;
use crate::game::entities::{HistoryKind, Player};
use crate::game::snapshot::Snapshot;
use crate::game::systems::{apply_start_of_turn_bonuses, move_player, roll_dice};
use crate::game::types::{BonusSummary, PlayerId, RollOutcome, SessionRole, Strategy};

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    players: Vec<Player>,
    current_index: usize,
    last_roll: u8,
    dice1: u8,
    dice2: u8,
    tiles: TileRegistry,
    turn: u32,
    version: u64,
    ai_mode: bool,
    coop_mode: bool,
    role: SessionRole,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// State holding the default four-player roster.
    pub fn new() -> Self {
        let mut state = Self::empty();
        state.reset_players(&DEFAULT_NAMES.map(String::from));
        state
    }

    /// State with no players, as after returning to the menu.
    pub fn empty() -> Self {
        Self {
            players: Vec::new(),
            current_index: 0,
            last_roll: 0,
            dice1: 0,
            dice2: 0,
            tiles: TileRegistry::new(),
            turn: 1,
            version: 0,
            ai_mode: false,
            coop_mode: false,
            role: SessionRole::Standalone,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id() == id)
    }

    /// Two distinct players borrowed mutably at once.
    pub fn pair_mut(&mut self, a: PlayerId, b: PlayerId) -> Option<(&mut Player, &mut Player)> {
        let ia = self.players.iter().position(|p| p.id() == a)?;
        let ib = self.players.iter().position(|p| p.id() == b)?;
        if ia == ib {
            return None;
        }
        if ia < ib {
            let (left, right) = self.players.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.players.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }

    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name() == name)
    }

    /// Player whose turn it is.
    pub fn current(&self) -> Result<&Player, TurnError> {
        self.players.get(self.current_index).ok_or(TurnError::NoPlayers)
    }

    pub fn current_mut(&mut self) -> Result<&mut Player, TurnError> {
        self.players.get_mut(self.current_index).ok_or(TurnError::NoPlayers)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn last_roll(&self) -> u8 {
        self.last_roll
    }

    pub fn dice(&self) -> (u8, u8) {
        (self.dice1, self.dice2)
    }

    pub fn tiles(&self) -> &TileRegistry {
        &self.tiles
    }

    pub fn tiles_mut(&mut self) -> &mut TileRegistry {
        &mut self.tiles
    }

    /// Turn counter, incremented on every end of turn.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Monotonic snapshot version.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Marks a local change that peers have not seen yet.
    pub fn bump_version(&mut self) -> u64 {
        self.version += 1;
        self.version
    }

    pub fn is_ai_mode(&self) -> bool {
        self.ai_mode
    }

    pub fn is_coop_mode(&self) -> bool {
        self.coop_mode
    }

    pub fn role(&self) -> SessionRole {
        self.role
    }

    pub fn is_host(&self) -> bool {
        self.role == SessionRole::Host
    }

    pub fn set_role(&mut self, role: SessionRole) {
        self.role = role;
    }

    pub fn set_ai_mode(&mut self, ai: bool) {
        self.ai_mode = ai;
    }

    pub fn set_coop_mode(&mut self, coop: bool) {
        self.coop_mode = coop;
    }

    /// Rolls two dice for the current player and moves them.
    pub fn roll(&mut self, rng: &mut impl Rng) -> Result<RollOutcome, TurnError> {
        let idx = self.current_index;
        if idx >= self.players.len() {
            return Err(TurnError::NoPlayers);
        }
        let (dice1, dice2) = roll_dice(rng);
        let total = dice1 + dice2;
        let player = &mut self.players[idx];
        let from = player.position();
        let to = move_player(player, total);
        self.dice1 = dice1;
        self.dice2 = dice2;
        self.last_roll = total;
        Ok(RollOutcome {
            player: player.id(),
            dice1,
            dice2,
            total,
            from,
            to,
        })
    }

    /// Passes the turn to the next player in order.
    pub fn end_turn(&mut self) -> Result<(), TurnError> {
        if self.players.is_empty() {
            return Err(TurnError::NoPlayers);
        }
        let prev = self.current_index;
        self.current_index = (self.current_index + 1) % self.players.len();
        self.turn += 1;

        let finished = &mut self.players[prev];
        if finished.position() == START_POSITION {
            finished.tick_lab_pass();
        }
        Ok(())
    }

    /// Pays out tile income and zone-set bonuses to the current player.
    pub fn apply_start_of_turn_bonuses(&mut self) -> BonusSummary {
        let idx = self.current_index;
        let Some(player) = self.players.get_mut(idx) else {
            return BonusSummary::default();
        };
        apply_start_of_turn_bonuses(&self.tiles, player)
    }

    /// Spends the lab cure cost and starts counting passes over Start.
    pub fn fund_lab_cure(&mut self, id: PlayerId) -> Result<(), OfferError> {
        let Some(player) = self.player_mut(id) else {
            return Ok(());
        };
        player.spend_money(LAB_CURE_COST, "Funded lab cure")?;
        player.fund_lab_cure(LAB_CURE_PASSES);
        player.record(HistoryKind::Other, "Lab cure research started", LAB_CURE_COST);
        Ok(())
    }

    /// Replaces the roster with human players named `names` (2 to 4 seats).
    pub fn reset_players(&mut self, names: &[String]) {
        let count = names.len().clamp(MIN_PLAYERS, MAX_PLAYERS);
        let mut taken: Vec<String> = Vec::with_capacity(count);
        let mut players = Vec::with_capacity(count);
        for i in 0..count {
            let raw = names.get(i).map(|n| n.trim()).unwrap_or("");
            let name = unique_name(&taken, if raw.is_empty() { default_name(i) } else { raw.to_string() });
            taken.push(name.clone());
            players.push(Player::new(i as PlayerId, name, color_for(i)));
        }
        self.install_roster(players);
        self.ai_mode = false;
        self.coop_mode = false;
    }

    /// One human in seat 0 and computer opponents in the other seats.
    pub fn reset_players_for_ai_mode(&mut self, human_name: &str, count: usize) {
        let count = count.clamp(MIN_PLAYERS, MAX_PLAYERS);
        let human = match human_name.trim() {
            "" => DEFAULT_HUMAN_NAME.to_string(),
            name => name.to_string(),
        };
        let mut taken = vec![human.clone()];
        let mut players = vec![Player::new(0, human, color_for(0))];
        for i in 1..count {
            let strategy = Strategy::ROTATION[(i - 1) % Strategy::ROTATION.len()];
            let name = unique_name(&taken, format!("AI {strategy}"));
            taken.push(name.clone());
            players.push(Player::new_ai(i as PlayerId, name, color_for(i), strategy));
        }
        self.install_roster(players);
        self.ai_mode = true;
        self.coop_mode = false;
    }

    /// Roster for a networked session; every seat is a human on some machine.
    pub fn reset_players_for_coop_mode(&mut self, names: &[String]) {
        self.reset_players(names);
        self.coop_mode = true;
    }

    /// Tears the game down. The state holds no players afterwards.
    pub fn clear(&mut self) {
        self.players.clear();
        self.tiles.clear();
        self.current_index = 0;
        self.last_roll = 0;
        self.dice1 = 0;
        self.dice2 = 0;
        self.turn = 1;
        self.ai_mode = false;
        self.coop_mode = false;
        self.version += 1;
    }

    fn install_roster(&mut self, players: Vec<Player>) {
        self.tiles.clear();
        self.players = players;
        self.current_index = 0;
        self.last_roll = 0;
        self.dice1 = 0;
        self.dice2 = 0;
        self.turn = 1;
        self.version += 1;
    }

    /// Complete, self-contained copy of the shared state.
    pub fn create_snapshot(&self) -> Snapshot {
        Snapshot {
            players: self.players.clone(),
            current_index: self.current_index,
            last_roll: self.last_roll,
            dice1: self.dice1,
            dice2: self.dice2,
            tiles: self.tiles.to_map(),
            turn: self.turn,
            version: self.version,
        }
    }

    /// Overwrites the shared state with `snapshot`. Mode flags and role stay local.
    ///
    /// Owners that match no imported player lose the tile.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        let Snapshot {
            mut players,
            current_index,
            last_roll,
            dice1,
            dice2,
            mut tiles,
            turn,
            version,
        } = snapshot;

        for player in players.iter_mut() {
            player.normalize();
        }
        dedupe_ids(&mut players);

        for (position, tile) in tiles.iter_mut() {
            tile.normalize(*position);
            if let Some(owner) = tile.owner() {
                if !players.iter().any(|p| p.id() == owner) {
                    tile.release();
                }
            }
        }

        self.current_index = if players.is_empty() {
            0
        } else {
            current_index.min(players.len() - 1)
        };
        self.players = players;
        self.last_roll = last_roll;
        self.dice1 = dice1;
        self.dice2 = dice2;
        self.tiles = TileRegistry::from_map(tiles);
        self.turn = turn;
        self.version = version;
    }
}

/// Two decoded players must never share an id; later duplicates get fresh ones.
fn dedupe_ids(players: &mut [Player]) {
    let mut seen: Vec<PlayerId> = Vec::with_capacity(players.len());
    for i in 0..players.len() {
        let id = players[i].id();
        if seen.contains(&id) {
            let fresh = (0..=PlayerId::MAX)
                .find(|c| !seen.contains(c) && !players.iter().any(|p| p.id() == *c))
                .unwrap_or(id);
            players[i].set_id(fresh);
            seen.push(fresh);
        } else {
            seen.push(id);
        }
    }
}

fn default_name(index: usize) -> String {
    format!("Player{}", index + 1)
}

fn color_for(index: usize) -> &'static str {
    PLAYER_COLORS[index % PLAYER_COLORS.len()]
}

/// `name`, or `name 2`, `name 3`, ... if already taken.
fn unique_name(taken: &[String], name: String) -> String {
    if !taken.contains(&name) {
        return name;
    }
    (2..)
        .map(|n| format!("{name} {n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(name)
}
