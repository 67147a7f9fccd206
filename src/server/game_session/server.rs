//! Game session actor.
//!
//! One `GameSession` owns one `GameState` and is its only writer. It drives
//! the turn scheduler, pushes snapshots through its `GameSync` backend after
//! every change, applies snapshots coming back from peers, and fans session
//! events out to observers. Several sessions can run side by side in one
//! process; nothing here is global.

use std::sync::Arc;
use std::time::Duration;

use actix::prelude::*;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use uuid::Uuid;

use crate::config::game::TurnTimings;
use crate::config::roster::DEFAULT_HUMAN_NAME;
use crate::error::{OfferError, SaveError, TurnError};
use crate::game::ai::{play_landing, process_ai_turn};
use crate::game::entities::Player;
use crate::game::persistence;
use crate::game::snapshot::Snapshot;
use crate::game::state::GameState;
use crate::game::systems::{accept_offer, apply_fallback, resolve_landing, Effect, Offer};
use crate::game::types::{RollOutcome, SessionRole};
use crate::server::game_session::lobby::Lobby;
use crate::server::game_session::messages::*;
use crate::server::game_session::turn::{TimerKind, TurnPhase, TurnScheduler, TurnStatus};
use crate::server::sync::{GameSync, Origin, SyncEvent};

/// How a session is wired: who it is, who it plays as, and how fast it runs.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub role: SessionRole,
    /// Name of the seat this process plays in co-op.
    pub local_player: Option<String>,
    pub timings: TurnTimings,
    /// Fixed dice seed, for reproducible games.
    pub seed: Option<u64>,
}

impl SessionConfig {
    pub fn standalone() -> Self {
        Self {
            role: SessionRole::Standalone,
            local_player: None,
            timings: TurnTimings::default(),
            seed: None,
        }
    }

    pub fn host(name: impl Into<String>) -> Self {
        Self {
            role: SessionRole::Host,
            local_player: Some(name.into()),
            ..Self::standalone()
        }
    }

    pub fn client(name: impl Into<String>) -> Self {
        Self {
            role: SessionRole::Client,
            local_player: Some(name.into()),
            ..Self::standalone()
        }
    }

    /// Passive client that follows another session without playing.
    pub fn observer() -> Self {
        Self {
            role: SessionRole::Client,
            ..Self::standalone()
        }
    }

    pub fn with_timings(mut self, timings: TurnTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

pub struct GameSession {
    pub id: Uuid,
    state: GameState,
    sync: Arc<dyn GameSync>,
    observers: Vec<Recipient<SessionEvent>>,
    rng: StdRng,
    timings: TurnTimings,
    local_player: Option<String>,
    scheduler: TurnScheduler,
    lobby: Option<Lobby>,
    /// A client takes the first snapshot it sees, whatever its version.
    synced: bool,
    /// Set between START_GAME and the roster snapshot that follows it.
    awaiting_roster: bool,
}

impl Actor for GameSession {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.sync.subscribe(Box::new(ctx.address().recipient::<SyncEvent>()));
        if self.state.role() != SessionRole::Client {
            // Seeds what late subscribers and newly connected clients receive.
            self.sync.broadcast(&self.state.create_snapshot());
        }
        info!(
            "[GameSession] session {} started as {:?} (players={})",
            self.id,
            self.state.role(),
            self.state.players().len()
        );
    }
}

impl GameSession {
    pub fn new(mut state: GameState, sync: Arc<dyn GameSync>, config: SessionConfig) -> Self {
        state.set_role(config.role);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let lobby = (config.role == SessionRole::Host).then(|| {
            Lobby::new(config.local_player.clone().unwrap_or_else(|| DEFAULT_HUMAN_NAME.to_string()))
        });
        Self {
            id: Uuid::new_v4(),
            state,
            sync,
            observers: Vec::new(),
            rng,
            timings: config.timings,
            local_player: config.local_player,
            scheduler: TurnScheduler::default(),
            lobby,
            synced: false,
            awaiting_roster: false,
        }
    }

    fn emit(&self, event: SessionEvent) {
        for observer in &self.observers {
            observer.do_send(event.clone());
        }
    }

    /// Marks a change, pushes the snapshot to peers and tells observers.
    pub fn send_state(&mut self) {
        self.state.bump_version();
        let snapshot = self.state.create_snapshot();
        debug!(
            "[GameSession] Broadcast state: session={} version={} turn={} current={}",
            self.id,
            snapshot.version,
            snapshot.turn,
            snapshot.current_index
        );
        self.sync.broadcast(&snapshot);
        self.emit(SessionEvent::StateChanged(snapshot));
    }

    fn local_name(&self) -> String {
        self.local_player.clone().unwrap_or_default()
    }

    /// Whether the current player is played from this process by a human.
    fn is_local_turn(&self) -> bool {
        let Ok(current) = self.state.current() else {
            return false;
        };
        if current.is_ai() && self.state.is_ai_mode() {
            return false;
        }
        match self.state.role() {
            SessionRole::Standalone => true,
            _ => self.local_player.as_deref() == Some(current.name()),
        }
    }

    fn drives_ai(&self) -> bool {
        self.state.role() != SessionRole::Client
            && self.state.is_ai_mode()
            && self.state.current().is_ok_and(Player::is_ai)
    }

    fn ensure_local_turn(&self) -> Result<(), TurnError> {
        if self.scheduler.phase() == &TurnPhase::Idle {
            return Err(TurnError::GameNotStarted);
        }
        let current = self.state.current()?;
        if self.is_local_turn() {
            Ok(())
        } else {
            Err(TurnError::NotYourTurn {
                expected: current.name().to_string(),
                local: self.local_name(),
            })
        }
    }

    fn arm_countdown(&mut self, serial: u64, ctx: &mut Context<Self>) {
        let handle = ctx.run_later(self.timings.turn, move |act, ctx| {
            act.scheduler.fired(TimerKind::Countdown);
            act.on_countdown(serial, ctx);
        });
        self.scheduler.arm(TimerKind::Countdown, handle, ctx);
    }

    fn arm_inactivity(&mut self, serial: u64, ctx: &mut Context<Self>) {
        let handle = ctx.run_later(self.timings.inactivity, move |act, ctx| {
            act.scheduler.fired(TimerKind::Inactivity);
            if matches!(act.scheduler.phase(), TurnPhase::Resolving(_)) {
                debug!("[TurnScheduler] inactivity timer fired (serial={})", serial);
                act.advance(serial, ctx);
            }
        });
        self.scheduler.arm(TimerKind::Inactivity, handle, ctx);
    }

    fn arm_ai(&mut self, delay: Duration, serial: u64, ctx: &mut Context<Self>, step: fn(&mut Self, u64, &mut Context<Self>)) {
        let handle = ctx.run_later(delay, move |act, ctx| {
            act.scheduler.fired(TimerKind::Ai);
            step(act, serial, ctx);
        });
        self.scheduler.arm(TimerKind::Ai, handle, ctx);
    }

    fn on_countdown(&mut self, serial: u64, ctx: &mut Context<Self>) {
        if !self.scheduler.is_current(serial) {
            debug!("[TurnScheduler] stale countdown ignored (serial={})", serial);
            return;
        }
        match self.scheduler.phase() {
            TurnPhase::AwaitingRoll | TurnPhase::Resolving(_) | TurnPhase::Watching => {
                info!("[TurnScheduler] countdown expired, forcing end of turn (serial={})", serial);
                self.advance(serial, ctx);
            }
            _ => debug!("[TurnScheduler] countdown fired in {:?}, ignored", self.scheduler.phase().kind()),
        }
    }

    /// Releases quarantined players at the head of the order; each loses this turn.
    fn skip_quarantined(&mut self) {
        for _ in 0..self.state.players().len() {
            let Ok(current) = self.state.current_mut() else {
                return;
            };
            if !current.in_quarantine() {
                return;
            }
            current.release_from_quarantine();
            let (player, name) = (current.id(), current.name().to_string());
            info!("[TurnScheduler] {} sits out a turn in quarantine", name);
            self.emit(SessionEvent::TurnSkipped { player, name });
            if self.state.end_turn().is_err() {
                return;
            }
        }
    }

    /// Opens the turn of the current player. Used by whoever drives the advance.
    fn start_turn(&mut self, ctx: &mut Context<Self>, apply_bonuses: bool) {
        let serial = self.scheduler.next_serial(ctx);
        if self.state.players().is_empty() {
            self.scheduler.set_phase(TurnPhase::Idle);
            self.send_state();
            return;
        }
        self.skip_quarantined();
        if apply_bonuses {
            let summary = self.state.apply_start_of_turn_bonuses();
            if let (false, Ok(current)) = (summary.is_empty(), self.state.current()) {
                self.emit(SessionEvent::BonusesApplied {
                    player: current.id(),
                    summary,
                });
            }
        }
        self.announce_turn(serial, ctx);

        if self.drives_ai() {
            self.scheduler.set_phase(TurnPhase::AiThinking);
            if let Ok(id) = self.state.current().map(Player::id) {
                let actions = process_ai_turn(&mut self.state, id);
                if !actions.is_empty() {
                    self.emit(SessionEvent::AiActions { player: id, actions });
                }
            }
            self.arm_ai(self.timings.ai_roll_delay, serial, ctx, Self::on_ai_roll);
        }
        self.send_state();
    }

    /// Tells observers whose turn it is and arms the timers this side owns.
    fn announce_turn(&mut self, serial: u64, ctx: &mut Context<Self>) {
        let Ok(current) = self.state.current() else {
            self.scheduler.set_phase(TurnPhase::Idle);
            return;
        };
        let (player, name) = (current.id(), current.name().to_string());
        let local = self.is_local_turn();
        info!(
            "[TurnScheduler] turn {} (serial {}): {}{}",
            self.state.turn(),
            serial,
            name,
            if local { " (local)" } else { "" }
        );
        self.emit(SessionEvent::TurnStarted {
            player,
            name,
            turn: self.state.turn(),
            local,
        });

        if local {
            self.scheduler.set_phase(TurnPhase::AwaitingRoll);
            self.arm_countdown(serial, ctx);
        } else {
            self.scheduler.set_phase(TurnPhase::Watching);
            // The host times out remote players too.
            if self.state.is_host() {
                self.arm_countdown(serial, ctx);
            }
        }
    }

    /// Another participant moved the turn on; follow without re-applying anything.
    fn follow_turn(&mut self, ctx: &mut Context<Self>) {
        let serial = self.scheduler.next_serial(ctx);
        self.announce_turn(serial, ctx);
    }

    /// Single-flight turn advance. Only the first caller for `serial` gets through.
    fn advance(&mut self, serial: u64, ctx: &mut Context<Self>) {
        if !self.scheduler.is_current(serial) {
            debug!("[TurnScheduler] stale advance ignored (serial={})", serial);
            return;
        }
        match self.scheduler.take_phase() {
            TurnPhase::Idle => {
                self.scheduler.set_phase(TurnPhase::Idle);
                return;
            }
            TurnPhase::Advancing => return,
            TurnPhase::Resolving(landing) => {
                if let Some(fallback) = landing.fallback {
                    let effects = apply_fallback(&mut self.state, landing.player, fallback);
                    if !effects.is_empty() {
                        self.emit(SessionEvent::EffectsApplied {
                            player: landing.player,
                            effects,
                        });
                    }
                }
            }
            _ => {}
        }
        if let Err(e) = self.state.end_turn() {
            warn!("[TurnScheduler] cannot end turn: {}", e);
            self.scheduler.set_phase(TurnPhase::Idle);
            return;
        }
        self.start_turn(ctx, true);
    }

    fn on_ai_roll(&mut self, serial: u64, ctx: &mut Context<Self>) {
        if !self.scheduler.is_current(serial) || self.scheduler.phase() != &TurnPhase::AiThinking {
            debug!("[AI] stale roll ignored (serial={})", serial);
            return;
        }
        let outcome = match self.state.roll(&mut self.rng) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("[AI] roll failed: {}", e);
                return;
            }
        };
        self.emit(SessionEvent::Rolled(outcome));
        let mut landing = resolve_landing(&mut self.state, outcome.player, &mut self.rng);
        let effects = play_landing(&mut self.state, outcome.player, &landing, &mut self.rng);
        landing.effects.extend(effects);
        landing.offers.clear();
        landing.fallback = None;
        info!(
            "[AI] {} rolled {} and landed on {}",
            outcome.player, outcome.total, landing.name
        );
        self.emit(SessionEvent::Landed(landing));
        self.send_state();
        self.arm_ai(self.timings.ai_advance_delay, serial, ctx, Self::advance);
    }

    fn roll(&mut self, ctx: &mut Context<Self>) -> Result<RollOutcome, TurnError> {
        self.ensure_local_turn()?;
        match self.scheduler.phase() {
            TurnPhase::AwaitingRoll => {}
            TurnPhase::Idle => return Err(TurnError::GameNotStarted),
            _ => return Err(TurnError::AlreadyRolled),
        }
        let outcome = self.state.roll(&mut self.rng)?;
        self.emit(SessionEvent::Rolled(outcome));
        let landing = resolve_landing(&mut self.state, outcome.player, &mut self.rng);
        self.emit(SessionEvent::Landed(landing.clone()));
        self.scheduler.set_phase(TurnPhase::Resolving(landing));
        if !self.state.is_ai_mode() {
            self.arm_inactivity(self.scheduler.serial(), ctx);
        }
        self.send_state();
        Ok(outcome)
    }

    fn accept(&mut self, index: usize) -> Result<Vec<Effect>, TurnError> {
        self.ensure_local_turn()?;
        let TurnPhase::Resolving(landing) = self.scheduler.phase_mut() else {
            return Err(TurnError::NoResolutionPending);
        };
        let offer = landing.offers.get(index).cloned().ok_or(TurnError::UnknownOffer(index))?;
        let player = landing.player;
        match accept_offer(&mut self.state, player, &offer, &mut self.rng) {
            Ok(effects) => {
                if matches!(offer, Offer::Attack { .. }) {
                    landing.offers.retain(|o| !matches!(o, Offer::Attack { .. }));
                } else if !offer.is_repeatable() {
                    landing.offers.remove(index);
                }
                if offer.settles_fallback() {
                    landing.fallback = None;
                }
                self.emit(SessionEvent::EffectsApplied {
                    player,
                    effects: effects.clone(),
                });
                self.send_state();
                Ok(effects)
            }
            Err(e) => {
                // A failed claim still costs health.
                if matches!(e, OfferError::InsufficientAttack { .. }) {
                    self.send_state();
                }
                Err(e.into())
            }
        }
    }

    /// Passes the turn on once the landing is being resolved. The turn never
    /// leaves the roll phase without a roll; only the countdown skips it.
    fn finish_turn(&mut self, ctx: &mut Context<Self>) -> Result<(), TurnError> {
        self.ensure_local_turn()?;
        match self.scheduler.phase() {
            TurnPhase::Resolving(_) => {}
            TurnPhase::AwaitingRoll => return Err(TurnError::NotRolled),
            _ => return Err(TurnError::NoResolutionPending),
        }
        self.advance(self.scheduler.serial(), ctx);
        Ok(())
    }

    fn stop(&mut self, ctx: &mut Context<Self>) {
        self.scheduler.next_serial(ctx);
        self.scheduler.set_phase(TurnPhase::Idle);
        self.awaiting_roster = false;
    }

    fn begin_game(&mut self, ctx: &mut Context<Self>) {
        self.emit(SessionEvent::GameStarted);
        self.start_turn(ctx, false);
    }

    fn on_remote_snapshot(&mut self, snapshot: Snapshot, origin: Origin, ctx: &mut Context<Self>) {
        let local_version = self.state.version();
        let accept = match (self.state.role(), origin) {
            (SessionRole::Client, _) if !self.synced => true,
            // The host wins ties.
            (SessionRole::Client, Origin::Host) => snapshot.version >= local_version,
            _ => snapshot.version > local_version,
        };
        if !accept {
            debug!(
                "[GameSession] stale snapshot ignored: version {} <= {}",
                snapshot.version, local_version
            );
            return;
        }
        self.synced = true;
        let previous_turn = self.state.turn();
        self.state.apply_snapshot(snapshot);

        if self.state.is_host() && matches!(origin, Origin::Peer(_)) {
            self.sync.broadcast(&self.state.create_snapshot());
        }
        self.emit(SessionEvent::StateChanged(self.state.create_snapshot()));

        let running = self.scheduler.phase() != &TurnPhase::Idle;
        if running && (self.awaiting_roster || self.state.turn() != previous_turn) {
            self.awaiting_roster = false;
            self.follow_turn(ctx);
        }
    }

    fn on_player_joined(&mut self, name: String, ctx: &mut Context<Self>) {
        self.emit(SessionEvent::PlayerJoined(name.clone()));
        let Some(roster) = self.lobby.as_mut().and_then(|lobby| lobby.join(&name)) else {
            return;
        };
        self.sync.broadcast_start_game();
        self.state.reset_players_for_coop_mode(&roster);
        self.begin_game(ctx);
    }
}

impl Handler<Subscribe> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: Subscribe, _: &mut Context<Self>) -> Self::Result {
        msg.0.do_send(SessionEvent::StateChanged(self.state.create_snapshot()));
        self.observers.push(msg.0);
    }
}

impl Handler<RollDice> for GameSession {
    type Result = Result<RollOutcome, TurnError>;

    fn handle(&mut self, _: RollDice, ctx: &mut Context<Self>) -> Self::Result {
        self.roll(ctx)
    }
}

impl Handler<AcceptOffer> for GameSession {
    type Result = Result<Vec<Effect>, TurnError>;

    fn handle(&mut self, msg: AcceptOffer, _: &mut Context<Self>) -> Self::Result {
        self.accept(msg.index)
    }
}

impl Handler<TileResolutionComplete> for GameSession {
    type Result = Result<(), TurnError>;

    fn handle(&mut self, _: TileResolutionComplete, ctx: &mut Context<Self>) -> Self::Result {
        self.finish_turn(ctx)
    }
}

impl Handler<EndTurn> for GameSession {
    type Result = Result<(), TurnError>;

    fn handle(&mut self, _: EndTurn, ctx: &mut Context<Self>) -> Self::Result {
        self.finish_turn(ctx)
    }
}

impl Handler<NotifyChanged> for GameSession {
    type Result = ();

    fn handle(&mut self, _: NotifyChanged, _: &mut Context<Self>) -> Self::Result {
        self.send_state();
    }
}

impl Handler<GetSnapshot> for GameSession {
    type Result = MessageResult<GetSnapshot>;

    fn handle(&mut self, _: GetSnapshot, _: &mut Context<Self>) -> Self::Result {
        MessageResult(self.state.create_snapshot())
    }
}

impl Handler<GetCurrentPlayer> for GameSession {
    type Result = Result<Player, TurnError>;

    fn handle(&mut self, _: GetCurrentPlayer, _: &mut Context<Self>) -> Self::Result {
        self.state.current().cloned()
    }
}

impl Handler<GetTurnStatus> for GameSession {
    type Result = MessageResult<GetTurnStatus>;

    fn handle(&mut self, _: GetTurnStatus, _: &mut Context<Self>) -> Self::Result {
        let pending_offers = match self.scheduler.phase() {
            TurnPhase::Resolving(landing) => landing.offers.len(),
            _ => 0,
        };
        MessageResult(TurnStatus {
            phase: self.scheduler.phase().kind(),
            serial: self.scheduler.serial(),
            turn: self.state.turn(),
            current: self.state.current().ok().map(|p| p.name().to_string()),
            local: self.is_local_turn(),
            pending_offers,
        })
    }
}

impl Handler<ResetPlayers> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: ResetPlayers, ctx: &mut Context<Self>) -> Self::Result {
        self.stop(ctx);
        self.state.reset_players(&msg.names);
        self.send_state();
    }
}

impl Handler<ResetForAiMode> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: ResetForAiMode, ctx: &mut Context<Self>) -> Self::Result {
        self.stop(ctx);
        self.state.reset_players_for_ai_mode(&msg.human_name, msg.count);
        self.send_state();
    }
}

impl Handler<ResetForCoop> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: ResetForCoop, ctx: &mut Context<Self>) -> Self::Result {
        self.stop(ctx);
        self.state.reset_players_for_coop_mode(&msg.names);
        self.send_state();
    }
}

impl Handler<StartGame> for GameSession {
    type Result = Result<(), TurnError>;

    fn handle(&mut self, _: StartGame, ctx: &mut Context<Self>) -> Self::Result {
        if self.state.role() == SessionRole::Client {
            return Err(TurnError::HostOnly);
        }
        if self.state.players().is_empty() {
            return Err(TurnError::NoPlayers);
        }
        if let Some(lobby) = self.lobby.as_mut() {
            lobby.force_start();
            self.sync.broadcast_start_game();
        }
        self.begin_game(ctx);
        Ok(())
    }
}

impl Handler<AnnounceJoin> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: AnnounceJoin, _: &mut Context<Self>) -> Self::Result {
        let name = msg.name.trim().to_string();
        info!("[GameSession] announcing {} to the host", name);
        self.sync.broadcast_player_joined(&name);
        self.local_player = Some(name);
    }
}

impl Handler<SaveGame> for GameSession {
    type Result = Result<(), SaveError>;

    fn handle(&mut self, msg: SaveGame, _: &mut Context<Self>) -> Self::Result {
        persistence::save_to(&self.state, &msg.path)
    }
}

impl Handler<LoadGame> for GameSession {
    type Result = Result<(), SaveError>;

    fn handle(&mut self, msg: LoadGame, ctx: &mut Context<Self>) -> Self::Result {
        persistence::load_from(&mut self.state, &msg.path)?;
        // The loaded current player starts a fresh turn.
        self.start_turn(ctx, false);
        Ok(())
    }
}

impl Handler<ReturnToLobby> for GameSession {
    type Result = ();

    fn handle(&mut self, _: ReturnToLobby, ctx: &mut Context<Self>) -> Self::Result {
        info!("[GameSession] session {} back to the lobby", self.id);
        self.stop(ctx);
        self.state.clear();
        if let Some(lobby) = self.lobby.as_mut() {
            lobby.reset();
        }
        self.send_state();
    }
}

impl Handler<SyncEvent> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: SyncEvent, ctx: &mut Context<Self>) -> Self::Result {
        match msg {
            SyncEvent::Update { snapshot, origin } => self.on_remote_snapshot(snapshot, origin, ctx),
            SyncEvent::PlayerJoined(name) => self.on_player_joined(name, ctx),
            SyncEvent::StartGame => {
                if self.state.role() != SessionRole::Client {
                    debug!("[GameSession] START_GAME from a peer ignored");
                    return;
                }
                info!("[GameSession] host started the game");
                if self.scheduler.phase() == &TurnPhase::Idle {
                    self.scheduler.set_phase(TurnPhase::Watching);
                }
                self.state.set_coop_mode(true);
                self.awaiting_roster = true;
                self.emit(SessionEvent::GameStarted);
            }
            SyncEvent::ConnectionLost => {
                warn!("[GameSession] connection to the host lost");
                self.stop(ctx);
                self.emit(SessionEvent::ConnectionLost);
            }
        }
    }
}
