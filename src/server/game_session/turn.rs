//! Turn scheduler state: the phase of the running turn, its serial, and the
//! timers armed for it.
//!
//! Every turn gets a fresh serial. Timers capture the serial they were armed
//! with, and the session ignores any firing whose serial is no longer current,
//! so a timer that loses a race against a manual action is a no-op even if
//! its cancellation came too late.

use actix::prelude::*;
use serde::Serialize;

use crate::game::systems::Landing;
use crate::server::game_session::server::GameSession;

#[derive(Debug, Clone, PartialEq)]
pub enum TurnPhase {
    /// No game running.
    Idle,
    /// A remote participant owns the turn; we follow their snapshots.
    Watching,
    /// Waiting for the current human to roll.
    AwaitingRoll,
    /// A computer player's roll is scheduled.
    AiThinking,
    /// The human landed; offers stay open until resolution completes.
    Resolving(Landing),
    /// The turn is passing to the next player.
    Advancing,
}

/// Phase without its payload, for status queries and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PhaseKind {
    Idle,
    Watching,
    AwaitingRoll,
    AiThinking,
    Resolving,
    Advancing,
}

impl TurnPhase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            TurnPhase::Idle => PhaseKind::Idle,
            TurnPhase::Watching => PhaseKind::Watching,
            TurnPhase::AwaitingRoll => PhaseKind::AwaitingRoll,
            TurnPhase::AiThinking => PhaseKind::AiThinking,
            TurnPhase::Resolving(_) => PhaseKind::Resolving,
            TurnPhase::Advancing => PhaseKind::Advancing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnStatus {
    pub phase: PhaseKind,
    pub serial: u64,
    pub turn: u32,
    pub current: Option<String>,
    pub local: bool,
    pub pending_offers: usize,
}

/// The timers a turn can have armed at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Countdown,
    Inactivity,
    Ai,
}

pub struct TurnScheduler {
    phase: TurnPhase,
    serial: u64,
    countdown: Option<SpawnHandle>,
    inactivity: Option<SpawnHandle>,
    ai_timer: Option<SpawnHandle>,
}

impl Default for TurnScheduler {
    fn default() -> Self {
        Self {
            phase: TurnPhase::Idle,
            serial: 0,
            countdown: None,
            inactivity: None,
            ai_timer: None,
        }
    }
}

impl TurnScheduler {
    pub fn phase(&self) -> &TurnPhase {
        &self.phase
    }

    pub fn phase_mut(&mut self) -> &mut TurnPhase {
        &mut self.phase
    }

    pub fn set_phase(&mut self, phase: TurnPhase) {
        self.phase = phase;
    }

    /// Takes the phase out, leaving `Advancing` in its place.
    pub fn take_phase(&mut self) -> TurnPhase {
        std::mem::replace(&mut self.phase, TurnPhase::Advancing)
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn is_current(&self, serial: u64) -> bool {
        self.serial == serial
    }

    /// Opens a new turn: bumps the serial and cancels everything armed for the old one.
    pub fn next_serial(&mut self, ctx: &mut Context<GameSession>) -> u64 {
        self.cancel_all(ctx);
        self.serial += 1;
        self.serial
    }

    pub fn arm(&mut self, kind: TimerKind, handle: SpawnHandle, ctx: &mut Context<GameSession>) {
        let slot = self.slot(kind);
        if let Some(old) = slot.replace(handle) {
            ctx.cancel_future(old);
        }
    }

    pub fn cancel(&mut self, kind: TimerKind, ctx: &mut Context<GameSession>) {
        if let Some(handle) = self.slot(kind).take() {
            ctx.cancel_future(handle);
        }
    }

    pub fn cancel_all(&mut self, ctx: &mut Context<GameSession>) {
        for kind in [TimerKind::Countdown, TimerKind::Inactivity, TimerKind::Ai] {
            self.cancel(kind, ctx);
        }
    }

    /// Forgets a timer that just fired.
    pub fn fired(&mut self, kind: TimerKind) {
        self.slot(kind).take();
    }

    fn slot(&mut self, kind: TimerKind) -> &mut Option<SpawnHandle> {
        match kind {
            TimerKind::Countdown => &mut self.countdown,
            TimerKind::Inactivity => &mut self.inactivity,
            TimerKind::Ai => &mut self.ai_timer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::TileKind;

    #[test]
    fn test_phase_kinds() {
        let landing = Landing {
            player: 0,
            position: 0,
            kind: TileKind::Free,
            name: "Free Parking".into(),
            effects: Vec::new(),
            offers: Vec::new(),
            fallback: None,
        };
        assert_eq!(TurnPhase::Resolving(landing).kind(), PhaseKind::Resolving);
        assert_eq!(TurnPhase::AiThinking.kind(), PhaseKind::AiThinking);
    }

    #[test]
    fn test_take_phase_leaves_advancing() {
        let mut scheduler = TurnScheduler::default();
        scheduler.set_phase(TurnPhase::AwaitingRoll);
        assert_eq!(scheduler.take_phase(), TurnPhase::AwaitingRoll);
        assert_eq!(scheduler.phase(), &TurnPhase::Advancing);
        assert!(scheduler.is_current(0));
    }
}
