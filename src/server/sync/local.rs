//! In-process fan-out: every participant lives in this process and
//! broadcasts are direct calls on each registered listener.

use std::sync::{Arc, Mutex, PoisonError};

use log::debug;

use crate::game::snapshot::Snapshot;
use crate::server::sync::{GameSync, Listeners, Origin, SyncEvent, SyncListener};

#[derive(Clone, Default)]
pub struct LocalSync {
    listeners: Arc<Listeners>,
    latest: Arc<Mutex<Option<Snapshot>>>,
}

impl LocalSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last snapshot broadcast through this hub.
    pub fn latest(&self) -> Option<Snapshot> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl GameSync for LocalSync {
    fn broadcast(&self, snapshot: &Snapshot) {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());
        debug!(
            "[LocalSync] broadcast version={} to {} listeners",
            snapshot.version,
            self.listeners.len()
        );
        self.listeners.emit(SyncEvent::Update {
            snapshot: snapshot.clone(),
            origin: Origin::InProcess,
        });
    }

    fn broadcast_player_joined(&self, name: &str) {
        self.listeners.emit(SyncEvent::PlayerJoined(name.to_string()));
    }

    fn broadcast_start_game(&self) {
        self.listeners.emit(SyncEvent::StartGame);
    }

    /// Subscribing hands the newcomer the current state right away.
    fn subscribe(&self, listener: Box<dyn SyncListener>) {
        if let Some(snapshot) = self.latest() {
            listener.on_event(SyncEvent::Update {
                snapshot,
                origin: Origin::InProcess,
            });
        }
        self.listeners.add(listener);
    }
}
