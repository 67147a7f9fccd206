//! State synchronization transports.
//!
//! A session pushes full snapshots and lobby tokens through a `GameSync`
//! backend and receives whatever peers send as `SyncEvent`s. Backends never
//! touch game state: they hand decoded events to their listeners, and the
//! session actor applies them on its own thread.

pub mod client;
pub mod host;
pub mod local;
pub mod room;
pub mod wire;

use std::sync::{Mutex, MutexGuard, PoisonError};

use actix::prelude::*;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use crate::game::snapshot::Snapshot;

pub use client::ClientSync;
pub use host::HostSync;
pub use local::LocalSync;

/// Where an inbound snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Another participant in the same process.
    InProcess,
    /// The host, as seen by a client.
    Host,
    /// A client connection, as seen by the host.
    Peer(Uuid),
}

#[derive(Message, Debug, Clone, PartialEq)]
#[rtype(result = "()")]
pub enum SyncEvent {
    Update { snapshot: Snapshot, origin: Origin },
    PlayerJoined(String),
    StartGame,
    ConnectionLost,
}

/// Receives transport events. Implementations must not block.
pub trait SyncListener: Send + Sync {
    fn on_event(&self, event: SyncEvent);
}

impl SyncListener for Recipient<SyncEvent> {
    fn on_event(&self, event: SyncEvent) {
        self.do_send(event);
    }
}

impl SyncListener for UnboundedSender<SyncEvent> {
    fn on_event(&self, event: SyncEvent) {
        let _ = self.send(event);
    }
}

/// Broadcast/subscribe contract shared by every backend.
pub trait GameSync: Send + Sync {
    /// Pushes a full snapshot to every peer.
    fn broadcast(&self, snapshot: &Snapshot);

    fn broadcast_player_joined(&self, name: &str);

    fn broadcast_start_game(&self);

    fn subscribe(&self, listener: Box<dyn SyncListener>);
}

/// Listener registry with a backlog for events that arrive before anyone subscribed.
#[derive(Default)]
pub(crate) struct Listeners {
    inner: Mutex<ListenersInner>,
}

#[derive(Default)]
struct ListenersInner {
    listeners: Vec<Box<dyn SyncListener>>,
    backlog: Vec<SyncEvent>,
}

impl Listeners {
    fn lock(&self) -> MutexGuard<'_, ListenersInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn emit(&self, event: SyncEvent) {
        let mut inner = self.lock();
        if inner.listeners.is_empty() {
            inner.backlog.push(event);
            return;
        }
        for listener in &inner.listeners {
            listener.on_event(event.clone());
        }
    }

    /// Registers `listener` and hands it the backlog.
    pub(crate) fn add(&self, listener: Box<dyn SyncListener>) {
        let mut inner = self.lock();
        for event in inner.backlog.drain(..) {
            listener.on_event(event);
        }
        inner.listeners.push(listener);
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().listeners.len()
    }
}
