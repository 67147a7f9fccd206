//! Host side of the network transport.
//!
//! The host listens on the room port and serves every client over its own
//! line channel. Each connection gets a writer task fed through an unbounded
//! queue and a reader task that decodes lines and hands them to listeners.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashmap::DashMap;
use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;
use uuid::Uuid;

use crate::config::network::BIND_ADDRESS;
use crate::error::SyncError;
use crate::game::snapshot::Snapshot;
use crate::server::sync::wire::WireMessage;
use crate::server::sync::{GameSync, Listeners, Origin, SyncEvent, SyncListener};

struct HostInner {
    clients: DashMap<Uuid, mpsc::UnboundedSender<String>>,
    listeners: Listeners,
    latest: Mutex<Option<Snapshot>>,
}

impl HostInner {
    /// Guards the cached snapshot. Registering a client and broadcasting both
    /// happen under it, so a newcomer never misses a snapshot newer than the
    /// one it was handed.
    fn lock_latest(&self) -> MutexGuard<'_, Option<Snapshot>> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues `line` for every client, dropping the ones whose writer is gone.
    fn send_all(&self, line: &str) {
        let dead: Vec<Uuid> = self
            .clients
            .iter()
            .filter(|entry| entry.value().send(line.to_string()).is_err())
            .map(|entry| *entry.key())
            .collect();
        for id in dead {
            self.clients.remove(&id);
        }
    }

    fn dispatch(&self, line: &str, from: Uuid) {
        let Some(message) = WireMessage::parse(line) else {
            return;
        };
        let event = match message {
            WireMessage::PlayerJoined(name) => {
                info!("[HostSync] player joined: {}", name);
                SyncEvent::PlayerJoined(name)
            }
            WireMessage::StartGame => SyncEvent::StartGame,
            WireMessage::Snapshot(snapshot) => SyncEvent::Update {
                snapshot,
                origin: Origin::Peer(from),
            },
        };
        self.listeners.emit(event);
    }
}

/// Cheap handle; clones share the listener and its connections.
#[derive(Clone)]
pub struct HostSync {
    inner: Arc<HostInner>,
    local_addr: SocketAddr,
}

impl HostSync {
    /// Listens on the given port on every interface.
    pub async fn bind(port: u16) -> Result<Self, SyncError> {
        let addr: SocketAddr = format!("{BIND_ADDRESS}:{port}")
            .parse()
            .map_err(|_| SyncError::Address(format!("{BIND_ADDRESS}:{port}")))?;
        Self::bind_addr(addr).await
    }

    pub async fn bind_addr(addr: SocketAddr) -> Result<Self, SyncError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| SyncError::Bind { port: addr.port(), source })?;
        let local_addr = listener.local_addr()?;
        let inner = Arc::new(HostInner {
            clients: DashMap::new(),
            listeners: Listeners::default(),
            latest: Mutex::new(None),
        });
        info!("[HostSync] listening on {}", local_addr);
        tokio::spawn(accept_loop(listener, inner.clone()));
        Ok(Self { inner, local_addr })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn client_count(&self) -> usize {
        self.inner.clients.len()
    }
}

async fn accept_loop(listener: TcpListener, inner: Arc<HostInner>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                tokio::spawn(serve(stream, peer, inner.clone()));
            }
            Err(e) => {
                warn!("[HostSync] accept failed: {}", e);
                break;
            }
        }
    }
}

async fn serve(stream: TcpStream, peer: SocketAddr, inner: Arc<HostInner>) {
    let id = Uuid::new_v4();
    let (read_half, mut write_half) = stream.into_split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    // The newcomer sees the current state before anything else.
    {
        let latest = inner.lock_latest();
        if let Some(snapshot) = latest.as_ref() {
            match snapshot.to_json() {
                Ok(line) => {
                    let _ = tx.send(line);
                }
                Err(e) => warn!("[HostSync] could not encode snapshot: {}", e),
            }
        }
        inner.clients.insert(id, tx);
    }
    info!("[HostSync] client {} connected from {}", id, peer);

    let writer = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if let Err(e) = write_line(&mut write_half, &line).await {
                warn!("[HostSync] write to {} failed: {}", peer, e);
                break;
            }
        }
    });

    let mut lines = LinesStream::new(BufReader::new(read_half).lines());
    while let Some(line) = lines.next().await {
        match line {
            Ok(line) => inner.dispatch(&line, id),
            Err(e) => {
                warn!("[HostSync] read from {} failed: {}", peer, e);
                break;
            }
        }
    }

    inner.clients.remove(&id);
    writer.abort();
    info!("[HostSync] client {} disconnected", id);
}

pub(crate) async fn write_line<W>(writer: &mut W, line: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

impl GameSync for HostSync {
    /// Serializes once and queues the line on every connection.
    fn broadcast(&self, snapshot: &Snapshot) {
        let mut latest = self.inner.lock_latest();
        *latest = Some(snapshot.clone());
        match snapshot.to_json() {
            Ok(line) => {
                debug!(
                    "[HostSync] broadcast version={} turn={} clients={}",
                    snapshot.version,
                    snapshot.turn,
                    self.inner.clients.len()
                );
                self.inner.send_all(&line);
            }
            Err(e) => warn!("[HostSync] could not encode snapshot: {}", e),
        }
    }

    fn broadcast_player_joined(&self, name: &str) {
        if let Ok(line) = WireMessage::PlayerJoined(name.to_string()).encode() {
            self.inner.send_all(&line);
        }
    }

    fn broadcast_start_game(&self) {
        if let Ok(line) = WireMessage::StartGame.encode() {
            self.inner.send_all(&line);
        }
    }

    fn subscribe(&self, listener: Box<dyn SyncListener>) {
        self.inner.listeners.add(listener);
    }
}
