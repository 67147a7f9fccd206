//! Client side of the network transport. A client only ever talks to its
//! host; the host relays to everyone else.

use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{lookup_host, TcpStream};
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;

use crate::error::SyncError;
use crate::game::snapshot::Snapshot;
use crate::server::sync::host::write_line;
use crate::server::sync::wire::WireMessage;
use crate::server::sync::{GameSync, Listeners, Origin, SyncEvent, SyncListener};

#[derive(Clone)]
pub struct ClientSync {
    outbound: mpsc::UnboundedSender<String>,
    listeners: Arc<Listeners>,
    host_addr: SocketAddr,
}

impl ClientSync {
    /// Connects to `host:port`. Events received before anyone subscribes are kept.
    pub async fn connect(host: &str, port: u16) -> Result<Self, SyncError> {
        let addr = lookup_host((host, port))
            .await
            .map_err(|_| SyncError::Address(format!("{host}:{port}")))?
            .next()
            .ok_or_else(|| SyncError::Address(format!("{host}:{port}")))?;
        Self::connect_addr(addr).await
    }

    pub async fn connect_addr(addr: SocketAddr) -> Result<Self, SyncError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| SyncError::Connect { addr, source })?;
        info!("[ClientSync] connected to {}", addr);

        let (read_half, mut write_half) = stream.into_split();
        let (outbound, mut rx) = mpsc::unbounded_channel::<String>();
        let listeners = Arc::new(Listeners::default());

        tokio::spawn(async move {
            while let Some(line) = rx.recv().await {
                if let Err(e) = write_line(&mut write_half, &line).await {
                    warn!("[ClientSync] write to {} failed: {}", addr, e);
                    break;
                }
            }
        });

        let inbound = listeners.clone();
        tokio::spawn(async move {
            let mut lines = LinesStream::new(BufReader::new(read_half).lines());
            while let Some(line) = lines.next().await {
                match line {
                    Ok(line) => dispatch(&inbound, &line),
                    Err(e) => {
                        warn!("[ClientSync] read from {} failed: {}", addr, e);
                        break;
                    }
                }
            }
            info!("[ClientSync] connection to {} closed", addr);
            inbound.emit(SyncEvent::ConnectionLost);
        });

        Ok(Self {
            outbound,
            listeners,
            host_addr: addr,
        })
    }

    pub fn host_addr(&self) -> SocketAddr {
        self.host_addr
    }

    fn send(&self, message: WireMessage) {
        match message.encode() {
            Ok(line) => {
                if self.outbound.send(line).is_err() {
                    debug!("[ClientSync] connection closed, message dropped");
                }
            }
            Err(e) => warn!("[ClientSync] could not encode message: {}", e),
        }
    }
}

fn dispatch(listeners: &Listeners, line: &str) {
    let Some(message) = WireMessage::parse(line) else {
        return;
    };
    let event = match message {
        WireMessage::PlayerJoined(name) => SyncEvent::PlayerJoined(name),
        WireMessage::StartGame => SyncEvent::StartGame,
        WireMessage::Snapshot(snapshot) => SyncEvent::Update {
            snapshot,
            origin: Origin::Host,
        },
    };
    listeners.emit(event);
}

impl GameSync for ClientSync {
    /// Sends the local snapshot to the host only.
    fn broadcast(&self, snapshot: &Snapshot) {
        debug!("[ClientSync] push version={} turn={}", snapshot.version, snapshot.turn);
        self.send(WireMessage::Snapshot(snapshot.clone()));
    }

    fn broadcast_player_joined(&self, name: &str) {
        self.send(WireMessage::PlayerJoined(name.to_string()));
    }

    fn broadcast_start_game(&self) {
        self.send(WireMessage::StartGame);
    }

    fn subscribe(&self, listener: Box<dyn SyncListener>) {
        self.listeners.add(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::GameState;
    use crate::server::sync::HostSync;
    use std::time::Duration;
    use tokio::time::timeout;

    async fn next_event(rx: &mut mpsc::UnboundedReceiver<SyncEvent>) -> SyncEvent {
        timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for sync event")
            .expect("listener channel closed")
    }

    async fn local_host() -> HostSync {
        HostSync::bind_addr("127.0.0.1:0".parse().unwrap()).await.unwrap()
    }

    #[actix::test]
    async fn test_client_receives_snapshot_on_connect() {
        let host = local_host().await;
        let mut state = GameState::empty();
        state.reset_players(&["Host".to_string(), "Guest".to_string()]);
        state.player_mut(1).unwrap().set_position(7);
        host.broadcast(&state.create_snapshot());

        let client = ClientSync::connect_addr(host.local_addr()).await.unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        client.subscribe(Box::new(tx));

        match next_event(&mut rx).await {
            SyncEvent::Update { snapshot, origin } => {
                assert_eq!(origin, Origin::Host);
                let mut mirror = GameState::empty();
                mirror.apply_snapshot(snapshot);
                assert_eq!(mirror.players().len(), 2);
                assert_eq!(mirror.players()[1].position(), 7);
                assert_eq!(mirror.players()[0].name(), "Host");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[actix::test]
    async fn test_tokens_flow_both_ways() {
        let host = local_host().await;
        let (host_tx, mut host_rx) = mpsc::unbounded_channel();
        host.subscribe(Box::new(host_tx));

        let client = ClientSync::connect_addr(host.local_addr()).await.unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        client.subscribe(Box::new(tx));

        client.broadcast_player_joined("Guest");
        assert_eq!(next_event(&mut host_rx).await, SyncEvent::PlayerJoined("Guest".into()));

        host.broadcast_start_game();
        assert_eq!(next_event(&mut rx).await, SyncEvent::StartGame);

        let mut state = GameState::new();
        state.bump_version();
        client.broadcast(&state.create_snapshot());
        match next_event(&mut host_rx).await {
            SyncEvent::Update { snapshot, origin } => {
                assert!(matches!(origin, Origin::Peer(_)));
                assert_eq!(snapshot.version, state.version());
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[actix::test]
    async fn test_client_joining_mid_stream_ends_on_newest_snapshot() {
        let host = local_host().await;
        let source = host.clone();
        let broadcaster = tokio::spawn(async move {
            let mut state = GameState::new();
            for _ in 0..200 {
                state.bump_version();
                source.broadcast(&state.create_snapshot());
                tokio::task::yield_now().await;
            }
            state.version()
        });

        let client = ClientSync::connect_addr(host.local_addr()).await.unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        client.subscribe(Box::new(tx));
        let newest = broadcaster.await.unwrap();

        loop {
            match next_event(&mut rx).await {
                SyncEvent::Update { snapshot, .. } if snapshot.version == newest => break,
                SyncEvent::Update { snapshot, .. } => assert!(snapshot.version < newest),
                other => panic!("unexpected event {other:?}"),
            }
        }
    }

    #[actix::test]
    async fn test_garbage_line_keeps_connection() {
        let host = local_host().await;
        let (host_tx, mut host_rx) = mpsc::unbounded_channel();
        host.subscribe(Box::new(host_tx));

        let client = ClientSync::connect_addr(host.local_addr()).await.unwrap();
        client.outbound.send("not a snapshot".to_string()).unwrap();
        client.broadcast_start_game();
        assert_eq!(next_event(&mut host_rx).await, SyncEvent::StartGame);
        assert_eq!(host.client_count(), 1);
    }
}
