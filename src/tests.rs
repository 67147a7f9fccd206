//! End-to-end session scenarios: actors, timers and transports together.

use std::sync::Arc;
use std::time::Duration;

use actix::prelude::*;
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

use crate::config::game::{QUARANTINE_POSITION, TurnTimings};
use crate::error::{SaveError, TurnError};
use crate::game::snapshot::Snapshot;
use crate::game::state::GameState;
use crate::server::game_session::*;
use crate::server::sync::{ClientSync, GameSync, HostSync, LocalSync, Origin, SyncEvent};

fn quick_ai() -> TurnTimings {
    TurnTimings {
        turn: Duration::from_secs(30),
        inactivity: Duration::from_secs(30),
        ai_roll_delay: Duration::from_millis(10),
        ai_advance_delay: Duration::from_millis(10),
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|n| n.to_string()).collect()
}

fn standalone(state: GameState, sync: Arc<dyn GameSync>, timings: TurnTimings) -> Addr<GameSession> {
    GameSession::new(state, sync, SessionConfig::standalone().with_timings(timings).with_seed(7)).start()
}

/// Forwards session events into a channel the test can read.
struct Collector(mpsc::UnboundedSender<SessionEvent>);

impl Actor for Collector {
    type Context = Context<Self>;
}

impl Handler<SessionEvent> for Collector {
    type Result = ();

    fn handle(&mut self, event: SessionEvent, _: &mut Context<Self>) {
        let _ = self.0.send(event);
    }
}

async fn collect(session: &Addr<GameSession>) -> mpsc::UnboundedReceiver<SessionEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    session.send(Subscribe(Collector(tx).start().recipient())).await.unwrap();
    rx
}

/// Reads events until one matches, skipping the rest.
async fn wait_for_event(
    events: &mut mpsc::UnboundedReceiver<SessionEvent>,
    pred: impl Fn(&SessionEvent) -> bool,
) -> SessionEvent {
    timeout(Duration::from_secs(5), async {
        loop {
            let event = events.recv().await.expect("session event channel closed");
            if pred(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for session event")
}

async fn wait_for_status(session: &Addr<GameSession>, pred: impl Fn(&TurnStatus) -> bool) -> TurnStatus {
    timeout(Duration::from_secs(5), async {
        loop {
            let status = session.send(GetTurnStatus).await.unwrap();
            if pred(&status) {
                return status;
            }
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("timed out waiting for turn status")
}

async fn wait_for_snapshot(session: &Addr<GameSession>, pred: impl Fn(&Snapshot) -> bool) -> Snapshot {
    timeout(Duration::from_secs(5), async {
        loop {
            let snapshot = session.send(GetSnapshot).await.unwrap();
            if pred(&snapshot) {
                return snapshot;
            }
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("timed out waiting for snapshot")
}

#[actix::test]
async fn test_host_and_guest_play_over_tcp() {
    let host_sync = HostSync::bind_addr("127.0.0.1:0".parse().unwrap()).await.unwrap();
    let addr = host_sync.local_addr();
    let host = GameSession::new(
        GameState::empty(),
        Arc::new(host_sync),
        SessionConfig::host("Host").with_timings(quick_ai()).with_seed(1),
    )
    .start();

    let client_sync = ClientSync::connect_addr(addr).await.unwrap();
    let guest = GameSession::new(
        GameState::empty(),
        Arc::new(client_sync),
        SessionConfig::client("Guest").with_timings(quick_ai()).with_seed(2),
    )
    .start();
    guest.send(AnnounceJoin { name: "Guest".into() }).await.unwrap();

    // Both sides see the same two-player roster, host first.
    let snapshot = wait_for_snapshot(&guest, |s| s.players.len() == 2).await;
    let roster: Vec<&str> = snapshot.players.iter().map(|p| p.name()).collect();
    assert_eq!(roster, vec!["Host", "Guest"]);

    let status = wait_for_status(&guest, |s| s.phase == PhaseKind::Watching).await;
    assert_eq!(status.current.as_deref(), Some("Host"));
    assert!(!status.local);
    assert_eq!(
        guest.send(RollDice).await.unwrap(),
        Err(TurnError::NotYourTurn {
            expected: "Host".into(),
            local: "Guest".into()
        })
    );
    assert_eq!(guest.send(StartGame).await.unwrap(), Err(TurnError::HostOnly));

    // Host plays its turn; the guest is up next.
    host.send(RollDice).await.unwrap().unwrap();
    host.send(TileResolutionComplete).await.unwrap().unwrap();
    let status = wait_for_status(&guest, |s| s.local && s.phase == PhaseKind::AwaitingRoll).await;
    assert_eq!(status.current.as_deref(), Some("Guest"));
    assert_eq!(status.turn, 2);

    // The guest's move reaches the host.
    guest.send(RollDice).await.unwrap().unwrap();
    let local = guest.send(GetSnapshot).await.unwrap();
    let mirrored = wait_for_snapshot(&host, |s| s.version >= local.version).await;
    assert_eq!(mirrored.players, local.players);
    assert_eq!(host.send(GetTurnStatus).await.unwrap().current.as_deref(), Some("Guest"));
}

#[actix::test]
async fn test_ai_opponents_play_their_turns() {
    let session = standalone(GameState::empty(), Arc::new(LocalSync::new()), quick_ai());
    let mut events = collect(&session).await;
    session
        .send(ResetForAiMode {
            human_name: "Human".into(),
            count: 2,
        })
        .await
        .unwrap();
    session.send(StartGame).await.unwrap().unwrap();
    session.send(RollDice).await.unwrap().unwrap();
    session.send(TileResolutionComplete).await.unwrap().unwrap();

    let status = wait_for_status(&session, |s| s.turn >= 3).await;
    assert!(status.turn >= 3);

    let ai_roll = wait_for_event(&mut events, |e| matches!(e, SessionEvent::Rolled(r) if r.player == 1)).await;
    assert!(matches!(ai_roll, SessionEvent::Rolled(_)));
}

#[actix::test]
async fn test_resolution_completes_once() {
    let mut state = GameState::empty();
    state.reset_players(&names(&["A", "B"]));
    let session = standalone(state, Arc::new(LocalSync::new()), quick_ai());
    session.send(StartGame).await.unwrap().unwrap();
    session.send(RollDice).await.unwrap().unwrap();
    assert_eq!(session.send(RollDice).await.unwrap(), Err(TurnError::AlreadyRolled));

    let first = session.send(TileResolutionComplete);
    let second = session.send(TileResolutionComplete);
    assert_eq!(first.await.unwrap(), Ok(()));
    // The second completion lands in B's fresh turn, before any roll.
    assert_eq!(second.await.unwrap(), Err(TurnError::NotRolled));

    let status = session.send(GetTurnStatus).await.unwrap();
    assert_eq!(status.turn, 2);
    assert_eq!(status.current.as_deref(), Some("B"));
    assert_eq!(status.phase, PhaseKind::AwaitingRoll);
}

#[actix::test]
async fn test_countdown_forces_end_of_turn() {
    let mut state = GameState::empty();
    state.reset_players(&names(&["A", "B"]));
    let timings = TurnTimings {
        turn: Duration::from_millis(50),
        ..quick_ai()
    };
    let session = standalone(state, Arc::new(LocalSync::new()), timings);
    session.send(StartGame).await.unwrap().unwrap();

    let status = wait_for_status(&session, |s| s.turn >= 2).await;
    assert!(status.serial >= 2);
}

#[actix::test]
async fn test_timer_of_finished_turn_is_ignored() {
    let mut state = GameState::empty();
    state.reset_players(&names(&["A", "B"]));
    let timings = TurnTimings {
        turn: Duration::from_millis(300),
        ..quick_ai()
    };
    let session = standalone(state, Arc::new(LocalSync::new()), timings);
    session.send(StartGame).await.unwrap().unwrap();

    sleep(Duration::from_millis(150)).await;
    session.send(RollDice).await.unwrap().unwrap();
    session.send(EndTurn).await.unwrap().unwrap();
    // Past the first countdown's deadline, before the second one's.
    sleep(Duration::from_millis(200)).await;
    let status = session.send(GetTurnStatus).await.unwrap();
    assert_eq!(status.turn, 2);
    assert_eq!(status.current.as_deref(), Some("B"));
}

#[actix::test]
async fn test_quarantined_player_sits_out() {
    let mut state = GameState::empty();
    state.reset_players(&names(&["A", "B"]));
    state.player_mut(0).unwrap().send_to_quarantine(QUARANTINE_POSITION);
    let session = standalone(state, Arc::new(LocalSync::new()), quick_ai());
    let mut events = collect(&session).await;
    session.send(StartGame).await.unwrap().unwrap();

    let status = session.send(GetTurnStatus).await.unwrap();
    assert_eq!(status.current.as_deref(), Some("B"));
    assert_eq!(status.turn, 2);

    let snapshot = session.send(GetSnapshot).await.unwrap();
    assert!(!snapshot.players[0].in_quarantine());
    assert_eq!(snapshot.players[0].position(), QUARANTINE_POSITION);

    let skipped = wait_for_event(&mut events, |e| matches!(e, SessionEvent::TurnSkipped { .. })).await;
    assert_eq!(
        skipped,
        SessionEvent::TurnSkipped {
            player: 0,
            name: "A".into()
        }
    );
}

#[actix::test]
async fn test_observer_mirrors_local_session() {
    let sync = LocalSync::new();
    let mut state = GameState::empty();
    state.reset_players(&names(&["A", "B"]));
    let main = standalone(state, Arc::new(sync.clone()), quick_ai());
    let mirror = GameSession::new(
        GameState::empty(),
        Arc::new(sync.clone()),
        SessionConfig::observer().with_timings(quick_ai()),
    )
    .start();

    main.send(StartGame).await.unwrap().unwrap();
    main.send(RollDice).await.unwrap().unwrap();
    let expected = main.send(GetSnapshot).await.unwrap();

    let mirrored = wait_for_snapshot(&mirror, |s| s.version == expected.version).await;
    assert_eq!(mirrored, expected);
    assert_eq!(sync.latest(), Some(expected));
    assert_eq!(mirror.send(RollDice).await.unwrap(), Err(TurnError::GameNotStarted));
}

#[actix::test]
async fn test_save_and_load_through_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("save.json");

    let mut state = GameState::empty();
    state.reset_players(&names(&["A", "B", "C"]));
    let session = standalone(state, Arc::new(LocalSync::new()), quick_ai());
    session.send(StartGame).await.unwrap().unwrap();
    session.send(RollDice).await.unwrap().unwrap();
    session.send(TileResolutionComplete).await.unwrap().unwrap();
    session.send(SaveGame { path: path.clone() }).await.unwrap().unwrap();
    let saved = session.send(GetSnapshot).await.unwrap();

    let restored = standalone(GameState::empty(), Arc::new(LocalSync::new()), quick_ai());
    restored.send(LoadGame { path: path.clone() }).await.unwrap().unwrap();
    let loaded = restored.send(GetSnapshot).await.unwrap();
    assert_eq!(loaded.players, saved.players);
    assert_eq!(loaded.current_index, saved.current_index);
    assert!(loaded.version > saved.version);

    let status = restored.send(GetTurnStatus).await.unwrap();
    assert_eq!(status.phase, PhaseKind::AwaitingRoll);
    assert_eq!(status.current.as_deref(), Some("B"));

    restored.send(ResetForCoop { names: names(&["A", "B"]) }).await.unwrap();
    let refused = restored.send(SaveGame { path }).await.unwrap();
    assert!(matches!(refused, Err(SaveError::CoopMode)));
}

#[actix::test]
async fn test_return_to_lobby_stops_the_game() {
    let mut state = GameState::empty();
    state.reset_players(&names(&["A", "B"]));
    let session = standalone(state, Arc::new(LocalSync::new()), quick_ai());
    session.send(StartGame).await.unwrap().unwrap();
    session.send(ReturnToLobby).await.unwrap();

    let status = session.send(GetTurnStatus).await.unwrap();
    assert_eq!(status.phase, PhaseKind::Idle);
    assert_eq!(status.current, None);
    assert_eq!(session.send(RollDice).await.unwrap(), Err(TurnError::GameNotStarted));
    assert_eq!(session.send(StartGame).await.unwrap(), Err(TurnError::NoPlayers));
}

#[actix::test]
async fn test_hub_hands_current_state_to_late_subscriber() {
    let sync = LocalSync::new();
    let mut state = GameState::empty();
    state.reset_players(&names(&["A", "B"]));
    let session = standalone(state, Arc::new(sync.clone()), quick_ai());
    let current = session.send(GetSnapshot).await.unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    sync.subscribe(Box::new(tx));
    match rx.try_recv() {
        Ok(SyncEvent::Update { snapshot, origin }) => {
            assert_eq!(origin, Origin::InProcess);
            assert_eq!(snapshot, current);
            assert_eq!(snapshot.players.len(), 2);
        }
        other => panic!("expected the current state, got {other:?}"),
    }
}

#[actix::test]
async fn test_end_turn_needs_a_roll() {
    let mut state = GameState::empty();
    state.reset_players(&names(&["A", "B"]));
    let session = standalone(state, Arc::new(LocalSync::new()), quick_ai());
    session.send(StartGame).await.unwrap().unwrap();

    assert_eq!(session.send(EndTurn).await.unwrap(), Err(TurnError::NotRolled));
    let status = session.send(GetTurnStatus).await.unwrap();
    assert_eq!(status.turn, 1);
    assert_eq!(status.current.as_deref(), Some("A"));
    assert_eq!(status.phase, PhaseKind::AwaitingRoll);

    session.send(RollDice).await.unwrap().unwrap();
    session.send(EndTurn).await.unwrap().unwrap();
    assert_eq!(session.send(GetTurnStatus).await.unwrap().current.as_deref(), Some("B"));
}

#[actix::test]
async fn test_idle_human_is_moved_on_after_landing() {
    let mut state = GameState::empty();
    state.reset_players(&names(&["A", "B"]));
    let timings = TurnTimings {
        inactivity: Duration::from_millis(50),
        ..quick_ai()
    };
    let session = standalone(state, Arc::new(LocalSync::new()), timings);
    session.send(StartGame).await.unwrap().unwrap();
    session.send(RollDice).await.unwrap().unwrap();

    let status = wait_for_status(&session, |s| s.turn >= 2).await;
    assert_eq!(status.current.as_deref(), Some("B"));
    assert_eq!(status.phase, PhaseKind::AwaitingRoll);
}

#[actix::test]
async fn test_no_inactivity_auto_end_against_ai() {
    let timings = TurnTimings {
        inactivity: Duration::from_millis(50),
        ..quick_ai()
    };
    let session = standalone(GameState::empty(), Arc::new(LocalSync::new()), timings);
    session
        .send(ResetForAiMode {
            human_name: "Human".into(),
            count: 2,
        })
        .await
        .unwrap();
    session.send(StartGame).await.unwrap().unwrap();
    session.send(RollDice).await.unwrap().unwrap();

    sleep(Duration::from_millis(250)).await;
    let status = session.send(GetTurnStatus).await.unwrap();
    assert_eq!(status.turn, 1);
    assert_eq!(status.current.as_deref(), Some("Human"));
    assert_eq!(status.phase, PhaseKind::Resolving);
}

async fn wait_for_update(rx: &mut mpsc::UnboundedReceiver<SyncEvent>, version: u64) -> (Snapshot, Origin) {
    timeout(Duration::from_secs(5), async {
        loop {
            match rx.recv().await.expect("sync channel closed") {
                SyncEvent::Update { snapshot, origin } if snapshot.version == version => {
                    return (snapshot, origin);
                }
                _ => {}
            }
        }
    })
    .await
    .expect("timed out waiting for relayed snapshot")
}

#[actix::test]
async fn test_host_relays_one_client_to_another() {
    let host_sync = HostSync::bind_addr("127.0.0.1:0".parse().unwrap()).await.unwrap();
    let addr = host_sync.local_addr();
    let host = GameSession::new(
        GameState::empty(),
        Arc::new(host_sync),
        SessionConfig::host("Host").with_timings(quick_ai()),
    )
    .start();

    let sender = ClientSync::connect_addr(addr).await.unwrap();
    let receiver = ClientSync::connect_addr(addr).await.unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    receiver.subscribe(Box::new(tx));

    let mut state = GameState::empty();
    state.reset_players(&names(&["Host", "Guest"]));
    state.player_mut(1).unwrap().set_position(7);
    let pushed = Snapshot {
        version: 100,
        ..state.create_snapshot()
    };
    sender.broadcast(&pushed);

    // The second client only ever hears from the host.
    let (relayed, origin) = wait_for_update(&mut rx, 100).await;
    assert_eq!(origin, Origin::Host);
    assert_eq!(relayed.players, pushed.players);
    assert_eq!(relayed.players[1].position(), 7);

    let on_host = wait_for_snapshot(&host, |s| s.version == 100).await;
    assert_eq!(on_host.players, pushed.players);
}
