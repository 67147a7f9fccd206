//! Console front end for The Last Defenders.
//!
//! Starts one game session in the chosen mode, prints what happens, and reads
//! player commands from stdin.

use std::path::PathBuf;
use std::sync::Arc;

use actix::prelude::*;
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;

use last_defenders::config::game::TurnTimings;
use last_defenders::config::network::DEFAULT_HOST;
use last_defenders::config::roster::DEFAULT_HUMAN_NAME;
use last_defenders::game::state::GameState;
use last_defenders::server::game_session::*;
use last_defenders::server::sync::room::room_port;
use last_defenders::server::sync::{ClientSync, GameSync, HostSync, LocalSync};

#[derive(Parser)]
#[command(name = "last-defenders", about = "Turn-based survival board game")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    mode: Mode,

    /// Seconds a player has to finish a turn
    #[arg(long, global = true)]
    turn_seconds: Option<u64>,

    /// RNG seed for reproducible dice
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Mode {
    /// Hot-seat game, every seat played from this console
    Local {
        /// Player names, comma separated
        #[arg(short, long, value_delimiter = ',', default_value = "Alice,Bob")]
        players: Vec<String>,
    },
    /// One human against computer opponents
    Ai {
        #[arg(short, long, default_value = DEFAULT_HUMAN_NAME)]
        name: String,

        #[arg(short, long, default_value_t = 3)]
        opponents: usize,
    },
    /// Host a co-op room and wait for a guest
    Host {
        #[arg(short, long, default_value = DEFAULT_HUMAN_NAME)]
        name: String,

        /// Four-digit room code
        #[arg(short, long, env = "LD_ROOM")]
        room: String,
    },
    /// Join a co-op room
    Join {
        #[arg(short, long)]
        name: String,

        #[arg(short, long, env = "LD_ROOM")]
        room: String,

        #[arg(long, env = "LD_HOST", default_value = DEFAULT_HOST)]
        host: String,
    },
}

/// Prints session events for the person at the console.
struct Console;

impl Actor for Console {
    type Context = Context<Self>;
}

impl Handler<SessionEvent> for Console {
    type Result = ();

    fn handle(&mut self, event: SessionEvent, _: &mut Context<Self>) {
        match event {
            SessionEvent::StateChanged(_) => {}
            SessionEvent::TurnStarted { name, turn, local, .. } => {
                println!("--- turn {turn}: {name}{}", if local { " (your move: roll)" } else { "" });
            }
            SessionEvent::Rolled(roll) => {
                println!("rolled {} + {} = {}, {} -> {}", roll.dice1, roll.dice2, roll.total, roll.from, roll.to);
            }
            SessionEvent::Landed(landing) => {
                println!("landed on {} ({:?})", landing.name, landing.kind);
                for effect in &landing.effects {
                    println!("  {effect:?}");
                }
                for (i, offer) in landing.offers.iter().enumerate() {
                    println!("  [{i}] {offer:?}");
                }
                if let Some(fallback) = landing.fallback {
                    println!("  otherwise: {fallback:?}");
                }
            }
            SessionEvent::EffectsApplied { effects, .. } => {
                for effect in effects {
                    println!("  {effect:?}");
                }
            }
            SessionEvent::BonusesApplied { summary, .. } => println!("start of turn: {summary:?}"),
            SessionEvent::AiActions { actions, .. } => println!("AI: {actions:?}"),
            SessionEvent::TurnSkipped { name, .. } => println!("{name} sits out in quarantine"),
            SessionEvent::PlayerJoined(name) => println!("{name} joined"),
            SessionEvent::GameStarted => println!("game started"),
            SessionEvent::ConnectionLost => println!("connection to the host lost"),
        }
    }
}

async fn run_command(session: &Addr<GameSession>, line: &str) -> Result<bool, Box<dyn std::error::Error>> {
    let mut words = line.split_whitespace();
    match (words.next(), words.next()) {
        (Some("roll"), _) => {
            session.send(RollDice).await??;
        }
        (Some("accept"), Some(index)) => {
            session.send(AcceptOffer { index: index.parse()? }).await??;
        }
        (Some("done"), _) => session.send(TileResolutionComplete).await??,
        (Some("end"), _) => session.send(EndTurn).await??,
        (Some("start"), _) => session.send(StartGame).await??,
        (Some("status"), _) => println!("{:?}", session.send(GetTurnStatus).await?),
        (Some("me"), _) => println!("{:?}", session.send(GetCurrentPlayer).await??),
        (Some("save"), Some(path)) => session.send(SaveGame { path: PathBuf::from(path) }).await??,
        (Some("load"), Some(path)) => session.send(LoadGame { path: PathBuf::from(path) }).await??,
        (Some("lobby"), _) => session.send(ReturnToLobby).await?,
        (Some("quit"), _) => return Ok(false),
        (None, _) => {}
        _ => println!("commands: roll, accept <n>, done, end, start, status, me, save <file>, load <file>, lobby, quit"),
    }
    Ok(true)
}

#[actix::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut timings = TurnTimings::default();
    if let Some(secs) = cli.turn_seconds {
        timings = timings.with_turn_seconds(secs);
    }

    let (sync, config): (Arc<dyn GameSync>, SessionConfig) = match &cli.mode {
        Mode::Local { .. } | Mode::Ai { .. } => (Arc::new(LocalSync::new()), SessionConfig::standalone()),
        Mode::Host { name, room } => {
            let port = room_port(room)?;
            let host = HostSync::bind(port).await?;
            info!("Hosting room {} on {}", room, host.local_addr());
            (Arc::new(host), SessionConfig::host(name.as_str()))
        }
        Mode::Join { name, room, host } => {
            let port = room_port(room)?;
            (Arc::new(ClientSync::connect(host, port).await?), SessionConfig::client(name.as_str()))
        }
    };
    let mut config = config.with_timings(timings);
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    let session = GameSession::new(GameState::empty(), sync, config).start();
    session.send(Subscribe(Console.start().recipient())).await?;

    match cli.mode {
        Mode::Local { players } => {
            session.send(ResetPlayers { names: players }).await?;
            session.send(StartGame).await??;
        }
        Mode::Ai { name, opponents } => {
            session
                .send(ResetForAiMode {
                    human_name: name,
                    count: opponents + 1,
                })
                .await?;
            session.send(StartGame).await??;
        }
        Mode::Host { .. } => println!("waiting for a guest to join"),
        Mode::Join { name, .. } => session.send(AnnounceJoin { name }).await?,
    }

    let mut lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());
    while let Some(line) = lines.next().await {
        match run_command(&session, &line?).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => warn!("{}", e),
        }
    }
    System::current().stop();
    Ok(())
}
