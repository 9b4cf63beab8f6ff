//! Arm daemon: the playback side of the translator.
//!
//! Subscribes to the translator channels, decodes each `{mode, token}`
//! command, maps tokens to catalog entries and plays them on the arm.
//! A bad payload or a playback fault is logged and the loop keeps
//! consuming; only a missing catalog stops the process, at startup.

mod arm;
mod pauses;
mod player;

use anyhow::{Context, Result};
use arm::LoggingArm;
use clap::Parser;
use pauses::PauseTable;
use player::Player;
use sign_catalog::SignCatalog;
use sign_dispatch::SignCommand;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "arm-daemon")]
#[command(about = "Robotic-arm playback of dispatched sign commands")]
struct Args {
    /// Sign resource directory.
    #[arg(long)]
    signs: PathBuf,

    /// Optional per-sign pause table (JSON list of {key, seconds}).
    #[arg(long)]
    pauses: Option<PathBuf>,

    /// Pause after every played sign, in milliseconds.
    #[arg(long, default_value_t = 700)]
    settle_ms: u64,

    /// MQTT broker host; without it commands are read from stdin.
    #[arg(long)]
    broker: Option<String>,

    #[arg(long, default_value_t = 8883)]
    port: u16,

    #[arg(long)]
    ca: Option<PathBuf>,

    #[arg(long)]
    cert: Option<PathBuf>,

    #[arg(long)]
    key: Option<PathBuf>,
}

fn main() -> Result<()> {
    setup_tracing();
    let args = Args::parse();

    let catalog = SignCatalog::load(&args.signs).context("loading sign catalog at startup")?;
    let pauses = match &args.pauses {
        Some(path) => PauseTable::load(path).context("loading pause table")?,
        None => PauseTable::default(),
    };
    let mut player = Player::new(
        catalog,
        Box::new(LoggingArm),
        pauses,
        Duration::from_millis(args.settle_ms),
    );
    info!("arm daemon ready");

    match &args.broker {
        Some(host) => consume_broker(host, &args, &mut player),
        None => consume_stdin(&mut player),
    }
}

/// Local mode: one JSON `{mode, token}` command per stdin line.
fn consume_stdin(player: &mut Player) -> Result<()> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading command")?;
        if line.trim().is_empty() {
            continue;
        }
        match SignCommand::from_wire(line.as_bytes()) {
            Ok(command) => player.execute(&command),
            Err(e) => warn!(error = %e, "dropping malformed command"),
        }
    }
    Ok(())
}

#[cfg(feature = "mqtt")]
fn consume_broker(host: &str, args: &Args, player: &mut Player) -> Result<()> {
    let config = sign_dispatch::MqttConfig {
        client_id: "arm-daemon".to_owned(),
        host: host.to_owned(),
        port: args.port,
        ca_path: args.ca.clone(),
        cert_path: args.cert.clone(),
        key_path: args.key.clone(),
        keep_alive: Duration::from_secs(30),
    };
    sign_dispatch::subscribe_loop(&config, &sign_dispatch::Channel::ALL, |channel, payload| {
        match SignCommand::from_wire(payload) {
            Ok(command) => {
                tracing::debug!(topic = channel.topic(), token = %command.token, "command received");
                player.execute(&command);
            }
            Err(e) => warn!(topic = channel.topic(), error = %e, "dropping malformed payload"),
        }
    })
    .context("broker subscription loop")
}

#[cfg(not(feature = "mqtt"))]
fn consume_broker(host: &str, _args: &Args, _player: &mut Player) -> Result<()> {
    anyhow::bail!("broker {host} requested but built without the mqtt feature")
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
