//! Voice daemon: stdin host for the intent handler.
//!
//! The voice-assistant runtime is an external collaborator; this binary
//! speaks its envelope over pipes, one JSON request per stdin line, one
//! JSON response per stdout line. Translate requests go out through the
//! dispatch transport; launches read the robot's last word from the
//! mailbox the capture side fills.

use anyhow::{Context, Result};
use clap::Parser;
use intent_session::{IntentHandler, IntentRequest};
use shadow_relay::{Mailbox, MemoryMailbox};
use sign_catalog::SignCatalog;
use sign_dispatch::{Channel, Transport, TransportError};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "voice-daemon")]
#[command(about = "Voice intent host: JSON requests on stdin, responses on stdout")]
struct Args {
    /// Sign resource directory, for deciding whole-sign vs spell-out.
    #[arg(long)]
    signs: PathBuf,

    /// MQTT broker host; without it dispatch messages are logged.
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

    /// Device-shadow endpoint holding the robot-word mailbox; without it
    /// an in-process mailbox is used (launches never see a robot word).
    #[arg(long)]
    shadow_endpoint: Option<String>,

    /// Thing name owning the shadow document.
    #[arg(long)]
    thing: Option<String>,
}

fn main() -> Result<()> {
    setup_tracing();
    let args = Args::parse();

    let catalog = SignCatalog::load(&args.signs).context("loading sign catalog at startup")?;
    let handler = IntentHandler::new(catalog);
    let mut transport = make_transport(&args)?;
    let mut mailbox = make_mailbox(&args)?;
    info!("voice daemon ready");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in stdin.lock().lines() {
        let line = line.context("reading intent request")?;
        if line.trim().is_empty() {
            continue;
        }
        if let Some(reply) = answer(&handler, transport.as_mut(), mailbox.as_mut(), &line) {
            writeln!(out, "{reply}").context("writing intent response")?;
        }
    }
    Ok(())
}

/// One request in, one response out. A malformed line is dropped with a
/// warning instead of killing the host.
fn answer(
    handler: &IntentHandler,
    transport: &mut dyn Transport,
    mailbox: &mut dyn Mailbox,
    line: &str,
) -> Option<String> {
    let request: IntentRequest = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "dropping malformed intent request");
            return None;
        }
    };
    let response = handler.handle(&request, transport, mailbox);
    match serde_json::to_string(&response) {
        Ok(json) => Some(json),
        Err(e) => {
            warn!(error = %e, "response serialization failed");
            None
        }
    }
}

fn make_transport(args: &Args) -> Result<Box<dyn Transport>> {
    match &args.broker {
        Some(host) => {
            #[cfg(feature = "mqtt")]
            {
                let config = sign_dispatch::MqttConfig {
                    client_id: "voice-daemon".to_owned(),
                    host: host.clone(),
                    port: args.port,
                    ca_path: args.ca.clone(),
                    cert_path: args.cert.clone(),
                    key_path: args.key.clone(),
                    keep_alive: std::time::Duration::from_secs(30),
                };
                let transport = sign_dispatch::MqttTransport::connect(&config)
                    .context("connecting to broker")?;
                Ok(Box::new(transport))
            }
            #[cfg(not(feature = "mqtt"))]
            {
                anyhow::bail!("broker {host} requested but built without the mqtt feature")
            }
        }
        None => {
            info!("no broker configured, dispatch messages will be logged");
            Ok(Box::new(LogTransport))
        }
    }
}

fn make_mailbox(args: &Args) -> Result<Box<dyn Mailbox>> {
    match (&args.shadow_endpoint, &args.thing) {
        (Some(endpoint), Some(thing)) => {
            #[cfg(feature = "http")]
            {
                Ok(Box::new(shadow_relay::ShadowMailbox::new(endpoint, thing)?))
            }
            #[cfg(not(feature = "http"))]
            {
                anyhow::bail!(
                    "shadow mailbox for {thing} at {endpoint} requested but built without the http feature"
                )
            }
        }
        (None, None) => {
            info!("no shadow endpoint configured, using an in-process mailbox");
            Ok(Box::new(MemoryMailbox::default()))
        }
        _ => anyhow::bail!("shadow mailbox requires both --shadow-endpoint and --thing"),
    }
}

/// Transport for local runs: every publish becomes a log line.
struct LogTransport;

impl Transport for LogTransport {
    fn publish(&mut self, channel: Channel, payload: &[u8]) -> Result<(), TransportError> {
        info!(
            topic = channel.topic(),
            payload = %String::from_utf8_lossy(payload),
            "publish (dry run)"
        );
        Ok(())
    }
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
