//! Capture daemon: the gesture side of the translator.
//!
//! An external hand tracker feeds landmark frames on stdin, one JSON
//! object per line, interleaved with discrete key events. Each loop
//! iteration handles one frame and at most one event, so the phrase
//! buffer is never touched concurrently. `record` and `train` cover the
//! dataset pipeline that produces the model the `run` loop loads.

mod events;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use events::{CaptureEvent, KeyEvent};
use gesture_classify::{
    append_sample, feature_vector, load_samples, CentroidClassifier, FrameClassifier,
    HandLandmarks, Sample, LANDMARK_POINTS,
};
use phrase_builder::{CommitOutcome, PhraseBuilder, CONFIDENCE_THRESHOLD, DEBOUNCE_INTERVAL};
use shadow_relay::{relay_word, LogNotifier, Mailbox, MemoryMailbox, Notifier};
use sign_catalog::SignCatalog;
use sign_dispatch::{publish_message, route, Channel, RetryPolicy, Transport, TransportError};
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "capture-daemon")]
#[command(about = "Hand-gesture capture loop: classify, accumulate, dispatch")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the capture loop against a trained model.
    Run {
        /// Trained gesture model artifact.
        #[arg(long)]
        model: PathBuf,

        /// Sign resource directory, for routing whole-word signs.
        #[arg(long)]
        signs: PathBuf,

        /// Minimum classification confidence for arming a commit.
        #[arg(long, default_value_t = CONFIDENCE_THRESHOLD)]
        confidence: f32,

        /// Debounce between accepted commits, in milliseconds.
        #[arg(long, default_value_t = DEBOUNCE_INTERVAL.as_millis() as u64)]
        debounce_ms: u64,

        #[command(flatten)]
        broker: BrokerArgs,

        #[command(flatten)]
        relay: RelayArgs,
    },
    /// Record labeled samples from the landmark stream into a dataset.
    Record {
        /// JSONL dataset file, appended to.
        #[arg(long)]
        dataset: PathBuf,
    },
    /// Fit a model from a recorded dataset.
    Train {
        #[arg(long)]
        dataset: PathBuf,

        /// Where to write the model artifact.
        #[arg(long)]
        model: PathBuf,
    },
}

#[derive(clap::Args)]
struct BrokerArgs {
    /// MQTT broker host; without it messages are logged instead of sent.
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

#[derive(clap::Args)]
struct RelayArgs {
    /// Device-shadow endpoint where sent phrases are left for the voice
    /// side; without it relayed phrases stay in process.
    #[arg(long)]
    shadow_endpoint: Option<String>,

    /// Thing name owning the shadow document.
    #[arg(long)]
    thing: Option<String>,

    /// Proactive-notification OAuth client id.
    #[arg(long)]
    notify_client_id: Option<String>,

    /// Proactive-notification OAuth client secret.
    #[arg(long)]
    notify_client_secret: Option<String>,
}

fn main() -> Result<()> {
    setup_tracing();
    let args = Args::parse();

    match args.command {
        Command::Run {
            model,
            signs,
            confidence,
            debounce_ms,
            broker,
            relay,
        } => run_loop(&model, &signs, confidence, debounce_ms, &broker, &relay),
        Command::Record { dataset } => record(&dataset),
        Command::Train { dataset, model } => train(&dataset, &model),
    }
}

fn run_loop(
    model: &Path,
    signs: &Path,
    confidence: f32,
    debounce_ms: u64,
    broker: &BrokerArgs,
    relay: &RelayArgs,
) -> Result<()> {
    // Both loads are fatal here: no model means nothing to classify, no
    // catalog means nothing to route.
    let classifier =
        CentroidClassifier::load(model).context("loading gesture model at startup")?;
    let catalog = SignCatalog::load(signs).context("loading sign catalog at startup")?;
    let mut transport = make_transport(broker)?;
    let (mut mailbox, notifier) = make_relay(relay)?;
    let mut builder = PhraseBuilder::new(confidence, Duration::from_millis(debounce_ms));
    let retry = RetryPolicy::default();

    info!(
        labels = classifier.labels().len(),
        signs = catalog.len(),
        "capture loop ready"
    );

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading capture event")?;
        if line.trim().is_empty() {
            continue;
        }
        let event = match serde_json::from_str::<CaptureEvent>(&line) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "dropping malformed capture event");
                continue;
            }
        };

        match event {
            CaptureEvent::Frame { points } => {
                if points.len() != LANDMARK_POINTS {
                    warn!(points = points.len(), "partial hand frame, skipping");
                    continue;
                }
                let frame = HandLandmarks { points };
                let features = match feature_vector(&frame) {
                    Ok(features) => features,
                    Err(e) => {
                        warn!(error = %e, "unusable frame");
                        continue;
                    }
                };
                match classifier.classify(&features) {
                    Ok(result) => {
                        tracing::debug!(
                            label = %result.label,
                            confidence = result.confidence,
                            phrase = builder.phrase(),
                            "frame classified"
                        );
                        builder.observe(result);
                    }
                    Err(e) => warn!(error = %e, "classification failed for frame"),
                }
            }
            CaptureEvent::Key { key: KeyEvent::Commit } => match builder.commit() {
                CommitOutcome::Appended(label) => {
                    info!(%label, phrase = builder.phrase(), "letter added")
                }
                CommitOutcome::NotReady => info!("no confident detection to add"),
                CommitOutcome::Debounced => {}
            },
            CaptureEvent::Key { key: KeyEvent::Undo } => {
                if builder.undo() {
                    info!(phrase = builder.phrase(), "last letter removed");
                }
            }
            CaptureEvent::Key { key: KeyEvent::Flush } => match builder.flush() {
                Some(phrase) => send_phrase(
                    &phrase,
                    &catalog,
                    transport.as_mut(),
                    &retry,
                    mailbox.as_mut(),
                    notifier.as_ref(),
                ),
                None => info!("buffer empty, nothing to send"),
            },
            CaptureEvent::Key { key: KeyEvent::Quit } => break,
            CaptureEvent::Label { .. } => {
                warn!("label event outside record mode, ignoring");
            }
        }
    }

    info!("capture loop finished");
    Ok(())
}

/// Send one flushed phrase: publish the routed messages, then leave the
/// phrase in the mailbox and ring the voice side. Neither a lost message
/// nor a failed relay stops the capture loop.
fn send_phrase(
    phrase: &str,
    catalog: &SignCatalog,
    transport: &mut dyn Transport,
    retry: &RetryPolicy,
    mailbox: &mut dyn Mailbox,
    notifier: &dyn Notifier,
) {
    info!(%phrase, "sending phrase");
    for message in route(phrase, catalog) {
        if let Err(e) = publish_message(transport, &message, retry) {
            error!(token = %message.token, error = %e, "dispatch failed");
        }
    }
    if let Err(e) = relay_word(mailbox, notifier, phrase) {
        error!(error = %e, "relay failed, voice side not notified");
    }
}

/// Record mode: frames keep the latest landmark snapshot fresh, and a
/// label event saves that snapshot as one training sample.
fn record(dataset: &Path) -> Result<()> {
    let mut latest: Option<HandLandmarks> = None;
    let mut saved = 0usize;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading capture event")?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<CaptureEvent>(&line) {
            Ok(CaptureEvent::Frame { points }) => {
                if points.len() == LANDMARK_POINTS {
                    latest = Some(HandLandmarks { points });
                } else {
                    warn!(points = points.len(), "partial hand frame, skipping");
                }
            }
            Ok(CaptureEvent::Key { key: KeyEvent::Quit }) => break,
            Ok(CaptureEvent::Key { .. }) => {}
            Ok(CaptureEvent::Label { label }) => {
                let Some(frame) = latest.as_ref() else {
                    warn!(%label, "no frame seen yet, sample skipped");
                    continue;
                };
                let features = feature_vector(frame)?;
                append_sample(dataset, &Sample { label: label.clone(), features })?;
                saved += 1;
                info!(%label, saved, "sample recorded");
            }
            Err(e) => warn!(error = %e, "dropping malformed event"),
        }
    }

    info!(saved, dataset = %dataset.display(), "recording finished");
    Ok(())
}

fn train(dataset: &Path, model: &Path) -> Result<()> {
    let samples = load_samples(dataset).context("loading dataset")?;
    info!(samples = samples.len(), "fitting model");
    let classifier = CentroidClassifier::fit(&samples).context("fitting model")?;
    classifier.save(model).context("saving model artifact")?;
    info!(
        labels = classifier.labels().len(),
        model = %model.display(),
        "model written"
    );
    Ok(())
}

fn make_transport(broker: &BrokerArgs) -> Result<Box<dyn Transport>> {
    match &broker.broker {
        Some(host) => {
            #[cfg(feature = "mqtt")]
            {
                let config = sign_dispatch::MqttConfig {
                    client_id: "capture-daemon".to_owned(),
                    host: host.clone(),
                    port: broker.port,
                    ca_path: broker.ca.clone(),
                    cert_path: broker.cert.clone(),
                    key_path: broker.key.clone(),
                    keep_alive: Duration::from_secs(30),
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

fn make_relay(relay: &RelayArgs) -> Result<(Box<dyn Mailbox>, Box<dyn Notifier>)> {
    let mailbox: Box<dyn Mailbox> = match (&relay.shadow_endpoint, &relay.thing) {
        (Some(endpoint), Some(thing)) => {
            #[cfg(feature = "http")]
            {
                Box::new(shadow_relay::ShadowMailbox::new(endpoint, thing)?)
            }
            #[cfg(not(feature = "http"))]
            {
                anyhow::bail!(
                    "shadow mailbox for {thing} at {endpoint} requested but built without the http feature"
                )
            }
        }
        (None, None) => {
            info!("no shadow endpoint configured, relayed phrases stay in process");
            Box::new(MemoryMailbox::default())
        }
        _ => anyhow::bail!("shadow mailbox requires both --shadow-endpoint and --thing"),
    };

    let notifier: Box<dyn Notifier> = match (&relay.notify_client_id, &relay.notify_client_secret) {
        (Some(id), Some(secret)) => {
            #[cfg(feature = "http")]
            {
                Box::new(shadow_relay::ProactiveNotifier::new(
                    id.clone(),
                    secret.clone(),
                )?)
            }
            #[cfg(not(feature = "http"))]
            {
                let _ = secret;
                anyhow::bail!(
                    "proactive notifications for client {id} requested but built without the http feature"
                )
            }
        }
        (None, None) => Box::new(LogNotifier),
        _ => anyhow::bail!(
            "proactive notifications require both --notify-client-id and --notify-client-secret"
        ),
    };

    Ok((mailbox, notifier))
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

#[cfg(test)]
mod tests {
    use super::*;
    use sign_dispatch::MockTransport;
    use std::fs::File;

    fn catalog_with(names: &[&str]) -> SignCatalog {
        let tmp = tempfile::tempdir().unwrap();
        for name in names {
            File::create(tmp.path().join(format!("{name}.d6a"))).unwrap();
        }
        SignCatalog::load(tmp.path()).unwrap()
    }

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    #[test]
    fn flushed_phrase_is_published_and_relayed() {
        let catalog = catalog_with(&["word_hola"]);
        let mut transport = MockTransport::default();
        let mut mailbox = MemoryMailbox::default();

        send_phrase(
            "hola",
            &catalog,
            &mut transport,
            &fast_retry(),
            &mut mailbox,
            &LogNotifier,
        );

        assert_eq!(transport.published().len(), 2);
        assert_eq!(mailbox.peek().unwrap().as_deref(), Some("hola"));
    }

    #[test]
    fn relay_still_runs_after_dispatch_failure() {
        let catalog = catalog_with(&["word_hola"]);
        let mut transport = MockTransport::failing_first(u32::MAX);
        let mut mailbox = MemoryMailbox::default();

        send_phrase(
            "hola",
            &catalog,
            &mut transport,
            &fast_retry(),
            &mut mailbox,
            &LogNotifier,
        );

        // The voice side still gets the phrase even when the arm side
        // never heard it.
        assert_eq!(mailbox.peek().unwrap().as_deref(), Some("hola"));
    }
}
