//! MQTT transport for the IoT broker, client-certificate TLS.

use crate::error::{Result, TransportError};
use crate::traits::Transport;
use crate::types::Channel;
use rumqttc::{Client, Event, Incoming, MqttOptions, QoS, TlsConfiguration};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct MqttConfig {
    pub client_id: String,
    pub host: String,
    pub port: u16,
    /// Root CA, client certificate and private key, PEM. All three or
    /// none: the broker either requires mutual TLS or runs plaintext
    /// (local development only).
    pub ca_path: Option<PathBuf>,
    pub cert_path: Option<PathBuf>,
    pub key_path: Option<PathBuf>,
    pub keep_alive: Duration,
}

impl MqttConfig {
    fn options(&self) -> Result<MqttOptions> {
        let mut options = MqttOptions::new(&self.client_id, &self.host, self.port);
        options.set_keep_alive(self.keep_alive);
        match (&self.ca_path, &self.cert_path, &self.key_path) {
            (Some(ca), Some(cert), Some(key)) => {
                let read = |p: &PathBuf| {
                    fs::read(p).map_err(|e| {
                        TransportError::Connection(format!("{}: {e}", p.display()))
                    })
                };
                options.set_transport(rumqttc::Transport::Tls(TlsConfiguration::Simple {
                    ca: read(ca)?,
                    alpn: None,
                    client_auth: Some((read(cert)?, read(key)?)),
                }));
            }
            (None, None, None) => {
                tracing::warn!("mqtt transport without TLS, development use only");
            }
            _ => {
                return Err(TransportError::Connection(
                    "TLS requires ca, cert and key paths together".to_owned(),
                ));
            }
        }
        Ok(options)
    }
}

/// Publishing side. The event loop is driven on a background thread so
/// `publish` only enqueues; delivery is at-least-once (QoS 1).
pub struct MqttTransport {
    client: Client,
}

impl MqttTransport {
    pub fn connect(config: &MqttConfig) -> Result<Self> {
        let options = config.options()?;
        let (client, mut connection) = Client::new(options, 10);
        std::thread::spawn(move || {
            for event in connection.iter() {
                match event {
                    Ok(event) => tracing::trace!(?event, "mqtt event"),
                    Err(e) => {
                        tracing::warn!(error = %e, "mqtt connection error, reconnecting");
                        std::thread::sleep(Duration::from_secs(1));
                    }
                }
            }
        });
        tracing::info!(host = %config.host, port = config.port, "mqtt transport connected");
        Ok(Self { client })
    }
}

impl Transport for MqttTransport {
    fn publish(&mut self, channel: Channel, payload: &[u8]) -> Result<()> {
        self.client
            .publish(channel.topic(), QoS::AtLeastOnce, false, payload)
            .map_err(|e| TransportError::Publish(e.to_string()))
    }
}

/// Subscribe to the given channels and hand every inbound message to
/// `on_message`. Connection errors are logged and the loop keeps going;
/// the client reconnects on the next iteration.
pub fn subscribe_loop(
    config: &MqttConfig,
    channels: &[Channel],
    mut on_message: impl FnMut(Channel, &[u8]),
) -> Result<()> {
    let options = config.options()?;
    let (client, mut connection) = Client::new(options, 10);
    for channel in channels {
        client
            .subscribe(channel.topic(), QoS::AtLeastOnce)
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        tracing::info!(topic = channel.topic(), "subscribed");
    }

    for event in connection.iter() {
        match event {
            Ok(Event::Incoming(Incoming::Publish(publish))) => {
                match Channel::from_topic(&publish.topic) {
                    Some(channel) => on_message(channel, &publish.payload),
                    None => tracing::warn!(topic = %publish.topic, "message on unknown topic"),
                }
            }
            Ok(event) => tracing::trace!(?event, "mqtt event"),
            Err(e) => {
                tracing::warn!(error = %e, "mqtt connection error, retrying");
                std::thread::sleep(Duration::from_secs(1));
            }
        }
    }
    Ok(())
}
