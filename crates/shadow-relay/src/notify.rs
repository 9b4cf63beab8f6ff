//! Proactive-event push: OAuth client-credentials exchange followed by a
//! message-alert event, so the assistant prompts the user without an
//! open session.

use crate::error::{RelayError, Result};
use crate::relay::Notifier;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

const TOKEN_URL: &str = "https://api.amazon.com/auth/o2/token";
const EVENTS_URL: &str = "https://api.amazonalexa.com/v1/proactiveEvents/stages/development";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub struct ProactiveNotifier {
    client: reqwest::blocking::Client,
    client_id: String,
    client_secret: String,
}

impl ProactiveNotifier {
    pub fn new(client_id: String, client_secret: String) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| RelayError::Notify(e.to_string()))?;
        Ok(Self {
            client,
            client_id,
            client_secret,
        })
    }

    fn access_token(&self) -> Result<String> {
        let resp = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", "alexa::proactive_events"),
            ])
            .send()
            .map_err(|e| RelayError::Auth(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(RelayError::Auth(format!("HTTP {}", resp.status())));
        }
        let token: TokenResponse = resp.json().map_err(|e| RelayError::Auth(e.to_string()))?;
        Ok(token.access_token)
    }
}

impl Notifier for ProactiveNotifier {
    fn notify(&self) -> Result<()> {
        let token = self.access_token()?;

        let now = OffsetDateTime::now_utc();
        let expiry = now + time::Duration::hours(1);
        let fmt = |t: OffsetDateTime| {
            t.format(&Rfc3339)
                .map_err(|e| RelayError::Notify(e.to_string()))
        };
        let payload = json!({
            "timestamp": fmt(now)?,
            "referenceId": format!("sign-{}", now.unix_timestamp()),
            "expiryTime": fmt(expiry)?,
            "event": {
                "name": "AMAZON.MessageAlert.Activated",
                "payload": {
                    "state": { "status": "UNREAD", "freshness": "NEW" },
                    "messageGroup": { "creator": { "name": "Robot" }, "count": 1 }
                }
            },
            "relevantAudience": { "type": "Multicast", "payload": {} }
        });

        let resp = self
            .client
            .post(EVENTS_URL)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .map_err(|e| RelayError::Notify(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(RelayError::Notify(format!("HTTP {}", resp.status())));
        }
        tracing::info!("proactive notification delivered");
        Ok(())
    }
}
