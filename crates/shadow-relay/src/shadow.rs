//! Device-shadow REST client used as the mailbox backend.

use crate::error::{RelayError, Result};
use crate::mailbox::Mailbox;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const SHADOW_FIELD: &str = "last_sign";

#[derive(Debug, Deserialize)]
struct ShadowDocument {
    state: ShadowState,
}

#[derive(Debug, Deserialize)]
struct ShadowState {
    #[serde(default)]
    reported: serde_json::Map<String, serde_json::Value>,
}

/// Mailbox over the device-shadow HTTP API: the slot is the `last_sign`
/// field of the thing's reported state, cleared by writing `null`.
pub struct ShadowMailbox {
    client: reqwest::blocking::Client,
    shadow_url: String,
}

impl ShadowMailbox {
    pub fn new(endpoint: &str, thing_name: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| RelayError::Shadow(e.to_string()))?;
        Ok(Self {
            client,
            shadow_url: format!("https://{endpoint}/things/{thing_name}/shadow"),
        })
    }

    fn write_field(&self, value: serde_json::Value) -> Result<()> {
        let body = json!({ "state": { "reported": { SHADOW_FIELD: value } } });
        let resp = self
            .client
            .post(&self.shadow_url)
            .json(&body)
            .send()
            .map_err(|e| RelayError::Shadow(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(RelayError::Shadow(format!("HTTP {}", resp.status())));
        }
        Ok(())
    }
}

impl Mailbox for ShadowMailbox {
    fn store(&mut self, word: &str) -> Result<()> {
        self.write_field(json!(word))
    }

    fn peek(&self) -> Result<Option<String>> {
        let resp = self
            .client
            .get(&self.shadow_url)
            .send()
            .map_err(|e| RelayError::Shadow(e.to_string()))?;
        if resp.status().as_u16() == 404 {
            // No shadow document yet means an empty slot, not a fault.
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(RelayError::Shadow(format!("HTTP {}", resp.status())));
        }
        let doc: ShadowDocument = resp.json().map_err(|e| RelayError::Shadow(e.to_string()))?;
        Ok(doc
            .state
            .reported
            .get(SHADOW_FIELD)
            .and_then(|v| v.as_str())
            .map(str::to_owned))
    }

    fn clear(&mut self) -> Result<()> {
        self.write_field(serde_json::Value::Null)
    }
}
