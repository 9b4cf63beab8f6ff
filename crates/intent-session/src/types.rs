use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Inbound request from the voice-assistant runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentRequest {
    /// `LaunchRequest`, `IntentRequest`, `SessionEndedRequest`, ...
    #[serde(rename = "type")]
    pub request_type: String,
    #[serde(rename = "intentName", default)]
    pub intent_name: Option<String>,
    #[serde(default)]
    pub slots: HashMap<String, String>,
    #[serde(rename = "userId")]
    pub user_id: String,
}

impl IntentRequest {
    pub fn launch(user_id: &str) -> Self {
        Self {
            request_type: "LaunchRequest".to_owned(),
            intent_name: None,
            slots: HashMap::new(),
            user_id: user_id.to_owned(),
        }
    }

    pub fn intent(user_id: &str, name: &str) -> Self {
        Self {
            request_type: "IntentRequest".to_owned(),
            intent_name: Some(name.to_owned()),
            slots: HashMap::new(),
            user_id: user_id.to_owned(),
        }
    }

    pub fn with_slot(mut self, name: &str, value: &str) -> Self {
        self.slots.insert(name.to_owned(), value.to_owned());
        self
    }
}

/// Outbound speech plus the session decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentResponse {
    pub text: String,
    #[serde(rename = "endSession")]
    pub end_session: bool,
}

impl IntentResponse {
    pub fn open(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            end_session: false,
        }
    }

    pub fn closing(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            end_session: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_decodes_runtime_shape() {
        let req: IntentRequest = serde_json::from_str(
            r#"{
                "type": "IntentRequest",
                "intentName": "TraducirIntent",
                "slots": {"palabra": "hola mundo"},
                "userId": "u-1"
            }"#,
        )
        .unwrap();
        assert_eq!(req.intent_name.as_deref(), Some("TraducirIntent"));
        assert_eq!(req.slots.get("palabra").map(String::as_str), Some("hola mundo"));
    }

    #[test]
    fn response_encodes_end_session_flag() {
        let json = serde_json::to_string(&IntentResponse::closing("adiós")).unwrap();
        assert!(json.contains("\"endSession\":true"));
    }
}
