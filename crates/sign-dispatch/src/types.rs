use crate::error::{Result, TransportError};
use serde::{Deserialize, Serialize};

/// How the consumer should render a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchMode {
    /// One gesture for the whole word.
    #[serde(rename = "whole-sign")]
    WholeSign,
    /// The word is spelled letter by letter on the consumer side.
    #[serde(rename = "spell-out")]
    SpellOut,
}

/// Fixed logical output channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Channel {
    LeftHand,
    RightHand,
    Spelling,
}

impl Channel {
    /// Broker topic this channel maps to.
    pub fn topic(self) -> &'static str {
        match self {
            Channel::LeftHand => "translator/left-hand",
            Channel::RightHand => "translator/right-hand",
            Channel::Spelling => "translator/spelling",
        }
    }

    pub fn from_topic(topic: &str) -> Option<Self> {
        match topic {
            "translator/left-hand" => Some(Channel::LeftHand),
            "translator/right-hand" => Some(Channel::RightHand),
            "translator/spelling" => Some(Channel::Spelling),
            _ => None,
        }
    }

    pub const ALL: [Channel; 3] = [Channel::LeftHand, Channel::RightHand, Channel::Spelling];
}

/// The wire unit: what actually travels over a channel topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignCommand {
    pub mode: DispatchMode,
    pub token: String,
}

impl SignCommand {
    pub fn to_wire(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| TransportError::Payload(e.to_string()))
    }

    pub fn from_wire(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| TransportError::Payload(e.to_string()))
    }
}

/// One routing decision: a command plus the channels it targets.
/// Constructed per token and handed straight to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchMessage {
    pub mode: DispatchMode,
    pub token: String,
    pub targets: Vec<Channel>,
}

impl DispatchMessage {
    pub fn command(&self) -> SignCommand {
        SignCommand {
            mode: self.mode,
            token: self.token.clone(),
        }
    }
}
