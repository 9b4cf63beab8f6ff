use thiserror::Error;

pub type Result<T, E = IntentError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum IntentError {
    #[error("missing slot: {0}")]
    MissingSlot(&'static str),
    #[error("dispatch failed: {0}")]
    Dispatch(#[from] sign_dispatch::TransportError),
    #[error("mailbox failed: {0}")]
    Mailbox(#[from] shadow_relay::RelayError),
}
