use thiserror::Error;

pub type Result<T, E = RelayError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("shadow access failed: {0}")]
    Shadow(String),
    #[error("token exchange failed: {0}")]
    Auth(String),
    #[error("notification failed: {0}")]
    Notify(String),
}
