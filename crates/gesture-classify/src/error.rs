use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = ClassifyError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("model artifact unavailable: {path}: {reason}")]
    ModelUnavailable { path: PathBuf, reason: String },
    #[error("invalid input: {0}")]
    BadInput(&'static str),
    #[error("dataset I/O error: {0}")]
    Dataset(String),
}
