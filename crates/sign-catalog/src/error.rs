use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = CatalogError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog directory unreadable: {path}: {source}")]
    DirUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("duplicate catalog key: {0}")]
    DuplicateKey(String),
}
