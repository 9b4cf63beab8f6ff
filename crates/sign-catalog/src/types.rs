use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Whether an entry stands for a whole word or a single letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignKind {
    Word,
    Letter,
}

/// One gesture the arm knows how to play.
///
/// `resource` is an opaque handle (the action-group file on disk);
/// playback is the arm driver's business, not the catalog's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignEntry {
    /// Normalized word or letter.
    pub key: String,
    pub kind: SignKind,
    pub resource: PathBuf,
}
