//! sign-catalog: gesture catalog loading and phrase segmentation
//!
//! A catalog maps normalized keys to sign resources (arm action-group
//! files). Whole-word gestures are declared as `word_<name>.<ext>`,
//! single-letter gestures as `letter_<name>.<ext>`. The segmenter maps a
//! free-text phrase onto an ordered sequence of catalog entries,
//! preferring whole-word signs and spelling out everything else.

mod catalog;
mod error;
mod normalize;
mod segment;
mod types;

pub use catalog::{SignCatalog, DEFAULT_EXTENSIONS};
pub use error::{CatalogError, Result};
pub use normalize::normalize;
pub use segment::segment;
pub use types::{SignEntry, SignKind};
