//! gesture-classify: per-frame hand-gesture classification
//!
//! Landmark extraction happens in an external vision process; this crate
//! receives raw landmark frames, shapes them into a position-invariant
//! feature vector, and asks a pretrained classifier for a label plus
//! confidence. The bundled backend is a nearest-centroid model stored as
//! a JSON artifact, with a thin record/fit pipeline to produce one.

mod centroid;
mod dataset;
mod error;
mod features;
mod traits;
mod types;

pub use centroid::CentroidClassifier;
pub use dataset::{append_sample, load_samples, Sample};
pub use error::{ClassifyError, Result};
pub use features::feature_vector;
pub use traits::FrameClassifier;
pub use types::{Classification, HandLandmarks, LANDMARK_POINTS};

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::MockClassifier;
