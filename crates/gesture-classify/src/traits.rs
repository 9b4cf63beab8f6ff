use crate::error::Result;
use crate::types::Classification;

/// Per-frame classifier over a shaped feature vector.
///
/// Implementations are expected to be fully loaded before the capture
/// loop starts; a missing model artifact is fatal at startup, never a
/// per-call condition.
pub trait FrameClassifier: Send + Sync {
    fn classify(&self, features: &[f32]) -> Result<Classification>;

    /// Labels this classifier can emit.
    fn labels(&self) -> Vec<String>;
}
