use serde::{Deserialize, Serialize};

/// Landmark count produced by the external hand tracker.
pub const LANDMARK_POINTS: usize = 21;

/// One frame's worth of hand landmarks, normalized image coordinates.
/// Point 0 is the wrist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandLandmarks {
    pub points: Vec<[f32; 2]>,
}

/// Label plus confidence for one processed frame. Transient; never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    /// 0.0 to 1.0.
    pub confidence: f32,
}
