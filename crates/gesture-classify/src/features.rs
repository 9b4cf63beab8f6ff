use crate::error::{ClassifyError, Result};
use crate::types::HandLandmarks;

/// Shape raw landmarks into the position-invariant feature vector the
/// classifier was trained on: every point's coordinates relative to the
/// wrist (point 0), interleaved as `(dx, dy)` pairs.
pub fn feature_vector(landmarks: &HandLandmarks) -> Result<Vec<f32>> {
    let Some(base) = landmarks.points.first() else {
        return Err(ClassifyError::BadInput("empty landmark frame"));
    };
    let mut features = Vec::with_capacity(landmarks.points.len() * 2);
    for point in &landmarks.points {
        features.push(point[0] - base[0]);
        features.push(point[1] - base[1]);
    }
    Ok(features)
}
