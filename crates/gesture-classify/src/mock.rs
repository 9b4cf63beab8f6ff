use crate::error::Result;
use crate::traits::FrameClassifier;
use crate::types::Classification;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Scripted classifier for tests and demos: replays a fixed sequence of
/// classifications, then repeats the last one.
pub struct MockClassifier {
    script: Vec<Classification>,
    cursor: AtomicUsize,
}

impl MockClassifier {
    pub fn new(script: Vec<Classification>) -> Self {
        Self {
            script,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Convenience: a script of labels, all at the given confidence.
    pub fn with_labels(labels: &[&str], confidence: f32) -> Self {
        Self::new(
            labels
                .iter()
                .map(|l| Classification {
                    label: (*l).to_owned(),
                    confidence,
                })
                .collect(),
        )
    }
}

impl FrameClassifier for MockClassifier {
    fn classify(&self, _features: &[f32]) -> Result<Classification> {
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed);
        let clamped = idx.min(self.script.len().saturating_sub(1));
        Ok(self
            .script
            .get(clamped)
            .cloned()
            .unwrap_or(Classification {
                label: "?".to_owned(),
                confidence: 0.0,
            }))
    }

    fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.script.iter().map(|c| c.label.clone()).collect();
        labels.sort();
        labels.dedup();
        labels
    }
}
