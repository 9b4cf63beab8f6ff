use crate::dataset::Sample;
use crate::error::{ClassifyError, Result};
use crate::traits::FrameClassifier;
use crate::types::Classification;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const MODEL_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct ModelFile {
    version: u32,
    dim: usize,
    classes: Vec<ClassCentroid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ClassCentroid {
    label: String,
    centroid: Vec<f32>,
}

/// Nearest-centroid classifier over shaped landmark features.
///
/// Confidence is the best class's inverse-distance weight normalized
/// over all classes, so a frame equidistant from two centroids scores
/// near 0.5 and a clean match scores near 1.0.
#[derive(Debug, Clone)]
pub struct CentroidClassifier {
    dim: usize,
    classes: Vec<ClassCentroid>,
}

impl CentroidClassifier {
    /// Load a trained model artifact. Any failure here is fatal at
    /// process start: without a model there is nothing to classify.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let unavailable = |reason: String| ClassifyError::ModelUnavailable {
            path: path.to_path_buf(),
            reason,
        };
        let raw = fs::read_to_string(path).map_err(|e| unavailable(e.to_string()))?;
        let file: ModelFile = serde_json::from_str(&raw).map_err(|e| unavailable(e.to_string()))?;
        if file.version != MODEL_VERSION {
            return Err(unavailable(format!(
                "unsupported model version {}",
                file.version
            )));
        }
        if file.classes.is_empty() {
            return Err(unavailable("model has no classes".into()));
        }
        for class in &file.classes {
            if class.centroid.len() != file.dim {
                return Err(unavailable(format!(
                    "centroid for '{}' has dim {}, expected {}",
                    class.label,
                    class.centroid.len(),
                    file.dim
                )));
            }
        }
        tracing::info!(
            model = %path.display(),
            classes = file.classes.len(),
            dim = file.dim,
            "gesture model loaded"
        );
        Ok(Self {
            dim: file.dim,
            classes: file.classes,
        })
    }

    /// Build a model from labeled samples by averaging each label's
    /// feature vectors.
    pub fn fit(samples: &[Sample]) -> Result<Self> {
        let Some(first) = samples.first() else {
            return Err(ClassifyError::BadInput("no training samples"));
        };
        let dim = first.features.len();
        if dim == 0 {
            return Err(ClassifyError::BadInput("zero-length feature vectors"));
        }

        let mut sums: BTreeMap<&str, (Vec<f64>, usize)> = BTreeMap::new();
        for sample in samples {
            if sample.features.len() != dim {
                return Err(ClassifyError::BadInput(
                    "inconsistent feature dimensions across samples",
                ));
            }
            let slot = sums
                .entry(sample.label.as_str())
                .or_insert_with(|| (vec![0.0; dim], 0));
            for (acc, v) in slot.0.iter_mut().zip(&sample.features) {
                *acc += f64::from(*v);
            }
            slot.1 += 1;
        }

        let classes = sums
            .into_iter()
            .map(|(label, (sum, count))| ClassCentroid {
                label: label.to_owned(),
                centroid: sum.iter().map(|v| (*v / count as f64) as f32).collect(),
            })
            .collect();
        Ok(Self { dim, classes })
    }

    /// Persist the model as a JSON artifact readable by [`Self::load`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = ModelFile {
            version: MODEL_VERSION,
            dim: self.dim,
            classes: self.classes.clone(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| ClassifyError::Dataset(e.to_string()))?;
        fs::write(path.as_ref(), json).map_err(|e| ClassifyError::Dataset(e.to_string()))
    }
}

impl FrameClassifier for CentroidClassifier {
    fn classify(&self, features: &[f32]) -> Result<Classification> {
        if features.len() != self.dim {
            return Err(ClassifyError::BadInput("feature dimension mismatch"));
        }

        let mut best: Option<(&str, f64)> = None;
        let mut weight_sum = 0.0f64;
        let mut best_weight = 0.0f64;
        for class in &self.classes {
            let dist: f64 = class
                .centroid
                .iter()
                .zip(features)
                .map(|(c, f)| {
                    let d = f64::from(c - f);
                    d * d
                })
                .sum::<f64>()
                .sqrt();
            let weight = 1.0 / (dist + 1e-6);
            weight_sum += weight;
            if best.map_or(true, |(_, b)| weight > b) {
                best = Some((class.label.as_str(), weight));
                best_weight = weight;
            }
        }

        let (label, _) = best.ok_or(ClassifyError::BadInput("model has no classes"))?;
        Ok(Classification {
            label: label.to_owned(),
            confidence: (best_weight / weight_sum) as f32,
        })
    }

    fn labels(&self) -> Vec<String> {
        self.classes.iter().map(|c| c.label.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(label: &str, features: &[f32]) -> Sample {
        Sample {
            label: label.to_owned(),
            features: features.to_vec(),
        }
    }

    fn two_class_model() -> CentroidClassifier {
        CentroidClassifier::fit(&[
            sample("a", &[0.0, 0.0]),
            sample("a", &[0.2, 0.0]),
            sample("b", &[1.0, 1.0]),
            sample("b", &[0.8, 1.0]),
        ])
        .unwrap()
    }

    #[test]
    fn classifies_near_the_centroid() {
        let model = two_class_model();
        let c = model.classify(&[0.05, 0.02]).unwrap();
        assert_eq!(c.label, "a");
        assert!(c.confidence > 0.85, "confidence was {}", c.confidence);
    }

    #[test]
    fn ambiguous_frames_score_low() {
        let model = two_class_model();
        // Midpoint between the two centroids.
        let c = model.classify(&[0.5, 0.5]).unwrap();
        assert!(c.confidence < 0.6, "confidence was {}", c.confidence);
    }

    #[test]
    fn rejects_dimension_mismatch() {
        let model = two_class_model();
        assert!(matches!(
            model.classify(&[0.1]),
            Err(ClassifyError::BadInput(_))
        ));
    }

    #[test]
    fn fit_rejects_inconsistent_samples() {
        let err = CentroidClassifier::fit(&[sample("a", &[0.0, 0.0]), sample("b", &[0.0])])
            .unwrap_err();
        assert!(matches!(err, ClassifyError::BadInput(_)));
    }

    #[test]
    fn save_then_load_round_trip() {
        let model = two_class_model();
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("model.json");
        model.save(&path).unwrap();

        let loaded = CentroidClassifier::load(&path).unwrap();
        assert_eq!(loaded.labels(), vec!["a".to_owned(), "b".to_owned()]);
        assert_eq!(loaded.classify(&[0.9, 1.0]).unwrap().label, "b");
    }

    #[test]
    fn missing_artifact_is_model_unavailable() {
        let err = CentroidClassifier::load("/nonexistent/model.json").unwrap_err();
        assert!(matches!(err, ClassifyError::ModelUnavailable { .. }));
    }
}
