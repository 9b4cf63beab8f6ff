use crate::error::{ClassifyError, Result};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// One labeled training sample: the key the operator pressed while
/// holding the gesture, plus the shaped feature vector for that frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    pub label: String,
    pub features: Vec<f32>,
}

/// Append one sample to a JSONL dataset file, creating it on first use.
pub fn append_sample(path: impl AsRef<Path>, sample: &Sample) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path.as_ref())
        .map_err(|e| ClassifyError::Dataset(e.to_string()))?;
    let line = serde_json::to_string(sample).map_err(|e| ClassifyError::Dataset(e.to_string()))?;
    writeln!(file, "{line}").map_err(|e| ClassifyError::Dataset(e.to_string()))
}

/// Load every sample from a JSONL dataset file. Blank lines are skipped;
/// a malformed line is an error rather than silently dropped data.
pub fn load_samples(path: impl AsRef<Path>) -> Result<Vec<Sample>> {
    let file = File::open(path.as_ref()).map_err(|e| ClassifyError::Dataset(e.to_string()))?;
    let mut samples = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| ClassifyError::Dataset(e.to_string()))?;
        if line.trim().is_empty() {
            continue;
        }
        let sample: Sample = serde_json::from_str(&line)
            .map_err(|e| ClassifyError::Dataset(format!("line {}: {e}", idx + 1)))?;
        samples.push(sample);
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_load_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("hand_data.jsonl");

        let a = Sample {
            label: "v".into(),
            features: vec![0.1, 0.2],
        };
        let b = Sample {
            label: "l".into(),
            features: vec![0.3, 0.4],
        };
        append_sample(&path, &a).unwrap();
        append_sample(&path, &b).unwrap();

        let loaded = load_samples(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].label, "v");
        assert_eq!(loaded[1].features, vec![0.3, 0.4]);
    }

    #[test]
    fn malformed_line_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.jsonl");
        std::fs::write(&path, "{\"label\":\"a\",\"features\":[0.1]}\nnot json\n").unwrap();

        let err = load_samples(&path).unwrap_err();
        assert!(matches!(err, ClassifyError::Dataset(msg) if msg.contains("line 2")));
    }
}
