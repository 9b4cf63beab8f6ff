use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct PauseEntry {
    key: String,
    seconds: f64,
}

/// Extra hold time after specific signs, so slow gestures finish before
/// the next one starts. Stored as a JSON list of `{key, seconds}`
/// entries; a list, not a map, so duplicate keys can be rejected instead
/// of silently overwriting each other.
#[derive(Debug, Default)]
pub struct PauseTable {
    pauses: HashMap<String, Duration>,
}

impl PauseTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading pause table: {}", path.display()))?;
        let entries: Vec<PauseEntry> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing pause table: {}", path.display()))?;

        let mut pauses = HashMap::new();
        for entry in entries {
            if entry.seconds < 0.0 {
                bail!("negative pause for key '{}'", entry.key);
            }
            let key = sign_catalog::normalize(&entry.key);
            if pauses
                .insert(key.clone(), Duration::from_secs_f64(entry.seconds))
                .is_some()
            {
                bail!("duplicate pause table key '{key}'");
            }
        }
        Ok(Self { pauses })
    }

    pub fn pause_for(&self, token: &str) -> Option<Duration> {
        self.pauses.get(&sign_catalog::normalize(token)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_table(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_and_looks_up_normalized_keys() {
        let file = write_table(r#"[{"key":"z","seconds":2.0},{"key":"Sí","seconds":1.5}]"#);
        let table = PauseTable::load(file.path()).unwrap();
        assert_eq!(table.pause_for("z"), Some(Duration::from_secs(2)));
        assert_eq!(table.pause_for("si"), Some(Duration::from_millis(1500)));
        assert_eq!(table.pause_for("q"), None);
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let file = write_table(r#"[{"key":"w","seconds":0.5},{"key":"w","seconds":3.5}]"#);
        let err = PauseTable::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn keys_that_normalize_together_count_as_duplicates() {
        let file = write_table(r#"[{"key":"ñ","seconds":1.0},{"key":"n","seconds":0.5}]"#);
        assert!(PauseTable::load(file.path()).is_err());
    }

    #[test]
    fn negative_pauses_are_rejected() {
        let file = write_table(r#"[{"key":"j","seconds":-1.0}]"#);
        assert!(PauseTable::load(file.path()).is_err());
    }
}
