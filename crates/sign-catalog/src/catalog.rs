use crate::error::{CatalogError, Result};
use crate::normalize::normalize;
use crate::types::{SignEntry, SignKind};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Resource extensions recognized by [`SignCatalog::load`]. `.d6a` is the
/// action-group format the arm firmware plays back.
pub const DEFAULT_EXTENSIONS: &[&str] = &["d6a"];

const WORD_PREFIX: &str = "word_";
const LETTER_PREFIX: &str = "letter_";

/// Read-only mapping from normalized key to [`SignEntry`], built once at
/// startup from a resource directory. Keys may span several words (a
/// resource stem like `word_te_quiero` yields the key `te quiero`).
#[derive(Debug, Default, Clone)]
pub struct SignCatalog {
    entries: HashMap<String, SignEntry>,
    max_key_words: usize,
}

impl SignCatalog {
    /// Scan `dir` for sign resources with the default extension set.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_extensions(dir, DEFAULT_EXTENSIONS)
    }

    /// Scan `dir` for sign resources. Entries are visited in sorted order
    /// so load results are stable across platforms; a duplicate
    /// normalized key is a validation error, not a silent overwrite.
    pub fn load_with_extensions(dir: impl AsRef<Path>, extensions: &[&str]) -> Result<Self> {
        let dir = dir.as_ref();
        let read = fs::read_dir(dir).map_err(|source| CatalogError::DirUnreadable {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in read {
            let entry = entry.map_err(|source| CatalogError::DirUnreadable {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                if extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)) {
                    paths.push(path);
                }
            }
        }
        paths.sort();

        let mut catalog = Self::default();
        for path in paths {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let (kind, raw_key) = if let Some(rest) = stem.strip_prefix(WORD_PREFIX) {
                (SignKind::Word, rest)
            } else if let Some(rest) = stem.strip_prefix(LETTER_PREFIX) {
                (SignKind::Letter, rest)
            } else {
                tracing::debug!(file = %path.display(), "skipping resource without word_/letter_ prefix");
                continue;
            };
            let key = normalize(raw_key);
            if key.is_empty() {
                tracing::warn!(file = %path.display(), "skipping resource with empty key");
                continue;
            }
            catalog.insert(SignEntry {
                key,
                kind,
                resource: path,
            })?;
        }

        tracing::info!(
            dir = %dir.display(),
            entries = catalog.len(),
            "sign catalog loaded"
        );
        Ok(catalog)
    }

    fn insert(&mut self, entry: SignEntry) -> Result<()> {
        if self.entries.contains_key(&entry.key) {
            return Err(CatalogError::DuplicateKey(entry.key));
        }
        self.max_key_words = self.max_key_words.max(entry.key.split_whitespace().count());
        self.entries.insert(entry.key.clone(), entry);
        Ok(())
    }

    /// Exact lookup on a normalized key. No fuzzy matching.
    pub fn lookup(&self, key: &str) -> Option<&SignEntry> {
        self.entries.get(&normalize(key))
    }

    /// Lookup constrained to a specific kind.
    pub fn lookup_kind(&self, key: &str, kind: SignKind) -> Option<&SignEntry> {
        self.lookup(key).filter(|e| e.kind == kind)
    }

    /// Longest whole-word entry matching a prefix of `words`, together
    /// with how many words it consumed. Longer keys win over shorter
    /// ones, so `te quiero` beats a bare `te` entry.
    pub fn longest_word_match(&self, words: &[&str]) -> Option<(&SignEntry, usize)> {
        for span in (1..=self.max_key_words.min(words.len())).rev() {
            let candidate = words[..span].join(" ");
            if let Some(entry) = self.lookup_kind(&candidate, SignKind::Word) {
                return Some((entry, span));
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
