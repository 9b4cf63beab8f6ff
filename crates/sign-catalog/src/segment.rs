use crate::catalog::SignCatalog;
use crate::normalize::normalize;
use crate::types::{SignEntry, SignKind};

/// Map a free-text phrase onto an ordered sequence of catalog entries.
///
/// Whole-word signs are tried first, longest key winning so multi-word
/// gestures like `te quiero` match before a bare `te`; a word with no
/// whole-sign entry is spelled letter by letter, silently skipping
/// characters the catalog does not know. Words with zero hits contribute
/// nothing. Deterministic for a given catalog; no I/O.
pub fn segment(phrase: &str, catalog: &SignCatalog) -> Vec<SignEntry> {
    let normalized = normalize(phrase);
    let words: Vec<&str> = normalized.split_whitespace().collect();
    let mut sequence = Vec::new();
    let mut i = 0;
    while i < words.len() {
        if let Some((entry, span)) = catalog.longest_word_match(&words[i..]) {
            sequence.push(entry.clone());
            i += span;
            continue;
        }
        let mut buf = [0u8; 4];
        for ch in words[i].chars() {
            let letter: &str = ch.encode_utf8(&mut buf);
            if let Some(entry) = catalog.lookup_kind(letter, SignKind::Letter) {
                sequence.push(entry.clone());
            } else {
                tracing::trace!(%letter, "no letter sign, skipping");
            }
        }
        i += 1;
    }
    sequence
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn catalog_with(names: &[&str]) -> SignCatalog {
        let tmp = tempfile::tempdir().unwrap();
        for name in names {
            File::create(tmp.path().join(format!("{name}.d6a"))).unwrap();
        }
        // Catalog clones resource paths eagerly; dropping tmp afterwards
        // is fine for lookup-only tests.
        SignCatalog::load(tmp.path()).unwrap()
    }

    fn keys(entries: &[SignEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.key.as_str()).collect()
    }

    #[test]
    fn prefers_whole_word_over_spelling() {
        let catalog = catalog_with(&["word_hola", "letter_h", "letter_o", "letter_l", "letter_a"]);
        let seq = segment("hola", &catalog);
        assert_eq!(keys(&seq), vec!["hola"]);
        assert_eq!(seq[0].kind, SignKind::Word);
    }

    #[test]
    fn spells_unknown_words() {
        let catalog = catalog_with(&["word_hola", "letter_h", "letter_i"]);
        let seq = segment("hi", &catalog);
        assert_eq!(keys(&seq), vec!["h", "i"]);
        assert!(seq.iter().all(|e| e.kind == SignKind::Letter));
    }

    #[test]
    fn skips_letters_without_entries() {
        let catalog = catalog_with(&["letter_h", "letter_a"]);
        let seq = segment("haz", &catalog);
        assert_eq!(keys(&seq), vec!["h", "a"]);
    }

    #[test]
    fn fully_absent_phrase_yields_empty_sequence() {
        let catalog = catalog_with(&["letter_a"]);
        assert!(segment("xyz", &catalog).is_empty());
        assert!(segment("", &catalog).is_empty());
    }

    #[test]
    fn preserves_word_and_letter_order() {
        let catalog = catalog_with(&["word_te", "letter_o", "letter_k"]);
        let seq = segment("te ok", &catalog);
        assert_eq!(keys(&seq), vec!["te", "o", "k"]);
    }

    #[test]
    fn multi_word_signs_match_greedily() {
        let catalog = catalog_with(&["word_te", "word_te_quiero", "letter_o"]);
        let seq = segment("te quiero", &catalog);
        assert_eq!(keys(&seq), vec!["te quiero"]);

        // A bare "te" still matches its own entry.
        let seq = segment("te o", &catalog);
        assert_eq!(keys(&seq), vec!["te", "o"]);
    }

    #[test]
    fn is_deterministic() {
        let catalog = catalog_with(&["word_hola", "letter_h", "letter_i"]);
        let a = segment("hola hi", &catalog);
        let b = segment("hola hi", &catalog);
        assert_eq!(a, b);
    }

    #[test]
    fn normalizes_before_matching() {
        let catalog = catalog_with(&["word_adios"]);
        let seq = segment("¡Adiós!", &catalog);
        assert_eq!(keys(&seq), vec!["adios"]);
    }
}
