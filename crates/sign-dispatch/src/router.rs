use crate::types::{Channel, DispatchMessage, DispatchMode};
use sign_catalog::{normalize, SignCatalog};

/// Decide, per stretch of `phrase`, whether the arm plays a whole sign
/// or spells a word out. Whole signs match greedily (a multi-word key
/// like `te quiero` consumes both words) and go to both hand channels;
/// an unmatched word goes to the spelling channel as a single token and
/// is expanded letter by letter downstream. Pure given the catalog;
/// order preserved.
pub fn route(phrase: &str, catalog: &SignCatalog) -> Vec<DispatchMessage> {
    let normalized = normalize(phrase);
    let words: Vec<&str> = normalized.split_whitespace().collect();
    let mut messages = Vec::new();
    let mut i = 0;
    while i < words.len() {
        match catalog.longest_word_match(&words[i..]) {
            Some((entry, span)) => {
                messages.push(DispatchMessage {
                    mode: DispatchMode::WholeSign,
                    token: entry.key.clone(),
                    targets: vec![Channel::LeftHand, Channel::RightHand],
                });
                i += span;
            }
            None => {
                messages.push(DispatchMessage {
                    mode: DispatchMode::SpellOut,
                    token: words[i].to_owned(),
                    targets: vec![Channel::Spelling],
                });
                i += 1;
            }
        }
    }
    messages
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
        SignCatalog::load(tmp.path()).unwrap()
    }

    #[test]
    fn known_words_go_to_both_hands() {
        let catalog = catalog_with(&["word_hola"]);
        let msgs = route("hola", &catalog);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].mode, DispatchMode::WholeSign);
        assert_eq!(msgs[0].targets, vec![Channel::LeftHand, Channel::RightHand]);
    }

    #[test]
    fn unknown_words_are_spelled_on_the_spelling_channel() {
        let catalog = catalog_with(&["word_hola"]);
        let msgs = route("mundo", &catalog);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].mode, DispatchMode::SpellOut);
        assert_eq!(msgs[0].token, "mundo");
        assert_eq!(msgs[0].targets, vec![Channel::Spelling]);
    }

    #[test]
    fn mixed_phrase_preserves_order() {
        let catalog = catalog_with(&["word_hola", "word_gracias"]);
        let msgs = route("hola mundo gracias", &catalog);
        let modes: Vec<DispatchMode> = msgs.iter().map(|m| m.mode).collect();
        assert_eq!(
            modes,
            vec![
                DispatchMode::WholeSign,
                DispatchMode::SpellOut,
                DispatchMode::WholeSign
            ]
        );
    }

    #[test]
    fn multi_word_signs_route_as_one_whole_sign() {
        let catalog = catalog_with(&["word_te", "word_te_quiero"]);
        let msgs = route("te quiero mucho", &catalog);
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].mode, DispatchMode::WholeSign);
        assert_eq!(msgs[0].token, "te quiero");
        assert_eq!(msgs[1].mode, DispatchMode::SpellOut);
        assert_eq!(msgs[1].token, "mucho");
    }

    #[test]
    fn letter_entries_do_not_count_as_whole_signs() {
        let catalog = catalog_with(&["letter_h", "letter_i"]);
        let msgs = route("hi", &catalog);
        assert_eq!(msgs[0].mode, DispatchMode::SpellOut);
    }

    #[test]
    fn flushed_buffer_of_n_commits_routes_as_one_spell_out() {
        // Round-trip with the phrase builder's contract: N commits of a
        // label with no word entry become one token of length N.
        let catalog = catalog_with(&["word_hola"]);
        let flushed = "kkkk";
        let msgs = route(flushed, &catalog);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].mode, DispatchMode::SpellOut);
        assert_eq!(msgs[0].token.chars().count(), 4);
    }
}
