use deunicode::deunicode_char;

/// Normalize free text for catalog lookup: lowercase, fold accented
/// characters to their ASCII equivalents, drop punctuation, collapse
/// runs of whitespace to single spaces. Underscores and hyphens read as
/// word separators, so a resource stem like `te_quiero` yields the same
/// key as the spoken phrase "te quiero".
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() || ch == '_' || ch == '-' {
            pending_space = !out.is_empty();
            continue;
        }
        let folded = match deunicode_char(ch) {
            Some(ascii) => ascii,
            None => continue,
        };
        for fc in folded.chars() {
            if fc.is_ascii_alphanumeric() {
                if pending_space {
                    out.push(' ');
                    pending_space = false;
                }
                out.push(fc.to_ascii_lowercase());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(normalize("Hola, Mundo!"), "hola mundo");
    }

    #[test]
    fn folds_accents() {
        assert_eq!(normalize("adiós corazón"), "adios corazon");
        assert_eq!(normalize("niño"), "nino");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(normalize("  te   quiero \n mucho "), "te quiero mucho");
    }

    #[test]
    fn underscores_and_hyphens_separate_words() {
        assert_eq!(normalize("te_quiero"), "te quiero");
        assert_eq!(normalize("buenos-días"), "buenos dias");
        assert_eq!(normalize("_te__quiero_"), "te quiero");
    }

    #[test]
    fn empty_and_punctuation_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("¿¡...!?"), "");
    }
}
