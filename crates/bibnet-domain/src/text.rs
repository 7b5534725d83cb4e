//! Text normalization for comparison keys
//!
//! Two transforms with distinct purposes: [`normalize`] produces the
//! canonical form used for identity and comparison keys, while [`clean`]
//! only unifies dash variants so the value stays human-readable. The two
//! are never interchangeable: keys go through `normalize`, display and
//! storage values through `clean`.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    /// Every Unicode dash variant (the `Pd` category).
    static ref DASHES: Regex = Regex::new(r"\p{Pd}").expect("valid dash pattern");
}

/// Canonicalize text for use as a comparison key.
///
/// Removes diacritics, trims, lowercases, and collapses all dash variants
/// to a plain hyphen. Idempotent. Absent values are carried as `Option` by
/// callers; this function never stands in for a missing value.
pub fn normalize(text: &str) -> String {
    let stripped = remove_diacritics(text);
    let lowered = stripped.trim().to_lowercase();
    DASHES.replace_all(&lowered, "-").into_owned()
}

/// Weak transform for values that must stay readable: only dash
/// unification, no case or diacritic change.
pub fn clean(text: &str) -> String {
    DASHES.replace_all(text, "-").into_owned()
}

/// Strip diacritics via canonical decomposition.
///
/// `ł` and `ø` carry no decomposition, so they are substituted directly.
fn remove_diacritics(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'ł' => 'l',
            'Ł' => 'L',
            'ø' => 'o',
            'Ø' => 'O',
            other => other,
        })
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Derive an initials string from free-form given names.
///
/// Each space- or hyphen-separated token contributes its uppercased first
/// letter followed by a period; hyphens between initials are preserved.
/// `"Jean-Pierre"` becomes `"J.-P."` and `"Mary Jane"` becomes `"M. J."`.
pub fn initials(given_names: &str) -> String {
    given_names
        .split_whitespace()
        .map(|token| {
            token
                .split('-')
                .filter_map(|part| part.chars().next())
                .map(|c| format!("{}.", c.to_uppercase()))
                .collect::<Vec<_>>()
                .join("-")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_diacritics() {
        assert_eq!(normalize("Érdős"), "erdos");
        assert_eq!(normalize("Müller"), "muller");
        assert_eq!(normalize("Łukasz Østergaard"), "lukasz ostergaard");
    }

    #[test]
    fn test_normalize_dashes() {
        // en dash, em dash, figure dash
        assert_eq!(normalize("66\u{2013}70"), "66-70");
        assert_eq!(normalize("state\u{2014}of\u{2012}the-art"), "state-of-the-art");
    }

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize("  Complex NETWORKS  "), "complex networks");
    }

    #[test]
    fn test_clean_preserves_case_and_accents() {
        assert_eq!(clean("Réseaux — complexes"), "Réseaux - complexes");
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("John"), "J.");
        assert_eq!(initials("Mary Jane"), "M. J.");
        assert_eq!(initials("Jean-Pierre"), "J.-P.");
        assert_eq!(initials("Anna Lena-Marie"), "A. L.-M.");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(s in "\\PC*") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn clean_is_idempotent(s in "\\PC*") {
            let once = clean(&s);
            prop_assert_eq!(clean(&once), once);
        }
    }
}
