//! Author representation
//!
//! An author is identified by a canonical key derived from their name.
//! Two `Author` values denote the same person iff their canonical keys are
//! equal; the [`Corpus`](crate::Corpus) author registry enforces one shared
//! instance per key.

use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::text;

/// An author of a publication.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    /// Family name, as displayed.
    pub last_name: String,
    /// Dot-and-space-separated given-name initials, e.g. `"J.-P."`.
    pub initials: String,
    /// Normalized identity key, e.g. `"smith ja"`.
    canonical_key: String,
}

impl Author {
    /// Build an author from a last name and ready-made initials
    /// (uppercase, dot-terminated, space- or hyphen-separated).
    pub fn new(last_name: impl Into<String>, initials: impl Into<String>) -> Self {
        let last_name = last_name.into();
        let initials = initials.into();
        let canonical_key = canonical_key(&last_name, &initials);
        Self {
            last_name,
            initials,
            canonical_key,
        }
    }

    /// Parse a `"Lastname, Firstname1 Firstname2..."` string.
    ///
    /// The given names are reduced to initials. A string without the comma
    /// separator is rejected rather than guessed at.
    pub fn from_full_name(full_name: &str) -> Result<Self, RecordError> {
        let cleaned = text::clean(full_name);
        match cleaned.split_once(", ") {
            Some((last, given)) if !given.trim().is_empty() => {
                Ok(Self::new(last.trim(), text::initials(given)))
            }
            _ => Err(RecordError::MalformedAuthor(cleaned)),
        }
    }

    /// The normalized identity key of this author.
    pub fn canonical_key(&self) -> &str {
        &self.canonical_key
    }

    /// Format as `"Lastname, F. M."`.
    pub fn full_name(&self) -> String {
        if self.initials.is_empty() {
            self.last_name.clone()
        } else {
            format!("{}, {}", self.last_name, self.initials)
        }
    }

    /// Format as `"Lastname F. M."` for graph node labels.
    pub fn display_name(&self) -> String {
        if self.initials.is_empty() {
            self.last_name.clone()
        } else {
            format!("{} {}", self.last_name, self.initials)
        }
    }
}

/// Derive the canonical key: initials stripped of separators, hyphens in
/// the last name widened to spaces, the whole normalized.
fn canonical_key(last_name: &str, initials: &str) -> String {
    let compact: String = initials
        .chars()
        .filter(|c| !matches!(c, ' ' | '.' | '-'))
        .collect();
    let last = last_name.replace('-', " ");
    text::normalize(&format!("{} {}", last, compact))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_key() {
        let author = Author::new("Smith", "J. A.");
        assert_eq!(author.canonical_key(), "smith ja");
    }

    #[test]
    fn test_canonical_key_hyphens_and_diacritics() {
        let author = Author::new("Saint-Exupéry", "A.");
        assert_eq!(author.canonical_key(), "saint exupery a");

        let hyphenated = Author::new("Dupont", "J.-P.");
        assert_eq!(hyphenated.canonical_key(), "dupont jp");
    }

    #[test]
    fn test_same_key_same_identity() {
        let a = Author::new("Smith", "J. A.");
        let b = Author::from_full_name("Smith, John Albert").unwrap();
        assert_eq!(a.canonical_key(), b.canonical_key());
    }

    #[test]
    fn test_from_full_name() {
        let author = Author::from_full_name("Newman, Mark").unwrap();
        assert_eq!(author.last_name, "Newman");
        assert_eq!(author.initials, "M.");
    }

    #[test]
    fn test_from_full_name_requires_comma() {
        assert!(matches!(
            Author::from_full_name("Plato"),
            Err(RecordError::MalformedAuthor(_))
        ));
    }

    #[test]
    fn test_full_name() {
        let author = Author::new("Smith", "J. A.");
        assert_eq!(author.full_name(), "Smith, J. A.");
        assert_eq!(author.display_name(), "Smith J. A.");
    }
}
