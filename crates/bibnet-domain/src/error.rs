//! Error types for the domain layer

use thiserror::Error;

/// Failure while turning an external record into domain objects.
///
/// All variants are fatal: the pipeline is a one-shot batch, the operator
/// fixes the input and reruns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// A field name outside the fixed known set.
    #[error("unknown field `{field}` in entry `{key}`")]
    UnknownField { field: String, key: String },

    /// A field required for the entry's source type is missing.
    #[error("missing required field `{field}` in entry `{key}`")]
    MissingField { field: &'static str, key: String },

    /// An entry type outside the fixed known set.
    #[error("unknown entry type `{entry_type}` in entry `{key}`")]
    UnknownEntryType { entry_type: String, key: String },

    /// An author string without a recognizable given-name part.
    #[error("could not find the given name in author string `{0}`")]
    MalformedAuthor(String),

    /// A source name that cannot be reduced to a comparison key.
    #[error("could not normalize source name `{0}`")]
    MalformedSourceName(String),
}

/// Failure of a [`Corpus`](crate::Corpus) invariant.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorpusError {
    /// Insertion under a bibtex key that is already taken.
    #[error("bibtex key `{0}` is already used by another article")]
    DuplicateKey(String),

    /// A group directive names a bibtex key absent from the corpus.
    #[error("no article with bibtex key `{0}`")]
    UnknownKey(String),
}
