//! Error types for citation resolution

use bibnet_domain::{CorpusError, RecordError};
use thiserror::Error;

/// Failure while resolving citation-index data against a corpus.
///
/// Everything here is fatal in strict mode. The operator fixes the input or
/// the override tables and reruns the batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    /// One short source name mapped to two different long names.
    #[error("short name `{short}` maps to both `{existing}` and `{conflicting}`")]
    ShortNameConflict {
        short: String,
        existing: String,
        conflicting: String,
    },

    /// A short source name absent from the lookup table.
    #[error("short source name `{0}` is not in the short-name table")]
    UnknownShortName(String),

    /// A citation string that matches no article in the corpus.
    #[error("citation `{0}` matches no known article")]
    Unresolved(String),

    /// A citation string compatible with several corpus articles. Never
    /// resolved by guessing.
    #[error("citation `{citation}` is ambiguous, candidates: {candidates:?}")]
    Ambiguous {
        citation: String,
        candidates: Vec<String>,
    },

    /// A citation string the positional parser cannot make sense of.
    #[error("malformed citation string `{0}`")]
    MalformedCitation(String),

    /// A malformed line in one of the resolver side tables.
    #[error("malformed table line `{0}`")]
    MalformedTable(String),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Corpus(#[from] CorpusError),
}
