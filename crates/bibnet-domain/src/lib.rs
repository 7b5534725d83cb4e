//! Bibliographic domain model for citation-network building
//!
//! This crate owns the entities shared by the whole pipeline: normalized
//! text keys, authors with canonical identities, articles with their
//! compatibility and merge semantics, typed publication sources, the
//! structured-export record format, and the [`Corpus`] arena tying them
//! together.
//!
//! The companion `bibnet-core` crate layers the citation-string resolver
//! and the graph builders on top.

pub mod article;
pub mod author;
pub mod corpus;
pub mod error;
pub mod record;
pub mod source;
pub mod text;

pub use article::{first_page, Article};
pub use author::Author;
pub use corpus::{ArticleId, AuthorId, Corpus};
pub use error::{CorpusError, RecordError};
pub use record::ArticleRecord;
pub use source::{Source, SourceType};
