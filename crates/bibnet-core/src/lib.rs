//! Citation resolution and derived graphs
//!
//! Builds on `bibnet-domain`: ingests citation-index records into a corpus
//! populated from the reference-manager export, resolves the compact
//! citation strings of the reference lists, and derives the citation,
//! authorship and co-citation property graphs.
//!
//! The intended pipeline is single-threaded and batch: load the structured
//! export into a [`Corpus`](bibnet_domain::Corpus), ingest every index
//! record through the [`CitationResolver`], apply the manually completed
//! cross-links, then build whichever graphs are wanted.

pub mod error;
pub mod graph;
pub mod index;
pub mod resolver;

pub use error::ResolveError;
pub use graph::{Graph, Link, Node, PropertyType, PropertyValue};
pub use index::IndexRecord;
pub use resolver::{CitationFix, CitationResolver, Resolution, ResolutionMode, ResolverTables};
