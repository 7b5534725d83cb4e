//! Structured-export records
//!
//! The reference-manager export arrives as typed records of named fields.
//! Field names come from a fixed known set; an unrecognized name is fatal
//! rather than dropped, so silent data loss cannot creep in when the export
//! format drifts.

use serde::{Deserialize, Serialize};

use crate::article::Article;
use crate::author::Author;
use crate::corpus::Corpus;
use crate::error::RecordError;
use crate::source::{Source, SourceType};

pub const FLD_ABSTRACT: &str = "abstract";
pub const FLD_ADDRESS: &str = "address";
pub const FLD_AUTHOR: &str = "author";
pub const FLD_BOOKTITLE: &str = "booktitle";
pub const FLD_CHAPTER: &str = "chapter";
pub const FLD_DOI: &str = "doi";
pub const FLD_EDITION: &str = "edition";
pub const FLD_EDITOR: &str = "editor";
pub const FLD_FILE: &str = "file";
pub const FLD_GROUPS: &str = "groups";
pub const FLD_HOWPUBLISHED: &str = "howpublished";
pub const FLD_INSTITUTION: &str = "institution";
pub const FLD_ISSUE: &str = "issue";
pub const FLD_JOURNAL: &str = "journal";
pub const FLD_JOURNAL_ALT: &str = "journaltitle";
pub const FLD_MONTH: &str = "month";
pub const FLD_NUMBER: &str = "number";
pub const FLD_ORGANIZATION: &str = "organization";
pub const FLD_OWNER: &str = "owner";
pub const FLD_PAGES: &str = "pages";
pub const FLD_PUBLISHER: &str = "publisher";
pub const FLD_REVIEW: &str = "review";
pub const FLD_SCHOOL: &str = "school";
pub const FLD_SERIES: &str = "series";
pub const FLD_SORTKEY: &str = "sortkey";
pub const FLD_TIMESTAMP: &str = "timestamp";
pub const FLD_TITLE: &str = "title";
pub const FLD_TYPE: &str = "type";
pub const FLD_URL: &str = "url";
pub const FLD_VOLUME: &str = "volume";
pub const FLD_YEAR: &str = "year";

/// Reference-manager bookkeeping marker, carried by some exports and
/// meaningless here.
const FLD_MARKED: &str = "__markedentry";

/// One entry of the structured export: a type, a key, and named fields in
/// file order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub entry_type: String,
    pub key: String,
    pub fields: Vec<(String, String)>,
}

impl ArticleRecord {
    pub fn new(entry_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            entry_type: entry_type.into(),
            key: key.into(),
            fields: Vec::new(),
        }
    }

    pub fn push_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl Article {
    /// Build an article from an export record, registering its authors in
    /// the corpus.
    ///
    /// The venue field matching the entry type becomes the article's
    /// [`Source`]; venue fields of other kinds are kept verbatim so the
    /// record survives a round trip. Key, authors, title, year and the
    /// type's venue field are required.
    pub fn from_record(record: &ArticleRecord, corpus: &mut Corpus) -> Result<Self, RecordError> {
        let kind = SourceType::from_entry_type(&record.entry_type).ok_or_else(|| {
            RecordError::UnknownEntryType {
                entry_type: record.entry_type.clone(),
                key: record.key.clone(),
            }
        })?;
        if record.key.trim().is_empty() {
            return Err(RecordError::MissingField {
                field: "key",
                key: record.key.clone(),
            });
        }

        let mut article = Article::new(record.key.trim());
        article.present = true;

        for (name, value) in &record.fields {
            match name.to_lowercase().as_str() {
                FLD_AUTHOR => {
                    for full_name in value.split(" and ") {
                        let author = Author::from_full_name(full_name)?;
                        article.add_author(corpus.retrieve_author(author));
                    }
                }
                FLD_TITLE => article.set_title(value),
                FLD_YEAR => article.year = Some(value.clone()),
                FLD_VOLUME => article.volume = Some(value.clone()),
                FLD_NUMBER | FLD_ISSUE => article.issue = Some(value.clone()),
                FLD_PAGES => article.page = Some(value.clone()),
                FLD_DOI => article.doi = Some(value.clone()),
                FLD_JOURNAL | FLD_JOURNAL_ALT => article.journal = Some(value.clone()),
                FLD_PUBLISHER => article.publisher = Some(value.clone()),
                FLD_BOOKTITLE => article.booktitle = Some(value.clone()),
                FLD_ORGANIZATION => article.organization = Some(value.clone()),
                FLD_INSTITUTION => article.institution = Some(value.clone()),
                FLD_SCHOOL => article.school = Some(value.clone()),
                FLD_ABSTRACT => article.abstract_text = Some(value.clone()),
                FLD_ADDRESS => article.address = Some(value.clone()),
                FLD_CHAPTER => article.chapter = Some(value.clone()),
                FLD_EDITION => article.edition = Some(value.clone()),
                FLD_EDITOR => article.editor = Some(value.clone()),
                FLD_FILE => article.file = Some(value.clone()),
                FLD_HOWPUBLISHED => article.howpublished = Some(value.clone()),
                FLD_MONTH => article.month = Some(value.clone()),
                FLD_OWNER => article.owner = Some(value.clone()),
                FLD_REVIEW => article.review = Some(value.clone()),
                FLD_SERIES => article.series = Some(value.clone()),
                FLD_SORTKEY => article.sortkey = Some(value.clone()),
                FLD_TIMESTAMP => article.timestamp = Some(value.clone()),
                FLD_TYPE => article.report_type = Some(value.clone()),
                FLD_URL => article.url = Some(value.clone()),
                FLD_GROUPS => article.groups = Some(value.clone()),
                FLD_MARKED => {}
                _ => {
                    return Err(RecordError::UnknownField {
                        field: name.clone(),
                        key: record.key.clone(),
                    })
                }
            }
        }

        if article.authors.is_empty() {
            return Err(RecordError::MissingField {
                field: FLD_AUTHOR,
                key: record.key.clone(),
            });
        }
        if article.title().is_none() {
            return Err(RecordError::MissingField {
                field: FLD_TITLE,
                key: record.key.clone(),
            });
        }
        if article.year.is_none() {
            return Err(RecordError::MissingField {
                field: FLD_YEAR,
                key: record.key.clone(),
            });
        }

        // the venue field matching the entry type is promoted to the source
        let source_name = match kind.source_field() {
            FLD_JOURNAL => article.journal.take(),
            FLD_PUBLISHER => article.publisher.take(),
            FLD_BOOKTITLE => article.booktitle.take(),
            FLD_ORGANIZATION => article.organization.take(),
            FLD_INSTITUTION => article.institution.take(),
            _ => article.school.take(),
        };
        match source_name {
            Some(name) => article.source = Some(Source::new(kind, &name)?),
            None => {
                return Err(RecordError::MissingField {
                    field: kind.source_field(),
                    key: record.key.clone(),
                })
            }
        }

        Ok(article)
    }

    /// Export back to a record. Inverse of [`from_record`](Self::from_record)
    /// up to field order and the `issue`/`number` synonym, which always
    /// exports as `number`. Articles without a venue export as journal
    /// entries.
    pub fn to_record(&self, corpus: &Corpus) -> ArticleRecord {
        let kind = self.source.as_ref().map_or(SourceType::Journal, |s| s.kind);
        let mut record = ArticleRecord::new(kind.entry_type(), self.bibtex_key.clone());

        let authors = self
            .authors
            .iter()
            .map(|&id| corpus.author(id).full_name())
            .collect::<Vec<_>>()
            .join(" and ");
        record.push_field(FLD_AUTHOR, authors);
        if let Some(title) = self.title() {
            record.push_field(FLD_TITLE, title);
        }
        if let Some(year) = &self.year {
            record.push_field(FLD_YEAR, year.clone());
        }
        if let Some(source) = &self.source {
            record.push_field(kind.source_field(), source.name.clone());
        }

        let scalars = [
            (FLD_JOURNAL, &self.journal),
            (FLD_PUBLISHER, &self.publisher),
            (FLD_BOOKTITLE, &self.booktitle),
            (FLD_ORGANIZATION, &self.organization),
            (FLD_INSTITUTION, &self.institution),
            (FLD_SCHOOL, &self.school),
            (FLD_VOLUME, &self.volume),
            (FLD_NUMBER, &self.issue),
            (FLD_PAGES, &self.page),
            (FLD_MONTH, &self.month),
            (FLD_DOI, &self.doi),
            (FLD_ABSTRACT, &self.abstract_text),
            (FLD_ADDRESS, &self.address),
            (FLD_CHAPTER, &self.chapter),
            (FLD_EDITION, &self.edition),
            (FLD_EDITOR, &self.editor),
            (FLD_FILE, &self.file),
            (FLD_HOWPUBLISHED, &self.howpublished),
            (FLD_OWNER, &self.owner),
            (FLD_REVIEW, &self.review),
            (FLD_SERIES, &self.series),
            (FLD_SORTKEY, &self.sortkey),
            (FLD_TIMESTAMP, &self.timestamp),
            (FLD_TYPE, &self.report_type),
            (FLD_URL, &self.url),
            (FLD_GROUPS, &self.groups),
        ];
        for (name, value) in scalars {
            if let Some(value) = value {
                record.push_field(name, value.clone());
            }
        }
        record
    }
}
