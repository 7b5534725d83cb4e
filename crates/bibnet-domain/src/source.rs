//! Publication source (venue) as a tagged type
//!
//! The source kind and name travel together: a `Source` can only answer the
//! venue question matching its kind, so a journal name can never leak into a
//! `booktitle` slot or vice versa.

use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::text;

/// The kind of venue a publication appeared in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceType {
    /// Journal paper.
    Journal,
    /// Full book.
    Book,
    /// Book chapter.
    InBook,
    /// Full collection.
    Collection,
    /// Collection chapter.
    InCollection,
    /// Conference paper.
    InProceedings,
    /// Electronic resource.
    Electronic,
    /// Technical report.
    TechReport,
    /// MSc thesis.
    ThesisMsc,
    /// PhD thesis.
    ThesisPhd,
}

impl SourceType {
    /// The structured-export entry type for this kind.
    pub fn entry_type(self) -> &'static str {
        match self {
            SourceType::Journal => "Article",
            SourceType::Book => "Book",
            SourceType::InBook => "InBook",
            SourceType::Collection => "Collection",
            SourceType::InCollection => "InCollection",
            SourceType::InProceedings => "InProceedings",
            SourceType::Electronic => "Electronic",
            SourceType::TechReport => "TechReport",
            SourceType::ThesisMsc => "MastersThesis",
            SourceType::ThesisPhd => "PhdThesis",
        }
    }

    /// Inverse of [`entry_type`](Self::entry_type), case-insensitive.
    pub fn from_entry_type(entry_type: &str) -> Option<Self> {
        let all = [
            SourceType::Journal,
            SourceType::Book,
            SourceType::InBook,
            SourceType::Collection,
            SourceType::InCollection,
            SourceType::InProceedings,
            SourceType::Electronic,
            SourceType::TechReport,
            SourceType::ThesisMsc,
            SourceType::ThesisPhd,
        ];
        all.into_iter()
            .find(|t| t.entry_type().eq_ignore_ascii_case(entry_type))
    }

    /// The record field carrying the venue name for this kind.
    pub fn source_field(self) -> &'static str {
        match self {
            SourceType::Journal => "journal",
            SourceType::Book | SourceType::Collection => "publisher",
            SourceType::InBook | SourceType::InCollection | SourceType::InProceedings => {
                "booktitle"
            }
            SourceType::Electronic => "organization",
            SourceType::TechReport => "institution",
            SourceType::ThesisMsc | SourceType::ThesisPhd => "school",
        }
    }
}

/// A publication venue: kind, display name, and the comparison key derived
/// from the name.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Source {
    pub kind: SourceType,
    pub name: String,
    norm_name: String,
}

impl Source {
    /// Build a source, deriving the normalized comparison name.
    pub fn new(kind: SourceType, name: &str) -> Result<Self, RecordError> {
        let name = name.trim().to_string();
        let norm_name = normalize_source_name(&name)?;
        Ok(Self {
            kind,
            name,
            norm_name,
        })
    }

    /// The comparison key for this venue name.
    pub fn norm_name(&self) -> &str {
        &self.norm_name
    }

    /// Journal name, for journal papers only.
    pub fn journal(&self) -> Option<&str> {
        matches!(self.kind, SourceType::Journal).then_some(self.name.as_str())
    }

    /// Publisher, for books and collections.
    pub fn publisher(&self) -> Option<&str> {
        matches!(self.kind, SourceType::Book | SourceType::Collection)
            .then_some(self.name.as_str())
    }

    /// Containing book or proceedings title, for chapter-level entries.
    pub fn booktitle(&self) -> Option<&str> {
        matches!(
            self.kind,
            SourceType::InBook | SourceType::InCollection | SourceType::InProceedings
        )
        .then_some(self.name.as_str())
    }

    /// Publishing organization, for electronic resources.
    pub fn organization(&self) -> Option<&str> {
        matches!(self.kind, SourceType::Electronic).then_some(self.name.as_str())
    }

    /// Publishing institution, for technical reports.
    pub fn institution(&self) -> Option<&str> {
        matches!(self.kind, SourceType::TechReport).then_some(self.name.as_str())
    }

    /// Awarding school, for theses.
    pub fn school(&self) -> Option<&str> {
        matches!(self.kind, SourceType::ThesisMsc | SourceType::ThesisPhd)
            .then_some(self.name.as_str())
    }
}

/// Association acronyms that prefix many conference names and vary between
/// sources.
const LEADING_ACRONYMS: [&str; 4] = ["ieee", "wic", "acm", "siam"];

/// Reduce a venue name to its comparison key.
///
/// On top of [`text::normalize`], drops a trailing parenthetical, a leading
/// edition number, leading association acronyms, and finally every
/// non-alphanumeric character. A name that reduces to nothing is rejected,
/// two empty keys must never compare equal.
fn normalize_source_name(name: &str) -> Result<String, RecordError> {
    let mut norm = text::normalize(name);

    // drop a possible trailing parenthetical (typically for conferences)
    if let Some(pos) = norm.find('(') {
        norm.truncate(pos);
    }

    // drop a possible edition number at the beginning, e.g. "12th ..."
    if norm.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        match norm.find(' ') {
            Some(pos) => norm = norm[pos + 1..].to_string(),
            None => return Err(RecordError::MalformedSourceName(name.to_string())),
        }
    }

    // drop possible association acronyms at the beginning, whole words only
    for acronym in LEADING_ACRONYMS {
        if let Some(rest) = norm.strip_prefix(acronym) {
            if rest.starts_with(' ') {
                norm = rest.trim_start().to_string();
            }
        }
    }

    norm.retain(|c| c.is_ascii_alphanumeric());
    if norm.is_empty() {
        return Err(RecordError::MalformedSourceName(name.to_string()));
    }
    Ok(norm)
}
