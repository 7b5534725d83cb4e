//! Citation-index records
//!
//! The in-memory form of one entry of the tagged citation-index export. The
//! line-oriented scanning lives with the I/O collaborators; the core only
//! sees assembled records.

use bibnet_domain::SourceType;

/// One citation-index entry, ready for reconciliation against a corpus.
#[derive(Clone, Debug, Default)]
pub struct IndexRecord {
    /// Venue kind, from the index's one-letter type tag.
    pub kind: Option<SourceType>,
    /// Author strings in `"Lastname, IJ"` compact form, publication order.
    pub authors: Vec<String>,
    pub title: Option<String>,
    /// Full venue name.
    pub source_name: Option<String>,
    /// Abbreviated venue name, feeding the short-name table.
    pub short_source_name: Option<String>,
    pub abstract_text: Option<String>,
    pub year: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub page: Option<String>,
    pub doi: Option<String>,
    /// Compact citation strings from the reference list.
    pub references: Vec<String>,
}

impl IndexRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the index's one-letter source-type tag: `J` for journal
    /// papers, `S` for proceedings papers.
    pub fn kind_from_tag(tag: &str) -> Option<SourceType> {
        match tag.trim() {
            "J" => Some(SourceType::Journal),
            "S" => Some(SourceType::InProceedings),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_tag() {
        assert_eq!(IndexRecord::kind_from_tag("J"), Some(SourceType::Journal));
        assert_eq!(
            IndexRecord::kind_from_tag("S"),
            Some(SourceType::InProceedings)
        );
        assert_eq!(IndexRecord::kind_from_tag("B"), None);
    }
}
