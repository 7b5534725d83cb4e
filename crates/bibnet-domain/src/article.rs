//! Article domain model
//!
//! An article is created once per distinct publication, when first parsed
//! from either source, and from then on only ever enriched through
//! [`Article::complete_with`]. Its identity basis is the bibtex key;
//! [`Article::cite_as`] is a display form only.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::corpus::{ArticleId, AuthorId, Corpus};
use crate::source::Source;
use crate::text;

/// A publication, as reconciled from the reference-manager export and the
/// citation-index export.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Article {
    /// Unique key within a corpus. Synthetic for index-born placeholders.
    pub bibtex_key: String,
    /// Authors in publication order, duplicates suppressed by identity.
    pub authors: Vec<AuthorId>,

    title: Option<String>,
    norm_title: Option<String>,

    /// Venue, when known.
    pub source: Option<Source>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    /// Page or page range as given; comparisons only use the range start.
    pub page: Option<String>,
    pub year: Option<String>,
    pub doi: Option<String>,

    // Descriptive fields
    pub abstract_text: Option<String>,
    pub address: Option<String>,
    pub chapter: Option<String>,
    pub edition: Option<String>,
    pub editor: Option<String>,
    pub file: Option<String>,
    pub howpublished: Option<String>,
    pub month: Option<String>,
    pub owner: Option<String>,
    pub report_type: Option<String>,
    pub review: Option<String>,
    pub series: Option<String>,
    pub sortkey: Option<String>,
    pub timestamp: Option<String>,
    pub url: Option<String>,
    pub groups: Option<String>,

    // Venue fields that do not match the entry's own source kind
    pub journal: Option<String>,
    pub publisher: Option<String>,
    pub booktitle: Option<String>,
    pub institution: Option<String>,
    pub school: Option<String>,
    pub organization: Option<String>,

    /// On the targeted list of articles.
    pub core: bool,
    /// Excluded from the bibliographic review.
    pub ignored: bool,
    /// Present in the reference-manager export.
    pub present: bool,
    /// Number of articles in the corpus citing this one.
    pub times_cited: u32,

    /// Articles this one cites. Always updated together with the cited
    /// article's `citing` set, through [`Corpus::add_citation`].
    pub cited: BTreeSet<ArticleId>,
    /// Articles citing this one.
    pub citing: BTreeSet<ArticleId>,
}

impl Article {
    /// Create an empty article under the given bibtex key.
    pub fn new(bibtex_key: impl Into<String>) -> Self {
        Self {
            bibtex_key: bibtex_key.into(),
            authors: Vec::new(),
            title: None,
            norm_title: None,
            source: None,
            volume: None,
            issue: None,
            page: None,
            year: None,
            doi: None,
            abstract_text: None,
            address: None,
            chapter: None,
            edition: None,
            editor: None,
            file: None,
            howpublished: None,
            month: None,
            owner: None,
            report_type: None,
            review: None,
            series: None,
            sortkey: None,
            timestamp: None,
            url: None,
            groups: None,
            journal: None,
            publisher: None,
            booktitle: None,
            institution: None,
            school: None,
            organization: None,
            core: false,
            ignored: false,
            present: false,
            times_cited: 0,
            cited: BTreeSet::new(),
            citing: BTreeSet::new(),
        }
    }

    /// Append an author, suppressing duplicates by identity.
    pub fn add_author(&mut self, author: AuthorId) {
        if !self.authors.contains(&author) {
            self.authors.push(author);
        }
    }

    /// Set the title, keeping both the display form and the comparison key.
    pub fn set_title(&mut self, title: &str) {
        let cleaned = text::clean(title);
        self.norm_title = Some(text::normalize(&cleaned));
        self.title = Some(cleaned);
    }

    /// Display title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Normalized title used by the compatibility test.
    pub fn norm_title(&self) -> Option<&str> {
        self.norm_title.as_deref()
    }

    /// Whether two differently-sourced articles likely denote the same
    /// publication.
    ///
    /// A conjunctive, partial-information test: every field present on both
    /// sides must agree, a field missing on either side is skipped. Author
    /// lists are compared positionally until one is exhausted, except that a
    /// single-author side is only checked against the other side's first
    /// author, which makes the test asymmetric for 1-vs-many lists, a
    /// behavior the resolver relies on (provisional article on the left).
    pub fn is_compatible(&self, other: &Article) -> bool {
        // authors
        if self.authors.is_empty() || other.authors.is_empty() {
            return false;
        }
        if self.authors.len() > 1 && other.authors.len() > 1 {
            if self
                .authors
                .iter()
                .zip(other.authors.iter())
                .any(|(a, b)| a != b)
            {
                return false;
            }
        } else if self.authors[0] != other.authors[0] {
            return false;
        }

        // title
        if let (Some(a), Some(b)) = (&self.norm_title, &other.norm_title) {
            if a != b {
                return false;
            }
        }

        // source name (the spelling varies a lot, hence the normalized form)
        if let (Some(a), Some(b)) = (&self.source, &other.source) {
            if a.norm_name() != b.norm_name() {
                return false;
            }
        }

        // volume
        if let (Some(a), Some(b)) = (&self.volume, &other.volume) {
            if a != b {
                return false;
            }
        }

        // issue
        if let (Some(a), Some(b)) = (&self.issue, &other.issue) {
            if a != b {
                return false;
            }
        }

        // page (only the range start)
        if let (Some(a), Some(b)) = (&self.page, &other.page) {
            if first_page(a) != first_page(b) {
                return false;
            }
        }

        // year
        if let (Some(a), Some(b)) = (&self.year, &other.year) {
            if a != b {
                return false;
            }
        }

        true
    }

    /// Enrich this article with fields from another description of the same
    /// publication. Never overwrites a present value; authors and citation
    /// sets are unioned. Idempotent.
    pub fn complete_with(&mut self, other: &Article) {
        macro_rules! fill_absent {
            ($($field:ident),+ $(,)?) => {
                $(
                    if self.$field.is_none() && other.$field.is_some() {
                        self.$field = other.$field.clone();
                    }
                )+
            };
        }

        // title and its comparison key travel together
        if self.title.is_none() && other.title.is_some() {
            self.title = other.title.clone();
            self.norm_title = other.norm_title.clone();
        }

        fill_absent!(
            source,
            volume,
            issue,
            page,
            year,
            doi,
            abstract_text,
            address,
            chapter,
            edition,
            editor,
            file,
            howpublished,
            month,
            owner,
            report_type,
            review,
            series,
            sortkey,
            timestamp,
            url,
            groups,
            journal,
            publisher,
            booktitle,
            institution,
            school,
            organization,
        );

        for &author in &other.authors {
            if !self.authors.contains(&author) {
                self.authors.push(author);
            }
        }

        self.cited.extend(other.cited.iter().copied());
        self.citing.extend(other.citing.iter().copied());
        // times_cited moves in lockstep with the citing set, as it does in
        // [`Corpus::add_citation`]
        self.times_cited = self.citing.len() as u32;
    }

    /// Canonical citation key, for display:
    /// `"<first author key>, <year>[, V<volume>][, P<page>][, DOI <doi>]"`.
    pub fn cite_as(&self, corpus: &Corpus) -> String {
        let mut result = String::new();
        if let Some(&first) = self.authors.first() {
            result.push_str(corpus.author(first).canonical_key());
        }
        result.push_str(", ");
        if let Some(year) = &self.year {
            result.push_str(year);
        }
        if let Some(volume) = &self.volume {
            result.push_str(", V");
            result.push_str(volume);
        }
        if let Some(page) = &self.page {
            result.push_str(", P");
            result.push_str(page);
        }
        if let Some(doi) = &self.doi {
            result.push_str(", DOI ");
            result.push_str(doi);
        }
        result
    }
}

/// The start of a page range: `"66-70"` yields `"66"`.
pub fn first_page(page: &str) -> &str {
    page.split('-').next().unwrap_or(page)
}
