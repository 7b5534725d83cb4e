//! Resolver lookup tables
//!
//! The side tables steering citation resolution: short venue names, manual
//! error fixes, the ignored-reference blacklist, and manually completed
//! cross-links. They are built once from the side-file line formats and
//! injected into the resolver, so tests can supply fixtures directly.

use std::collections::{HashMap, HashSet};

use bibnet_domain::{text, SourceType};

use crate::error::ResolveError;

/// Tag prefixes of the corrective fields in an error-fix entry, matching the
/// field tags of the index format.
const FIX_TITLE: &str = "TI";
const FIX_AUTHOR: &str = "AU";
const FIX_DOI: &str = "DI";
const FIX_ISSUE: &str = "IS";
const FIX_VOLUME: &str = "VL";
const FIX_YEAR: &str = "PY";
const FIX_PAGE: &str = "AR";
const FIX_SOURCE: &str = "SO";
const FIX_TYPE: &str = "JT";
const FIX_KEY: &str = "ID";

/// Corrective fields for one known-bad citation string.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CitationFix {
    pub title: Option<String>,
    /// Compact author form, `"Lastname IJ"`.
    pub author: Option<String>,
    pub doi: Option<String>,
    pub issue: Option<String>,
    pub volume: Option<String>,
    pub year: Option<String>,
    pub page: Option<String>,
    /// Long venue name, substituted for the short-name lookup.
    pub source: Option<String>,
    pub kind: Option<SourceType>,
    /// When present, resolution is an exact key lookup.
    pub bibtex_key: Option<String>,
}

impl CitationFix {
    /// Parse a `", "`-separated list of `TAG=value` corrective fields.
    pub fn parse(fields: &str) -> Result<Self, ResolveError> {
        let mut fix = CitationFix::default();
        for field in fields.split(", ") {
            let (tag, value) = field
                .split_once('=')
                .ok_or_else(|| ResolveError::MalformedTable(field.to_string()))?;
            let value = value.trim().to_string();
            match tag.trim() {
                FIX_TITLE => fix.title = Some(value),
                FIX_AUTHOR => fix.author = Some(value),
                FIX_DOI => fix.doi = Some(value),
                FIX_ISSUE => fix.issue = Some(value),
                FIX_VOLUME => fix.volume = Some(value),
                FIX_YEAR => fix.year = Some(value),
                FIX_PAGE => fix.page = Some(value),
                FIX_SOURCE => fix.source = Some(value),
                FIX_TYPE => {
                    fix.kind = Some(SourceType::from_entry_type(&value).ok_or_else(|| {
                        ResolveError::MalformedTable(field.to_string())
                    })?)
                }
                FIX_KEY => fix.bibtex_key = Some(value),
                _ => return Err(ResolveError::MalformedTable(field.to_string())),
            }
        }
        Ok(fix)
    }
}

/// All lookup tables the resolver consults, built once and injected.
#[derive(Clone, Debug, Default)]
pub struct ResolverTables {
    short_names: HashMap<String, String>,
    error_fixes: HashMap<String, CitationFix>,
    ignored_refs: HashSet<String>,
    /// `(citing bibtex key, cited doi)` pairs to cross-link manually.
    completed_refs: Vec<(String, String)>,
}

impl ResolverTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the tab-separated `short name <TAB> long name` table.
    pub fn load_short_names(&mut self, content: &str) -> Result<(), ResolveError> {
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            let (short, long) = line
                .split_once('\t')
                .ok_or_else(|| ResolveError::MalformedTable(line.to_string()))?;
            self.register_short_name(short, long)?;
        }
        Ok(())
    }

    /// Register a short/long venue name pair. A short name already mapped to
    /// a different long name is fatal: the table must be repaired by hand,
    /// never silently overwritten.
    pub fn register_short_name(&mut self, short: &str, long: &str) -> Result<(), ResolveError> {
        let short = name_key(short);
        let long = name_key(long);
        if let Some(existing) = self.short_names.get(&short) {
            if *existing != long {
                return Err(ResolveError::ShortNameConflict {
                    short,
                    existing: existing.clone(),
                    conflicting: long,
                });
            }
            return Ok(());
        }
        self.short_names.insert(short, long);
        Ok(())
    }

    /// The long venue name for a short one, if known.
    pub fn long_name(&self, short: &str) -> Option<&str> {
        self.short_names.get(&name_key(short)).map(String::as_str)
    }

    /// Load the `citation string <TAB> TAG=value, TAG=value...` fix table.
    pub fn load_error_fixes(&mut self, content: &str) -> Result<(), ResolveError> {
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            let (citation, fields) = line
                .split_once('\t')
                .ok_or_else(|| ResolveError::MalformedTable(line.to_string()))?;
            let fix = CitationFix::parse(fields)?;
            self.error_fixes.insert(text::normalize(citation), fix);
        }
        Ok(())
    }

    /// The fix registered for a normalized citation string, if any.
    pub fn error_fix(&self, normalized_citation: &str) -> Option<&CitationFix> {
        self.error_fixes.get(normalized_citation)
    }

    /// Load the ignored-reference blacklist, one citation string per line.
    pub fn load_ignored_refs(&mut self, content: &str) {
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            self.ignored_refs.insert(text::normalize(line));
        }
    }

    /// Whether a normalized citation string is blacklisted.
    pub fn is_ignored(&self, normalized_citation: &str) -> bool {
        self.ignored_refs.contains(normalized_citation)
    }

    /// Load the tab-separated `citing key <TAB> cited doi` cross-link list.
    pub fn load_completed_refs(&mut self, content: &str) -> Result<(), ResolveError> {
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            let (key, doi) = line
                .split_once('\t')
                .ok_or_else(|| ResolveError::MalformedTable(line.to_string()))?;
            self.completed_refs
                .push((key.trim().to_string(), doi.trim().to_string()));
        }
        Ok(())
    }

    pub fn completed_refs(&self) -> &[(String, String)] {
        &self.completed_refs
    }
}

/// Lookup form of a venue name: normalized, dots removed.
fn name_key(name: &str) -> String {
    text::normalize(name).replace('.', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_lookup_is_normalized() {
        let mut tables = ResolverTables::new();
        tables
            .load_short_names("PHYS. REV. E\tPhysical Review E\n")
            .unwrap();
        assert_eq!(tables.long_name("Phys Rev E"), Some("physical review e"));
        assert_eq!(tables.long_name("nature"), None);
    }

    #[test]
    fn test_short_name_conflict_is_fatal() {
        let mut tables = ResolverTables::new();
        tables.register_short_name("P REV E", "Physical Review E").unwrap();
        // same mapping again is fine
        tables.register_short_name("P REV E", "physical review e").unwrap();
        assert!(matches!(
            tables.register_short_name("P REV E", "Physical Review Letters"),
            Err(ResolveError::ShortNameConflict { .. })
        ));
    }

    #[test]
    fn test_error_fix_parsing() {
        let fix = CitationFix::parse("AU=Smith JA, PY=2001, JT=Article, ID=smith2001").unwrap();
        assert_eq!(fix.author.as_deref(), Some("Smith JA"));
        assert_eq!(fix.year.as_deref(), Some("2001"));
        assert_eq!(fix.kind, Some(SourceType::Journal));
        assert_eq!(fix.bibtex_key.as_deref(), Some("smith2001"));
    }

    #[test]
    fn test_error_fix_unknown_tag_is_fatal() {
        assert!(matches!(
            CitationFix::parse("XX=whatever"),
            Err(ResolveError::MalformedTable(_))
        ));
    }

    #[test]
    fn test_error_fix_table_keyed_by_normalized_citation() {
        let mut tables = ResolverTables::new();
        tables
            .load_error_fixes("Smith JA, 2001, NATRE\tSO=Nature\n")
            .unwrap();
        assert!(tables
            .error_fix(&text::normalize("SMITH JA, 2001, NATRE"))
            .is_some());
    }

    #[test]
    fn test_ignored_refs() {
        let mut tables = ResolverTables::new();
        tables.load_ignored_refs("*ANONYMOUS, 1999\n");
        assert!(tables.is_ignored(&text::normalize("*Anonymous, 1999")));
        assert!(!tables.is_ignored("smith ja, 2001"));
    }
}
