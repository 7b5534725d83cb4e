//! Citation resolution
//!
//! Matches the terse citation strings of the index export (for instance
//! `"Smith JA, 2001, NATURE, V410, P227, DOI 10.1038/x"`) against a corpus
//! already populated from the reference-manager export. Exact keys win (DOI,
//! then a bibtex key supplied by an error fix); the fallback is a positional
//! parse followed by a compatibility scan over the whole corpus. Ambiguity
//! is always fatal, a match is never guessed.

mod tables;

pub use tables::{CitationFix, ResolverTables};

use bibnet_domain::{text, Article, ArticleId, Author, Corpus, CorpusError, RecordError, Source, SourceType};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info, warn};

lazy_static! {
    /// A four-digit year token.
    static ref YEAR: Regex = Regex::new(r"^\d{4}$").expect("valid year pattern");
    /// A `V410`/`P227` tagged token. The digit requirement keeps source
    /// names like `PHYS REV E` from being eaten.
    static ref TAGGED: Regex = Regex::new(r"^[VP]\d").expect("valid tag pattern");
}

use crate::error::ResolveError;
use crate::index::IndexRecord;

/// What to do with a citation string nothing in the corpus matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolutionMode {
    /// Unmatched references abort the run.
    Strict,
    /// Unmatched references become placeholder articles, reported in the
    /// missing list for manual review. Used for first-pass corpus building.
    Permissive,
}

/// Outcome of resolving one citation string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// A citation edge was recorded to this article.
    Linked(ArticleId),
    /// The string was blacklisted; no edge.
    Skipped,
}

/// The resolver: lookup tables plus the outcome policy, owning the list of
/// references that had to be synthesized.
#[derive(Debug)]
pub struct CitationResolver {
    tables: ResolverTables,
    mode: ResolutionMode,
    missing: Vec<String>,
}

impl CitationResolver {
    pub fn new(tables: ResolverTables, mode: ResolutionMode) -> Self {
        Self {
            tables,
            mode,
            missing: Vec::new(),
        }
    }

    pub fn tables(&self) -> &ResolverTables {
        &self.tables
    }

    /// References that matched nothing and were synthesized as placeholders,
    /// in resolution order. Only populated in permissive mode.
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    /// Merge one index record into the corpus and resolve its references.
    ///
    /// The record is turned into a provisional article, matched against the
    /// corpus through the compatibility test and merged into the unique
    /// match. Its short venue name is registered in the short-name table
    /// before the references are resolved.
    pub fn ingest(
        &mut self,
        corpus: &mut Corpus,
        record: &IndexRecord,
    ) -> Result<ArticleId, ResolveError> {
        let title = required(record.title.as_deref(), "title", record)?;
        let source_name = required(record.source_name.as_deref(), "source", record)?;
        let kind = record
            .kind
            .ok_or_else(|| missing_field("type", record))?;
        if record.authors.is_empty() {
            return Err(missing_field("author", record));
        }

        let mut authors = Vec::new();
        for author_str in &record.authors {
            let author = parse_index_author(author_str)?;
            authors.push(corpus.retrieve_author(author));
        }
        // keyed on author and year besides the title, so distinct unmatched
        // works sharing a title do not collide
        let key_basis = format!(
            "{}, {}, {}",
            corpus.author(authors[0]).canonical_key(),
            record.year.as_deref().unwrap_or(""),
            text::normalize(title),
        );
        let mut provisional = Article::new(placeholder_key(&key_basis));
        for author in authors {
            provisional.add_author(author);
        }
        provisional.set_title(title);
        provisional.source = Some(Source::new(kind, source_name)?);
        provisional.year = record.year.clone();
        provisional.volume = record.volume.clone();
        provisional.issue = record.issue.clone();
        provisional.page = record.page.clone();
        provisional.doi = record.doi.clone();
        provisional.abstract_text = record.abstract_text.clone();

        if let Some(short) = &record.short_source_name {
            self.tables.register_short_name(short, source_name)?;
        }

        let candidates: Vec<ArticleId> = corpus
            .articles()
            .filter(|(_, article)| provisional.is_compatible(article))
            .map(|(id, _)| id)
            .collect();
        let id = match candidates.as_slice() {
            [] => match self.mode {
                ResolutionMode::Strict => {
                    return Err(ResolveError::Unresolved(title.to_string()))
                }
                ResolutionMode::Permissive => {
                    warn!(title, "index entry matches no corpus article, inserting as new");
                    self.missing.push(title.to_string());
                    if corpus.article_by_key(&provisional.bibtex_key).is_some() {
                        // an incompatible article already holds this key
                        let base = provisional.bibtex_key.clone();
                        let mut n = 2;
                        while corpus.article_by_key(&format!("{base}-{n}")).is_some() {
                            n += 1;
                        }
                        provisional.bibtex_key = format!("{base}-{n}");
                    }
                    corpus.add_article(provisional)?
                }
            },
            [id] => {
                info!(title, key = %corpus.article(*id).bibtex_key, "index entry merged");
                corpus.article_mut(*id).complete_with(&provisional);
                *id
            }
            many => {
                return Err(ResolveError::Ambiguous {
                    citation: title.to_string(),
                    candidates: many
                        .iter()
                        .map(|id| corpus.article(*id).bibtex_key.clone())
                        .collect(),
                })
            }
        };

        for reference in &record.references {
            self.resolve(corpus, id, reference)?;
        }
        Ok(id)
    }

    /// Resolve one compact citation string and record the citation edge from
    /// `citing` to the resolved article.
    pub fn resolve(
        &mut self,
        corpus: &mut Corpus,
        citing: ArticleId,
        raw: &str,
    ) -> Result<Resolution, ResolveError> {
        let norm = text::normalize(raw);
        if self.tables.is_ignored(&norm) {
            debug!(citation = raw, "blacklisted reference skipped");
            return Ok(Resolution::Skipped);
        }

        // a DOI suffix bypasses all field parsing
        if let Some(pos) = raw.find(", DOI ") {
            let doi = raw[pos + 6..].trim();
            if let Some(id) = corpus.article_by_doi(doi) {
                corpus.add_citation(citing, id);
                return Ok(Resolution::Linked(id));
            }
            return self.link_placeholder(corpus, citing, raw, {
                let mut placeholder = Article::new(placeholder_key(&norm));
                placeholder.doi = Some(doi.to_string());
                placeholder
            });
        }

        let fix = self.tables.error_fix(&norm).cloned();
        if let Some(key) = fix.as_ref().and_then(|f| f.bibtex_key.as_deref()) {
            let id = corpus
                .article_by_key(key)
                .ok_or_else(|| ResolveError::Unresolved(raw.to_string()))?;
            corpus.add_citation(citing, id);
            return Ok(Resolution::Linked(id));
        }

        let provisional = self.build_provisional(corpus, raw, &norm, fix.as_ref())?;
        let candidates: Vec<ArticleId> = corpus
            .articles()
            .filter(|(_, article)| provisional.is_compatible(article))
            .map(|(id, _)| id)
            .collect();
        match candidates.as_slice() {
            [] => self.link_placeholder(corpus, citing, raw, provisional),
            [id] => {
                corpus.add_citation(citing, *id);
                Ok(Resolution::Linked(*id))
            }
            many => Err(ResolveError::Ambiguous {
                citation: raw.to_string(),
                candidates: many
                    .iter()
                    .map(|id| corpus.article(*id).bibtex_key.clone())
                    .collect(),
            }),
        }
    }

    /// Cross-link the manually completed references. Run after the automatic
    /// pass, once every DOI-carrying article is in the corpus.
    pub fn apply_completed_refs(&self, corpus: &mut Corpus) -> Result<(), ResolveError> {
        for (key, doi) in self.tables.completed_refs() {
            let citing = corpus
                .article_by_key(key)
                .ok_or_else(|| ResolveError::from(CorpusError::UnknownKey(key.clone())))?;
            let cited = corpus
                .article_by_doi(doi)
                .ok_or_else(|| ResolveError::Unresolved(doi.clone()))?;
            corpus.add_citation(citing, cited);
        }
        Ok(())
    }

    /// Build the provisional article for a positional parse, with error-fix
    /// overrides applied on top.
    fn build_provisional(
        &self,
        corpus: &mut Corpus,
        raw: &str,
        norm: &str,
        fix: Option<&CitationFix>,
    ) -> Result<Article, ResolveError> {
        let parts = parse_compact(raw);

        let author = match fix.and_then(|f| f.author.as_deref()) {
            Some(fixed) => parse_compact_author(fixed)
                .ok_or_else(|| ResolveError::MalformedCitation(fixed.to_string()))?,
            None => parts
                .author
                .ok_or_else(|| ResolveError::MalformedCitation(raw.to_string()))?,
        };

        let volume = pick(fix.and_then(|f| f.volume.clone()), parts.volume);
        let page = pick(fix.and_then(|f| f.page.clone()), parts.page);
        // V implies a journal, P without V a conference, neither a book
        let kind = fix.and_then(|f| f.kind).unwrap_or(if volume.is_some() {
            SourceType::Journal
        } else if page.is_some() {
            SourceType::InProceedings
        } else {
            SourceType::Book
        });

        let long_name = match fix.and_then(|f| f.source.clone()) {
            Some(name) => name,
            None => {
                let short = parts
                    .source
                    .ok_or_else(|| ResolveError::MalformedCitation(raw.to_string()))?;
                self.tables
                    .long_name(&short)
                    .ok_or(ResolveError::UnknownShortName(short))?
                    .to_string()
            }
        };

        let mut provisional = Article::new(placeholder_key(norm));
        provisional.add_author(corpus.retrieve_author(author));
        if let Some(title) = fix.and_then(|f| f.title.as_deref()) {
            provisional.set_title(title);
        }
        provisional.source = Some(Source::new(kind, &long_name)?);
        provisional.year = pick(fix.and_then(|f| f.year.clone()), parts.year);
        provisional.volume = volume;
        provisional.page = page;
        provisional.issue = fix.and_then(|f| f.issue.clone());
        provisional.doi = pick(fix.and_then(|f| f.doi.clone()), parts.doi);
        Ok(provisional)
    }

    /// Outcome policy for a reference nothing matched.
    fn link_placeholder(
        &mut self,
        corpus: &mut Corpus,
        citing: ArticleId,
        raw: &str,
        placeholder: Article,
    ) -> Result<Resolution, ResolveError> {
        match self.mode {
            ResolutionMode::Strict => Err(ResolveError::Unresolved(raw.to_string())),
            ResolutionMode::Permissive => {
                let id = match corpus.article_by_key(&placeholder.bibtex_key) {
                    Some(id) => id,
                    None => {
                        warn!(citation = raw, "unresolved reference, creating placeholder");
                        self.missing.push(raw.to_string());
                        corpus.add_article(placeholder)?
                    }
                };
                corpus.add_citation(citing, id);
                Ok(Resolution::Linked(id))
            }
        }
    }
}

/// Lenient positional decomposition of a compact citation string.
#[derive(Clone, Debug, Default)]
struct CompactParts {
    author: Option<Author>,
    year: Option<String>,
    source: Option<String>,
    volume: Option<String>,
    page: Option<String>,
    doi: Option<String>,
}

fn parse_compact(raw: &str) -> CompactParts {
    let mut parts = CompactParts::default();
    let tokens: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    let Some((&first, rest)) = tokens.split_first() else {
        return parts;
    };
    parts.author = parse_compact_author(first);

    let mut rest = rest.iter().copied();
    let mut pending = rest.next();
    if let Some(token) = pending {
        if YEAR.is_match(token) {
            parts.year = Some(token.to_string());
            pending = rest.next();
        }
    }
    while let Some(token) = pending {
        if let Some(doi) = token.strip_prefix("DOI ") {
            parts.doi = Some(doi.trim().to_string());
        } else if TAGGED.is_match(token) {
            let value = token[1..].to_string();
            if token.starts_with('V') {
                parts.volume = Some(value);
            } else {
                parts.page = Some(value);
            }
        } else if parts.source.is_none() {
            parts.source = Some(token.to_string());
        }
        pending = rest.next();
    }
    parts
}

/// Parse the leading author token of a compact citation.
///
/// Handles `"Smith JA"`, `"Smith, JA"`, `"Smith J.A."`, full given names
/// (`"Smith John"`, reduced to one initial), and multi-word surnames (inner
/// tokens longer than three characters fold into the surname). Authors
/// starting with `*` or a digit (anonymous or corporate entries) are not
/// parseable.
fn parse_compact_author(token: &str) -> Option<Author> {
    if let Some((last, given)) = token.split_once(',') {
        return Some(Author::new(
            last.trim(),
            expand_compact_initials(given.trim()),
        ));
    }
    let mut words: Vec<&str> = token.split_whitespace().collect();
    if words.len() == 1 && words[0].contains('.') {
        words = words[0].split('.').filter(|w| !w.is_empty()).collect();
    }
    let first = *words.first()?;
    if first.starts_with('*') || first.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return None;
    }

    let mut last_name = first.to_string();
    let mut initials = String::new();
    for (i, word) in words.iter().enumerate().skip(1) {
        if initials.is_empty() && word.len() > 3 && i < words.len() - 1 {
            last_name.push(' ');
            last_name.push_str(word);
        } else if initials.is_empty() {
            initials = if word.chars().any(|c| c.is_lowercase()) {
                // a full given name, keep only the first letter
                word.chars()
                    .next()
                    .map(|c| format!("{}.", c.to_uppercase()))
                    .unwrap_or_default()
            } else {
                expand_compact_initials(word)
            };
        }
    }
    Some(Author::new(last_name, initials))
}

/// Parse an index-format author line, `"Lastname, IJ"`.
fn parse_index_author(author_str: &str) -> Result<Author, ResolveError> {
    let (last, compact) = author_str
        .split_once(',')
        .ok_or_else(|| RecordError::MalformedAuthor(author_str.to_string()))?;
    Ok(Author::new(
        last.trim(),
        expand_compact_initials(compact.trim()),
    ))
}

/// `"JA"` becomes `"J. A."`, `"J-P"` becomes `"J.-P."`.
fn expand_compact_initials(compact: &str) -> String {
    let mut out = String::new();
    let mut chars = compact.chars().filter(|c| *c != '.' && *c != ' ').peekable();
    while let Some(c) = chars.next() {
        if c == '-' {
            out.push('-');
            continue;
        }
        out.extend(c.to_uppercase());
        out.push('.');
        if !matches!(chars.peek(), Some('-') | None) {
            out.push(' ');
        }
    }
    out
}

/// Placeholder bibtex key for an article only known from a citation string.
/// Derived from the normalized string so repeated references to the same
/// unknown work converge on one placeholder.
fn placeholder_key(norm: &str) -> String {
    format!("ref:{}", norm)
}

fn pick(fixed: Option<String>, parsed: Option<String>) -> Option<String> {
    fixed.or(parsed)
}

fn required<'a>(
    value: Option<&'a str>,
    field: &'static str,
    record: &IndexRecord,
) -> Result<&'a str, ResolveError> {
    value.ok_or_else(|| missing_field(field, record))
}

fn missing_field(field: &'static str, record: &IndexRecord) -> ResolveError {
    let key = record
        .title
        .clone()
        .or_else(|| record.authors.first().cloned())
        .unwrap_or_else(|| "<index entry>".to_string());
    RecordError::MissingField { field, key }.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bibnet_domain::ArticleRecord;
    use test_case::test_case;

    fn corpus_with(records: &[ArticleRecord]) -> Corpus {
        let mut corpus = Corpus::new();
        for record in records {
            let article = Article::from_record(record, &mut corpus).unwrap();
            corpus.add_article(article).unwrap();
        }
        corpus
    }

    fn nature_record() -> ArticleRecord {
        let mut record = ArticleRecord::new("Article", "smith2001");
        record.push_field("author", "Smith, J. A.");
        record.push_field("title", "Exploring networks");
        record.push_field("year", "2001");
        record.push_field("journal", "Nature");
        record.push_field("volume", "410");
        record.push_field("pages", "227-235");
        record.push_field("doi", "10.1038/35065725");
        record
    }

    fn resolver(mode: ResolutionMode) -> CitationResolver {
        let mut tables = ResolverTables::new();
        tables.register_short_name("NATURE", "Nature").unwrap();
        CitationResolver::new(tables, mode)
    }

    #[test]
    fn test_doi_match_bypasses_fields() {
        let mut corpus = corpus_with(&[nature_record()]);
        let citing = corpus.add_article(Article::new("citing")).unwrap();
        let mut resolver = resolver(ResolutionMode::Strict);

        // author and year deliberately wrong: the DOI alone decides
        let outcome = resolver
            .resolve(
                &mut corpus,
                citing,
                "Wrong XY, 1987, NOWHERE, DOI 10.1038/35065725",
            )
            .unwrap();
        let id = corpus.article_by_key("smith2001").unwrap();
        assert_eq!(outcome, Resolution::Linked(id));
        assert!(corpus.article(citing).cited.contains(&id));
        assert_eq!(corpus.article(id).times_cited, 1);
    }

    #[test]
    fn test_positional_resolution() {
        let mut corpus = corpus_with(&[nature_record()]);
        let citing = corpus.add_article(Article::new("citing")).unwrap();
        let mut resolver = resolver(ResolutionMode::Strict);

        let outcome = resolver
            .resolve(&mut corpus, citing, "Smith JA, 2001, NATURE, V410, P227")
            .unwrap();
        assert_eq!(
            outcome,
            Resolution::Linked(corpus.article_by_key("smith2001").unwrap())
        );
    }

    #[test]
    fn test_blacklisted_reference_is_skipped() {
        let mut corpus = corpus_with(&[nature_record()]);
        let citing = corpus.add_article(Article::new("citing")).unwrap();
        let mut tables = ResolverTables::new();
        tables.load_ignored_refs("*ANONYMOUS, 1999\n");
        let mut resolver = CitationResolver::new(tables, ResolutionMode::Strict);

        let outcome = resolver
            .resolve(&mut corpus, citing, "*Anonymous, 1999")
            .unwrap();
        assert_eq!(outcome, Resolution::Skipped);
        assert!(corpus.article(citing).cited.is_empty());
    }

    #[test]
    fn test_error_fix_with_bibtex_key() {
        let mut corpus = corpus_with(&[nature_record()]);
        let citing = corpus.add_article(Article::new("citing")).unwrap();
        let mut tables = ResolverTables::new();
        tables
            .load_error_fixes("Smtih JA, 2001, NATRE\tID=smith2001\n")
            .unwrap();
        let mut resolver = CitationResolver::new(tables, ResolutionMode::Strict);

        let outcome = resolver
            .resolve(&mut corpus, citing, "Smtih JA, 2001, NATRE")
            .unwrap();
        assert_eq!(
            outcome,
            Resolution::Linked(corpus.article_by_key("smith2001").unwrap())
        );
    }

    #[test]
    fn test_error_fix_with_field_overrides() {
        let mut corpus = corpus_with(&[nature_record()]);
        let citing = corpus.add_article(Article::new("citing")).unwrap();
        let mut tables = ResolverTables::new();
        tables
            .load_error_fixes("Smith JA, 2001, NATRE, V410\tSO=Nature\n")
            .unwrap();
        let mut resolver = CitationResolver::new(tables, ResolutionMode::Strict);

        let outcome = resolver
            .resolve(&mut corpus, citing, "Smith JA, 2001, NATRE, V410")
            .unwrap();
        assert_eq!(
            outcome,
            Resolution::Linked(corpus.article_by_key("smith2001").unwrap())
        );
    }

    #[test]
    fn test_unknown_short_name_is_fatal() {
        let mut corpus = corpus_with(&[nature_record()]);
        let citing = corpus.add_article(Article::new("citing")).unwrap();
        let mut resolver =
            CitationResolver::new(ResolverTables::new(), ResolutionMode::Permissive);

        assert_eq!(
            resolver.resolve(&mut corpus, citing, "Smith JA, 2001, NATURE, V410"),
            Err(ResolveError::UnknownShortName("NATURE".into()))
        );
    }

    #[test]
    fn test_strict_mode_fails_on_unmatched() {
        let mut corpus = corpus_with(&[nature_record()]);
        let citing = corpus.add_article(Article::new("citing")).unwrap();
        let mut resolver = resolver(ResolutionMode::Strict);

        assert!(matches!(
            resolver.resolve(&mut corpus, citing, "Other AB, 1990, NATURE, V1"),
            Err(ResolveError::Unresolved(_))
        ));
    }

    #[test]
    fn test_permissive_mode_synthesizes_placeholder() {
        let mut corpus = corpus_with(&[nature_record()]);
        let citing_a = corpus.add_article(Article::new("citing-a")).unwrap();
        let citing_b = corpus.add_article(Article::new("citing-b")).unwrap();
        let mut resolver = resolver(ResolutionMode::Permissive);

        let raw = "Other AB, 1990, NATURE, V1";
        let Resolution::Linked(first) = resolver.resolve(&mut corpus, citing_a, raw).unwrap()
        else {
            panic!("expected a link");
        };
        assert!(!corpus.article(first).present);
        assert_eq!(resolver.missing(), [raw]);

        // the same unknown work cited again converges on one placeholder
        let Resolution::Linked(second) = resolver.resolve(&mut corpus, citing_b, raw).unwrap()
        else {
            panic!("expected a link");
        };
        assert_eq!(first, second);
        assert_eq!(resolver.missing().len(), 1);
        assert_eq!(corpus.article(first).times_cited, 2);
    }

    #[test]
    fn test_ambiguous_resolution_is_fatal() {
        let mut first = nature_record();
        first
            .fields
            .retain(|(n, _)| n.as_str() != "doi" && n.as_str() != "pages" && n.as_str() != "title");
        first.push_field("title", "Exploring networks");
        let mut second = first.clone();
        second.key = "smith2001b".into();
        second.fields.retain(|(n, _)| n.as_str() != "title");
        second.push_field("title", "Another study entirely");
        let mut corpus = corpus_with(&[first, second]);
        let citing = corpus.add_article(Article::new("citing")).unwrap();
        let mut resolver = resolver(ResolutionMode::Strict);

        // no title in the citation, so both articles remain compatible
        assert!(matches!(
            resolver.resolve(&mut corpus, citing, "Smith JA, 2001, NATURE, V410"),
            Err(ResolveError::Ambiguous { .. })
        ));
    }

    #[test]
    fn test_ingest_merges_into_existing() {
        let mut corpus = corpus_with(&[nature_record()]);
        let mut resolver = resolver(ResolutionMode::Strict);

        let mut record = IndexRecord::new();
        record.kind = Some(SourceType::Journal);
        record.authors.push("Smith, JA".into());
        record.title = Some("Exploring networks".into());
        record.source_name = Some("Nature".into());
        record.short_source_name = Some("NATURE".into());
        record.year = Some("2001".into());
        record.volume = Some("410".into());
        record.issue = Some("6825".into());
        record.abstract_text = Some("We explore networks.".into());

        let id = resolver.ingest(&mut corpus, &record).unwrap();
        assert_eq!(id, corpus.article_by_key("smith2001").unwrap());
        let article = corpus.article(id);
        assert_eq!(article.issue.as_deref(), Some("6825"));
        assert_eq!(article.abstract_text.as_deref(), Some("We explore networks."));
        // the merge never overwrites what the structured export said
        assert_eq!(article.page.as_deref(), Some("227-235"));
    }

    fn unmatched_record(author: &str, source: &str, short: &str, year: &str) -> IndexRecord {
        let mut record = IndexRecord::new();
        record.kind = Some(SourceType::Journal);
        record.authors.push(author.into());
        record.title = Some("Graph theory".into());
        record.source_name = Some(source.into());
        record.short_source_name = Some(short.into());
        record.year = Some(year.into());
        record
    }

    #[test]
    fn test_ingest_keeps_same_title_records_apart() {
        let mut corpus = Corpus::new();
        let mut resolver = resolver(ResolutionMode::Permissive);

        let first = resolver
            .ingest(
                &mut corpus,
                &unmatched_record("Doe, B", "Nature", "NATURE", "2001"),
            )
            .unwrap();
        let second = resolver
            .ingest(
                &mut corpus,
                &unmatched_record("Kim, S", "Science", "SCIENCE", "1995"),
            )
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(corpus.article_count(), 2);
        assert_eq!(resolver.missing().len(), 2);
    }

    #[test]
    fn test_ingest_disambiguates_colliding_placeholder_keys() {
        let mut corpus = Corpus::new();
        let mut resolver = resolver(ResolutionMode::Permissive);

        // same author, year and title but different venues: not compatible,
        // yet the derived keys are identical
        let first = resolver
            .ingest(
                &mut corpus,
                &unmatched_record("Doe, B", "Nature", "NATURE", "2001"),
            )
            .unwrap();
        let second = resolver
            .ingest(
                &mut corpus,
                &unmatched_record("Doe, B", "Science", "SCIENCE", "2001"),
            )
            .unwrap();

        assert_ne!(first, second);
        assert_ne!(
            corpus.article(first).bibtex_key,
            corpus.article(second).bibtex_key
        );
    }

    #[test]
    fn test_ingest_registers_short_name_conflicts() {
        let mut corpus = corpus_with(&[nature_record()]);
        let mut resolver = resolver(ResolutionMode::Strict);

        let mut record = IndexRecord::new();
        record.kind = Some(SourceType::Journal);
        record.authors.push("Smith, JA".into());
        record.title = Some("Exploring networks".into());
        record.source_name = Some("Nachure".into());
        record.short_source_name = Some("NATURE".into());
        record.year = Some("2001".into());

        assert!(matches!(
            resolver.ingest(&mut corpus, &record),
            Err(ResolveError::ShortNameConflict { .. })
        ));
    }

    #[test]
    fn test_apply_completed_refs() {
        let mut corpus = corpus_with(&[nature_record()]);
        let citing = corpus.add_article(Article::new("doe2003")).unwrap();
        let mut tables = ResolverTables::new();
        tables
            .load_completed_refs("doe2003\t10.1038/35065725\n")
            .unwrap();
        let resolver = CitationResolver::new(tables, ResolutionMode::Strict);

        resolver.apply_completed_refs(&mut corpus).unwrap();
        let cited = corpus.article_by_key("smith2001").unwrap();
        assert!(corpus.article(citing).cited.contains(&cited));
    }

    #[test_case("Smith JA", "smith ja"; "compact initials")]
    #[test_case("Smith, JA", "smith ja"; "comma separated")]
    #[test_case("Smith J.A.", "smith ja"; "dotted initials")]
    #[test_case("Smith John", "smith j"; "full given name")]
    #[test_case("Vanden Berghe F", "vanden berghe f"; "multi word surname")]
    fn test_parse_compact_author(token: &str, expected: &str) {
        assert_eq!(
            parse_compact_author(token).unwrap().canonical_key(),
            expected
        );
    }

    #[test]
    fn test_parse_compact_author_rejects_anonymous_entries() {
        assert!(parse_compact_author("*Anonymous").is_none());
        assert!(parse_compact_author("1998 Report").is_none());
    }

    #[test]
    fn test_expand_compact_initials() {
        assert_eq!(expand_compact_initials("JA"), "J. A.");
        assert_eq!(expand_compact_initials("J-P"), "J.-P.");
        assert_eq!(expand_compact_initials("M"), "M.");
        assert_eq!(expand_compact_initials(""), "");
    }

    #[test]
    fn test_parse_compact_positions() {
        let parts = parse_compact("Smith JA, 2001, NATURE, V410, P227, DOI 10.1038/x");
        assert_eq!(parts.year.as_deref(), Some("2001"));
        assert_eq!(parts.source.as_deref(), Some("NATURE"));
        assert_eq!(parts.volume.as_deref(), Some("410"));
        assert_eq!(parts.page.as_deref(), Some("227"));
        assert_eq!(parts.doi.as_deref(), Some("10.1038/x"));

        // a source starting with P or V is not mistaken for a tag
        let parts = parse_compact("Smith JA, 2001, PHYS REV E, V60");
        assert_eq!(parts.source.as_deref(), Some("PHYS REV E"));
        assert_eq!(parts.volume.as_deref(), Some("60"));
    }
}
