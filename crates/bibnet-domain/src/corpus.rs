//! Corpus: the arena owning every article and author
//!
//! Articles and authors live in arenas and are referred to by copyable ids,
//! so the citation graph can be cyclic without shared ownership. Ids are
//! only ever minted by the corpus that owns the arena; mixing ids across
//! corpora is a logic error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::article::Article;
use crate::author::Author;
use crate::error::CorpusError;

/// Handle to an [`Article`] in a [`Corpus`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArticleId(usize);

/// Handle to an [`Author`] in a [`Corpus`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AuthorId(usize);

/// The full set of articles and authors under reconciliation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Corpus {
    articles: Vec<Article>,
    by_key: HashMap<String, ArticleId>,
    authors: Vec<Author>,
    by_author_key: HashMap<String, AuthorId>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an article. The bibtex key must be unused.
    pub fn add_article(&mut self, article: Article) -> Result<ArticleId, CorpusError> {
        if self.by_key.contains_key(&article.bibtex_key) {
            return Err(CorpusError::DuplicateKey(article.bibtex_key.clone()));
        }
        let id = ArticleId(self.articles.len());
        self.by_key.insert(article.bibtex_key.clone(), id);
        self.articles.push(article);
        Ok(id)
    }

    pub fn article(&self, id: ArticleId) -> &Article {
        &self.articles[id.0]
    }

    pub fn article_mut(&mut self, id: ArticleId) -> &mut Article {
        &mut self.articles[id.0]
    }

    /// Look an article up by its bibtex key.
    pub fn article_by_key(&self, key: &str) -> Option<ArticleId> {
        self.by_key.get(key).copied()
    }

    /// Look an article up by DOI, case-insensitively.
    pub fn article_by_doi(&self, doi: &str) -> Option<ArticleId> {
        self.articles
            .iter()
            .position(|a| {
                a.doi
                    .as_deref()
                    .is_some_and(|d| d.eq_ignore_ascii_case(doi))
            })
            .map(ArticleId)
    }

    /// All articles, in insertion order.
    pub fn articles(&self) -> impl Iterator<Item = (ArticleId, &Article)> {
        self.articles
            .iter()
            .enumerate()
            .map(|(i, a)| (ArticleId(i), a))
    }

    pub fn article_count(&self) -> usize {
        self.articles.len()
    }

    /// The shared author instance for this identity, creating it on first
    /// sight. Authors are compared by canonical key, so variant spellings
    /// of the same name converge on one id.
    pub fn retrieve_author(&mut self, author: Author) -> AuthorId {
        if let Some(&id) = self.by_author_key.get(author.canonical_key()) {
            return id;
        }
        let id = AuthorId(self.authors.len());
        self.by_author_key
            .insert(author.canonical_key().to_string(), id);
        self.authors.push(author);
        id
    }

    pub fn author(&self, id: AuthorId) -> &Author {
        &self.authors[id.0]
    }

    /// Look an author up by canonical key, without creating one.
    pub fn author_by_key(&self, canonical_key: &str) -> Option<AuthorId> {
        self.by_author_key.get(canonical_key).copied()
    }

    /// All authors, in registration order.
    pub fn authors(&self) -> impl Iterator<Item = (AuthorId, &Author)> {
        self.authors
            .iter()
            .enumerate()
            .map(|(i, a)| (AuthorId(i), a))
    }

    pub fn author_count(&self) -> usize {
        self.authors.len()
    }

    /// Record that `citing` cites `cited`, updating both edge sets and the
    /// cited article's citation count. Repeated insertions are no-ops.
    pub fn add_citation(&mut self, citing: ArticleId, cited: ArticleId) {
        if self.articles[citing.0].cited.insert(cited) {
            self.articles[cited.0].citing.insert(citing);
            self.articles[cited.0].times_cited += 1;
        }
    }

    /// Exclude the named articles from the review. Unknown keys are fatal,
    /// a stale exclusion list should be noticed rather than skipped.
    pub fn mark_ignored<I, S>(&mut self, keys: I) -> Result<(), CorpusError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for key in keys {
            let key = key.as_ref();
            let id = self
                .article_by_key(key)
                .ok_or_else(|| CorpusError::UnknownKey(key.to_string()))?;
            self.articles[id.0].ignored = true;
        }
        Ok(())
    }

    /// Flag the named articles as the targeted set of the review.
    pub fn mark_core<I, S>(&mut self, keys: I) -> Result<(), CorpusError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for key in keys {
            let key = key.as_ref();
            let id = self
                .article_by_key(key)
                .ok_or_else(|| CorpusError::UnknownKey(key.to_string()))?;
            self.articles[id.0].core = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_rejected() {
        let mut corpus = Corpus::new();
        corpus.add_article(Article::new("smith2001")).unwrap();
        assert_eq!(
            corpus.add_article(Article::new("smith2001")),
            Err(CorpusError::DuplicateKey("smith2001".into()))
        );
    }

    #[test]
    fn test_author_registry_dedups_by_key() {
        let mut corpus = Corpus::new();
        let a = corpus.retrieve_author(Author::new("Smith", "J. A."));
        let b = corpus.retrieve_author(Author::from_full_name("Smith, John Albert").unwrap());
        assert_eq!(a, b);
        assert_eq!(corpus.author_count(), 1);
        // the first-seen display form wins
        assert_eq!(corpus.author(a).initials, "J. A.");
    }

    #[test]
    fn test_add_citation_updates_both_sides() {
        let mut corpus = Corpus::new();
        let citing = corpus.add_article(Article::new("a")).unwrap();
        let cited = corpus.add_article(Article::new("b")).unwrap();

        corpus.add_citation(citing, cited);
        corpus.add_citation(citing, cited);

        assert!(corpus.article(citing).cited.contains(&cited));
        assert!(corpus.article(cited).citing.contains(&citing));
        assert_eq!(corpus.article(cited).times_cited, 1);
        assert_eq!(corpus.article(citing).times_cited, 0);
    }

    #[test]
    fn test_article_by_doi_is_case_insensitive() {
        let mut corpus = Corpus::new();
        let mut article = Article::new("a");
        article.doi = Some("10.1038/NPHYS1234".into());
        let id = corpus.add_article(article).unwrap();
        assert_eq!(corpus.article_by_doi("10.1038/nphys1234"), Some(id));
        assert_eq!(corpus.article_by_doi("10.1038/other"), None);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut corpus = Corpus::new();
        let author = corpus.retrieve_author(Author::new("Smith", "J. A."));
        let mut article = Article::new("smith2001");
        article.add_author(author);
        article.year = Some("2001".into());
        let cited = corpus.add_article(article).unwrap();
        let citing = corpus.add_article(Article::new("doe2003")).unwrap();
        corpus.add_citation(citing, cited);

        let json = serde_json::to_string(&corpus).unwrap();
        let restored: Corpus = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.article_count(), 2);
        let id = restored.article_by_key("smith2001").unwrap();
        assert_eq!(restored.article(id).year.as_deref(), Some("2001"));
        assert!(restored.article(id).citing.contains(&citing));
        assert_eq!(restored.author(author).canonical_key(), "smith ja");
    }

    #[test]
    fn test_mark_ignored_unknown_key_is_fatal() {
        let mut corpus = Corpus::new();
        corpus.add_article(Article::new("a")).unwrap();
        assert!(corpus.mark_ignored(["a"]).is_ok());
        assert!(corpus.article(corpus.article_by_key("a").unwrap()).ignored);
        assert_eq!(
            corpus.mark_ignored(["missing"]),
            Err(CorpusError::UnknownKey("missing".into()))
        );
    }
}
