//! Derived-graph builders
//!
//! Each builder declares its property schema, adds one node per article or
//! author annotated with its bibliographic fields, then populates the edges.
//! Article nodes are keyed by bibtex key, author nodes by canonical key.

use std::collections::BTreeSet;

use bibnet_domain::{record, Article, ArticleId, AuthorId, Corpus};
use tracing::info;

use super::{Graph, Node, PropertyType, PropertyValue};

/// Node type discriminator in bipartite graphs.
pub const PROP_TYPE: &str = "type";
/// Main link weight.
pub const PROP_WEIGHT: &str = "weight";
/// Secondary integer link weight (intersection sizes).
pub const PROP_COUNT: &str = "count";
/// Bibtex key repeated on targeted articles, empty elsewhere; used to label
/// only the articles under review in visualizations.
pub const PROP_CORE_LABEL: &str = "core_label";
/// Author display name.
pub const PROP_FULLNAME: &str = "fullname";

/// Bipartite authorship graph: one undirected, unweighted edge per
/// (article, author of that article) pair.
pub fn authorship_graph(corpus: &Corpus) -> Graph {
    let mut graph = Graph::new("Authorship network", false);
    graph.add_node_property(PROP_TYPE, PropertyType::Str);
    graph.add_node_property(PROP_FULLNAME, PropertyType::Str);
    declare_article_properties(&mut graph);

    for (_, article) in corpus.articles() {
        annotate_article(&mut graph, corpus, article)
            .set(PROP_TYPE, PropertyValue::Str("Article".into()));
    }
    for (id, _) in corpus.authors() {
        annotate_author(&mut graph, corpus, id)
            .set(PROP_TYPE, PropertyValue::Str("Author".into()));
    }

    for (_, article) in corpus.articles() {
        for &author in &article.authors {
            let author_key = corpus.author(author).canonical_key().to_string();
            graph.retrieve_link(&article.bibtex_key, &author_key);
        }
    }
    log_built(&graph);
    graph
}

/// Directed citation graph over articles, one weighted edge per cites-edge,
/// pointing from the citing to the cited article.
pub fn article_citation_graph(corpus: &Corpus) -> Graph {
    let mut graph = Graph::new("Article citation network", true);
    declare_article_properties(&mut graph);
    graph.add_link_property(PROP_WEIGHT, PropertyType::Int);

    for (_, article) in corpus.articles() {
        annotate_article(&mut graph, corpus, article);
    }
    for (_, article) in corpus.articles() {
        for &cited in &article.cited {
            let cited_key = corpus.article(cited).bibtex_key.clone();
            graph
                .retrieve_link(&article.bibtex_key, &cited_key)
                .increment_int(PROP_WEIGHT, 1);
        }
    }
    log_built(&graph);
    graph
}

/// Directed citation graph over authors. An edge points from a citing
/// author to a cited author, weighted by the number of (citing article,
/// cited article, author pair) combinations contributing to it.
pub fn author_citation_graph(corpus: &Corpus) -> Graph {
    let mut graph = Graph::new("Author citation network", true);
    graph.add_node_property(PROP_FULLNAME, PropertyType::Str);
    graph.add_link_property(PROP_WEIGHT, PropertyType::Int);

    for (id, _) in corpus.authors() {
        annotate_author(&mut graph, corpus, id);
    }
    for (_, article) in corpus.articles() {
        for &cited in &article.cited {
            let cited_article = corpus.article(cited);
            for &citing_author in &article.authors {
                let citing_key = corpus.author(citing_author).canonical_key().to_string();
                for &cited_author in &cited_article.authors {
                    let cited_key = corpus.author(cited_author).canonical_key();
                    graph
                        .retrieve_link(&citing_key, cited_key)
                        .increment_int(PROP_WEIGHT, 1);
                }
            }
        }
    }
    log_built(&graph);
    graph
}

/// Undirected graph connecting articles sharing at least one author,
/// weighted by the Jaccard coefficient of their author sets, with the
/// intersection size as a secondary count.
pub fn article_coauthorship_graph(corpus: &Corpus) -> Graph {
    let mut graph = Graph::new("Article coauthorship network", false);
    declare_article_properties(&mut graph);
    graph.add_link_property(PROP_WEIGHT, PropertyType::Float);
    graph.add_link_property(PROP_COUNT, PropertyType::Int);

    for (_, article) in corpus.articles() {
        annotate_article(&mut graph, corpus, article);
    }

    let articles: Vec<&Article> = corpus.articles().map(|(_, a)| a).collect();
    for (i, first) in articles.iter().enumerate() {
        let authors1: BTreeSet<AuthorId> = first.authors.iter().copied().collect();
        for second in &articles[i + 1..] {
            let authors2: BTreeSet<AuthorId> = second.authors.iter().copied().collect();
            let (count, weight) = jaccard(&authors1, &authors2);
            if count > 0 {
                let link = graph.retrieve_link(&first.bibtex_key, &second.bibtex_key);
                link.increment_float(PROP_WEIGHT, weight);
                link.increment_int(PROP_COUNT, count as i64);
            }
        }
    }
    log_built(&graph);
    graph
}

/// Undirected graph connecting authors who published together, weighted by
/// the number of co-authored articles.
pub fn author_coauthorship_graph(corpus: &Corpus) -> Graph {
    let mut graph = Graph::new("Author coauthorship network", false);
    graph.add_node_property(PROP_FULLNAME, PropertyType::Str);
    graph.add_link_property(PROP_WEIGHT, PropertyType::Int);

    for (id, _) in corpus.authors() {
        annotate_author(&mut graph, corpus, id);
    }
    for (_, article) in corpus.articles() {
        for (i, &first) in article.authors.iter().enumerate() {
            let first_key = corpus.author(first).canonical_key().to_string();
            for &second in &article.authors[i + 1..] {
                let second_key = corpus.author(second).canonical_key();
                graph
                    .retrieve_link(&first_key, second_key)
                    .increment_int(PROP_WEIGHT, 1);
            }
        }
    }
    log_built(&graph);
    graph
}

/// Undirected graph connecting articles citing common references, weighted
/// by the Jaccard coefficient of their cited sets.
pub fn cociting_graph(corpus: &Corpus) -> Graph {
    article_overlap_graph(corpus, "Article cociting network", |article| {
        &article.cited
    })
}

/// Undirected graph connecting articles cited by common articles, weighted
/// by the Jaccard coefficient of their citing sets.
pub fn cocited_graph(corpus: &Corpus) -> Graph {
    article_overlap_graph(corpus, "Article cocited network", |article| {
        &article.citing
    })
}

fn article_overlap_graph(
    corpus: &Corpus,
    name: &str,
    edge_set: impl Fn(&Article) -> &BTreeSet<ArticleId>,
) -> Graph {
    let mut graph = Graph::new(name, false);
    declare_article_properties(&mut graph);
    graph.add_link_property(PROP_WEIGHT, PropertyType::Float);
    graph.add_link_property(PROP_COUNT, PropertyType::Int);

    for (_, article) in corpus.articles() {
        annotate_article(&mut graph, corpus, article);
    }

    let articles: Vec<&Article> = corpus.articles().map(|(_, a)| a).collect();
    for (i, first) in articles.iter().enumerate() {
        for second in &articles[i + 1..] {
            let (count, weight) = jaccard(edge_set(first), edge_set(second));
            if count > 0 {
                let link = graph.retrieve_link(&first.bibtex_key, &second.bibtex_key);
                link.increment_float(PROP_WEIGHT, weight);
                link.increment_int(PROP_COUNT, count as i64);
            }
        }
    }
    log_built(&graph);
    graph
}

/// `(|A∩B|, |A∩B| / |A∪B|)`, zero weight for two empty sets.
fn jaccard<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> (usize, f64) {
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    let weight = if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    };
    (intersection, weight)
}

fn declare_article_properties(graph: &mut Graph) {
    for property in [
        record::FLD_AUTHOR,
        record::FLD_TITLE,
        record::FLD_JOURNAL,
        record::FLD_BOOKTITLE,
        record::FLD_VOLUME,
        record::FLD_NUMBER,
        record::FLD_PAGES,
        record::FLD_YEAR,
        record::FLD_DOI,
        record::FLD_URL,
        record::FLD_CHAPTER,
    ] {
        graph.add_node_property(property, PropertyType::Str);
    }
    graph.add_node_property(PROP_CORE_LABEL, PropertyType::Str);
}

fn annotate_article<'g>(graph: &'g mut Graph, corpus: &Corpus, article: &Article) -> &'g mut Node {
    let authors = article
        .authors
        .iter()
        .map(|&id| corpus.author(id).full_name())
        .collect::<Vec<_>>()
        .join(" and ");
    let journal = article
        .source
        .as_ref()
        .and_then(|s| s.journal())
        .or(article.journal.as_deref());
    let booktitle = article
        .source
        .as_ref()
        .and_then(|s| s.booktitle())
        .or(article.booktitle.as_deref());

    let node = graph.retrieve_node(&article.bibtex_key);
    node.set(record::FLD_AUTHOR, PropertyValue::Str(authors));
    set_opt(node, record::FLD_TITLE, article.title());
    set_opt(node, record::FLD_JOURNAL, journal);
    set_opt(node, record::FLD_BOOKTITLE, booktitle);
    set_opt(node, record::FLD_VOLUME, article.volume.as_deref());
    set_opt(node, record::FLD_NUMBER, article.issue.as_deref());
    set_opt(node, record::FLD_PAGES, article.page.as_deref());
    set_opt(node, record::FLD_YEAR, article.year.as_deref());
    set_opt(node, record::FLD_DOI, article.doi.as_deref());
    set_opt(node, record::FLD_URL, article.url.as_deref());
    set_opt(node, record::FLD_CHAPTER, article.chapter.as_deref());
    if article.core {
        node.set(
            PROP_CORE_LABEL,
            PropertyValue::Str(article.bibtex_key.clone()),
        );
    }
    node
}

fn annotate_author<'g>(graph: &'g mut Graph, corpus: &Corpus, id: AuthorId) -> &'g mut Node {
    let author = corpus.author(id);
    let node = graph.retrieve_node(author.canonical_key());
    node.set(
        PROP_FULLNAME,
        PropertyValue::Str(author.display_name()),
    );
    node
}

fn set_opt(node: &mut Node, property: &str, value: Option<&str>) {
    if let Some(value) = value {
        node.set(property, PropertyValue::Str(value.to_string()));
    }
}

fn log_built(graph: &Graph) {
    info!(
        name = %graph.name,
        nodes = graph.node_count(),
        links = graph.link_count(),
        "graph built"
    );
}
