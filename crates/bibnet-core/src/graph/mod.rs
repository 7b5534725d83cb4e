//! Property graphs derived from a corpus
//!
//! A named, directed or undirected graph with typed node and link property
//! schemas declared before population, ready for export to any graph
//! interchange format. Nodes are keyed by a stable name (an article's bibtex
//! key or an author's canonical key); links by the ordered pair of endpoint
//! names, canonicalized lexicographically for undirected graphs so a reverse
//! edge never duplicates an existing one.

pub mod builders;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Declared type of a node or link property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyType {
    Str,
    Int,
    Float,
}

impl PropertyType {
    fn default_value(self) -> PropertyValue {
        match self {
            PropertyType::Str => PropertyValue::Str(String::new()),
            PropertyType::Int => PropertyValue::Int(0),
            PropertyType::Float => PropertyValue::Float(0.0),
        }
    }
}

/// A property value on a node or link.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Str(String),
    Int(i64),
    Float(f64),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

/// A graph node, initialized with the schema's default property values.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    properties: BTreeMap<String, PropertyValue>,
}

impl Node {
    pub fn set(&mut self, property: &str, value: PropertyValue) {
        self.properties.insert(property.to_string(), value);
    }

    pub fn get(&self, property: &str) -> Option<&PropertyValue> {
        self.properties.get(property)
    }
}

/// A graph link between two named nodes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Link {
    pub from: String,
    pub to: String,
    properties: BTreeMap<String, PropertyValue>,
}

impl Link {
    pub fn set(&mut self, property: &str, value: PropertyValue) {
        self.properties.insert(property.to_string(), value);
    }

    pub fn get(&self, property: &str) -> Option<&PropertyValue> {
        self.properties.get(property)
    }

    /// Add to an integer property, treating an unset value as zero.
    pub fn increment_int(&mut self, property: &str, by: i64) {
        let value = match self.properties.get(property) {
            Some(PropertyValue::Int(i)) => i + by,
            _ => by,
        };
        self.properties
            .insert(property.to_string(), PropertyValue::Int(value));
    }

    /// Add to a float property, treating an unset value as zero.
    pub fn increment_float(&mut self, property: &str, by: f64) {
        let value = match self.properties.get(property) {
            Some(PropertyValue::Float(f)) => f + by,
            _ => by,
        };
        self.properties
            .insert(property.to_string(), PropertyValue::Float(value));
    }
}

/// A derived graph. Built fresh per graph-building operation and not kept in
/// the corpus.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Graph {
    pub name: String,
    pub directed: bool,
    node_schema: BTreeMap<String, PropertyType>,
    link_schema: BTreeMap<String, PropertyType>,
    nodes: BTreeMap<String, Node>,
    links: BTreeMap<(String, String), Link>,
}

impl Graph {
    pub fn new(name: impl Into<String>, directed: bool) -> Self {
        Self {
            name: name.into(),
            directed,
            node_schema: BTreeMap::new(),
            link_schema: BTreeMap::new(),
            nodes: BTreeMap::new(),
            links: BTreeMap::new(),
        }
    }

    /// Declare a node property. Must happen before the nodes are created so
    /// every node starts from the declared defaults.
    pub fn add_node_property(&mut self, name: &str, kind: PropertyType) {
        self.node_schema.insert(name.to_string(), kind);
    }

    /// Declare a link property.
    pub fn add_link_property(&mut self, name: &str, kind: PropertyType) {
        self.link_schema.insert(name.to_string(), kind);
    }

    pub fn node_schema(&self) -> impl Iterator<Item = (&str, PropertyType)> {
        self.node_schema.iter().map(|(n, t)| (n.as_str(), *t))
    }

    pub fn link_schema(&self) -> impl Iterator<Item = (&str, PropertyType)> {
        self.link_schema.iter().map(|(n, t)| (n.as_str(), *t))
    }

    /// The node with this name, created with default properties on first
    /// access.
    pub fn retrieve_node(&mut self, name: &str) -> &mut Node {
        let schema = &self.node_schema;
        self.nodes.entry(name.to_string()).or_insert_with(|| Node {
            name: name.to_string(),
            properties: schema
                .iter()
                .map(|(prop, kind)| (prop.clone(), kind.default_value()))
                .collect(),
        })
    }

    /// The link between two nodes, created with default properties on first
    /// access. For undirected graphs the endpoint pair is canonicalized, so
    /// `(a, b)` and `(b, a)` name the same link.
    pub fn retrieve_link(&mut self, from: &str, to: &str) -> &mut Link {
        let (from, to) = self.link_key(from, to);
        let schema = &self.link_schema;
        self.links
            .entry((from.clone(), to.clone()))
            .or_insert_with(|| Link {
                from,
                to,
                properties: schema
                    .iter()
                    .map(|(prop, kind)| (prop.clone(), kind.default_value()))
                    .collect(),
            })
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    pub fn link(&self, from: &str, to: &str) -> Option<&Link> {
        self.links.get(&self.link_key(from, to))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    fn link_key(&self, from: &str, to: &str) -> (String, String) {
        if self.directed || from <= to {
            (from.to_string(), to.to_string())
        } else {
            (to.to_string(), from.to_string())
        }
    }
}
