use std::collections::BTreeMap;

use oxrdf::Graph;

use super::vocab::{PROBLEMS_MODEL_NAME, TREE_MODEL_NAME, URI_SYMBOL};

/// Multi-graph view of a node: a default graph, named graphs, and a small
/// key/value execution context.
///
/// Datasets are transient: they are rebuilt from storage on every read and
/// never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeDataset {
    default: Graph,
    named: BTreeMap<String, Graph>,
    context: BTreeMap<String, String>,
}

impl NodeDataset {
    /// Dataset whose default graph is `default`.
    pub fn new(default: Graph) -> Self {
        Self {
            default,
            named: BTreeMap::new(),
            context: BTreeMap::new(),
        }
    }

    pub fn default_graph(&self) -> &Graph {
        &self.default
    }

    pub fn default_graph_mut(&mut self) -> &mut Graph {
        &mut self.default
    }

    /// Adds a named graph, replacing any graph already stored under `name`.
    pub fn add_named_graph(&mut self, name: impl Into<String>, graph: Graph) {
        self.named.insert(name.into(), graph);
    }

    pub fn named_graph(&self, name: &str) -> Option<&Graph> {
        self.named.get(name)
    }

    /// Named graph `name`, created empty if missing.
    pub fn named_graph_entry(&mut self, name: &str) -> &mut Graph {
        self.named.entry(name.to_owned()).or_default()
    }

    pub fn named_graphs(&self) -> impl Iterator<Item = (&str, &Graph)> {
        self.named.iter().map(|(name, graph)| (name.as_str(), graph))
    }

    pub fn tree(&self) -> Option<&Graph> {
        self.named_graph(TREE_MODEL_NAME)
    }

    pub fn problems(&self) -> Option<&Graph> {
        self.named_graph(PROBLEMS_MODEL_NAME)
    }

    pub fn context(&self, key: &str) -> Option<&str> {
        self.context.get(key).map(String::as_str)
    }

    pub fn set_context(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.context.insert(key.into(), value.into());
    }

    pub fn context_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.context.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// URI of the subject the dataset was assembled for.
    pub fn subject_uri(&self) -> Option<&str> {
        self.context(URI_SYMBOL)
    }

    /// Total number of triples across all graphs.
    pub fn len(&self) -> usize {
        self.default.len() + self.named.values().map(Graph::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Folds `other` into this dataset: graphs are unioned by name and
    /// context entries from `other` win.
    pub fn merge(&mut self, other: NodeDataset) {
        extend_graph(&mut self.default, &other.default);
        for (name, graph) in other.named {
            match self.named.get_mut(&name) {
                Some(existing) => extend_graph(existing, &graph),
                None => {
                    self.named.insert(name, graph);
                }
            }
        }
        self.context.extend(other.context);
    }
}

pub(crate) fn extend_graph(target: &mut Graph, source: &Graph) {
    for triple in source.iter() {
        target.insert(triple);
    }
}
