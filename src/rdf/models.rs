//! Builders for the graphs that make up a node's RDF view.

use oxrdf::vocab::xsd;
use oxrdf::{Graph, Literal, NamedNode, Subject, Term, Triple};
use tracing::trace;

use crate::storage::NodeStore;
use crate::types::{NodePath, Result};

use super::namespaces::NamespaceRegistry;
use super::subjects::GraphSubjects;
use super::terms::value_to_term;
use super::vocab;

/// Collaborators shared by every model builder.
#[derive(Clone, Copy)]
pub struct ModelContext<'a> {
    pub store: &'a dyn NodeStore,
    pub subjects: &'a dyn GraphSubjects,
    pub namespaces: &'a NamespaceRegistry,
}

/// Contiguous window over a node's children.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    /// `None` means unbounded.
    pub limit: Option<u64>,
}

impl Window {
    /// Every child, starting from the first.
    pub fn unbounded() -> Self {
        Self {
            offset: 0,
            limit: None,
        }
    }

    pub fn new(offset: u64, limit: Option<u64>) -> Self {
        Self { offset, limit }
    }

    /// Window from a signed limit where any negative value (conventionally
    /// `-1`) means unbounded.
    pub fn from_signed(offset: u64, limit: i64) -> Self {
        Self {
            offset,
            limit: u64::try_from(limit).ok(),
        }
    }

    pub fn contains(&self, index: u64) -> bool {
        index >= self.offset
            && self
                .limit
                .map_or(true, |limit| index < self.offset.saturating_add(limit))
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Subject IRI for the node at `path`.
pub fn graph_subject(subjects: &dyn GraphSubjects, path: &NodePath) -> Result<NamedNode> {
    subjects.subject_for(path)
}

/// One triple per stored value of every property, plus the node's types.
pub fn properties_model(ctx: ModelContext<'_>, path: &NodePath) -> Result<Graph> {
    let mut graph = Graph::new();
    add_properties_to_model(ctx, path, &mut graph)?;
    Ok(graph)
}

/// Adds the node's property triples to `graph`.
pub fn add_properties_to_model(ctx: ModelContext<'_>, path: &NodePath, graph: &mut Graph) -> Result<()> {
    let subject = graph_subject(ctx.subjects, path)?;
    let types = ctx.store.node_types(path)?;

    let primary = ctx.namespaces.predicate_for(vocab::PRIMARY_TYPE_PROPERTY)?;
    graph.insert(&Triple::new(
        subject.clone(),
        primary,
        Literal::new_simple_literal(types.primary.as_str()),
    ));
    let mixins = ctx.namespaces.predicate_for(vocab::MIXIN_TYPES_PROPERTY)?;
    for mixin in &types.mixins {
        graph.insert(&Triple::new(
            subject.clone(),
            mixins.clone(),
            Literal::new_simple_literal(mixin.as_str()),
        ));
    }

    for (name, property) in ctx.store.properties(path)? {
        if vocab::is_type_property(&name) {
            continue;
        }
        let predicate = ctx.namespaces.predicate_for(&name)?;
        for value in property.values() {
            let object = value_to_term(value, ctx.subjects)?;
            graph.insert(&Triple::new(subject.clone(), predicate.clone(), object));
        }
    }
    trace!(path = %path, triples = graph.len(), "models.properties");
    Ok(())
}

/// Parent link, a window of child links with the children's properties, and
/// the number of visible children.
pub fn tree_model(ctx: ModelContext<'_>, path: &NodePath, window: Window) -> Result<Graph> {
    let mut graph = Graph::new();
    let subject = graph_subject(ctx.subjects, path)?;
    let has_parent = NamedNode::new_unchecked(vocab::HAS_PARENT);
    let has_child = NamedNode::new_unchecked(vocab::HAS_CHILD);

    if let Some(parent) = path.parent() {
        graph.insert(&Triple::new(
            subject.clone(),
            has_parent.clone(),
            graph_subject(ctx.subjects, &parent)?,
        ));
    }

    let mut index = 0u64;
    let mut excluded = 0u64;
    for name in ctx.store.children(path)? {
        let child = path.child(&name)?;
        if is_internal_node(ctx.store, &child)? {
            excluded += 1;
            continue;
        }
        if window.contains(index) {
            let child_subject = graph_subject(ctx.subjects, &child)?;
            graph.insert(&Triple::new(
                subject.clone(),
                has_child.clone(),
                child_subject.clone(),
            ));
            graph.insert(&Triple::new(child_subject, has_parent.clone(), subject.clone()));
            add_properties_to_model(ctx, &child, &mut graph)?;
        }
        index += 1;
    }

    graph.insert(&Triple::new(
        subject,
        NamedNode::new_unchecked(vocab::NUMBER_OF_CHILDREN),
        Literal::new_typed_literal(index.to_string(), xsd::LONG),
    ));
    trace!(path = %path, children = index, excluded, triples = graph.len(), "models.tree");
    Ok(graph)
}

/// Empty graph awaiting statements that could not be stored.
pub fn problems_model() -> Graph {
    Graph::new()
}

/// Records that `predicate` could not be stored on `subject`.
pub fn record_problem(problems: &mut Graph, subject: Subject, predicate: &NamedNode) {
    problems.insert(&Triple::new(
        subject,
        NamedNode::new_unchecked(vocab::COULD_NOT_STORE_PROPERTY),
        Term::from(Literal::new_simple_literal(predicate.as_str())),
    ));
}

fn is_internal_node(store: &dyn NodeStore, path: &NodePath) -> Result<bool> {
    Ok(store.node_types(path)?.primary == vocab::INTERNAL_NODE_TYPE)
}
