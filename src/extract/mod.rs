//! Pluggable triple extraction.
//!
//! A persisted catalog maps node type names to ordered extractor
//! identifiers; a registry of factories turns those identifiers into live
//! [`Extractor`]s. The built-in [`TreePropertiesExtractor`] contributes the
//! properties, tree and problems graphs every node view starts from.

mod catalog;
mod registry;
mod tree;

pub use catalog::{ExtractorCatalog, DEFAULT_CATALOG_ROOT};
pub use registry::{ExtractorFactory, ExtractorRegistry};
pub use tree::{TreePropertiesExtractor, TREE_EXTRACTOR_ID};

use crate::rdf::{ModelContext, NodeDataset, Window};
use crate::types::{NodePath, Result};

/// A unit that contributes RDF for a node.
///
/// Extractors must not touch storage except through the property mutation
/// rules in [`crate::storage::props`].
pub trait Extractor: Send + Sync {
    /// Name of the model this extractor contributes, used to tell its
    /// graphs apart inside a multi-graph dataset.
    fn model_name(&self) -> &str;

    /// Produces a dataset fragment for the node at `path`, restricted to
    /// `window` where the extractor lists children. `existing` is the
    /// dataset assembled so far.
    fn extract(
        &self,
        ctx: ModelContext<'_>,
        path: &NodePath,
        existing: &NodeDataset,
        window: Window,
    ) -> Result<NodeDataset>;

    /// [`Extractor::extract`] over every child.
    fn extract_all(
        &self,
        ctx: ModelContext<'_>,
        path: &NodePath,
        existing: &NodeDataset,
    ) -> Result<NodeDataset> {
        self.extract(ctx, path, existing, Window::unbounded())
    }
}
