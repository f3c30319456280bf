use tracing::debug;

use crate::rdf::models::{problems_model, properties_model, tree_model};
use crate::rdf::vocab::{PROBLEMS_MODEL_NAME, TREE_MODEL_NAME, URI_SYMBOL};
use crate::rdf::{ModelContext, NodeDataset, Window};
use crate::types::{NodePath, Result};

use super::Extractor;

/// Identifier the built-in extractor is registered under.
pub const TREE_EXTRACTOR_ID: &str = "tree-properties";

/// Default extractor: the node's properties as the default graph, its
/// position in the hierarchy as the `tree` graph, and an empty `problems`
/// graph.
#[derive(Clone, Copy, Debug, Default)]
pub struct TreePropertiesExtractor;

impl Extractor for TreePropertiesExtractor {
    fn model_name(&self) -> &str {
        TREE_MODEL_NAME
    }

    fn extract(
        &self,
        ctx: ModelContext<'_>,
        path: &NodePath,
        _existing: &NodeDataset,
        window: Window,
    ) -> Result<NodeDataset> {
        let subject = ctx.subjects.subject_for(path)?;
        let mut dataset = NodeDataset::new(properties_model(ctx, path)?);
        dataset.add_named_graph(TREE_MODEL_NAME, tree_model(ctx, path, window)?);
        dataset.add_named_graph(PROBLEMS_MODEL_NAME, problems_model());
        dataset.set_context(URI_SYMBOL, subject.as_str());
        debug!(
            path = %path,
            offset = window.offset,
            limit = ?window.limit,
            triples = dataset.len(),
            "extract.tree"
        );
        Ok(dataset)
    }
}
