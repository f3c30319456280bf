use std::sync::Arc;

use tracing::{debug, info_span};

use crate::config::FrescoConfig;
use crate::extract::{Extractor, ExtractorCatalog, ExtractorRegistry};
use crate::rdf::vocab::URI_SYMBOL;
use crate::rdf::{
    apply_changes, ApplyReport, GraphSubjects, ModelContext, NamespaceRegistry, NodeDataset, Window,
};
use crate::storage::NodeStore;
use crate::types::{FrescoError, NodePath, Result};

/// Entry point tying a store to the catalog, extractors and naming rules.
pub struct Repository {
    store: Arc<dyn NodeStore>,
    config: FrescoConfig,
    registry: ExtractorRegistry,
    catalog: ExtractorCatalog,
    subjects: Box<dyn GraphSubjects>,
    namespaces: NamespaceRegistry,
}

impl Repository {
    /// Repository over `store` with the built-in extractor registered.
    pub fn new(store: Arc<dyn NodeStore>, config: FrescoConfig) -> Self {
        Self::with_registry(store, config, ExtractorRegistry::with_builtin())
    }

    pub fn with_registry(
        store: Arc<dyn NodeStore>,
        config: FrescoConfig,
        registry: ExtractorRegistry,
    ) -> Self {
        let catalog = config.catalog();
        let subjects: Box<dyn GraphSubjects> = Box::new(config.subjects());
        let namespaces = config.namespace_registry();
        Self {
            store,
            config,
            registry,
            catalog,
            subjects,
            namespaces,
        }
    }

    /// Replaces the subject naming strategy.
    pub fn with_subjects(mut self, subjects: impl GraphSubjects + 'static) -> Self {
        self.subjects = Box::new(subjects);
        self
    }

    pub fn store(&self) -> &dyn NodeStore {
        self.store.as_ref()
    }

    pub fn config(&self) -> &FrescoConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ExtractorCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    pub fn namespaces(&self) -> &NamespaceRegistry {
        &self.namespaces
    }

    pub fn subjects(&self) -> &dyn GraphSubjects {
        self.subjects.as_ref()
    }

    pub fn context(&self) -> ModelContext<'_> {
        ModelContext {
            store: self.store.as_ref(),
            subjects: self.subjects.as_ref(),
            namespaces: &self.namespaces,
        }
    }

    /// Registers a factory so catalog entries naming `id` can be resolved.
    pub fn register_extractor<F>(&mut self, id: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Arc<dyn Extractor>> + Send + Sync + 'static,
    {
        self.registry.register_factory(id, factory);
    }

    /// Extractor identifiers that apply to the node at `path`, in the order
    /// they run.
    pub fn extractor_ids_for(&self, path: &NodePath) -> Result<Vec<String>> {
        Ok(self
            .registry
            .resolve_for_node(self.store(), &self.catalog, path)?
            .into_iter()
            .map(|(id, _)| id)
            .collect())
    }

    /// Assembles the RDF view of the node at `path`.
    ///
    /// Each applicable extractor sees the dataset assembled so far and its
    /// output is merged in. The subject URI is always present in the
    /// context of the result.
    pub fn dataset(&self, path: &NodePath, window: Window) -> Result<NodeDataset> {
        let _span = info_span!("repository.dataset", path = %path).entered();
        if !self.store.node_exists(path)? {
            return Err(FrescoError::NodeNotFound(path.to_string()));
        }
        let ctx = self.context();
        let mut dataset = NodeDataset::default();
        for (id, extractor) in self.registry.resolve_for_node(self.store(), &self.catalog, path)? {
            let part = extractor.extract(ctx, path, &dataset, window)?;
            debug!(
                extractor = %id,
                model = extractor.model_name(),
                triples = part.len(),
                "repository.extract"
            );
            dataset.merge(part);
        }
        if dataset.subject_uri().is_none() {
            let subject = self.subjects.subject_for(path)?;
            dataset.set_context(URI_SYMBOL, subject.as_str());
        }
        Ok(dataset)
    }

    /// [`Repository::dataset`] using the configured default window.
    pub fn dataset_default(&self, path: &NodePath) -> Result<NodeDataset> {
        self.dataset(path, self.config.window(0, None))
    }

    /// [`Repository::dataset`] over every child.
    pub fn dataset_unbounded(&self, path: &NodePath) -> Result<NodeDataset> {
        self.dataset(path, Window::unbounded())
    }

    /// Writes the edits made to `edited` back to storage.
    pub fn apply(&self, original: &NodeDataset, edited: &mut NodeDataset) -> Result<ApplyReport> {
        apply_changes(self.context(), original, edited)
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("catalog", &self.catalog)
            .finish_non_exhaustive()
    }
}

impl Default for Repository {
    fn default() -> Self {
        let store: Arc<dyn NodeStore> = Arc::new(crate::storage::MemoryStore::default());
        Self::new(store, FrescoConfig::default())
    }
}
