use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, trace};

use crate::storage::NodeStore;
use crate::types::{FrescoError, NodePath, Result};

use super::catalog::ExtractorCatalog;
use super::tree::{TreePropertiesExtractor, TREE_EXTRACTOR_ID};
use super::Extractor;

/// Constructor for an extractor registered under an identifier.
pub type ExtractorFactory = Arc<dyn Fn() -> Result<Arc<dyn Extractor>> + Send + Sync>;

/// Resolves catalog identifiers to live extractors.
///
/// Instances are built once per identifier and cached; a failed construction
/// is not cached so a later call retries.
pub struct ExtractorRegistry {
    factories: HashMap<String, ExtractorFactory>,
    cache: Mutex<HashMap<String, Arc<dyn Extractor>>>,
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("ExtractorRegistry").field("factories", &ids).finish()
    }
}

impl ExtractorRegistry {
    /// Registry without any factories.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Registry preloaded with [`TreePropertiesExtractor`].
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register_factory(TREE_EXTRACTOR_ID, || {
            Ok(Arc::new(TreePropertiesExtractor) as Arc<dyn Extractor>)
        });
        registry
    }

    /// Registers `factory` under `id`, replacing any earlier factory.
    pub fn register_factory<F>(&mut self, id: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Arc<dyn Extractor>> + Send + Sync + 'static,
    {
        let id = id.into();
        self.cache.get_mut().remove(&id);
        self.factories.insert(id, Arc::new(factory));
    }

    /// The extractor registered under `id`.
    pub fn instantiate(&self, id: &str) -> Result<Arc<dyn Extractor>> {
        if let Some(hit) = self.cache.lock().get(id) {
            return Ok(Arc::clone(hit));
        }
        let Some(factory) = self.factories.get(id) else {
            error!(extractor = %id, "extract.registry.unknown");
            return Err(FrescoError::instantiation(id, "no factory registered"));
        };
        let extractor = factory().map_err(|err| {
            error!(extractor = %id, error = %err, "extract.registry.instantiate_failed");
            match err {
                err @ FrescoError::Instantiation { .. } => err,
                other => FrescoError::instantiation(id, other.to_string()),
            }
        })?;
        self.cache
            .lock()
            .insert(id.to_owned(), Arc::clone(&extractor));
        trace!(extractor = %id, "extract.registry.instantiated");
        Ok(extractor)
    }

    /// Extractors listed under `type_name`, in catalog order.
    ///
    /// Propagates [`FrescoError::CatalogNotFound`] when the type has no entry.
    pub fn resolve(
        &self,
        store: &dyn NodeStore,
        catalog: &ExtractorCatalog,
        type_name: &str,
    ) -> Result<Vec<Arc<dyn Extractor>>> {
        catalog
            .list_extractor_ids(store, type_name)?
            .iter()
            .map(|id| self.instantiate(id))
            .collect()
    }

    /// Extractors for the node at `path`.
    ///
    /// Identifiers are gathered from the primary type, then each mixin, with
    /// duplicates keeping their first position. Types without a catalog
    /// entry are skipped; when none of the node's types has one, the
    /// built-in extractor is used instead.
    pub fn resolve_for_node(
        &self,
        store: &dyn NodeStore,
        catalog: &ExtractorCatalog,
        path: &NodePath,
    ) -> Result<Vec<(String, Arc<dyn Extractor>)>> {
        let types = store.node_types(path)?;
        let mut ids: Vec<String> = Vec::new();
        let mut found_entry = false;
        for type_name in types.names() {
            match catalog.list_extractor_ids(store, type_name) {
                Ok(listed) => {
                    found_entry = true;
                    for id in listed {
                        if !ids.contains(&id) {
                            ids.push(id);
                        }
                    }
                }
                Err(err) if err.is_catalog_not_found() => continue,
                Err(err) => return Err(err),
            }
        }
        if !found_entry {
            debug!(path = %path, primary = %types.primary, "extract.registry.fallback");
            ids.push(TREE_EXTRACTOR_ID.to_owned());
        }

        let resolved = ids
            .into_iter()
            .map(|id| {
                let extractor = self.instantiate(&id)?;
                Ok((id, extractor))
            })
            .collect::<Result<Vec<_>>>()?;
        trace!(path = %path, extractors = resolved.len(), "extract.registry.resolved");
        Ok(resolved)
    }
}
