use tracing::{debug, trace};

use crate::rdf::vocab::INTERNAL_NODE_TYPE;
use crate::storage::NodeStore;
use crate::types::{FrescoError, NodePath, Result};

/// Default location of the extractor catalog.
pub const DEFAULT_CATALOG_ROOT: &str = "/fedora:extractors";

const CATALOG_NODE_TYPE: &str = "nt:unstructured";

/// Persisted registry mapping type names to extractor identifiers.
///
/// Entries live at `<root>/<type-name>/<extractor-id>`, one child node per
/// identifier; the child's name is the identifier. The root itself is an
/// internal node and stays out of tree listings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractorCatalog {
    root: NodePath,
}

impl Default for ExtractorCatalog {
    fn default() -> Self {
        Self {
            root: NodePath::new(DEFAULT_CATALOG_ROOT).unwrap_or_else(|_| NodePath::root()),
        }
    }
}

impl ExtractorCatalog {
    pub fn new(root: NodePath) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &NodePath {
        &self.root
    }

    fn entry_path(&self, type_name: &str) -> Result<NodePath> {
        self.root.child(type_name)
    }

    /// Adds `extractor_id` under `type_name`. Registering an identifier that
    /// is already present changes nothing.
    pub fn register(&self, store: &dyn NodeStore, type_name: &str, extractor_id: &str) -> Result<()> {
        let path = self.entry_path(type_name)?.child(extractor_id)?;
        self.ensure_root(store)?;
        store.find_or_create(&path, CATALOG_NODE_TYPE)?;
        debug!(ty = type_name, extractor = extractor_id, "catalog.register");
        Ok(())
    }

    /// Creates an empty entry for `type_name` if none exists.
    pub fn ensure_entry(&self, store: &dyn NodeStore, type_name: &str) -> Result<()> {
        self.ensure_root(store)?;
        store.find_or_create(&self.entry_path(type_name)?, CATALOG_NODE_TYPE)
    }

    fn ensure_root(&self, store: &dyn NodeStore) -> Result<()> {
        if let Some(parent) = self.root.parent() {
            store.find_or_create(&parent, CATALOG_NODE_TYPE)?;
        }
        store.find_or_create(&self.root, INTERNAL_NODE_TYPE)
    }

    /// Extractor identifiers for `type_name` in registration order.
    ///
    /// Fails with [`FrescoError::CatalogNotFound`] when the type has no entry;
    /// an entry without identifiers yields an empty list.
    pub fn list_extractor_ids(&self, store: &dyn NodeStore, type_name: &str) -> Result<Vec<String>> {
        let path = self.entry_path(type_name)?;
        if !store.node_exists(&path)? {
            trace!(ty = type_name, "catalog.lookup.miss");
            return Err(FrescoError::CatalogNotFound(type_name.to_owned()));
        }
        let ids = store.children(&path)?;
        trace!(ty = type_name, count = ids.len(), "catalog.lookup.hit");
        Ok(ids)
    }

    /// Type names that have a catalog entry.
    pub fn type_names(&self, store: &dyn NodeStore) -> Result<Vec<String>> {
        if !store.node_exists(&self.root)? {
            return Ok(Vec::new());
        }
        store.children(&self.root)
    }
}
