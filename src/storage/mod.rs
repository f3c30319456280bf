//! Storage-engine seam and property mapping.
//!
//! The hierarchical store itself is an external collaborator reached through
//! the [`NodeStore`] trait. This module adds the rules for mutating typed,
//! possibly multi-valued properties on top of it, and ships an in-memory
//! backend used by the CLI and tests.

/// In-memory reference backend.
pub mod memory;

/// Property mutation rules (append, replace, remove).
pub mod props;

/// Schema-driven cardinality and type lookups.
pub mod resolver;

/// Node type and property declarations.
pub mod schema;

mod patch;
mod types;

pub use memory::MemoryStore;
pub use patch::{PropPatch, PropPatchOp};
pub use schema::{NodeTypeDef, NodeTypes, PropertyDef, Schema};
pub use types::Property;

use crate::types::{NodePath, Result};

/// Operations the mapping layer needs from the underlying hierarchical store.
///
/// Every call runs inside whatever session or transaction the caller has
/// established; implementations provide their own locking and surface
/// conflicts as [`crate::types::FrescoError::Storage`].
pub trait NodeStore: Send + Sync {
    /// Returns true if a node exists at `path`.
    fn node_exists(&self, path: &NodePath) -> Result<bool>;

    /// Primary type and mixins of the node.
    fn node_types(&self, path: &NodePath) -> Result<NodeTypes>;

    /// Child names in the store's native order.
    fn children(&self, path: &NodePath) -> Result<Vec<String>>;

    /// Creates a node whose parent must already exist.
    fn add_node(&self, path: &NodePath, primary_type: &str) -> Result<()>;

    /// Adds a mixin type to an existing node; adding it twice is a no-op.
    fn add_mixin(&self, path: &NodePath, mixin: &str) -> Result<()>;

    /// Creates `path` and any missing ancestors with `primary_type`.
    /// Existing nodes are left untouched.
    fn find_or_create(&self, path: &NodePath, primary_type: &str) -> Result<()>;

    /// All properties of the node as `(name, property)` pairs.
    fn properties(&self, path: &NodePath) -> Result<Vec<(String, Property)>>;

    /// A single property, or `None` when the node does not have it.
    fn property(&self, path: &NodePath, name: &str) -> Result<Option<Property>>;

    /// Stores `property` under `name`, replacing any previous representation.
    fn set_property(&self, path: &NodePath, name: &str, property: Property) -> Result<()>;

    /// Deletes a property; deleting an absent property is a no-op.
    fn remove_property(&self, path: &NodePath, name: &str) -> Result<()>;

    /// Schema declaration for `name` under the node's types, if any.
    fn property_definition(&self, path: &NodePath, name: &str) -> Result<Option<PropertyDef>>;
}
