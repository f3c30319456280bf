//! Cardinality and type lookups against the node's schema.
//!
//! Undeclared properties resolve to the least restrictive answer:
//! multi-valued, and [`PropertyType::Undefined`].

use tracing::trace;

use crate::types::{NodePath, PropertyType, Result};

use super::NodeStore;

/// Whether `name` is (or could be) multi-valued on the node at `path`.
pub fn is_multivalued(store: &dyn NodeStore, path: &NodePath, name: &str) -> Result<bool> {
    match store.property_definition(path, name)? {
        Some(def) => Ok(def.multiple),
        None => {
            trace!(path = %path, property = name, "resolver.undeclared.multiple");
            Ok(true)
        }
    }
}

/// Declared value type of `name` on the node at `path`.
pub fn property_type(store: &dyn NodeStore, path: &NodePath, name: &str) -> Result<PropertyType> {
    match store.property_definition(path, name)? {
        Some(def) => Ok(def.required_type),
        None => {
            trace!(path = %path, property = name, "resolver.undeclared.type");
            Ok(PropertyType::Undefined)
        }
    }
}

/// Whether `name` is declared protected on the node at `path`.
pub fn is_protected(store: &dyn NodeStore, path: &NodePath, name: &str) -> Result<bool> {
    Ok(store
        .property_definition(path, name)?
        .is_some_and(|def| def.protected))
}
