//! Rules for replacing, appending and deleting node property values.

use tracing::debug;

use crate::types::{NodePath, Result, Value};

use super::{resolver, NodeStore, Property};

/// Writes `value` into `name` on the node at `path`.
///
/// An existing multi-valued property gains `value` unless an equal value
/// is already present. An existing single-valued property is overwritten.
/// A new property is created multi-valued or single-valued according to
/// the schema, defaulting to multi-valued when undeclared.
pub fn append_or_replace(
    store: &dyn NodeStore,
    path: &NodePath,
    name: &str,
    value: Value,
) -> Result<()> {
    match store.property(path, name)? {
        Some(Property::Multiple(mut values)) => {
            if values.contains(&value) {
                debug!(path = %path, property = name, %value, "props.append.duplicate");
                return Ok(());
            }
            debug!(
                path = %path,
                property = name,
                ty = %value.property_type(),
                %value,
                "props.append"
            );
            values.push(value);
            store.set_property(path, name, Property::Multiple(values))
        }
        Some(Property::Single(old)) => {
            debug!(
                path = %path,
                property = name,
                ty = %value.property_type(),
                old = %old,
                new = %value,
                "props.overwrite"
            );
            store.set_property(path, name, Property::Single(value))
        }
        None => {
            if resolver::is_multivalued(store, path, name)? {
                debug!(
                    path = %path,
                    property = name,
                    ty = %value.property_type(),
                    %value,
                    "props.create.multiple"
                );
                store.set_property(path, name, Property::Multiple(vec![value]))
            } else {
                debug!(
                    path = %path,
                    property = name,
                    ty = %value.property_type(),
                    %value,
                    "props.create.single"
                );
                store.set_property(path, name, Property::Single(value))
            }
        }
    }
}

/// Removes `value` from `name` on the node at `path`, if present.
///
/// All occurrences equal to `value` are dropped from a multi-valued
/// property; when none remain the property itself is deleted. A
/// single-valued property is deleted only when it currently holds `value`.
pub fn remove_value(
    store: &dyn NodeStore,
    path: &NodePath,
    name: &str,
    value: &Value,
) -> Result<()> {
    match store.property(path, name)? {
        None => Ok(()),
        Some(Property::Multiple(values)) => {
            if !values.contains(value) {
                return Ok(());
            }
            let remaining: Vec<Value> = values.into_iter().filter(|v| v != value).collect();
            if remaining.is_empty() {
                debug!(path = %path, property = name, "props.remove.property");
                store.remove_property(path, name)
            } else {
                debug!(path = %path, property = name, %value, "props.remove.value");
                store.set_property(path, name, Property::Multiple(remaining))
            }
        }
        Some(Property::Single(current)) => {
            if &current != value {
                return Ok(());
            }
            debug!(path = %path, property = name, %value, "props.remove.value");
            store.remove_property(path, name)
        }
    }
}
