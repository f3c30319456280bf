#![forbid(unsafe_code)]

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use tracing::trace;

use crate::types::{FrescoError, NodePath, Result};

use super::{NodeStore, NodeTypes, Property, PropertyDef, Schema};

/// Primary type given to the root node.
pub const ROOT_TYPE: &str = "mode:root";

#[derive(Clone, Debug)]
struct NodeRecord {
    types: NodeTypes,
    properties: BTreeMap<String, Property>,
    children: Vec<String>,
}

impl NodeRecord {
    fn new(primary_type: &str) -> Self {
        Self {
            types: NodeTypes::new(primary_type),
            properties: BTreeMap::new(),
            children: Vec::new(),
        }
    }
}

struct Inner {
    schema: Schema,
    nodes: HashMap<NodePath, NodeRecord>,
}

/// In-memory [`NodeStore`] guarded by a single reader-writer lock.
///
/// Writes are validated against the schema the same way a JCR-style engine
/// would: the stored representation must match the resolved cardinality
/// (multi-valued when undeclared) and values must match a declared
/// (non-undefined) type.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Schema::standard())
    }
}

impl MemoryStore {
    /// Creates a store holding only the root node.
    pub fn new(schema: Schema) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(NodePath::root(), NodeRecord::new(ROOT_TYPE));
        Self {
            inner: RwLock::new(Inner { schema, nodes }),
        }
    }

    /// Runs `f` against the schema, e.g. to register additional types.
    pub fn with_schema_mut<R>(&self, f: impl FnOnce(&mut Schema) -> R) -> R {
        f(&mut self.inner.write().schema)
    }

    pub fn node_count(&self) -> usize {
        self.inner.read().nodes.len()
    }
}

impl Inner {
    fn node(&self, path: &NodePath) -> Result<&NodeRecord> {
        self.nodes
            .get(path)
            .ok_or_else(|| FrescoError::NodeNotFound(path.to_string()))
    }

    fn node_mut(&mut self, path: &NodePath) -> Result<&mut NodeRecord> {
        self.nodes
            .get_mut(path)
            .ok_or_else(|| FrescoError::NodeNotFound(path.to_string()))
    }

    fn check_primary(&self, name: &str) -> Result<()> {
        match self.schema.get(name) {
            Some(def) if !def.mixin => Ok(()),
            Some(_) => Err(FrescoError::invalid(format!("{name} is a mixin, not a primary type"))),
            None => Err(FrescoError::invalid(format!("unknown node type {name}"))),
        }
    }

    fn insert_child(&mut self, path: &NodePath, primary_type: &str) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| FrescoError::storage("the root node already exists"))?;
        self.node_mut(&parent)?.children.push(path.name().to_owned());
        self.nodes.insert(path.clone(), NodeRecord::new(primary_type));
        trace!(path = %path, ty = primary_type, "memory.node.insert");
        Ok(())
    }

    fn validate(&self, path: &NodePath, name: &str, property: &Property) -> Result<()> {
        let record = self.node(path)?;
        let Some(def) = self.schema.definition_for(&record.types, name) else {
            if !property.is_multiple() {
                return Err(FrescoError::storage(format!(
                    "property {name} on {path} is undeclared and must be multi-valued"
                )));
            }
            return Ok(());
        };
        if def.multiple != property.is_multiple() {
            let expected = if def.multiple { "multi-valued" } else { "single-valued" };
            return Err(FrescoError::storage(format!(
                "property {name} on {path} is declared {expected}"
            )));
        }
        if let Some(bad) = property
            .values()
            .iter()
            .find(|v| !def.required_type.accepts(v.property_type()))
        {
            return Err(FrescoError::storage(format!(
                "property {name} on {path} requires {} but got {}",
                def.required_type,
                bad.property_type()
            )));
        }
        Ok(())
    }
}

impl NodeStore for MemoryStore {
    fn node_exists(&self, path: &NodePath) -> Result<bool> {
        Ok(self.inner.read().nodes.contains_key(path))
    }

    fn node_types(&self, path: &NodePath) -> Result<NodeTypes> {
        Ok(self.inner.read().node(path)?.types.clone())
    }

    fn children(&self, path: &NodePath) -> Result<Vec<String>> {
        Ok(self.inner.read().node(path)?.children.clone())
    }

    fn add_node(&self, path: &NodePath, primary_type: &str) -> Result<()> {
        let mut inner = self.inner.write();
        inner.check_primary(primary_type)?;
        if inner.nodes.contains_key(path) {
            return Err(FrescoError::storage(format!("node {path} already exists")));
        }
        inner.insert_child(path, primary_type)
    }

    fn add_mixin(&self, path: &NodePath, mixin: &str) -> Result<()> {
        let mut inner = self.inner.write();
        match inner.schema.get(mixin) {
            Some(def) if def.mixin => {}
            Some(_) => return Err(FrescoError::invalid(format!("{mixin} is not a mixin"))),
            None => return Err(FrescoError::invalid(format!("unknown node type {mixin}"))),
        }
        let record = inner.node_mut(path)?;
        if !record.types.has(mixin) {
            record.types.mixins.push(mixin.to_owned());
        }
        Ok(())
    }

    fn find_or_create(&self, path: &NodePath, primary_type: &str) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.nodes.contains_key(path) {
            return Ok(());
        }
        inner.check_primary(primary_type)?;
        for ancestor in path.ancestors() {
            if !inner.nodes.contains_key(&ancestor) {
                inner.insert_child(&ancestor, primary_type)?;
            }
        }
        inner.insert_child(path, primary_type)
    }

    fn properties(&self, path: &NodePath) -> Result<Vec<(String, Property)>> {
        let inner = self.inner.read();
        let record = inner.node(path)?;
        Ok(record
            .properties
            .iter()
            .map(|(name, prop)| (name.clone(), prop.clone()))
            .collect())
    }

    fn property(&self, path: &NodePath, name: &str) -> Result<Option<Property>> {
        Ok(self.inner.read().node(path)?.properties.get(name).cloned())
    }

    fn set_property(&self, path: &NodePath, name: &str, property: Property) -> Result<()> {
        let mut inner = self.inner.write();
        inner.validate(path, name, &property)?;
        trace!(path = %path, property = name, value = %property, "memory.property.set");
        inner.node_mut(path)?.properties.insert(name.to_owned(), property);
        Ok(())
    }

    fn remove_property(&self, path: &NodePath, name: &str) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.node_mut(path)?.properties.remove(name).is_some() {
            trace!(path = %path, property = name, "memory.property.remove");
        }
        Ok(())
    }

    fn property_definition(&self, path: &NodePath, name: &str) -> Result<Option<PropertyDef>> {
        let inner = self.inner.read();
        let record = inner.node(path)?;
        Ok(inner.schema.definition_for(&record.types, name).cloned())
    }
}
