use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::types::PropertyType;

/// Declaration of one named property on a node type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDef {
    pub name: String,
    #[serde(rename = "type", default = "undefined_type")]
    pub required_type: PropertyType,
    #[serde(default)]
    pub multiple: bool,
    /// Protected properties are maintained by the repository and cannot be
    /// edited through the RDF view.
    #[serde(default)]
    pub protected: bool,
}

fn undefined_type() -> PropertyType {
    PropertyType::Undefined
}

impl PropertyDef {
    pub fn single(name: impl Into<String>, required_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            required_type,
            multiple: false,
            protected: false,
        }
    }

    pub fn multiple(name: impl Into<String>, required_type: PropertyType) -> Self {
        Self {
            multiple: true,
            ..Self::single(name, required_type)
        }
    }

    pub fn protected(mut self) -> Self {
        self.protected = true;
        self
    }
}

/// A primary node type or mixin with its property declarations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeTypeDef {
    pub name: String,
    #[serde(default)]
    pub supertypes: Vec<String>,
    #[serde(default)]
    pub mixin: bool,
    #[serde(default, rename = "property")]
    pub properties: Vec<PropertyDef>,
}

impl NodeTypeDef {
    pub fn primary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supertypes: Vec::new(),
            mixin: false,
            properties: Vec::new(),
        }
    }

    pub fn mixin(name: impl Into<String>) -> Self {
        Self {
            mixin: true,
            ..Self::primary(name)
        }
    }

    pub fn supertype(mut self, name: impl Into<String>) -> Self {
        self.supertypes.push(name.into());
        self
    }

    pub fn property(mut self, def: PropertyDef) -> Self {
        self.properties.push(def);
        self
    }
}

/// Type names carried by a node: one primary type plus mixins in
/// declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeTypes {
    pub primary: String,
    pub mixins: Vec<String>,
}

impl NodeTypes {
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            mixins: Vec::new(),
        }
    }

    /// Primary type first, then mixins.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary.as_str()).chain(self.mixins.iter().map(String::as_str))
    }

    pub fn has(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }
}

/// Registry of node type definitions known to a store.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    types: HashMap<String, NodeTypeDef>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in repository types plus the Fedora mixins.
    pub fn standard() -> Self {
        let mut schema = Self::new();
        schema.register(
            NodeTypeDef::primary("nt:base")
                .property(PropertyDef::single("jcr:primaryType", PropertyType::Name).protected())
                .property(PropertyDef::multiple("jcr:mixinTypes", PropertyType::Name).protected()),
        );
        schema.register(NodeTypeDef::primary("nt:unstructured").supertype("nt:base"));
        schema.register(
            NodeTypeDef::primary("nt:hierarchyNode")
                .supertype("nt:base")
                .property(PropertyDef::single("jcr:created", PropertyType::Date).protected()),
        );
        schema.register(NodeTypeDef::primary("nt:folder").supertype("nt:hierarchyNode"));
        schema.register(NodeTypeDef::primary("mode:root").supertype("nt:base"));
        schema.register(NodeTypeDef::primary("mode:system").supertype("nt:base"));
        schema.register(
            NodeTypeDef::mixin("fedora:resource")
                .property(PropertyDef::single("fedora:lastModified", PropertyType::Date).protected()),
        );
        schema.register(
            NodeTypeDef::mixin("fedora:object")
                .supertype("fedora:resource")
                .property(PropertyDef::single("dc:title", PropertyType::String))
                .property(PropertyDef::multiple("dc:subject", PropertyType::String))
                .property(PropertyDef::multiple("dc:creator", PropertyType::String)),
        );
        schema.register(
            NodeTypeDef::mixin("fedora:datastream")
                .supertype("fedora:resource")
                .property(PropertyDef::single("fedora:mimeType", PropertyType::String))
                .property(PropertyDef::single("fedora:size", PropertyType::Long).protected()),
        );
        schema
    }

    /// Adds or replaces a definition.
    pub fn register(&mut self, def: NodeTypeDef) {
        self.types.insert(def.name.clone(), def);
    }

    pub fn get(&self, name: &str) -> Option<&NodeTypeDef> {
        self.types.get(name)
    }

    /// Finds the declaration for `property` on a node with the given types.
    ///
    /// Searches the primary type and its supertypes depth-first, then each
    /// mixin with its supertypes; the first exact name match wins.
    pub fn definition_for(&self, types: &NodeTypes, property: &str) -> Option<&PropertyDef> {
        let mut visited = HashSet::new();
        types
            .names()
            .find_map(|name| self.search(name, property, &mut visited))
    }

    fn search<'a>(
        &'a self,
        type_name: &str,
        property: &str,
        visited: &mut HashSet<String>,
    ) -> Option<&'a PropertyDef> {
        if !visited.insert(type_name.to_owned()) {
            return None;
        }
        let def = self.types.get(type_name)?;
        if let Some(found) = def.properties.iter().find(|p| p.name == property) {
            return Some(found);
        }
        def.supertypes
            .iter()
            .find_map(|parent| self.search(parent, property, visited))
    }
}
