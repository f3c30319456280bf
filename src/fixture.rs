//! TOML description of a repository, used to seed a [`MemoryStore`].
//!
//! ```toml
//! [[type]]
//! name = "ex:book"
//! mixin = true
//! [[type.property]]
//! name = "ex:isbn"
//! type = "String"
//!
//! [[node]]
//! path = "/objects/a"
//! primary_type = "nt:folder"
//! mixins = ["fedora:object"]
//! [node.properties]
//! "dc:title" = "A"
//! "dc:subject" = ["rust", "rdf"]
//!
//! [[extractor]]
//! type = "fedora:object"
//! id = "tree-properties"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use tracing::debug;

use crate::extract::ExtractorCatalog;
use crate::storage::{resolver, MemoryStore, NodeStore, NodeTypeDef, Property, Schema};
use crate::types::{FrescoError, NodePath, PropertyType, Result, Value};

const DEFAULT_PRIMARY_TYPE: &str = "nt:unstructured";

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    #[serde(default, rename = "type")]
    pub types: Vec<NodeTypeDef>,
    #[serde(default, rename = "node")]
    pub nodes: Vec<NodeFixture>,
    #[serde(default, rename = "extractor")]
    pub extractors: Vec<CatalogEntry>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeFixture {
    pub path: String,
    #[serde(default = "default_primary_type")]
    pub primary_type: String,
    #[serde(default)]
    pub mixins: Vec<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, toml::Value>,
}

fn default_primary_type() -> String {
    DEFAULT_PRIMARY_TYPE.to_owned()
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogEntry {
    #[serde(rename = "type")]
    pub type_name: String,
    /// Omitted to create an entry that lists no extractors.
    pub id: Option<String>,
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
            .map_err(|err| FrescoError::invalid(format!("fixture {}: {err}", path.display())))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|err| FrescoError::invalid(err.to_string()))
    }

    /// Builds a store from the standard schema plus the fixture's types,
    /// then creates nodes in file order and registers catalog entries.
    pub fn into_store(self, catalog: &ExtractorCatalog) -> Result<MemoryStore> {
        let mut schema = Schema::standard();
        for def in self.types {
            schema.register(def);
        }
        let store = MemoryStore::new(schema);

        for node in &self.nodes {
            let path = NodePath::new(node.path.as_str())?;
            store.find_or_create(&path, &node.primary_type)?;
            for mixin in &node.mixins {
                store.add_mixin(&path, mixin)?;
            }
            for (name, raw) in &node.properties {
                let property = property_from_toml(&store, &path, name, raw)?;
                store.set_property(&path, name, property)?;
            }
        }
        for entry in &self.extractors {
            match &entry.id {
                Some(id) => catalog.register(&store, &entry.type_name, id)?,
                None => catalog.ensure_entry(&store, &entry.type_name)?,
            }
        }
        debug!(
            nodes = self.nodes.len(),
            extractors = self.extractors.len(),
            "fixture.loaded"
        );
        Ok(store)
    }
}

fn property_from_toml(
    store: &dyn NodeStore,
    path: &NodePath,
    name: &str,
    raw: &toml::Value,
) -> Result<Property> {
    let declared = resolver::property_type(store, path, name)?;
    let values = match raw {
        toml::Value::Array(items) => items
            .iter()
            .map(|item| value_from_toml(item, declared))
            .collect::<Result<Vec<_>>>()?,
        scalar => vec![value_from_toml(scalar, declared)?],
    };
    if resolver::is_multivalued(store, path, name)? {
        return Ok(Property::Multiple(values));
    }
    match <[Value; 1]>::try_from(values) {
        Ok([value]) => Ok(Property::Single(value)),
        Err(_) => Err(FrescoError::invalid(format!(
            "property {name} on {path} takes exactly one value"
        ))),
    }
}

fn value_from_toml(raw: &toml::Value, declared: PropertyType) -> Result<Value> {
    let value = match (raw, declared) {
        (toml::Value::String(s), PropertyType::Undefined | PropertyType::String) => Value::string(s.as_str()),
        (toml::Value::String(s), PropertyType::Name) => Value::name(s.as_str()),
        (toml::Value::String(s), PropertyType::Path) => Value::Path(s.clone()),
        (toml::Value::String(s), PropertyType::Uri) => Value::Uri(s.clone()),
        (toml::Value::String(s), PropertyType::Reference) => Value::Reference(NodePath::new(s.as_str())?),
        (toml::Value::String(s), PropertyType::Date) => Value::date(s)?,
        (toml::Value::String(s), PropertyType::Binary) => Value::Binary(
            STANDARD
                .decode(s.as_bytes())
                .map_err(|err| FrescoError::invalid(format!("invalid base64: {err}")))?,
        ),
        (toml::Value::Integer(i), PropertyType::Undefined | PropertyType::Long) => Value::Long(*i),
        (toml::Value::Integer(i), PropertyType::Double) => Value::Double(*i as f64),
        (toml::Value::Float(f), PropertyType::Undefined | PropertyType::Double) => Value::Double(*f),
        (toml::Value::Boolean(b), PropertyType::Undefined | PropertyType::Boolean) => Value::Boolean(*b),
        (toml::Value::Datetime(dt), PropertyType::Undefined | PropertyType::Date) => {
            Value::date(&dt.to_string())?
        }
        (other, declared) => {
            return Err(FrescoError::invalid(format!(
                "cannot store {} as {declared}",
                other.type_str()
            )))
        }
    };
    Ok(value)
}
