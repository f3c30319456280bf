//! Fresco maps the typed, possibly multi-valued properties of hierarchical
//! repository nodes to and from RDF.
//!
//! Reads go through [`Repository::dataset`], which resolves the extractors
//! catalogued for a node's types and merges their graphs. Edits to a dataset
//! are written back with [`Repository::apply`]; statements that cannot be
//! stored land in the dataset's `problems` graph.

#![forbid(unsafe_code)]

pub mod config;
pub mod extract;
pub mod fixture;
pub mod logging;
pub mod rdf;
pub mod repository;
pub mod storage;
pub mod types;

pub use config::{ConfigError, FrescoConfig};
pub use extract::{Extractor, ExtractorCatalog, ExtractorRegistry, TreePropertiesExtractor};
pub use fixture::Fixture;
pub use rdf::{ApplyReport, NodeDataset, Window};
pub use repository::Repository;
pub use storage::{MemoryStore, NodeStore, Property};
pub use types::{FrescoError, NodePath, PropertyType, Result, Value};
