//! RDF view of repository nodes.
//!
//! Builds the property, tree and problems graphs for a node, names
//! subjects, maps values to terms, and applies edits made to a view back to
//! storage.

pub mod listener;
pub mod models;
pub mod namespaces;
pub mod terms;
pub mod vocab;

mod dataset;
mod subjects;

pub use dataset::NodeDataset;
pub use listener::{apply_changes, ApplyReport, ModelDelta, PropertyStatementListener, RejectReason};
pub use models::{ModelContext, Window};
pub use namespaces::NamespaceRegistry;
pub use subjects::{DefaultGraphSubjects, GraphSubjects};
