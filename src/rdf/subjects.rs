use oxrdf::NamedNode;

use crate::types::{FrescoError, NodePath, Result};

/// Naming strategy that turns node paths into RDF subjects and back.
pub trait GraphSubjects: Send + Sync {
    /// Canonical subject IRI for the node at `path`.
    fn subject_for(&self, path: &NodePath) -> Result<NamedNode>;

    /// Path named by `subject`, or `None` when the IRI is not a repository
    /// subject at all.
    fn path_for(&self, subject: &str) -> Option<NodePath>;
}

/// Subjects formed by appending the node path to a base URI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefaultGraphSubjects {
    base: String,
}

impl DefaultGraphSubjects {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }
}

impl Default for DefaultGraphSubjects {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_BASE_URI)
    }
}

impl GraphSubjects for DefaultGraphSubjects {
    fn subject_for(&self, path: &NodePath) -> Result<NamedNode> {
        let iri = format!("{}{}", self.base, path);
        NamedNode::new(iri.as_str())
            .map_err(|err| FrescoError::invalid(format!("invalid subject {iri}: {err}")))
    }

    fn path_for(&self, subject: &str) -> Option<NodePath> {
        let rest = subject.strip_prefix(self.base.as_str())?;
        NodePath::new(rest).ok()
    }
}
