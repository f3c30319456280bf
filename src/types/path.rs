use std::fmt;

use super::{FrescoError, Result};

/// Absolute path addressing a node in the hierarchical store.
///
/// Paths are `/`-separated, start at the root `/`, and never contain empty
/// segments or a trailing slash (except the root itself).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(String);

impl NodePath {
    /// Parses and validates an absolute node path.
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw == "/" {
            return Ok(Self(raw));
        }
        if !raw.starts_with('/') || raw.ends_with('/') {
            return Err(FrescoError::InvalidPath(raw));
        }
        if raw[1..].split('/').any(|segment| segment.is_empty()) {
            return Err(FrescoError::InvalidPath(raw));
        }
        Ok(Self(raw))
    }

    /// The repository root.
    pub fn root() -> Self {
        Self("/".to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Number of segments below the root.
    pub fn depth(&self) -> usize {
        if self.is_root() {
            0
        } else {
            self.0[1..].split('/').count()
        }
    }

    /// Last segment of the path; empty for the root.
    pub fn name(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[idx + 1..],
            None => "",
        }
    }

    pub fn parent(&self) -> Option<NodePath> {
        if self.is_root() {
            return None;
        }
        let idx = self.0.rfind('/')?;
        if idx == 0 {
            Some(Self::root())
        } else {
            Some(Self(self.0[..idx].to_owned()))
        }
    }

    /// Appends one segment.
    pub fn child(&self, name: &str) -> Result<NodePath> {
        if name.is_empty() || name.contains('/') {
            return Err(FrescoError::InvalidPath(format!("{}/{name}", self.0)));
        }
        if self.is_root() {
            Ok(Self(format!("/{name}")))
        } else {
            Ok(Self(format!("{}/{name}", self.0)))
        }
    }

    /// Ancestors from the root down to the parent of this path.
    pub fn ancestors(&self) -> Vec<NodePath> {
        let mut out = Vec::with_capacity(self.depth());
        let mut current = self.parent();
        while let Some(path) = current {
            current = path.parent();
            out.push(path);
        }
        out.reverse();
        out
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NodePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for NodePath {
    type Error = FrescoError;

    fn try_from(value: &str) -> Result<Self> {
        NodePath::new(value)
    }
}
