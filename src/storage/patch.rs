use crate::types::{NodePath, Result, Value};

use super::props;
use super::NodeStore;

/// Operations for mutating property values on a node.
#[derive(Clone, Debug, PartialEq)]
pub enum PropPatchOp {
    /// Append to a multi-valued property or overwrite a single-valued one.
    AppendOrReplace(String, Value),
    /// Remove one value, deleting the property when no values remain.
    Remove(String, Value),
}

/// A batch of property operations against one node.
#[derive(Clone, Debug, PartialEq)]
pub struct PropPatch {
    /// Target node.
    pub path: NodePath,
    /// The list of patch operations to apply, in order.
    pub ops: Vec<PropPatchOp>,
}

impl PropPatch {
    /// Creates an empty patch for `path`.
    pub fn new(path: NodePath) -> Self {
        Self {
            path,
            ops: Vec::new(),
        }
    }

    pub fn push(&mut self, op: PropPatchOp) {
        self.ops.push(op);
    }

    /// Returns true if this patch contains no operations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Applies every operation in order, stopping at the first storage failure.
    pub fn apply(&self, store: &dyn NodeStore) -> Result<()> {
        for op in &self.ops {
            match op {
                PropPatchOp::AppendOrReplace(name, value) => {
                    props::append_or_replace(store, &self.path, name, value.clone())?
                }
                PropPatchOp::Remove(name, value) => props::remove_value(store, &self.path, name, value)?,
            }
        }
        Ok(())
    }
}
