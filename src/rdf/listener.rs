//! Translates edits of a node's RDF view back into property mutations.
//!
//! Rather than hooking into the RDF toolkit, callers hand back the edited
//! dataset; the delta against the dataset originally assembled from storage
//! is computed and applied statement by statement. Statements that cannot be
//! mapped to a legal mutation are recorded in the problems graph instead of
//! failing the call.

use std::collections::HashMap;

use oxrdf::{Graph, Subject, Triple};
use thiserror::Error;
use tracing::{debug, warn};

use crate::storage::{resolver, PropPatch, PropPatchOp};
use crate::types::{NodePath, PropertyType, Result, Value};

use super::dataset::NodeDataset;
use super::models::{record_problem, ModelContext};
use super::terms::term_to_value;
use super::vocab;

/// Why an inbound statement was not stored.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("subject {0} does not name an existing node")]
    MissingSubject(String),
    #[error("predicate {0} is in no registered namespace")]
    UnknownNamespace(String),
    #[error("predicate {0} is maintained by the repository")]
    ManagedPredicate(String),
    #[error("property {0} is protected")]
    Protected(String),
    #[error("cannot convert {lexical:?} to {target}")]
    Conversion { lexical: String, target: PropertyType },
    #[error("reference target {0} does not exist")]
    MissingReference(String),
    #[error("blank nodes cannot be stored as property values")]
    BlankNode,
    #[error("unsupported RDF term")]
    UnsupportedTerm,
    #[error("property {0} is single-valued but several values were added")]
    SingleValued(String),
}

/// A statement recorded in the problems graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedStatement {
    pub triple: Triple,
    pub reason: RejectReason,
}

/// Summary of one apply pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Statements turned into property mutations.
    pub applied: usize,
    /// Statements about subjects outside the repository.
    pub ignored: usize,
    pub rejected: Vec<RejectedStatement>,
}

impl ApplyReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Statements present in only one of two graphs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModelDelta {
    pub added: Vec<Triple>,
    pub removed: Vec<Triple>,
}

impl ModelDelta {
    pub fn between(before: &Graph, after: &Graph) -> Self {
        let added = after
            .iter()
            .filter(|t| !before.contains(*t))
            .map(|t| t.into_owned())
            .collect();
        let removed = before
            .iter()
            .filter(|t| !after.contains(*t))
            .map(|t| t.into_owned())
            .collect();
        Self { added, removed }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

struct PendingAddition {
    triple: Triple,
    path: NodePath,
    property: String,
    value: Value,
}

enum Planned {
    Ignore,
    Reject(RejectReason),
    Apply {
        path: NodePath,
        property: String,
        value: Value,
    },
}

/// Collects property mutations for inbound statements and records the ones
/// that cannot be stored.
pub struct PropertyStatementListener<'a> {
    ctx: ModelContext<'a>,
    problems: &'a mut Graph,
    patches: Vec<PropPatch>,
    by_path: HashMap<NodePath, usize>,
    additions: Vec<PendingAddition>,
    report: ApplyReport,
}

impl<'a> PropertyStatementListener<'a> {
    pub fn new(ctx: ModelContext<'a>, problems: &'a mut Graph) -> Self {
        Self {
            ctx,
            problems,
            patches: Vec::new(),
            by_path: HashMap::new(),
            additions: Vec::new(),
            report: ApplyReport::default(),
        }
    }

    /// Holds an append-or-replace for a statement added to the view until
    /// [`commit`](Self::commit).
    pub fn added_statement(&mut self, triple: &Triple) -> Result<()> {
        match self.plan(triple)? {
            Planned::Apply {
                path,
                property,
                value,
            } => self.additions.push(PendingAddition {
                triple: triple.clone(),
                path,
                property,
                value,
            }),
            Planned::Reject(reason) => self.reject(triple, reason),
            Planned::Ignore => self.report.ignored += 1,
        }
        Ok(())
    }

    /// Queues a value removal for a statement removed from the view.
    pub fn removed_statement(&mut self, triple: &Triple) -> Result<()> {
        match self.plan(triple)? {
            Planned::Apply {
                path,
                property,
                value,
            } => self.queue(path, PropPatchOp::Remove(property, value)),
            Planned::Reject(reason) => self.reject(triple, reason),
            Planned::Ignore => self.report.ignored += 1,
        }
        Ok(())
    }

    /// Applies queued mutations in the order they were received and returns
    /// the report. Removals run before additions. When one pass adds more
    /// than one distinct value to a single-valued property, every one of
    /// those additions is rejected. Storage failures abort the remaining
    /// mutations.
    pub fn commit(mut self) -> Result<ApplyReport> {
        self.queue_additions()?;
        for patch in &self.patches {
            debug!(path = %patch.path, ops = patch.ops.len(), "listener.commit.patch");
            patch.apply(self.ctx.store)?;
            self.report.applied += patch.ops.len();
        }
        Ok(std::mem::take(&mut self.report))
    }

    fn queue_additions(&mut self) -> Result<()> {
        let additions = std::mem::take(&mut self.additions);
        let conflicting = self.conflicting_additions(&additions)?;

        for addition in additions {
            let key = (addition.path.clone(), addition.property.clone());
            if conflicting.contains(&key) {
                self.reject(&addition.triple, RejectReason::SingleValued(addition.property));
            } else {
                self.queue(
                    addition.path,
                    PropPatchOp::AppendOrReplace(addition.property, addition.value),
                );
            }
        }
        Ok(())
    }

    /// Single-valued properties that received more than one distinct value.
    fn conflicting_additions(&self, additions: &[PendingAddition]) -> Result<Vec<(NodePath, String)>> {
        let mut added: HashMap<(&NodePath, &str), Vec<&Value>> = HashMap::new();
        for addition in additions {
            let values = added
                .entry((&addition.path, addition.property.as_str()))
                .or_default();
            if !values.contains(&&addition.value) {
                values.push(&addition.value);
            }
        }
        let mut conflicting = Vec::new();
        for ((path, property), values) in added {
            if values.len() > 1 && !resolver::is_multivalued(self.ctx.store, path, property)? {
                conflicting.push((path.clone(), property.to_owned()));
            }
        }
        Ok(conflicting)
    }

    fn queue(&mut self, path: NodePath, op: PropPatchOp) {
        let idx = match self.by_path.get(&path) {
            Some(idx) => *idx,
            None => {
                self.patches.push(PropPatch::new(path.clone()));
                self.by_path.insert(path, self.patches.len() - 1);
                self.patches.len() - 1
            }
        };
        self.patches[idx].push(op);
    }

    fn reject(&mut self, triple: &Triple, reason: RejectReason) {
        warn!(
            subject = %triple.subject,
            predicate = %triple.predicate,
            %reason,
            "listener.rejected"
        );
        record_problem(self.problems, triple.subject.clone(), &triple.predicate);
        self.report.rejected.push(RejectedStatement {
            triple: triple.clone(),
            reason,
        });
    }

    fn plan(&self, triple: &Triple) -> Result<Planned> {
        let Subject::NamedNode(subject) = &triple.subject else {
            return Ok(Planned::Ignore);
        };
        let Some(path) = self.ctx.subjects.path_for(subject.as_str()) else {
            return Ok(Planned::Ignore);
        };
        if !self.ctx.store.node_exists(&path)? {
            return Ok(Planned::Reject(RejectReason::MissingSubject(
                subject.as_str().to_owned(),
            )));
        }

        let predicate = triple.predicate.as_str();
        if vocab::is_managed_predicate(predicate) {
            return Ok(Planned::Reject(RejectReason::ManagedPredicate(predicate.to_owned())));
        }
        let Some(property) = self.ctx.namespaces.property_for(predicate) else {
            return Ok(Planned::Reject(RejectReason::UnknownNamespace(predicate.to_owned())));
        };
        if vocab::is_type_property(&property) {
            return Ok(Planned::Reject(RejectReason::ManagedPredicate(predicate.to_owned())));
        }
        if resolver::is_protected(self.ctx.store, &path, &property)? {
            return Ok(Planned::Reject(RejectReason::Protected(property)));
        }

        let declared = resolver::property_type(self.ctx.store, &path, &property)?;
        match term_to_value(&triple.object, declared, self.ctx.store, self.ctx.subjects)? {
            Ok(value) => Ok(Planned::Apply {
                path,
                property,
                value,
            }),
            Err(reason) => Ok(Planned::Reject(reason)),
        }
    }
}

/// Applies the edits made to `edited` relative to `original`.
///
/// The default graph and the tree graph are diffed; removals are applied
/// before additions. Rejected statements are added to `edited`'s problems
/// graph.
pub fn apply_changes(
    ctx: ModelContext<'_>,
    original: &NodeDataset,
    edited: &mut NodeDataset,
) -> Result<ApplyReport> {
    let empty = Graph::new();
    let deltas = [
        ModelDelta::between(original.default_graph(), edited.default_graph()),
        ModelDelta::between(
            original.tree().unwrap_or(&empty),
            edited.tree().unwrap_or(&empty),
        ),
    ];

    let mut problems = edited.problems().cloned().unwrap_or_default();
    let mut listener = PropertyStatementListener::new(ctx, &mut problems);
    for delta in &deltas {
        for triple in &delta.removed {
            listener.removed_statement(triple)?;
        }
    }
    for delta in &deltas {
        for triple in &delta.added {
            listener.added_statement(triple)?;
        }
    }
    let report = listener.commit()?;
    edited.add_named_graph(vocab::PROBLEMS_MODEL_NAME, problems);
    debug!(
        applied = report.applied,
        ignored = report.ignored,
        rejected = report.rejected.len(),
        "listener.apply"
    );
    Ok(report)
}
