//! Cursor execution engine
//!
//! Steps are materialized from the leaves of the plan upwards. A step is
//! turned into a cursor once all of its dependencies have one; the cursor
//! of the root step is returned to the caller, positioned before its first
//! row.

mod cursor;
mod predicate;
mod row;

pub use cursor::{fetch, FilterCursor, ProjectCursor, RowCursor, ScanCursor};
pub use predicate::{compile, like_regex, values_equal, Predicate};
pub use row::{render, to_json, Row, Rows, ABSENT};

use crate::error::{ExecutionError, ExecutionResult};
use crate::plan::{Plan, Step, StepId, StepKind};
use boic_core::shard::scan;
use boic_core::{ErrorPolicy, Jewel, JewelConfig};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

/// Execution settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Corpus walk depth (unbounded when absent)
    pub max_depth: Option<usize>,
    /// Policy for documents that fail to load
    pub on_error: ErrorPolicy,
    /// Reference hops allowed in one column path
    pub max_hops: usize,
}

impl ExecutionOptions {
    /// Settings from a jewel configuration
    pub fn from_config(config: &JewelConfig) -> Self {
        Self {
            max_depth: config.scan.max_depth,
            on_error: config.scan.on_error,
            max_hops: config.references.max_depth,
        }
    }

    /// Override the walk depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Override the error policy
    pub fn with_error_policy(mut self, on_error: ErrorPolicy) -> Self {
        self.on_error = on_error;
        self
    }
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self::from_config(&JewelConfig::default())
    }
}

/// Materialize `plan` and return the cursor of its root step
pub fn open(
    jewel: &Rc<Jewel>,
    plan: &Plan,
    options: &ExecutionOptions,
) -> ExecutionResult<Box<dyn RowCursor>> {
    let mut cursors: HashMap<StepId, Box<dyn RowCursor>> = HashMap::new();
    let mut materialized: HashSet<StepId> = HashSet::new();
    let mut queue: VecDeque<StepId> = plan.leaves().map(|step| step.id).collect();

    while let Some(id) = queue.pop_front() {
        let Some(step) = plan.step(id) else {
            return Err(ExecutionError::CursorUnavailable { step: id });
        };
        if !materialized.insert(id) {
            continue;
        }

        let cursor = materialize(jewel, step, &mut cursors, options)?;
        tracing::trace!(step = id, kind = step.kind.name(), "Materialized step");
        cursors.insert(id, cursor);

        for &dependant in &step.dependants {
            let ready = plan.step(dependant).is_some_and(|next| {
                next.dependencies
                    .iter()
                    .all(|dependency| materialized.contains(dependency))
            });
            if ready {
                queue.push_back(dependant);
            }
        }
    }

    cursors
        .remove(&plan.root())
        .ok_or(ExecutionError::CursorUnavailable { step: plan.root() })
}

fn materialize(
    jewel: &Rc<Jewel>,
    step: &Step,
    cursors: &mut HashMap<StepId, Box<dyn RowCursor>>,
    options: &ExecutionOptions,
) -> ExecutionResult<Box<dyn RowCursor>> {
    match &step.kind {
        StepKind::OpenCorpus { shard_type, .. } => {
            let shards = scan(jewel, options.max_depth, options.on_error);
            Ok(Box::new(ScanCursor::new(shards, shard_type.clone())))
        }
        StepKind::Scan {
            source,
            condition,
            projection,
        } => {
            let mut cursor = cursors
                .remove(source)
                .ok_or(ExecutionError::CursorUnavailable { step: *source })?;

            if let Some(condition) = condition {
                let predicate = compile(condition, options.max_hops)?;
                cursor = Box::new(FilterCursor::new(cursor, predicate));
            }
            if let Some(projection) = projection {
                cursor = Box::new(ProjectCursor::new(
                    cursor,
                    projection.columns.clone(),
                    options.max_hops,
                ));
            }
            Ok(cursor)
        }
    }
}
