//! Logical query plans
//!
//! A plan is an arena of [`Step`]s indexed by [`StepId`]. Each step lists
//! the steps it depends on and, derived from those, the steps depending on
//! it. Leaves have no dependencies; the root produces the query result.

mod explain;
mod planner;

pub use planner::plan;

use crate::syntax::Expr;

/// Index of a step in its plan
pub type StepId = usize;

/// A node of the plan
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Position in the arena
    pub id: StepId,
    /// What the step does
    pub kind: StepKind,
    /// Steps whose output this step consumes
    pub dependencies: Vec<StepId>,
    /// Steps consuming this step's output
    pub dependants: Vec<StepId>,
}

impl Step {
    /// Step without dependencies
    pub fn is_leaf(&self) -> bool {
        self.dependencies.is_empty()
    }
}

/// Step variants
#[derive(Debug, Clone, PartialEq)]
pub enum StepKind {
    /// Every shard of the jewel, optionally restricted to a type
    OpenCorpus {
        /// Shard type filter (`FROM` table)
        shard_type: Option<String>,
        /// Row alias (`FROM INSPECTION i`)
        alias: Option<String>,
    },
    /// Rows of `source`, filtered then projected
    Scan {
        /// Step providing the rows
        source: StepId,
        /// Row filter, evaluated on the source rows
        condition: Option<Expr>,
        /// Output columns; all source columns when absent
        projection: Option<Projection>,
    },
}

impl StepKind {
    /// Variant name
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenCorpus { .. } => "OpenCorpus",
            Self::Scan { .. } => "Scan",
        }
    }
}

/// Output columns of a scan
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// Columns in output order
    pub columns: Vec<ColumnProjection>,
}

impl Projection {
    /// Output column names
    pub fn aliases(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.alias.clone()).collect()
    }
}

/// One output column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProjection {
    /// Output name
    pub alias: String,
    /// How the value is obtained from the source row
    pub fetch: Fetch,
}

/// Fetch `field` from the source row, or from the value of `nested` when set.
///
/// `a.nom` is `Fetch { field: "nom", nested: Some(Fetch { field: "a" }) }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetch {
    /// Field name
    pub field: String,
    /// Value the field is read from
    pub nested: Option<Box<Fetch>>,
}

impl Fetch {
    /// Fetch chain for a dotted path; `None` for an empty path
    pub fn from_path(path: &[String]) -> Option<Self> {
        let (field, parents) = path.split_last()?;
        Some(Self {
            field: field.clone(),
            nested: Self::from_path(parents).map(Box::new),
        })
    }

    /// Field names from the row outwards
    pub fn keys(&self) -> Vec<&str> {
        let mut keys = self
            .nested
            .as_deref()
            .map(Fetch::keys)
            .unwrap_or_default();
        keys.push(&self.field);
        keys
    }
}

/// A complete plan
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    steps: Vec<Step>,
    root: StepId,
}

impl Plan {
    fn new() -> Self {
        Self {
            steps: Vec::new(),
            root: 0,
        }
    }

    /// Append a step; its dependencies record it as a dependant
    fn push(&mut self, kind: StepKind, dependencies: Vec<StepId>) -> StepId {
        let id = self.steps.len();
        for &dependency in &dependencies {
            self.steps[dependency].dependants.push(id);
        }
        self.steps.push(Step {
            id,
            kind,
            dependencies,
            dependants: Vec::new(),
        });
        id
    }

    /// All steps, by id
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Step by id
    pub fn step(&self, id: StepId) -> Option<&Step> {
        self.steps.get(id)
    }

    /// Step producing the result
    pub fn root(&self) -> StepId {
        self.root
    }

    /// Steps without dependencies
    pub fn leaves(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(|step| step.is_leaf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_records_dependants() {
        let mut plan = Plan::new();
        let open = plan.push(
            StepKind::OpenCorpus {
                shard_type: None,
                alias: None,
            },
            vec![],
        );
        let scan = plan.push(
            StepKind::Scan {
                source: open,
                condition: None,
                projection: None,
            },
            vec![open],
        );

        assert_eq!(plan.steps()[open].dependants, [scan]);
        assert_eq!(plan.leaves().map(|s| s.id).collect::<Vec<_>>(), [open]);
    }

    #[test]
    fn test_fetch_from_path() {
        let path = vec!["a".to_string(), "site".to_string(), "nom".to_string()];
        let fetch = Fetch::from_path(&path).unwrap();

        assert_eq!(fetch.field, "nom");
        assert_eq!(fetch.nested.as_ref().unwrap().field, "site");
        assert_eq!(fetch.keys(), ["a", "site", "nom"]);
        assert!(Fetch::from_path(&[]).is_none());
    }
}
