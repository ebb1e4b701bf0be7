//! # boic-query
//!
//! ShQL, a small SQL dialect over the shards of a jewel.
//!
//! A query goes through three stages:
//!
//! 1. [`syntax`] parses the text into an [`Expr`] tree,
//! 2. [`plan`] turns the tree into a [`Plan`] of steps,
//! 3. [`exec`] materializes the plan into a chain of cursors.
//!
//! ```no_run
//! use boic_core::Jewel;
//! use boic_query::{execute, ExecutionOptions};
//!
//! let jewel = Jewel::open("/srv/jewel")?;
//! let options = ExecutionOptions::from_config(jewel.config());
//! for row in execute(&jewel, "SELECT nom FROM AIOT WHERE nom LIKE '%Usine%'", &options)? {
//!     println!("{:?}", row?.rendered());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod exec;
pub mod plan;
pub mod syntax;

pub use error::{
    ExecutionError, ExecutionResult, PlanError, PlanResult, QueryError, QueryResult, SyntaxError,
};
pub use exec::{ExecutionOptions, Row, RowCursor, Rows};
pub use plan::{Plan, Step, StepId, StepKind};
pub use syntax::Expr;

use boic_core::Jewel;
use std::rc::Rc;

/// Parse and plan `query`
pub fn prepare(query: &str) -> QueryResult<Plan> {
    let expr = syntax::parse(query)?;
    tracing::debug!(ast = ?expr, "Parsed query");

    let plan = plan::plan(&expr)?;
    tracing::debug!(plan = %plan, "Planned query");
    Ok(plan)
}

/// Run `query` against `jewel`; rows are produced as they are pulled
pub fn execute(jewel: &Rc<Jewel>, query: &str, options: &ExecutionOptions) -> QueryResult<Rows> {
    tracing::debug!(query, "Executing query");
    let plan = prepare(query)?;
    let cursor = exec::open(jewel, &plan, options)?;
    Ok(Rows::new(cursor))
}
