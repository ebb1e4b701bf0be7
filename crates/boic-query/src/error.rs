//! Error types for query parsing, planning and execution

use crate::plan::StepId;
use boic_core::{FieldError, ShardError};
use thiserror::Error;

/// Query text could not be parsed
#[derive(Debug, Error)]
pub enum SyntaxError {
    /// The text does not start with a known statement
    #[error("Not a ShQL statement (expected SELECT or INSERT): {input}")]
    UnknownStatement {
        /// The rejected text
        input: String,
    },

    /// The statement is malformed
    #[error("ShQL syntax error:\n{errors}")]
    Invalid {
        /// Formatted parser errors, one per line
        errors: String,
    },
}

/// Query could not be turned into a plan
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// The expression shape has no planning rule
    #[error("Unimplemented expression for query planning: {kind}")]
    Unimplemented {
        /// Kind of the offending expression
        kind: &'static str,
    },
}

/// Query failed while rows were being produced
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// A document could not be loaded under the fail-fast policy
    #[error(transparent)]
    Shard(#[from] ShardError),

    /// A field access failed
    #[error(transparent)]
    Field(#[from] FieldError),

    /// The WHERE clause uses an expression that is not a predicate
    #[error("Unsupported predicate expression: {kind}")]
    UnsupportedPredicate {
        /// Kind of the offending expression
        kind: &'static str,
    },

    /// A LIKE pattern could not be compiled
    #[error("Invalid LIKE pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern as written
        pattern: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// A step's cursor was requested after another step consumed it
    #[error("Cursor of step #{step} is not available")]
    CursorUnavailable {
        /// Step whose cursor is missing
        step: StepId,
    },
}

/// Specialized Result type for query planning
pub type PlanResult<T> = Result<T, PlanError>;

/// Specialized Result type for query execution
pub type ExecutionResult<T> = Result<T, ExecutionError>;

/// Any failure of [`crate::execute`]
#[derive(Debug, Error)]
pub enum QueryError {
    /// Parsing failed
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// Planning failed
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// Execution failed
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Specialized Result type for whole queries
pub type QueryResult<T> = Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_error_names_kind() {
        let err = PlanError::Unimplemented { kind: "Insert" };
        assert_eq!(
            err.to_string(),
            "Unimplemented expression for query planning: Insert"
        );
    }

    #[test]
    fn test_query_error_is_transparent() {
        let err: QueryError = ExecutionError::UnsupportedPredicate { kind: "Column" }.into();
        assert_eq!(err.to_string(), "Unsupported predicate expression: Column");
    }
}
