//! ShQL syntax: the expression tree and its parser.

pub mod ast;
mod parser;

pub use ast::{Column, Expr, Insert, Literal, Select, Table};
pub use parser::{condition, format_errors, statement};

use crate::error::SyntaxError;
use chumsky::Parser;
use once_cell::sync::Lazy;
use regex::Regex;

/// Fast prefix check for the supported statements
static STATEMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(SELECT|INSERT)\b").unwrap());

/// Whether `input` starts like a ShQL statement
pub fn can_handle(input: &str) -> bool {
    STATEMENT_RE.is_match(input)
}

/// Parse one ShQL statement, optionally terminated by `;`
pub fn parse(input: &str) -> Result<Expr, SyntaxError> {
    if !can_handle(input) {
        return Err(SyntaxError::UnknownStatement {
            input: input.trim().to_string(),
        });
    }

    statement()
        .parse(input)
        .into_result()
        .map_err(|errs| SyntaxError::Invalid {
            errors: format_errors(&errs, input),
        })
}
