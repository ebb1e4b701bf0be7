//! WHERE conditions compiled into closures over a row

use super::cursor::{fetch, RowCursor};
use crate::error::{ExecutionError, ExecutionResult};
use crate::syntax::{Expr, Literal};
use boic_core::FieldValue;
use regex::Regex;

/// Row filter
pub type Predicate = Box<dyn Fn(&dyn RowCursor) -> bool>;

/// Value of an operand for the staged row; `None` when absent
type Operand = Box<dyn Fn(&dyn RowCursor) -> Option<FieldValue>>;

/// Compile a condition; `max_hops` bounds reference traversal in columns
pub fn compile(expr: &Expr, max_hops: usize) -> ExecutionResult<Predicate> {
    match expr {
        Expr::And(left, right) => {
            let left = compile(left, max_hops)?;
            let right = compile(right, max_hops)?;
            Ok(Box::new(move |row: &dyn RowCursor| left(row) && right(row)))
        }
        Expr::Or(left, right) => {
            let left = compile(left, max_hops)?;
            let right = compile(right, max_hops)?;
            Ok(Box::new(move |row: &dyn RowCursor| left(row) || right(row)))
        }
        Expr::Eq(left, right) => {
            let left = operand(left, max_hops)?;
            let right = operand(right, max_hops)?;
            Ok(Box::new(move |row: &dyn RowCursor| match (left(row), right(row)) {
                (Some(a), Some(b)) => values_equal(&a, &b),
                _ => false,
            }))
        }
        Expr::Like { expr, pattern } => {
            let value = operand(expr, max_hops)?;
            let Expr::Literal(Literal::String(pattern)) = pattern.as_ref() else {
                return Err(ExecutionError::UnsupportedPredicate {
                    kind: pattern.kind(),
                });
            };
            let regex = like_regex(pattern).map_err(|source| ExecutionError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            Ok(Box::new(move |row: &dyn RowCursor| {
                value(row)
                    .as_ref()
                    .and_then(FieldValue::as_text)
                    .is_some_and(|text| regex.is_match(text))
            }))
        }
        other => Err(ExecutionError::UnsupportedPredicate { kind: other.kind() }),
    }
}

fn operand(expr: &Expr, max_hops: usize) -> ExecutionResult<Operand> {
    match expr {
        Expr::Column(column) => {
            let keys = column.path.clone();
            Ok(Box::new(move |row: &dyn RowCursor| fetch(row, &keys, max_hops)))
        }
        Expr::Literal(literal) => {
            let value = literal.to_value();
            Ok(Box::new(move |_: &dyn RowCursor| Some(value.clone())))
        }
        other => Err(ExecutionError::UnsupportedPredicate { kind: other.kind() }),
    }
}

/// Anchored regex for a LIKE pattern: `%` is any run, `_` any character
pub fn like_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let mut re = String::from("(?s)^");
    for c in pattern.chars() {
        match c {
            '%' => re.push_str(".*"),
            '_' => re.push('.'),
            c => re.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    re.push('$');
    Regex::new(&re)
}

/// `=` semantics: numbers numerically, booleans, and text (strings and
/// reference URIs); anything else is unequal
pub fn values_equal(a: &FieldValue, b: &FieldValue) -> bool {
    match (a, b) {
        (FieldValue::Number(_), FieldValue::Number(_)) => a.as_f64() == b.as_f64(),
        (FieldValue::Bool(x), FieldValue::Bool(y)) => x == y,
        _ => match (a.as_text(), b.as_text()) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
    }
}
