//! Row cursors
//!
//! Cursors are single-pass and pull-driven: [`RowCursor::advance`] stages
//! the next row, after which its columns can be read until the next call.

use super::predicate::Predicate;
use crate::error::ExecutionResult;
use crate::plan::ColumnProjection;
use boic_core::shard::Scan;
use boic_core::{FieldError, FieldResult, FieldValue, Shard};

/// A forward-only producer of rows
pub trait RowCursor {
    /// Stage the next row; `false` once exhausted
    fn advance(&mut self) -> ExecutionResult<bool>;

    /// Column names of the staged row
    fn columns(&self) -> Vec<String>;

    /// Value of `column` in the staged row
    fn get(&self, column: &str) -> FieldResult<FieldValue>;
}

/// Value at the end of `keys`, starting from a column of the staged row.
///
/// Missing fields are absent. Other failures (dangling reference, scalar
/// traversal, too many hops) are logged and also treated as absent.
pub fn fetch<S: AsRef<str>>(
    row: &dyn RowCursor,
    keys: &[S],
    max_hops: usize,
) -> Option<FieldValue> {
    let (first, rest) = keys.split_first()?;
    let result = row
        .get(first.as_ref())
        .and_then(|value| value.lookup(rest, max_hops));

    match result {
        Ok(value) => Some(value),
        Err(e) if e.is_missing() => None,
        Err(e) => {
            tracing::warn!(column = first.as_ref(), error = %e, "Cannot fetch column value");
            None
        }
    }
}

/// One row per shard, optionally restricted to a shard type.
///
/// Columns are the staged shard's own fields, so they may change from one
/// row to the next.
pub struct ScanCursor {
    shards: Scan,
    shard_type: Option<String>,
    current: Option<Shard>,
}

impl ScanCursor {
    /// Cursor over `shards`, keeping those of type `shard_type`
    pub fn new(shards: Scan, shard_type: Option<String>) -> Self {
        Self {
            shards,
            shard_type,
            current: None,
        }
    }
}

impl RowCursor for ScanCursor {
    fn advance(&mut self) -> ExecutionResult<bool> {
        self.current = None;
        for shard in self.shards.by_ref() {
            let shard = shard?;
            match &self.shard_type {
                Some(typ) if !shard.is_type(typ) => {
                    tracing::trace!(shard = %shard, shard_type = %typ, "Type mismatch");
                }
                _ => {
                    self.current = Some(shard);
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    fn columns(&self) -> Vec<String> {
        self.current.as_ref().map(Shard::keys).unwrap_or_default()
    }

    fn get(&self, column: &str) -> FieldResult<FieldValue> {
        match &self.current {
            Some(shard) => shard.get(column),
            None => Err(FieldError::Missing(column.to_string())),
        }
    }
}

/// Rows of the source accepted by a predicate
pub struct FilterCursor {
    source: Box<dyn RowCursor>,
    predicate: Predicate,
}

impl FilterCursor {
    /// Filter `source` with `predicate`
    pub fn new(source: Box<dyn RowCursor>, predicate: Predicate) -> Self {
        Self { source, predicate }
    }
}

impl RowCursor for FilterCursor {
    fn advance(&mut self) -> ExecutionResult<bool> {
        while self.source.advance()? {
            if (self.predicate)(self.source.as_ref()) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn columns(&self) -> Vec<String> {
        self.source.columns()
    }

    fn get(&self, column: &str) -> FieldResult<FieldValue> {
        self.source.get(column)
    }
}

/// Fixed columns computed from each source row
pub struct ProjectCursor {
    source: Box<dyn RowCursor>,
    columns: Vec<ColumnProjection>,
    max_hops: usize,
    row: Vec<Option<FieldValue>>,
}

impl ProjectCursor {
    /// Project `source` onto `columns`
    pub fn new(source: Box<dyn RowCursor>, columns: Vec<ColumnProjection>, max_hops: usize) -> Self {
        Self {
            source,
            columns,
            max_hops,
            row: Vec::new(),
        }
    }
}

impl RowCursor for ProjectCursor {
    fn advance(&mut self) -> ExecutionResult<bool> {
        self.row.clear();
        if !self.source.advance()? {
            return Ok(false);
        }

        let source = self.source.as_ref();
        self.row = self
            .columns
            .iter()
            .map(|column| fetch(source, &column.fetch.keys(), self.max_hops))
            .collect();
        Ok(true)
    }

    fn columns(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.alias.clone()).collect()
    }

    fn get(&self, column: &str) -> FieldResult<FieldValue> {
        self.columns
            .iter()
            .position(|c| c.alias == column)
            .and_then(|index| self.row.get(index).cloned().flatten())
            .ok_or_else(|| FieldError::Missing(column.to_string()))
    }
}
