//! Materialized rows handed to callers

use super::cursor::RowCursor;
use crate::error::ExecutionResult;
use boic_core::FieldValue;
use serde_json::{Map, Number, Value as Json};

/// Text of an absent value
pub const ABSENT: &str = "N/D";

/// One result row: ordered `(column, value)` pairs
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<(String, Option<FieldValue>)>,
}

impl Row {
    /// Copy the row staged in `cursor`
    pub fn from_cursor(cursor: &dyn RowCursor) -> Self {
        let values = cursor
            .columns()
            .into_iter()
            .map(|column| {
                let value = cursor.get(&column).ok();
                (column, value)
            })
            .collect();
        Self { values }
    }

    /// Column names
    pub fn columns(&self) -> Vec<&str> {
        self.values.iter().map(|(c, _)| c.as_str()).collect()
    }

    /// Value of `column`; `None` when absent
    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.values
            .iter()
            .find(|(c, _)| c == column)
            .and_then(|(_, v)| v.as_ref())
    }

    /// Pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&FieldValue>)> {
        self.values.iter().map(|(c, v)| (c.as_str(), v.as_ref()))
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// No columns
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Pairs rendered as text
    pub fn rendered(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(column, value)| (column.to_string(), render(value)))
            .collect()
    }

    /// JSON object, columns in order; absent values are `null`
    pub fn to_json(&self) -> Json {
        let object: Map<String, Json> = self
            .iter()
            .map(|(column, value)| (column.to_string(), value.map(to_json).unwrap_or(Json::Null)))
            .collect();
        Json::Object(object)
    }
}

/// Text of a value: scalars as is, references as their URI, lists and
/// mappings as an indented YAML block, [`ABSENT`] when there is no value
pub fn render(value: Option<&FieldValue>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => ABSENT.to_string(),
    }
}

/// JSON form of a field value; references become their URI
pub fn to_json(value: &FieldValue) -> Json {
    match value {
        FieldValue::Null => Json::Null,
        FieldValue::Bool(b) => Json::Bool(*b),
        FieldValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Json::from(i)
            } else if let Some(u) = n.as_u64() {
                Json::from(u)
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map_or(Json::Null, Json::Number)
            }
        }
        FieldValue::String(s) => Json::String(s.clone()),
        FieldValue::Reference(reference) => Json::String(reference.uri().to_string()),
        FieldValue::List(items) => Json::Array(items.iter().map(to_json).collect()),
        FieldValue::Mapping(fields) => Json::Object(
            fields
                .iter()
                .map(|(key, value)| (key.to_string(), to_json(value)))
                .collect(),
        ),
    }
}

/// Rows pulled from a root cursor. Iteration ends after the first error.
pub struct Rows {
    cursor: Box<dyn RowCursor>,
    done: bool,
}

impl Rows {
    /// Drive `cursor`
    pub fn new(cursor: Box<dyn RowCursor>) -> Self {
        Self {
            cursor,
            done: false,
        }
    }
}

impl Iterator for Rows {
    type Item = ExecutionResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.cursor.advance() {
            Ok(true) => Some(Ok(Row::from_cursor(self.cursor.as_ref()))),
            Ok(false) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
