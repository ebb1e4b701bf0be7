//! ShQL expression tree

use boic_core::FieldValue;
use std::fmt;

/// A parsed ShQL expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `SELECT columns [FROM table] [WHERE condition]`
    Select(Select),
    /// `INSERT INTO table (columns) VALUES (values)`
    Insert(Insert),
    /// Dotted field path: `nom`, `a.nom`
    Column(Column),
    /// Constant
    Literal(Literal),
    /// `*`
    Star,
    /// `expr AS alias`
    Alias {
        /// Aliased expression
        expr: Box<Expr>,
        /// Output name
        alias: String,
    },
    /// `expr LIKE pattern`
    Like {
        /// Matched value
        expr: Box<Expr>,
        /// Pattern, `%` and `_` wildcards
        pattern: Box<Expr>,
    },
    /// `left = right`
    Eq(Box<Expr>, Box<Expr>),
    /// `left AND right`
    And(Box<Expr>, Box<Expr>),
    /// `left OR right`
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Kind name, used in planning and execution errors
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Select(_) => "Select",
            Self::Insert(_) => "Insert",
            Self::Column(_) => "Column",
            Self::Literal(_) => "Literal",
            Self::Star => "Star",
            Self::Alias { .. } => "Alias",
            Self::Like { .. } => "Like",
            Self::Eq(..) => "Eq",
            Self::And(..) => "And",
            Self::Or(..) => "Or",
        }
    }

    /// Column expression from a dotted path
    pub fn column<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Column(Column {
            path: path.into_iter().map(Into::into).collect(),
        })
    }

    /// Rewrite every column path, depth first
    pub fn map_columns(self, f: &impl Fn(Column) -> Column) -> Self {
        let map = |expr: Box<Expr>| Box::new(expr.map_columns(f));
        match self {
            Self::Column(column) => Self::Column(f(column)),
            Self::Alias { expr, alias } => Self::Alias {
                expr: map(expr),
                alias,
            },
            Self::Like { expr, pattern } => Self::Like {
                expr: map(expr),
                pattern: map(pattern),
            },
            Self::Eq(left, right) => Self::Eq(map(left), map(right)),
            Self::And(left, right) => Self::And(map(left), map(right)),
            Self::Or(left, right) => Self::Or(map(left), map(right)),
            other => other,
        }
    }
}

/// Body of a `SELECT`
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    /// Selected expressions; a lone [`Expr::Star`] for `*`
    pub columns: Vec<Expr>,
    /// `FROM` table
    pub from: Option<Table>,
    /// `WHERE` condition
    pub selection: Option<Box<Expr>>,
}

/// `FROM` target: a shard type, optionally aliased
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Shard type
    pub name: String,
    /// Row alias (`FROM INSPECTION i`)
    pub alias: Option<String>,
}

/// Body of an `INSERT`
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    /// Target shard type
    pub table: String,
    /// Column names
    pub columns: Vec<String>,
    /// Values, one per column
    pub values: Vec<Literal>,
}

/// Dotted field path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Field names, outermost first
    pub path: Vec<String>,
}

impl Column {
    /// Last segment: the default output name
    pub fn name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }
}

/// Constant value
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Quoted string
    String(String),
    /// Integer or decimal
    Number(f64),
    /// `TRUE` / `FALSE`
    Bool(bool),
    /// `NULL`
    Null,
}

impl Literal {
    /// As a field value; whole numbers become integers
    pub fn to_value(&self) -> FieldValue {
        match self {
            Self::String(s) => FieldValue::from(s.as_str()),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
                FieldValue::from(*n as i64)
            }
            Self::Number(n) => FieldValue::from(*n),
            Self::Bool(b) => FieldValue::from(*b),
            Self::Null => FieldValue::Null,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "'{s}'"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Self::Null => f.write_str("NULL"),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path.join("."))
    }
}

fn join(items: &[impl fmt::Display]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(select) => {
                write!(f, "SELECT {}", join(&select.columns))?;
                if let Some(table) = &select.from {
                    write!(f, " FROM {}", table.name)?;
                    if let Some(alias) = &table.alias {
                        write!(f, " {alias}")?;
                    }
                }
                if let Some(condition) = &select.selection {
                    write!(f, " WHERE {condition}")?;
                }
                Ok(())
            }
            Self::Insert(insert) => write!(
                f,
                "INSERT INTO {} ({}) VALUES ({})",
                insert.table,
                insert.columns.join(", "),
                join(&insert.values)
            ),
            Self::Column(column) => write!(f, "{column}"),
            Self::Literal(literal) => write!(f, "{literal}"),
            Self::Star => f.write_str("*"),
            Self::Alias { expr, alias } => write!(f, "{expr} AS {alias}"),
            Self::Like { expr, pattern } => write!(f, "{expr} LIKE {pattern}"),
            Self::Eq(left, right) => write!(f, "{left} = {right}"),
            Self::And(left, right) => write!(f, "({left} AND {right})"),
            Self::Or(left, right) => write!(f, "({left} OR {right})"),
        }
    }
}
