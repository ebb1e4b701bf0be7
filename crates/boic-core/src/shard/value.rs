//! Field values of a shard
//!
//! Frontmatter values are wrapped in [`FieldValue`]. Strings holding a
//! `jewel://` URI become [`Reference`]s: the target shard is loaded the
//! first time one of its fields is requested, then kept for as long as
//! the reference (or any clone of it) lives.

use super::Shard;
use crate::error::{FieldError, FieldResult};
use crate::jewel::Jewel;
use crate::path::{JewelPath, JEWEL_SCHEME};
use once_cell::unsync::OnceCell;
use serde_yaml::Value as Yaml;
use std::fmt;
use std::rc::Rc;

/// Ordered field map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: Vec<(String, FieldValue)>,
}

impl Fields {
    /// Empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `key`
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Whether `key` is present
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Set `key`, replacing any previous value in place
    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Wrap a YAML mapping
    pub fn from_yaml(jewel: &Rc<Jewel>, mapping: serde_yaml::Mapping) -> Self {
        let entries = mapping
            .into_iter()
            .map(|(key, value)| (yaml_key(key), FieldValue::from_yaml(jewel, value)))
            .collect();
        Self { entries }
    }

    fn to_yaml(&self) -> Yaml {
        Yaml::Mapping(
            self.entries
                .iter()
                .map(|(k, v)| (Yaml::String(k.clone()), v.to_yaml()))
                .collect(),
        )
    }
}

fn yaml_key(key: Yaml) -> String {
    match key {
        Yaml::String(s) => s,
        Yaml::Bool(b) => b.to_string(),
        Yaml::Number(n) => n.to_string(),
        Yaml::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// A frontmatter value
#[derive(Debug, Clone)]
pub enum FieldValue {
    /// Empty value
    Null,
    /// Boolean
    Bool(bool),
    /// Integer or float
    Number(serde_yaml::Number),
    /// Plain string
    String(String),
    /// Ordered list
    List(Vec<FieldValue>),
    /// Nested mapping
    Mapping(Fields),
    /// Lazily resolved link to another shard
    Reference(Reference),
}

impl FieldValue {
    /// Wrap a YAML value; `jewel://` strings become references
    pub fn from_yaml(jewel: &Rc<Jewel>, value: Yaml) -> Self {
        match value {
            Yaml::Null => Self::Null,
            Yaml::Bool(b) => Self::Bool(b),
            Yaml::Number(n) => Self::Number(n),
            Yaml::String(s) if JewelPath::is_jewel_uri(&s) => {
                Self::Reference(Reference::new(jewel, s))
            }
            Yaml::String(s) => Self::String(s),
            Yaml::Sequence(items) => Self::List(
                items
                    .into_iter()
                    .map(|item| Self::from_yaml(jewel, item))
                    .collect(),
            ),
            Yaml::Mapping(mapping) => Self::Mapping(Fields::from_yaml(jewel, mapping)),
            Yaml::Tagged(tagged) => Self::from_yaml(jewel, tagged.value),
        }
    }

    /// Back to YAML; references become their URI
    pub fn to_yaml(&self) -> Yaml {
        match self {
            Self::Null => Yaml::Null,
            Self::Bool(b) => Yaml::Bool(*b),
            Self::Number(n) => Yaml::Number(n.clone()),
            Self::String(s) => Yaml::String(s.clone()),
            Self::List(items) => Yaml::Sequence(items.iter().map(Self::to_yaml).collect()),
            Self::Mapping(fields) => fields.to_yaml(),
            Self::Reference(reference) => Yaml::String(reference.uri().to_string()),
        }
    }

    /// Kind name, for messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Mapping(_) => "mapping",
            Self::Reference(_) => "reference",
        }
    }

    /// Plain string content
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Textual content: plain strings and reference URIs
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Reference(reference) => Some(reference.uri()),
            _ => None,
        }
    }

    /// Numeric content
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// The reference, when this is one
    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Self::Reference(reference) => Some(reference),
            _ => None,
        }
    }

    /// Access a sub-field.
    ///
    /// Mappings are looked up by key, lists by index and references by
    /// field name on the resolved shard.
    pub fn get(&self, key: &str) -> FieldResult<FieldValue> {
        match self {
            Self::Mapping(fields) => fields
                .get(key)
                .cloned()
                .ok_or_else(|| FieldError::Missing(key.to_string())),
            Self::List(items) => key
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index))
                .cloned()
                .ok_or_else(|| FieldError::NotTraversable {
                    key: key.to_string(),
                    kind: self.kind(),
                }),
            Self::Reference(reference) => reference.resolve()?.get(key),
            _ => Err(FieldError::NotTraversable {
                key: key.to_string(),
                kind: self.kind(),
            }),
        }
    }

    /// Follow a chain of keys, allowing at most `max_hops` references
    pub fn lookup<S: AsRef<str>>(&self, keys: &[S], max_hops: usize) -> FieldResult<FieldValue> {
        let mut current = self.clone();
        let mut hops = 0;

        for key in keys {
            if let Self::Reference(reference) = &current {
                hops += 1;
                if hops > max_hops {
                    return Err(FieldError::ReferenceDepthExceeded {
                        limit: max_hops,
                        uri: reference.uri().to_string(),
                    });
                }
            }
            current = current.get(key.as_ref())?;
        }

        Ok(current)
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Mapping(a), Self::Mapping(b)) => a == b,
            (Self::Reference(a), Self::Reference(b)) => a.uri() == b.uri(),
            _ => false,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value.into())
    }
}

impl fmt::Display for FieldValue {
    /// Scalars as plain text, lists and mappings as an indented YAML block
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::Reference(reference) => f.write_str(reference.uri()),
            Self::List(_) | Self::Mapping(_) => {
                let block = serde_yaml::to_string(&self.to_yaml()).map_err(|_| fmt::Error)?;
                f.write_str(block.trim_end())
            }
        }
    }
}

/// A `jewel://` link to another shard
#[derive(Clone)]
pub struct Reference {
    uri: String,
    jewel: Rc<Jewel>,
    target: Rc<OnceCell<Rc<Shard>>>,
}

impl Reference {
    /// Unresolved reference to `uri`
    pub fn new(jewel: &Rc<Jewel>, uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            jewel: Rc::clone(jewel),
            target: Rc::new(OnceCell::new()),
        }
    }

    /// Unresolved reference to `path`
    pub fn to_path(path: &JewelPath) -> Self {
        Self::new(path.jewel(), path.to_string())
    }

    /// The URI as written
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Logical path of the target
    pub fn path(&self) -> JewelPath {
        let path = self.uri.strip_prefix(JEWEL_SCHEME).unwrap_or(&self.uri);
        self.jewel.path(path)
    }

    /// Whether the target has been loaded
    pub fn is_resolved(&self) -> bool {
        self.target.get().is_some()
    }

    /// Load the target on first call; later calls reuse it
    pub fn resolve(&self) -> FieldResult<Rc<Shard>> {
        self.target
            .get_or_try_init(|| {
                tracing::debug!(uri = %self.uri, "Resolving reference");
                Shard::load(&self.path())
                    .map(Rc::new)
                    .map_err(|source| FieldError::Unresolvable {
                        uri: self.uri.clone(),
                        source: Box::new(source),
                    })
            })
            .cloned()
    }
}

impl fmt::Debug for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reference")
            .field("uri", &self.uri)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
