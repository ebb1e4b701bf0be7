//! Shards: markdown documents with a YAML frontmatter header
//!
//! A shard is a row-like record. Its header fields are [`FieldValue`]s,
//! and it always carries two synthetic fields: `id` (the path segments
//! joined by `/`) and `path` (a reference to the shard itself).

mod frontmatter;
mod scan;
mod value;

pub use scan::{is_document, scan, Scan};
pub use value::{FieldValue, Fields, Reference};

use crate::error::{FieldError, FieldResult, PathError, ShardError, ShardResult};
use crate::path::JewelPath;
use std::fmt;

/// Suffix of shard files
pub const SHARD_SUFFIX: &str = ".md";

/// Pseudo-type matched by every shard
pub const ANY_TYPE: &str = "shard";

/// A loaded markdown document
#[derive(Debug, Clone)]
pub struct Shard {
    path: JewelPath,
    meta: Fields,
    body: String,
}

impl Shard {
    /// Read and parse the shard at `path`
    pub fn load(path: &JewelPath) -> ShardResult<Self> {
        if path.suffix() != Some(SHARD_SUFFIX) {
            return Err(ShardError::UnsupportedFormat {
                path: path.to_string(),
            });
        }

        path.jewel().stats().record_shard_load();
        let content = path.read_to_string().map_err(|e| match e {
            PathError::Io { source, .. } => ShardError::Io {
                path: path.to_string(),
                source,
            },
            other => ShardError::Path(other),
        })?;

        tracing::trace!(path = %path, bytes = content.len(), "Loaded shard");
        Self::parse(path.clone(), &content)
    }

    /// Parse `content` as the shard at `path`
    pub fn parse(path: JewelPath, content: &str) -> ShardResult<Self> {
        let (header, body) =
            frontmatter::split(content).map_err(|msg| ShardError::frontmatter(path.to_string(), msg))?;

        let meta = match header {
            Some(header) => {
                let mapping = frontmatter::parse_header(header)
                    .map_err(|msg| ShardError::frontmatter(path.to_string(), msg))?;
                Fields::from_yaml(path.jewel(), mapping)
            }
            None => Fields::new(),
        };

        Ok(Self {
            path,
            meta,
            body: body.to_string(),
        })
    }

    /// Logical path
    pub fn path(&self) -> &JewelPath {
        &self.path
    }

    /// Identifier: the path segments joined by `/`
    pub fn id(&self) -> String {
        self.path.id()
    }

    /// Header fields, without the synthetic ones
    pub fn meta(&self) -> &Fields {
        &self.meta
    }

    /// Markdown body following the header
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Field by name; `id` and `path` are computed from the shard's path
    pub fn get(&self, name: &str) -> FieldResult<FieldValue> {
        match name {
            "id" => Ok(FieldValue::String(self.id())),
            "path" => Ok(FieldValue::Reference(Reference::to_path(&self.path))),
            _ => self
                .meta
                .get(name)
                .cloned()
                .ok_or_else(|| FieldError::Missing(name.to_string())),
        }
    }

    /// Follow a chain of field names, crossing references on the way.
    ///
    /// The number of references crossed is bounded by the jewel's
    /// `references.max_depth`.
    pub fn lookup<S: AsRef<str>>(&self, keys: &[S]) -> FieldResult<FieldValue> {
        let Some((first, rest)) = keys.split_first() else {
            return Err(FieldError::Missing(String::new()));
        };
        let max_hops = self.path.jewel().config().references.max_depth;
        self.get(first.as_ref())?.lookup(rest, max_hops)
    }

    /// Whether `name` is a header field (synthetic fields excluded)
    pub fn contains(&self, name: &str) -> bool {
        self.meta.contains(name)
    }

    /// Field names: header keys, then `path` and `id`
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .meta
            .keys()
            .filter(|key| *key != "path" && *key != "id")
            .map(str::to_string)
            .collect();
        keys.push("path".to_string());
        keys.push("id".to_string());
        keys
    }

    /// Overwrite a header field
    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) {
        self.meta.insert(name, value);
    }

    /// Whether the `type` field starts with `typ`, ignoring case.
    ///
    /// Every shard is of type `shard`.
    pub fn is_type(&self, typ: &str) -> bool {
        if typ.eq_ignore_ascii_case(ANY_TYPE) {
            return true;
        }
        self.meta
            .get("type")
            .and_then(FieldValue::as_str)
            .is_some_and(|value| value.to_lowercase().starts_with(&typ.to_lowercase()))
    }

    /// One-line rendering: `Type(key=value, ...)`
    pub fn summary(&self) -> String {
        let typ = self
            .meta
            .get("type")
            .map(ToString::to_string)
            .unwrap_or_else(|| "Shard".to_string());

        let fields: Vec<String> = self
            .keys()
            .iter()
            .filter_map(|key| self.get(key).ok().map(|value| format!("{key}={value}")))
            .collect();

        format!("{typ}({})", fields.join(", "))
    }

    /// Serialize back to markdown with a YAML header
    pub fn to_markdown(&self) -> ShardResult<String> {
        if self.meta.is_empty() {
            return Ok(self.body.clone());
        }
        let header = serde_yaml::to_string(&FieldValue::Mapping(self.meta.clone()).to_yaml())
            .map_err(|e| ShardError::frontmatter(self.path.to_string(), e.to_string()))?;
        Ok(format!("---\n{header}---\n{}", self.body))
    }
}

impl fmt::Display for Shard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}
