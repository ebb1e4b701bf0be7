//! Error types for the jewel layer
//!
//! One enum per concern: path resolution, shard loading, field access and
//! configuration. Each comes with its own `Result` alias.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Path resolution error
#[derive(Debug, Error)]
pub enum PathError {
    /// A plain file was found where a directory (or link) was expected
    #[error("Not traversable: {path} is a file but more segments remain")]
    NotTraversable {
        /// Concrete location of the offending file
        path: PathBuf,
    },

    /// A `.jlnk` indirection file could not be read
    #[error("Cannot read link {path}: {source}")]
    LinkRead {
        /// Concrete location of the link file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A `.jlnk` indirection file is empty
    #[error("Empty link file: {0}")]
    EmptyLink(PathBuf),

    /// Generic I/O failure on a resolved location
    #[error("IO error on {path}: {source}")]
    Io {
        /// Concrete location
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Specialized Result type for path operations
pub type PathResult<T> = Result<T, PathError>;

/// Shard loading error
#[derive(Debug, Error)]
pub enum ShardError {
    /// The shard location could not be resolved
    #[error(transparent)]
    Path(#[from] PathError),

    /// The file could not be read
    #[error("IO error reading {path}: {source}")]
    Io {
        /// Logical path of the shard
        path: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The frontmatter header could not be split from the body or parsed
    #[error("Frontmatter parse error in {path}: {message}")]
    Frontmatter {
        /// Logical path of the shard
        path: String,
        /// What went wrong
        message: String,
    },

    /// Not a markdown shard
    #[error("Unsupported shard format: {path} (expected a .md file)")]
    UnsupportedFormat {
        /// Logical path of the file
        path: String,
    },
}

/// Specialized Result type for shard operations
pub type ShardResult<T> = Result<T, ShardError>;

impl ShardError {
    /// Create a frontmatter error
    pub fn frontmatter(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Frontmatter {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Errors local to one document; a corpus scan may skip past them
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Frontmatter { .. } | Self::UnsupportedFormat { .. } | Self::Io { .. }
        )
    }
}

/// Field access error
#[derive(Debug, Error)]
pub enum FieldError {
    /// The field does not exist on the shard or mapping
    #[error("Missing field: {0}")]
    Missing(String),

    /// The value has no sub-fields (scalar, or out-of-range list index)
    #[error("Cannot access '{key}' on a {kind} value")]
    NotTraversable {
        /// Requested key
        key: String,
        /// Kind of the value accessed
        kind: &'static str,
    },

    /// A reference target could not be loaded
    #[error("Cannot resolve reference {uri}: {source}")]
    Unresolvable {
        /// The `jewel://` URI
        uri: String,
        /// Why loading failed
        #[source]
        source: Box<ShardError>,
    },

    /// Too many reference hops in a single access chain
    #[error("Reference chain deeper than {limit} hops at {uri}")]
    ReferenceDepthExceeded {
        /// Configured hop limit
        limit: usize,
        /// Reference at which the limit was hit
        uri: String,
    },
}

/// Specialized Result type for field access
pub type FieldResult<T> = Result<T, FieldError>;

impl FieldError {
    /// True when the field simply is not there
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing(_))
    }
}

/// Configuration loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("IO error reading {path}: {source}")]
    Io {
        /// Location of the configuration file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid YAML for the expected schema
    #[error("Invalid configuration in {path}: {source}")]
    Yaml {
        /// Location of the configuration file
        path: PathBuf,
        /// Underlying YAML error
        #[source]
        source: serde_yaml::Error,
    },
}

/// Specialized Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;
