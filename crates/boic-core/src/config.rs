//! Jewel configuration
//!
//! Read from an optional `jewel.yml` at the jewel root. Every section falls
//! back to its defaults, so a partial file only overrides what it names.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file at the jewel root
pub const CONFIG_FILE: &str = "jewel.yml";

/// Default hop limit for chained reference access
pub const DEFAULT_REFERENCE_DEPTH: usize = 16;

/// What a corpus scan does with a document it cannot load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log a warning and move on to the next document
    #[default]
    Skip,
    /// Surface the error to the consumer of the scan
    Fail,
}

/// Jewel configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JewelConfig {
    /// Corpus scanning
    #[serde(default)]
    pub scan: ScanConfig,

    /// Cross-shard references
    #[serde(default)]
    pub references: ReferenceConfig,
}

/// Corpus scanning configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Maximum walk depth (unbounded when absent)
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Policy for malformed documents
    #[serde(default)]
    pub on_error: ErrorPolicy,
}

/// Reference resolution configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// Maximum number of reference hops in one access chain
    #[serde(default = "default_reference_depth")]
    pub max_depth: usize,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            max_depth: default_reference_depth(),
        }
    }
}

fn default_reference_depth() -> usize {
    DEFAULT_REFERENCE_DEPTH
}

impl JewelConfig {
    /// Load `jewel.yml` from `root`, or the defaults when it is absent
    pub fn load(root: &Path) -> ConfigResult<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "No jewel configuration, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Yaml { path, source })
    }

    /// Parse a configuration document; an empty document yields the defaults
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = JewelConfig::default();
        assert_eq!(config.scan.max_depth, None);
        assert_eq!(config.scan.on_error, ErrorPolicy::Skip);
        assert_eq!(config.references.max_depth, DEFAULT_REFERENCE_DEPTH);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = JewelConfig::from_yaml("scan:\n  on_error: fail\n").unwrap();
        assert_eq!(config.scan.on_error, ErrorPolicy::Fail);
        assert_eq!(config.scan.max_depth, None);
        assert_eq!(config.references.max_depth, DEFAULT_REFERENCE_DEPTH);
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(JewelConfig::from_yaml("").unwrap(), JewelConfig::default());
    }

    #[test]
    fn test_load_from_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "scan:\n  max_depth: 3\nreferences:\n  max_depth: 2\n",
        )
        .unwrap();

        let config = JewelConfig::load(dir.path()).unwrap();
        assert_eq!(config.scan.max_depth, Some(3));
        assert_eq!(config.references.max_depth, 2);
    }

    #[test]
    fn test_load_invalid() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "scan: [1, 2").unwrap();

        let err = JewelConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }
}
