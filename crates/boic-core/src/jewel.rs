//! The jewel: root of a managed shard tree

use crate::config::JewelConfig;
use crate::error::ConfigResult;
use crate::path::JewelPath;
use std::cell::Cell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// I/O counters for a jewel.
///
/// Incremented on every link read, shard load and directory listing, so
/// caching and laziness can be observed from the outside.
#[derive(Debug, Default)]
pub struct IoStats {
    link_reads: Cell<u64>,
    shard_loads: Cell<u64>,
    dir_listings: Cell<u64>,
}

impl IoStats {
    /// Number of `.jlnk` files read
    pub fn link_reads(&self) -> u64 {
        self.link_reads.get()
    }

    /// Number of shard files read
    pub fn shard_loads(&self) -> u64 {
        self.shard_loads.get()
    }

    /// Number of directories listed by walkers
    pub fn dir_listings(&self) -> u64 {
        self.dir_listings.get()
    }

    pub(crate) fn record_link_read(&self) {
        self.link_reads.set(self.link_reads.get() + 1);
    }

    pub(crate) fn record_shard_load(&self) {
        self.shard_loads.set(self.shard_loads.get() + 1);
    }

    pub(crate) fn record_dir_listing(&self) {
        self.dir_listings.set(self.dir_listings.get() + 1);
    }
}

/// A jewel: a directory of shards plus its configuration.
///
/// Shared through `Rc` by every path and reference created from it.
pub struct Jewel {
    root: PathBuf,
    config: JewelConfig,
    stats: IoStats,
}

impl Jewel {
    /// Open the jewel at `root`, reading `jewel.yml` if present
    pub fn open(root: impl AsRef<Path>) -> ConfigResult<Rc<Self>> {
        let root = root.as_ref();
        let config = JewelConfig::load(root)?;
        Ok(Self::with_config(root, config))
    }

    /// Open the jewel at `root` with an explicit configuration
    pub fn with_config(root: impl AsRef<Path>, config: JewelConfig) -> Rc<Self> {
        let root = root.as_ref();
        let root = std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
        tracing::debug!(root = %root.display(), "Opened jewel");

        Rc::new(Self {
            root,
            config,
            stats: IoStats::default(),
        })
    }

    /// Concrete location of the jewel root
    pub fn root_dir(&self) -> &Path {
        &self.root
    }

    /// Jewel configuration
    pub fn config(&self) -> &JewelConfig {
        &self.config
    }

    /// I/O counters
    pub fn stats(&self) -> &IoStats {
        &self.stats
    }

    /// Logical path of the jewel root
    pub fn root(self: &Rc<Self>) -> JewelPath {
        JewelPath::new(Rc::clone(self), [""])
    }

    /// Logical path for `path`, taken relative to the root unless absolute.
    ///
    /// Accepts `jewel://a/b`, `/a/b`, `a/b` and `/`.
    pub fn path(self: &Rc<Self>, path: &str) -> JewelPath {
        let parsed = JewelPath::parse(self, path);
        if parsed.is_absolute() {
            parsed
        } else {
            self.root().join_path(&parsed)
        }
    }
}

impl fmt::Debug for Jewel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Jewel")
            .field("root", &self.root)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_is_rooted() {
        let dir = tempfile::tempdir().unwrap();
        let jewel = Jewel::open(dir.path()).unwrap();

        assert_eq!(jewel.path("AIOT/Fiche.md").segments(), ["", "AIOT", "Fiche.md"]);
        assert_eq!(
            jewel.path("jewel://AIOT/Fiche.md").segments(),
            ["", "AIOT", "Fiche.md"]
        );
        assert_eq!(
            jewel.path("jewel:///AIOT/Fiche.md").segments(),
            ["", "AIOT", "Fiche.md"]
        );
        assert_eq!(jewel.path("/").segments(), [""]);
    }

    #[test]
    fn test_open_reads_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("jewel.yml"), "scan:\n  max_depth: 1\n").unwrap();

        let jewel = Jewel::open(dir.path()).unwrap();
        assert_eq!(jewel.config().scan.max_depth, Some(1));
        assert_eq!(jewel.stats().link_reads(), 0);
    }
}
