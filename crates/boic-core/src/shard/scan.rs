//! Corpus iteration over every shard of a jewel

use super::{Shard, SHARD_SUFFIX};
use crate::config::ErrorPolicy;
use crate::error::ShardResult;
use crate::jewel::Jewel;
use crate::path::JewelPath;
use crate::walk::Walk;
use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::rc::Rc;

/// Whether `path` names a shard file
pub fn is_document(path: &JewelPath) -> bool {
    path.suffix() == Some(SHARD_SUFFIX)
}

/// Lazy iterator over the shards of a jewel, in walk order.
///
/// A document reached through several paths (a directory listed again by
/// a bounded walk) is yielded once, under the first path found.
///
/// With [`ErrorPolicy::Skip`], documents that fail to load are logged and
/// skipped; with [`ErrorPolicy::Fail`] the error is yielded and iteration
/// stops.
pub struct Scan {
    walk: Walk,
    pending: VecDeque<JewelPath>,
    seen: HashSet<PathBuf>,
    policy: ErrorPolicy,
    failed: bool,
}

/// Scan every shard under the jewel root
pub fn scan(jewel: &Rc<Jewel>, max_depth: Option<usize>, policy: ErrorPolicy) -> Scan {
    Scan::new(jewel.root().walk(max_depth), policy)
}

impl Scan {
    /// Scan the shards found by `walk`
    pub fn new(walk: Walk, policy: ErrorPolicy) -> Self {
        Self {
            walk,
            pending: VecDeque::new(),
            seen: HashSet::new(),
            policy,
            failed: false,
        }
    }

    fn next_candidate(&mut self) -> Option<JewelPath> {
        loop {
            if let Some(path) = self.pending.pop_front() {
                // Unresolvable paths go through so loading reports the error
                let first = match path.canonicalize() {
                    Ok(location) => self.seen.insert(location.to_path_buf()),
                    Err(_) => true,
                };
                if first {
                    return Some(path);
                }
                tracing::trace!(path = %path, "Document already scanned");
                continue;
            }
            let entry = self.walk.next()?;
            self.pending.extend(entry.files.into_iter().filter(is_document));
        }
    }
}

impl Iterator for Scan {
    type Item = ShardResult<Shard>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        while let Some(path) = self.next_candidate() {
            match Shard::load(&path) {
                Ok(shard) => return Some(Ok(shard)),
                Err(e) => match self.policy {
                    ErrorPolicy::Skip => {
                        tracing::warn!(path = %path, error = %e, "Skipping malformed shard");
                    }
                    ErrorPolicy::Fail => {
                        self.failed = true;
                        return Some(Err(e));
                    }
                },
            }
        }
        None
    }
}
