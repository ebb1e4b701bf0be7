//! Corpus walker
//!
//! Depth-bounded traversal of a jewel tree with an explicit stack. Each
//! step yields one directory with its child directories and files; `.jlnk`
//! files are reported as files and also expanded into their target.
//!
//! A directory reached twice (through a link, or a link cycle) is listed
//! once. Under a depth bound it is listed again when reached at a smaller
//! depth than before, so the walk still covers everything within the bound.

use crate::path::{JewelPath, LINK_SUFFIX};
use std::collections::HashMap;
use std::path::PathBuf;

/// One listed directory
#[derive(Debug, Clone)]
pub struct WalkEntry {
    /// The listed directory
    pub root: JewelPath,
    /// Its subdirectories
    pub dirs: Vec<JewelPath>,
    /// Its files, links included
    pub files: Vec<JewelPath>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Link,
    Dir,
}

/// Lazy traversal; see [`JewelPath::walk`]
pub struct Walk {
    stack: Vec<(JewelPath, usize, Option<EntryKind>)>,
    max_depth: Option<usize>,
    /// Shallowest depth each canonical directory was listed at
    expanded: HashMap<PathBuf, usize>,
}

impl Walk {
    pub(crate) fn new(start: JewelPath, max_depth: Option<usize>) -> Self {
        Self {
            stack: vec![(start, 0, None)],
            max_depth,
            expanded: HashMap::new(),
        }
    }

    fn classify(path: &JewelPath) -> Option<EntryKind> {
        let kind = path.is_link().and_then(|is_link| {
            Ok(if is_link {
                Some(EntryKind::Link)
            } else if path.is_dir()? {
                Some(EntryKind::Dir)
            } else {
                None
            })
        });

        kind.unwrap_or_else(|e| {
            tracing::warn!(path = %path, error = %e, "Cannot classify entry");
            None
        })
    }

    fn expand(&mut self, dir: JewelPath, depth: usize) -> Option<WalkEntry> {
        let location = match dir.canonicalize() {
            Ok(location) => location.to_path_buf(),
            Err(e) => {
                tracing::warn!(path = %dir, error = %e, "Skipping unresolvable directory");
                return None;
            }
        };

        // Unbounded walks never truncate a listing, so one listing suffices
        let relist = self.max_depth.is_some();
        match self.expanded.get(&location) {
            Some(&seen) if !relist || seen <= depth => {
                tracing::warn!(path = %dir, location = %location.display(), "Directory already walked, skipping (link cycle?)");
                return None;
            }
            Some(&seen) => {
                tracing::debug!(path = %dir, depth, seen, "Listing directory again at a smaller depth");
            }
            None => {}
        }
        self.expanded.insert(location.clone(), depth);

        dir.jewel().stats().record_dir_listing();
        let listing = match std::fs::read_dir(&location) {
            Ok(listing) => listing,
            Err(e) => {
                tracing::warn!(path = %dir, error = %e, "Cannot list directory");
                return None;
            }
        };

        let mut children: Vec<(String, PathBuf)> = listing
            .filter_map(|entry| match entry {
                Ok(entry) => Some((entry.file_name().to_string_lossy().into_owned(), entry.path())),
                Err(e) => {
                    tracing::debug!(path = %dir, error = %e, "Skipping unreadable entry");
                    None
                }
            })
            .collect();
        children.sort_by(|a, b| a.0.cmp(&b.0));

        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for (name, child_location) in children {
            let metadata = match std::fs::metadata(&child_location) {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::debug!(path = %child_location.display(), error = %e, "Skipping entry");
                    continue;
                }
            };
            let child = dir.child_at(&name, child_location);

            if metadata.is_file() {
                if child.suffix() == Some(LINK_SUFFIX) {
                    self.stack.push((child.clone(), depth + 1, Some(EntryKind::Link)));
                }
                files.push(child);
            } else if metadata.is_dir() {
                self.stack.push((child.clone(), depth + 1, Some(EntryKind::Dir)));
                dirs.push(child);
            }
        }

        tracing::trace!(path = %dir, depth, dirs = dirs.len(), files = files.len(), "Listed directory");
        Some(WalkEntry {
            root: dir,
            dirs,
            files,
        })
    }
}

impl Iterator for Walk {
    type Item = WalkEntry;

    fn next(&mut self) -> Option<WalkEntry> {
        while let Some((path, depth, kind)) = self.stack.pop() {
            if self.max_depth.is_some_and(|max| depth > max) {
                continue;
            }

            let Some(kind) = kind.or_else(|| Self::classify(&path)) else {
                continue;
            };

            match kind {
                EntryKind::Link => match path.follow() {
                    Ok(target) => self.stack.push((target, depth, None)),
                    Err(e) => tracing::warn!(path = %path, error = %e, "Cannot follow link"),
                },
                EntryKind::Dir => {
                    if let Some(entry) = self.expand(path, depth) {
                        return Some(entry);
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::jewel::Jewel;
    use std::fs;
    use std::rc::Rc;

    fn names(paths: &[crate::JewelPath]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap_or_default().to_string())
            .collect()
    }

    fn fixture() -> (tempfile::TempDir, Rc<Jewel>) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("AIOT/Usine/02_inspections")).unwrap();
        fs::create_dir_all(dir.path().join("Partage/Equipe")).unwrap();
        fs::write(dir.path().join("index.md"), "").unwrap();
        fs::write(dir.path().join("AIOT/Usine/Fiche.md"), "").unwrap();
        fs::write(dir.path().join("Partage/Equipe/GP.md"), "").unwrap();
        fs::write(dir.path().join("Equipe.jlnk"), "Partage/Equipe").unwrap();
        let jewel = Jewel::open(dir.path()).unwrap();
        (dir, jewel)
    }

    #[test]
    fn test_walk_unbounded() {
        let (_dir, jewel) = fixture();
        let entries: Vec<_> = jewel.root().walk(None).collect();

        let root = &entries[0];
        assert_eq!(names(&root.dirs), ["AIOT", "Partage"]);
        assert_eq!(names(&root.files), ["Equipe.jlnk", "index.md"]);

        let files: Vec<String> = entries.iter().flat_map(|e| names(&e.files)).collect();
        assert!(files.contains(&"Fiche.md".to_string()));
        // Listed once; the route through the link is skipped
        assert_eq!(files.iter().filter(|f| *f == "GP.md").count(), 1);
    }

    #[test]
    fn test_walk_depth_zero_lists_root_only() {
        let (_dir, jewel) = fixture();
        let entries: Vec<_> = jewel.root().walk(Some(0)).collect();

        assert_eq!(entries.len(), 1);
        assert_eq!(names(&entries[0].files), ["Equipe.jlnk", "index.md"]);
        assert_eq!(jewel.stats().link_reads(), 0);
    }

    #[test]
    fn test_walk_depth_one() {
        let (_dir, jewel) = fixture();
        let roots: Vec<String> = jewel
            .root()
            .walk(Some(1))
            .map(|e| e.root.to_string())
            .collect();

        assert!(roots.contains(&"jewel:///AIOT".to_string()));
        assert!(roots.contains(&"jewel:///Equipe".to_string()));
        assert!(!roots.iter().any(|r| r.ends_with("Usine")));
    }

    #[test]
    fn test_walk_link_cycle_terminates() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("A")).unwrap();
        fs::write(dir.path().join("A/Retour.jlnk"), "..").unwrap();
        let jewel = Jewel::open(dir.path()).unwrap();

        let entries: Vec<_> = jewel.root().walk(None).collect();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_walk_relists_directory_reached_shallower() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("D/E")).unwrap();
        fs::create_dir_all(dir.path().join("Y")).unwrap();
        fs::write(dir.path().join("D/E/x.md"), "").unwrap();
        fs::write(dir.path().join("Y/L.jlnk"), "../D").unwrap();
        let jewel = Jewel::open(dir.path()).unwrap();

        // Y is popped first, so D is first listed through the link at depth 2
        let entries: Vec<_> = jewel.root().walk(Some(2)).collect();
        let files: Vec<String> = entries
            .iter()
            .flat_map(|e| e.files.iter().map(ToString::to_string))
            .collect();
        assert!(files.contains(&"jewel:///D/E/x.md".to_string()), "{files:?}");

        let roots: Vec<String> = entries.iter().map(|e| e.root.to_string()).collect();
        assert_eq!(roots.iter().filter(|r| *r == "jewel:///D/E").count(), 1);
    }

    #[test]
    fn test_walk_is_lazy() {
        let (_dir, jewel) = fixture();
        let mut walk = jewel.root().walk(None);
        walk.next().unwrap();
        assert_eq!(jewel.stats().dir_listings(), 1);
    }

    #[test]
    fn test_walk_from_file_yields_nothing() {
        let (_dir, jewel) = fixture();
        assert_eq!(jewel.path("index.md").walk(None).count(), 0);
    }
}
