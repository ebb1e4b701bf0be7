//! Logical paths inside a jewel
//!
//! A [`JewelPath`] is a list of segments relative to the jewel root. Its
//! concrete filesystem location is computed on demand and cached: any
//! intermediate segment that does not exist on disk but has a sibling
//! `<segment>.jlnk` file is substituted by the location that file names.
//! The last segment is never substituted; following a terminal link is
//! the explicit [`JewelPath::follow`] operation.

use crate::error::{PathError, PathResult};
use crate::jewel::Jewel;
use crate::walk::Walk;
use once_cell::unsync::OnceCell;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::rc::Rc;

/// URI scheme of logical paths
pub const JEWEL_SCHEME: &str = "jewel://";

/// Suffix of indirection files
pub const LINK_SUFFIX: &str = ".jlnk";

/// A segmented, lazily canonicalized path inside a jewel
#[derive(Clone)]
pub struct JewelPath {
    jewel: Rc<Jewel>,
    segments: Vec<String>,
    stem: Option<String>,
    suffixes: Vec<String>,
    canon: OnceCell<PathBuf>,
}

impl JewelPath {
    /// Create a path from raw segments
    pub fn new<I, S>(jewel: Rc<Jewel>, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();

        let (stem, suffixes) = match segments.last() {
            Some(name) => {
                let mut parts = name.split('.');
                let stem = parts.next().unwrap_or_default().to_string();
                let suffixes = parts.map(|part| format!(".{part}")).collect();
                (Some(stem), suffixes)
            }
            None => (None, Vec::new()),
        };

        Self {
            jewel,
            segments,
            stem,
            suffixes,
            canon: OnceCell::new(),
        }
    }

    /// Parse `jewel://a/b`, `/a/b`, `a/b` or `/`
    pub fn parse(jewel: &Rc<Jewel>, path: &str) -> Self {
        if let Some(rest) = path.strip_prefix(JEWEL_SCHEME) {
            return Self::parse(jewel, rest);
        }
        if path == "/" {
            return Self::new(Rc::clone(jewel), [""]);
        }
        Self::new(Rc::clone(jewel), path.split('/'))
    }

    /// Is `value` a `jewel://` URI
    pub fn is_jewel_uri(value: &str) -> bool {
        value.starts_with(JEWEL_SCHEME)
    }

    /// Owning jewel
    pub fn jewel(&self) -> &Rc<Jewel> {
        &self.jewel
    }

    /// Path segments
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segments joined by `/`; the identifier of a shard
    pub fn id(&self) -> String {
        self.segments.join("/")
    }

    /// Absolute paths begin with an empty segment
    pub fn is_absolute(&self) -> bool {
        self.segments.first().is_some_and(|s| s.is_empty())
    }

    /// Final segment
    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Final segment up to its first `.`
    pub fn stem(&self) -> Option<&str> {
        self.stem.as_deref()
    }

    /// Every `.suffix` of the final segment
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// Last `.suffix` of the final segment
    pub fn suffix(&self) -> Option<&str> {
        self.suffixes.last().map(String::as_str)
    }

    /// Concatenate the segments of `path` (parsed as in [`JewelPath::parse`])
    pub fn join(&self, path: &str) -> JewelPath {
        self.join_path(&Self::parse(&self.jewel, path))
    }

    /// Concatenate the segments of another path
    pub fn join_path(&self, other: &JewelPath) -> JewelPath {
        Self::new(
            Rc::clone(&self.jewel),
            self.segments.iter().chain(other.segments.iter()).cloned(),
        )
    }

    /// Drop the final segment
    pub fn parent(&self) -> JewelPath {
        let end = self.segments.len().saturating_sub(1);
        Self::new(Rc::clone(&self.jewel), self.segments[..end].iter().cloned())
    }

    /// Child path whose concrete location is already known
    pub(crate) fn child_at(&self, name: &str, location: PathBuf) -> JewelPath {
        let child = Self::new(
            Rc::clone(&self.jewel),
            self.segments.iter().cloned().chain(std::iter::once(name.to_string())),
        );
        let _ = child.canon.set(location);
        child
    }

    /// Concrete filesystem location, computed once and cached
    pub fn canonicalize(&self) -> PathResult<&Path> {
        self.canon
            .get_or_try_init(|| self.resolve())
            .map(PathBuf::as_path)
    }

    /// Whether the canonical location has already been computed
    pub fn is_canonicalized(&self) -> bool {
        self.canon.get().is_some()
    }

    fn resolve(&self) -> PathResult<PathBuf> {
        let segments: Vec<&str> = self
            .segments
            .iter()
            .map(String::as_str)
            .filter(|segment| !segment.is_empty())
            .collect();
        let last = segments.len().saturating_sub(1);

        let mut location = self.jewel.root_dir().to_path_buf();
        for (index, segment) in segments.iter().enumerate() {
            let candidate = location.join(segment);

            if index < last {
                if !candidate.exists() {
                    let link = location.join(format!("{segment}{LINK_SUFFIX}"));
                    if link.is_file() {
                        let target = read_link(&self.jewel, &link)?;
                        tracing::trace!(link = %link.display(), target = %target, "Substituting link segment");
                        location = normalize(&location.join(target));
                        continue;
                    }
                } else if candidate.is_file() {
                    return Err(PathError::NotTraversable { path: candidate });
                }
            }

            location = candidate;
        }

        Ok(normalize(&location))
    }

    /// Something exists at the canonical location
    pub fn exists(&self) -> PathResult<bool> {
        Ok(self.canonicalize()?.exists())
    }

    /// The canonical location is a file
    pub fn is_file(&self) -> PathResult<bool> {
        Ok(self.canonicalize()?.is_file())
    }

    /// The canonical location is a directory
    pub fn is_dir(&self) -> PathResult<bool> {
        Ok(self.canonicalize()?.is_dir())
    }

    /// The final segment is an existing `.jlnk` file
    pub fn is_link(&self) -> PathResult<bool> {
        Ok(self.suffix() == Some(LINK_SUFFIX) && self.is_file()?)
    }

    /// Follow a terminal `.jlnk` segment.
    ///
    /// The result keeps this path's segments with the link suffix removed,
    /// and its location is the link content taken relative to the link's
    /// directory. The target is not checked for existence.
    pub fn follow(&self) -> PathResult<JewelPath> {
        let link = self.canonicalize()?.to_path_buf();
        let target = read_link(&self.jewel, &link)?;
        let base = link.parent().unwrap_or(self.jewel.root_dir());

        let name = self.file_name().unwrap_or_default();
        let name = name.strip_suffix(LINK_SUFFIX).unwrap_or(name);
        let followed = self.parent().join_path(&Self::new(Rc::clone(&self.jewel), [name]));
        let _ = followed.canon.set(normalize(&base.join(target)));
        Ok(followed)
    }

    /// Create the directory (and its parents) at the canonical location
    pub fn mkdir(&self) -> PathResult<()> {
        let location = self.canonicalize()?;
        std::fs::create_dir_all(location).map_err(|source| PathError::Io {
            path: location.to_path_buf(),
            source,
        })
    }

    /// Read the file at the canonical location
    pub fn read_to_string(&self) -> PathResult<String> {
        let location = self.canonicalize()?;
        std::fs::read_to_string(location).map_err(|source| PathError::Io {
            path: location.to_path_buf(),
            source,
        })
    }

    /// Depth-bounded traversal starting here
    pub fn walk(&self, max_depth: Option<usize>) -> Walk {
        Walk::new(self.clone(), max_depth)
    }
}

/// Read the single-line content of a link file
fn read_link(jewel: &Jewel, link: &Path) -> PathResult<String> {
    jewel.stats().record_link_read();

    let content = std::fs::read_to_string(link).map_err(|source| PathError::LinkRead {
        path: link.to_path_buf(),
        source,
    })?;
    let target = content.lines().next().unwrap_or_default().trim();
    if target.is_empty() {
        return Err(PathError::EmptyLink(link.to_path_buf()));
    }
    Ok(target.to_string())
}

/// Lexically remove `.` and `..` components
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

impl PartialEq for JewelPath {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.jewel, &other.jewel) && self.segments == other.segments
    }
}

impl Eq for JewelPath {}

impl fmt::Display for JewelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", JEWEL_SCHEME, self.segments.join("/"))
    }
}

impl fmt::Debug for JewelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JewelPath({self})")
    }
}
