//! In-memory filesystem backend.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::anyhow;

use crate::core::{FsBackend, Probe, Result, utils};
use crate::Entry;

/// A filesystem backend that keeps every directory and file in memory.
///
/// `MapFS` lets a dirfile program be replayed without touching the host: the driver
/// creates, writes and removes entries in a map, and the map doubles as the
/// existence [`Probe`] for the anchor search.
///
/// ### Internal state
///
/// * `root`: An absolute host path the inner root is said to correspond to. It only
///   affects [`to_host`](FsBackend::to_host).
/// * `cwd`: Current working directory, an inner absolute normalized path. Relative
///   paths are resolved against it. Default: `/`.
/// * `entries`: Inner absolute normalized paths mapped to their [`Entry`].
///
/// ### Invariants
///
/// 1. `/` is always present and is a directory.
/// 2. Every key, as well as `cwd`, is normalized.
/// 3. For any entry `/a/b/c` there is a directory entry `/a/b`.
///
/// ### Example
///
/// ```
/// use dirfile_kit::{FsBackend, MapFS};
///
/// let mut fs = MapFS::new();
/// fs.mkdir("/docs").unwrap();
/// fs.mkfile("/docs/note.txt", Some(b"Hello")).unwrap();
/// assert!(fs.exists("/docs/note.txt"));
/// ```
#[derive(Debug, Clone)]
pub struct MapFS {
    root: PathBuf,                     // host-related absolute path
    cwd: PathBuf,                      // inner absolute normalized path
    entries: BTreeMap<PathBuf, Entry>, // inner absolute normalized paths
}

impl MapFS {
    /// Creates an empty MapFS whose root and cwd are `/`.
    pub fn new() -> Self {
        let inner_root = PathBuf::from("/");
        let mut entries = BTreeMap::new();
        entries.insert(inner_root.clone(), Entry::directory());

        Self {
            root: inner_root.clone(),
            cwd: inner_root,
            entries,
        }
    }

    /// Changes root path.
    /// * `path` must be absolute.
    pub fn set_root<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.is_absolute() {
            return Err(anyhow!("root path must be absolute"));
        }
        self.root = path.to_path_buf();
        Ok(())
    }

    fn to_inner<P: AsRef<Path>>(&self, inner_path: P) -> PathBuf {
        utils::normalize(self.cwd.join(inner_path))
    }

    fn entry<P: AsRef<Path>>(&self, path: P) -> Result<&Entry> {
        let path = path.as_ref();
        self.entries
            .get(&self.to_inner(path))
            .ok_or_else(|| anyhow!("{} does not exist", path.display()))
    }
}

impl Default for MapFS {
    fn default() -> Self {
        Self::new()
    }
}

impl Probe for MapFS {
    fn dir_exists(&self, path: &Path) -> bool {
        self.entry(path).is_ok_and(Entry::is_dir)
    }
}

impl FsBackend for MapFS {
    fn root(&self) -> &Path {
        self.root.as_path()
    }

    fn cwd(&self) -> &Path {
        self.cwd.as_path()
    }

    /// Returns the hypothetical host path joining `root` and `inner_path`.
    fn to_host<P: AsRef<Path>>(&self, inner_path: P) -> Result<PathBuf> {
        let inner = self.to_inner(inner_path);
        Ok(self.root.join(inner.strip_prefix("/")?))
    }

    /// Changes the current working directory.
    /// * `path` can be relative or absolute; it must be an existing directory.
    fn cd<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let target = self.to_inner(path);
        if !self.entry(&target)?.is_dir() {
            return Err(anyhow!("{} is not a directory", target.display()));
        }
        self.cwd = target;
        Ok(())
    }

    fn exists<P: AsRef<Path>>(&self, path: P) -> bool {
        self.entries.contains_key(&self.to_inner(path))
    }

    fn is_dir<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        Ok(self.entry(path)?.is_dir())
    }

    fn is_file<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        Ok(self.entry(path)?.is_file())
    }

    /// Creates a directory and all its missing parents.
    /// Fails if `path` already exists or a parent is a file.
    fn mkdir<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        if path.as_ref().as_os_str().is_empty() {
            return Err(anyhow!("invalid path: empty"));
        }

        let inner_path = self.to_inner(path);
        if self.exists(&inner_path) {
            return Err(anyhow!("path already exists: {}", inner_path.display()));
        }

        let mut built = PathBuf::new();
        for component in inner_path.components() {
            built.push(component);
            match self.entries.get(&built) {
                Some(entry) if !entry.is_dir() => {
                    return Err(anyhow!("{} is not a directory", built.display()));
                }
                Some(_) => {}
                None => {
                    self.entries.insert(built.clone(), Entry::directory());
                }
            }
        }

        Ok(())
    }

    /// Creates a new file, creating missing parent directories.
    /// Fails if `file_path` already exists.
    fn mkfile<P: AsRef<Path>>(&mut self, file_path: P, content: Option<&[u8]>) -> Result<()> {
        let file_path = self.to_inner(file_path);
        if self.exists(&file_path) {
            return Err(anyhow!("{} already exists", file_path.display()));
        }
        if let Some(parent) = file_path.parent() {
            if !self.exists(parent) {
                self.mkdir(parent)?;
            } else if !self.entries[parent].is_dir() {
                return Err(anyhow!("{} is not a directory", parent.display()));
            }
        }

        self.entries.insert(file_path, Entry::file(content));

        Ok(())
    }

    /// Reads the entire contents of a file. Empty files yield an empty vector.
    fn read<P: AsRef<Path>>(&self, path: P) -> Result<Vec<u8>> {
        let entry = self.entry(&path)?;
        if entry.is_dir() {
            return Err(anyhow!("{} is a directory", path.as_ref().display()));
        }
        Ok(entry.content().to_vec())
    }

    /// Replaces the contents of an existing file.
    fn write<P: AsRef<Path>>(&mut self, path: P, content: &[u8]) -> Result<()> {
        let inner = self.to_inner(&path);
        match self.entries.get_mut(&inner) {
            None => Err(anyhow!("{} does not exist", path.as_ref().display())),
            Some(entry) if entry.is_dir() => {
                Err(anyhow!("{} is a directory", path.as_ref().display()))
            }
            Some(entry) => {
                entry.replace_content(content);
                Ok(())
            }
        }
    }

    /// Removes a file, or a directory with everything below it.
    /// The root cannot be removed.
    fn rm<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        if path.as_ref().as_os_str().is_empty() {
            return Err(anyhow!("invalid path: empty"));
        }

        let inner_path = self.to_inner(path);
        if utils::is_virtual_root(&inner_path) {
            return Err(anyhow!("invalid path: the root cannot be removed"));
        }
        if !self.exists(&inner_path) {
            return Err(anyhow!("{} does not exist", inner_path.display()));
        }

        let removed: Vec<PathBuf> = self
            .entries
            .keys()
            .filter(|p| p.starts_with(&inner_path))
            .cloned()
            .collect();
        for p in &removed {
            self.entries.remove(p);
        }
        if self.cwd.starts_with(&inner_path) {
            self.cwd = inner_path.parent().map_or_else(|| "/".into(), Path::to_path_buf);
        }

        Ok(())
    }
}
