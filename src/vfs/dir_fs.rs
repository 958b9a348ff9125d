//! Filesystem backend that maps inner paths onto an existing host directory.
//!
//! ### Key Features:
//! - **Confined root**: every operation resolves below the host directory given to
//!   [`DirFS::new`]; `..` never climbs above it.
//! - **Live view**: existence and type checks ask the host on every call, so entries
//!   that were already on disk before the backend was created are visible.
//! - **Path normalization**: `.` and `..` components are resolved before touching the host.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::anyhow;

use crate::core::{FsBackend, Result, utils};

/// A backend rooted at an existing host directory, usually the base directory (or
/// drive root) a dirfile input is resolved against.
///
/// ### Usage notes:
/// - `DirFS` does not follow symlinks on removal; `rm()` removes the link, not the target.
/// - Nothing is cleaned up on drop: created entries are the point of the exercise.
/// - Errors are returned via `anyhow::Result` with descriptive messages.
///
/// ### Example:
/// ```
/// use dirfile_kit::{DirFS, FsBackend};
///
/// let root = std::env::temp_dir().join("dirfile_kit_doc");
/// std::fs::create_dir_all(&root).unwrap();
///
/// let mut fs = DirFS::new(&root).unwrap();
/// fs.mkdir("/docs").unwrap();
/// fs.mkfile("/docs/note.txt", Some(b"Hello")).unwrap();
/// assert!(fs.exists("/docs/note.txt"));
///
/// fs.rm("/docs").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct DirFS {
    root: PathBuf, // host-related absolute normalized path
    cwd: PathBuf,  // inner absolute normalized path
}

impl DirFS {
    /// Creates a new DirFS with its root at the host directory `root`.
    /// * `root` must be absolute and must already be a directory.
    /// Read-only roots are refused.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();

        if root.as_os_str().is_empty() {
            return Err(anyhow!("invalid root path: empty"));
        }
        if root.is_relative() {
            return Err(anyhow!("the root path must be absolute"));
        }
        if !root.is_dir() {
            return Err(anyhow!("{} is not an existing directory", root.display()));
        }

        let root = utils::normalize(root);
        if !Self::check_permissions(&root)? {
            return Err(anyhow!("Access denied: {}", root.display()));
        }

        Ok(Self {
            root,
            cwd: PathBuf::from("/"),
        })
    }

    fn to_inner<P: AsRef<Path>>(&self, inner_path: P) -> PathBuf {
        utils::normalize(self.cwd.join(inner_path))
    }

    fn check_permissions<P: AsRef<Path>>(path: P) -> Result<bool> {
        Ok(!std::fs::metadata(path)?.permissions().readonly())
    }

    fn metadata<P: AsRef<Path>>(&self, path: P) -> Result<std::fs::Metadata> {
        let host = self.to_host(&path)?;
        std::fs::metadata(&host)
            .map_err(|_| anyhow!("{} does not exist", path.as_ref().display()))
    }
}

impl FsBackend for DirFS {
    /// Returns root path related to the host file system.
    fn root(&self) -> &Path {
        self.root.as_path()
    }

    /// Returns current working directory related to the backend root.
    fn cwd(&self) -> &Path {
        self.cwd.as_path()
    }

    /// Returns the path on the host system that matches the specified inner path.
    fn to_host<P: AsRef<Path>>(&self, inner_path: P) -> Result<PathBuf> {
        let inner = self.to_inner(inner_path);
        Ok(self.root.join(inner.strip_prefix("/")?))
    }

    /// Changes the current working directory.
    /// An error is returned if `path` is not an existing directory.
    fn cd<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let target = self.to_inner(path);
        if !self.is_dir(&target)? {
            return Err(anyhow!("{} is not a directory", target.display()));
        }
        self.cwd = target;
        Ok(())
    }

    fn exists<P: AsRef<Path>>(&self, path: P) -> bool {
        self.to_host(path)
            .is_ok_and(|host| std::fs::symlink_metadata(host).is_ok())
    }

    fn is_dir<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        Ok(self.metadata(path)?.is_dir())
    }

    fn is_file<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        Ok(self.metadata(path)?.is_file())
    }

    /// Creates directory and all its parents (if needed).
    /// Fails if `path` already exists.
    fn mkdir<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        if path.as_ref().as_os_str().is_empty() {
            return Err(anyhow!("invalid path: empty"));
        }

        let inner_path = self.to_inner(path);
        if self.exists(&inner_path) {
            return Err(anyhow!("path already exists: {}", inner_path.display()));
        }

        let mut built = PathBuf::from("/");
        for component in inner_path.strip_prefix("/")?.components() {
            built.push(component);
            if !self.exists(&built) {
                std::fs::create_dir(self.to_host(&built)?)?;
            } else if !self.is_dir(&built)? {
                return Err(anyhow!("{} is not a directory", built.display()));
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
            }
        }

        let host = self.to_host(&file_path)?;
        let mut fd = std::fs::File::create_new(host)?;
        if let Some(content) = content {
            fd.write_all(content)?;
        }
        Ok(())
    }

    /// Reads the entire contents of a file into a byte vector.
    /// Returns an empty vector for empty files.
    fn read<P: AsRef<Path>>(&self, path: P) -> Result<Vec<u8>> {
        if self.is_dir(&path)? {
            // checks for existence too
            return Err(anyhow!("{} is a directory", path.as_ref().display()));
        }
        Ok(std::fs::read(self.to_host(&path)?)?)
    }

    /// Replaces the entire contents of an existing file.
    /// The file must exist (use `mkfile()` first).
    fn write<P: AsRef<Path>>(&mut self, path: P, content: &[u8]) -> Result<()> {
        if self.is_dir(&path)? {
            // checks for existence too
            return Err(anyhow!("{} is a directory", path.as_ref().display()));
        }
        std::fs::write(self.to_host(&path)?, content)?;
        Ok(())
    }

    /// Removes a file, or a directory with all its contents.
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

        utils::rm_on_host(self.to_host(&inner_path)?)?;
        if self.cwd.starts_with(&inner_path) {
            self.cwd = inner_path.parent().map_or_else(|| "/".into(), Path::to_path_buf);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    fn setup_test_env() -> TempDir {
        TempDir::new("dir_fs").unwrap()
    }

    mod creations {
        use super::*;

        #[test]
        fn test_new_absolute_path_existing() {
            let temp_dir = setup_test_env();
            let root = temp_dir.path().to_path_buf();

            let fs = DirFS::new(&root).unwrap();

            assert_eq!(fs.root(), root.as_path());
            assert_eq!(fs.cwd(), Path::new("/"));
            assert_eq!(std::fs::read_dir(&root).unwrap().count(), 0);
        }

        #[cfg(unix)]
        #[test]
        fn test_new_read_only_root() {
            use std::os::unix::fs::PermissionsExt;

            let temp_dir = setup_test_env();
            let locked = temp_dir.path().join("locked");
            std::fs::create_dir(&locked).unwrap();
            std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();

            let result = DirFS::new(&locked);

            std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
            assert!(result.is_err());
        }

        #[test]
        fn test_new_nonexistent_path_fails() {
            let temp_dir = setup_test_env();
            let missing = temp_dir.path().join("new_root");

            let result = DirFS::new(&missing);

            assert!(result.is_err());
            assert!(!missing.exists());
        }

        #[test]
        fn test_new_root_is_file() {
            let temp_dir = setup_test_env();
            let file = temp_dir.path().join("file.txt");
            std::fs::write(&file, b"x").unwrap();

            assert!(DirFS::new(&file).is_err());
        }

        #[test]
        fn test_new_empty_and_relative_paths() {
            assert!(DirFS::new("").is_err());
            assert!(DirFS::new("relative/root").is_err());
        }

        #[test]
        fn test_new_normalize_path() {
            let temp_dir = setup_test_env();
            std::fs::create_dir(temp_dir.path().join("sub")).unwrap();
            let messy = temp_dir.path().join("sub/./../sub");

            let fs = DirFS::new(&messy).unwrap();

            assert_eq!(fs.root(), temp_dir.path().join("sub"));
        }
    }

    mod navigation {
        use super::*;

        #[test]
        fn test_cd_and_relative_resolution() -> Result<()> {
            let temp_dir = setup_test_env();
            std::fs::create_dir_all(temp_dir.path().join("a/b"))?;
            let mut fs = DirFS::new(temp_dir.path())?;

            fs.cd("a")?;
            assert_eq!(fs.cwd(), Path::new("/a"));
            fs.cd("b")?;
            assert_eq!(fs.to_host("c.txt")?, temp_dir.path().join("a/b/c.txt"));
            fs.cd("../..")?;
            assert_eq!(fs.cwd(), Path::new("/"));
            Ok(())
        }

        #[test]
        fn test_cd_cannot_escape_root() -> Result<()> {
            let temp_dir = setup_test_env();
            let mut fs = DirFS::new(temp_dir.path())?;

            fs.cd("../../..")?;

            assert_eq!(fs.cwd(), Path::new("/"));
            assert_eq!(fs.to_host("..")?, temp_dir.path());
            Ok(())
        }

        #[test]
        fn test_cd_errors() -> Result<()> {
            let temp_dir = setup_test_env();
            std::fs::write(temp_dir.path().join("file.txt"), b"")?;
            let mut fs = DirFS::new(temp_dir.path())?;

            assert!(fs.cd("/missing").is_err());
            assert!(fs.cd("/file.txt").is_err());
            assert_eq!(fs.cwd(), Path::new("/"));
            Ok(())
        }
    }

    mod queries {
        use super::*;

        #[test]
        fn test_preexisting_host_entries_are_visible() -> Result<()> {
            let temp_dir = setup_test_env();
            std::fs::create_dir(temp_dir.path().join("dir"))?;
            std::fs::write(temp_dir.path().join("dir/file.txt"), b"data")?;
            let fs = DirFS::new(temp_dir.path())?;

            assert!(fs.exists("/"));
            assert!(fs.is_dir("/dir")?);
            assert!(fs.is_file("/dir/file.txt")?);
            assert!(!fs.is_dir("/dir/file.txt")?);
            assert_eq!(fs.read("/dir/file.txt")?, b"data");
            Ok(())
        }

        #[test]
        fn test_queries_on_missing_path() -> Result<()> {
            let temp_dir = setup_test_env();
            let fs = DirFS::new(temp_dir.path())?;

            assert!(!fs.exists("/missing"));
            let err = fs.is_dir("/missing").unwrap_err();
            assert!(err.to_string().contains("does not exist"));
            assert!(fs.is_file("/missing").is_err());
            assert!(fs.read("/missing").is_err());
            Ok(())
        }
    }

    mod mutations {
        use super::*;

        #[test]
        fn test_mkdir_nested_path() -> Result<()> {
            let temp_dir = setup_test_env();
            let mut fs = DirFS::new(temp_dir.path())?;

            fs.mkdir("/a/b/c")?;

            assert!(temp_dir.path().join("a/b/c").is_dir());
            Ok(())
        }

        #[test]
        fn test_mkdir_already_exists() -> Result<()> {
            let temp_dir = setup_test_env();
            let mut fs = DirFS::new(temp_dir.path())?;

            fs.mkdir("/dir")?;

            assert!(fs.mkdir("/dir").is_err());
            assert!(fs.mkdir("").is_err());
            Ok(())
        }

        #[test]
        fn test_mkdir_below_file_fails() -> Result<()> {
            let temp_dir = setup_test_env();
            let mut fs = DirFS::new(temp_dir.path())?;
            fs.mkfile("/file.txt", None)?;

            assert!(fs.mkdir("/file.txt/sub").is_err());
            Ok(())
        }

        #[test]
        fn test_mkfile_with_parents_and_content() -> Result<()> {
            let temp_dir = setup_test_env();
            let mut fs = DirFS::new(temp_dir.path())?;

            fs.mkfile("/docs/readme.md", Some(b"# Title"))?;
            fs.mkfile("/docs/empty.txt", None)?;

            assert!(temp_dir.path().join("docs").is_dir());
            assert_eq!(std::fs::read(temp_dir.path().join("docs/readme.md"))?, b"# Title");
            assert!(fs.read("/docs/empty.txt")?.is_empty());
            assert!(fs.mkfile("/docs/empty.txt", None).is_err());
            Ok(())
        }

        #[test]
        fn test_write_overwrites() -> Result<()> {
            let temp_dir = setup_test_env();
            let mut fs = DirFS::new(temp_dir.path())?;
            fs.mkfile("/notes.txt", Some(b"first version"))?;

            fs.write("/notes.txt", b"second")?;

            assert_eq!(fs.read("/notes.txt")?, b"second");
            assert!(fs.write("/missing.txt", b"x").is_err());
            assert!(fs.write("/", b"x").is_err());
            Ok(())
        }

        #[test]
        fn test_rm_recursive() -> Result<()> {
            let temp_dir = setup_test_env();
            let mut fs = DirFS::new(temp_dir.path())?;
            fs.mkfile("/a/b/c.txt", None)?;
            fs.cd("/a/b")?;

            fs.rm("/a")?;

            assert!(!temp_dir.path().join("a").exists());
            assert_eq!(fs.cwd(), Path::new("/"));
            Ok(())
        }

        #[test]
        fn test_rm_errors() -> Result<()> {
            let temp_dir = setup_test_env();
            let mut fs = DirFS::new(temp_dir.path())?;

            assert!(fs.rm("/").is_err());
            assert!(fs.rm("").is_err());
            assert!(fs.rm("/missing").is_err());
            assert!(temp_dir.path().exists());
            Ok(())
        }
    }
}
