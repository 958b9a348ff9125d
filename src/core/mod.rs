use std::path::{Path, PathBuf};

pub mod utils;

/// Filesystem collaborator used by the [`Driver`](crate::Driver).
///
/// Paths are inner paths: absolute ones start at the backend root, relative ones are
/// resolved against the current working directory (`cwd`).
pub trait FsBackend {
    fn root(&self) -> &Path;
    fn cwd(&self) -> &Path;
    fn to_host<P: AsRef<Path>>(&self, inner_path: P) -> Result<PathBuf>;
    fn cd<P: AsRef<Path>>(&mut self, path: P) -> Result<()>;
    fn exists<P: AsRef<Path>>(&self, path: P) -> bool;
    fn is_dir<P: AsRef<Path>>(&self, path: P) -> Result<bool>;
    fn is_file<P: AsRef<Path>>(&self, path: P) -> Result<bool>;
    fn mkdir<P: AsRef<Path>>(&mut self, path: P) -> Result<()>;
    fn mkfile<P: AsRef<Path>>(&mut self, file_path: P, content: Option<&[u8]>) -> Result<()>;
    fn read<P: AsRef<Path>>(&self, path: P) -> Result<Vec<u8>>;
    fn write<P: AsRef<Path>>(&mut self, path: P, content: &[u8]) -> Result<()>;
    fn rm<P: AsRef<Path>>(&mut self, path: P) -> Result<()>;
}

/// Directory existence probe consulted while searching for the anchor path.
pub trait Probe {
    fn dir_exists(&self, path: &Path) -> bool;
}

/// Probes the host filesystem.
#[derive(Debug, Default, Copy, Clone)]
pub struct HostProbe;

impl Probe for HostProbe {
    fn dir_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

pub type Result<T> = std::result::Result<T, anyhow::Error>;
