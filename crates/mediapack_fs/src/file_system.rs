use std::{
  io,
  path::{Path, PathBuf},
};

/// The file operations every build stage goes through.
///
/// The filesystem is the only state shared between stages, so keeping it behind one seam makes
/// the stages easy to point at a scratch directory in tests.
pub trait FileSystem: Send + Sync {
  fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

  fn read_to_string(&self, path: &Path) -> io::Result<String>;

  /// Writes `content` to `path`, creating missing parent directories first.
  fn write(&self, path: &Path, content: &[u8]) -> io::Result<()>;

  fn exists(&self, path: &Path) -> bool;

  fn is_file(&self, path: &Path) -> bool;

  /// Removes a file or a whole directory. A missing path is not an error.
  fn remove(&self, path: &Path) -> io::Result<()>;

  fn copy(&self, from: &Path, to: &Path) -> io::Result<()>;

  /// Expands a glob pattern into the matching files, in lexicographic order.
  fn glob(&self, pattern: &str) -> io::Result<Vec<PathBuf>>;
}
