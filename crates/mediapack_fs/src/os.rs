use std::{
  fs, io,
  path::{Path, PathBuf},
};

use crate::FileSystem;

#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
  fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
    fs::read(path)
  }

  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
  }

  fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
      fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
  }

  fn exists(&self, path: &Path) -> bool {
    path.exists()
  }

  fn is_file(&self, path: &Path) -> bool {
    path.is_file()
  }

  fn remove(&self, path: &Path) -> io::Result<()> {
    let result = match fs::symlink_metadata(path) {
      Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
      Ok(_) => fs::remove_file(path),
      Err(err) => Err(err),
    };
    match result {
      Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
      other => other,
    }
  }

  fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
    if let Some(parent) = to.parent().filter(|parent| !parent.as_os_str().is_empty()) {
      fs::create_dir_all(parent)?;
    }
    fs::copy(from, to).map(|_| ())
  }

  fn glob(&self, pattern: &str) -> io::Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern)
      .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, format!("{pattern}: {err}")))?;

    let mut files = Vec::new();
    for entry in paths {
      let path = entry.map_err(glob::GlobError::into_error)?;
      if path.is_file() {
        files.push(path);
      }
    }
    files.sort();
    Ok(files)
  }
}

#[test]
fn write_creates_parent_directories() {
  let dir = tempfile::tempdir().unwrap();
  let target = dir.path().join("a/b/c.txt");
  OsFileSystem.write(&target, b"hello").unwrap();
  assert_eq!(OsFileSystem.read_to_string(&target).unwrap(), "hello");
}

#[test]
fn remove_ignores_missing_paths() {
  let dir = tempfile::tempdir().unwrap();
  OsFileSystem.remove(&dir.path().join("missing")).unwrap();

  let nested = dir.path().join("nested/file.txt");
  OsFileSystem.write(&nested, b"x").unwrap();
  OsFileSystem.remove(&dir.path().join("nested")).unwrap();
  assert!(!OsFileSystem.exists(&dir.path().join("nested")));
}

#[test]
fn glob_returns_sorted_files_only() {
  let dir = tempfile::tempdir().unwrap();
  for name in ["b.css", "a.css", "sub/c.css"] {
    OsFileSystem.write(&dir.path().join(name), b"").unwrap();
  }
  let pattern = format!("{}/**/*.css", dir.path().display());
  let found = OsFileSystem.glob(&pattern).unwrap();
  let names = found
    .iter()
    .map(|path| path.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
    .collect::<Vec<_>>();
  assert_eq!(names, ["a.css", "b.css", "sub/c.css"]);
}
