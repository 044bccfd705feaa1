use std::{io, path::{Path, PathBuf}};

use mediapack_fs::FileSystem;
use mediapack_utils::{indexmap::FxIndexSet, path_ext::PathExt};

/// Ordered glob patterns. A leading `!` turns a pattern into an exclusion.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SourceSet {
  patterns: Vec<String>,
}

impl SourceSet {
  pub fn new(patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
    Self { patterns: patterns.into_iter().map(Into::into).collect() }
  }

  pub fn patterns(&self) -> &[String] {
    &self.patterns
  }

  #[must_use]
  pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
    self.patterns.push(pattern.into());
    self
  }

  /// Expands the set against `cwd`.
  ///
  /// Matches keep pattern order, are sorted within one pattern and appear once. Exclusions are
  /// matched against the `cwd` relative path and apply regardless of where they appear.
  pub fn resolve(&self, fs: &dyn FileSystem, cwd: &Path) -> io::Result<Vec<PathBuf>> {
    let (excludes, includes): (Vec<_>, Vec<_>) =
      self.patterns.iter().partition(|pattern| pattern.starts_with('!'));

    let mut files = FxIndexSet::default();
    for pattern in includes {
      let absolute = cwd.join(pattern);
      files.extend(fs.glob(&absolute.expect_to_slash())?);
    }

    Ok(
      files
        .into_iter()
        .filter(|file| {
          let relative = file.relative_slash(cwd);
          !excludes.iter().any(|exclude| fast_glob::glob_match(&exclude[1..], &relative))
        })
        .collect(),
    )
  }
}
