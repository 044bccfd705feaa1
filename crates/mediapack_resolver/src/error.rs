use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
  #[error("Cannot find module `{id}` (looked for {}){}", path.display(), importer_suffix(.importer.as_deref()))]
  NotFound { id: String, path: PathBuf, importer: Option<String> },
  #[error("Module id `{0}` is empty")]
  EmptyId(String),
}

fn importer_suffix(importer: Option<&str>) -> String {
  importer.map(|importer| format!(", required by `{importer}`")).unwrap_or_default()
}
