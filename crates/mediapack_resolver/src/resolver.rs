use std::path::{Path, PathBuf};

use arcstr::ArcStr;
use dashmap::DashMap;
use mediapack_common::{ModuleId, artifacts::TEMPLATES_MODULE_ID};
use mediapack_fs::{FileSystem, OsFileSystem};
use mediapack_utils::indexmap::FxIndexMap;
use sugar_path::SugarPath;

use crate::ResolveError;

/// Ids that the loader provides itself.
const BUILTIN_IDS: [&str; 3] = ["require", "exports", "module"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveReturn {
  pub id: ModuleId,
  pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
  Builtin,
  /// Loader plugin (`text!a.html`) or URL ids. These are left to the runtime.
  Unsupported(String),
  Module(ResolveReturn),
}

#[derive(Debug)]
pub struct Resolver<F: FileSystem = OsFileSystem> {
  base_url: PathBuf,
  paths: FxIndexMap<String, String>,
  templates_output: PathBuf,
  fs: F,
  cache: DashMap<ArcStr, ResolveReturn>,
}

impl<F: FileSystem> Resolver<F> {
  pub fn new(
    base_url: PathBuf,
    paths: FxIndexMap<String, String>,
    templates_output: PathBuf,
    fs: F,
  ) -> Self {
    Self { base_url, paths, templates_output, fs, cache: DashMap::default() }
  }

  pub fn base_url(&self) -> &Path {
    &self.base_url
  }

  pub fn resolve(
    &self,
    importer: Option<&ModuleId>,
    specifier: &str,
  ) -> Result<Resolution, ResolveError> {
    if BUILTIN_IDS.contains(&specifier) {
      return Ok(Resolution::Builtin);
    }
    if specifier.contains('!') {
      return Ok(Resolution::Unsupported(format!("loader plugin id `{specifier}`")));
    }
    if is_url(specifier) {
      return Ok(Resolution::Unsupported(format!("URL id `{specifier}`")));
    }

    let id = normalize_id(importer.map_or("", ModuleId::parent), specifier);
    if id.is_empty() {
      return Err(ResolveError::EmptyId(specifier.to_string()));
    }
    let id = ArcStr::from(id);

    if let Some(cached) = self.cache.get(&id) {
      return Ok(Resolution::Module(cached.value().clone()));
    }

    let file = self.id_to_file(&id);
    if is_url(&file) {
      return Ok(Resolution::Unsupported(format!("`{id}` maps to URL `{file}`")));
    }
    let path = self.base_url.join(&file).normalize();

    let resolved = if self.fs.is_file(&path) {
      ResolveReturn { id: ModuleId::new(ArcStr::clone(&id)), path }
    } else if ModuleId::new(ArcStr::clone(&id)).last_segment() == TEMPLATES_MODULE_ID
      && self.fs.is_file(&self.templates_output)
    {
      ResolveReturn { id: ModuleId::from(TEMPLATES_MODULE_ID), path: self.templates_output.clone() }
    } else {
      return Err(ResolveError::NotFound {
        id: id.to_string(),
        path,
        importer: importer.map(ToString::to_string),
      });
    };

    self.cache.insert(id, resolved.clone());
    Ok(Resolution::Module(resolved))
  }

  /// Applies the longest matching `paths` prefix and the `.js` suffix.
  fn id_to_file(&self, id: &str) -> String {
    let substituted = self
      .paths
      .iter()
      .filter(|(prefix, _)| {
        id == prefix.as_str()
          || id.strip_prefix(prefix.as_str()).is_some_and(|rest| rest.starts_with('/'))
      })
      .max_by_key(|(prefix, _)| prefix.len())
      .map_or_else(|| id.to_string(), |(prefix, target)| format!("{target}{}", &id[prefix.len()..]));

    if substituted.ends_with(".js") { substituted } else { format!("{substituted}.js") }
  }
}

fn is_url(id: &str) -> bool {
  id.starts_with("//") || id.contains("://")
}

/// Resolves `.` and `..` segments of `specifier` against `parent`. Relative ids are those that
/// start with `./` or `../`; anything else is already absolute. Leading `..` that cannot be
/// cancelled are kept.
fn normalize_id(parent: &str, specifier: &str) -> String {
  let is_relative = specifier.starts_with("./") || specifier.starts_with("../");
  let joined = if is_relative && !parent.is_empty() {
    format!("{parent}/{specifier}")
  } else {
    specifier.to_string()
  };

  let mut segments: Vec<&str> = Vec::new();
  for segment in joined.split('/') {
    match segment {
      "" | "." => {}
      ".." => {
        if segments.last().is_some_and(|last| *last != "..") {
          segments.pop();
        } else {
          segments.push("..");
        }
      }
      segment => segments.push(segment),
    }
  }
  segments.join("/")
}

#[cfg(test)]
mod tests {
  use mediapack_common::ModuleId;
  use mediapack_fs::{FileSystem, OsFileSystem};
  use mediapack_utils::indexmap::FxIndexMap;

  use super::{Resolution, Resolver, normalize_id};

  fn project(files: &[&str]) -> (tempfile::TempDir, Resolver) {
    let dir = tempfile::tempdir().unwrap();
    for file in files {
      OsFileSystem.write(&dir.path().join(file), b"").unwrap();
    }
    let mut paths = FxIndexMap::default();
    paths.insert("jquery".to_string(), "lib/jquery/jquery".to_string());
    paths.insert("lib".to_string(), "lib/vendor".to_string());
    paths.insert("lib/special".to_string(), "special".to_string());
    let resolver = Resolver::new(
      dir.path().join("src/media/js"),
      paths,
      dir.path().join("src/templates.js"),
      OsFileSystem,
    );
    (dir, resolver)
  }

  fn module(resolution: Resolution) -> (String, String) {
    match resolution {
      Resolution::Module(ret) => {
        (ret.id.to_string(), ret.path.file_name().unwrap().to_string_lossy().into_owned())
      }
      other => panic!("expected a module, got {other:?}"),
    }
  }

  #[test]
  fn normalizes_relative_ids() {
    assert_eq!(normalize_id("views/app", "./helpers"), "views/app/helpers");
    assert_eq!(normalize_id("views/app", "../models/user"), "views/models/user");
    assert_eq!(normalize_id("", "../../templates"), "../../templates");
    assert_eq!(normalize_id("views", "../../templates"), "../templates");
    assert_eq!(normalize_id("views", "other/a"), "other/a");
  }

  #[test]
  fn resolves_relative_to_importer() {
    let (_dir, resolver) = project(&["src/media/js/views/helpers.js"]);
    let importer = ModuleId::from("views/app");
    let (id, file) = module(resolver.resolve(Some(&importer), "./helpers").unwrap());
    assert_eq!(id, "views/helpers");
    assert_eq!(file, "helpers.js");
  }

  #[test]
  fn substitutes_longest_paths_prefix() {
    let (dir, resolver) = project(&[
      "src/media/js/lib/jquery/jquery.js",
      "src/media/js/special/thing.js",
      "src/media/js/lib/vendor/other.js",
    ]);
    let Resolution::Module(ret) = resolver.resolve(None, "jquery").unwrap() else { panic!() };
    assert_eq!(ret.path, dir.path().join("src/media/js/lib/jquery/jquery.js"));
    let Resolution::Module(ret) = resolver.resolve(None, "lib/special/thing").unwrap() else {
      panic!()
    };
    assert_eq!(ret.path, dir.path().join("src/media/js/special/thing.js"));
    let Resolution::Module(ret) = resolver.resolve(None, "lib/other").unwrap() else { panic!() };
    assert_eq!(ret.path, dir.path().join("src/media/js/lib/vendor/other.js"));
  }

  #[test]
  fn falls_back_to_templates_output_only_when_missing() {
    let (dir, resolver) = project(&["src/templates.js"]);
    let (id, file) = module(resolver.resolve(None, "templates").unwrap());
    assert_eq!((id.as_str(), file.as_str()), ("templates", "templates.js"));

    let Resolution::Module(ret) = resolver.resolve(None, "../../templates").unwrap() else {
      panic!()
    };
    assert_eq!(ret.path, dir.path().join("src/templates.js"));

    OsFileSystem.write(&dir.path().join("src/media/js/views/templates.js"), b"").unwrap();
    let (id, _) = module(resolver.resolve(None, "views/templates").unwrap());
    assert_eq!(id, "views/templates");
  }

  #[test]
  fn skips_builtins_plugins_and_urls() {
    let (_dir, resolver) = project(&[]);
    assert_eq!(resolver.resolve(None, "require").unwrap(), Resolution::Builtin);
    assert!(matches!(resolver.resolve(None, "text!a.html").unwrap(), Resolution::Unsupported(_)));
    assert!(matches!(
      resolver.resolve(None, "https://cdn.example.com/a.js").unwrap(),
      Resolution::Unsupported(_)
    ));
    assert!(resolver.resolve(None, "missing").is_err());
  }
}
