#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc};

use mediapack::{NormalizedPipelineOptions, PipelineOptions, normalize_options};
use tempfile::TempDir;

/// A throwaway project laid out like a real one.
pub struct Project {
  dir: TempDir,
}

impl Project {
  pub fn new() -> Self {
    Self { dir: tempfile::tempdir().unwrap() }
  }

  pub fn path(&self, relative: &str) -> PathBuf {
    self.dir.path().join(relative)
  }

  pub fn write(&self, relative: &str, content: &str) -> &Self {
    let path = self.path(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
    self
  }

  pub fn read(&self, relative: &str) -> String {
    std::fs::read_to_string(self.path(relative))
      .unwrap_or_else(|err| panic!("{relative} should exist: {err}"))
  }

  pub fn exists(&self, relative: &str) -> bool {
    self.path(relative).exists()
  }

  pub fn raw_options(&self, config: &str) -> PipelineOptions {
    let mut options = PipelineOptions::from_json(config).unwrap();
    options.cwd = Some(self.dir.path().to_path_buf());
    options
  }

  pub fn options(&self, config: &str) -> Arc<NormalizedPipelineOptions> {
    Arc::new(normalize_options(self.raw_options(config)).unwrap())
  }

  /// The loader files and a small module graph.
  pub fn with_scripts(&self) -> &Self {
    self
      .write(
        "src/media/js/lib/almond.js",
        "var requirejs, require, define;\n(function () {\n  define = function (name, deps, factory) {\n    return name;\n  };\n  require = requirejs = function (deps) {\n    return deps;\n  };\n}());\n",
      )
      .write("src/media/js/lib/commonplace/init.js", "require(['main']);\n")
      .write(
        "src/media/js/main.js",
        "define(['views/home', 'legacy', '../../templates'], function (home, legacy, templates) {\n  return home + legacy.answer;\n});\n",
      )
      .write("src/media/js/views/home.js", "define(function () {\n  return 1;\n});\n")
      .write("src/media/js/lib/legacy.js", "var Legacy = { answer: 42 };\n")
      .write("src/media/js/nunjucks.js", "define(function () {\n  return { Environment: function () {} };\n});\n")
      .write("src/media/js/helpers.js", "define(['nunjucks'], function (nunjucks) {\n  return nunjucks;\n});\n")
  }

  pub fn script_config() -> &'static str {
    r#"{
      "requireConfig": {
        "paths": { "legacy": "lib/legacy" },
        "shim": { "legacy": { "exports": "Legacy" } }
      }
    }"#
  }

  /// Compiled stylesheets, the document that orders them and one image.
  pub fn with_styles(&self) -> &Self {
    self
      .write(
        "src/index.html",
        r#"<!DOCTYPE html>
<link rel="stylesheet" href="/media/css/b.styl.css">
<link rel="stylesheet" href="/media/css/splash.css">
<link rel="stylesheet" href="/media/css/missing.styl.css">
<link rel="stylesheet" href="/media/css/a.styl.css">
"#,
      )
      .write("src/media/css/a.styl", ".a {\n  color: blue;\n  & span { background: url(/media/img/foo.png); }\n}\n")
      .write("src/media/css/b.styl", ".b {\n  color: red;\n}\n")
      .write("src/media/css/splash.styl", ".splash {\n  color: green;\n}\n")
      .write("src/media/css/lib/vars.styl", ".never-compiled { color: black; }\n")
      .write("src/media/img/foo.png", "not really a png")
  }

  pub fn style_config() -> &'static str {
    r#"{ "cssBundles": { "splash.css": "splash*.styl.css" } }"#
  }
}
