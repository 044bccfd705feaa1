pub mod command_line;
pub mod normalized_pipeline_options;
pub mod project_paths;
pub mod require_config;

use std::path::{Path, PathBuf};

use anyhow::Context;
use mediapack_fs::FileSystem;
use mediapack_utils::indexmap::FxIndexMap;
use serde::Deserialize;

use crate::{CommandLine, ProjectPaths, RequireConfig};

/// The raw project configuration, usually read from `mediapack.json`.
///
/// Every field is optional; `normalize_options` fills in the defaults.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineOptions {
  // --- Project
  #[serde(skip)]
  pub cwd: Option<PathBuf>,
  pub paths: Option<ProjectPaths>,

  // --- Dependencies
  /// Glob under the bower directory -> destination directory.
  pub bower_config: Option<FxIndexMap<String, String>>,
  pub inline_require_config: Option<String>,
  pub install_commands: Option<Vec<CommandLine>>,

  // --- Output
  #[serde(rename = "CSS_DEST_PATH")]
  pub css_dest_path: Option<String>,
  #[serde(rename = "JS_DEST_PATH")]
  pub js_dest_path: Option<String>,
  #[serde(rename = "LIB_DEST_PATH")]
  pub lib_dest_path: Option<String>,

  // --- Styles
  pub css_bundles: Option<FxIndexMap<String, String>>,
  pub css_excludes: Option<Vec<String>>,
  pub style_compiler: Option<CommandLine>,
  pub image_origin: Option<String>,

  // --- Scripts
  pub require_config: Option<RequireConfig>,
  pub entry_module: Option<String>,
  pub template_compiler: Option<CommandLine>,

  // --- Dev server
  #[serde(rename = "PORT")]
  pub port: Option<u16>,
  #[serde(skip)]
  pub port_override: Option<u16>,
  #[serde(skip)]
  pub template: Option<String>,
}

impl PipelineOptions {
  pub const CONFIG_FILE_NAME: &'static str = "mediapack.json";

  pub fn from_json(json: &str) -> anyhow::Result<Self> {
    Ok(serde_json::from_str(json)?)
  }

  /// Reads `config` when given, otherwise `<cwd>/mediapack.json` if it exists. Without either the
  /// defaults are used.
  pub fn load(fs: &dyn FileSystem, cwd: &Path, config: Option<&Path>) -> anyhow::Result<Self> {
    let path = match config {
      Some(config) => cwd.join(config),
      None => {
        let default = cwd.join(Self::CONFIG_FILE_NAME);
        if !fs.is_file(&default) {
          return Ok(Self { cwd: Some(cwd.to_path_buf()), ..Self::default() });
        }
        default
      }
    };
    let json = fs
      .read_to_string(&path)
      .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let mut options = Self::from_json(&json)
      .with_context(|| format!("Invalid config file {}", path.display()))?;
    options.cwd = Some(cwd.to_path_buf());
    Ok(options)
  }
}

#[test]
fn reads_original_config_keys() {
  let options = PipelineOptions::from_json(
    r#"{
      "bowerConfig": { "almond/almond.js": "src/media/js/lib/" },
      "inlineRequireConfig": "require.config({});",
      "CSS_DEST_PATH": "src/media/css/",
      "cssBundles": { "splash.css": "splash.styl.css" },
      "requireConfig": {
        "paths": { "jquery": "lib/jquery" },
        "shim": { "underscore": { "exports": "_" } }
      },
      "PORT": 8080,
      "styleCompiler": ["stylus", "--print"]
    }"#,
  )
  .unwrap();
  assert_eq!(options.css_dest_path.as_deref(), Some("src/media/css/"));
  assert_eq!(options.port, Some(8080));
  assert_eq!(options.css_bundles.unwrap()["splash.css"], "splash.styl.css");
  let require = options.require_config.unwrap();
  assert_eq!(require.shim["underscore"].exports.as_deref(), Some("_"));
  assert_eq!(options.style_compiler.unwrap().program(), "stylus");
}

#[test]
fn load_falls_back_to_defaults() {
  use mediapack_fs::OsFileSystem;

  let dir = tempfile::tempdir().unwrap();
  let options = PipelineOptions::load(&OsFileSystem, dir.path(), None).unwrap();
  assert_eq!(options.cwd.as_deref(), Some(dir.path()));
  assert!(options.port.is_none());

  OsFileSystem.write(&dir.path().join("mediapack.json"), br#"{ "PORT": 9000 }"#).unwrap();
  let options = PipelineOptions::load(&OsFileSystem, dir.path(), None).unwrap();
  assert_eq!(options.port, Some(9000));

  let missing = PipelineOptions::load(&OsFileSystem, dir.path(), Some(Path::new("other.json")));
  assert!(missing.unwrap_err().to_string().contains("other.json"));
}
