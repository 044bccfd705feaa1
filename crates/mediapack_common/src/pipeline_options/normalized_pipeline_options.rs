use std::path::{Path, PathBuf};

use mediapack_utils::indexmap::FxIndexMap;

use crate::{BundleManifest, CommandLine, ProjectPaths, RequireConfig};

#[derive(Debug)]
pub struct NormalizedPipelineOptions {
  // --- Project
  pub cwd: PathBuf,
  pub paths: ProjectPaths,

  // --- Dependencies
  pub bower_config: FxIndexMap<String, String>,
  pub inline_require_config: String,
  pub install_commands: Vec<CommandLine>,

  // --- Output, relative to `cwd` without a trailing slash
  pub css_dest: String,
  pub js_dest: String,
  pub lib_dest: String,

  // --- Styles
  pub css_bundles: BundleManifest,
  pub style_compiler: Option<CommandLine>,
  pub image_origin: String,

  // --- Scripts
  pub require_config: RequireConfig,
  pub base_url: String,
  pub entry_module: String,
  pub template_compiler: Option<CommandLine>,

  // --- Dev server
  pub port: u16,
  pub template: String,
}

impl NormalizedPipelineOptions {
  /// Resolves a project relative path.
  pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
    self.cwd.join(path)
  }

  pub fn css_dest_dir(&self) -> PathBuf {
    self.resolve(&self.css_dest)
  }

  pub fn js_dest_dir(&self) -> PathBuf {
    self.resolve(&self.js_dest)
  }

  pub fn lib_dest_dir(&self) -> PathBuf {
    self.resolve(&self.lib_dest)
  }

  pub fn base_url_dir(&self) -> PathBuf {
    self.resolve(&self.base_url)
  }

  pub fn templates_output(&self) -> PathBuf {
    self.resolve(&self.paths.templates_output)
  }

  pub fn media_dir(&self) -> PathBuf {
    self.resolve(&self.paths.media)
  }
}
