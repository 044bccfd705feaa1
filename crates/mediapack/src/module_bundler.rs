use mediapack_common::{NormalizedPipelineOptions, artifacts};
use mediapack_ecmascript::{EcmaCompiler, MinifiedCode};
use mediapack_error::{BuildError, BuildResult};
use mediapack_fs::{FileSystem, OsFileSystem};
use mediapack_resolver::Resolver;
use mediapack_sourcemap::{SourceJoiner, SourceMapSource, patch_source_mapping_url};

use crate::{
  generate_stage::GenerateStage,
  link_stage::LinkStage,
  scan_stage::ScanStage,
  types::{SharedOptions, SharedResolver, script_bundle::ScriptBundle},
  utils::write_with_map::write_with_map,
};

/// Source names the loader files carry in their maps until the sources are patched.
pub const ALMOND_SOURCE_NAME: &str = "almond.js";
pub const INIT_SOURCE_NAME: &str = "init.js";

pub struct ModuleBundleOutput {
  pub loader: ScriptBundle,
  pub modules: ScriptBundle,
}

pub struct ModuleBundler {
  pub(crate) fs: OsFileSystem,
  pub(crate) options: SharedOptions,
  pub(crate) resolver: SharedResolver,
}

impl ModuleBundler {
  pub fn new(options: SharedOptions) -> Self {
    let resolver: SharedResolver = Resolver::new(
      options.base_url_dir(),
      options.require_config.paths.clone(),
      options.templates_output(),
      OsFileSystem,
    )
    .into();

    Self { fs: OsFileSystem, options, resolver }
  }

  /// almond followed by the app bootstrap, each minified with its own map.
  pub fn build_loader(
    fs: &dyn FileSystem,
    options: &NormalizedPipelineOptions,
  ) -> BuildResult<ScriptBundle> {
    let mut joiner = SourceJoiner::default();
    for (path, source_name) in
      [(&options.paths.almond, ALMOND_SOURCE_NAME), (&options.paths.init, INIT_SOURCE_NAME)]
    {
      let source = fs
        .read_to_string(&options.resolve(path))
        .map_err(|err| anyhow::anyhow!("Failed to read {path}: {err}"))?;
      let MinifiedCode { code, map } = EcmaCompiler::minify_source(&source, source_name)?;
      joiner.append_source(SourceMapSource::new(code, map));
    }

    let (code, map) = joiner.join();
    Ok(ScriptBundle { code, map, modules: vec![], warnings: vec![] })
  }

  /// Every module reachable from the entry, in dependency order.
  pub async fn build_modules(&self) -> BuildResult<ScriptBundle> {
    let scan_stage_output = ScanStage::new(
      self.fs,
      SharedOptions::clone(&self.options),
      SharedResolver::clone(&self.resolver),
    )
    .scan()
    .await?;

    let mut link_stage_output = LinkStage::new(scan_stage_output).link()?;

    GenerateStage::new(&mut link_stage_output, &self.options).generate()
  }

  /// Builds the loader and the module bundle side by side and writes both once both succeeded.
  pub async fn bundle(&self) -> BuildResult<ModuleBundleOutput> {
    let fs = self.fs;
    let options = SharedOptions::clone(&self.options);
    let loader = async move {
      match tokio::task::spawn_blocking(move || Self::build_loader(&fs, &options)).await {
        Ok(result) => result,
        Err(err) => Err(BuildError::from(anyhow::Error::from(err))),
      }
    };

    let (loader, modules) = tokio::try_join!(loader, self.build_modules())?;

    for warning in &modules.warnings {
      tracing::warn!("{warning}");
    }
    tracing::debug!("Bundled {} modules", modules.modules.len());

    self.write(&loader, artifacts::LOADER_JS)?;
    self.write(&modules, artifacts::INCLUDE_JS)?;

    Ok(ModuleBundleOutput { loader, modules })
  }

  fn write(&self, bundle: &ScriptBundle, name: &str) -> anyhow::Result<()> {
    let map_name = artifacts::source_map_file(name);
    let code = patch_source_mapping_url(&bundle.code, &map_name);
    write_with_map(&self.fs, &self.options.js_dest_dir(), name, &code, bundle.map.as_ref())
  }
}
