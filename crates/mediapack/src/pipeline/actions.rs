//! Task actions that do not belong to one of the bundlers.

use std::path::PathBuf;

use mediapack_common::{NormalizedPipelineOptions, SourceSet, artifacts};
use mediapack_ecmascript::EcmaCompiler;
use mediapack_fs::FileSystem;
use mediapack_utils::{
  glob_base::glob_base,
  path_ext::PathExt,
  rayon::{IntoParallelRefIterator, ParallelIterator},
};

/// Runs the configured package manager commands in the project root. Any failure is fatal.
pub async fn install(options: &NormalizedPipelineOptions) -> anyhow::Result<()> {
  for command in &options.install_commands {
    tracing::info!("Running `{command}`");
    let status = tokio::process::Command::new(command.program())
      .args(command.args())
      .current_dir(&options.cwd)
      .status()
      .await
      .map_err(|err| anyhow::anyhow!("Failed to run `{command}`: {err}"))?;
    if !status.success() {
      anyhow::bail!("`{command}` exited with {status}");
    }
  }
  Ok(())
}

/// Copies every `bowerConfig` glob into its destination, keeping paths below the glob base.
pub fn bower_copy(
  fs: &dyn FileSystem,
  options: &NormalizedPipelineOptions,
) -> anyhow::Result<usize> {
  let bower = options.paths.bower.trim_end_matches('/');
  let mut copied = 0;
  for (pattern, dest) in &options.bower_config {
    let pattern = format!("{bower}/{pattern}");
    let base = options.resolve(glob_base(&pattern));
    let dest = options.resolve(dest);

    let files = fs.glob(&options.resolve(&pattern).expect_to_slash())?;
    if files.is_empty() {
      tracing::warn!("{pattern} matched nothing");
    }
    for file in files {
      let relative = match file.strip_prefix(&base) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => file.file_name().map(PathBuf::from).unwrap_or_default(),
      };
      fs.copy(&file, &dest.join(relative))?;
      copied += 1;
    }
  }
  Ok(copied)
}

/// `require.js` from bower with the inline `require.config` call appended.
pub fn require_config(
  fs: &dyn FileSystem,
  options: &NormalizedPipelineOptions,
) -> anyhow::Result<()> {
  let source_path = options.resolve(&options.paths.require);
  let mut source = fs
    .read_to_string(&source_path)
    .map_err(|err| anyhow::anyhow!("Failed to read {}: {err}", source_path.display()))?;
  source.push_str(&options.inline_require_config);
  fs.write(&options.lib_dest_dir().join(artifacts::REQUIRE_JS), source.as_bytes())?;
  Ok(())
}

pub fn write_build_id(
  fs: &dyn FileSystem,
  options: &NormalizedPipelineOptions,
  build_id: &str,
) -> anyhow::Result<()> {
  fs.write(&options.media_dir().join(artifacts::BUILD_ID_TXT), build_id.as_bytes())?;
  Ok(())
}

/// Project scripts minus templates, third party libraries and bundles.
pub fn lint_sources(options: &NormalizedPipelineOptions) -> SourceSet {
  let js_dest = &options.js_dest;
  options
    .paths
    .lint_excludes
    .iter()
    .map(|exclude| format!("!{exclude}"))
    .chain([
      format!("!{js_dest}/lib/*.js"),
      format!("!{js_dest}/{}", artifacts::INCLUDE_JS),
      format!("!{js_dest}/{}", artifacts::LOADER_JS),
    ])
    .fold(SourceSet::new(options.paths.js.iter()), SourceSet::with_pattern)
}

/// Parses every project script and reports each syntax error.
pub fn lint(fs: &dyn FileSystem, options: &NormalizedPipelineOptions) -> anyhow::Result<()> {
  let files = lint_sources(options).resolve(fs, &options.cwd)?;

  let reports = files
    .par_iter()
    .map(|file| {
      let diagnostics = match fs.read_to_string(file) {
        Ok(source) => EcmaCompiler::check(&source, EcmaCompiler::script_source_type()),
        Err(err) => vec![err.to_string()],
      };
      (file, diagnostics)
    })
    .collect::<Vec<_>>();

  let mut problems = 0;
  let mut failed_files = 0;
  for (file, diagnostics) in reports {
    if diagnostics.is_empty() {
      continue;
    }
    failed_files += 1;
    problems += diagnostics.len();
    let name = file.relative_slash(&options.cwd);
    for diagnostic in diagnostics {
      tracing::error!("{name}: {diagnostic}");
    }
  }

  if problems > 0 {
    anyhow::bail!("{problems} problems in {failed_files} of {} files", files.len());
  }
  tracing::info!("{} files are clean", files.len());
  Ok(())
}

/// Everything earlier runs generated.
pub fn clean_targets(
  fs: &dyn FileSystem,
  options: &NormalizedPipelineOptions,
) -> anyhow::Result<Vec<PathBuf>> {
  let css_dest = options.css_dest_dir();
  let js_dest = options.js_dest_dir();
  let media = options.media_dir();

  let mut targets =
    options.css_bundles.bundles.keys().map(|name| css_dest.join(name)).collect::<Vec<_>>();
  targets.extend([
    css_dest.join(artifacts::INCLUDE_CSS),
    css_dest.join(artifacts::MAPS_DIR),
    js_dest.join(artifacts::INCLUDE_JS),
    js_dest.join(artifacts::source_map_file(artifacts::INCLUDE_JS)),
    js_dest.join(artifacts::LOADER_JS),
    js_dest.join(artifacts::source_map_file(artifacts::LOADER_JS)),
    js_dest.join(artifacts::MAPS_DIR),
    options.resolve("_tmp"),
    options.resolve("src/locales"),
    media.join("locales"),
    media.join(artifacts::BUILD_ID_TXT),
    media.join(artifacts::IMGURLS_TXT),
    options.templates_output(),
  ]);

  for pattern in [options.paths.styl_compiled.as_str(), "package/archives/*.zip"] {
    targets.extend(fs.glob(&options.resolve(pattern).expect_to_slash())?);
  }
  Ok(targets)
}

pub fn clean(fs: &dyn FileSystem, options: &NormalizedPipelineOptions) -> anyhow::Result<()> {
  let targets = clean_targets(fs, options)?;
  for target in &targets {
    fs.remove(target)?;
  }
  tracing::debug!("Removed up to {} generated paths", targets.len());
  Ok(())
}
