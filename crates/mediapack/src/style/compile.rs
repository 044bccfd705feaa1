use std::path::{Path, PathBuf};

use mediapack_common::{NormalizedPipelineOptions, SourceSet, artifacts};
use mediapack_fs::FileSystem;
use mediapack_utils::{
  glob_base::glob_base,
  rayon::{IntoParallelRefIterator, ParallelIterator},
};

use super::preprocessor::StylePreprocessor;

/// What a stylesheet compile produced. Failed files are reported and left out.
#[derive(Debug, Default)]
pub struct CompileReport {
  pub outputs: Vec<PathBuf>,
  pub failures: Vec<(PathBuf, anyhow::Error)>,
}

impl CompileReport {
  pub fn is_success(&self) -> bool {
    self.failures.is_empty()
  }
}

/// The directory compiled stylesheets keep their relative path to.
pub fn style_base(options: &NormalizedPipelineOptions) -> PathBuf {
  let base = options
    .paths
    .styl
    .iter()
    .find(|pattern| !pattern.starts_with('!'))
    .map_or("", |pattern| glob_base(pattern));
  options.resolve(base)
}

/// `<base>/a/b.styl` compiles to `<CSS_DEST>/a/b.styl.css`.
pub fn compiled_output_path(options: &NormalizedPipelineOptions, file: &Path) -> PathBuf {
  let base = style_base(options);
  let relative = match file.strip_prefix(&base) {
    Ok(relative) => relative.to_path_buf(),
    Err(_) => file.file_name().map(PathBuf::from).unwrap_or_default(),
  };
  options.css_dest_dir().join(relative).with_extension(artifacts::COMPILED_STYLE_EXTENSION)
}

/// Compiles `files` in parallel. A failing file is logged and skipped; the others still compile.
pub fn compile_files(
  fs: &dyn FileSystem,
  options: &NormalizedPipelineOptions,
  preprocessor: &dyn StylePreprocessor,
  files: &[PathBuf],
) -> CompileReport {
  let results = files
    .par_iter()
    .map(|file| {
      let output = compiled_output_path(options, file);
      let result = fs
        .read_to_string(file)
        .map_err(anyhow::Error::from)
        .and_then(|source| preprocessor.compile(file, &source))
        .and_then(|css| Ok(fs.write(&output, css.as_bytes())?));
      (file, output, result)
    })
    .collect::<Vec<_>>();

  let mut report = CompileReport::default();
  for (file, output, result) in results {
    match result {
      Ok(()) => report.outputs.push(output),
      Err(err) => {
        tracing::error!("{}: {err}", file.display());
        report.failures.push((file.clone(), err));
      }
    }
  }
  tracing::debug!(
    "Compiled {} stylesheets with {}, {} failed",
    report.outputs.len(),
    preprocessor.name(),
    report.failures.len()
  );
  report
}

/// Compiles every stylesheet in `paths.styl`.
pub fn compile_all(
  fs: &dyn FileSystem,
  options: &NormalizedPipelineOptions,
  preprocessor: &dyn StylePreprocessor,
) -> anyhow::Result<CompileReport> {
  let files = SourceSet::new(options.paths.styl.iter()).resolve(fs, &options.cwd)?;
  Ok(compile_files(fs, options, preprocessor, &files))
}
