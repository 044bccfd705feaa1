//! Recompiles templates and stylesheets as their sources change.

use std::{
  path::PathBuf,
  sync::{Arc, mpsc::channel},
  time::Duration,
};

use mediapack_common::NormalizedPipelineOptions;
use mediapack_utils::path_ext::PathExt;
use notify::RecursiveMode;
use notify_debouncer_mini::{DebouncedEventKind, new_debouncer};

use crate::{
  pipeline::PipelineContext,
  style::{compile_all, compile_files, create_preprocessor},
  templates::build_templates,
};

const DEBOUNCE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rebuild {
  Templates,
  AllStylesheets,
  Stylesheet(PathBuf),
}

fn matches_set(patterns: &[String], relative: &str) -> bool {
  let mut included = false;
  for pattern in patterns {
    match pattern.strip_prefix('!') {
      Some(exclude) if fast_glob::glob_match(exclude, relative) => return false,
      Some(_) => {}
      None => included |= fast_glob::glob_match(pattern, relative),
    }
  }
  included
}

/// What to rebuild for one batch of changed files.
///
/// A changed library stylesheet recompiles every stylesheet, which covers any single stylesheet
/// in the same batch.
pub fn plan_rebuild(options: &NormalizedPipelineOptions, changed: &[PathBuf]) -> Vec<Rebuild> {
  let paths = &options.paths;
  let mut templates = false;
  let mut all_stylesheets = false;
  let mut stylesheets: Vec<PathBuf> = vec![];

  for path in changed {
    let relative = path.relative_slash(&options.cwd);
    if matches_set(&paths.html, &relative) {
      templates = true;
    } else if fast_glob::glob_match(&paths.styl_lib, &relative) {
      all_stylesheets = true;
    } else if matches_set(&paths.styl, &relative) && !stylesheets.contains(path) {
      stylesheets.push(path.clone());
    }
  }

  let mut plan = vec![];
  if templates {
    plan.push(Rebuild::Templates);
  }
  if all_stylesheets {
    plan.push(Rebuild::AllStylesheets);
  } else {
    plan.extend(stylesheets.into_iter().map(Rebuild::Stylesheet));
  }
  plan
}

fn apply(context: &PipelineContext, rebuild: &Rebuild) -> anyhow::Result<()> {
  let options = context.options();
  let preprocessor = create_preprocessor(options.style_compiler.as_ref());
  match rebuild {
    Rebuild::Templates => {
      build_templates(&context.fs, options)?;
    }
    Rebuild::AllStylesheets => {
      compile_all(&context.fs, options, preprocessor.as_ref())?;
    }
    Rebuild::Stylesheet(path) => {
      compile_files(&context.fs, options, preprocessor.as_ref(), std::slice::from_ref(path));
    }
  }
  Ok(())
}

fn watch_blocking(context: &PipelineContext) -> anyhow::Result<()> {
  let options = context.options();
  let root = options.resolve(&options.paths.serve_root);

  let (tx, rx) = channel();
  let mut debouncer = new_debouncer(DEBOUNCE, tx)?;
  debouncer.watcher().watch(&root, RecursiveMode::Recursive)?;
  tracing::info!("Watching {} for changes", root.display());

  // One batch at a time, so rebuilds never overlap.
  for result in rx {
    match result {
      Ok(events) => {
        let changed = events
          .into_iter()
          .filter(|event| matches!(event.kind, DebouncedEventKind::Any))
          .map(|event| event.path)
          .collect::<Vec<_>>();
        for rebuild in plan_rebuild(options, &changed) {
          tracing::info!("Rebuilding {rebuild:?}");
          if let Err(err) = apply(context, &rebuild) {
            tracing::error!("{err:#}");
          }
        }
      }
      Err(err) => tracing::warn!("Watch error: {err:?}"),
    }
  }
  Ok(())
}

/// Watches the served directory until the watcher goes away.
pub async fn watch(context: Arc<PipelineContext>) -> anyhow::Result<()> {
  tokio::task::spawn_blocking(move || watch_blocking(&context)).await?
}
