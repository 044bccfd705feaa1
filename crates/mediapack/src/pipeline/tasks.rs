use std::{future::Future, sync::Arc};

use futures::{FutureExt, future::BoxFuture};

use super::{PipelineContext, actions};
use crate::{
  dev_server, imgurls, js_sourcemaps,
  module_bundler::ModuleBundler,
  style::{self, create_preprocessor},
  task_graph::TaskGraph,
  templates, watch,
};

type Action = Box<dyn Fn() -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Runs `action` on the blocking pool.
fn blocking<F>(context: &Arc<PipelineContext>, action: F) -> Action
where
  F: Fn(&PipelineContext) -> anyhow::Result<()> + Send + Sync + 'static,
{
  let context = Arc::clone(context);
  let action = Arc::new(action);
  Box::new(move || {
    let context = Arc::clone(&context);
    let action = Arc::clone(&action);
    async move { tokio::task::spawn_blocking(move || action(&context)).await? }.boxed()
  })
}

/// Runs an async `action` with its own handle on the context.
fn nonblocking<F, Fut>(context: &Arc<PipelineContext>, action: F) -> Action
where
  F: Fn(Arc<PipelineContext>) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
  let context = Arc::clone(context);
  Box::new(move || action(Arc::clone(&context)).boxed())
}

fn templates_build(context: &PipelineContext) -> anyhow::Result<()> {
  templates::build_templates(&context.fs, context.options())?;
  Ok(())
}

/// Per-file failures are already logged; the task itself succeeds.
fn css_compile(context: &PipelineContext) -> anyhow::Result<()> {
  let options = context.options();
  let preprocessor = create_preprocessor(options.style_compiler.as_ref());
  let report = style::compile_all(&context.fs, options, preprocessor.as_ref())?;
  if !report.is_success() {
    tracing::warn!("{} stylesheets failed to compile", report.failures.len());
  }
  Ok(())
}

fn css_build(context: &PipelineContext) -> anyhow::Result<()> {
  let report = style::build_aggregate(&context.fs, context.options(), &context.build_id)?;
  tracing::debug!("include.css holds {}", report.included.join(", "));
  Ok(())
}

pub fn register_tasks(graph: &mut TaskGraph, context: &Arc<PipelineContext>) {
  graph
    .task(
      "install",
      &[],
      nonblocking(context, |context| async move { actions::install(context.options()).await }),
    )
    .task(
      "bower_copy",
      &["install"],
      blocking(context, |context| {
        let copied = actions::bower_copy(&context.fs, context.options())?;
        tracing::debug!("Copied {copied} files from bower");
        Ok(())
      }),
    )
    .task(
      "require_config",
      &["install"],
      blocking(context, |context| actions::require_config(&context.fs, context.options())),
    )
    .task("templates_build", &[], blocking(context, templates_build))
    .task("templates_build_sync", &[], blocking(context, templates_build))
    .task("css_compile", &[], blocking(context, css_compile))
    .task("css_compile_sync", &[], blocking(context, css_compile))
    .task(
      "css_bundles",
      &["css_compile_sync"],
      blocking(context, |context| {
        style::build_bundles(&context.fs, context.options())?;
        Ok(())
      }),
    )
    .task("css_build_sync", &["css_bundles", "css_compile_sync"], blocking(context, css_build))
    .task(
      "imgurls_write",
      &["css_build_sync"],
      blocking(context, |context| {
        let count = imgurls::write_image_urls(&context.fs, context.options())?;
        tracing::debug!("Listed {count} image urls");
        Ok(())
      }),
    )
    .task(
      "buildID_write",
      &[],
      blocking(context, |context| {
        actions::write_build_id(&context.fs, context.options(), &context.build_id)
      }),
    )
    .task(
      "js_bundle_sync",
      &["templates_build_sync"],
      nonblocking(context, |context| async move {
        ModuleBundler::new(Arc::clone(&context.options)).bundle().await?;
        Ok(())
      }),
    )
    .task(
      "js_sourcemaps_concat",
      &[],
      blocking(context, |context| js_sourcemaps::merge_source_maps(&context.fs, context.options())),
    )
    .task(
      "js_sourcemaps_patch_sources",
      &[],
      blocking(context, |context| js_sourcemaps::patch_map_sources(&context.fs, context.options())),
    )
    .task(
      "js_sourcemaps_patch_url",
      &[],
      blocking(context, |context| js_sourcemaps::patch_bundle_url(&context.fs, context.options())),
    )
    .sequence(
      "js_sourcemaps",
      &["js_sourcemaps_concat", "js_sourcemaps_patch_sources", "js_sourcemaps_patch_url"],
    )
    .sequence("js_build", &["js_bundle_sync", "js_sourcemaps"])
    .task(
      "webserver",
      &["templates_build"],
      nonblocking(context, |context| async move { dev_server::serve(context.options()).await }),
    )
    .task("lint", &[], blocking(context, |context| actions::lint(&context.fs, context.options())))
    .task(
      "clean",
      &[],
      blocking(context, |context| actions::clean(&context.fs, context.options())),
    )
    .task("watch", &[], nonblocking(context, watch::watch))
    .composite("serve", &["webserver", "css_compile", "templates_build"])
    .composite("default", &["watch", "serve"])
    .composite("update", &["bower_copy", "require_config"])
    .composite(
      "build",
      &["buildID_write", "css_build_sync", "js_build", "templates_build_sync", "imgurls_write"],
    );
}
