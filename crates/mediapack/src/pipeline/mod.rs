//! The project's named build tasks.

pub mod actions;
mod context;
mod tasks;

use std::sync::Arc;

use mediapack_common::{NormalizedPipelineOptions, PipelineOptions};

pub use self::context::PipelineContext;
use crate::{
  task_graph::{TaskError, TaskGraph, TaskReport},
  utils::normalize_options::normalize_options,
};

pub const DEFAULT_TASK: &str = "default";

pub struct Pipeline {
  context: Arc<PipelineContext>,
  graph: Arc<TaskGraph>,
}

impl Pipeline {
  pub fn new(options: PipelineOptions) -> anyhow::Result<Self> {
    let options = normalize_options(options)?;
    Ok(Self::with_context(Arc::new(PipelineContext::new(Arc::new(options)))))
  }

  pub fn with_context(context: Arc<PipelineContext>) -> Self {
    let mut graph = TaskGraph::new();
    tasks::register_tasks(&mut graph, &context);
    Self { context, graph: Arc::new(graph) }
  }

  pub fn options(&self) -> &NormalizedPipelineOptions {
    self.context.options()
  }

  pub fn build_id(&self) -> &str {
    &self.context.build_id
  }

  pub fn task_names(&self) -> Vec<&str> {
    self.graph.names().collect()
  }

  pub fn graph(&self) -> &TaskGraph {
    &self.graph
  }

  /// Runs the named tasks, or `default` when none are given.
  pub async fn run(&self, names: &[&str]) -> Result<TaskReport, TaskError> {
    let names = if names.is_empty() { &[DEFAULT_TASK][..] } else { names };
    self.graph.run(names).await
  }
}
