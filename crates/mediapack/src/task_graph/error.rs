use std::sync::Arc;

use arcstr::ArcStr;
use itertools::Itertools;

#[derive(Debug, Clone, thiserror::Error)]
pub enum TaskError {
  #[error("Task '{0}' is not in the task graph")]
  UnknownTask(ArcStr),
  #[error("Tasks depend on each other: {}", .0.iter().join(" -> "))]
  Cycle(Vec<ArcStr>),
  #[error("'{task}' errored: {error:#}")]
  Failed { task: ArcStr, error: Arc<anyhow::Error> },
}

impl TaskError {
  pub fn failed(task: ArcStr, error: anyhow::Error) -> Self {
    Self::Failed { task, error: Arc::new(error) }
  }
}
