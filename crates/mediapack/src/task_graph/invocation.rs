use std::{
  sync::{Arc, Mutex, PoisonError},
  time::Instant,
};

use arcstr::ArcStr;
use futures::{
  FutureExt,
  future::{BoxFuture, Shared, join_all},
};
use rustc_hash::FxHashMap;

use super::{TaskError, TaskGraph, TaskKind};

type TaskFuture = Shared<BoxFuture<'static, Result<(), TaskError>>>;

/// One `run` of the graph. Every task is started at most once and awaited by all of its dependents.
pub(super) struct Invocation {
  graph: Arc<TaskGraph>,
  started: Mutex<FxHashMap<ArcStr, TaskFuture>>,
  pub(super) completed: Mutex<Vec<ArcStr>>,
}

impl Invocation {
  pub(super) fn new(graph: Arc<TaskGraph>) -> Self {
    Self { graph, started: Mutex::default(), completed: Mutex::default() }
  }

  pub(super) fn run_task(self: &Arc<Self>, name: ArcStr) -> TaskFuture {
    let mut started = self.started.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(future) = started.get(&name) {
      return future.clone();
    }

    let future = Arc::clone(self).execute(name.clone()).boxed().shared();
    started.insert(name, future.clone());
    future
  }

  async fn execute(self: Arc<Self>, name: ArcStr) -> Result<(), TaskError> {
    let task =
      self.graph.tasks.get(&name).ok_or_else(|| TaskError::UnknownTask(name.clone()))?;

    // Siblings of a failed predecessor still run to the end; only then is the failure reported.
    let deps = join_all(task.deps.iter().map(|dep| self.run_task(dep.clone()))).await;
    if let Some(err) = deps.into_iter().find_map(Result::err) {
      return Err(err);
    }

    tracing::info!("Starting '{name}'...");
    let start = Instant::now();
    match &task.kind {
      TaskKind::Composite => {}
      TaskKind::Action(action) => {
        if let Err(err) = action().await {
          tracing::error!("'{name}' errored after {} ms: {err:#}", start.elapsed().as_millis());
          return Err(TaskError::failed(name, err));
        }
      }
      TaskKind::Sequence(steps) => {
        for step in steps {
          self.run_task(step.clone()).await?;
        }
      }
    }
    tracing::info!("Finished '{name}' after {} ms", start.elapsed().as_millis());

    self.completed.lock().unwrap_or_else(PoisonError::into_inner).push(name);
    Ok(())
  }
}
