//! Named tasks with predecessor lists, run in dependency order.

mod error;
mod invocation;

use std::{future::Future, sync::Arc};

use arcstr::ArcStr;
use futures::{FutureExt, future::BoxFuture};
use mediapack_utils::indexmap::FxIndexMap;
use rustc_hash::FxHashMap;

pub use self::error::TaskError;
use self::invocation::Invocation;

pub type TaskAction = Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

enum TaskKind {
  Action(TaskAction),
  Composite,
  /// Steps run one after another, each with its own predecessors.
  Sequence(Vec<ArcStr>),
}

struct TaskDef {
  deps: Vec<ArcStr>,
  kind: TaskKind,
}

impl TaskDef {
  /// Tasks that have to be known before this one can run.
  fn edges(&self) -> impl Iterator<Item = &ArcStr> {
    let steps = match &self.kind {
      TaskKind::Sequence(steps) => steps.as_slice(),
      TaskKind::Action(_) | TaskKind::Composite => &[],
    };
    self.deps.iter().chain(steps)
  }
}

#[derive(Debug, Default)]
pub struct TaskReport {
  /// Tasks in the order they finished.
  pub executed: Vec<ArcStr>,
}

#[derive(Default)]
pub struct TaskGraph {
  tasks: FxIndexMap<ArcStr, TaskDef>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
  InProgress,
  Done,
}

impl TaskGraph {
  pub fn new() -> Self {
    Self::default()
  }

  fn insert(&mut self, name: &str, deps: &[&str], kind: TaskKind) -> &mut Self {
    let deps = deps.iter().copied().map(ArcStr::from).collect();
    self.tasks.insert(ArcStr::from(name), TaskDef { deps, kind });
    self
  }

  /// Runs `action` once all of `deps` finished.
  pub fn task<F, Fut>(&mut self, name: &str, deps: &[&str], action: F) -> &mut Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
  {
    let action: TaskAction = Arc::new(move || action().boxed());
    self.insert(name, deps, TaskKind::Action(action))
  }

  pub fn composite(&mut self, name: &str, deps: &[&str]) -> &mut Self {
    self.insert(name, deps, TaskKind::Composite)
  }

  pub fn sequence(&mut self, name: &str, steps: &[&str]) -> &mut Self {
    let steps = steps.iter().copied().map(ArcStr::from).collect();
    self.insert(name, &[], TaskKind::Sequence(steps))
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.tasks.keys().map(ArcStr::as_str)
  }

  pub fn deps(&self, name: &str) -> Option<&[ArcStr]> {
    self.tasks.get(name).map(|task| task.deps.as_slice())
  }

  /// Checks everything reachable from `roots` for unknown names and cycles.
  pub fn validate(&self, roots: &[&str]) -> Result<(), TaskError> {
    let mut visits = FxHashMap::default();
    let mut path = vec![];
    for root in roots {
      self.visit(&ArcStr::from(*root), &mut visits, &mut path)?;
    }
    Ok(())
  }

  fn visit(
    &self,
    name: &ArcStr,
    visits: &mut FxHashMap<ArcStr, Visit>,
    path: &mut Vec<ArcStr>,
  ) -> Result<(), TaskError> {
    match visits.get(name) {
      Some(Visit::Done) => return Ok(()),
      Some(Visit::InProgress) => {
        let start = path.iter().position(|task| task == name).unwrap_or_default();
        let mut cycle = path[start..].to_vec();
        cycle.push(name.clone());
        return Err(TaskError::Cycle(cycle));
      }
      None => {}
    }

    let task = self.tasks.get(name).ok_or_else(|| TaskError::UnknownTask(name.clone()))?;
    visits.insert(name.clone(), Visit::InProgress);
    path.push(name.clone());
    for next in task.edges() {
      self.visit(next, visits, path)?;
    }
    path.pop();
    visits.insert(name.clone(), Visit::Done);
    Ok(())
  }

  /// Runs `names` and everything they depend on, each task at most once.
  pub async fn run(self: &Arc<Self>, names: &[&str]) -> Result<TaskReport, TaskError> {
    self.validate(names)?;

    let invocation = Arc::new(Invocation::new(Arc::clone(self)));
    for name in names {
      invocation.run_task(ArcStr::from(*name)).await?;
    }

    let executed = std::mem::take(
      &mut *invocation.completed.lock().unwrap_or_else(std::sync::PoisonError::into_inner),
    );
    Ok(TaskReport { executed })
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use super::{TaskError, TaskGraph};

  type Log = Arc<Mutex<Vec<&'static str>>>;

  fn record(graph: &mut TaskGraph, log: &Log, name: &'static str, deps: &[&str]) {
    let log = Arc::clone(log);
    graph.task(name, deps, move || {
      let log = Arc::clone(&log);
      async move {
        tokio::task::yield_now().await;
        log.lock().unwrap().push(name);
        Ok(())
      }
    });
  }

  #[tokio::test]
  async fn diamond_runs_shared_predecessor_once() {
    let log = Log::default();
    let mut graph = TaskGraph::new();
    record(&mut graph, &log, "a", &[]);
    record(&mut graph, &log, "b", &["a"]);
    record(&mut graph, &log, "c", &["a"]);
    record(&mut graph, &log, "d", &["b", "c"]);

    let report = Arc::new(graph).run(&["d"]).await.unwrap();
    let log = log.lock().unwrap().clone();
    assert_eq!(log.len(), 4);
    assert_eq!(log[0], "a");
    assert_eq!(log[3], "d");
    assert_eq!(report.executed.len(), 4);
  }

  #[tokio::test]
  async fn failing_predecessor_stops_dependents() {
    let log = Log::default();
    let mut graph = TaskGraph::new();
    graph.task("broken", &[], || async { Err::<(), _>(anyhow::anyhow!("boom")) });
    record(&mut graph, &log, "after", &["broken"]);

    let err = Arc::new(graph).run(&["after"]).await.unwrap_err();
    assert!(matches!(&err, TaskError::Failed { task, .. } if task == "broken"));
    assert!(err.to_string().contains("boom"));
    assert!(log.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn failure_lets_running_siblings_finish() {
    let log = Log::default();
    let mut graph = TaskGraph::new();
    graph.task("broken", &[], || async { Err::<(), _>(anyhow::anyhow!("boom")) });
    let slow_log = Arc::clone(&log);
    graph.task("slow", &[], move || {
      let log = Arc::clone(&slow_log);
      async move {
        for _ in 0..16 {
          tokio::task::yield_now().await;
        }
        log.lock().unwrap().push("slow");
        Ok(())
      }
    });
    record(&mut graph, &log, "after", &["broken", "slow"]);

    let err = Arc::new(graph).run(&["after"]).await.unwrap_err();
    assert!(matches!(&err, TaskError::Failed { task, .. } if task == "broken"));
    assert_eq!(*log.lock().unwrap(), ["slow"]);
  }

  #[tokio::test]
  async fn sequence_runs_steps_in_order() {
    let log = Log::default();
    let mut graph = TaskGraph::new();
    record(&mut graph, &log, "first", &[]);
    record(&mut graph, &log, "second", &[]);
    record(&mut graph, &log, "third", &[]);
    graph.sequence("all", &["third", "first", "second"]);

    Arc::new(graph).run(&["all"]).await.unwrap();
    assert_eq!(*log.lock().unwrap(), ["third", "first", "second"]);
  }

  #[tokio::test]
  async fn reports_unknown_tasks_and_cycles_before_running() {
    let log = Log::default();
    let mut graph = TaskGraph::new();
    record(&mut graph, &log, "x", &["y"]);
    record(&mut graph, &log, "y", &["x"]);
    record(&mut graph, &log, "z", &["missing"]);
    let graph = Arc::new(graph);

    let err = graph.run(&["x"]).await.unwrap_err();
    let TaskError::Cycle(cycle) = &err else { panic!("expected a cycle, got {err}") };
    assert_eq!(cycle, &["x", "y", "x"]);

    let err = graph.run(&["z"]).await.unwrap_err();
    assert!(matches!(&err, TaskError::UnknownTask(name) if name == "missing"));
    assert!(matches!(graph.run(&["nope"]).await, Err(TaskError::UnknownTask(_))));
    assert!(log.lock().unwrap().is_empty());
  }
}
