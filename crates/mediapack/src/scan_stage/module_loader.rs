use std::{path::PathBuf, sync::Arc};

use mediapack_common::{ModuleIdx, ModuleLoaderMsg, ModuleTaskResult};
use mediapack_error::BuildResult;
use mediapack_fs::OsFileSystem;
use mediapack_resolver::ResolveReturn;
use oxc_index::IndexVec;
use rustc_hash::FxHashMap;
use tokio::{sync::mpsc::Receiver, task::JoinSet};

use super::{module_task::ModuleTask, task_context::TaskContext};
use crate::types::{IndexEcmaAst, IndexModules, SharedOptions, SharedResolver};

pub struct ModuleLoader {
  rx: Receiver<ModuleLoaderMsg>,
  remaining: u32,
  shared_context: Arc<TaskContext>,
  /// Watched so a task that panics before reporting back fails the scan instead of stalling it.
  tasks: JoinSet<()>,
  /// Filled in as tasks report back; a slot stays `None` only for modules that failed.
  modules: IndexVec<ModuleIdx, Option<ModuleTaskResult>>,
  visited: FxHashMap<PathBuf, ModuleIdx>,
}

pub struct ModuleLoaderOutput {
  pub modules: IndexModules,
  pub index_ecma_ast: IndexEcmaAst,
  pub entry: ModuleIdx,
  pub warnings: Vec<anyhow::Error>,
}

impl ModuleLoader {
  pub fn new(fs: OsFileSystem, options: SharedOptions, resolver: SharedResolver) -> Self {
    // 1024 should be enough for most cases
    // over 1024 pending tasks are insane
    let (tx, rx) = tokio::sync::mpsc::channel(1024);

    let shared_context = Arc::new(TaskContext { fs, resolver, options, tx });

    Self {
      rx,
      remaining: 0,
      shared_context,
      tasks: JoinSet::new(),
      modules: IndexVec::new(),
      visited: FxHashMap::default(),
    }
  }

  /// Modules are keyed by file, so two ids that land on one file share a module.
  fn try_spawn_new_task(&mut self, resolved: ResolveReturn) -> ModuleIdx {
    if let Some(idx) = self.visited.get(&resolved.path) {
      return *idx;
    }

    let idx = self.modules.push(None);
    self.visited.insert(resolved.path.clone(), idx);
    self.remaining += 1;

    let task = ModuleTask::new(Arc::clone(&self.shared_context), idx, resolved);
    self.tasks.spawn(task.run());

    idx
  }

  /// Receives results until every spawned task is accounted for.
  async fn collect(&mut self) -> (Vec<anyhow::Error>, Vec<anyhow::Error>) {
    let mut errors = vec![];
    let mut warnings = vec![];

    while self.remaining > 0 {
      let msg = tokio::select! {
        msg = self.rx.recv() => msg,
        Some(joined) = self.tasks.join_next() => {
          // A task that returned normally has already sent its message.
          if let Err(err) = joined {
            errors.push(anyhow::anyhow!("A module task panicked: {err}"));
            self.remaining -= 1;
          }
          continue;
        }
      };
      let Some(msg) = msg else {
        break;
      };
      match msg {
        ModuleLoaderMsg::ModuleDone(task_result) => {
          let mut task_result = *task_result;
          warnings.append(&mut task_result.warnings);

          let resolved_deps = std::mem::take(&mut task_result.resolved_deps);
          for (id, path) in resolved_deps {
            let dep = self.try_spawn_new_task(ResolveReturn { id, path });
            if !task_result.module.deps.contains(&dep) {
              task_result.module.deps.push(dep);
            }
          }

          let idx = task_result.module.idx;
          self.modules[idx] = Some(task_result);
        }
        ModuleLoaderMsg::BuildErrors(errs) => {
          errors.extend(errs);
        }
      }
      self.remaining -= 1;
    }

    (errors, warnings)
  }

  pub async fn fetch_all_modules(mut self, entry: ResolveReturn) -> BuildResult<ModuleLoaderOutput> {
    let entry = self.try_spawn_new_task(entry);

    let (errors, warnings) = self.collect().await;

    if !errors.is_empty() {
      return Err(errors.into());
    }

    let mut modules = IndexModules::with_capacity(self.modules.len());
    let mut index_ecma_ast = IndexEcmaAst::with_capacity(self.modules.len());
    for task_result in self.modules.into_iter().flatten() {
      let ModuleTaskResult { module, ast, .. } = task_result;
      index_ecma_ast.push((ast, module.idx));
      modules.push(module);
    }

    Ok(ModuleLoaderOutput { modules, index_ecma_ast, entry, warnings })
  }
}

#[cfg(test)]
mod tests {
  use std::{sync::Arc, time::Duration};

  use mediapack_common::PipelineOptions;
  use mediapack_fs::OsFileSystem;
  use mediapack_resolver::Resolver;

  use super::ModuleLoader;
  use crate::{
    types::{SharedOptions, SharedResolver},
    utils::normalize_options::normalize_options,
  };

  #[tokio::test]
  async fn panicking_task_fails_the_scan() {
    let dir = tempfile::tempdir().unwrap();
    let options: SharedOptions = Arc::new(
      normalize_options(PipelineOptions {
        cwd: Some(dir.path().to_path_buf()),
        ..PipelineOptions::default()
      })
      .unwrap(),
    );
    let resolver: SharedResolver = Arc::new(Resolver::new(
      options.base_url_dir(),
      options.require_config.paths.clone(),
      options.templates_output(),
      OsFileSystem,
    ));

    let mut loader = ModuleLoader::new(OsFileSystem, options, resolver);
    loader.tasks.spawn(async { panic!("scanner bug") });
    loader.remaining += 1;

    let (errors, _) = tokio::time::timeout(Duration::from_secs(5), loader.collect())
      .await
      .expect("the loader stops once the task is gone");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().contains("panicked"));
  }
}
