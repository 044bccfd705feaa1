use std::iter;

use itertools::Itertools;
use mediapack_common::ModuleIdx;
use mediapack_utils::indexmap::FxIndexSet;
use rustc_hash::{FxHashMap, FxHashSet};

use super::LinkStage;

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
enum Status {
  ToBeExecuted(ModuleIdx),
  WaitForExit(ModuleIdx),
}

impl LinkStage {
  /// Depth-first from the entry, dependencies in declaration order. A module is emitted when all
  /// of its dependencies are, so the first dependency discovered is the first one emitted.
  pub(crate) fn sort_modules(&mut self) {
    let mut execution_stack = vec![Status::ToBeExecuted(self.entry)];

    let mut executed_ids = FxHashSet::with_capacity_and_hasher(self.modules.len(), Default::default());
    let mut stack_indexes_of_executing_id = FxHashMap::default();

    let mut circular_dependencies = FxIndexSet::default();
    let mut sorted_modules = Vec::with_capacity(self.modules.len());

    while let Some(status) = execution_stack.pop() {
      match status {
        Status::ToBeExecuted(id) => {
          if executed_ids.contains(&id) {
            // Still on the execution chain means we walked back into it
            if let Some(index) = stack_indexes_of_executing_id.get(&id).copied() {
              let cycles = execution_stack[index..]
                .iter()
                .filter_map(|action| match action {
                  // Only modules with `Status::WaitForExit` are on the execution chain
                  Status::ToBeExecuted(_) => None,
                  Status::WaitForExit(id) => Some(*id),
                })
                .chain(iter::once(id))
                .collect::<Box<[_]>>();
              circular_dependencies.insert(cycles);
            }
          } else {
            executed_ids.insert(id);
            execution_stack.push(Status::WaitForExit(id));
            stack_indexes_of_executing_id.insert(id, execution_stack.len() - 1);

            execution_stack
              .extend(self.modules[id].deps.iter().copied().rev().map(Status::ToBeExecuted));
          }
        }
        Status::WaitForExit(id) => {
          sorted_modules.push(id);
          stack_indexes_of_executing_id.remove(&id);
        }
      }
    }

    for cycle in circular_dependencies {
      let paths = cycle.iter().map(|id| self.modules[*id].id.to_string()).join(" -> ");
      self.errors.push(anyhow::anyhow!("Circular dependency: {paths}"));
    }

    self.sorted_modules = sorted_modules;
  }
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use mediapack_common::{AmdModule, ModuleId, ModuleIdx, ModuleKind};

  use crate::{link_stage::LinkStage, types::IndexModules};

  fn stage(graph: &[(&str, &[usize])]) -> LinkStage {
    let modules = graph
      .iter()
      .enumerate()
      .map(|(idx, (id, deps))| AmdModule {
        idx: ModuleIdx::from_usize(idx),
        id: ModuleId::from(*id),
        path: PathBuf::from(format!("{id}.js")),
        kind: ModuleKind::Define { anonymous: true },
        deps: deps.iter().copied().map(ModuleIdx::from_usize).collect(),
      })
      .collect::<IndexModules>();
    LinkStage {
      sorted_modules: vec![],
      index_ecma_ast: Default::default(),
      entry: ModuleIdx::from_usize(0),
      modules,
      warnings: vec![],
      errors: vec![],
    }
  }

  fn order(stage: &LinkStage) -> Vec<String> {
    stage.sorted_modules.iter().map(|idx| stage.modules[*idx].id.to_string()).collect()
  }

  #[test]
  fn dependencies_come_first_in_discovery_order() {
    let mut stage =
      stage(&[("main", &[1, 2]), ("views", &[3]), ("models", &[3]), ("util", &[])]);
    stage.sort_modules();
    assert!(stage.errors.is_empty());
    assert_eq!(order(&stage), vec!["util", "views", "models", "main"]);
  }

  #[test]
  fn cycles_fail_with_their_path() {
    let mut stage = stage(&[("main", &[1]), ("a", &[2]), ("b", &[1])]);
    stage.sort_modules();
    assert_eq!(stage.errors.len(), 1);
    assert_eq!(stage.errors[0].to_string(), "Circular dependency: a -> b -> a");
  }
}
