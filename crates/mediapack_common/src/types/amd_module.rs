use std::path::PathBuf;

use crate::{ModuleId, ModuleIdx};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
  /// Calls `define` itself. `anonymous` when the first `define` has no name yet.
  Define { anonymous: bool },
  /// A plain script adapted through the shim config.
  Shim,
  /// Neither defines a module nor is shimmed.
  Plain,
}

#[derive(Debug, Clone)]
pub struct AmdModule {
  pub idx: ModuleIdx,
  pub id: ModuleId,
  pub path: PathBuf,
  pub kind: ModuleKind,
  /// Resolved dependencies in declaration order, filled in once every module is loaded.
  pub deps: Vec<ModuleIdx>,
}
