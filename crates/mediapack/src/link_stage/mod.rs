mod sort_modules;

use mediapack_common::ModuleIdx;
use mediapack_error::BuildResult;

use crate::{
  scan_stage::ScanStageOutput,
  types::{IndexEcmaAst, IndexModules},
};

#[derive(Debug)]
pub struct LinkStageOutput {
  pub modules: IndexModules,
  pub index_ecma_ast: IndexEcmaAst,
  /// Bundle order: every module after all of its dependencies.
  pub sorted_modules: Vec<ModuleIdx>,
  pub warnings: Vec<anyhow::Error>,
}

#[derive(Debug)]
pub struct LinkStage {
  pub modules: IndexModules,
  pub index_ecma_ast: IndexEcmaAst,
  pub entry: ModuleIdx,
  pub sorted_modules: Vec<ModuleIdx>,
  pub warnings: Vec<anyhow::Error>,
  pub errors: Vec<anyhow::Error>,
}

impl LinkStage {
  pub fn new(scan_stage_output: ScanStageOutput) -> Self {
    let ScanStageOutput { modules, index_ecma_ast, entry, warnings } = scan_stage_output;
    Self {
      sorted_modules: Vec::with_capacity(modules.len()),
      modules,
      index_ecma_ast,
      entry,
      warnings,
      errors: vec![],
    }
  }

  pub fn link(mut self) -> BuildResult<LinkStageOutput> {
    self.sort_modules();

    if !self.errors.is_empty() {
      return Err(self.errors.into());
    }

    Ok(LinkStageOutput {
      modules: self.modules,
      index_ecma_ast: self.index_ecma_ast,
      sorted_modules: self.sorted_modules,
      warnings: self.warnings,
    })
  }
}
