use arcstr::ArcStr;
use mediapack_ecmascript::CallExpressionExt;
use mediapack_utils::indexmap::FxIndexSet;
use oxc::{
  ast::ast::{CallExpression, Program},
  ast_visit::{Visit, walk},
};

#[derive(Debug, Default)]
pub struct AmdScanResult {
  /// Every string id passed to `define`/`require`, nested calls included, first occurrence kept.
  pub deps: FxIndexSet<ArcStr>,
  pub define_count: u32,
  /// Whether the first `define` call lacks a module name.
  pub first_define_is_anonymous: bool,
}

pub struct AmdScanner {
  result: AmdScanResult,
}

impl AmdScanner {
  pub fn scan(program: &Program) -> AmdScanResult {
    let mut scanner = Self { result: AmdScanResult::default() };
    scanner.visit_program(program);
    scanner.result
  }
}

impl<'ast> Visit<'ast> for AmdScanner {
  fn visit_call_expression(&mut self, it: &CallExpression<'ast>) {
    if it.is_define() {
      if self.result.define_count == 0 {
        self.result.first_define_is_anonymous = it.define_name().is_none();
      }
      self.result.define_count += 1;
    }
    if it.is_define() || it.is_require() {
      self.result.deps.extend(it.amd_dependency_ids().into_iter().map(ArcStr::from));
    }
    walk::walk_call_expression(self, it);
  }
}
