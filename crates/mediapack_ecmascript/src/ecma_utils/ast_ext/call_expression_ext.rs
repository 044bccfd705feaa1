use oxc::ast::ast;

use super::expression_ext::ExpressionExt;

/// Recognizes the `define(...)` and `require(...)` forms of AMD.
pub trait CallExpressionExt<'ast> {
  fn callee_name(&self) -> Option<&str>;

  fn is_define(&self) -> bool {
    self.callee_name() == Some("define")
  }

  fn is_require(&self) -> bool {
    matches!(self.callee_name(), Some("require" | "requirejs"))
  }

  /// `define("name", ...)`
  fn define_name(&self) -> Option<&str>;

  /// String ids listed by `define([..], f)`, `define("name", [..], f)`, `require([..], f)` and
  /// `require("id")`, in declaration order.
  fn amd_dependency_ids(&self) -> Vec<&str>;
}

impl<'ast> CallExpressionExt<'ast> for ast::CallExpression<'ast> {
  fn callee_name(&self) -> Option<&str> {
    self.callee.as_identifier().map(|ident| ident.name.as_str())
  }

  fn define_name(&self) -> Option<&str> {
    if !self.is_define() {
      return None;
    }
    self
      .arguments
      .first()
      .and_then(ast::Argument::as_expression)
      .and_then(ExpressionExt::as_string_literal)
      .map(|lit| lit.value.as_str())
  }

  fn amd_dependency_ids(&self) -> Vec<&str> {
    let mut args = self.arguments.iter().filter_map(ast::Argument::as_expression);
    let deps = if self.is_define() {
      let first = args.next();
      match first {
        Some(ast::Expression::StringLiteral(_)) => args.next(),
        other => other,
      }
    } else if self.is_require() {
      match args.next() {
        Some(ast::Expression::StringLiteral(lit)) if self.arguments.len() == 1 => {
          return vec![lit.value.as_str()];
        }
        other => other,
      }
    } else {
      None
    };

    deps
      .and_then(ExpressionExt::as_array_expression)
      .map(|array| {
        array
          .elements
          .iter()
          .filter_map(ast::ArrayExpressionElement::as_expression)
          .filter_map(ExpressionExt::as_string_literal)
          .map(|lit| lit.value.as_str())
          .collect()
      })
      .unwrap_or_default()
  }
}

#[cfg(test)]
mod tests {
  use oxc::{
    ast::ast::CallExpression,
    ast_visit::{Visit, walk},
  };

  use super::CallExpressionExt;
  use crate::EcmaCompiler;

  #[derive(Default)]
  struct Collect(Vec<(Option<String>, Vec<String>)>);

  impl<'ast> Visit<'ast> for Collect {
    fn visit_call_expression(&mut self, it: &CallExpression<'ast>) {
      if it.is_define() || it.is_require() {
        self.0.push((
          it.define_name().map(ToString::to_string),
          it.amd_dependency_ids().into_iter().map(ToString::to_string).collect(),
        ));
      }
      walk::walk_call_expression(self, it);
    }
  }

  fn collect(source: &str) -> Vec<(Option<String>, Vec<String>)> {
    let ast = EcmaCompiler::parse(source, EcmaCompiler::script_source_type()).unwrap();
    let mut collector = Collect::default();
    collector.visit_program(ast.program());
    collector.0
  }

  #[test]
  fn reads_every_amd_form() {
    let found = collect(
      r#"
        define(["a", "b"], function (a, b) {});
        define("named", ["c"], function (c) {});
        require(["d"], function (d) { var e = require("e"); });
      "#,
    );
    let names = found.iter().map(|(name, _)| name.as_deref()).collect::<Vec<_>>();
    assert_eq!(names, vec![None, Some("named"), None, None]);
    let deps = found.into_iter().map(|(_, deps)| deps).collect::<Vec<_>>();
    assert_eq!(deps, vec![vec!["a", "b"], vec!["c"], vec!["d"], vec!["e"]]);
  }

  #[test]
  fn ignores_non_literal_dependencies() {
    let found = collect("var x = 'a'; define([x, 'b'], function () {}); foo(['c']);");
    assert_eq!(found, vec![(None, vec!["b".to_string()])]);
  }
}
