use mediapack_error::BuildResult;
use mediapack_utils::ecmascript::to_js_string_literal;
use oxc::{
  allocator::Allocator,
  ast::{AstBuilder, ast},
  ast_visit::VisitMut,
  parser::Parser,
  span::SPAN,
};

use crate::{EcmaCompiler, SpanEraser};

// `AstBuilder` is more suitable name, but it's already used in oxc.
pub struct AstSnippet<'ast> {
  pub builder: AstBuilder<'ast>,
}

impl<'ast> AstSnippet<'ast> {
  pub fn new(alloc: &'ast Allocator) -> Self {
    Self { builder: AstBuilder::new(alloc) }
  }

  #[inline]
  pub fn alloc(&self) -> &'ast Allocator {
    self.builder.allocator
  }

  /// Parses `text` into an expression living in this arena, with all spans erased.
  pub fn expr(&self, text: &str) -> BuildResult<ast::Expression<'ast>> {
    let text = self.alloc().alloc_str(text);
    let mut expr = Parser::new(self.alloc(), text, EcmaCompiler::script_source_type())
      .parse_expression()
      .map_err(|errors| {
        anyhow::anyhow!(
          "Invalid generated code `{text}`: {}",
          errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
        )
      })?;
    SpanEraser.visit_expression(&mut expr);
    Ok(expr)
  }

  /// `[expr];`
  #[inline]
  pub fn expr_stmt(&self, expr: ast::Expression<'ast>) -> ast::Statement<'ast> {
    self.builder.statement_expression(SPAN, expr)
  }

  /// `"value"` as a call argument.
  pub fn string_arg(&self, value: &str) -> BuildResult<ast::Argument<'ast>> {
    Ok(ast::Argument::from(self.expr(&to_js_string_literal(value))?))
  }
}

#[cfg(test)]
mod tests {
  use oxc::{allocator::Allocator, codegen::Codegen, span::SPAN};

  use super::AstSnippet;

  #[test]
  fn parsed_snippets_have_no_spans() {
    let allocator = Allocator::default();
    let snippet = AstSnippet::new(&allocator);
    let expr = snippet.expr(r#"define("a", function () {})"#).unwrap();
    let oxc::ast::ast::Expression::CallExpression(call) = &expr else { panic!("not a call") };
    assert_eq!(call.span, SPAN);

    let stmt = snippet.expr_stmt(expr);
    let mut program = oxc::parser::Parser::new(&allocator, "", oxc::span::SourceType::default())
      .parse()
      .program;
    program.body.push(stmt);
    assert!(Codegen::new().build(&program).code.starts_with("define(\"a\", function"));
  }

  #[test]
  fn quotes_string_arguments() {
    let allocator = Allocator::default();
    let snippet = AstSnippet::new(&allocator);
    assert!(snippet.string_arg("lib/\"odd\"").is_ok());
  }
}
