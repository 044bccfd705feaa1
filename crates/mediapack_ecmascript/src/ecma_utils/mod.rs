mod ast_ext;
mod ast_snippet;
mod span_eraser;

pub use {
  ast_ext::{call_expression_ext::CallExpressionExt, expression_ext::ExpressionExt},
  ast_snippet::AstSnippet,
  span_eraser::SpanEraser,
};
