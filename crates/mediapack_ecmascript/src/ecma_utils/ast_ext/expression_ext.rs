use oxc::ast::ast;

pub trait ExpressionExt<'ast> {
  fn as_string_literal(&self) -> Option<&ast::StringLiteral<'ast>>;
  fn as_identifier(&self) -> Option<&ast::IdentifierReference<'ast>>;
  fn as_array_expression(&self) -> Option<&ast::ArrayExpression<'ast>>;
  fn is_function_like(&self) -> bool;
}

impl<'ast> ExpressionExt<'ast> for ast::Expression<'ast> {
  fn as_identifier(&self) -> Option<&ast::IdentifierReference<'ast>> {
    if let ast::Expression::Identifier(ident) = self { Some(ident) } else { None }
  }

  fn as_string_literal(&self) -> Option<&ast::StringLiteral<'ast>> {
    let ast::Expression::StringLiteral(expr) = self else {
      return None;
    };
    Some(expr)
  }

  fn as_array_expression(&self) -> Option<&ast::ArrayExpression<'ast>> {
    let ast::Expression::ArrayExpression(expr) = self else {
      return None;
    };
    Some(expr)
  }

  fn is_function_like(&self) -> bool {
    matches!(self, ast::Expression::FunctionExpression(_) | ast::Expression::ArrowFunctionExpression(_))
  }
}
