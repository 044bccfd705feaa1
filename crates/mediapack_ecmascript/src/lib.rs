mod ecma_ast;
mod ecma_compiler;
mod ecma_utils;

pub use crate::{
  ecma_ast::{EcmaAst, program_cell::WithMutFields},
  ecma_compiler::{EcmaCompiler, MinifiedCode},
  ecma_utils::{AstSnippet, CallExpressionExt, ExpressionExt, SpanEraser},
};
