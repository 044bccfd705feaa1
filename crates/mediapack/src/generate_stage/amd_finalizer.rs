use mediapack_common::{AmdModule, ModuleKind, ShimConfig};
use mediapack_ecmascript::{AstSnippet, CallExpressionExt};
use mediapack_error::BuildResult;
use mediapack_utils::ecmascript::{is_validate_property_path, to_js_string_literal};
use oxc::{
  allocator::Vec as ArenaVec,
  ast::{
    AstBuilder,
    ast::{self, CallExpression, Expression, Program, Statement},
  },
  ast_visit::{VisitMut, walk_mut},
};

/// Turns every module into a named `define` so the bundle can be loaded by id.
pub struct AmdFinalizer<'me, 'ast> {
  pub snippet: AstSnippet<'ast>,
  pub module: &'me AmdModule,
  pub shim: Option<&'me ShimConfig>,
}

impl<'ast> AmdFinalizer<'_, 'ast> {
  pub fn finalize(&self, program: &mut Program<'ast>) -> BuildResult<()> {
    match self.module.kind {
      ModuleKind::Define { anonymous: true } => {
        let mut namer = AnonymousDefineNamer {
          name: Some(self.snippet.string_arg(&self.module.id)?),
        };
        namer.visit_program(program);
      }
      ModuleKind::Define { anonymous: false } => {}
      ModuleKind::Shim => self.wrap_shim(program)?,
      ModuleKind::Plain => {
        let define = self
          .snippet
          .expr(&format!("define({}, function () {{}})", to_js_string_literal(&self.module.id)))?;
        program.body.push(self.snippet.expr_stmt(define));
      }
    }
    Ok(())
  }

  /// Runs the script with the global object as `this` and hands its export to the loader while
  /// keeping it on the global, so plain scripts and later shims still see it:
  ///
  /// ```js
  /// (function (root) {
  ///   define("<id>", [<deps>], function () {
  ///     return (function () { <body>; return root.<exports> = <exports>; }).apply(root, arguments);
  ///   });
  /// }(this))
  /// ```
  fn wrap_shim(&self, program: &mut Program<'ast>) -> BuildResult<()> {
    let shim = self.shim.cloned().unwrap_or_default();
    let deps = shim.deps.iter().map(|dep| to_js_string_literal(dep)).collect::<Vec<_>>().join(", ");
    let exports = match shim.exports.as_deref() {
      Some(exports) if is_validate_property_path(exports) => {
        format!("return root.{exports} = {exports};")
      }
      Some(exports) => {
        return Err(
          anyhow::anyhow!(
            "Shim exports `{exports}` of module `{}` is not a property path",
            self.module.id
          )
          .into(),
        );
      }
      None => String::new(),
    };
    let mut wrapper = self.snippet.expr(&format!(
      "(function (root) {{ define({}, [{deps}], function () {{ \
       return (function () {{ {SHIM_BODY}; {exports} }}).apply(root, arguments); }}); }}(this))",
      to_js_string_literal(&self.module.id)
    ))?;

    let builder = self.snippet.builder;
    let mut splicer = ShimBodySplicer {
      builder,
      directives: Some(std::mem::replace(&mut program.directives, builder.vec())),
      body: Some(std::mem::replace(&mut program.body, builder.vec())),
    };
    splicer.visit_expression(&mut wrapper);
    if splicer.body.is_some() {
      return Err(anyhow::anyhow!("Failed to build the shim wrapper of `{}`", self.module.id).into());
    }

    program.body.push(self.snippet.expr_stmt(wrapper));
    Ok(())
  }
}

const SHIM_BODY: &str = "__mediapack_shim_body__";

/// Replaces the `SHIM_BODY` placeholder statement with the script, directives included.
struct ShimBodySplicer<'ast> {
  builder: AstBuilder<'ast>,
  directives: Option<ArenaVec<'ast, ast::Directive<'ast>>>,
  body: Option<ArenaVec<'ast, Statement<'ast>>>,
}

impl<'ast> VisitMut<'ast> for ShimBodySplicer<'ast> {
  fn visit_function_body(&mut self, it: &mut ast::FunctionBody<'ast>) {
    if self.body.is_none() || !it.statements.iter().any(is_shim_placeholder) {
      walk_mut::walk_function_body(self, it);
      return;
    }
    let statements = std::mem::replace(&mut it.statements, self.builder.vec());
    for statement in statements {
      if is_shim_placeholder(&statement) {
        it.statements.extend(self.body.take().into_iter().flatten());
      } else {
        it.statements.push(statement);
      }
    }
    if let Some(directives) = self.directives.take() {
      it.directives = directives;
    }
  }
}

fn is_shim_placeholder(statement: &Statement<'_>) -> bool {
  matches!(
    statement,
    Statement::ExpressionStatement(stmt)
      if matches!(&stmt.expression, Expression::Identifier(ident) if ident.name == SHIM_BODY)
  )
}

/// Gives the first anonymous `define` call its module id.
struct AnonymousDefineNamer<'ast> {
  name: Option<ast::Argument<'ast>>,
}

impl<'ast> VisitMut<'ast> for AnonymousDefineNamer<'ast> {
  fn visit_call_expression(&mut self, it: &mut CallExpression<'ast>) {
    if self.name.is_none() {
      return;
    }
    if it.is_define() && it.define_name().is_none() {
      if let Some(name) = self.name.take() {
        it.arguments.insert(0, name);
      }
      return;
    }
    walk_mut::walk_call_expression(self, it);
  }
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use mediapack_common::{AmdModule, ModuleIdx, ModuleKind, ShimConfig};
  use mediapack_ecmascript::{AstSnippet, EcmaCompiler};

  use super::AmdFinalizer;

  fn finalize(source: &str, kind: ModuleKind, shim: Option<&ShimConfig>) -> String {
    let mut ast = EcmaCompiler::parse(source, EcmaCompiler::script_source_type()).unwrap();
    let module = AmdModule {
      idx: ModuleIdx::from_usize(0),
      id: "lib/legacy".into(),
      path: PathBuf::from("lib/legacy.js"),
      kind,
      deps: vec![],
    };
    ast
      .program
      .with_mut(|fields| {
        AmdFinalizer { snippet: AstSnippet::new(fields.allocator), module: &module, shim }
          .finalize(fields.program)
      })
      .unwrap();
    EcmaCompiler::print(&ast).code
  }

  #[test]
  fn shims_keep_their_export_global() {
    let shim = ShimConfig { deps: vec!["jquery".to_string()], exports: Some("Legacy".to_string()) };
    let code = finalize(
      "'use strict';\nvar Legacy = { answer: 42 };\n",
      ModuleKind::Shim,
      Some(&shim),
    );

    assert!(code.contains("function(root) {"), "{code}");
    assert!(code.contains(r#"define("lib/legacy", ["jquery"], function() {"#), "{code}");
    assert!(code.contains("return root.Legacy = Legacy;"), "{code}");
    assert!(code.contains(".apply(root, arguments)"), "{code}");
    assert!(code.contains("(this)"), "{code}");

    // The directive moves into the script's own function.
    let directive = code.find("use strict").expect("directive is kept");
    assert!(directive > code.find("define(").unwrap(), "{code}");
    assert!(EcmaCompiler::check(&code, EcmaCompiler::script_source_type()).is_empty());
  }

  #[test]
  fn plain_scripts_get_an_empty_define() {
    let code = finalize("window.ready = true;\n", ModuleKind::Plain, None);
    assert!(code.ends_with("define(\"lib/legacy\", function() {});\n"), "{code}");
  }
}
