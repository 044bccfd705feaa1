use std::path::PathBuf;

use arcstr::ArcStr;
use mediapack_error::BuildResult;
use mediapack_sourcemap::SourceMap;
use oxc::{
  allocator::Allocator,
  codegen::{Codegen, CodegenOptions, CodegenReturn},
  minifier::{CompressOptions, MangleOptions, Minifier, MinifierOptions},
  parser::Parser,
  span::SourceType,
  syntax::es_target::ESTarget,
};

use crate::ecma_ast::{
  EcmaAst,
  program_cell::{ProgramCell, ProgramCellDependent, ProgramCellOwner},
};

/// Minified output of one file or module.
#[derive(Debug)]
pub struct MinifiedCode {
  pub code: String,
  pub map: Option<SourceMap>,
}

pub struct EcmaCompiler;

impl EcmaCompiler {
  /// AMD modules are classic scripts: top level `var`s are globals and must survive minification.
  pub fn script_source_type() -> SourceType {
    SourceType::default().with_module(false)
  }

  pub fn parse(source: impl Into<ArcStr>, source_type: SourceType) -> BuildResult<EcmaAst> {
    let allocator = Allocator::default();
    let owner = ProgramCellOwner { source: source.into(), allocator };
    let program = ProgramCell::try_new(owner, |owner| {
      let ret = Parser::new(&owner.allocator, &owner.source, source_type).parse();
      if ret.errors.is_empty() {
        Ok(ProgramCellDependent { program: ret.program })
      } else {
        Err(anyhow::anyhow!(
          "{}",
          ret.errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
        ))
      }
    })?;

    Ok(EcmaAst { program, source_type })
  }

  /// Syntax check only. Returns every diagnostic the parser reports.
  pub fn check(source: &str, source_type: SourceType) -> Vec<String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, source_type).parse();
    ret.errors.iter().map(ToString::to_string).collect()
  }

  pub fn print(ast: &EcmaAst) -> CodegenReturn {
    Codegen::new().build(ast.program())
  }

  /// Compresses and mangles the program in place, then prints it with a map whose only source is
  /// `source_name`. Output stays ES5: bundles run unprocessed in old browsers.
  pub fn minify_with_map(ast: &mut EcmaAst, source_name: &str) -> BuildResult<MinifiedCode> {
    let ret = ast.program.with_mut(|fields| {
      let ret = Minifier::new(MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions { target: ESTarget::ES5, ..CompressOptions::default() }),
      })
      .build(fields.allocator, fields.program);

      Codegen::new()
        .with_options(CodegenOptions {
          source_map_path: Some(PathBuf::from(source_name)),
          ..CodegenOptions::minify()
        })
        .with_scoping(ret.scoping)
        .build(fields.program)
    });

    // Round trip through JSON so the map type does not depend on the one oxc was built with.
    let map = match ret.map {
      Some(map) => Some(
        SourceMap::from_json_string(&map.to_json_string())
          .map_err(|err| anyhow::anyhow!("Invalid source map for {source_name}: {err:?}"))?,
      ),
      None => None,
    };

    Ok(MinifiedCode { code: ret.code, map })
  }

  pub fn minify_source(source: &str, source_name: &str) -> BuildResult<MinifiedCode> {
    let mut ast = Self::parse(source, Self::script_source_type())
      .map_err(|errors| anyhow::anyhow!("Failed to parse {source_name}: {errors}"))?;
    Self::minify_with_map(&mut ast, source_name)
  }
}

#[cfg(test)]
mod tests {
  use mediapack_sourcemap::original_position;

  use super::EcmaCompiler;

  #[test]
  fn basic_test() {
    let ast =
      EcmaCompiler::parse("var a = 1;".to_string(), EcmaCompiler::script_source_type()).unwrap();
    let code = EcmaCompiler::print(&ast).code;
    assert_eq!(code, "var a = 1;\n");
  }

  #[test]
  fn parse_reports_syntax_errors() {
    assert!(EcmaCompiler::parse("var = ;", EcmaCompiler::script_source_type()).is_err());
    assert!(!EcmaCompiler::check("var = ;", EcmaCompiler::script_source_type()).is_empty());
  }

  #[test]
  fn minified_ids_stay_string_literals() {
    let ret = EcmaCompiler::minify_source(
      "define('views/home', ['lib/a'], function (a) { return a; });\nrequire(['main']);\n",
      "home.js",
    )
    .unwrap();
    assert!(ret.code.contains(r#"define("views/home",["lib/a"],function("#), "{}", ret.code);
    assert!(ret.code.contains(r#"require(["main"])"#), "{}", ret.code);
    assert!(!ret.code.contains("=>"));
  }

  #[test]
  fn minify_keeps_script_globals() {
    let ret = EcmaCompiler::minify_source(
      "var define, require;\n(function () {\n  define = function (name) { return name; };\n})();\n",
      "almond.js",
    )
    .unwrap();
    assert!(ret.code.contains("define"));
    assert!(!ret.code.contains('`'));

    let map = ret.map.unwrap();
    assert_eq!(map.get_sources().map(ToString::to_string).collect::<Vec<_>>(), vec!["almond.js"]);
    assert!(original_position(&map, 0, 0).is_some());
  }
}
