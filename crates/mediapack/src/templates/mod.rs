//! Precompiles markup templates into the `templates` AMD module.

mod precompiler;

use std::path::PathBuf;

use mediapack_common::{NormalizedPipelineOptions, SourceSet};
use mediapack_fs::FileSystem;
use mediapack_utils::{
  ecmascript::to_js_string_literal,
  path_ext::PathExt,
  rayon::{IntoParallelRefIterator, ParallelIterator},
};

pub use self::precompiler::{
  CommandPrecompiler, StaticPrecompiler, TemplatePrecompiler, create_precompiler,
};

const TEMPLATES_PRELUDE: &str = "(function() {\nvar templates = {};\n";

const TEMPLATES_EPILOGUE: &str = "define(\"templates\", [\"nunjucks\", \"helpers\"], function(nunjucks) {\n    nunjucks.env = new nunjucks.Environment([], {autoescape: true});\n    nunjucks.env.cache = nunjucks.templates = templates;\n    console.log(\"Templates loaded\");\n    return nunjucks;\n});\n})();";

#[derive(Debug)]
pub struct TemplatesModule {
  pub code: String,
  /// Template names in module order.
  pub names: Vec<String>,
}

/// `fragments` are `(name, expression)` pairs.
pub fn wrap_templates(fragments: &[(String, String)]) -> String {
  let mut code = String::from(TEMPLATES_PRELUDE);
  for (name, expression) in fragments {
    code.push_str("templates[");
    code.push_str(&to_js_string_literal(name));
    code.push_str("] = ");
    code.push_str(expression);
    code.push_str(";\n");
  }
  code.push_str(TEMPLATES_EPILOGUE);
  code
}

/// Templates are keyed by their path under the templates root, without the extension.
pub fn compile_templates(
  fs: &dyn FileSystem,
  options: &NormalizedPipelineOptions,
  precompiler: &dyn TemplatePrecompiler,
) -> anyhow::Result<TemplatesModule> {
  let root = options.resolve(&options.paths.templates_root);
  let files: Vec<PathBuf> = SourceSet::new(options.paths.html.iter()).resolve(fs, &options.cwd)?;

  let fragments = files
    .par_iter()
    .map(|file| {
      let name = file.with_extension("").relative_slash(&root);
      let source = fs
        .read_to_string(file)
        .map_err(|err| anyhow::anyhow!("Failed to read {}: {err}", file.display()))?;
      let expression = precompiler.precompile(&name, file, &source)?;
      Ok((name, expression))
    })
    .collect::<anyhow::Result<Vec<_>>>()?;

  Ok(TemplatesModule {
    code: wrap_templates(&fragments),
    names: fragments.into_iter().map(|(name, _)| name).collect(),
  })
}

/// Compiles every template and writes the module to `paths.templatesOutput`.
pub fn build_templates(
  fs: &dyn FileSystem,
  options: &NormalizedPipelineOptions,
) -> anyhow::Result<TemplatesModule> {
  let precompiler = create_precompiler(options.template_compiler.as_ref());
  let module = compile_templates(fs, options, precompiler.as_ref())?;
  fs.write(&options.templates_output(), module.code.as_bytes())?;
  tracing::debug!("Compiled {} templates", module.names.len());
  Ok(module)
}

#[cfg(test)]
mod tests {
  use mediapack_ecmascript::EcmaCompiler;

  use super::wrap_templates;

  #[test]
  fn wrapper_is_a_valid_script() {
    let code = wrap_templates(&[
      ("a".to_string(), "{root: function() {}}".to_string()),
      ("nested/b".to_string(), "{root: function() {}}".to_string()),
    ]);
    assert!(code.starts_with("(function() {\nvar templates = {};\ntemplates[\"a\"] = "));
    assert!(code.contains("templates[\"nested/b\"]"));
    assert!(code.ends_with("return nunjucks;\n});\n})();"));
    assert!(EcmaCompiler::check(&code, EcmaCompiler::script_source_type()).is_empty());
  }
}
