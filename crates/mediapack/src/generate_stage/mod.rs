mod amd_finalizer;

use mediapack_common::ModuleIdx;
use mediapack_ecmascript::{AstSnippet, EcmaCompiler, MinifiedCode};
use mediapack_error::BuildResult;
use mediapack_sourcemap::{SourceJoiner, SourceMapSource};
use mediapack_utils::{
  path_ext::PathExt,
  rayon::{IntoParallelRefMutIterator, ParallelIterator},
};
use rustc_hash::FxHashMap;

use self::amd_finalizer::AmdFinalizer;
use crate::{
  link_stage::LinkStageOutput,
  types::{SharedOptions, script_bundle::ScriptBundle},
};

pub struct GenerateStage<'a> {
  link_output: &'a mut LinkStageOutput,
  options: &'a SharedOptions,
}

impl<'a> GenerateStage<'a> {
  pub fn new(link_output: &'a mut LinkStageOutput, options: &'a SharedOptions) -> Self {
    Self { link_output, options }
  }

  /// Names, wraps and minifies every module in parallel, then joins them in link order.
  pub fn generate(&mut self) -> BuildResult<ScriptBundle> {
    let options = self.options;
    let js_dest = options.js_dest_dir();
    let LinkStageOutput { modules, index_ecma_ast, sorted_modules, warnings } =
      &mut *self.link_output;
    let modules = &*modules;

    let rendered = index_ecma_ast
      .par_iter_mut()
      .map(|(ast, owner)| {
        let module = &modules[*owner];
        let shim = options.require_config.shim.get(&*module.id);

        let finalized = ast.program.with_mut(|fields| {
          let finalizer =
            AmdFinalizer { snippet: AstSnippet::new(fields.allocator), module, shim };
          finalizer.finalize(fields.program)
        });

        // Map sources are relative to the bundle's directory.
        let source_name = module.path.relative_slash(&js_dest);
        (*owner, finalized.and_then(|()| EcmaCompiler::minify_with_map(ast, &source_name)))
      })
      .collect::<Vec<_>>();

    let mut errors = vec![];
    let mut rendered_modules = FxHashMap::<ModuleIdx, MinifiedCode>::default();
    for (idx, result) in rendered {
      match result {
        Ok(code) => {
          rendered_modules.insert(idx, code);
        }
        Err(errs) => errors.extend(errs.into_vec()),
      }
    }
    if !errors.is_empty() {
      return Err(errors.into());
    }

    let mut joiner = SourceJoiner::default();
    for idx in sorted_modules.iter() {
      if let Some(MinifiedCode { code, map }) = rendered_modules.remove(idx) {
        joiner.append_source(SourceMapSource::new(code, map));
      }
    }
    let (code, map) = joiner.join();

    Ok(ScriptBundle {
      code,
      map,
      modules: sorted_modules.iter().map(|idx| modules[*idx].id.clone()).collect(),
      warnings: std::mem::take(warnings),
    })
  }
}
