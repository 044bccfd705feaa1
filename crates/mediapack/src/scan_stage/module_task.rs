use std::sync::Arc;

use anyhow::Context;
use arcstr::ArcStr;
use mediapack_common::{AmdModule, ModuleIdx, ModuleKind, ModuleLoaderMsg, ModuleTaskResult};
use mediapack_ecmascript::EcmaCompiler;
use mediapack_error::BuildResult;
use mediapack_fs::FileSystem;
use mediapack_resolver::{Resolution, ResolveReturn};

use super::{amd_scanner::AmdScanner, task_context::TaskContext};

pub struct ModuleTask {
  ctx: Arc<TaskContext>,
  idx: ModuleIdx,
  resolved: ResolveReturn,
}

impl ModuleTask {
  pub fn new(ctx: Arc<TaskContext>, idx: ModuleIdx, resolved: ResolveReturn) -> Self {
    Self { ctx, idx, resolved }
  }

  pub async fn run(self) {
    if let Err(errs) = self.run_inner().await {
      // The loader only stops listening once every spawned task reported back.
      let _ = self.ctx.tx.send(ModuleLoaderMsg::BuildErrors(errs.into_vec())).await;
    }
  }

  async fn run_inner(&self) -> BuildResult<()> {
    let ResolveReturn { id, path } = &self.resolved;

    let source = self
      .ctx
      .fs
      .read_to_string(path)
      .with_context(|| format!("Failed to read module `{id}` from {}", path.display()))?;

    let ast = EcmaCompiler::parse(source, EcmaCompiler::script_source_type())
      .map_err(|errors| anyhow::anyhow!("Failed to parse module `{id}`: {errors}"))?;

    let scan = AmdScanner::scan(ast.program());
    let shim = self.ctx.options.require_config.shim.get(&**id);

    // A script that defines itself ignores its shim entry.
    let (kind, raw_deps): (ModuleKind, Vec<ArcStr>) = match shim {
      Some(shim) if scan.define_count == 0 => {
        (ModuleKind::Shim, shim.deps.iter().map(|dep| ArcStr::from(dep.as_str())).collect())
      }
      _ if scan.define_count > 0 => (
        ModuleKind::Define { anonymous: scan.first_define_is_anonymous },
        scan.deps.into_iter().collect(),
      ),
      _ => (ModuleKind::Plain, scan.deps.into_iter().collect()),
    };

    let mut warnings = Vec::new();
    let mut errors = Vec::new();
    let mut resolved_deps = Vec::with_capacity(raw_deps.len());
    for dep in &raw_deps {
      match self.ctx.resolver.resolve(Some(id), dep) {
        Ok(Resolution::Module(resolved)) => resolved_deps.push((resolved.id, resolved.path)),
        Ok(Resolution::Builtin) => {}
        Ok(Resolution::Unsupported(reason)) => {
          warnings.push(anyhow::anyhow!("Module `{id}` skips {reason}"));
        }
        Err(err) => errors.push(anyhow::Error::new(err)),
      }
    }
    if !errors.is_empty() {
      Err(errors)?;
    }

    let module = AmdModule {
      idx: self.idx,
      id: id.clone(),
      path: path.clone(),
      kind,
      deps: Vec::with_capacity(resolved_deps.len()),
    };

    let result = ModuleTaskResult { module, ast, raw_deps, resolved_deps, warnings };
    let _ = self.ctx.tx.send(ModuleLoaderMsg::ModuleDone(Box::new(result))).await;
    Ok(())
  }
}
