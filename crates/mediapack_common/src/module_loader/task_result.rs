use arcstr::ArcStr;
use mediapack_ecmascript::EcmaAst;

use crate::{AmdModule, ModuleId};

pub struct ModuleTaskResult {
  /// `deps` is still empty here; the loader fills it from `resolved_deps`.
  pub module: AmdModule,
  pub ast: EcmaAst,
  /// Dependency ids exactly as written in the source, in declaration order.
  pub raw_deps: Vec<ArcStr>,
  /// `(id, file)` for every dependency that resolved to a module.
  pub resolved_deps: Vec<(ModuleId, std::path::PathBuf)>,
  pub warnings: Vec<anyhow::Error>,
}
