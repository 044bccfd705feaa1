use mediapack_common::ModuleId;
use mediapack_sourcemap::SourceMap;

/// One minified JS bundle and its map, before it is written.
#[derive(Debug)]
pub struct ScriptBundle {
  pub code: String,
  pub map: Option<SourceMap>,
  /// Module ids in bundle order. Empty for the loader.
  pub modules: Vec<ModuleId>,
  pub warnings: Vec<anyhow::Error>,
}
