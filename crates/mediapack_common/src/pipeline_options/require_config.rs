use mediapack_utils::indexmap::FxIndexMap;
use serde::Deserialize;

/// The subset of a RequireJS config the module bundler understands.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequireConfig {
  /// Directory module ids are resolved against. Defaults to the JS destination.
  pub base_url: Option<String>,
  /// Module id prefix -> replacement prefix.
  pub paths: FxIndexMap<String, String>,
  pub shim: FxIndexMap<String, ShimConfig>,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShimConfig {
  pub deps: Vec<String>,
  /// Global the shimmed script leaves behind, e.g. `jQuery` or `Backbone.Model`.
  pub exports: Option<String>,
}
