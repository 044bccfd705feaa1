mod module_loader;
mod pipeline_options;
mod types;

pub use pipeline_options::{
  PipelineOptions, command_line::CommandLine,
  normalized_pipeline_options::NormalizedPipelineOptions, project_paths::ProjectPaths,
  require_config::{RequireConfig, ShimConfig},
};

pub use crate::{
  module_loader::{ModuleLoaderMsg, task_result::ModuleTaskResult},
  types::{
    amd_module::{AmdModule, ModuleKind},
    artifacts,
    bundle_manifest::BundleManifest,
    module_id::ModuleId,
    order_hint::OrderHint,
    raw_idx::{EcmaAstIdx, ModuleIdx},
    source_set::SourceSet,
  },
};
