mod generate_stage;
mod link_stage;
mod scan_stage;
mod types;
mod utils;

pub mod dev_server;
pub mod imgurls;
pub mod js_sourcemaps;
pub mod module_bundler;
pub mod pipeline;
pub mod style;
pub mod task_graph;
pub mod templates;
pub mod watch;

pub use crate::{
  module_bundler::{ModuleBundleOutput, ModuleBundler},
  pipeline::{Pipeline, PipelineContext},
  task_graph::{TaskError, TaskGraph, TaskReport},
  types::script_bundle::ScriptBundle,
  utils::{
    normalize_options::{DEFAULT_IMAGE_ORIGIN, DEFAULT_PORT, normalize_options, resolve_port},
    write_with_map::write_with_map,
  },
};
pub use mediapack_common::*;
pub use mediapack_error::{BuildError, BuildResult};
pub use mediapack_fs::{FileSystem, OsFileSystem};
