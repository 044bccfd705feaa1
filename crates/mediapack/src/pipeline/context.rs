use std::time::{SystemTime, UNIX_EPOCH};

use arcstr::ArcStr;
use mediapack_common::NormalizedPipelineOptions;
use mediapack_fs::OsFileSystem;

use crate::types::SharedOptions;

/// What every task action gets to see.
pub struct PipelineContext {
  pub options: SharedOptions,
  pub fs: OsFileSystem,
  /// Epoch milliseconds of the run, shared by `build_id.txt` and the stylesheet cache-busting.
  pub build_id: ArcStr,
}

impl PipelineContext {
  pub fn new(options: SharedOptions) -> Self {
    let millis =
      SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |elapsed| elapsed.as_millis());
    Self { options, fs: OsFileSystem, build_id: arcstr::format!("{millis}") }
  }

  pub fn options(&self) -> &NormalizedPipelineOptions {
    &self.options
  }
}
