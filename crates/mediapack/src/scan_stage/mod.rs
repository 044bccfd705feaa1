mod amd_scanner;
pub mod module_loader;
mod module_task;
mod task_context;

use mediapack_error::BuildResult;
use mediapack_fs::OsFileSystem;
use mediapack_resolver::Resolution;
use module_loader::{ModuleLoader, ModuleLoaderOutput};

use crate::types::{SharedOptions, SharedResolver};

pub type ScanStageOutput = ModuleLoaderOutput;

pub struct ScanStage {
  fs: OsFileSystem,
  options: SharedOptions,
  resolver: SharedResolver,
}

impl ScanStage {
  pub fn new(fs: OsFileSystem, options: SharedOptions, resolver: SharedResolver) -> Self {
    Self { fs, options, resolver }
  }

  /// Loads the entry module and everything it reaches.
  pub async fn scan(&mut self) -> BuildResult<ScanStageOutput> {
    let entry = &self.options.entry_module;
    let resolved = match self.resolver.resolve(None, entry) {
      Ok(Resolution::Module(resolved)) => resolved,
      Ok(_) => Err(anyhow::anyhow!("Entry module `{entry}` must be a file"))?,
      Err(err) => Err(anyhow::anyhow!("Failed to resolve entry module: {err}"))?,
    };

    let module_loader =
      ModuleLoader::new(self.fs, SharedOptions::clone(&self.options), SharedResolver::clone(&self.resolver));
    module_loader.fetch_all_modules(resolved).await
  }
}
