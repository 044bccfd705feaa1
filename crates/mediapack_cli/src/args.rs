use std::path::PathBuf;

use clap::Args;

#[derive(Args)]
pub struct ProjectArgs {
  /// Project root, defaults to the current directory.
  #[clap(long)]
  pub cwd: Option<PathBuf>,

  /// Config file relative to the project root, defaults to `mediapack.json`.
  #[clap(long, short = 'c')]
  pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct ServeArgs {
  /// Page served for unknown paths, without `.html`.
  #[clap(long)]
  pub template: Option<String>,

  #[clap(long, short = 'p')]
  pub port: Option<u16>,
}

#[derive(Args)]
pub struct OutputArgs {
  #[clap(long, short = 'v')]
  pub verbose: bool,

  /// Print the tasks and their predecessors instead of running anything.
  #[clap(long, short = 'l')]
  pub list: bool,
}
