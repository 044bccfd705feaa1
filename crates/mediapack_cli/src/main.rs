mod args;

use std::{process::ExitCode, time::Instant};

use ansi_term::Colour;
use args::{OutputArgs, ProjectArgs, ServeArgs};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mediapack::{OsFileSystem, Pipeline, PipelineOptions};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Commands {
  /// Tasks to run. Runs `default` when none are given.
  tasks: Vec<String>,

  #[clap(flatten)]
  project: ProjectArgs,

  #[clap(flatten)]
  serve: ServeArgs,

  #[clap(flatten)]
  output: OutputArgs,
}

fn init_tracing(verbose: bool) {
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
  tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn print_tasks(pipeline: &Pipeline) {
  let dim = Colour::White.dimmed();
  let names = pipeline.task_names();
  let width = names.iter().map(|name| name.len()).max().unwrap_or_default();

  for name in names {
    let deps = pipeline
      .graph()
      .deps(name)
      .map(|deps| deps.iter().map(|dep| dep.as_str()).collect::<Vec<_>>().join(", "))
      .unwrap_or_default();
    println!("{}{:pad$} {}", Colour::Cyan.paint(name), "", dim.paint(deps), pad = width - name.len());
  }
}

fn fail(message: impl std::fmt::Display) -> ExitCode {
  println!("{} {}", Colour::Red.paint("Error:"), message);
  ExitCode::FAILURE
}

#[tokio::main]
async fn main() -> ExitCode {
  let args = Commands::parse();
  init_tracing(args.output.verbose);

  let cwd = match args.project.cwd {
    Some(cwd) => cwd,
    None => match std::env::current_dir() {
      Ok(cwd) => cwd,
      Err(err) => return fail(err),
    },
  };

  let config = args.project.config.as_deref();
  let mut options = match PipelineOptions::load(&OsFileSystem, &cwd, config) {
    Ok(options) => options,
    Err(err) => return fail(format!("{err:#}")),
  };
  options.port_override = args.serve.port;
  options.template = args.serve.template;

  let pipeline = match Pipeline::new(options) {
    Ok(pipeline) => pipeline,
    Err(err) => return fail(format!("{err:#}")),
  };

  if args.output.list {
    print_tasks(&pipeline);
    return ExitCode::SUCCESS;
  }

  let tasks = args.tasks.iter().map(String::as_str).collect::<Vec<_>>();
  let start = Instant::now();
  match pipeline.run(&tasks).await {
    Ok(report) => {
      let elapsed = format!("{:.2} ms", start.elapsed().as_secs_f64() * 1000.0);
      println!(
        "\n{} Finished {} tasks in {}",
        Colour::Green.paint("✔"),
        report.executed.len(),
        Colour::White.bold().paint(elapsed)
      );
      ExitCode::SUCCESS
    }
    Err(err) => fail(err),
  }
}
