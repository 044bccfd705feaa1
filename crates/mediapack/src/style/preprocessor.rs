use std::{path::Path, process::Command};

use lightningcss::{
  printer::PrinterOptions,
  stylesheet::{ParserFlags, ParserOptions, StyleSheet},
};
use mediapack_common::CommandLine;

use super::css_minifier::flattening_targets;

/// Turns one stylesheet source into plain CSS.
pub trait StylePreprocessor: Send + Sync {
  fn name(&self) -> &str;

  fn compile(&self, path: &Path, source: &str) -> anyhow::Result<String>;
}

/// Reads stylesheets as CSS with nesting and prints them flattened.
#[derive(Debug, Default)]
pub struct LightningPreprocessor;

impl StylePreprocessor for LightningPreprocessor {
  fn name(&self) -> &str {
    "lightningcss"
  }

  fn compile(&self, path: &Path, source: &str) -> anyhow::Result<String> {
    let stylesheet = StyleSheet::parse(
      source,
      ParserOptions {
        filename: path.to_string_lossy().into_owned(),
        flags: ParserFlags::NESTING,
        ..ParserOptions::default()
      },
    )
    .map_err(|err| anyhow::anyhow!("{err}"))?;

    let ret = stylesheet
      .to_css(PrinterOptions { targets: flattening_targets(), ..PrinterOptions::default() })
      .map_err(|err| anyhow::anyhow!("{err}"))?;
    Ok(ret.code)
  }
}

/// Runs an external compiler with the file path as its last argument and takes its stdout.
#[derive(Debug)]
pub struct CommandPreprocessor {
  command: CommandLine,
}

impl CommandPreprocessor {
  pub fn new(command: CommandLine) -> Self {
    Self { command }
  }
}

impl StylePreprocessor for CommandPreprocessor {
  fn name(&self) -> &str {
    self.command.program()
  }

  fn compile(&self, path: &Path, _source: &str) -> anyhow::Result<String> {
    let output = Command::new(self.command.program())
      .args(self.command.args())
      .arg(path)
      .output()
      .map_err(|err| anyhow::anyhow!("Failed to run `{}`: {err}", self.command))?;

    if !output.status.success() {
      anyhow::bail!(
        "`{}` exited with {}: {}",
        self.command,
        output.status,
        String::from_utf8_lossy(&output.stderr).trim()
      );
    }
    Ok(String::from_utf8(output.stdout)?)
  }
}

pub fn create_preprocessor(command: Option<&CommandLine>) -> Box<dyn StylePreprocessor> {
  match command {
    Some(command) => Box::new(CommandPreprocessor::new(command.clone())),
    None => Box::new(LightningPreprocessor),
  }
}

#[test]
fn lightning_flattens_nesting() {
  let css = LightningPreprocessor
    .compile(Path::new("a.styl"), ".nav { color: red; & a { color: blue; } }")
    .unwrap();
  assert!(css.contains(".nav a"));
}
