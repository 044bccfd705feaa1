use std::{path::Path, process::Command};

use mediapack_common::CommandLine;
use mediapack_utils::ecmascript::to_js_string_literal;

/// Turns one markup template into a JS expression evaluating to `{ root: function }`.
pub trait TemplatePrecompiler: Send + Sync {
  fn precompile(&self, name: &str, path: &Path, source: &str) -> anyhow::Result<String>;
}

/// Renders the template text as is.
#[derive(Debug, Default)]
pub struct StaticPrecompiler;

impl StaticPrecompiler {
  fn has_template_tags(source: &str) -> bool {
    source.contains("{{") || source.contains("{%")
  }
}

impl TemplatePrecompiler for StaticPrecompiler {
  fn precompile(&self, name: &str, _path: &Path, source: &str) -> anyhow::Result<String> {
    if Self::has_template_tags(source) {
      tracing::warn!("{name} contains template tags, they are emitted as plain text");
    }
    Ok(format!(
      "(function() {{function root(env, context, frame, runtime, cb) {{\n\
       var output = {};\n\
       cb(null, output);\n\
       }}\n\
       return {{root: root}};\n\
       }})()",
      to_js_string_literal(source)
    ))
  }
}

/// Runs `<command> <name> <path>` and uses its stdout as the expression.
#[derive(Debug)]
pub struct CommandPrecompiler {
  command: CommandLine,
}

impl CommandPrecompiler {
  pub fn new(command: CommandLine) -> Self {
    Self { command }
  }
}

impl TemplatePrecompiler for CommandPrecompiler {
  fn precompile(&self, name: &str, path: &Path, _source: &str) -> anyhow::Result<String> {
    let output = Command::new(self.command.program())
      .args(self.command.args())
      .arg(name)
      .arg(path)
      .output()
      .map_err(|err| anyhow::anyhow!("Failed to run `{}`: {err}", self.command))?;

    if !output.status.success() {
      anyhow::bail!(
        "`{}` failed on {name} with {}: {}",
        self.command,
        output.status,
        String::from_utf8_lossy(&output.stderr).trim()
      );
    }
    Ok(String::from_utf8(output.stdout)?.trim_end().trim_end_matches(';').to_string())
  }
}

pub fn create_precompiler(command: Option<&CommandLine>) -> Box<dyn TemplatePrecompiler> {
  match command {
    Some(command) => Box::new(CommandPrecompiler::new(command.clone())),
    None => Box::new(StaticPrecompiler),
  }
}
