use std::fmt;

use serde::Deserialize;

/// An external program and its leading arguments, written as `["stylus", "--print"]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct CommandLine {
  program: String,
  args: Vec<String>,
}

impl CommandLine {
  pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
    Self { program: program.into(), args: args.into_iter().map(Into::into).collect() }
  }

  pub fn program(&self) -> &str {
    &self.program
  }

  pub fn args(&self) -> &[String] {
    &self.args
  }
}

impl TryFrom<Vec<String>> for CommandLine {
  type Error = String;

  fn try_from(mut value: Vec<String>) -> Result<Self, Self::Error> {
    if value.is_empty() {
      return Err("a command needs at least a program name".to_string());
    }
    let program = value.remove(0);
    Ok(Self { program, args: value })
  }
}

impl fmt::Display for CommandLine {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.program)?;
    for arg in &self.args {
      write!(f, " {arg}")?;
    }
    Ok(())
  }
}

#[test]
fn rejects_empty_commands() {
  assert!(serde_json::from_str::<CommandLine>("[]").is_err());
  let command: CommandLine = serde_json::from_str(r#"["npm", "install"]"#).unwrap();
  assert_eq!(command.to_string(), "npm install");
}
