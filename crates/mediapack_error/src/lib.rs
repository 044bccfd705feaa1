use std::{
  fmt::{self, Display},
  ops::{Deref, DerefMut},
};

/// One or more errors collected while running a build stage.
#[derive(Debug)]
pub struct BuildError(pub Vec<anyhow::Error>);

impl BuildError {
  pub fn into_vec(self) -> Vec<anyhow::Error> {
    self.0
  }
}

impl Deref for BuildError {
  type Target = Vec<anyhow::Error>;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl DerefMut for BuildError {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.0
  }
}

impl From<anyhow::Error> for BuildError {
  fn from(error: anyhow::Error) -> Self {
    Self(vec![error])
  }
}

impl From<Vec<anyhow::Error>> for BuildError {
  fn from(errors: Vec<anyhow::Error>) -> Self {
    Self(errors)
  }
}

impl From<std::io::Error> for BuildError {
  fn from(error: std::io::Error) -> Self {
    Self(vec![error.into()])
  }
}

impl Display for BuildError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (idx, error) in self.0.iter().enumerate() {
      if idx > 0 {
        f.write_str("\n")?;
      }
      write!(f, "{error:#}")?;
    }
    Ok(())
  }
}

impl std::error::Error for BuildError {}

pub type BuildResult<T> = anyhow::Result<T, BuildError>;

#[test]
fn display_joins_every_error() {
  let error = BuildError::from(vec![anyhow::anyhow!("first"), anyhow::anyhow!("second")]);
  assert_eq!(error.to_string(), "first\nsecond");
  assert_eq!(error.len(), 2);
}
