use arcstr::ArcStr;

/// The AMD id of a module, e.g. `views/app` or `templates`.
///
/// Relative ids are always resolved before a `ModuleId` is created, so two modules never share one.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct ModuleId(ArcStr);

impl ModuleId {
  pub fn new(value: impl Into<ArcStr>) -> Self {
    Self(value.into())
  }

  pub fn inner(&self) -> &ArcStr {
    &self.0
  }

  /// The directory part of the id that relative ids are resolved against.
  pub fn parent(&self) -> &str {
    self.0.rfind('/').map_or("", |pos| &self.0[..pos])
  }

  /// Last path segment, `templates` for `../../templates`.
  pub fn last_segment(&self) -> &str {
    self.0.rsplit('/').next().unwrap_or(&self.0)
  }
}

impl std::ops::Deref for ModuleId {
  type Target = str;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl AsRef<str> for ModuleId {
  fn as_ref(&self) -> &str {
    self
  }
}

impl std::fmt::Display for ModuleId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<ArcStr> for ModuleId {
  fn from(value: ArcStr) -> Self {
    Self::new(value)
  }
}

impl From<&str> for ModuleId {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}

#[test]
fn splits_segments() {
  let id = ModuleId::from("views/app/main");
  assert_eq!(id.parent(), "views/app");
  assert_eq!(id.last_segment(), "main");
  assert_eq!(ModuleId::from("main").parent(), "");
}
