use std::path::Path;

use sugar_path::SugarPath;

pub trait PathExt {
  fn expect_to_str(&self) -> &str;

  fn expect_to_slash(&self) -> String;

  /// `self` relative to `base`, with forward slashes.
  fn relative_slash(&self, base: &Path) -> String;
}

impl PathExt for Path {
  fn expect_to_str(&self) -> &str {
    self.to_str().unwrap_or_else(|| {
      panic!("Failed to convert {:?} to valid utf8 str", self.display());
    })
  }

  fn expect_to_slash(&self) -> String {
    self
      .to_slash()
      .unwrap_or_else(|| panic!("Failed to convert {:?} to slash str", self.display()))
      .into_owned()
  }

  fn relative_slash(&self, base: &Path) -> String {
    self.relative(base).to_slash_lossy().into_owned()
  }
}

#[test]
fn test_relative_slash() {
  let base = Path::new("/project/src/media/js");
  assert_eq!(Path::new("/project/src/media/js/lib/almond.js").relative_slash(base), "lib/almond.js");
  assert_eq!(Path::new("/project/src/templates.js").relative_slash(base), "../../templates.js");
}
