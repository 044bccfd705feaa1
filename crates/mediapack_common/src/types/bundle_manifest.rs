use mediapack_utils::indexmap::FxIndexMap;

/// Secondary CSS bundles (`splash.css` -> `splash*.styl.css`) plus the names kept out of the
/// aggregate bundle.
#[derive(Debug, Default, Clone)]
pub struct BundleManifest {
  pub bundles: FxIndexMap<String, String>,
  pub excludes: Vec<String>,
}

impl BundleManifest {
  pub fn new(bundles: FxIndexMap<String, String>, excludes: Vec<String>) -> Self {
    Self { bundles, excludes }
  }

  /// Patterns, relative to the CSS destination, that never enter the aggregate bundle.
  pub fn aggregate_excludes(&self, include_css: &str) -> Vec<String> {
    self
      .bundles
      .iter()
      .flat_map(|(name, pattern)| [name.clone(), pattern.clone()])
      .chain(std::iter::once(include_css.to_string()))
      .chain(self.excludes.iter().cloned())
      .collect()
  }

  pub fn is_excluded(&self, name: &str, include_css: &str) -> bool {
    self
      .aggregate_excludes(include_css)
      .iter()
      .any(|pattern| pattern == name || fast_glob::glob_match(pattern, name))
  }
}

#[test]
fn excludes_bundles_and_their_parts() {
  let mut bundles = FxIndexMap::default();
  bundles.insert("splash.css".to_string(), "splash*.styl.css".to_string());
  let manifest = BundleManifest::new(bundles, vec!["legacy.css".to_string()]);

  assert_eq!(
    manifest.aggregate_excludes("include.css"),
    vec!["splash.css", "splash*.styl.css", "include.css", "legacy.css"]
  );
  assert!(manifest.is_excluded("splash.css", "include.css"));
  assert!(manifest.is_excluded("splash-extra.styl.css", "include.css"));
  assert!(manifest.is_excluded("include.css", "include.css"));
  assert!(manifest.is_excluded("legacy.css", "include.css"));
  assert!(!manifest.is_excluded("app.styl.css", "include.css"));
}
