use std::sync::LazyLock;

use mediapack_utils::indexmap::FxIndexSet;
use regex::Regex;

static STYLESHEET_HREF: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"href="/media/css/(.+.css)""#).expect("stylesheet href pattern is valid")
});

/// Stylesheet names in the order the reference document links them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OrderHint {
  names: Vec<String>,
}

impl OrderHint {
  /// Collects every `href="/media/css/<name>.css"` match in document order, keeping the first
  /// occurrence of repeated names.
  pub fn scan(document: &str) -> Self {
    let names = STYLESHEET_HREF
      .captures_iter(document)
      .map(|captures| captures[1].to_string())
      .collect::<FxIndexSet<_>>();
    Self { names: names.into_iter().collect() }
  }

  pub fn names(&self) -> &[String] {
    &self.names
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }
}

#[test]
fn scans_links_in_document_order() {
  let hint = OrderHint::scan(
    r#"
    <link rel="stylesheet" href="/media/css/reset.styl.css">
    <link rel="stylesheet" href="/media/css/app.styl.css">
    <link rel="stylesheet" href="/media/css/reset.styl.css">
    <link rel="stylesheet" href="/other/x.css">
    "#,
  );
  assert_eq!(hint.names(), ["reset.styl.css", "app.styl.css"]);
}

#[test]
fn greedy_match_spans_one_line() {
  let hint =
    OrderHint::scan(r#"<link href="/media/css/a.css"><link href="/media/css/b.css">"#);
  assert_eq!(hint.names(), [r#"a.css"><link href="/media/css/b.css"#]);
}
