use std::sync::LazyLock;

use regex::{Captures, Regex};

static CSS_URL: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"url\(\s*(['"]?)([^'")\s]+)(['"]?)\s*\)"#).expect("css url pattern is valid")
});

/// Every `url()` target in document order, unquoted.
pub fn css_urls(css: &str) -> impl Iterator<Item = &str> {
  CSS_URL.captures_iter(css).filter_map(|captures| captures.get(2)).map(|url| url.as_str())
}

/// The part of a url that names a file: no query, no fragment.
pub fn url_path(url: &str) -> &str {
  let end = url.find(['?', '#']).unwrap_or(url.len());
  &url[..end]
}

/// Appends `b=<marker>` to the query of every `url()`. `data:` and fragment-only urls are left
/// alone.
pub fn cachebust_urls(css: &str, marker_for: impl Fn(&str) -> String) -> String {
  CSS_URL
    .replace_all(css, |captures: &Captures| {
      let (open, url, close) = (&captures[1], &captures[2], &captures[3]);
      if url.starts_with("data:") || url.starts_with('#') {
        return captures[0].to_string();
      }

      let marker = marker_for(url_path(url));
      let (head, fragment) = match url.find('#') {
        Some(pos) => url.split_at(pos),
        None => (url, ""),
      };
      let separator = if head.contains('?') { '&' } else { '?' };
      format!("url({open}{head}{separator}b={marker}{fragment}{close})")
    })
    .into_owned()
}

#[test]
fn appends_markers() {
  let css = r#"a{background:url(/media/img/a.png)}b{background:url("../img/b.svg#icon")}"#;
  let busted = cachebust_urls(css, |path| path.len().to_string());
  assert_eq!(
    busted,
    r#"a{background:url(/media/img/a.png?b=16)}b{background:url("../img/b.svg?b=12#icon")}"#
  );
}

#[test]
fn keeps_data_uris_and_extends_queries() {
  let css = "a{background:url(data:image/png;base64,AAAA)}b{background:url('x.png?v=1')}";
  let busted = cachebust_urls(css, |_| "m".to_string());
  assert_eq!(busted, "a{background:url(data:image/png;base64,AAAA)}b{background:url('x.png?v=1&b=m')}");
}
