use std::borrow::Cow;

use anyhow::Context;
use oxc_sourcemap::SourceMap;
use serde_json::Value;

const MAPPING_URL_MARKERS: [&str; 4] =
  ["//# sourceMappingURL=", "//@ sourceMappingURL=", "/*# sourceMappingURL=", "/*@ sourceMappingURL="];

fn is_mapping_url_line(line: &str) -> bool {
  let line = line.trim_start();
  MAPPING_URL_MARKERS.iter().any(|marker| line.starts_with(marker))
}

pub fn has_source_mapping_url(code: &str) -> bool {
  code.lines().any(is_mapping_url_line)
}

/// Drops the trailing `sourceMappingURL` comment, if any, together with the newline before it.
pub fn strip_source_mapping_url(code: &str) -> &str {
  let trimmed = code.trim_end();
  let (head, last_line) = match trimmed.rfind('\n') {
    Some(pos) => (&trimmed[..pos], &trimmed[pos + 1..]),
    None => ("", trimmed),
  };
  if is_mapping_url_line(last_line) {
    head.trim_end_matches('\r')
  } else {
    code
  }
}

/// Points the bundle at `url`.
///
/// A dangling `sourceMappingURL=undefined` is replaced, a missing reference is appended, and an
/// existing reference is kept as is. Running it twice yields the same text.
pub fn patch_source_mapping_url<'a>(code: &'a str, url: &str) -> Cow<'a, str> {
  const UNDEFINED: &str = "sourceMappingURL=undefined";
  if code.contains(UNDEFINED) {
    return Cow::Owned(code.replace(UNDEFINED, &format!("sourceMappingURL={url}")));
  }
  if has_source_mapping_url(code) {
    return Cow::Borrowed(code);
  }
  let mut patched = String::with_capacity(code.len() + url.len() + 24);
  patched.push_str(code);
  if !code.is_empty() && !code.ends_with('\n') {
    patched.push('\n');
  }
  patched.push_str("//# sourceMappingURL=");
  patched.push_str(url);
  Cow::Owned(patched)
}

fn parse_map_object(json: &str) -> anyhow::Result<serde_json::Map<String, Value>> {
  match serde_json::from_str::<Value>(json).context("Source map is not valid JSON")? {
    Value::Object(map) => Ok(map),
    _ => anyhow::bail!("Source map must be a JSON object"),
  }
}

/// Rewrites entries of the `sources` array. Entries the callback returns `None` for stay unchanged.
pub fn rewrite_map_sources(
  json: &str,
  rewrite: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<String> {
  let mut map = parse_map_object(json)?;
  if let Some(Value::Array(sources)) = map.get_mut("sources") {
    for source in sources.iter_mut() {
      if let Some(replacement) = source.as_str().and_then(&rewrite) {
        *source = Value::String(replacement);
      }
    }
  }
  Ok(serde_json::to_string(&Value::Object(map))?)
}

pub fn set_map_fields(
  json: &str,
  file: Option<&str>,
  source_root: Option<&str>,
) -> anyhow::Result<String> {
  let mut map = parse_map_object(json)?;
  if let Some(file) = file {
    map.insert("file".to_string(), Value::String(file.to_string()));
  }
  if let Some(source_root) = source_root {
    map.insert("sourceRoot".to_string(), Value::String(source_root.to_string()));
  }
  Ok(serde_json::to_string(&Value::Object(map))?)
}

/// Finds the original `(source, line, column)` for a generated position. Lines and columns are
/// zero based.
pub fn original_position(map: &SourceMap, line: u32, column: u32) -> Option<(String, u32, u32)> {
  let token = map
    .get_tokens()
    .filter(|token| token.get_dst_line() == line && token.get_dst_col() <= column)
    .max_by_key(|token| token.get_dst_col())?;
  let source = map.get_source(token.get_source_id()?)?;
  Some((source.to_string(), token.get_src_line(), token.get_src_col()))
}

#[test]
fn strip_removes_trailing_reference() {
  assert_eq!(strip_source_mapping_url("a();\n//# sourceMappingURL=a.js.map\n"), "a();");
  assert_eq!(strip_source_mapping_url("a {}\n/*# sourceMappingURL=a.css.map */"), "a {}");
  assert_eq!(strip_source_mapping_url("a();\nb();"), "a();\nb();");
}

#[test]
fn patch_url_is_idempotent() {
  let once = patch_source_mapping_url("a();", "maps/include.js.map").into_owned();
  assert_eq!(once, "a();\n//# sourceMappingURL=maps/include.js.map");
  let twice = patch_source_mapping_url(&once, "maps/include.js.map");
  assert_eq!(twice, once);

  let fixed = patch_source_mapping_url("a();\n//# sourceMappingURL=undefined", "maps/include.js.map");
  assert_eq!(fixed, "a();\n//# sourceMappingURL=maps/include.js.map");
}

#[test]
fn rewrite_sources_only_touches_matches() {
  let json = r#"{"version":3,"sources":["almond.js","a.js"],"mappings":""}"#;
  let patched =
    rewrite_map_sources(json, |source| (source == "almond.js").then(|| "lib/almond.js".to_string()))
      .unwrap();
  let value: Value = serde_json::from_str(&patched).unwrap();
  assert_eq!(value["sources"], serde_json::json!(["lib/almond.js", "a.js"]));

  let with_root = set_map_fields(&patched, Some("include.js"), Some("../")).unwrap();
  let value: Value = serde_json::from_str(&with_root).unwrap();
  assert_eq!(value["file"], "include.js");
  assert_eq!(value["sourceRoot"], "../");
}
