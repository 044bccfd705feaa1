use oxc::syntax::identifier;

pub fn is_validate_identifier_name(name: &str) -> bool {
  identifier::is_identifier_name(name)
}

/// `a.b.c` where every segment is a valid identifier. Shim exports are written this way.
pub fn is_validate_property_path(path: &str) -> bool {
  !path.is_empty() && path.split('.').all(is_validate_identifier_name)
}

/// Quotes `value` as a JS string literal.
pub fn to_js_string_literal(value: &str) -> String {
  serde_json::to_string(value).unwrap()
}

#[test]
fn test_is_validate_identifier_name() {
  assert!(is_validate_identifier_name("foo"));
  assert!(!is_validate_identifier_name("1aaaa"));
  assert!(!is_validate_identifier_name("😈"));
}

#[test]
fn test_is_validate_property_path() {
  assert!(is_validate_property_path("jQuery"));
  assert!(is_validate_property_path("Backbone.Model"));
  assert!(!is_validate_property_path("a..b"));
  assert!(!is_validate_property_path(""));
}

#[test]
fn test_to_js_string_literal() {
  assert_eq!(to_js_string_literal("a\"b"), r#""a\"b""#);
}
