/// The non-magic directory prefix of a glob pattern, without a trailing slash.
///
/// Matched files keep their path relative to this base when copied or compiled into another
/// directory, the same way `src/media/css/**/*.styl` maps `src/media/css/a/b.styl` to `a/b.styl`.
pub fn glob_base(pattern: &str) -> &str {
  let magic = pattern.find(['*', '?', '[', '{']).unwrap_or(pattern.len());
  match pattern[..magic].rfind('/') {
    Some(slash) => &pattern[..slash],
    None => "",
  }
}

#[test]
fn test_glob_base() {
  assert_eq!(glob_base("src/media/css/**/*.styl"), "src/media/css");
  assert_eq!(glob_base("src/media/css/lib/*.styl"), "src/media/css/lib");
  assert_eq!(glob_base("*.css"), "");
  assert_eq!(glob_base("almond/almond.js"), "almond");
}
