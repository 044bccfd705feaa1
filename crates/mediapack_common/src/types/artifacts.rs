//! Fixed names of everything the pipeline writes.

pub const INCLUDE_CSS: &str = "include.css";
pub const INCLUDE_JS: &str = "include.js";
pub const LOADER_JS: &str = "loader.js";
pub const MAPS_DIR: &str = "maps";
pub const TEMPLATES_JS: &str = "templates.js";
pub const IMGURLS_TXT: &str = "imgurls.txt";
pub const BUILD_ID_TXT: &str = "build_id.txt";
pub const REQUIRE_JS: &str = "require.js";

/// Extension appended to compiled stylesheets, `a.styl` becomes `a.styl.css`.
pub const COMPILED_STYLE_EXTENSION: &str = "styl.css";

/// URL prefix the CSS destination is served under.
pub const SERVED_CSS_PREFIX: &str = "/media/css/";

/// Module id of the generated templates module.
pub const TEMPLATES_MODULE_ID: &str = "templates";

pub fn source_map_file(name: &str) -> String {
  format!("{name}.map")
}
