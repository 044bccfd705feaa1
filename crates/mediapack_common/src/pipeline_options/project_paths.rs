use serde::Deserialize;

/// Where things live in a project, relative to its root.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectPaths {
  pub bower: String,
  pub require: String,
  pub almond: String,
  pub init: String,
  pub js: Vec<String>,
  pub styl: Vec<String>,
  pub styl_lib: String,
  pub styl_compiled: String,
  pub html: Vec<String>,
  pub templates_root: String,
  pub templates_output: String,
  pub index_html: String,
  pub media: String,
  pub serve_root: String,
  pub lint_excludes: Vec<String>,
}

impl Default for ProjectPaths {
  fn default() -> Self {
    Self {
      bower: "bower_components/".to_string(),
      require: "bower_components/requirejs/require.js".to_string(),
      almond: "src/media/js/lib/almond.js".to_string(),
      init: "src/media/js/lib/commonplace/init.js".to_string(),
      js: vec!["src/*.js".to_string(), "src/media/js/**/*.js".to_string()],
      styl: vec!["src/media/css/**/*.styl".to_string(), "!src/media/css/lib/*".to_string()],
      styl_lib: "src/media/css/lib/*.styl".to_string(),
      styl_compiled: "src/media/css/**/*.styl.css".to_string(),
      html: vec!["src/templates/**/*.html".to_string()],
      templates_root: "src/templates".to_string(),
      templates_output: "src/templates.js".to_string(),
      index_html: "src/index.html".to_string(),
      media: "src/media".to_string(),
      serve_root: "src".to_string(),
      lint_excludes: vec!["src/templates.js".to_string()],
    }
  }
}
