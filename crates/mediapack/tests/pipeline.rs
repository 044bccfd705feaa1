mod common;

use common::Project;
use mediapack::{Pipeline, TaskError};

#[tokio::test]
async fn build_writes_every_artifact() {
  let project = Project::new();
  project.with_scripts().with_styles().write("src/templates/home.html", "<main></main>\n");
  let config = r#"{
    "cssBundles": { "splash.css": "splash*.styl.css" },
    "requireConfig": {
      "paths": { "legacy": "lib/legacy" },
      "shim": { "legacy": { "exports": "Legacy" } }
    }
  }"#;
  let pipeline = Pipeline::new(project.raw_options(config)).unwrap();

  let report = pipeline.run(&["build"]).await.unwrap();
  let executed = report.executed.iter().map(ToString::to_string).collect::<Vec<_>>();
  let position = |task: &str| executed.iter().position(|done| done == task).unwrap();
  assert!(position("templates_build_sync") < position("js_bundle_sync"));
  assert!(position("css_build_sync") < position("imgurls_write"));
  assert!(position("js_sourcemaps_concat") < position("js_sourcemaps_patch_url"));
  assert_eq!(executed.last().map(String::as_str), Some("build"));

  assert_eq!(project.read("src/media/build_id.txt"), pipeline.build_id());
  for artifact in [
    "src/templates.js",
    "src/media/css/include.css",
    "src/media/css/maps/include.css.map",
    "src/media/css/splash.css",
    "src/media/js/include.js",
    "src/media/js/maps/include.js.map",
    "src/media/imgurls.txt",
  ] {
    assert!(project.exists(artifact), "{artifact} should be written");
  }
  assert!(project.read("src/media/js/include.js").ends_with("sourceMappingURL=maps/include.js.map"));
  assert!(project.read("src/media/imgurls.txt").starts_with("https://localhost/media/img/foo.png?b="));
}

#[tokio::test]
async fn clean_removes_generated_files() {
  let project = Project::new();
  project
    .with_styles()
    .write("src/templates.js", "")
    .write("src/media/build_id.txt", "1")
    .write("src/media/css/a.styl.css", "")
    .write("src/media/js/include.js", "");
  let pipeline = Pipeline::new(project.raw_options("{}")).unwrap();

  pipeline.run(&["clean"]).await.unwrap();
  assert!(!project.exists("src/templates.js"));
  assert!(!project.exists("src/media/build_id.txt"));
  assert!(!project.exists("src/media/css/a.styl.css"));
  assert!(!project.exists("src/media/js/include.js"));
  assert!(project.exists("src/media/css/a.styl"));
}

#[tokio::test]
async fn lint_reports_syntax_errors() {
  let project = Project::new();
  project.with_scripts();
  let pipeline = Pipeline::new(project.raw_options("{}")).unwrap();
  pipeline.run(&["lint"]).await.unwrap();

  project.write("src/media/js/views/broken.js", "define(function () {\n  return ;;}}\n");
  let err = pipeline.run(&["lint"]).await.unwrap_err();
  assert!(matches!(&err, TaskError::Failed { task, .. } if task == "lint"));
}

#[tokio::test]
async fn unknown_tasks_are_rejected() {
  let project = Project::new();
  let pipeline = Pipeline::new(project.raw_options("{}")).unwrap();
  assert!(pipeline.task_names().contains(&"js_sourcemaps_patch_url"));

  let err = pipeline.run(&["deploy"]).await.unwrap_err();
  assert!(matches!(err, TaskError::UnknownTask(name) if name == "deploy"));
}
