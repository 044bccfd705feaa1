mod common;

use common::Project;
use mediapack::{
  OsFileSystem, imgurls,
  style::{LightningPreprocessor, build_aggregate, compile_all},
  templates::{StaticPrecompiler, build_templates, compile_templates},
};
use mediapack_ecmascript::EcmaCompiler;
use mediapack_utils::xxhash::xxhash_hex;

#[test]
fn templates_module_is_one_valid_script() {
  let project = Project::new();
  project
    .write("src/templates/a.html", "<h1>{{ title }}</h1>\n")
    .write("src/templates/nested/b.html", "<p>\"quoted\"</p>\n");
  let options = project.options("{}");

  let module = build_templates(&OsFileSystem, &options).unwrap();
  assert_eq!(module.names, ["a", "nested/b"]);

  let code = project.read("src/templates.js");
  assert!(EcmaCompiler::check(&code, EcmaCompiler::script_source_type()).is_empty());
  assert!(code.contains("templates[\"a\"] = "));
  assert!(code.contains("templates[\"nested/b\"] = "));
  assert!(code.contains("define(\"templates\", [\"nunjucks\", \"helpers\"], function(nunjucks) {"));
  assert!(code.ends_with("})();"));
}

#[test]
fn no_templates_still_defines_the_module() {
  let project = Project::new();
  let options = project.options("{}");
  let module = compile_templates(&OsFileSystem, &options, &StaticPrecompiler).unwrap();
  assert!(module.names.is_empty());
  assert!(module.code.starts_with("(function() {\nvar templates = {};\ndefine(\"templates\""));
}

#[test]
fn image_urls_are_absolute_and_listed_once() {
  let project = Project::new();
  project.write(
    "src/media/css/include.css",
    ".a{background:url(/media/img/foo.12345.png)}.b{background:url(../img/bar.svg?b=1)}\
     .c{background:url(/media/img/foo.12345.png)}.d{src:url(/media/fonts/f.woff)}",
  );
  let options = project.options("{}");

  let count = imgurls::write_image_urls(&OsFileSystem, &options).unwrap();
  assert_eq!(count, 2);
  assert_eq!(
    project.read("src/media/imgurls.txt"),
    "https://localhost/media/img/foo.12345.png\nhttps://localhost/media/img/bar.svg?b=1"
  );
}

#[test]
fn image_origin_comes_from_the_config() {
  let project = Project::new();
  project.write("src/media/css/include.css", ".a{background:url(/media/img/foo.png)}");
  let options = project.options(r#"{ "imageOrigin": "https://marketplace.example/" }"#);

  imgurls::write_image_urls(&OsFileSystem, &options).unwrap();
  assert_eq!(project.read("src/media/imgurls.txt"), "https://marketplace.example/media/img/foo.png");
}

#[test]
fn image_urls_come_from_the_built_aggregate() {
  let project = Project::new();
  project.with_styles().write(
    "src/media/css/c.styl",
    ".c {\n  background: url(../img/bar.svg) no-repeat;\n  & i { background: url(\"data:image/png;base64,AAAA\"); }\n}\n",
  );
  project.write(
    "src/index.html",
    "<link rel=\"stylesheet\" href=\"/media/css/a.styl.css\">\n<link rel=\"stylesheet\" href=\"/media/css/c.styl.css\">\n",
  );
  let options = project.options("{}");
  let fs = OsFileSystem;

  compile_all(&fs, &options, &LightningPreprocessor).unwrap();
  build_aggregate(&fs, &options, "1700000000000").unwrap();
  assert_eq!(imgurls::write_image_urls(&fs, &options).unwrap(), 2);

  let marker = xxhash_hex(b"not really a png", 8);
  assert_eq!(
    project.read("src/media/imgurls.txt"),
    format!(
      "https://localhost/media/img/foo.png?b={marker}\nhttps://localhost/media/img/bar.svg?b=1700000000000"
    )
  );
}
