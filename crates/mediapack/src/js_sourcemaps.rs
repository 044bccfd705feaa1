//! Stitches the loader and module bundles into the served `include.js` and repairs its map.

use std::path::Path;

use mediapack_common::{NormalizedPipelineOptions, artifacts};
use mediapack_fs::FileSystem;
use mediapack_sourcemap::{
  SourceJoiner, SourceMap, SourceMapSource, patch_source_mapping_url, rewrite_map_sources,
  set_map_fields, strip_source_mapping_url,
};
use mediapack_utils::path_ext::PathExt;

use crate::module_bundler::{ALMOND_SOURCE_NAME, INIT_SOURCE_NAME};

/// The served map lives one directory below the bundle.
pub const SOURCE_ROOT: &str = "../";

fn include_map_path(options: &NormalizedPipelineOptions) -> std::path::PathBuf {
  options
    .js_dest_dir()
    .join(artifacts::MAPS_DIR)
    .join(artifacts::source_map_file(artifacts::INCLUDE_JS))
}

fn served_map_url() -> String {
  format!("{}/{}", artifacts::MAPS_DIR, artifacts::source_map_file(artifacts::INCLUDE_JS))
}

fn read_map(fs: &dyn FileSystem, path: &Path) -> anyhow::Result<SourceMap> {
  let json = fs
    .read_to_string(path)
    .map_err(|err| anyhow::anyhow!("Failed to read {}: {err}", path.display()))?;
  SourceMap::from_json_string(&json)
    .map_err(|err| anyhow::anyhow!("Invalid source map {}: {err:?}", path.display()))
}

/// Loader first, then modules. Module positions move down by the loader's lines plus the joining
/// newline. Trailing `sourceMappingURL` comments are dropped from both halves.
pub fn merge_bundles(
  loader_code: &str,
  loader_map: Option<SourceMap>,
  module_code: &str,
  module_map: Option<SourceMap>,
) -> (String, Option<SourceMap>) {
  let mut joiner = SourceJoiner::default();
  joiner.append_source(SourceMapSource::new(
    strip_source_mapping_url(loader_code).to_string(),
    loader_map,
  ));
  joiner.append_source(SourceMapSource::new(
    strip_source_mapping_url(module_code).to_string(),
    module_map,
  ));
  joiner.join()
}

pub fn merge_source_maps(
  fs: &dyn FileSystem,
  options: &NormalizedPipelineOptions,
) -> anyhow::Result<()> {
  let js_dest = options.js_dest_dir();
  let read_bundle = |name: &str| -> anyhow::Result<(String, SourceMap)> {
    let path = js_dest.join(name);
    let code = fs
      .read_to_string(&path)
      .map_err(|err| anyhow::anyhow!("Failed to read {}: {err}", path.display()))?;
    let map = read_map(fs, &js_dest.join(artifacts::source_map_file(name)))?;
    Ok((code, map))
  };

  let (loader_code, loader_map) = read_bundle(artifacts::LOADER_JS)?;
  let (module_code, module_map) = read_bundle(artifacts::INCLUDE_JS)?;
  let (code, map) = merge_bundles(&loader_code, Some(loader_map), &module_code, Some(module_map));

  fs.write(&js_dest.join(artifacts::INCLUDE_JS), code.as_bytes())?;
  if let Some(map) = map {
    let json =
      set_map_fields(&map.to_json_string(), Some(artifacts::INCLUDE_JS), Some(SOURCE_ROOT))?;
    fs.write(&include_map_path(options), json.as_bytes())?;
  }
  Ok(())
}

/// Points the loader's placeholder source names at the files as they are served.
pub fn patch_map_sources(
  fs: &dyn FileSystem,
  options: &NormalizedPipelineOptions,
) -> anyhow::Result<()> {
  let js_dest = options.js_dest_dir();
  let almond = options.resolve(&options.paths.almond).relative_slash(&js_dest);
  let init = options.resolve(&options.paths.init).relative_slash(&js_dest);

  let path = include_map_path(options);
  let json = fs.read_to_string(&path)?;
  let patched = rewrite_map_sources(&json, |source| match source {
    ALMOND_SOURCE_NAME => Some(almond.clone()),
    INIT_SOURCE_NAME => Some(init.clone()),
    _ => None,
  })?;
  fs.write(&path, patched.as_bytes())?;
  Ok(())
}

pub fn patch_bundle_url(
  fs: &dyn FileSystem,
  options: &NormalizedPipelineOptions,
) -> anyhow::Result<()> {
  let path = options.js_dest_dir().join(artifacts::INCLUDE_JS);
  let code = fs.read_to_string(&path)?;
  let patched = patch_source_mapping_url(&code, &served_map_url());
  if patched != code {
    fs.write(&path, patched.as_bytes())?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use mediapack_ecmascript::EcmaCompiler;
  use mediapack_sourcemap::{lines_count, original_position};

  use super::merge_bundles;

  #[test]
  fn module_positions_follow_the_loader() {
    let loader = EcmaCompiler::minify_source(
      "var define;\nfunction boot() { return 1; }\nboot();\n",
      "almond.js",
    )
    .unwrap();
    let module =
      EcmaCompiler::minify_source("define(\"main\", function () { return 2; });\n", "main.js")
        .unwrap();

    let loader_code = format!("{}\n//# sourceMappingURL=loader.js.map", loader.code);
    let (code, map) = merge_bundles(&loader_code, loader.map, &module.code, module.map);
    assert!(!code.contains("sourceMappingURL"));

    let map = map.unwrap();
    let module_line = lines_count(loader.code.as_str()) + 1;
    let (source, line, _) = original_position(&map, module_line, u32::MAX).unwrap();
    assert_eq!(source, "main.js");
    assert_eq!(line, 0);

    let (source, ..) = original_position(&map, 0, u32::MAX).unwrap();
    assert_eq!(source, "almond.js");
  }
}
