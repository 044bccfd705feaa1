use std::path::Path;

use mediapack_common::{BundleManifest, NormalizedPipelineOptions, OrderHint, artifacts};
use mediapack_fs::FileSystem;
use mediapack_sourcemap::{
  SourceJoiner, SourceMapBuilder, SourceMapSource, rewrite_map_sources, set_map_fields,
};
use mediapack_utils::{
  rayon::{IntoParallelRefIterator, ParallelIterator},
  xxhash::xxhash_hex,
};

use super::{
  cachebust::cachebust_urls,
  css_minifier::{MinifiedCss, minify_css},
};

#[derive(Debug, Default)]
pub struct AggregateReport {
  /// Stylesheet names in bundle order.
  pub included: Vec<String>,
  pub failures: Vec<(String, anyhow::Error)>,
}

/// Stylesheets of the aggregate bundle in the order the document links them.
///
/// Excluded names and names without a file are dropped.
pub fn aggregate_order(
  hint: &OrderHint,
  manifest: &BundleManifest,
  exists: impl Fn(&str) -> bool,
) -> Vec<String> {
  hint
    .names()
    .iter()
    .filter(|name| {
      if manifest.is_excluded(name, artifacts::INCLUDE_CSS) {
        tracing::debug!("Leaving excluded stylesheet {name} out of {}", artifacts::INCLUDE_CSS);
        return false;
      }
      if !exists(name) {
        tracing::debug!("Linked stylesheet {name} does not exist");
        return false;
      }
      true
    })
    .cloned()
    .collect()
}

/// Marker of a referenced file: a hash of its bytes, or the build id when it cannot be read.
fn url_marker(
  fs: &dyn FileSystem,
  options: &NormalizedPipelineOptions,
  url: &str,
  build_id: &str,
) -> String {
  let root_relative = url.strip_prefix('/').filter(|url| !url.starts_with('/'));
  let path = if let Some(root_relative) = root_relative {
    options.resolve(&options.paths.serve_root).join(root_relative)
  } else if url.contains("://") || url.starts_with("//") {
    return build_id.to_string();
  } else {
    options.css_dest_dir().join(url)
  };
  fs.read(&path).map_or_else(|_| build_id.to_string(), |bytes| xxhash_hex(&bytes, 8))
}

pub fn build_aggregate(
  fs: &dyn FileSystem,
  options: &NormalizedPipelineOptions,
  build_id: &str,
) -> anyhow::Result<AggregateReport> {
  let document_path = options.resolve(&options.paths.index_html);
  let document = fs
    .read_to_string(&document_path)
    .map_err(|err| anyhow::anyhow!("Failed to read {}: {err}", document_path.display()))?;

  let css_dest = options.css_dest_dir();
  let names = aggregate_order(&OrderHint::scan(&document), &options.css_bundles, |name| {
    fs.is_file(&css_dest.join(name))
  });

  let minified = names
    .par_iter()
    .map(|name| {
      let result = fs.read_to_string(&css_dest.join(name)).map_err(anyhow::Error::from).and_then(
        |source| {
          let busted = cachebust_urls(&source, |url| url_marker(fs, options, url, build_id));
          minify_css(name, &busted, true)
        },
      );
      (name, result)
    })
    .collect::<Vec<_>>();

  let mut report = AggregateReport::default();
  let mut joiner = SourceJoiner::default();
  for (name, result) in minified {
    match result {
      Ok(MinifiedCss { code, map }) => {
        joiner.append_source(SourceMapSource::new(code, map));
        report.included.push(name.clone());
      }
      Err(err) => {
        tracing::error!("{name}: {err}");
        report.failures.push((name.clone(), err));
      }
    }
  }

  let (mut code, map) = joiner.join();
  let map_name = artifacts::source_map_file(artifacts::INCLUDE_CSS);
  code.push_str(&format!("\n/*# sourceMappingURL={}/{map_name} */", artifacts::MAPS_DIR));
  fs.write(&css_dest.join(artifacts::INCLUDE_CSS), code.as_bytes())?;

  // The comment is always there, so the map is too, even with nothing in it.
  let map = map.unwrap_or_else(|| SourceMapBuilder::default().into_sourcemap());
  write_aggregate_map(fs, &css_dest, &map.to_json_string())?;
  Ok(report)
}

/// Map sources are stylesheet names; the map sits in `maps/`, one level below them.
fn write_aggregate_map(fs: &dyn FileSystem, css_dest: &Path, json: &str) -> anyhow::Result<()> {
  let json = rewrite_map_sources(json, |source| {
    Some(format!("../{}", source.trim_start_matches('/')))
  })?;
  let json = set_map_fields(&json, Some(artifacts::INCLUDE_CSS), None)?;
  let path =
    css_dest.join(artifacts::MAPS_DIR).join(artifacts::source_map_file(artifacts::INCLUDE_CSS));
  fs.write(&path, json.as_bytes())?;
  Ok(())
}

#[test]
fn order_follows_the_document() {
  let hint = OrderHint::scan(
    r#"<link href="/media/css/b.styl.css">
    <link href="/media/css/splash.css">
    <link href="/media/css/missing.styl.css">
    <link href="/media/css/a.styl.css">"#,
  );
  let mut bundles = mediapack_utils::indexmap::FxIndexMap::default();
  bundles.insert("splash.css".to_string(), "splash*.styl.css".to_string());
  let manifest = BundleManifest::new(bundles, vec![]);

  let order = aggregate_order(&hint, &manifest, |name| name != "missing.styl.css");
  assert_eq!(order, ["b.styl.css", "a.styl.css"]);
}
