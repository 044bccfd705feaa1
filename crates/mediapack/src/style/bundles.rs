use std::path::PathBuf;

use mediapack_common::NormalizedPipelineOptions;
use mediapack_fs::FileSystem;
use mediapack_utils::path_ext::PathExt;

use super::css_minifier::minify_css;

/// Writes every configured secondary bundle into the CSS destination.
pub fn build_bundles(
  fs: &dyn FileSystem,
  options: &NormalizedPipelineOptions,
) -> anyhow::Result<Vec<PathBuf>> {
  let css_dest = options.css_dest_dir();
  let mut written = vec![];

  for (name, pattern) in &options.css_bundles.bundles {
    let output = css_dest.join(name);
    let parts = fs
      .glob(&css_dest.join(pattern).expect_to_slash())?
      .into_iter()
      .filter(|part| *part != output)
      .collect::<Vec<_>>();

    let mut source = String::new();
    for part in &parts {
      source.push_str(&fs.read_to_string(part)?);
      source.push('\n');
    }

    let minified = minify_css(name, &source, false)?;
    fs.write(&output, minified.code.as_bytes())?;
    tracing::debug!("Bundled {} stylesheets into {name}", parts.len());
    written.push(output);
  }

  Ok(written)
}
