//! The list of cache-busted image urls an appcache manifest is generated from.

use mediapack_common::{NormalizedPipelineOptions, artifacts};
use mediapack_fs::FileSystem;
use mediapack_utils::indexmap::FxIndexSet;

use crate::style::cachebust::{css_urls, url_path};

const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "gif", "svg", "webp", "ico", "bmp"];

/// Collapses `.` and `..` segments of an absolute url path.
fn normalize_url_path(path: &str) -> String {
  let mut segments: Vec<&str> = vec![];
  for segment in path.split('/') {
    match segment {
      "" | "." => {}
      ".." => {
        segments.pop();
      }
      segment => segments.push(segment),
    }
  }
  let mut normalized = format!("/{}", segments.join("/"));
  if path.ends_with('/') && normalized.len() > 1 {
    normalized.push('/');
  }
  normalized
}

/// The absolute url a stylesheet reference points at, as seen from the served CSS directory.
pub fn absolutify(url: &str, origin: &str) -> Option<String> {
  if url.starts_with("data:") || url.starts_with('#') {
    return None;
  }
  if url.starts_with("http://") || url.starts_with("https://") {
    return Some(url.to_string());
  }
  if url.starts_with("//") {
    return Some(format!("https:{url}"));
  }

  let path_end = url.find(['?', '#']).unwrap_or(url.len());
  let (path, rest) = url.split_at(path_end);
  let absolute = if path.starts_with('/') {
    normalize_url_path(path)
  } else {
    normalize_url_path(&format!("{}{path}", artifacts::SERVED_CSS_PREFIX))
  };
  Some(format!("{origin}{absolute}{rest}"))
}

pub fn is_image_url(url: &str) -> bool {
  let path = url_path(url);
  path
    .rsplit_once('.')
    .is_some_and(|(_, ext)| IMAGE_EXTENSIONS.iter().any(|image| ext.eq_ignore_ascii_case(image)))
}

/// Image urls of `css` in document order, absolute and listed once.
pub fn extract_image_urls(css: &str, origin: &str) -> Vec<String> {
  css_urls(css)
    .filter_map(|url| absolutify(url, origin))
    .filter(|url| is_image_url(url))
    .collect::<FxIndexSet<_>>()
    .into_iter()
    .collect()
}

pub fn write_image_urls(
  fs: &dyn FileSystem,
  options: &NormalizedPipelineOptions,
) -> anyhow::Result<usize> {
  let bundle = options.css_dest_dir().join(artifacts::INCLUDE_CSS);
  let css = fs
    .read_to_string(&bundle)
    .map_err(|err| anyhow::anyhow!("Failed to read {}: {err}", bundle.display()))?;

  let urls = extract_image_urls(&css, &options.image_origin);
  fs.write(&options.media_dir().join(artifacts::IMGURLS_TXT), urls.join("\n").as_bytes())?;
  Ok(urls.len())
}

#[cfg(test)]
mod tests {
  use super::{absolutify, extract_image_urls};

  #[test]
  fn resolves_against_the_served_css_directory() {
    let origin = "https://localhost";
    assert_eq!(
      absolutify("../img/a.png?b=1", origin).as_deref(),
      Some("https://localhost/media/img/a.png?b=1")
    );
    assert_eq!(absolutify("b.gif", origin).as_deref(), Some("https://localhost/media/css/b.gif"));
    assert_eq!(absolutify("//cdn/c.png", origin).as_deref(), Some("https://cdn/c.png"));
    assert_eq!(absolutify("data:image/png;base64,AA", origin), None);
  }

  #[test]
  fn keeps_images_once_in_document_order() {
    let css = "a{background:url(/media/img/foo.12345.png)}\
               b{background:url(data:image/png;base64,AAAA)}\
               c{src:url(/media/fonts/x.woff)}\
               d{background:url('/media/img/bar.svg?b=2')}\
               e{background:url(/media/img/foo.12345.png)}";
    assert_eq!(
      extract_image_urls(css, "https://localhost"),
      ["https://localhost/media/img/foo.12345.png", "https://localhost/media/img/bar.svg?b=2"]
    );
  }
}
