use std::path::Path;

use mediapack_common::artifacts::source_map_file;
use mediapack_fs::FileSystem;
use mediapack_sourcemap::SourceMap;

/// Writes `<dir>/<name>` and, when there is a map, `<dir>/<name>.map` with `file` set to `name`.
pub fn write_with_map(
  fs: &dyn FileSystem,
  dir: &Path,
  name: &str,
  code: &str,
  map: Option<&SourceMap>,
) -> anyhow::Result<()> {
  fs.write(&dir.join(name), code.as_bytes())?;
  if let Some(map) = map {
    let json = mediapack_sourcemap::set_map_fields(&map.to_json_string(), Some(name), None)?;
    fs.write(&dir.join(source_map_file(name)), json.as_bytes())?;
  }
  Ok(())
}
