use lightningcss::{
  printer::PrinterOptions,
  stylesheet::{MinifyOptions, ParserFlags, ParserOptions, StyleSheet},
  targets::{Browsers, Targets},
};
use mediapack_sourcemap::SourceMap;

/// Browsers old enough that nesting is always lowered to plain selectors.
pub fn flattening_targets() -> Targets {
  Targets::from(Browsers {
    chrome: Some(80 << 16),
    firefox: Some(78 << 16),
    safari: Some(13 << 16),
    ..Browsers::default()
  })
}

#[derive(Debug)]
pub struct MinifiedCss {
  pub code: String,
  pub map: Option<SourceMap>,
}

/// Minifies one stylesheet. With `with_map` the map has `name` as its only source.
pub fn minify_css(name: &str, source: &str, with_map: bool) -> anyhow::Result<MinifiedCss> {
  let mut stylesheet = StyleSheet::parse(
    source,
    ParserOptions {
      filename: name.to_string(),
      flags: ParserFlags::NESTING,
      ..ParserOptions::default()
    },
  )
  .map_err(|err| anyhow::anyhow!("{name}: {err}"))?;

  let targets = flattening_targets();
  stylesheet
    .minify(MinifyOptions { targets, ..MinifyOptions::default() })
    .map_err(|err| anyhow::anyhow!("{name}: {err}"))?;

  let mut source_map = if with_map {
    let mut map = parcel_sourcemap::SourceMap::new("/");
    let source_index = map.add_source(name);
    map
      .set_source_content(source_index as usize, source)
      .map_err(|err| anyhow::anyhow!("{name}: {err:?}"))?;
    Some(map)
  } else {
    None
  };

  let ret = stylesheet
    .to_css(PrinterOptions {
      minify: true,
      source_map: source_map.as_mut(),
      targets,
      ..PrinterOptions::default()
    })
    .map_err(|err| anyhow::anyhow!("{name}: {err}"))?;

  let map = match source_map {
    Some(mut map) => {
      let json = map.to_json(None).map_err(|err| anyhow::anyhow!("{name}: {err:?}"))?;
      Some(
        SourceMap::from_json_string(&json)
          .map_err(|err| anyhow::anyhow!("Invalid source map for {name}: {err:?}"))?,
      )
    }
    None => None,
  };

  Ok(MinifiedCss { code: ret.code, map })
}

#[cfg(test)]
mod tests {
  use super::minify_css;

  #[test]
  fn minifies_with_a_single_source() {
    let ret = minify_css("app.styl.css", "body {\n  color: #ff0000;\n}\n", true).unwrap();
    assert_eq!(ret.code, "body{color:red}");
    let map = ret.map.unwrap();
    let sources = map.get_sources().map(ToString::to_string).collect::<Vec<_>>();
    assert_eq!(sources.len(), 1);
    assert!(sources[0].ends_with("app.styl.css"));
  }
}
