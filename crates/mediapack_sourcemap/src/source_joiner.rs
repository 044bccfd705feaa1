use oxc_sourcemap::{ConcatSourceMapBuilder, SourceMap};

use crate::source::Source;

/// Concatenates sources with a `\n` between each of them and stitches their maps together.
///
/// Every map is shifted by the number of lines emitted before its source, so a position in the
/// joined output resolves to the same origin as the matching position in the source it came from.
#[derive(Default)]
pub struct SourceJoiner<'source> {
  sources: Vec<Box<dyn Source + Send + 'source>>,
}

impl<'source> SourceJoiner<'source> {
  pub fn append_source<T: Source + Send + 'source>(&mut self, source: T) {
    self.sources.push(Box::new(source));
  }

  pub fn is_empty(&self) -> bool {
    self.sources.is_empty()
  }

  pub fn join(&self) -> (String, Option<SourceMap>) {
    let separators = self.sources.len().saturating_sub(1);
    let capacity = self.sources.iter().map(|source| source.content().len()).sum::<usize>();
    let mut code = String::with_capacity(capacity + separators);

    let mut map_builder: Option<ConcatSourceMapBuilder> = None;
    let mut line_offset = 0;

    for (index, source) in self.sources.iter().enumerate() {
      if index > 0 {
        code.push('\n');
        line_offset += 1;
      }
      code.push_str(source.content());
      if let Some(map) = source.sourcemap() {
        map_builder.get_or_insert_with(ConcatSourceMapBuilder::default).add_sourcemap(map, line_offset);
      }
      line_offset += source.lines_count();
    }

    (code, map_builder.map(ConcatSourceMapBuilder::into_sourcemap))
  }
}

#[cfg(test)]
mod tests {
  use oxc_sourcemap::SourceMapBuilder;

  use super::SourceJoiner;
  use crate::{original_position, SourceMapSource};

  fn single_line_map(source: &str, lines: u32) -> oxc_sourcemap::SourceMap {
    let mut builder = SourceMapBuilder::default();
    let id = builder.set_source_and_content(source, "");
    for line in 0..lines {
      builder.add_token(line, 0, line, 0, Some(id), None);
    }
    builder.into_sourcemap()
  }

  #[test]
  fn joins_with_newlines() {
    let mut joiner = SourceJoiner::default();
    joiner.append_source("head");
    joiner.append_source("a");
    joiner.append_source(String::from("b\nc"));
    let (code, map) = joiner.join();
    assert_eq!(code, "head\na\nb\nc");
    assert!(map.is_none());
  }

  #[test]
  fn shifts_maps_by_preceding_lines() {
    let mut joiner = SourceJoiner::default();
    joiner.append_source(SourceMapSource::new("x\ny".to_string(), Some(single_line_map("one.js", 2))));
    joiner.append_source(SourceMapSource::new("z".to_string(), Some(single_line_map("two.js", 1))));
    let (code, map) = joiner.join();
    assert_eq!(code, "x\ny\nz");

    let map = map.unwrap();
    assert_eq!(original_position(&map, 1, 0), Some(("one.js".to_string(), 1, 0)));
    assert_eq!(original_position(&map, 2, 0), Some(("two.js".to_string(), 0, 0)));
  }
}
