mod lines_count;
mod patch;
mod source;
mod source_joiner;

pub use crate::{
  lines_count::lines_count,
  patch::{
    has_source_mapping_url, original_position, patch_source_mapping_url, rewrite_map_sources,
    set_map_fields, strip_source_mapping_url,
  },
  source::{Source, SourceMapSource},
  source_joiner::SourceJoiner,
};
pub use oxc_sourcemap::{ConcatSourceMapBuilder, SourceMap, SourceMapBuilder};
