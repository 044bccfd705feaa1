pub mod normalize_options;
pub mod write_with_map;
