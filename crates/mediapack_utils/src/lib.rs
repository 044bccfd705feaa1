pub mod ecmascript;
pub mod glob_base;
pub mod indexmap;
pub mod path_ext;
pub mod rayon;
pub mod xxhash;
