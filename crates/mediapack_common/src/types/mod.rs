pub mod amd_module;
pub mod artifacts;
pub mod bundle_manifest;
pub mod module_id;
pub mod order_hint;
pub mod raw_idx;
pub mod source_set;
