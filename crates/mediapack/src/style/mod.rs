//! Stylesheets: compile, secondary bundles and the aggregate `include.css`.

pub mod aggregate;
pub mod bundles;
pub mod cachebust;
pub mod compile;
pub mod css_minifier;
pub mod preprocessor;

pub use self::{
  aggregate::{AggregateReport, build_aggregate},
  bundles::build_bundles,
  compile::{CompileReport, compile_all, compile_files},
  preprocessor::{CommandPreprocessor, LightningPreprocessor, StylePreprocessor, create_preprocessor},
};
