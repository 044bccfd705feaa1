// Resolution of AMD module ids to files, following the RequireJS `baseUrl` and `paths` rules.

pub mod error;
mod resolver;

pub use crate::{
  error::ResolveError,
  resolver::{Resolution, ResolveReturn, Resolver},
};
