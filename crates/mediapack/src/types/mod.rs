pub mod script_bundle;

use std::sync::Arc;

use mediapack_common::{AmdModule, EcmaAstIdx, ModuleIdx, NormalizedPipelineOptions};
use mediapack_ecmascript::EcmaAst;
use mediapack_fs::OsFileSystem;
use mediapack_resolver::Resolver;
use oxc_index::IndexVec;

pub type IndexModules = IndexVec<ModuleIdx, AmdModule>;
pub type IndexEcmaAst = IndexVec<EcmaAstIdx, (EcmaAst, ModuleIdx)>;

pub type SharedResolver = Arc<Resolver<OsFileSystem>>;
pub type SharedOptions = Arc<NormalizedPipelineOptions>;
