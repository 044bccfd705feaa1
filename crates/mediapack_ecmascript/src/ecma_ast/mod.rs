pub mod program_cell;

use std::fmt::Debug;

use arcstr::ArcStr;
use oxc::{allocator::Allocator, ast::ast::Program, span::SourceType};

use self::program_cell::ProgramCell;

/// A parsed AMD module or script.
///
/// To rewrite the program, go through `ast.program.with_mut(|fields| { fields.program; })`.
pub struct EcmaAst {
  pub program: ProgramCell,
  pub source_type: SourceType,
}

impl EcmaAst {
  pub fn source(&self) -> &ArcStr {
    &self.program.borrow_owner().source
  }

  pub fn allocator(&self) -> &Allocator {
    &self.program.borrow_owner().allocator
  }

  pub fn program(&self) -> &Program {
    &self.program.borrow_dependent().program
  }

  /// Whether the module has any top level code at all.
  pub fn is_empty(&self) -> bool {
    let program = self.program();
    program.body.is_empty() && program.directives.is_empty()
  }
}

impl Debug for EcmaAst {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("EcmaAst").field("source", &self.source()).finish_non_exhaustive()
  }
}

// SAFETY: the arena is only ever touched through `&mut EcmaAst` or through shared references that
// never allocate, so moving the cell across threads cannot race on the allocator.
unsafe impl Send for EcmaAst {}
unsafe impl Sync for EcmaAst {}
