//! Symbol-table construction, type inference, constant folding, and
//! dead-output analysis: the phase between the parser and the pattern
//! matcher.
//!
//! Grounded on `faxc-sem`'s crate split (`scope.rs`/`types.rs`/`lib.rs`),
//! narrowed to the much smaller type system this language actually has -
//! see `ty.rs`'s doc comment for why `faxc-sem::types.rs`'s
//! unification-based `Type` isn't reused wholesale.

pub mod def;
pub mod hir;
mod infer;
pub mod scope;
pub mod ty;

use tg_par::ast::Program;
use tg_util::{Arena, Handler};

use def::DefTable;
use infer::Resolver;

/// Output of a completed analysis: the typed tree plus every definition
/// it refers to by [`def::DefId`].
pub struct Analysis {
    pub program: hir::Program,
    pub defs: DefTable,
}

/// Runs symbol resolution, type inference, and constant folding over a
/// parsed program. `program` is expected to already have every `include`
/// resolved and flattened in (that happens earlier, in `tg-drv`, which
/// has the filesystem access this crate deliberately lacks).
pub fn analyze(program: Program, arena: &mut Arena, handler: &mut Handler) -> Analysis {
    let mut resolver = Resolver::new(arena, handler);
    let program = resolver.resolve_program(program);
    Analysis { program, defs: resolver.into_defs() }
}
