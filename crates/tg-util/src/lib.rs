//! tg-util - arena, interning, source locations, and diagnostics.
//!
//! Every other `tg-*` crate builds on the handful of primitives collected
//! here: a bump-allocated [`Arena`] that owns interned strings for the
//! lifetime of one compilation, typed-index vectors ([`IndexVec`]) used by
//! every later phase to avoid mixing up unrelated index spaces (a
//! `DefId` is not a `ScopeId` is not a stack slot), source locations
//! ([`Span`], [`SourceMap`]), and a [`diagnostic::Handler`] that renders
//! errors the way the rest of the pipeline expects.
//!
//! The spec this implements is explicitly single-threaded and
//! non-reentrant (one evaluator, one arena, no shared mutable state across
//! threads), so unlike a typical compiler's global interner this one is
//! plain `&mut self` - no locks, no atomics.

mod arena;
mod index_vec;
pub mod diagnostic;
pub mod span;
pub mod symbol;

pub use arena::Arena;
pub use diagnostic::{Diagnostic, Handler, Level};
pub use index_vec::{Idx, IndexVec};
pub use span::{FileId, SourceMap, Span};
pub use symbol::Symbol;
