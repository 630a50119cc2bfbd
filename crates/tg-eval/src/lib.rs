//! The tree-walking evaluator (spec §4.6): runs a lowered [`hir::Program`]
//! to completion and returns the text it produced.

mod error;
mod eval;
mod flow;
mod format;
mod frame;
mod writer;

pub use error::EvalError;
pub use eval::Evaluator;
pub use flow::Flow;
pub use frame::Frame;
pub use writer::Writer;

use tg_sem::def::DefTable;
use tg_sem::hir;
use tg_util::{Arena, Handler};

use tg_match::Value;

/// Runs `program` to completion against `defs`/`arena`, with `argv` bound
/// into the implicit local every program can reference (spec §4.9), and
/// returns the text it wrote. Diagnostics from evaluation-time errors
/// (type mismatches, division by zero, failed matches, ...) are emitted
/// to `handler` rather than aborting the run - the caller decides the
/// exit code from `handler.has_errors()`.
pub fn run(program: &hir::Program, defs: &DefTable, arena: &Arena, handler: &mut Handler, argv: Vec<String>) -> String {
    let mut top_frame = Frame::new(program.stack_size);
    if let Some(local) = defs.local(program.argv_def) {
        let values = argv.into_iter().map(Value::str).collect();
        top_frame.set(local.stack_slot, Value::array(values));
    }

    let mut evaluator = Evaluator::new(defs, arena, handler, top_frame);
    let mut writer = Writer::new();
    evaluator.eval_stmts(&program.items, &mut writer);
    let mut output = writer.into_string();
    // Top-level output is terminated by one final newline, the same way a
    // generator call flushes a still-pending one (spec §4.6 point 5) -
    // applied here unconditionally since the top level has no enclosing
    // segment to own that trailing newline itself (spec §8's "whitespace
    // conservation" property: a single literal line "X" at top level
    // evaluates to "X\n"). An empty program still produces no output.
    if !output.is_empty() {
        output.push('\n');
    }
    output
}
