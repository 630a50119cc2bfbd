//! Pattern and sum matching: turns a plain string (or array of strings)
//! into a typed [`PatternInstance`] by walking a pattern's entry list, or
//! by picking whichever sum member consumes the most of it.
//!
//! Ported from the original implementation's `parse_pattern.h`, which
//! this crate follows closely enough that its backtracking shape - greedy
//! word entries that shrink on failure, deterministic everything else -
//! should be recognizable line for line.

mod cursor;
pub mod error;
mod pattern;
mod sum;
pub mod value;

pub use error::MatchError;
pub use value::{CustomValue, PatternInstance, Value};

use tg_sem::def::{Def, DefId, DefTable};
use tg_util::{Arena, Diagnostic, Handler, Span};

/// Matches `text` against the pattern or sum named by `def_id`, requiring
/// the whole of `text` (trailing whitespace aside) to be consumed. Used
/// both as the top-level entry point and recursively, by a pattern's own
/// [`tg_par::ast::MatchEntry::Custom`] entries, to match a nested
/// pattern/sum against a candidate word span.
pub fn match_definition(defs: &DefTable, arena: &Arena, handler: &mut Handler, def_id: DefId, text: &str) -> Option<Value> {
    match defs.get(def_id) {
        Def::Pattern(p) => {
            let values = pattern::match_entries_whole(defs, arena, handler, &p.entries, text)?;
            Some(pattern::build_instance(def_id, p, values))
        }
        Def::Sum(s) => {
            let (value, end) = sum::match_sum_span(defs, arena, handler, s, text)?;
            let mut trailing = cursor::Cursor::new(text);
            trailing.set_pos(end);
            trailing.skip_whitespace();
            if trailing.is_at_end() {
                Some(value)
            } else {
                None
            }
        }
        Def::Generator(_) | Def::Local(_) => None,
    }
}

/// Matches a runtime value against a pattern/sum definition (spec §4.5's
/// array-shaped targets rule): a string is matched directly, an array
/// matches element-wise and produces an array of pattern instances. On
/// failure, emits a two-part diagnostic pointing at both `origin` (where
/// the mismatched value came from) and the pattern/sum's own definition.
pub fn match_value(
    defs: &DefTable,
    arena: &Arena,
    handler: &mut Handler,
    def_id: DefId,
    input: &Value,
    origin: Span,
) -> Option<Value> {
    match input {
        Value::Str(s) => match match_definition(defs, arena, handler, def_id, s) {
            Some(v) => Some(v),
            None => {
                let err = MatchError::PatternMismatch { text: s.to_string(), pattern: definition_name(defs, arena, def_id) };
                report(defs, handler, def_id, err, origin);
                None
            }
        },
        Value::Array(items) => {
            let items = items.borrow();
            let mut out = Vec::with_capacity(items.len());
            for item in items.iter() {
                out.push(match_value(defs, arena, handler, def_id, item, origin)?);
            }
            Some(Value::array(out))
        }
        other => {
            let err = MatchError::UnmatchableType {
                value_type: other.type_name(),
                pattern: definition_name(defs, arena, def_id),
            };
            report(defs, handler, def_id, err, origin);
            None
        }
    }
}

fn definition_name(defs: &DefTable, arena: &Arena, def_id: DefId) -> String {
    match defs.get(def_id) {
        Def::Pattern(p) => arena.resolve(p.name).to_string(),
        Def::Sum(s) => arena.resolve(s.name).to_string(),
        _ => String::new(),
    }
}

fn definition_span(defs: &DefTable, def_id: DefId) -> Option<Span> {
    match defs.get(def_id) {
        Def::Pattern(p) => Some(p.span),
        Def::Sum(s) => Some(s.span),
        _ => None,
    }
}

fn report(defs: &DefTable, handler: &mut Handler, def_id: DefId, err: MatchError, origin: Span) {
    let mut diag = Diagnostic::error(err.to_string(), origin);
    if let Some(span) = definition_span(defs, def_id) {
        diag = diag.with_secondary(span, "definition");
    }
    handler.emit(diag);
}
