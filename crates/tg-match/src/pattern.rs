//! Backtracking pattern entry matcher, ported from `parse_pattern.h`.
//!
//! The whole pattern is matched by recursively walking its entry list:
//! word entries are tried greedily (consume as many words as `max` allows)
//! and backtrack downward to `min` if a later entry then fails to match,
//! everything else (an expression token, a builtin scalar, a literal word,
//! or a nested pattern/sum) consumes deterministically and simply fails
//! outright if it can't, letting the backtracking happen one level up at
//! the nearest preceding word entry.

use tg_par::ast;
use tg_sem::def::DefTable;
use tg_util::{Arena, Handler};

use crate::cursor::Cursor;
use crate::value::{PatternInstance, Value};

/// Matches `entries` against as much of `text` as it can, starting at the
/// front. Returns the per-entry values (parallel to `entries`) and the
/// byte offset of the first unconsumed character on success.
pub(crate) fn match_entries_span(
    defs: &DefTable,
    arena: &Arena,
    handler: &mut Handler,
    entries: &[ast::MatchEntry],
    text: &str,
) -> Option<(Vec<Value>, usize)> {
    let mut cursor = Cursor::new(text);
    let values = match_from(defs, arena, handler, entries, 0, &mut cursor)?;
    Some((values, cursor.pos()))
}

/// Like [`match_entries_span`], but requires every entry to match *and*
/// the whole of `text` (ignoring trailing whitespace) to be consumed -
/// the rule for a pattern matched directly against a value, rather than
/// nested inside another pattern via a [`ast::MatchEntry::Custom`].
pub(crate) fn match_entries_whole(
    defs: &DefTable,
    arena: &Arena,
    handler: &mut Handler,
    entries: &[ast::MatchEntry],
    text: &str,
) -> Option<Vec<Value>> {
    let (values, end) = match_entries_span(defs, arena, handler, entries, text)?;
    let mut trailing = Cursor::new(text);
    trailing.set_pos(end);
    trailing.skip_whitespace();
    if trailing.is_at_end() {
        Some(values)
    } else {
        None
    }
}

fn match_from<'a>(
    defs: &DefTable,
    arena: &Arena,
    handler: &mut Handler,
    entries: &[ast::MatchEntry],
    idx: usize,
    cursor: &mut Cursor<'a>,
) -> Option<Vec<Value>> {
    if idx == entries.len() {
        return Some(Vec::new());
    }
    cursor.skip_whitespace();

    match &entries[idx] {
        ast::MatchEntry::Word { min, max, .. } => match_word_entry(defs, arena, handler, entries, idx, cursor, *min, *max),
        ast::MatchEntry::Expression { .. } => {
            let mut next = *cursor;
            let token = next.take_expression_token()?;
            let value = Value::str(token);
            let mut rest = match_from(defs, arena, handler, entries, idx + 1, &mut next)?;
            *cursor = next;
            rest.insert(0, value);
            Some(rest)
        }
        ast::MatchEntry::Builtin { ty, .. } => {
            let mut next = *cursor;
            let word = next.take_word()?;
            let value = match arena.resolve(*ty) {
                "bool" => match word {
                    "true" => Value::Bool(true),
                    "false" => Value::Bool(false),
                    _ => return None,
                },
                "int" => Value::Int(word.parse::<i64>().ok()?),
                "string" => Value::str(word),
                _ => return None,
            };
            let mut rest = match_from(defs, arena, handler, entries, idx + 1, &mut next)?;
            *cursor = next;
            rest.insert(0, value);
            Some(rest)
        }
        ast::MatchEntry::Raw { text, .. } => {
            let expected = arena.resolve(*text);
            let mut next = *cursor;
            let word = next.take_word()?;
            if word != expected {
                return None;
            }
            let mut rest = match_from(defs, arena, handler, entries, idx + 1, &mut next)?;
            *cursor = next;
            rest.insert(0, Value::str(word));
            Some(rest)
        }
        ast::MatchEntry::Custom { ty, .. } => match_custom_entry(defs, arena, handler, entries, idx, cursor, *ty),
    }
}

/// Greedily consumes up to `max` words (unbounded if negative), then
/// backtracks downward to `min` until the remaining entries also match -
/// exactly `parse_pattern.h`'s word-range clamp-and-retry loop.
fn match_word_entry<'a>(
    defs: &DefTable,
    arena: &Arena,
    handler: &mut Handler,
    entries: &[ast::MatchEntry],
    idx: usize,
    cursor: &mut Cursor<'a>,
    min: i32,
    max: i32,
) -> Option<Vec<Value>> {
    let cap = if max < 0 { i32::MAX } else { max };
    let start = *cursor;

    let mut boundaries = vec![start.pos()];
    let mut probe = start;
    let mut available = 0i32;
    while available < cap {
        probe.skip_whitespace();
        if probe.take_word().is_none() {
            break;
        }
        available += 1;
        boundaries.push(probe.pos());
    }
    if available < min {
        return None;
    }

    let mut count = available;
    while count >= min {
        let end_pos = boundaries[count as usize];
        let mut next = start;
        next.set_pos(end_pos);
        if let Some(mut rest) = match_from(defs, arena, handler, entries, idx + 1, &mut next) {
            let mut words = Vec::with_capacity(count as usize);
            let mut collect = start;
            for _ in 0..count {
                collect.skip_whitespace();
                words.push(collect.take_word().expect("boundary count must be reachable"));
            }
            let value = if count == 1 {
                Value::str(words[0])
            } else {
                Value::array(words.into_iter().map(Value::str).collect())
            };
            rest.insert(0, value);
            *cursor = next;
            return Some(rest);
        }
        count -= 1;
    }
    None
}

/// A nested pattern/sum reference: tries progressively shorter word spans
/// (longest first) until both the nested definition matches the span and
/// the remaining outer entries match what follows it.
fn match_custom_entry<'a>(
    defs: &DefTable,
    arena: &Arena,
    handler: &mut Handler,
    entries: &[ast::MatchEntry],
    idx: usize,
    cursor: &mut Cursor<'a>,
    ty: tg_util::Symbol,
) -> Option<Vec<Value>> {
    let Some(def_id) = defs.find_by_name(ty) else {
        return None;
    };
    let start = *cursor;
    let mut probe = start;
    let mut boundaries = Vec::new();
    loop {
        probe.skip_whitespace();
        if probe.take_word().is_none() {
            break;
        }
        boundaries.push(probe.pos());
    }

    for &end in boundaries.iter().rev() {
        let span = &start.rest()[..end - start.pos()];
        if let Some(value) = crate::match_definition(defs, arena, handler, def_id, span) {
            let mut next = start;
            next.set_pos(end);
            if let Some(mut rest) = match_from(defs, arena, handler, entries, idx + 1, &mut next) {
                rest.insert(0, value);
                *cursor = next;
                return Some(rest);
            }
        }
    }
    None
}

/// Builds the final [`PatternInstance`] from a successful entry match,
/// projecting the per-entry values down to the pattern's declared fields.
pub(crate) fn build_instance(def_id: tg_sem::def::DefId, pattern: &tg_sem::def::PatternDef, entry_values: Vec<Value>) -> Value {
    let fields = pattern
        .fields
        .iter()
        .map(|f| entry_values.get(f.entry_index).cloned().unwrap_or(Value::Undefined))
        .collect();
    Value::Pattern(std::rc::Rc::new(PatternInstance { def: def_id, fields }))
}
