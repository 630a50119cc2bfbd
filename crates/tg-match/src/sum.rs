//! Sum-type matcher, ported from `parse_pattern.h`: tries every member
//! pattern against the same text and keeps whichever one consumed the
//! most of it. Ties keep the earliest-declared member (a strict
//! `>` comparison, never `>=`, when a later member is checked).

use tg_sem::def::{DefTable, SumDef};
use tg_util::{Arena, Handler};

use crate::pattern::{build_instance, match_entries_span};
use crate::value::Value;

pub(crate) fn match_sum_span(
    defs: &DefTable,
    arena: &Arena,
    handler: &mut Handler,
    sum: &SumDef,
    text: &str,
) -> Option<(Value, usize)> {
    let mut best: Option<(Value, usize)> = None;
    for &member_id in &sum.members {
        let Some(pattern) = defs.pattern(member_id) else { continue };
        if let Some((entry_values, end)) = match_entries_span(defs, arena, handler, &pattern.entries, text) {
            let better = match &best {
                Some((_, best_end)) => end > *best_end,
                None => true,
            };
            if better {
                best = Some((build_instance(member_id, pattern, entry_values), end));
            }
        }
    }
    best
}
