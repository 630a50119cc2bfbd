//! The free functions (spec §4.7), ported from `builtin_functions.h`:
//! `range(end)`/`range(begin, end)`, and `max`/`min`, which accept either
//! a variadic argument list or a single array argument.
//!
//! Unlike the original's inclusive `{min, max}` range, `range` here is
//! half-open (`range(3)` yields `0, 1, 2`) to match how every other
//! length-like quantity in this language counts - see DESIGN.md.

use tg_match::Value;

pub fn call(name: &str, args: &[Value]) -> Option<Result<Value, String>> {
    match name {
        "range" => Some(range(args)),
        "max" => Some(extremum(args, true)),
        "min" => Some(extremum(args, false)),
        _ => None,
    }
}

fn range(args: &[Value]) -> Result<Value, String> {
    match args.len() {
        1 => {
            let end = int_arg(&args[0])?;
            Ok(Value::IntRange(0, end))
        }
        2 => {
            let begin = int_arg(&args[0])?;
            let end = int_arg(&args[1])?;
            Ok(Value::IntRange(begin, end))
        }
        n => Err(format!("range expects 1 or 2 arguments, got {n}")),
    }
}

/// `max`/`min` operate either over their whole argument list, or - when
/// called with exactly one array argument - over that array's elements.
/// An empty input isn't an error: it returns `0`, matching the original.
fn extremum(args: &[Value], want_max: bool) -> Result<Value, String> {
    let candidates: Vec<Value> = if let [Value::Array(items)] = args {
        items.borrow().clone()
    } else {
        args.to_vec()
    };
    if candidates.is_empty() {
        return Ok(Value::Int(0));
    }
    let mut best = candidates[0].clone();
    let mut best_key = int_arg(&best)?;
    for candidate in &candidates[1..] {
        let key = int_arg(candidate)?;
        let better = if want_max { key > best_key } else { key < best_key };
        if better {
            best_key = key;
            best = candidate.clone();
        }
    }
    Ok(best)
}

fn int_arg(v: &Value) -> Result<i64, String> {
    v.as_int().ok_or_else(|| format!("expected an int argument, got {}", v.type_name()))
}
