//! Applies a `%`-style [`FormatSpec`] to a value before it's written
//! (spec §4.6): only meaningful for `int`s (base/precision/width), every
//! other value falls back to its ordinary rendering and only `width`
//! still applies.

use tg_par::ast::FormatSpec;
use tg_match::Value;

pub fn apply(value: &Value, spec: &FormatSpec) -> String {
    let mut s = match value.as_int() {
        Some(n) if matches!(value, Value::Int(_)) => format_int(n, spec),
        _ => value.render(),
    };
    if let Some(width) = spec.width {
        let width = width as usize;
        if s.len() < width {
            let pad = " ".repeat(width - s.len());
            s = pad + &s;
        }
    }
    s
}

fn format_int(n: i64, spec: &FormatSpec) -> String {
    let base = spec.base.unwrap_or(10);
    let magnitude = n.unsigned_abs();
    let mut digits = match base {
        2 => format!("{magnitude:b}"),
        8 => format!("{magnitude:o}"),
        16 => format!("{magnitude:x}"),
        _ => format!("{magnitude}"),
    };
    if !spec.lowercase {
        digits = digits.to_uppercase();
    }
    if let Some(precision) = spec.precision {
        let precision = precision as usize;
        if digits.len() < precision {
            digits = "0".repeat(precision - digits.len()) + &digits;
        }
    }
    if n < 0 {
        format!("-{digits}")
    } else {
        digits
    }
}
