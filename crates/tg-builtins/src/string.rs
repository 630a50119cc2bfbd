//! String properties and methods (spec §4.7). `empty`/`append`/`lower`/
//! `upper`/`trim`/`trim_left`/`trim_right`/`split`, plus the `size`
//! property, are ported from `builtin_string.cpp`. `title`/`starts_with`/
//! `substr`/`find`/`escape` and the case-conversion family have no
//! counterpart there and are written fresh, in the same style.

use tg_match::Value;

use crate::words;

pub fn property(s: &str, name: &str) -> Option<Result<Value, String>> {
    match name {
        "size" => Some(Ok(Value::Int(s.chars().count() as i64))),
        _ => None,
    }
}

pub fn method(s: &str, name: &str, args: &[Value]) -> Option<Result<Value, String>> {
    match name {
        "empty" => Some(arity(args, 0, 0).map(|()| Value::Bool(s.is_empty()))),
        "append" => Some(Ok(Value::str({
            let mut out = s.to_string();
            for a in args {
                out.push_str(&str_arg(a));
            }
            out
        }))),
        "lower" => Some(arity(args, 0, 0).map(|()| Value::str(s.to_lowercase()))),
        "upper" => Some(arity(args, 0, 0).map(|()| Value::str(s.to_uppercase()))),
        "trim" => Some(arity(args, 0, 0).map(|()| Value::str(s.trim().to_string()))),
        "trim_left" => Some(arity(args, 0, 0).map(|()| Value::str(s.trim_start().to_string()))),
        "trim_right" => Some(arity(args, 0, 0).map(|()| Value::str(s.trim_end().to_string()))),
        "split" => Some(arity(args, 1, 1).map(|()| {
            let delim = str_arg(&args[0]);
            let parts: Vec<Value> = if delim.is_empty() {
                s.split_whitespace().map(Value::str).collect()
            } else {
                s.split(delim.as_str()).map(Value::str).collect()
            };
            Value::array(parts)
        })),
        "title" => Some(arity(args, 0, 0).map(|()| Value::str(words::to_title_case(s)))),
        "starts_with" => Some(arity(args, 1, 1).map(|()| Value::Bool(s.starts_with(str_arg(&args[0]).as_str())))),
        "substr" => Some(substr(s, args)),
        "find" => Some(arity(args, 1, 1).map(|()| {
            let needle = str_arg(&args[0]);
            match s.find(needle.as_str()) {
                Some(byte_idx) => Value::Int(s[..byte_idx].chars().count() as i64),
                None => Value::Int(-1),
            }
        })),
        "escape" => Some(arity(args, 0, 0).map(|()| Value::str(escape(s)))),
        "camel_case" => Some(arity(args, 0, 0).map(|()| Value::str(words::to_camel_case(s)))),
        "pascal_case" => Some(arity(args, 0, 0).map(|()| Value::str(words::to_pascal_case(s)))),
        "snake_case" => Some(arity(args, 0, 0).map(|()| Value::str(words::to_snake_case(s)))),
        "macro_case" => Some(arity(args, 0, 0).map(|()| Value::str(words::to_macro_case(s)))),
        "kebab_case" => Some(arity(args, 0, 0).map(|()| Value::str(words::to_kebab_case(s)))),
        _ => None,
    }
}

fn substr(s: &str, args: &[Value]) -> Result<Value, String> {
    arity(args, 1, 2)?;
    let chars: Vec<char> = s.chars().collect();
    let start = int_arg(&args[0])?.max(0) as usize;
    let len = match args.get(1) {
        Some(v) => int_arg(v)?.max(0) as usize,
        None => chars.len().saturating_sub(start),
    };
    let start = start.min(chars.len());
    let end = (start + len).min(chars.len());
    Ok(Value::str(chars[start..end].iter().collect::<String>()))
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

fn str_arg(v: &Value) -> String {
    v.as_str().map(|s| s.to_string()).unwrap_or_else(|| v.render())
}

fn int_arg(v: &Value) -> Result<i64, String> {
    v.as_int().ok_or_else(|| format!("expected an int argument, got {}", v.type_name()))
}

fn arity(args: &[Value], min: usize, max: usize) -> Result<(), String> {
    if args.len() < min || args.len() > max {
        Err(format!("expected between {min} and {max} arguments, got {}", args.len()))
    } else {
        Ok(())
    }
}
