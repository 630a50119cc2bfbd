//! The built-in string/array/JSON catalog (spec §4.7), resolved by
//! `tg-eval` at evaluation time against a property/method/subscript name
//! it already knows isn't a pattern field (`tg-sem` typed it `Builtin`
//! precisely because the name can only be resolved once a receiver value
//! exists).
//!
//! Grounded on `builtin_string.cpp`, `builtin_array.cpp`,
//! `builtin_functions.h`, and `json_extension.cpp` - see each submodule's
//! doc comment for which parts are ported and which are fresh.

pub mod array;
pub mod functions;
pub mod json;
pub mod string;
mod words;

pub use tg_match::Value;

/// Looks up a no-argument property access (`value.size`, `doc.root`, ...).
/// `None` means `name` isn't a property this receiver type has at all;
/// `Some(Err(_))` means it matched but failed.
pub fn property(receiver: &Value, name: &str) -> Option<Result<Value, String>> {
    match receiver {
        Value::Str(s) => string::property(s, name),
        Value::Array(items) => array::property(items, name),
        Value::Custom(c) => json::property(c, name),
        _ => None,
    }
}

/// Looks up a method call (`value.trim()`, `arr.append(x)`, ...).
pub fn method(receiver: &Value, name: &str, args: &[Value]) -> Option<Result<Value, String>> {
    match receiver {
        Value::Str(s) => string::method(s, name, args),
        Value::Array(items) => array::method(items, name, args),
        Value::Custom(c) => json::method(c, name, args),
        _ => None,
    }
}

/// Calls one of the fixed free functions (`range`, `max`, `min`,
/// `read_json_document`) by name.
pub fn call_free_function(name: &str, args: &[Value]) -> Option<Result<Value, String>> {
    match name {
        "read_json_document" => Some(json::read_json_document(args)),
        _ => functions::call(name, args),
    }
}

/// The receiver-dependent half of `base[index]`: only JSON values give
/// their subscript a builtin meaning (array/string subscripting is
/// handled directly by `tg-eval`, since it doesn't need a catalog lookup).
pub fn subscript(receiver: &Value, index: &Value) -> Option<Result<Value, String>> {
    match receiver {
        Value::Custom(c) => json::subscript(c, index),
        _ => None,
    }
}

/// Materializes a builtin value's elements for a `for` loop, for receiver
/// types `tg-eval` doesn't already know how to iterate itself.
pub fn iter_values(receiver: &Value) -> Option<Vec<Value>> {
    match receiver {
        Value::Custom(c) => json::iter_values(c),
        _ => None,
    }
}
