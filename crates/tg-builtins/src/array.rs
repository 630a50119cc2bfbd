//! Array properties and methods, ported from `builtin_array.cpp`: a
//! `size` property and a strictly 2-arity `append(value)` method (unlike
//! string's variadic `append`, an array only ever takes one element at a
//! time, matching `array_are_append_arguments_valid`).

use std::cell::RefCell;
use std::rc::Rc;

use tg_match::Value;

pub fn property(items: &Rc<RefCell<Vec<Value>>>, name: &str) -> Option<Result<Value, String>> {
    match name {
        "size" => Some(Ok(Value::Int(items.borrow().len() as i64))),
        _ => None,
    }
}

pub fn method(items: &Rc<RefCell<Vec<Value>>>, name: &str, args: &[Value]) -> Option<Result<Value, String>> {
    match name {
        "append" => Some(if args.len() != 1 {
            Err(format!("append expects exactly 1 argument, got {}", args.len()))
        } else {
            items.borrow_mut().push(args[0].clone());
            Ok(Value::Void)
        }),
        _ => None,
    }
}
