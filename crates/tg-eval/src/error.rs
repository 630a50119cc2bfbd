use thiserror::Error;

/// Everything that can go wrong while walking a lowered program. Never
/// carries a span - callers already have the expression/statement span in
/// hand and attach it when turning this into a [`tg_util::Diagnostic`].
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("no property or method named `{name}` on a {value_type} value")]
    UnknownMember { name: String, value_type: &'static str },
    #[error("{0}")]
    Builtin(String),
    #[error("value is not callable")]
    NotCallable,
    #[error("expected {expected} arguments, got {got}")]
    ArityMismatch { expected: String, got: usize },
    #[error("array index {index} is out of bounds for a {len}-element array")]
    IndexOutOfBounds { index: i64, len: usize },
    #[error("a value of this type cannot be used here")]
    TypeMismatch,
    #[error("left side of an assignment must be a variable, array element, or field")]
    NotAssignable,
}
