use thiserror::Error;

/// Why a value couldn't be matched against a pattern/sum. Carries no span
/// of its own - callers already have the origin span and attach it (plus a
/// secondary span pointing at the definition) when turning this into a
/// [`tg_util::Diagnostic`].
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("`{text}` does not match pattern `{pattern}`")]
    PatternMismatch { text: String, pattern: String },
    #[error("cannot match a {value_type} value against `{pattern}`")]
    UnmatchableType { value_type: &'static str, pattern: String },
    #[error("`{name}` is not a pattern or sum")]
    NotAPatternOrSum { name: String },
}
