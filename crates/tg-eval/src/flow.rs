/// The non-error control-flow signal a statement or block can produce,
/// threaded alongside `Result<_, EvalError>` (spec §4.6). Ported from the
/// original's `eval_result{type, level}`: `break`/`continue` carry how
/// many enclosing loops they still need to unwind past, decremented by
/// one each time they cross a `for` that isn't their target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Normal,
    Break(u32),
    Continue(u32),
    Return,
}

impl Flow {
    pub fn is_normal(self) -> bool {
        matches!(self, Flow::Normal)
    }
}
