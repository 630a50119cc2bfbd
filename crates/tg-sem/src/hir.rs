//! Typed tree produced by this crate: the same shape as `tg_par::ast`
//! wherever nothing changes (statement kinds, `BinOp`/`UnOp`, format
//! specs, segment whitespace are reused directly rather than redefined),
//! with identifiers replaced by resolved [`DefId`]s and every expression
//! carrying its inferred [`Type`] and [`ValueCategory`] (spec §3's
//! invariant: "every expression node has a known result_type and
//! value_category after inference completes").
//!
//! `generator`/`pattern`/`sum` definitions do not appear here as items -
//! they're collected into [`crate::def::DefTable`] regardless of where in
//! the source they were declared, since they're visible by name from
//! anywhere (spec §4.3). What's left in a block's statement list is only
//! the things that can actually execute or emit output.

use tg_par::ast::{BinOp, FormatSpec, SegmentWhitespace, UnOp};
use tg_util::{Span, Symbol};

use crate::def::DefId;
use crate::ty::{ConstValue, Type, ValueCategory};

#[derive(Debug, Clone)]
pub struct Program {
    pub items: Vec<Stmt>,
    /// Number of stack slots the top-level frame needs - the top level is
    /// its own call frame, exactly like a generator body (spec §4.6).
    pub stack_size: u32,
    /// The implicit `argv` local every program can reference, reserved
    /// before any of its own statements are lowered (spec §4.9's
    /// command-line passthrough).
    pub argv_def: DefId,
}

#[derive(Debug, Clone, Default)]
pub struct Block {
    pub segments: Vec<Segment>,
    /// True iff at least one reachable non-declaration, non-void-expression
    /// statement exists anywhere in this block (spec §4.4's dead-output
    /// analysis). Segments with no output of their own have their
    /// `whitespace` zeroed by that same pass.
    pub has_output: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Segment {
    pub whitespace: SegmentWhitespace,
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Literal { text: Symbol, span: Span },
    If(IfStmt),
    For(ForStmt),
    Block(Block),
    Expression { expr: Expr, format: Option<FormatSpec>, span: Span },
    Comma { loop_level: Option<u32>, trailing_space: bool, span: Span },
    Declaration { def: DefId, init: Option<Expr>, span: Span },
    Break { level: u32, span: Span },
    Continue { level: u32, span: Span },
    Return { value: Option<Expr>, span: Span },
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_block: Block,
    pub else_block: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ForStmt {
    pub var: DefId,
    pub container: Expr,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Type,
    pub category: ValueCategory,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Int(i64),
    Str(Symbol),
    Array(Vec<Expr>),
    Ident(DefId),
    /// A reference to one of the fixed free functions `tg-builtins` catalogs
    /// (`range`, `max`, `min`, `read_json_document`) - these have no `Def`
    /// of their own, since they're not declared in source (spec §4.7).
    BuiltinFunction(Symbol),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Unary(UnOp, Box<Expr>),
    Call(Box<Expr>, Vec<Arg>),
    /// A dot-chain whose tail segment is a method, detached from the
    /// receiver by the enclosing call (spec §4.4).
    MethodCall { receiver: Box<Expr>, method: Symbol, args: Vec<Arg> },
    Subscript(Box<Expr>, Box<Expr>),
    /// A dot segment resolved against a pattern's named fields.
    Field { base: Box<Expr>, field: Symbol, entry_index: usize },
    /// A dot segment that isn't a known pattern field - a builtin
    /// property, resolved at evaluation time against `tg-builtins`'s
    /// catalog.
    Property { base: Box<Expr>, name: Symbol },
    InstanceOf { value: Box<Expr>, pattern: DefId },
    Assign(Box<Expr>, Box<Expr>),
    /// A constant string assigned/passed/declared against a pattern- or
    /// sum-typed target: matched against `target` once, at evaluation
    /// time (spec §4.4's "pre-materialised pattern-instance", deferred to
    /// `tg-eval` since `tg-match` is a later phase than this crate - see
    /// DESIGN.md).
    MatchCoerce { source: Box<Expr>, target: DefId },
    /// A sub-expression whose value category was `constant` and whose
    /// target type forced a conversion (spec §4.4's constant folding).
    ConstFolded(ConstValue),
    Error,
}

#[derive(Debug, Clone)]
pub struct Arg {
    pub name: Option<Symbol>,
    pub value: Expr,
}
