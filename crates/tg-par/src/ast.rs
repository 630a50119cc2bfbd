//! Parse-tree node definitions.
//!
//! This is an owned `Box`/`Vec` tree, not bump-arena pointers (see
//! SPEC_FULL.md §4.1): every node is reachable from the root `Program` by
//! ordinary ownership, which is what `faxc-sem::hir` does with the AST it
//! receives from `faxc-par` too. Names are unresolved [`Symbol`]s here;
//! `tg-sem` is the phase that binds them to definitions and assigns
//! result types.

use tg_util::{Span, Symbol};

/// A whole source file after parsing: a sequence of top-level items,
/// which may freely interleave template text, control flow, and
/// generator/pattern/sum definitions.
#[derive(Debug, Clone)]
pub struct Program {
    pub items: Vec<Item>,
}

#[derive(Debug, Clone)]
pub enum Item {
    Stmt(Stmt),
    Generator(GeneratorDef),
    Pattern(PatternDef),
    Sum(SumDef),
    Include(IncludeDirective),
}

#[derive(Debug, Clone)]
pub struct IncludeDirective {
    pub path: Symbol,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct GeneratorDef {
    pub name: Symbol,
    pub params: Vec<Param>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: Symbol,
    pub ty: TypeSpec,
    pub default: Option<Expr>,
    pub span: Span,
}

/// A type name as written in source: a builtin keyword, a reference to a
/// user pattern/sum definition, or either suffixed with `[]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub name: Symbol,
    pub array_level: u32,
    pub span: Span,
}

// ---------------------------------------------------------------------
// Pattern / sum definitions
// ---------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PatternDef {
    pub name: Symbol,
    pub entries: Vec<MatchEntry>,
    pub fields: Vec<FieldDecl>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: Symbol,
    /// Index into `PatternDef::entries` of the match entry this field
    /// reads its value from. Only non-`raw` entries may be targeted.
    pub entry_index: usize,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum MatchEntry {
    /// One or more whitespace-separated words, quantified `(min, max)`
    /// with `max == -1` meaning unbounded.
    Word { min: i32, max: i32, span: Span },
    /// Balanced-delimiter text terminated at a top-level `,` or closing
    /// delimiter.
    Expression { span: Span },
    /// A built-in scalar slot: `bool`, `int`, or `string`.
    Builtin { ty: Symbol, span: Span },
    /// A nested pattern or sum definition referenced by name.
    Custom { ty: Symbol, span: Span },
    /// Literal text that must match verbatim, `\`-escapes stripped
    /// exactly once at parse time.
    Raw { text: Symbol, span: Span },
}

#[derive(Debug, Clone)]
pub struct SumDef {
    pub name: Symbol,
    pub members: Vec<Symbol>,
    pub span: Span,
}

// ---------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------

/// A literal block's body: an ordered sequence of segments, each with its
/// own leading whitespace.
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub segments: Vec<Segment>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Segment {
    pub whitespace: SegmentWhitespace,
    /// Statements produced by one `$`/`${...}` escape (or a bare literal
    /// run). `generator`/`pattern`/`sum` definitions may be nested inside
    /// a `${...}` block, same as at the top level; `include` may not
    /// (checked at parse time).
    pub items: Vec<Item>,
    pub span: Span,
}

/// How many newlines, indentation units (four spaces each), and trailing
/// spaces precede this segment's first emitted character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentWhitespace {
    pub preceding_newlines: u32,
    pub indentation: u32,
    pub spaces: u32,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    /// A run of literal text between `$`-escapes, with its leading-space
    /// count (trailing whitespace before newlines already trimmed by the
    /// parser).
    Literal { text: Symbol, span: Span },
    If(IfStmt),
    For(ForStmt),
    /// A literal block written where a statement is expected, with no
    /// preceding `if`/`for`/`generator` keyword - e.g. a whole top-level
    /// file's output, or a block nested directly inside another one.
    Block(Block),
    /// A bare expression statement with an optional `$`-format spec.
    Expression { expr: Expr, format: Option<FormatSpec>, span: Span },
    /// `,` as the first statement of a block: a back-reference to an
    /// enclosing for-loop (`None` = innermost), plus whether a trailing
    /// space follows the comma in source.
    Comma { loop_level: Option<u32>, trailing_space: bool, span: Span },
    Declaration(Declaration),
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
    pub var: Symbol,
    pub container: Expr,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Declaration {
    pub name: Symbol,
    pub ty: Option<TypeSpec>,
    pub init: Option<Expr>,
    pub span: Span,
}

/// The print-format record parsed from the text after `$` in an
/// expression statement: width, precision, base, and flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatSpec {
    pub width: Option<u32>,
    pub precision: Option<u32>,
    pub base: Option<u32>,
    pub lowercase: bool,
}

// ---------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Expr {
    Int(i64, Span),
    Str(Symbol, Span),
    Array(Vec<Expr>, Span),
    Ident(Symbol, Span),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Call(CallExpr),
    Subscript(SubscriptExpr),
    Dot(DotExpr),
    InstanceOf(InstanceOfExpr),
    Assign(AssignExpr),
    Paren(Box<Expr>, Span),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Int(_, s)
            | Expr::Str(_, s)
            | Expr::Array(_, s)
            | Expr::Ident(_, s)
            | Expr::Paren(_, s) => *s,
            Expr::Binary(e) => e.span,
            Expr::Unary(e) => e.span,
            Expr::Call(e) => e.span,
            Expr::Subscript(e) => e.span,
            Expr::Dot(e) => e.span,
            Expr::InstanceOf(e) => e.span,
            Expr::Assign(e) => e.span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub op: BinOp,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
}

#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub op: UnOp,
    pub operand: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub args: Vec<Arg>,
    pub span: Span,
}

/// A call argument, optionally named (`name: expr`) for keyword-eligible
/// generator parameters.
#[derive(Debug, Clone)]
pub struct Arg {
    pub name: Option<Symbol>,
    pub value: Expr,
}

#[derive(Debug, Clone)]
pub struct SubscriptExpr {
    pub base: Box<Expr>,
    pub index: Box<Expr>,
    pub span: Span,
}

/// A chain of dot-separated identifiers. Whether each step is a field,
/// property, or (tail-only) method is resolved later; a method tail
/// causes the enclosing call to detach the method name and re-root the
/// receiver (spec §4.4).
#[derive(Debug, Clone)]
pub struct DotExpr {
    pub base: Box<Expr>,
    pub segments: Vec<Symbol>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct InstanceOfExpr {
    pub value: Box<Expr>,
    pub ty: Symbol,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct AssignExpr {
    pub target: Box<Expr>,
    pub value: Box<Expr>,
    pub span: Span,
}
