//! Token kinds.
//!
//! Keywords (`if`, `for`, `generator`, `pattern`, ...) are not distinct
//! token variants: they lex as plain [`Token::Ident`] and the parser
//! recognizes them by symbol text on a peek, exactly as the statement
//! parser needs two-token lookahead anyway to tell a declaration from an
//! expression statement. The lexer only knows about reserved-word-ness
//! far enough to reject them as declared names via [`is_reserved_word`].

use tg_util::Symbol;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    Eof,

    // Punctuation
    Comma,
    Dot,
    Assign,
    Colon,
    Semicolon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Dollar,
    Question,

    // Compound
    ColonEq,
    LtEq,
    GtEq,
    EqEq,
    NotEq,
    AndAnd,
    OrOr,

    // Comparison (single-char, sit alongside the compound forms)
    Lt,
    Gt,

    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Unary
    Bang,

    // Bitwise
    Amp,
    Pipe,

    // Literals and names
    Int(i64),
    Ident(Symbol),
    Str(Symbol),

    /// Any byte the lexer doesn't recognize; carried along so the caller
    /// can report it rather than the lexer panicking mid-stream.
    Other(char),
}

const RESERVED_WORDS: &[&str] =
    &["generator", "range", "int", "bool", "string", "pattern", "sum", "continue", "break"];

pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Whitespace measured immediately before a token: how many newlines were
/// skipped, how many indentation units the following line starts at (tab
/// or 4-space run = 1 unit), and how many bare trailing spaces followed
/// the indentation before the token itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Whitespace {
    pub preceding_newlines: u32,
    pub indentation_units: u32,
    pub trailing_spaces: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub whitespace: Whitespace,
}
