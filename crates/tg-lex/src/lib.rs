//! tg-lex - turns source text into a stream of [`token::Token`]s.
//!
//! Each token carries the whitespace measured immediately before it
//! ([`token::Whitespace`]: preceding newlines, indentation units, trailing
//! spaces) because the parser needs that to strip literal-block
//! indentation and to decide comma-statement trailing-space flags -
//! pushing whitespace measurement into the lexer avoids re-scanning raw
//! source text in the parser.

pub mod cursor;
mod lexer;
pub mod token;

pub use cursor::Cursor;
pub use lexer::Lexer;
pub use token::{is_reserved_word, Spanned, Token, Whitespace};
