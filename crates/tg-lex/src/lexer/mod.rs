//! Lexer module, split by token family the same way the token dispatch in
//! [`core`] branches:
//! - `core` - the `Lexer` struct, whitespace measurement, and dispatch
//! - `identifier` - identifiers (reserved-word-ness is a parser concern)
//! - `number` - integer literals
//! - `string` - string literals with `\` escapes
//! - `operator` - punctuation and compound operators

mod core;
mod identifier;
mod number;
mod operator;
mod string;

pub use self::core::Lexer;
