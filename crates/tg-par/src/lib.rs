//! tg-par - turns a token/character stream into a [`ast::Program`].
//!
//! `tg` source is not "code with string literals" the way most languages
//! are - it's literal template text by default, with `$` switching into
//! code for one expression/statement (or a `${ ... }` block of several).
//! So this parser does not pre-tokenize the whole file the way
//! `faxc-par` does: it drives [`tg_lex::Lexer`] directly, alternating
//! between raw character scanning (literal text) and token-based
//! recursive descent (everything after a `$`). That split across
//! `literal.rs` / `stmt.rs` / `expr.rs` / `items.rs` mirrors
//! `faxc-par`'s own `stmt.rs`/`expr.rs`/`items.rs` split; the raw-scan
//! half has no counterpart in `faxc-par` and is instead grounded on
//! `original_source/src/parsing.h`'s `parse_literal_block`.

pub mod ast;
mod expr;
mod items;
mod literal;
mod stmt;

use std::collections::VecDeque;

use tg_lex::{Lexer, Spanned, Token};
use tg_util::{Arena, Diagnostic, FileId, Handler, Span};

use ast::Program;

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    buf: VecDeque<(Spanned, Span)>,
    /// Nesting depth of `for` loops currently open, for `break`/`continue`
    /// level validation.
    nested_for: u32,
    /// Newlines to swallow at the start of the next segment, set by
    /// `parse_literal_block` after a block whose content spanned more
    /// than one line (spec §4.3).
    skip_next_newlines: u32,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, file: FileId, arena: &'a mut Arena, handler: &'a mut Handler) -> Self {
        Self {
            lexer: Lexer::new(source, file, arena, handler),
            buf: VecDeque::new(),
            nested_for: 0,
            skip_next_newlines: 0,
        }
    }

    /// Parses a whole source file as a top-level literal block.
    pub fn parse_program(&mut self) -> Program {
        let items = self.parse_item_sequence(true);
        Program { items }
    }

    // -- token buffer -----------------------------------------------------

    fn fill(&mut self, n: usize) {
        while self.buf.len() <= n {
            let tok = self.lexer.next_token();
            self.buf.push_back(tok);
        }
    }

    fn peek(&mut self) -> &Token {
        self.fill(0);
        &self.buf[0].0.token
    }

    fn peek_n(&mut self, n: usize) -> &Token {
        self.fill(n);
        &self.buf[n].0.token
    }

    fn peek_span(&mut self) -> Span {
        self.fill(0);
        self.buf[0].1
    }

    fn bump(&mut self) -> (Spanned, Span) {
        self.fill(0);
        self.buf.pop_front().unwrap()
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == token {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token, what: &str) -> Span {
        let span = self.peek_span();
        if !self.eat(token) {
            self.error(format!("expected {what}"), span);
        }
        span
    }

    fn error(&mut self, message: String, span: Span) {
        self.lexer_handler_emit(Diagnostic::error(message, span));
    }

    fn lexer_handler_emit(&mut self, diagnostic: Diagnostic) {
        // `Lexer` owns the `&mut Handler`; route through its own error
        // reporting path so every diagnostic in a parse goes through one
        // place.
        self.lexer.report_error_external(diagnostic);
    }

    fn intern(&mut self, s: &str) -> tg_util::Symbol {
        self.lexer.intern(s)
    }

    fn file(&self) -> FileId {
        self.lexer.file()
    }

    fn lexer_resolve(&self, sym: tg_util::Symbol) -> &str {
        self.lexer.resolve(sym)
    }

    /// Whether a run of plain spaces (no newline) directly follows the
    /// token just consumed - used by the comma-statement's
    /// trailing-space flag (spec §4.3).
    fn lexer_peek_is_space(&mut self) -> bool {
        self.fill(0);
        let ws = self.buf[0].0.whitespace;
        ws.preceding_newlines == 0 && ws.trailing_spaces > 0
    }

    // -- raw character access, for literal.rs's text scanner --------------
    //
    // Only valid to call while `buf` is empty, i.e. with no outstanding
    // `peek`/`peek_n` lookahead: otherwise these would read behind tokens
    // the lexer has already produced but the parser hasn't consumed yet.

    fn advance_raw(&mut self) {
        self.lexer.advance_raw();
    }

    fn peek_raw_char(&self) -> char {
        self.lexer.peek_raw(0)
    }

    fn peek_raw_n(&self, n: usize) -> char {
        self.lexer.peek_raw(n)
    }

    fn is_at_end(&self) -> bool {
        self.lexer.is_at_end()
    }

    fn lexer_position_span(&self) -> Span {
        Span::point(self.lexer.position() as u32, self.lexer.line(), self.lexer.column(), self.file())
    }
}
