//! Core lexer: the `Lexer` struct, whitespace measurement, and the main
//! token dispatch.

use tg_util::{Arena, Diagnostic, FileId, Handler, Span};

use crate::cursor::Cursor;
use crate::token::{Spanned, Token, Whitespace};

/// Lexer for `tg` source text.
///
/// Produces one [`Spanned`] token at a time, each carrying the whitespace
/// measured immediately before it, so the parser can make layout-sensitive
/// decisions (literal-block indentation stripping, comma-statement
/// trailing-space flags) without re-scanning the source.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    arena: &'a mut Arena,
    handler: &'a mut Handler,
    file: FileId,
    token_start: usize,
    token_start_line: u32,
    token_start_column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, file: FileId, arena: &'a mut Arena, handler: &'a mut Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            arena,
            handler,
            file,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    pub(crate) fn arena_mut(&mut self) -> &mut Arena {
        self.arena
    }

    pub(crate) fn cursor(&self) -> &Cursor<'a> {
        &self.cursor
    }

    pub(crate) fn cursor_mut(&mut self) -> &mut Cursor<'a> {
        &mut self.cursor
    }

    /// Interns `s` in this lexer's arena. Exposed so the parser can intern
    /// literal-text runs it scans itself (see below).
    pub fn intern(&mut self, s: &str) -> tg_util::Symbol {
        self.arena.intern(s)
    }

    pub fn resolve(&self, sym: tg_util::Symbol) -> &str {
        self.arena.resolve(sym)
    }

    pub fn file(&self) -> FileId {
        self.file
    }

    /// Byte offset of the next character to be read.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    pub fn line(&self) -> u32 {
        self.cursor.line()
    }

    pub fn column(&self) -> u32 {
        self.cursor.column()
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    /// Character `offset` bytes ahead of the cursor, without consuming
    /// anything. `'\0'` past the end of input.
    pub fn peek_raw(&self, offset: usize) -> char {
        self.cursor.peek_char(offset)
    }

    /// Consumes one character without going through token dispatch. Used
    /// by the parser while scanning literal text between `$`-escapes.
    pub fn advance_raw(&mut self) {
        self.cursor.advance();
    }

    /// Source text between `start` (a previously recorded `position()`)
    /// and the current position.
    pub fn slice_from(&self, start: usize) -> &'a str {
        self.cursor.slice_from(start)
    }

    /// Returns the next token, the whitespace that preceded it, and its
    /// span.
    pub fn next_token(&mut self) -> (Spanned, Span) {
        let whitespace = self.skip_and_measure_whitespace();

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        let token = self.lex_one();
        let span = Span::new(
            self.token_start as u32,
            self.cursor.position() as u32,
            self.token_start_line,
            self.token_start_column,
            self.file,
        );
        (Spanned { token, whitespace }, span)
    }

    /// Skips whitespace, measuring `(preceding_newlines, indentation_units,
    /// trailing_spaces)`: a tab or a run of four spaces is one indentation
    /// unit, counted since the last newline; leftover spaces (fewer than
    /// four) since the last indentation unit are `trailing_spaces`.
    fn skip_and_measure_whitespace(&mut self) -> Whitespace {
        let mut preceding_newlines = 0u32;
        let mut indentation_units = 0u32;
        let mut space_run = 0u32;
        loop {
            match self.cursor.current_char() {
                '\n' => {
                    preceding_newlines += 1;
                    indentation_units = 0;
                    space_run = 0;
                    self.cursor.advance();
                }
                '\r' => {
                    self.cursor.advance();
                }
                '\t' => {
                    indentation_units += 1;
                    space_run = 0;
                    self.cursor.advance();
                }
                ' ' => {
                    space_run += 1;
                    if space_run == 4 {
                        indentation_units += 1;
                        space_run = 0;
                    }
                    self.cursor.advance();
                }
                _ => break,
            }
        }
        Whitespace { preceding_newlines, indentation_units, trailing_spaces: space_run }
    }

    fn lex_one(&mut self) -> Token {
        if self.cursor.is_at_end() {
            return Token::Eof;
        }
        match self.cursor.current_char() {
            ',' => self.single(Token::Comma),
            '.' => self.single(Token::Dot),
            '(' => self.single(Token::LParen),
            ')' => self.single(Token::RParen),
            '{' => self.single(Token::LBrace),
            '}' => self.single(Token::RBrace),
            '[' => self.single(Token::LBracket),
            ']' => self.single(Token::RBracket),
            '$' => self.single(Token::Dollar),
            '?' => self.single(Token::Question),
            ';' => self.single(Token::Semicolon),
            '+' => self.single(Token::Plus),
            '-' => self.single(Token::Minus),
            '*' => self.single(Token::Star),
            '/' => self.single(Token::Slash),
            '%' => self.single(Token::Percent),
            '&' => self.lex_amp(),
            '|' => self.lex_pipe(),
            ':' => self.lex_colon(),
            '=' => self.lex_equals(),
            '!' => self.lex_bang(),
            '<' => self.lex_less(),
            '>' => self.lex_greater(),
            '"' => self.lex_string(),
            c if c.is_ascii_digit() => self.lex_number(),
            c if c.is_alphabetic() || c == '_' => self.lex_identifier(),
            c => {
                self.report_error(format!("unexpected character '{c}'"));
                self.cursor.advance();
                Token::Other(c)
            }
        }
    }

    fn single(&mut self, token: Token) -> Token {
        self.cursor.advance();
        token
    }

    pub(crate) fn report_error(&mut self, message: String) {
        let span = Span::new(
            self.token_start as u32,
            self.cursor.position() as u32,
            self.token_start_line,
            self.token_start_column,
            self.file,
        );
        self.handler.emit(Diagnostic::error(message, span));
    }

    /// Lets callers outside this crate (the parser) emit diagnostics
    /// through the same handler the lexer itself reports to.
    pub fn report_error_external(&mut self, diagnostic: Diagnostic) {
        self.handler.emit(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use tg_util::{Arena, FileId, Handler};

    use super::Lexer;
    use crate::token::Token;

    #[test]
    fn measures_indentation_units_and_trailing_spaces() {
        let mut arena = Arena::new();
        let mut handler = Handler::new();
        let mut lexer = Lexer::new("a\n\t  b", FileId::DUMMY, &mut arena, &mut handler);
        let (a, _) = lexer.next_token();
        assert_eq!(a.whitespace.preceding_newlines, 0);
        let (b, _) = lexer.next_token();
        assert_eq!(b.whitespace.preceding_newlines, 1);
        assert_eq!(b.whitespace.indentation_units, 1);
        assert_eq!(b.whitespace.trailing_spaces, 2);
    }

    #[test]
    fn four_spaces_is_one_indentation_unit() {
        let mut arena = Arena::new();
        let mut handler = Handler::new();
        let mut lexer = Lexer::new("a\n    b", FileId::DUMMY, &mut arena, &mut handler);
        let _ = lexer.next_token();
        let (b, _) = lexer.next_token();
        assert_eq!(b.whitespace.indentation_units, 1);
        assert_eq!(b.whitespace.trailing_spaces, 0);
    }

    #[test]
    fn dispatches_compound_operators() {
        let mut arena = Arena::new();
        let mut handler = Handler::new();
        let mut lexer =
            Lexer::new(": := <= >= == != && || < > = !", FileId::DUMMY, &mut arena, &mut handler);
        let expected = [
            Token::Colon,
            Token::ColonEq,
            Token::LtEq,
            Token::GtEq,
            Token::EqEq,
            Token::NotEq,
            Token::AndAnd,
            Token::OrOr,
            Token::Lt,
            Token::Gt,
            Token::Assign,
            Token::Bang,
        ];
        for want in expected {
            let (got, _) = lexer.next_token();
            assert_eq!(got.token, want);
        }
    }

    #[test]
    fn eof_at_end_of_input() {
        let mut arena = Arena::new();
        let mut handler = Handler::new();
        let mut lexer = Lexer::new("", FileId::DUMMY, &mut arena, &mut handler);
        let (spanned, _) = lexer.next_token();
        assert_eq!(spanned.token, Token::Eof);
    }
}
