//! Compound operator lexing: everything that needs one character of
//! lookahead to decide between a single-char and two-char token.

use super::core::Lexer;
use crate::token::Token;

impl<'a> Lexer<'a> {
    pub(crate) fn lex_amp(&mut self) -> Token {
        self.cursor_mut().advance();
        if self.cursor_mut().match_char('&') { Token::AndAnd } else { Token::Amp }
    }

    pub(crate) fn lex_pipe(&mut self) -> Token {
        self.cursor_mut().advance();
        if self.cursor_mut().match_char('|') { Token::OrOr } else { Token::Pipe }
    }

    pub(crate) fn lex_colon(&mut self) -> Token {
        self.cursor_mut().advance();
        if self.cursor_mut().match_char('=') { Token::ColonEq } else { Token::Colon }
    }

    pub(crate) fn lex_equals(&mut self) -> Token {
        self.cursor_mut().advance();
        if self.cursor_mut().match_char('=') { Token::EqEq } else { Token::Assign }
    }

    pub(crate) fn lex_bang(&mut self) -> Token {
        self.cursor_mut().advance();
        if self.cursor_mut().match_char('=') { Token::NotEq } else { Token::Bang }
    }

    pub(crate) fn lex_less(&mut self) -> Token {
        self.cursor_mut().advance();
        if self.cursor_mut().match_char('=') { Token::LtEq } else { Token::Lt }
    }

    pub(crate) fn lex_greater(&mut self) -> Token {
        self.cursor_mut().advance();
        if self.cursor_mut().match_char('=') { Token::GtEq } else { Token::Gt }
    }
}
