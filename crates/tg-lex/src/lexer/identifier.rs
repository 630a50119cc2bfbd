//! Identifier lexing: alpha/`_` start, then alnum/`_` continuation.

use super::core::Lexer;
use crate::token::Token;

impl<'a> Lexer<'a> {
    pub(crate) fn lex_identifier(&mut self) -> Token {
        let start = self.cursor().position();
        self.cursor_mut().advance();
        while is_ident_continue(self.cursor().current_char()) {
            self.cursor_mut().advance();
        }
        let text = self.cursor().slice_from(start);
        let sym = self.arena_mut().intern(text);
        Token::Ident(sym)
    }
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use tg_util::{Arena, FileId, Handler};

    use crate::lexer::Lexer;
    use crate::token::Token;

    #[test]
    fn lexes_plain_identifier() {
        let mut arena = Arena::new();
        let mut handler = Handler::new();
        let mut lexer = Lexer::new("hello_world2", FileId::DUMMY, &mut arena, &mut handler);
        let (spanned, _) = lexer.next_token();
        drop(lexer);
        match spanned.token {
            Token::Ident(sym) => assert_eq!(arena.resolve(sym), "hello_world2"),
            other => panic!("expected identifier, got {other:?}"),
        }
    }
}
