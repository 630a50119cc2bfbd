//! Integer literal lexing. `tg` has no float literals.

use super::core::Lexer;
use crate::token::Token;

impl<'a> Lexer<'a> {
    pub(crate) fn lex_number(&mut self) -> Token {
        let start = self.cursor().position();
        while self.cursor().current_char().is_ascii_digit() {
            self.cursor_mut().advance();
        }
        let text = self.cursor().slice_from(start);
        match text.parse::<i64>() {
            Ok(value) => Token::Int(value),
            Err(_) => {
                self.report_error(format!("integer literal '{text}' out of range"));
                Token::Int(0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tg_util::{Arena, FileId, Handler};

    use crate::lexer::Lexer;
    use crate::token::Token;

    #[test]
    fn lexes_integer() {
        let mut arena = Arena::new();
        let mut handler = Handler::new();
        let mut lexer = Lexer::new("42", FileId::DUMMY, &mut arena, &mut handler);
        let (spanned, _) = lexer.next_token();
        assert_eq!(spanned.token, Token::Int(42));
    }
}
