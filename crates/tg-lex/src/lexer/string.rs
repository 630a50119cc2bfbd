//! String literal lexing: `"..."` with `\` escapes. A string that hits a
//! newline or EOF before its closing quote is an error.

use super::core::Lexer;
use crate::token::Token;

impl<'a> Lexer<'a> {
    pub(crate) fn lex_string(&mut self) -> Token {
        self.cursor_mut().advance(); // opening '"'
        let mut value = String::new();
        loop {
            match self.cursor().current_char() {
                '"' => {
                    self.cursor_mut().advance();
                    let sym = self.arena_mut().intern(&value);
                    return Token::Str(sym);
                }
                '\0' => {
                    self.report_error("unterminated string literal".to_string());
                    let sym = self.arena_mut().intern(&value);
                    return Token::Str(sym);
                }
                '\n' => {
                    self.report_error("unterminated string literal".to_string());
                    let sym = self.arena_mut().intern(&value);
                    return Token::Str(sym);
                }
                '\\' => {
                    self.cursor_mut().advance();
                    let escaped = self.cursor().current_char();
                    match escaped {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        '"' => value.push('"'),
                        '\\' => value.push('\\'),
                        '0' => value.push('\0'),
                        '\0' => {
                            self.report_error("unterminated string literal".to_string());
                            let sym = self.arena_mut().intern(&value);
                            return Token::Str(sym);
                        }
                        other => value.push(other),
                    }
                    self.cursor_mut().advance();
                }
                c => {
                    value.push(c);
                    self.cursor_mut().advance();
                }
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
    fn lexes_simple_string() {
        let mut arena = Arena::new();
        let mut handler = Handler::new();
        let mut lexer = Lexer::new("\"hello\"", FileId::DUMMY, &mut arena, &mut handler);
        let (spanned, _) = lexer.next_token();
        drop(lexer);
        match spanned.token {
            Token::Str(sym) => assert_eq!(arena.resolve(sym), "hello"),
            other => panic!("expected string, got {other:?}"),
        }
    }

    #[test]
    fn processes_escapes() {
        let mut arena = Arena::new();
        let mut handler = Handler::new();
        let mut lexer = Lexer::new(r#""a\nb\"c""#, FileId::DUMMY, &mut arena, &mut handler);
        let (spanned, _) = lexer.next_token();
        drop(lexer);
        match spanned.token {
            Token::Str(sym) => assert_eq!(arena.resolve(sym), "a\nb\"c"),
            other => panic!("expected string, got {other:?}"),
        }
    }

    #[test]
    fn unterminated_string_before_newline_is_an_error() {
        let mut arena = Arena::new();
        let mut handler = Handler::new();
        let mut lexer = Lexer::new("\"abc\ndef", FileId::DUMMY, &mut arena, &mut handler);
        let _ = lexer.next_token();
        drop(lexer);
        assert!(handler.has_errors());
    }
}
