//! `generator`/`pattern`/`sum` definition parsing.
//!
//! Grounded on `original_source/src/parsing.h`'s
//! `parse_pattern_type_definition` / `parse_sum_type_definition` /
//! `parse_type_definition_field` / `parse_generator`. Pattern bodies mix
//! token-based field declarations (`{name: type}`) with raw whitespace-
//! separated text between them, so - like `literal.rs` - this module
//! reaches for `Parser`'s raw character access for the text runs and
//! ordinary token `bump`/`eat`/`expect` for everything inside `{...}`.

use tg_lex::Token;
use tg_util::Symbol;

use crate::ast::{FieldDecl, GeneratorDef, MatchEntry, Param, PatternDef, SumDef};
use crate::Parser;

impl<'a> Parser<'a> {
    pub(crate) fn parse_generator(&mut self) -> GeneratorDef {
        let start = self.peek_span();
        self.bump(); // 'generator'
        let (spanned, name_span) = self.bump();
        let name = match spanned.token {
            Token::Ident(sym) => sym,
            _ => {
                self.error("expected generator name".to_string(), name_span);
                self.intern("<error>")
            }
        };

        self.expect(&Token::LParen, "'('");
        let mut params = Vec::new();
        let mut seen_default = false;
        if !matches!(self.peek(), Token::RParen) {
            loop {
                let param = self.parse_param(seen_default);
                seen_default |= param.default.is_some();
                params.push(param);
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
        }
        self.expect(&Token::RParen, "')'");

        let body = self.parse_block();
        let span = start.to(body.span);
        GeneratorDef { name, params, body, span }
    }

    fn parse_param(&mut self, seen_default: bool) -> Param {
        let (spanned, start_span) = self.bump();
        let name = match spanned.token {
            Token::Ident(sym) => sym,
            _ => {
                self.error("expected parameter name".to_string(), start_span);
                self.intern("<error>")
            }
        };
        self.expect(&Token::Colon, "':'");
        let ty = self.parse_type_spec();
        let default = if self.eat(&Token::Assign) {
            Some(self.parse_expr())
        } else {
            if seen_default {
                self.error(
                    "parameter without a default following a defaulted parameter must be named at the call site"
                        .to_string(),
                    start_span,
                );
            }
            None
        };
        let end = default.as_ref().map(|e| e.span()).unwrap_or(ty.span);
        Param { name, ty, default, span: start_span.to(end) }
    }

    pub(crate) fn parse_pattern_def(&mut self) -> PatternDef {
        let start = self.peek_span();
        self.bump(); // 'pattern'
        let (spanned, name_span) = self.bump();
        let name = match spanned.token {
            Token::Ident(sym) => sym,
            _ => {
                self.error("expected pattern name".to_string(), name_span);
                self.intern("<error>")
            }
        };
        self.expect(&Token::Colon, "':'");

        let mut entries = Vec::new();
        let mut fields = Vec::new();
        let mut end = name_span;
        loop {
            self.skip_raw_whitespace();
            if self.is_at_end() {
                self.error("end of file reached before encountering ';'".to_string(), name_span);
                break;
            }
            match self.peek_raw_char() {
                ';' => {
                    self.advance_raw();
                    end = self.lexer_position_span();
                    break;
                }
                '{' => {
                    self.advance_raw();
                    let (field_name, entry, field_span) = self.parse_pattern_field();
                    end = field_span;
                    fields.push(FieldDecl { name: field_name, entry_index: entries.len(), span: field_span });
                    entries.push(entry);
                }
                _ => {
                    end = self.parse_pattern_raw_run(&mut entries);
                }
            }
        }

        PatternDef { name, entries, fields, span: start.to(end) }
    }

    fn skip_raw_whitespace(&mut self) {
        loop {
            match self.peek_raw_char() {
                ' ' | '\t' | '\r' | '\n' => self.advance_raw(),
                _ => break,
            }
        }
    }

    /// A `{field}` or `{field: type(quantifier)}` declaration, starting
    /// just after the opening `{`.
    fn parse_pattern_field(&mut self) -> (Symbol, MatchEntry, tg_util::Span) {
        let (spanned, name_span) = self.bump();
        let field_name = match spanned.token {
            Token::Ident(sym) => sym,
            _ => {
                self.error("expected field name".to_string(), name_span);
                self.intern("<error>")
            }
        };

        let entry = if self.eat(&Token::Colon) {
            let (ty_spanned, ty_span) = self.bump();
            let ty_sym = match ty_spanned.token {
                Token::Ident(sym) => sym,
                _ => {
                    self.error("expected field type name".to_string(), ty_span);
                    self.intern("<error>")
                }
            };
            let ty_text = self.lexer_resolve(ty_sym).to_string();
            match ty_text.as_str() {
                "word" => {
                    let (min, max) = self.parse_word_quantifier();
                    MatchEntry::Word { min, max, span: ty_span }
                }
                "expression" => MatchEntry::Expression { span: ty_span },
                "int" | "bool" | "string" => MatchEntry::Builtin { ty: ty_sym, span: ty_span },
                _ => MatchEntry::Custom { ty: ty_sym, span: ty_span },
            }
        } else {
            MatchEntry::Word { min: 1, max: 2, span: name_span }
        };

        let close = self.expect(&Token::RBrace, "'}'");
        (field_name, entry, name_span.to(close))
    }

    /// `*` / `+` / `?` / `{min[,max]}` after a `word` type specifier.
    /// `max == -1` means unbounded (spec §4.3, §4.5).
    fn parse_word_quantifier(&mut self) -> (i32, i32) {
        let tok = self.peek().clone();
        match tok {
            Token::Star => {
                self.bump();
                (0, -1)
            }
            Token::Plus => {
                self.bump();
                (1, -1)
            }
            Token::Question => {
                self.bump();
                (0, 2)
            }
            Token::LBrace => {
                self.bump();
                let min = self.parse_quantifier_int();
                let max = if self.eat(&Token::Comma) {
                    if matches!(self.peek(), Token::RBrace) {
                        -1
                    } else {
                        self.parse_quantifier_int() + 1
                    }
                } else {
                    min * 2
                };
                self.expect(&Token::RBrace, "'}'");
                (min, max)
            }
            _ => (1, 2),
        }
    }

    fn parse_quantifier_int(&mut self) -> i32 {
        let (spanned, span) = self.bump();
        match spanned.token {
            Token::Int(n) => n as i32,
            _ => {
                self.error("expected a number".to_string(), span);
                0
            }
        }
    }

    /// Raw whitespace-separated text between two `{field}` declarations
    /// (or before the first / after the last): each word becomes a
    /// `raw` match entry, with `\`-escapes stripped exactly once (spec
    /// §9 - the original's one-off re-stripping bug is not reproduced).
    fn parse_pattern_raw_run(&mut self, entries: &mut Vec<MatchEntry>) -> tg_util::Span {
        let start_span = self.lexer_position_span();
        let mut text = String::new();
        loop {
            if self.is_at_end() {
                break;
            }
            match self.peek_raw_char() {
                '{' | ';' => break,
                '\\' => {
                    text.push('\\');
                    self.advance_raw();
                    if !self.is_at_end() {
                        text.push(self.peek_raw_char());
                        self.advance_raw();
                    }
                }
                c => {
                    text.push(c);
                    self.advance_raw();
                }
            }
        }
        let end_span = self.lexer_position_span();
        for word in text.split_whitespace() {
            let stripped = strip_raw_escapes(word);
            let sym = self.intern(&stripped);
            entries.push(MatchEntry::Raw { text: sym, span: start_span.to(end_span) });
        }
        end_span
    }

    pub(crate) fn parse_sum_def(&mut self) -> SumDef {
        let start = self.peek_span();
        self.bump(); // 'sum'
        let (spanned, name_span) = self.bump();
        let name = match spanned.token {
            Token::Ident(sym) => sym,
            _ => {
                self.error("expected sum name".to_string(), name_span);
                self.intern("<error>")
            }
        };
        self.expect(&Token::Colon, "':'");

        let mut members = Vec::new();
        let mut end = name_span;
        loop {
            let (spanned, span) = self.bump();
            end = span;
            match spanned.token {
                Token::Semicolon => break,
                Token::Ident(sym) => {
                    members.push(sym);
                    if self.eat(&Token::Pipe) {
                        continue;
                    }
                    end = self.expect(&Token::Semicolon, "';'");
                    break;
                }
                Token::Eof => {
                    self.error("end of file reached before encountering ';'".to_string(), span);
                    break;
                }
                _ => {
                    self.error("expected type name".to_string(), span);
                    break;
                }
            }
        }

        if members.is_empty() {
            self.error("empty sum type not allowed".to_string(), name_span);
        }

        SumDef { name, members, span: start.to(end) }
    }
}

fn strip_raw_escapes(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut chars = word.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
