//! Statement-sequence parsing: the grammar used both for the top-level
//! file and for a `${ ... }` block's body (spec §4.3's "Statement
//! parser"). Grounded on `original_source/src/parsing.h`'s
//! `parse_statements_impl`/`parse_single_statement_impl`: both entry
//! points funnel into one per-item dispatch, with only `include` gated
//! to the top level.

use tg_lex::Token;
use tg_util::Span;

use crate::ast::{
    Declaration, ForStmt, IfStmt, IncludeDirective, Item, Stmt, TypeSpec,
};
use crate::Parser;

impl<'a> Parser<'a> {
    /// Parses items until `stop` matches the next token (`Eof` at top
    /// level, `RBrace` inside a `${...}` block).
    ///
    /// `first` mirrors `parsing.h`'s `parse_statements_impl`'s own
    /// `for (first = true;; first = false)`: it starts `true` and is
    /// cleared after every iteration (including ones that `continue`,
    /// same as a C `for`-loop's increment clause running regardless of
    /// how the loop body exits). It gates two things, both read off
    /// `parsing.h:563-588`: whether a bare `,` is recognized as a comma
    /// statement at all (`parse_single_statement_impl`'s
    /// `if (first && token.type == tok_comma)`), and whether the
    /// statement that was just parsed may omit its trailing `;`
    /// (`can_semicolon_follow && (!first || (peek != '}' && peek != eof))`
    /// - only the sole statement of a block, immediately followed by its
    /// closing delimiter, gets to skip the semicolon; this is what makes
    /// the bare `${expr}` idiom work).
    pub(crate) fn parse_item_sequence(&mut self, is_top_level: bool) -> Vec<Item> {
        let mut items = Vec::new();
        let mut first = true;
        loop {
            if matches!(self.peek(), Token::Eof) {
                break;
            }
            if !is_top_level && matches!(self.peek(), Token::RBrace) {
                break;
            }

            if is_top_level && self.peek_is_keyword("include") {
                items.push(Item::Include(self.parse_include()));
                first = false;
                continue;
            }
            if !is_top_level && self.peek_is_keyword("include") {
                let span = self.peek_span();
                self.error("'include' is only valid at the top level".to_string(), span);
                self.bump();
                first = false;
                continue;
            }

            items.push(self.parse_single_item(first));

            let can_semicolon_follow = matches!(
                items.last(),
                Some(Item::Stmt(Stmt::Expression { .. }))
                    | Some(Item::Stmt(Stmt::Declaration(_)))
                    | Some(Item::Stmt(Stmt::Break { .. }))
                    | Some(Item::Stmt(Stmt::Continue { .. }))
                    | Some(Item::Stmt(Stmt::Return { .. }))
            );
            if can_semicolon_follow {
                let peek = self.peek().clone();
                let semicolon_required = !first || !matches!(peek, Token::RBrace | Token::Eof);
                if semicolon_required {
                    self.expect(&Token::Semicolon, "';'");
                }
            }
            first = false;
        }
        items
    }

    /// One generator/pattern/sum definition, or one plain statement.
    /// `first` is only meaningful to the comma-statement check inside
    /// `parse_single_statement` - generator/pattern/sum definitions are
    /// recognized in any position, same as `parsing.h`'s own
    /// `parse_single_statement_impl` tries them before ever looking at
    /// `first`.
    pub(crate) fn parse_single_item(&mut self, first: bool) -> Item {
        if self.peek_is_keyword("generator") {
            return Item::Generator(self.parse_generator());
        }
        if self.peek_is_keyword("pattern") {
            return Item::Pattern(self.parse_pattern_def());
        }
        if self.peek_is_keyword("sum") {
            return Item::Sum(self.parse_sum_def());
        }
        Item::Stmt(self.parse_single_statement(first))
    }

    fn parse_single_statement(&mut self, first: bool) -> Stmt {
        if self.peek_is_keyword("if") {
            return Stmt::If(self.parse_if());
        }
        if self.peek_is_keyword("for") {
            return Stmt::For(self.parse_for());
        }
        if self.peek_is_keyword("break") || self.peek_is_keyword("continue") {
            return self.parse_break_continue();
        }
        if self.peek_is_keyword("return") {
            return self.parse_return();
        }
        if first && matches!(self.peek(), Token::Comma) {
            return self.parse_comma();
        }
        if matches!(self.peek(), Token::Ident(_)) && self.is_declaration_ahead() {
            return Stmt::Declaration(self.parse_declaration());
        }
        if matches!(self.peek(), Token::LBrace) {
            return Stmt::Block(self.parse_block());
        }
        self.parse_expression_statement()
    }

    /// `name : type` or `name := expr` vs. a bare expression statement:
    /// two-token lookahead on `:` / `:=` after the leading identifier.
    fn is_declaration_ahead(&mut self) -> bool {
        matches!(self.peek_n(1), Token::Colon | Token::ColonEq)
    }

    fn parse_declaration(&mut self) -> Declaration {
        let (spanned, start_span) = self.bump();
        let name = match spanned.token {
            Token::Ident(sym) => sym,
            _ => unreachable!("caller checked Token::Ident"),
        };

        let (ty, init) = if self.eat(&Token::ColonEq) {
            let expr = self.parse_expr();
            (None, Some(expr))
        } else {
            self.expect(&Token::Colon, "':'");
            let ty = self.parse_type_spec();
            let init = if self.eat(&Token::Assign) { Some(self.parse_expr()) } else { None };
            (Some(ty), init)
        };

        let end = init.as_ref().map(|e| e.span()).unwrap_or(start_span);
        Declaration { name, ty, init, span: start_span.to(end) }
    }

    pub(crate) fn parse_type_spec(&mut self) -> TypeSpec {
        let (spanned, span) = self.bump();
        let name = match spanned.token {
            Token::Ident(sym) => sym,
            _ => {
                self.error("expected type name".to_string(), span);
                self.intern("<error>")
            }
        };
        let mut array_level = 0;
        let mut end = span;
        while matches!(self.peek(), Token::LBracket) {
            self.bump();
            end = self.expect(&Token::RBracket, "']'");
            array_level += 1;
        }
        TypeSpec { name, array_level, span: span.to(end) }
    }

    fn parse_if(&mut self) -> IfStmt {
        let start = self.peek_span();
        self.bump(); // 'if'
        let cond = self.parse_expr();
        let then_block = self.parse_block();
        let else_block = if self.peek_is_keyword("else") {
            self.bump();
            Some(self.parse_block())
        } else {
            None
        };
        let end = else_block.as_ref().map(|b| b.span).unwrap_or(then_block.span);
        IfStmt { cond, then_block, else_block, span: start.to(end) }
    }

    fn parse_for(&mut self) -> ForStmt {
        let start = self.peek_span();
        self.bump(); // 'for'
        let (spanned, var_span) = self.bump();
        let var = match spanned.token {
            Token::Ident(sym) => sym,
            _ => {
                self.error("expected loop variable name".to_string(), var_span);
                self.intern("<error>")
            }
        };
        self.expect_keyword("in");
        let container = self.parse_expr();
        self.nested_for += 1;
        let body = self.parse_block();
        self.nested_for -= 1;
        ForStmt { var, container, body, span: start.to(body.span) }
    }

    fn parse_break_continue(&mut self) -> Stmt {
        let (spanned, span) = self.bump();
        let is_break = matches!(spanned.token, Token::Ident(sym) if self.is_keyword_sym(sym, "break"));
        let level = if let Token::Int(n) = self.peek() {
            let n = *n;
            self.bump();
            if n < 0 {
                self.error("break/continue level must be non-negative".to_string(), span);
                0
            } else {
                n as u32
            }
        } else {
            0
        };
        if self.nested_for == 0 {
            self.error("break/continue outside a for loop".to_string(), span);
        } else if level >= self.nested_for {
            self.error("break/continue level exceeds loop nesting".to_string(), span);
        }
        if is_break {
            Stmt::Break { level, span }
        } else {
            Stmt::Continue { level, span }
        }
    }

    fn parse_return(&mut self) -> Stmt {
        let (_, span) = self.bump();
        let value = if matches!(self.peek(), Token::Semicolon | Token::RBrace | Token::Eof) {
            None
        } else {
            Some(self.parse_expr())
        };
        let end = value.as_ref().map(|e| e.span()).unwrap_or(span);
        Stmt::Return { value, span: span.to(end) }
    }

    /// `,` as the first statement of a `${...}` block: a back-reference
    /// to an enclosing for loop. Only meaningful as a standalone
    /// statement, so it's followed directly by the block's closing `}`
    /// (`parsing.h:586-589`'s `require_token_type(..., tok_curly_close,
    /// "Comma statement only valid as a standalone \"${,}\" statement.")`
    /// - a peek-only check, same as here: it never consumes the closing
    /// brace, it only rejects a comma statement that isn't immediately
    /// followed by one). This statement never expects a trailing `;`
    /// (`parsing.h`'s comma branch returns without setting
    /// `can_semicolon_follow`), which is why it's excluded from
    /// `parse_item_sequence`'s semicolon check.
    fn parse_comma(&mut self) -> Stmt {
        let (_, span) = self.bump();
        if self.nested_for == 0 {
            self.error("comma statement outside a for loop".to_string(), span);
        }
        let loop_level = if let Token::Int(n) = self.peek() {
            let n = *n;
            self.bump();
            if n < 0 || n as u32 >= self.nested_for {
                self.error("invalid for-loop back-reference".to_string(), span);
                None
            } else {
                Some(n as u32)
            }
        } else {
            None
        };
        let trailing_space = self.lexer_peek_is_space();
        if !matches!(self.peek(), Token::RBrace) {
            self.error("comma statement only valid as a standalone \"${,}\" statement".to_string(), span);
        }
        Stmt::Comma { loop_level, trailing_space, span }
    }

    fn parse_expression_statement(&mut self) -> Stmt {
        let expr = self.parse_expr();
        let span = expr.span();
        let format = if !matches!(expr, crate::ast::Expr::Assign(_)) && self.eat(&Token::Dollar) {
            Some(self.parse_format_spec())
        } else {
            None
        };
        Stmt::Expression { expr, format, span }
    }

    fn parse_include(&mut self) -> IncludeDirective {
        let start = self.peek_span();
        self.bump(); // 'include'
        let (spanned, span) = self.bump();
        let path = match spanned.token {
            Token::Str(sym) => sym,
            _ => {
                self.error("expected path string".to_string(), span);
                self.intern("")
            }
        };
        self.expect(&Token::Semicolon, "';'");
        IncludeDirective { path, span: start.to(span) }
    }
}

impl<'a> Parser<'a> {
    pub(crate) fn peek_is_keyword(&mut self, word: &str) -> bool {
        let tok = self.peek().clone();
        matches!(tok, Token::Ident(sym) if self.is_keyword_sym(sym, word))
    }

    fn is_keyword_sym(&self, sym: tg_util::Symbol, word: &str) -> bool {
        self.lexer_resolve(sym) == word
    }

    pub(crate) fn expect_keyword(&mut self, word: &str) -> Span {
        let span = self.peek_span();
        if self.peek_is_keyword(word) {
            self.bump();
        } else {
            self.error(format!("expected '{word}'"), span);
        }
        span
    }
}
