//! Expression parsing: precedence climbing exactly as spec §4.3 lists it -
//! `or` -> `and` -> equality -> comparison -> additive -> multiplicative
//! -> unary -> postfix (call / subscript / dot chain / `instanceof`) ->
//! primary. Grounded on `faxc-par/src/expr.rs`'s climb structure, with
//! the operator set cut down to what spec.md §4.2's lexer actually
//! produces (no shifts, no bitwise xor, no ternary).

use tg_lex::Token;
use tg_util::Span;

use crate::ast::{
    Arg, AssignExpr, BinOp, BinaryExpr, CallExpr, DotExpr, Expr, FormatSpec, InstanceOfExpr,
    SubscriptExpr, UnOp, UnaryExpr,
};
use crate::Parser;

impl<'a> Parser<'a> {
    pub(crate) fn parse_expr(&mut self) -> Expr {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Expr {
        let left = self.parse_or();
        if self.eat(&Token::Assign) {
            let value = self.parse_assignment();
            let span = left.span().to(value.span());
            return Expr::Assign(AssignExpr {
                target: Box::new(left),
                value: Box::new(value),
                span,
            });
        }
        left
    }

    fn parse_or(&mut self) -> Expr {
        let mut left = self.parse_and();
        while matches!(self.peek(), Token::OrOr) {
            self.bump();
            let right = self.parse_and();
            left = bin(left, BinOp::Or, right);
        }
        left
    }

    fn parse_and(&mut self) -> Expr {
        let mut left = self.parse_equality();
        while matches!(self.peek(), Token::AndAnd) {
            self.bump();
            let right = self.parse_equality();
            left = bin(left, BinOp::And, right);
        }
        left
    }

    fn parse_equality(&mut self) -> Expr {
        let mut left = self.parse_comparison();
        loop {
            let op = match self.peek() {
                Token::EqEq => BinOp::Eq,
                Token::NotEq => BinOp::Ne,
                _ => break,
            };
            self.bump();
            let right = self.parse_comparison();
            left = bin(left, op, right);
        }
        left
    }

    fn parse_comparison(&mut self) -> Expr {
        let mut left = self.parse_additive();
        loop {
            let op = match self.peek() {
                Token::Lt => BinOp::Lt,
                Token::Gt => BinOp::Gt,
                Token::LtEq => BinOp::Le,
                Token::GtEq => BinOp::Ge,
                _ => break,
            };
            self.bump();
            let right = self.parse_additive();
            left = bin(left, op, right);
        }
        left
    }

    fn parse_additive(&mut self) -> Expr {
        let mut left = self.parse_multiplicative();
        loop {
            let op = match self.peek() {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            self.bump();
            let right = self.parse_multiplicative();
            left = bin(left, op, right);
        }
        left
    }

    fn parse_multiplicative(&mut self) -> Expr {
        let mut left = self.parse_bitwise();
        loop {
            let op = match self.peek() {
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                Token::Percent => BinOp::Mod,
                _ => break,
            };
            self.bump();
            let right = self.parse_bitwise();
            left = bin(left, op, right);
        }
        left
    }

    fn parse_bitwise(&mut self) -> Expr {
        let mut left = self.parse_unary();
        loop {
            let op = match self.peek() {
                Token::Amp => BinOp::BitAnd,
                Token::Pipe => BinOp::BitOr,
                _ => break,
            };
            self.bump();
            let right = self.parse_unary();
            left = bin(left, op, right);
        }
        left
    }

    fn parse_unary(&mut self) -> Expr {
        let op = match self.peek() {
            Token::Bang => Some(UnOp::Not),
            Token::Minus => Some(UnOp::Neg),
            _ => None,
        };
        if let Some(op) = op {
            let start = self.peek_span();
            self.bump();
            let operand = self.parse_unary();
            let span = start.to(operand.span());
            return Expr::Unary(UnaryExpr { op, operand: Box::new(operand), span });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Expr {
        let mut expr = self.parse_primary();
        loop {
            let tok = self.peek().clone();
            match tok {
                Token::LParen => expr = self.parse_call(expr),
                Token::LBracket => expr = self.parse_subscript(expr),
                Token::Dot => expr = self.parse_dot_chain(expr),
                Token::Ident(_) if self.peek_is_keyword("instanceof") => {
                    expr = self.parse_instanceof(expr)
                }
                _ => break,
            }
        }
        expr
    }

    fn parse_call(&mut self, callee: Expr) -> Expr {
        self.bump(); // '('
        let mut args = Vec::new();
        if !matches!(self.peek(), Token::RParen) {
            loop {
                args.push(self.parse_arg());
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
        }
        let end = self.expect(&Token::RParen, "')'");
        let span = callee.span().to(end);
        Expr::Call(CallExpr { callee: Box::new(callee), args, span })
    }

    /// A call argument: `name: expr` for keyword-eligible parameters, or
    /// a bare positional `expr`.
    fn parse_arg(&mut self) -> Arg {
        if matches!(self.peek(), Token::Ident(_)) && matches!(self.peek_n(1), Token::Colon) {
            let (spanned, _) = self.bump();
            let name = match spanned.token {
                Token::Ident(sym) => sym,
                _ => unreachable!(),
            };
            self.bump(); // ':'
            Arg { name: Some(name), value: self.parse_expr() }
        } else {
            Arg { name: None, value: self.parse_expr() }
        }
    }

    fn parse_subscript(&mut self, base: Expr) -> Expr {
        self.bump(); // '['
        let index = self.parse_expr();
        let end = self.expect(&Token::RBracket, "']'");
        let span = base.span().to(end);
        Expr::Subscript(SubscriptExpr { base: Box::new(base), index: Box::new(index), span })
    }

    fn parse_dot_chain(&mut self, base: Expr) -> Expr {
        let mut segments = Vec::new();
        let mut end = base.span();
        while matches!(self.peek(), Token::Dot) {
            self.bump();
            let (spanned, span) = self.bump();
            end = span;
            match spanned.token {
                Token::Ident(sym) => segments.push(sym),
                _ => self.error("expected field or method name".to_string(), span),
            }
        }
        let span = base.span().to(end);
        Expr::Dot(DotExpr { base: Box::new(base), segments, span })
    }

    fn parse_instanceof(&mut self, value: Expr) -> Expr {
        self.bump(); // 'instanceof'
        let (spanned, span) = self.bump();
        let ty = match spanned.token {
            Token::Ident(sym) => sym,
            _ => {
                self.error("expected pattern type name".to_string(), span);
                self.intern("<error>")
            }
        };
        let full_span = value.span().to(span);
        Expr::InstanceOf(InstanceOfExpr { value: Box::new(value), ty, span: full_span })
    }

    fn parse_primary(&mut self) -> Expr {
        let (spanned, span) = self.bump();
        match spanned.token {
            Token::Int(n) => Expr::Int(n, span),
            Token::Str(sym) => Expr::Str(sym, span),
            Token::Ident(sym) => Expr::Ident(sym, span),
            Token::LParen => {
                let inner = self.parse_expr();
                let end = self.expect(&Token::RParen, "')'");
                Expr::Paren(Box::new(inner), span.to(end))
            }
            Token::LBracket => self.parse_array_literal(span),
            other => {
                self.error(format!("unexpected token {other:?} in expression"), span);
                Expr::Int(0, span)
            }
        }
    }

    fn parse_array_literal(&mut self, start: Span) -> Expr {
        let mut elements = Vec::new();
        if !matches!(self.peek(), Token::RBracket) {
            loop {
                elements.push(self.parse_expr());
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
        }
        let end = self.expect(&Token::RBracket, "']'");
        Expr::Array(elements, start.to(end))
    }

    /// The print-format record after `$` in an expression statement:
    /// `width[.precision][base][x|X lowercase flag]`, terminated by `;`
    /// or `}` (matching `original_source/src/parsing.h`'s use of
    /// `tmp_parse_print_format`, simplified to the handful of flags
    /// spec.md's data model names).
    pub(crate) fn parse_format_spec(&mut self) -> FormatSpec {
        let mut spec = FormatSpec::default();
        if let Token::Int(width) = self.peek() {
            spec.width = Some(*width as u32);
            self.bump();
        }
        if matches!(self.peek(), Token::Dot) {
            self.bump();
            if let Token::Int(prec) = self.peek() {
                spec.precision = Some(*prec as u32);
                self.bump();
            }
        }
        if matches!(self.peek(), Token::Ident(_)) {
            if self.peek_is_keyword("x") {
                spec.base = Some(16);
                spec.lowercase = true;
                self.bump();
            } else if self.peek_is_keyword("X") {
                spec.base = Some(16);
                self.bump();
            } else if self.peek_is_keyword("o") {
                spec.base = Some(8);
                self.bump();
            } else if self.peek_is_keyword("b") {
                spec.base = Some(2);
                self.bump();
            }
        }
        spec
    }
}

fn bin(left: Expr, op: BinOp, right: Expr) -> Expr {
    let span = left.span().to(right.span());
    Expr::Binary(BinaryExpr { left: Box::new(left), op, right: Box::new(right), span })
}
