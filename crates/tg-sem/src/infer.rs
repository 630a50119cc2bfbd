//! Two-pass resolution, bottom-up type inference, constant folding, and
//! dead-output analysis (spec §4.4).
//!
//! Pass one walks the whole tree reserving a [`DefId`] for every
//! `pattern`/`sum`/`generator` name, wherever it's declared, so later
//! uses can forward-reference a definition that appears further down the
//! file (spec §4.3). Pass two walks the tree again, this time lowering
//! statements and expressions into [`crate::hir`] and filling in the
//! placeholders pass one reserved.
//!
//! Grounded on `faxc-sem::lib.rs`'s two-phase "collect defs, then resolve
//! bodies" shape; the rib/scope mechanics are `crate::scope`'s.

use rustc_hash::FxHashMap;
use tg_par::ast;
use tg_util::{Arena, Diagnostic, Handler, Span, Symbol};

use crate::def::{Def, DefId, DefTable, FieldDef, GeneratorDef, LocalDef, ParamDef, PatternDef, SumDef};
use crate::hir;
use crate::scope::{RibKind, ScopeTree};
use crate::ty::{ConstValue, Type, ValueCategory};

pub struct Resolver<'a> {
    arena: &'a mut Arena,
    handler: &'a mut Handler,
    defs: DefTable,
    scopes: ScopeTree,
    /// Names reserved in pass one, looked up again in pass two to recover
    /// the `DefId` a definition was given before its body was lowered.
    global_defs: FxHashMap<Symbol, DefId>,
    /// One running counter per enclosing callable (a generator body, or
    /// the top-level file). `next_slot` increments the innermost.
    frames: Vec<u32>,
}

impl<'a> Resolver<'a> {
    pub fn new(arena: &'a mut Arena, handler: &'a mut Handler) -> Self {
        Self {
            arena,
            handler,
            defs: DefTable::new(),
            scopes: ScopeTree::new(),
            global_defs: FxHashMap::default(),
            frames: Vec::new(),
        }
    }

    pub fn into_defs(self) -> DefTable {
        self.defs
    }

    pub fn resolve_program(&mut self, program: ast::Program) -> hir::Program {
        self.collect_items(&program.items);

        self.push_frame();
        let argv_name = self.arena.intern("argv");
        let argv_slot = self.next_slot();
        let argv_def = self.defs.push(Def::Local(LocalDef {
            name: argv_name,
            ty: Type::array_of(Type::String),
            stack_slot: argv_slot,
            declaration_inferred: true,
            definition_ref: None,
            span: Span::DUMMY,
        }));
        self.scopes.bind(argv_name, argv_def);

        let mut items = Vec::new();
        for item in &program.items {
            match item {
                ast::Item::Stmt(s) => items.push(self.lower_stmt(s)),
                ast::Item::Generator(g) => self.fill_generator(g),
                ast::Item::Pattern(p) => self.fill_pattern(p),
                ast::Item::Sum(s) => self.fill_sum(s),
                ast::Item::Include(inc) => self.report_stray_include(inc.span),
            }
        }
        let stack_size = self.pop_frame();

        hir::Program { items, stack_size, argv_def }
    }

    // -----------------------------------------------------------------
    // Pass one: reserve DefIds
    // -----------------------------------------------------------------

    fn collect_items(&mut self, items: &[ast::Item]) {
        for item in items {
            match item {
                ast::Item::Stmt(stmt) => self.collect_stmt(stmt),
                ast::Item::Generator(g) => {
                    let id = self.defs.push(Def::Generator(GeneratorDef {
                        name: g.name,
                        params: Vec::new(),
                        body: hir::Block::default(),
                        stack_size: 0,
                        span: g.span,
                    }));
                    self.reserve_global(g.name, id, g.span);
                    self.collect_block(&g.body);
                }
                ast::Item::Pattern(p) => {
                    let id = self.defs.push(Def::Pattern(PatternDef {
                        name: p.name,
                        entries: Vec::new(),
                        fields: Vec::new(),
                        span: p.span,
                    }));
                    self.reserve_global(p.name, id, p.span);
                }
                ast::Item::Sum(s) => {
                    let id = self.defs.push(Def::Sum(SumDef { name: s.name, members: Vec::new(), span: s.span }));
                    self.reserve_global(s.name, id, s.span);
                }
                ast::Item::Include(_) => {}
            }
        }
    }

    fn collect_stmt(&mut self, stmt: &ast::Stmt) {
        match stmt {
            ast::Stmt::If(i) => {
                self.collect_block(&i.then_block);
                if let Some(e) = &i.else_block {
                    self.collect_block(e);
                }
            }
            ast::Stmt::For(f) => self.collect_block(&f.body),
            ast::Stmt::Block(b) => self.collect_block(b),
            _ => {}
        }
    }

    fn collect_block(&mut self, block: &ast::Block) {
        for seg in &block.segments {
            self.collect_items(&seg.items);
        }
    }

    fn reserve_global(&mut self, name: Symbol, id: DefId, span: Span) {
        if self.global_defs.insert(name, id).is_some() {
            self.handler.emit(Diagnostic::error(
                format!("`{}` is already defined as a pattern, sum, or generator", self.arena.resolve(name)),
                span,
            ));
        }
    }

    fn report_stray_include(&mut self, span: Span) {
        self.handler.emit(Diagnostic::error(
            "include directive reached the resolver unflattened".to_string(),
            span,
        ));
    }

    // -----------------------------------------------------------------
    // Pass two: fill in placeholders
    // -----------------------------------------------------------------

    fn fill_pattern(&mut self, p: &ast::PatternDef) {
        let Some(&id) = self.global_defs.get(&p.name) else { return };
        let fields = p
            .fields
            .iter()
            .map(|f| {
                let ty = p
                    .entries
                    .get(f.entry_index)
                    .map(|e| self.match_entry_type(e))
                    .unwrap_or(Type::Error);
                FieldDef { name: f.name, entry_index: f.entry_index, ty, span: f.span }
            })
            .collect();
        *self.defs.get_mut(id) = Def::Pattern(PatternDef {
            name: p.name,
            entries: p.entries.clone(),
            fields,
            span: p.span,
        });
    }

    fn match_entry_type(&self, entry: &ast::MatchEntry) -> Type {
        match entry {
            ast::MatchEntry::Word { max, .. } if *max == 1 => Type::String,
            ast::MatchEntry::Word { .. } => Type::array_of(Type::String),
            // The literal text a field reads isn't known until the value
            // is matched; the evaluator resolves its real shape then.
            ast::MatchEntry::Expression { .. } => Type::Builtin,
            ast::MatchEntry::Builtin { ty, .. } => match self.arena.resolve(*ty) {
                "bool" => Type::Bool,
                "int" => Type::Int,
                "string" => Type::String,
                _ => Type::Error,
            },
            ast::MatchEntry::Custom { ty, .. } => self.resolve_custom_type(*ty),
            ast::MatchEntry::Raw { .. } => Type::Error,
        }
    }

    fn resolve_custom_type(&self, name: Symbol) -> Type {
        match self.global_defs.get(&name) {
            Some(&id) => match self.defs.get(id) {
                Def::Pattern(_) => Type::Pattern(id),
                Def::Sum(_) => Type::Sum(id),
                _ => Type::Error,
            },
            None => Type::Error,
        }
    }

    fn fill_sum(&mut self, s: &ast::SumDef) {
        let Some(&id) = self.global_defs.get(&s.name) else { return };
        let mut members = Vec::with_capacity(s.members.len());
        for member in &s.members {
            match self.global_defs.get(member) {
                Some(&member_id) if matches!(self.defs.get(member_id), Def::Pattern(_)) => {
                    members.push(member_id);
                }
                _ => {
                    self.handler.emit(Diagnostic::error(
                        format!("`{}` is not a known pattern", self.arena.resolve(*member)),
                        s.span,
                    ));
                }
            }
        }
        *self.defs.get_mut(id) = Def::Sum(SumDef { name: s.name, members, span: s.span });
    }

    fn fill_generator(&mut self, g: &ast::GeneratorDef) {
        let Some(&id) = self.global_defs.get(&g.name) else { return };
        self.scopes.enter(RibKind::Generator);
        self.push_frame();

        let mut params = Vec::with_capacity(g.params.len());
        let mut saw_default = false;
        for p in &g.params {
            let ty = self.lower_type_spec(&p.ty);
            if p.default.is_none() && saw_default {
                self.handler.emit(Diagnostic::error(
                    "parameter without a default cannot follow one with a default".to_string(),
                    p.span,
                ));
            }
            saw_default |= p.default.is_some();

            let slot = self.next_slot();
            let def_id = self.defs.push(Def::Local(LocalDef {
                name: p.name,
                ty: ty.clone(),
                stack_slot: slot,
                declaration_inferred: false,
                definition_ref: definition_ref_of(&ty),
                span: p.span,
            }));
            self.bind_or_error(p.name, def_id, p.span);
            let default = p.default.as_ref().map(|e| self.lower_expr(e));
            params.push(ParamDef { def: def_id, ty, default, span: p.span });
        }

        let body = self.lower_block(&g.body);
        let stack_size = self.pop_frame();
        self.scopes.exit();

        *self.defs.get_mut(id) =
            Def::Generator(GeneratorDef { name: g.name, params, body, stack_size, span: g.span });
    }

    fn lower_type_spec(&mut self, spec: &ast::TypeSpec) -> Type {
        let base = match self.arena.resolve(spec.name) {
            "int" => Type::Int,
            "bool" => Type::Bool,
            "string" => Type::String,
            "void" => Type::Void,
            _ => {
                let ty = self.resolve_custom_type(spec.name);
                if ty == Type::Error {
                    self.handler.emit(Diagnostic::error(
                        format!("unknown type `{}`", self.arena.resolve(spec.name)),
                        spec.span,
                    ));
                }
                ty
            }
        };
        (0..spec.array_level).fold(base, |acc, _| Type::array_of(acc))
    }

    // -----------------------------------------------------------------
    // Statement lowering
    // -----------------------------------------------------------------

    fn lower_block(&mut self, block: &ast::Block) -> hir::Block {
        let mut segments = Vec::with_capacity(block.segments.len());
        for seg in &block.segments {
            let mut stmts = Vec::with_capacity(seg.items.len());
            for item in &seg.items {
                match item {
                    ast::Item::Stmt(s) => stmts.push(self.lower_stmt(s)),
                    ast::Item::Generator(g) => self.fill_generator(g),
                    ast::Item::Pattern(p) => self.fill_pattern(p),
                    ast::Item::Sum(s) => self.fill_sum(s),
                    ast::Item::Include(inc) => self.report_stray_include(inc.span),
                }
            }
            segments.push(hir::Segment { whitespace: seg.whitespace, stmts, span: seg.span });
        }
        let mut block = hir::Block { segments, has_output: false, span: block.span };
        self.mark_dead_output(&mut block);
        block
    }

    fn lower_stmt(&mut self, stmt: &ast::Stmt) -> hir::Stmt {
        match stmt {
            ast::Stmt::Literal { text, span } => hir::Stmt::Literal { text: *text, span: *span },
            ast::Stmt::If(i) => {
                let cond = self.lower_expr(&i.cond);
                self.scopes.enter(RibKind::IfThen);
                let then_block = self.lower_block(&i.then_block);
                self.scopes.exit();
                let else_block = i.else_block.as_ref().map(|b| {
                    self.scopes.enter(RibKind::IfElse);
                    let block = self.lower_block(b);
                    self.scopes.exit();
                    block
                });
                hir::Stmt::If(hir::IfStmt { cond, then_block, else_block, span: i.span })
            }
            ast::Stmt::For(f) => {
                let container = self.lower_expr(&f.container);
                let elem_ty = match container.ty.stripped().element_type() {
                    Some(ty) => ty.clone(),
                    None => {
                        if container.ty != Type::Error {
                            self.handler.emit(Diagnostic::error(
                                "for-loop container must be an array".to_string(),
                                f.span,
                            ));
                        }
                        Type::Error
                    }
                };
                self.scopes.enter(RibKind::For);
                let slot = self.next_slot();
                let var = self.defs.push(Def::Local(LocalDef {
                    name: f.var,
                    ty: elem_ty.clone(),
                    stack_slot: slot,
                    declaration_inferred: true,
                    definition_ref: definition_ref_of(&elem_ty),
                    span: f.span,
                }));
                self.bind_or_error(f.var, var, f.span);
                let body = self.lower_block(&f.body);
                self.scopes.exit();
                hir::Stmt::For(hir::ForStmt { var, container, body, span: f.span })
            }
            ast::Stmt::Block(b) => {
                self.scopes.enter(RibKind::Block);
                let block = self.lower_block(b);
                self.scopes.exit();
                hir::Stmt::Block(block)
            }
            ast::Stmt::Expression { expr, format, span } => {
                let expr = self.lower_expr(expr);
                hir::Stmt::Expression { expr, format: *format, span: *span }
            }
            ast::Stmt::Comma { loop_level, trailing_space, span } => {
                hir::Stmt::Comma { loop_level: *loop_level, trailing_space: *trailing_space, span: *span }
            }
            ast::Stmt::Declaration(decl) => {
                let declared_ty = decl.ty.as_ref().map(|t| self.lower_type_spec(t));
                let init = decl.init.as_ref().map(|e| self.lower_expr(e));
                let ty = declared_ty
                    .clone()
                    .or_else(|| init.as_ref().map(|e| e.ty.clone()))
                    .unwrap_or(Type::Error);
                let init = match (init, &declared_ty) {
                    (Some(e), Some(dt)) => Some(self.widen(e, dt)),
                    (init, _) => init,
                };
                let slot = self.next_slot();
                let def_id = self.defs.push(Def::Local(LocalDef {
                    name: decl.name,
                    ty: ty.clone(),
                    stack_slot: slot,
                    declaration_inferred: declared_ty.is_none(),
                    definition_ref: definition_ref_of(&ty),
                    span: decl.span,
                }));
                self.bind_or_error(decl.name, def_id, decl.span);
                hir::Stmt::Declaration { def: def_id, init, span: decl.span }
            }
            ast::Stmt::Break { level, span } => hir::Stmt::Break { level: *level, span: *span },
            ast::Stmt::Continue { level, span } => hir::Stmt::Continue { level: *level, span: *span },
            ast::Stmt::Return { value, span } => {
                hir::Stmt::Return { value: value.as_ref().map(|e| self.lower_expr(e)), span: *span }
            }
        }
    }

    fn bind_or_error(&mut self, name: Symbol, def: DefId, span: Span) {
        if !self.scopes.bind(name, def) {
            self.handler.emit(Diagnostic::error(
                format!("`{}` is already declared in this scope", self.arena.resolve(name)),
                span,
            ));
        }
    }

    // -----------------------------------------------------------------
    // Expression lowering / inference
    // -----------------------------------------------------------------

    fn lower_expr(&mut self, expr: &ast::Expr) -> hir::Expr {
        match expr {
            ast::Expr::Int(v, span) => {
                hir::Expr { kind: hir::ExprKind::Int(*v), ty: Type::Int, category: ValueCategory::Constant, span: *span }
            }
            ast::Expr::Str(s, span) => {
                hir::Expr { kind: hir::ExprKind::Str(*s), ty: Type::String, category: ValueCategory::Constant, span: *span }
            }
            ast::Expr::Array(items, span) => {
                let items: Vec<_> = items.iter().map(|e| self.lower_expr(e)).collect();
                let elem_ty = items.first().map(|e| e.ty.clone()).unwrap_or(Type::Error);
                let category = if items.iter().all(|e| e.category == ValueCategory::Constant) {
                    ValueCategory::Constant
                } else {
                    ValueCategory::Runtime
                };
                hir::Expr { kind: hir::ExprKind::Array(items), ty: Type::array_of(elem_ty), category, span: *span }
            }
            ast::Expr::Ident(name, span) => self.lower_ident(*name, *span),
            ast::Expr::Binary(b) => self.lower_binary(b),
            ast::Expr::Unary(u) => self.lower_unary(u),
            ast::Expr::Call(c) => self.lower_call(c),
            ast::Expr::Subscript(s) => self.lower_subscript(s),
            ast::Expr::Dot(d) => self.lower_dot_fields(&d.base, &d.segments, d.span),
            ast::Expr::InstanceOf(i) => self.lower_instanceof(i),
            ast::Expr::Assign(a) => self.lower_assign(a),
            ast::Expr::Paren(inner, span) => {
                let mut e = self.lower_expr(inner);
                e.span = *span;
                e
            }
        }
    }

    fn lower_ident(&mut self, name: Symbol, span: Span) -> hir::Expr {
        match self.scopes.resolve(name) {
            Some(def_id) => match self.defs.get(def_id) {
                Def::Local(local) => hir::Expr {
                    kind: hir::ExprKind::Ident(def_id),
                    ty: local.ty.clone(),
                    category: ValueCategory::Reference,
                    span,
                },
                Def::Generator(_) => hir::Expr {
                    kind: hir::ExprKind::Ident(def_id),
                    ty: Type::Generator(def_id),
                    category: ValueCategory::Runtime,
                    span,
                },
                Def::Pattern(_) | Def::Sum(_) => hir::Expr {
                    kind: hir::ExprKind::Ident(def_id),
                    ty: Type::Error,
                    category: ValueCategory::Runtime,
                    span,
                },
            },
            None if is_builtin_function(self.arena.resolve(name)) => hir::Expr {
                kind: hir::ExprKind::BuiltinFunction(name),
                ty: Type::Builtin,
                category: ValueCategory::Runtime,
                span,
            },
            None => {
                self.handler.emit(Diagnostic::error(format!("undefined name `{}`", self.arena.resolve(name)), span));
                hir::Expr { kind: hir::ExprKind::Error, ty: Type::Error, category: ValueCategory::Runtime, span }
            }
        }
    }

    fn lower_binary(&mut self, b: &ast::BinaryExpr) -> hir::Expr {
        let left = self.lower_expr(&b.left);
        let right = self.lower_expr(&b.right);
        let span = b.span;

        let ty = match b.op {
            ast::BinOp::Or | ast::BinOp::And => Type::Bool,
            ast::BinOp::Eq | ast::BinOp::Ne | ast::BinOp::Lt | ast::BinOp::Gt | ast::BinOp::Le | ast::BinOp::Ge => {
                Type::Bool
            }
            ast::BinOp::Add
                if matches!(left.ty.stripped(), Type::String) && matches!(right.ty.stripped(), Type::String) =>
            {
                Type::String
            }
            ast::BinOp::Add | ast::BinOp::Sub | ast::BinOp::Mul | ast::BinOp::Div | ast::BinOp::Mod => {
                if left.ty.is_int_like() && right.ty.is_int_like() {
                    Type::Int
                } else {
                    if left.ty != Type::Error && right.ty != Type::Error {
                        self.handler.emit(Diagnostic::error("operand types do not match this operator".to_string(), span));
                    }
                    Type::Error
                }
            }
            ast::BinOp::BitAnd | ast::BinOp::BitOr => Type::Int,
        };

        let category = if left.category == ValueCategory::Constant && right.category == ValueCategory::Constant {
            ValueCategory::Constant
        } else {
            ValueCategory::Runtime
        };

        let e = hir::Expr { kind: hir::ExprKind::Binary(b.op, Box::new(left), Box::new(right)), ty, category, span };
        self.fold_if_constant(e)
    }

    fn lower_unary(&mut self, u: &ast::UnaryExpr) -> hir::Expr {
        let operand = self.lower_expr(&u.operand);
        let span = u.span;
        let ty = match u.op {
            ast::UnOp::Neg => Type::Int,
            ast::UnOp::Not => Type::Bool,
        };
        let category = operand.category;
        let e = hir::Expr { kind: hir::ExprKind::Unary(u.op, Box::new(operand)), ty, category, span };
        self.fold_if_constant(e)
    }

    fn lower_call(&mut self, call: &ast::CallExpr) -> hir::Expr {
        if let ast::Expr::Dot(dot) = call.callee.as_ref() {
            if let Some((method, segments)) = dot.segments.split_last() {
                let receiver = self.lower_dot_fields(&dot.base, segments, dot.span);
                let args = call.args.iter().map(|a| hir::Arg { name: a.name, value: self.lower_expr(&a.value) }).collect();
                return hir::Expr {
                    kind: hir::ExprKind::MethodCall { receiver: Box::new(receiver), method: *method, args },
                    ty: Type::Builtin,
                    category: ValueCategory::Runtime,
                    span: call.span,
                };
            }
        }

        let callee = self.lower_expr(&call.callee);
        let args: Vec<_> = call.args.iter().map(|a| hir::Arg { name: a.name, value: self.lower_expr(&a.value) }).collect();
        let ty = match callee.ty {
            Type::Generator(_) => Type::String,
            Type::Builtin => Type::Builtin,
            Type::Error => Type::Error,
            _ => {
                self.handler.emit(Diagnostic::error("value is not callable".to_string(), call.span));
                Type::Error
            }
        };
        hir::Expr {
            kind: hir::ExprKind::Call(Box::new(callee), args),
            ty,
            category: ValueCategory::Runtime,
            span: call.span,
        }
    }

    fn lower_subscript(&mut self, s: &ast::SubscriptExpr) -> hir::Expr {
        let base = self.lower_expr(&s.base);
        let index = self.lower_expr(&s.index);
        let ty = match base.ty.stripped() {
            Type::Array(elem) => (**elem).clone(),
            Type::String => Type::String,
            Type::Error => Type::Error,
            _ => {
                self.handler.emit(Diagnostic::error("value cannot be indexed".to_string(), s.span));
                Type::Error
            }
        };
        let category = if base.category == ValueCategory::Reference { ValueCategory::Reference } else { ValueCategory::Runtime };
        hir::Expr {
            kind: hir::ExprKind::Subscript(Box::new(base), Box::new(index)),
            ty,
            category,
            span: s.span,
        }
    }

    fn lower_dot_fields(&mut self, base: &ast::Expr, segments: &[Symbol], span: Span) -> hir::Expr {
        let mut cur = self.lower_expr(base);
        for seg in segments {
            cur = self.apply_dot_segment(cur, *seg, span);
        }
        cur
    }

    fn apply_dot_segment(&mut self, base: hir::Expr, seg: Symbol, span: Span) -> hir::Expr {
        if let Type::Pattern(def_id) = base.ty.stripped().clone() {
            if let Some(field) = self.defs.pattern(def_id).and_then(|p| p.fields.iter().find(|f| f.name == seg)) {
                let ty = field.ty.clone();
                let entry_index = field.entry_index;
                return hir::Expr {
                    kind: hir::ExprKind::Field { base: Box::new(base), field: seg, entry_index },
                    ty,
                    category: ValueCategory::Reference,
                    span,
                };
            }
        }
        hir::Expr {
            kind: hir::ExprKind::Property { base: Box::new(base), name: seg },
            ty: Type::Builtin,
            category: ValueCategory::Runtime,
            span,
        }
    }

    fn lower_instanceof(&mut self, i: &ast::InstanceOfExpr) -> hir::Expr {
        let value = self.lower_expr(&i.value);
        let pattern = match self.global_defs.get(&i.ty) {
            Some(&id) if self.defs.pattern(id).is_some() || self.defs.sum(id).is_some() => id,
            _ => {
                self.handler.emit(Diagnostic::error(format!("`{}` is not a known pattern or sum", self.arena.resolve(i.ty)), i.span));
                return hir::Expr { kind: hir::ExprKind::Error, ty: Type::Error, category: ValueCategory::Runtime, span: i.span };
            }
        };
        hir::Expr {
            kind: hir::ExprKind::InstanceOf { value: Box::new(value), pattern },
            ty: Type::Bool,
            category: ValueCategory::Runtime,
            span: i.span,
        }
    }

    fn lower_assign(&mut self, a: &ast::AssignExpr) -> hir::Expr {
        let target = self.lower_expr(&a.target);
        if target.category != ValueCategory::Reference {
            self.handler.emit(Diagnostic::error("left side of an assignment must be a place".to_string(), a.span));
        }
        let value = self.lower_expr(&a.value);
        let value = self.widen(value, &target.ty);
        let ty = target.ty.clone();
        hir::Expr {
            kind: hir::ExprKind::Assign(Box::new(target), Box::new(value)),
            ty,
            category: ValueCategory::Runtime,
            span: a.span,
        }
    }

    // -----------------------------------------------------------------
    // Constant folding
    // -----------------------------------------------------------------

    fn fold_if_constant(&mut self, expr: hir::Expr) -> hir::Expr {
        if expr.category != ValueCategory::Constant {
            return expr;
        }
        match self.eval_const(&expr) {
            Some(cv) => hir::Expr { kind: hir::ExprKind::ConstFolded(cv), ty: expr.ty, category: ValueCategory::Constant, span: expr.span },
            None => expr,
        }
    }

    /// Widens a constant expression to `target`'s type, folding it and,
    /// when the target is a pattern/sum, deferring the actual match to
    /// `tg-eval` via [`hir::ExprKind::MatchCoerce`] (see DESIGN.md).
    fn widen(&mut self, expr: hir::Expr, target: &Type) -> hir::Expr {
        if expr.category != ValueCategory::Constant {
            return expr;
        }
        if target.is_pattern_or_sum() && matches!(expr.ty.stripped(), Type::String) {
            let def_id = match target.stripped() {
                Type::Pattern(id) | Type::Sum(id) => *id,
                _ => unreachable!(),
            };
            let span = expr.span;
            return hir::Expr {
                kind: hir::ExprKind::MatchCoerce { source: Box::new(expr), target: def_id },
                ty: target.clone(),
                category: ValueCategory::Constant,
                span,
            };
        }
        self.fold_if_constant(expr)
    }

    fn eval_const(&mut self, expr: &hir::Expr) -> Option<ConstValue> {
        match &expr.kind {
            hir::ExprKind::Int(v) => Some(ConstValue::Int(*v)),
            hir::ExprKind::Str(s) => Some(ConstValue::Str(*s)),
            hir::ExprKind::ConstFolded(c) => Some(c.clone()),
            hir::ExprKind::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.eval_const(item)?);
                }
                Some(ConstValue::Array(out))
            }
            hir::ExprKind::Binary(op, l, r) => {
                let l = self.eval_const(l)?;
                let r = self.eval_const(r)?;
                self.eval_const_binary(*op, l, r)
            }
            hir::ExprKind::Unary(op, v) => {
                let v = self.eval_const(v)?;
                self.eval_const_unary(*op, v)
            }
            _ => None,
        }
    }

    fn eval_const_binary(&mut self, op: ast::BinOp, l: ConstValue, r: ConstValue) -> Option<ConstValue> {
        use ConstValue::*;
        match (op, l, r) {
            (ast::BinOp::Add, Str(a), Str(b)) => {
                let joined = format!("{}{}", self.arena.resolve(a), self.arena.resolve(b));
                Some(Str(self.arena.intern(&joined)))
            }
            (ast::BinOp::Add, Int(a), Int(b)) => Some(Int(a.checked_add(b)?)),
            (ast::BinOp::Sub, Int(a), Int(b)) => Some(Int(a.checked_sub(b)?)),
            (ast::BinOp::Mul, Int(a), Int(b)) => Some(Int(a.checked_mul(b)?)),
            (ast::BinOp::Div, Int(a), Int(b)) if b != 0 => Some(Int(a / b)),
            (ast::BinOp::Mod, Int(a), Int(b)) if b != 0 => Some(Int(a % b)),
            (ast::BinOp::BitAnd, Int(a), Int(b)) => Some(Int(a & b)),
            (ast::BinOp::BitOr, Int(a), Int(b)) => Some(Int(a | b)),
            (ast::BinOp::Eq, a, b) => Some(Bool(a == b)),
            (ast::BinOp::Ne, a, b) => Some(Bool(a != b)),
            (ast::BinOp::Lt, Int(a), Int(b)) => Some(Bool(a < b)),
            (ast::BinOp::Gt, Int(a), Int(b)) => Some(Bool(a > b)),
            (ast::BinOp::Le, Int(a), Int(b)) => Some(Bool(a <= b)),
            (ast::BinOp::Ge, Int(a), Int(b)) => Some(Bool(a >= b)),
            (ast::BinOp::And, Bool(a), Bool(b)) => Some(Bool(a && b)),
            (ast::BinOp::Or, Bool(a), Bool(b)) => Some(Bool(a || b)),
            _ => None,
        }
    }

    fn eval_const_unary(&self, op: ast::UnOp, v: ConstValue) -> Option<ConstValue> {
        match (op, v) {
            (ast::UnOp::Neg, ConstValue::Int(v)) => v.checked_neg().map(ConstValue::Int),
            (ast::UnOp::Not, ConstValue::Bool(v)) => Some(ConstValue::Bool(!v)),
            _ => None,
        }
    }

    // -----------------------------------------------------------------
    // Dead-output analysis
    // -----------------------------------------------------------------

    fn mark_dead_output(&self, block: &mut hir::Block) {
        let mut skip = 0u32;
        let mut block_has_output = false;
        for seg in &mut block.segments {
            if segment_has_output(&seg.stmts) {
                seg.whitespace.preceding_newlines = seg.whitespace.preceding_newlines.saturating_sub(skip);
                skip = 0;
                block_has_output = true;
            } else {
                seg.whitespace = Default::default();
                skip += 1;
            }
        }
        block.has_output = block_has_output;
    }

    fn push_frame(&mut self) {
        self.frames.push(0);
    }

    /// Returns the number of stack slots the popped frame claimed, so its
    /// owner (a generator, or the top-level program) can size its call
    /// frame at evaluation time (`tg-eval` has no other way to learn this).
    fn pop_frame(&mut self) -> u32 {
        self.frames.pop().expect("a frame must be active")
    }

    fn next_slot(&mut self) -> u32 {
        let top = self.frames.last_mut().expect("a frame must be active");
        let slot = *top;
        *top += 1;
        slot
    }
}

/// The fixed set of free functions `tg-builtins` catalogs (spec §4.7).
/// These aren't declared anywhere in source, so they're recognized here by
/// name rather than through the usual scope-binding path.
fn is_builtin_function(name: &str) -> bool {
    matches!(name, "range" | "max" | "min" | "read_json_document")
}

fn definition_ref_of(ty: &Type) -> Option<DefId> {
    match ty.stripped() {
        Type::Pattern(id) | Type::Sum(id) => Some(*id),
        _ => None,
    }
}

fn segment_has_output(stmts: &[hir::Stmt]) -> bool {
    stmts.iter().any(stmt_has_output)
}

fn stmt_has_output(stmt: &hir::Stmt) -> bool {
    match stmt {
        hir::Stmt::Literal { .. } => true,
        hir::Stmt::Comma { .. } => true,
        hir::Stmt::Expression { expr, .. } => expr.ty != Type::Void,
        hir::Stmt::If(i) => i.then_block.has_output || i.else_block.as_ref().is_some_and(|b| b.has_output),
        hir::Stmt::For(f) => f.body.has_output,
        hir::Stmt::Block(b) => b.has_output,
        hir::Stmt::Declaration { .. } | hir::Stmt::Break { .. } | hir::Stmt::Continue { .. } | hir::Stmt::Return { .. } => false,
    }
}
