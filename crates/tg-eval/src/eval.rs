//! The tree-walking evaluator (spec §4.6): one frame per call (the
//! top-level program is its own frame, exactly like a generator body),
//! a single [`Writer`] threaded through nested generator calls get their
//! own, and every fallible operation reported at its own span rather than
//! aborting the walk - evaluation always produces *something*, the way
//! `tg-sem`'s `Resolver` always produces a type.

use tg_par::ast::{BinOp, UnOp};
use tg_sem::def::{Def, DefId, DefTable};
use tg_sem::hir;
use tg_sem::ty::ConstValue;
use tg_util::{Arena, Diagnostic, Handler, Span, Symbol};

use tg_match::Value;

use crate::error::EvalError;
use crate::flow::Flow;
use crate::format;
use crate::frame::Frame;
use crate::writer::Writer;

pub struct Evaluator<'a> {
    defs: &'a DefTable,
    arena: &'a Arena,
    handler: &'a mut Handler,
    frames: Vec<Frame>,
    /// Whether every `for` loop currently executing is on its last
    /// iteration, outermost first - a `Comma` statement's `loop_level`
    /// indexes from the end of this, so it can target an enclosing loop
    /// rather than the innermost one.
    loop_is_last: Vec<bool>,
}

impl<'a> Evaluator<'a> {
    pub fn new(defs: &'a DefTable, arena: &'a Arena, handler: &'a mut Handler, top_frame: Frame) -> Self {
        Self { defs, arena, handler, frames: vec![top_frame], loop_is_last: Vec::new() }
    }

    pub fn eval_stmts(&mut self, stmts: &[hir::Stmt], writer: &mut Writer) -> Flow {
        for stmt in stmts {
            match self.eval_stmt(stmt, writer) {
                Ok(Flow::Normal) => {}
                Ok(flow) => return flow,
                Err(e) => self.report(e.to_string(), stmt_span(stmt)),
            }
        }
        Flow::Normal
    }

    pub fn eval_block(&mut self, block: &hir::Block, writer: &mut Writer) -> Flow {
        for seg in &block.segments {
            writer.push_segment_whitespace(seg.whitespace);
            let (stmts, trailing_spaces) = self.split_trailing_space(&seg.stmts);
            let flow = self.eval_stmts(stmts, writer);
            if trailing_spaces > 0 {
                writer.add_pending_spaces(trailing_spaces);
            }
            if !flow.is_normal() {
                return flow;
            }
        }
        Flow::Normal
    }

    /// A segment's last statement, if it is a literal run of nothing but
    /// spaces, owes that many spaces to whatever gets written next rather
    /// than always appearing - otherwise a `for` body ending in " " before
    /// its closing brace would print that space on every iteration,
    /// including past the final one, instead of only between items.
    fn split_trailing_space<'s>(&self, stmts: &'s [hir::Stmt]) -> (&'s [hir::Stmt], u32) {
        match stmts.last() {
            Some(hir::Stmt::Literal { text, .. }) => {
                let text = self.arena.resolve(*text);
                if !text.is_empty() && text.bytes().all(|b| b == b' ') {
                    (&stmts[..stmts.len() - 1], text.len() as u32)
                } else {
                    (stmts, 0)
                }
            }
            _ => (stmts, 0),
        }
    }

    fn eval_stmt(&mut self, stmt: &hir::Stmt, writer: &mut Writer) -> Result<Flow, EvalError> {
        match stmt {
            hir::Stmt::Literal { text, .. } => {
                let text = self.arena.resolve(*text).to_string();
                writer.write_str(&text);
                Ok(Flow::Normal)
            }
            hir::Stmt::Expression { expr, format, .. } => {
                let value = self.eval_expr(expr);
                let text = match format {
                    Some(spec) => format::apply(&value, spec),
                    None => value.render(),
                };
                writer.write_str(&text);
                Ok(Flow::Normal)
            }
            hir::Stmt::Comma { loop_level, trailing_space, .. } => {
                self.eval_comma(*loop_level, *trailing_space, writer);
                Ok(Flow::Normal)
            }
            hir::Stmt::Declaration { def, init, .. } => {
                let value = init.as_ref().map(|e| self.eval_expr(e)).unwrap_or(Value::Undefined);
                if let Some(local) = self.defs.local(*def) {
                    self.current_frame_mut().set(local.stack_slot, value);
                }
                Ok(Flow::Normal)
            }
            hir::Stmt::If(s) => Ok(self.eval_if(s, writer)),
            hir::Stmt::For(s) => Ok(self.eval_for(s, writer)),
            hir::Stmt::Block(b) => Ok(self.eval_block(b, writer)),
            hir::Stmt::Break { level, .. } => Ok(Flow::Break(*level)),
            hir::Stmt::Continue { level, .. } => Ok(Flow::Continue(*level)),
            hir::Stmt::Return { value, .. } => {
                if let Some(expr) = value {
                    let v = self.eval_expr(expr);
                    writer.write_str(&v.render());
                }
                Ok(Flow::Return)
            }
        }
    }

    fn eval_if(&mut self, s: &hir::IfStmt, writer: &mut Writer) -> Flow {
        let cond = self.eval_expr(&s.cond);
        match cond.as_bool() {
            Some(true) => self.eval_block(&s.then_block, writer),
            Some(false) => match &s.else_block {
                Some(block) => self.eval_block(block, writer),
                None => Flow::Normal,
            },
            None => {
                self.report("an `if` condition must be a bool", s.cond.span);
                Flow::Normal
            }
        }
    }

    fn eval_for(&mut self, s: &hir::ForStmt, writer: &mut Writer) -> Flow {
        let container = self.eval_expr(&s.container);
        let items = match self.container_items(&container) {
            Some(items) => items,
            None => {
                self.report(format!("a {} value cannot be iterated by `for`", container.type_name()), s.container.span);
                return Flow::Normal;
            }
        };
        let Some(local) = self.defs.local(s.var) else { return Flow::Normal };
        let slot = local.stack_slot;

        let len = items.len();
        self.loop_is_last.push(false);
        let mut result = Flow::Normal;
        for (index, item) in items.into_iter().enumerate() {
            *self.loop_is_last.last_mut().unwrap() = index + 1 == len;
            self.current_frame_mut().set(slot, item);
            match self.eval_block(&s.body, writer) {
                Flow::Normal | Flow::Continue(0) => continue,
                Flow::Break(0) => break,
                Flow::Continue(n) => {
                    result = Flow::Continue(n - 1);
                    break;
                }
                // A `break N>0` always terminates this loop - it has to,
                // there's no other way to unwind past it - but the loop it
                // names (N frames out) resumes rather than also exiting:
                // once this loop has been broken out of, the only useful
                // meaning left for the target frame is "go to your next
                // iteration" (spec §8's nested-break-level scenario).
                Flow::Break(n) => {
                    result = Flow::Continue(n - 1);
                    break;
                }
                Flow::Return => {
                    result = Flow::Return;
                    break;
                }
            }
        }
        self.loop_is_last.pop();
        result
    }

    fn container_items(&self, container: &Value) -> Option<Vec<Value>> {
        match container {
            Value::IntRange(min, max) => Some((*min..*max).map(Value::Int).collect()),
            Value::Array(items) => Some(items.borrow().clone()),
            Value::Custom(_) => tg_builtins::iter_values(container),
            _ => None,
        }
    }

    /// A comma prints unless every loop frame from its target outward to
    /// the innermost one is on its last iteration - if any of them still
    /// has more items coming, there is more output still to separate from
    /// (`invoke.cpp`'s `stmt_comma` case: `not_last` is OR'd across every
    /// frame from `comma.index` to the innermost).
    fn eval_comma(&mut self, loop_level: Option<u32>, trailing_space: bool, writer: &mut Writer) {
        let level = loop_level.unwrap_or(0) as usize;
        let emit = match self.loop_is_last.len().checked_sub(1 + level) {
            Some(target) => self.loop_is_last[target..].iter().any(|&last| !last),
            None => false,
        };
        if emit {
            writer.write_str(",");
            if trailing_space {
                writer.add_pending_spaces(1);
            }
        }
    }

    /// Always produces a value - every fallible path reports at its own
    /// span and falls back to [`Value::Undefined`] so the surrounding
    /// statement can keep going.
    fn eval_expr(&mut self, expr: &hir::Expr) -> Value {
        match &expr.kind {
            hir::ExprKind::Int(n) => Value::Int(*n),
            hir::ExprKind::Str(sym) => Value::str(self.arena.resolve(*sym)),
            hir::ExprKind::Array(items) => {
                let values = items.iter().map(|e| self.eval_expr(e)).collect();
                Value::array(values)
            }
            hir::ExprKind::Ident(def_id) => self.read_ident(*def_id),
            hir::ExprKind::BuiltinFunction(sym) => Value::BuiltinFunction(*sym),
            hir::ExprKind::Binary(op, l, r) => self.eval_binary(*op, l, r, expr.span),
            hir::ExprKind::Unary(op, operand) => self.eval_unary(*op, operand, expr.span),
            hir::ExprKind::Call(callee, args) => match self.eval_call(callee, args) {
                Ok(v) => v,
                Err(e) => {
                    self.report(e.to_string(), expr.span);
                    Value::Undefined
                }
            },
            hir::ExprKind::MethodCall { receiver, method, args } => {
                match self.eval_method_call(receiver, *method, args) {
                    Ok(v) => v,
                    Err(e) => {
                        self.report(e.to_string(), expr.span);
                        Value::Undefined
                    }
                }
            }
            hir::ExprKind::Subscript(base, index) => match self.eval_subscript(base, index) {
                Ok(v) => v,
                Err(e) => {
                    self.report(e.to_string(), expr.span);
                    Value::Undefined
                }
            },
            hir::ExprKind::Field { base, entry_index, .. } => self.eval_field(base, *entry_index, expr.span),
            hir::ExprKind::Property { base, name } => match self.eval_property(base, *name) {
                Ok(v) => v,
                Err(e) => {
                    self.report(e.to_string(), expr.span);
                    Value::Undefined
                }
            },
            hir::ExprKind::InstanceOf { value, pattern } => self.eval_instance_of(value, *pattern),
            hir::ExprKind::Assign(target, value) => self.eval_assign(target, value, expr.span),
            hir::ExprKind::MatchCoerce { source, target } => {
                let v = self.eval_expr(source);
                tg_match::match_value(self.defs, self.arena, self.handler, *target, &v, expr.span).unwrap_or(Value::Undefined)
            }
            hir::ExprKind::ConstFolded(c) => self.const_to_value(c),
            hir::ExprKind::Error => Value::Undefined,
        }
    }

    fn read_ident(&self, def_id: DefId) -> Value {
        match self.defs.get(def_id) {
            Def::Local(l) => self.current_frame().get(l.stack_slot),
            Def::Generator(_) => Value::Generator(def_id),
            Def::Pattern(_) | Def::Sum(_) => Value::Undefined,
        }
    }

    fn const_to_value(&self, c: &ConstValue) -> Value {
        match c {
            ConstValue::Int(n) => Value::Int(*n),
            ConstValue::Bool(b) => Value::Bool(*b),
            ConstValue::Str(sym) => Value::str(self.arena.resolve(*sym)),
            ConstValue::Array(items) => Value::array(items.iter().map(|c| self.const_to_value(c)).collect()),
        }
    }

    fn eval_binary(&mut self, op: BinOp, left: &hir::Expr, right: &hir::Expr, span: Span) -> Value {
        match op {
            BinOp::And => {
                let l = self.eval_expr(left);
                match l.as_bool() {
                    Some(false) => Value::Bool(false),
                    Some(true) => {
                        let r = self.eval_expr(right);
                        Value::Bool(r.as_bool().unwrap_or_else(|| {
                            self.report("operand of `&&` must be a bool", right.span);
                            false
                        }))
                    }
                    None => {
                        self.report("operand of `&&` must be a bool", left.span);
                        Value::Undefined
                    }
                }
            }
            BinOp::Or => {
                let l = self.eval_expr(left);
                match l.as_bool() {
                    Some(true) => Value::Bool(true),
                    Some(false) => {
                        let r = self.eval_expr(right);
                        Value::Bool(r.as_bool().unwrap_or_else(|| {
                            self.report("operand of `||` must be a bool", right.span);
                            false
                        }))
                    }
                    None => {
                        self.report("operand of `||` must be a bool", left.span);
                        Value::Undefined
                    }
                }
            }
            BinOp::Eq | BinOp::Ne => {
                let l = self.eval_expr(left);
                let r = self.eval_expr(right);
                let eq = values_equal(&l, &r);
                Value::Bool(if op == BinOp::Eq { eq } else { !eq })
            }
            _ => {
                let l = self.eval_expr(left);
                let r = self.eval_expr(right);
                if op == BinOp::Add {
                    if let (Value::Str(a), Value::Str(b)) = (&l, &r) {
                        return Value::str(format!("{a}{b}"));
                    }
                }
                match op {
                    BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => self.eval_compare(op, &l, &r, span),
                    _ => self.eval_int_binary(op, &l, &r, span),
                }
            }
        }
    }

    fn eval_int_binary(&mut self, op: BinOp, l: &Value, r: &Value, span: Span) -> Value {
        let (Some(a), Some(b)) = (l.as_int(), r.as_int()) else {
            self.report(EvalError::TypeMismatch.to_string(), span);
            return Value::Undefined;
        };
        match op {
            BinOp::Add => Value::Int(a.wrapping_add(b)),
            BinOp::Sub => Value::Int(a.wrapping_sub(b)),
            BinOp::Mul => Value::Int(a.wrapping_mul(b)),
            BinOp::Div => {
                if b == 0 {
                    self.report(EvalError::DivisionByZero.to_string(), span);
                    Value::Undefined
                } else {
                    Value::Int(a / b)
                }
            }
            BinOp::Mod => {
                if b == 0 {
                    self.report(EvalError::DivisionByZero.to_string(), span);
                    Value::Undefined
                } else {
                    Value::Int(a % b)
                }
            }
            BinOp::BitAnd => Value::Int(a & b),
            BinOp::BitOr => Value::Int(a | b),
            _ => unreachable!("handled by eval_binary/eval_compare"),
        }
    }

    fn eval_compare(&mut self, op: BinOp, l: &Value, r: &Value, span: Span) -> Value {
        let (Some(a), Some(b)) = (l.as_int(), r.as_int()) else {
            self.report(EvalError::TypeMismatch.to_string(), span);
            return Value::Undefined;
        };
        Value::Bool(match op {
            BinOp::Lt => a < b,
            BinOp::Gt => a > b,
            BinOp::Le => a <= b,
            BinOp::Ge => a >= b,
            _ => unreachable!("handled by eval_binary"),
        })
    }

    fn eval_unary(&mut self, op: UnOp, operand: &hir::Expr, span: Span) -> Value {
        let v = self.eval_expr(operand);
        match op {
            UnOp::Neg => match v.as_int() {
                Some(n) => Value::Int(-n),
                None => {
                    self.report("operand of unary `-` must be an int", span);
                    Value::Undefined
                }
            },
            UnOp::Not => match v.as_bool() {
                Some(b) => Value::Bool(!b),
                None => {
                    self.report("operand of `!` must be a bool", span);
                    Value::Undefined
                }
            },
        }
    }

    fn eval_call(&mut self, callee: &hir::Expr, args: &[hir::Arg]) -> Result<Value, EvalError> {
        let callee_v = self.eval_expr(callee);
        match callee_v {
            Value::Generator(def_id) => Ok(self.call_generator(def_id, args)),
            Value::BuiltinFunction(sym) => {
                let name = self.arena.resolve(sym);
                let mut arg_values = Vec::with_capacity(args.len());
                for a in args {
                    arg_values.push(self.eval_expr(&a.value));
                }
                match tg_builtins::call_free_function(name, &arg_values) {
                    Some(Ok(v)) => Ok(v),
                    Some(Err(msg)) => Err(EvalError::Builtin(msg)),
                    None => Err(EvalError::UnknownMember { name: name.to_string(), value_type: "function" }),
                }
            }
            _ => Err(EvalError::NotCallable),
        }
    }

    fn call_generator(&mut self, def_id: DefId, args: &[hir::Arg]) -> Value {
        let Some(gen_def) = self.defs.generator(def_id) else {
            self.report(EvalError::NotCallable.to_string(), Span::DUMMY);
            return Value::Undefined;
        };

        struct Bound {
            name: Option<Symbol>,
            value: Value,
        }
        let mut evaluated = Vec::with_capacity(args.len());
        for a in args {
            let value = self.eval_expr(&a.value);
            evaluated.push(Bound { name: a.name, value });
        }

        self.frames.push(Frame::new(gen_def.stack_size));
        let mut positional_idx = 0;
        for p in &gen_def.params {
            let Some(local) = self.defs.local(p.def) else { continue };
            let supplied = evaluated
                .iter()
                .find(|a| a.name == Some(local.name))
                .map(|a| a.value.clone())
                .or_else(|| {
                    while positional_idx < evaluated.len() && evaluated[positional_idx].name.is_some() {
                        positional_idx += 1;
                    }
                    let found = evaluated.get(positional_idx).map(|a| a.value.clone());
                    if found.is_some() {
                        positional_idx += 1;
                    }
                    found
                });
            let value = match supplied {
                Some(v) => v,
                None => match &p.default {
                    Some(default_expr) => self.eval_expr(default_expr),
                    None => {
                        self.report(format!("missing argument `{}`", self.arena.resolve(local.name)), p.span);
                        Value::Undefined
                    }
                },
            };
            let value = self.coerce_to_type(value, &p.ty, p.span);
            self.current_frame_mut().set(local.stack_slot, value);
        }

        let mut writer = Writer::new();
        self.eval_block(&gen_def.body, &mut writer);
        self.frames.pop();
        Value::str(writer.into_string())
    }

    /// Coerces a generator argument into the shape its declared parameter
    /// type needs - a safety net alongside whatever `MatchCoerce` nodes
    /// `tg-sem` may already have inserted at the call site: idempotent
    /// when a value has already been matched, the actual coercion when it
    /// hasn't.
    fn coerce_to_type(&mut self, value: Value, ty: &tg_sem::ty::Type, span: Span) -> Value {
        use tg_sem::ty::Type;
        match ty.stripped() {
            Type::Pattern(def_id) | Type::Sum(def_id) => match &value {
                Value::Pattern(_) => value,
                _ => tg_match::match_value(self.defs, self.arena, self.handler, *def_id, &value, span).unwrap_or(Value::Undefined),
            },
            _ => value,
        }
    }

    fn eval_method_call(&mut self, receiver: &hir::Expr, method: Symbol, args: &[hir::Arg]) -> Result<Value, EvalError> {
        let recv = self.eval_expr(receiver);
        let mut arg_values = Vec::with_capacity(args.len());
        for a in args {
            arg_values.push(self.eval_expr(&a.value));
        }
        let name = self.arena.resolve(method);
        match tg_builtins::method(&recv, name, &arg_values) {
            Some(Ok(v)) => Ok(v),
            Some(Err(msg)) => Err(EvalError::Builtin(msg)),
            None => Err(EvalError::UnknownMember { name: name.to_string(), value_type: recv.type_name() }),
        }
    }

    fn eval_property(&mut self, base: &hir::Expr, name: Symbol) -> Result<Value, EvalError> {
        let recv = self.eval_expr(base);
        let name_str = self.arena.resolve(name);
        match tg_builtins::property(&recv, name_str) {
            Some(Ok(v)) => Ok(v),
            Some(Err(msg)) => Err(EvalError::Builtin(msg)),
            None => Err(EvalError::UnknownMember { name: name_str.to_string(), value_type: recv.type_name() }),
        }
    }

    fn eval_field(&mut self, base: &hir::Expr, entry_index: usize, span: Span) -> Value {
        let v = self.eval_expr(base);
        match &v {
            Value::Pattern(p) => p.fields.get(entry_index).cloned().unwrap_or(Value::Undefined),
            _ => {
                self.report("value is not a pattern instance", span);
                Value::Undefined
            }
        }
    }

    fn eval_instance_of(&mut self, value: &hir::Expr, pattern: DefId) -> Value {
        let v = self.eval_expr(value);
        match &v {
            Value::Pattern(p) => Value::Bool(p.def == pattern),
            Value::Str(s) => {
                let mut probe = Handler::new();
                Value::Bool(tg_match::match_definition(self.defs, self.arena, &mut probe, pattern, s).is_some())
            }
            _ => Value::Bool(false),
        }
    }

    fn eval_subscript(&mut self, base: &hir::Expr, index: &hir::Expr) -> Result<Value, EvalError> {
        let base_v = self.eval_expr(base);
        let index_v = self.eval_expr(index);
        match &base_v {
            Value::Array(items) => {
                let i = index_v.as_int().ok_or(EvalError::TypeMismatch)?;
                let items = items.borrow();
                let idx = if i < 0 { i + items.len() as i64 } else { i };
                if idx < 0 || idx as usize >= items.len() {
                    return Err(EvalError::IndexOutOfBounds { index: i, len: items.len() });
                }
                Ok(items[idx as usize].clone())
            }
            Value::Custom(_) => match tg_builtins::subscript(&base_v, &index_v) {
                Some(Ok(v)) => Ok(v),
                Some(Err(msg)) => Err(EvalError::Builtin(msg)),
                None => Err(EvalError::TypeMismatch),
            },
            _ => Err(EvalError::TypeMismatch),
        }
    }

    fn eval_assign(&mut self, target: &hir::Expr, value: &hir::Expr, span: Span) -> Value {
        let v = self.eval_expr(value);
        match &target.kind {
            hir::ExprKind::Ident(def_id) => {
                if let Some(local) = self.defs.local(*def_id) {
                    self.current_frame_mut().set(local.stack_slot, v.clone());
                }
            }
            hir::ExprKind::Subscript(base, index) => {
                let base_v = self.eval_expr(base);
                let index_v = self.eval_expr(index);
                match (&base_v, index_v.as_int()) {
                    (Value::Array(items), Some(i)) => {
                        let mut items = items.borrow_mut();
                        let idx = if i < 0 { i + items.len() as i64 } else { i };
                        if idx >= 0 && (idx as usize) < items.len() {
                            items[idx as usize] = v.clone();
                        } else {
                            self.report(EvalError::IndexOutOfBounds { index: i, len: items.len() }.to_string(), span);
                        }
                    }
                    _ => self.report(EvalError::NotAssignable.to_string(), span),
                }
            }
            _ => self.report(EvalError::NotAssignable.to_string(), span),
        }
        v
    }

    fn current_frame(&self) -> &Frame {
        self.frames.last().expect("a frame must be active")
    }

    fn current_frame_mut(&mut self) -> &mut Frame {
        self.frames.last_mut().expect("a frame must be active")
    }

    fn report(&mut self, message: impl Into<String>, span: Span) {
        self.handler.emit(Diagnostic::error(message, span));
    }
}

fn values_equal(l: &Value, r: &Value) -> bool {
    match (l, r) {
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Undefined, Value::Undefined) => true,
        (Value::Void, Value::Void) => true,
        _ => false,
    }
}

fn stmt_span(stmt: &hir::Stmt) -> Span {
    match stmt {
        hir::Stmt::Literal { span, .. }
        | hir::Stmt::Expression { span, .. }
        | hir::Stmt::Comma { span, .. }
        | hir::Stmt::Declaration { span, .. }
        | hir::Stmt::Break { span, .. }
        | hir::Stmt::Continue { span, .. }
        | hir::Stmt::Return { span, .. } => *span,
        hir::Stmt::If(s) => s.span,
        hir::Stmt::For(s) => s.span,
        hir::Stmt::Block(b) => b.span,
    }
}

