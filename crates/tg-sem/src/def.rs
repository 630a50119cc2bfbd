//! The definition table: every name a program can refer to by identity
//! rather than by text - patterns, sums, generators, and local bindings
//! (declarations, for-loop variables, generator parameters).
//!
//! Grounded on `faxc-sem::scope.rs`'s pairing of a `DefId` newtype with a
//! side table of definitions; unlike `faxc-sem`'s `HashMap<DefId, Type>`
//! split across several maps, this keeps one definition per id since `tg`
//! has far fewer definition shapes than `faxc`'s item set.

use tg_par::ast;
use tg_util::{Idx, IndexVec, Span, Symbol};

use crate::ty::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DefId(u32);

impl Idx for DefId {
    fn from_usize(idx: usize) -> Self {
        DefId(idx as u32)
    }
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub enum Def {
    Pattern(PatternDef),
    Sum(SumDef),
    Generator(GeneratorDef),
    /// A declaration, for-loop variable, or generator parameter (spec
    /// §3's "Symbol entry"). `stack_slot` is assigned once, the first
    /// time the binding is lowered, unique within its enclosing callable
    /// (a generator body, or the top-level file, which is its own frame).
    Local(LocalDef),
}

#[derive(Debug, Clone)]
pub struct PatternDef {
    pub name: Symbol,
    pub entries: Vec<ast::MatchEntry>,
    pub fields: Vec<FieldDef>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: Symbol,
    pub entry_index: usize,
    pub ty: Type,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct SumDef {
    pub name: Symbol,
    /// Resolved member patterns, in declaration order (spec §4.5's sum
    /// matcher tries them in this order and ties resolve to the earliest).
    pub members: Vec<DefId>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct GeneratorDef {
    pub name: Symbol,
    pub params: Vec<ParamDef>,
    pub body: crate::hir::Block,
    /// Number of stack slots a call frame for this generator needs
    /// (params plus every declaration and for-loop variable in its body).
    pub stack_size: u32,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ParamDef {
    pub def: DefId,
    pub ty: Type,
    pub default: Option<crate::hir::Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct LocalDef {
    pub name: Symbol,
    pub ty: Type,
    pub stack_slot: u32,
    /// True when `ty` was written out explicitly (`name : type`) rather
    /// than inferred from an initializer (`name := expr`).
    pub declaration_inferred: bool,
    /// Set when `ty` is `Type::Pattern`/`Type::Sum`: the definition it
    /// names (spec §3's `definition_ref`).
    pub definition_ref: Option<DefId>,
    pub span: Span,
}

/// Owns every [`Def`], indexed by [`DefId`].
#[derive(Debug, Default)]
pub struct DefTable {
    defs: IndexVec<DefId, Def>,
}

impl DefTable {
    pub fn new() -> Self {
        Self { defs: IndexVec::new() }
    }

    pub fn push(&mut self, def: Def) -> DefId {
        self.defs.push(def)
    }

    pub fn get(&self, id: DefId) -> &Def {
        self.defs.get(id).expect("DefId out of range")
    }

    pub fn get_mut(&mut self, id: DefId) -> &mut Def {
        self.defs.get_mut(id).expect("DefId out of range")
    }

    pub fn pattern(&self, id: DefId) -> Option<&PatternDef> {
        match self.get(id) {
            Def::Pattern(p) => Some(p),
            _ => None,
        }
    }

    pub fn sum(&self, id: DefId) -> Option<&SumDef> {
        match self.get(id) {
            Def::Sum(s) => Some(s),
            _ => None,
        }
    }

    pub fn generator(&self, id: DefId) -> Option<&GeneratorDef> {
        match self.get(id) {
            Def::Generator(g) => Some(g),
            _ => None,
        }
    }

    pub fn local(&self, id: DefId) -> Option<&LocalDef> {
        match self.get(id) {
            Def::Local(l) => Some(l),
            _ => None,
        }
    }

    /// Looks up a pattern or sum definition by name. `tg-match` uses this to
    /// resolve a [`ast::MatchEntry::Custom`]'s type name, since those entries
    /// keep the name unresolved (patterns can reference each other and
    /// themselves, including forward references, so resolution happens
    /// lazily here rather than eagerly in `tg-sem`).
    pub fn find_by_name(&self, name: Symbol) -> Option<DefId> {
        self.defs.iter_enumerated().find_map(|(id, def)| match def {
            Def::Pattern(p) if p.name == name => Some(id),
            Def::Sum(s) if s.name == name => Some(id),
            _ => None,
        })
    }

    pub fn iter_enumerated(&self) -> impl Iterator<Item = (DefId, &Def)> {
        self.defs.iter_enumerated()
    }
}
