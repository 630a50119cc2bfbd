//! Scope tree for name resolution.
//!
//! Near-verbatim port of `faxc-sem::scope.rs`'s rib structure: each scope
//! is a "rib" with its own bindings and a parent pointer, scopes form a
//! tree, and lookups walk the parent chain. The kinds a rib can be are
//! this language's own (spec §4.4: "pushed on entering generator body,
//! if-then, if-else, for-body, and pattern/sum blocks").

use rustc_hash::FxHashMap;
use tg_util::{Idx, IndexVec, Symbol};

use crate::def::DefId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RibId(u32);

impl Idx for RibId {
    fn from_usize(idx: usize) -> Self {
        RibId(idx as u32)
    }
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
pub struct Rib {
    pub bindings: FxHashMap<Symbol, DefId>,
    pub parent: Option<RibId>,
    pub kind: RibKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RibKind {
    Module,
    Generator,
    IfThen,
    IfElse,
    For,
    Block,
}

pub struct ScopeTree {
    ribs: IndexVec<RibId, Rib>,
    current: RibId,
}

impl ScopeTree {
    pub fn new() -> Self {
        let mut ribs = IndexVec::new();
        let root = ribs.push(Rib { bindings: FxHashMap::default(), parent: None, kind: RibKind::Module });
        Self { ribs, current: root }
    }

    pub fn enter(&mut self, kind: RibKind) -> RibId {
        let rib = self.ribs.push(Rib { bindings: FxHashMap::default(), parent: Some(self.current), kind });
        self.current = rib;
        rib
    }

    pub fn exit(&mut self) {
        if let Some(parent) = self.ribs.get(self.current).and_then(|r| r.parent) {
            self.current = parent;
        }
    }

    /// Binds `name` in the current rib. Returns `false` (and does not
    /// overwrite the existing binding) if `name` is already bound in the
    /// current rib - conflicts are only checked locally, so an outer name
    /// may always be shadowed (spec §4.4).
    pub fn bind(&mut self, name: Symbol, def: DefId) -> bool {
        let rib = self.ribs.get_mut(self.current).expect("current rib must exist");
        if rib.bindings.contains_key(&name) {
            return false;
        }
        rib.bindings.insert(name, def);
        true
    }

    /// Binds `name` in the module (root) rib, regardless of the current
    /// scope - used for pattern/sum/generator names, which are visible
    /// from anywhere (spec §4.3's forward-referenceable definitions).
    pub fn bind_global(&mut self, name: Symbol, def: DefId) -> bool {
        let root = RibId::from_usize(0);
        let rib = self.ribs.get_mut(root).expect("root rib must exist");
        if rib.bindings.contains_key(&name) {
            return false;
        }
        rib.bindings.insert(name, def);
        true
    }

    pub fn resolve(&self, name: Symbol) -> Option<DefId> {
        let mut rib_id = self.current;
        loop {
            let rib = self.ribs.get(rib_id).expect("rib id must exist");
            if let Some(&def) = rib.bindings.get(&name) {
                return Some(def);
            }
            match rib.parent {
                Some(parent) => rib_id = parent,
                None => return None,
            }
        }
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}
