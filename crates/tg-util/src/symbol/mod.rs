//! String interning.
//!
//! `Symbol` is a 4-byte handle to a string held by an [`Interner`]. Once
//! interned, comparing two identifiers is an integer comparison instead of
//! a byte-for-byte string compare, which matters because the resolver
//! compares names on every scope lookup and the pattern engine compares
//! raw-entry words on every backtrack.
//!
//! This is deliberately not thread-safe: the spec's evaluation model is
//! single-threaded and non-reentrant, so there is exactly one `Interner`
//! per [`crate::Arena`] and no locking is needed.

use rustc_hash::FxHashMap;

/// An interned string handle. Cheap to copy and compare.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl std::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

/// Owns the backing storage for every [`Symbol`] produced during one
/// compilation.
///
/// Strings are bump-allocated so `as_str` can hand back a reference that
/// lives as long as the interner itself without an extra heap allocation
/// per lookup.
pub struct Interner {
    bump: bumpalo::Bump,
    strings: Vec<&'static str>,
    lookup: FxHashMap<&'static str, Symbol>,
}

impl Interner {
    pub fn new() -> Self {
        Self { bump: bumpalo::Bump::new(), strings: Vec::new(), lookup: FxHashMap::default() }
    }

    /// Interns `s`, returning the existing symbol if it was already seen.
    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&sym) = self.lookup.get(s) {
            return sym;
        }
        // SAFETY: the allocation is owned by `self.bump`, which outlives
        // every `&'static str` we hand out for as long as `self` is alive;
        // the `'static` here is a self-borrow in disguise, never leaked
        // past the Interner's own lifetime from outside this module.
        let allocated: &'static str =
            unsafe { std::mem::transmute::<&str, &'static str>(self.bump.alloc_str(s)) };
        let sym = Symbol(self.strings.len() as u32);
        self.strings.push(allocated);
        self.lookup.insert(allocated, sym);
        sym
    }

    pub fn as_str(&self, sym: Symbol) -> &str {
        self.strings[sym.0 as usize]
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_same_string_yields_same_symbol() {
        let mut i = Interner::new();
        let a = i.intern("hello");
        let b = i.intern("hello");
        let c = i.intern("world");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(i.as_str(a), "hello");
        assert_eq!(i.as_str(c), "world");
    }
}
