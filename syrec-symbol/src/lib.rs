//! Interned identifiers shared across the SyReC IR and analyzer.
//!
//! Every identifier that appears in the IR — variable names, module names,
//! loop-variable names — is interned into a single global table and
//! referenced by a cheap, `Copy` handle ([`Symbol`]) rather than by owned
//! `String`. This avoids re-allocating and re-hashing the same identifier
//! text every time it is looked up in a scope or compared for equality.

use std::{
    collections::HashMap,
    fmt,
    sync::RwLock,
};

/// The sigil that marks a loop-variable identifier in SyReC source, e.g.
/// `$i`. Symbol tables treat sigil-prefixed names as belonging to a
/// disjoint loop-variable namespace on insertion, but as an ordinary string
/// for lookup purposes (callers must include the sigil in the lookup key).
pub const LOOP_VARIABLE_SIGIL: char = '$';

/// Returns true if `name` begins with the loop-variable sigil.
#[inline]
pub fn is_loop_variable_name(name: &str) -> bool {
    name.starts_with(LOOP_VARIABLE_SIGIL)
}

struct Interner {
    strings: Vec<&'static str>,
    names: HashMap<&'static str, Symbol>,
}
impl Interner {
    fn new() -> Self {
        Self {
            strings: Vec::new(),
            names: HashMap::new(),
        }
    }

    fn intern(&mut self, string: &str) -> Symbol {
        if let Some(sym) = self.names.get(string) {
            return *sym;
        }

        // Strings are never evicted for the lifetime of the process, so it
        // is sound to extend their borrow to 'static.
        let string: &'static str = Box::leak(string.to_owned().into_boxed_str());
        let id = self.strings.len() as u32;
        let sym = Symbol(id);
        self.strings.push(string);
        self.names.insert(string, sym);
        sym
    }

    fn resolve(&self, sym: Symbol) -> &'static str {
        self.strings[sym.0 as usize]
    }
}

lazy_static::lazy_static! {
    static ref INTERNER: RwLock<Interner> = RwLock::new(Interner::new());
}

/// A cheap, interned handle to an identifier string.
///
/// Two `Symbol`s compare equal if and only if they were interned from the
/// same text. Equality and hashing are both constant-time regardless of the
/// length of the underlying string.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);
impl Symbol {
    /// Intern `string`, returning a handle that can be cheaply copied and
    /// compared.
    pub fn intern<S: AsRef<str>>(string: S) -> Self {
        INTERNER.write().unwrap().intern(string.as_ref())
    }

    /// Returns the original string this symbol was interned from.
    pub fn as_str(&self) -> &'static str {
        INTERNER.read().unwrap().resolve(*self)
    }

    /// Returns true if this symbol's text begins with the loop-variable
    /// sigil.
    pub fn is_loop_variable(&self) -> bool {
        is_loop_variable_name(self.as_str())
    }
}
impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::intern(s)
    }
}
impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Symbol::intern(s)
    }
}
impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}
impl PartialEq<str> for Symbol {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}
impl PartialEq<&str> for Symbol {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}
impl std::borrow::Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent() {
        let a = Symbol::intern("foo");
        let b = Symbol::intern("foo");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "foo");
    }

    #[test]
    fn distinct_strings_intern_to_distinct_symbols() {
        let a = Symbol::intern("foo");
        let b = Symbol::intern("bar");
        assert_ne!(a, b);
    }

    #[test]
    fn loop_variable_sigil_detection() {
        assert!(is_loop_variable_name("$i"));
        assert!(!is_loop_variable_name("i"));
        let sym = Symbol::intern("$i");
        assert!(sym.is_loop_variable());
    }
}
