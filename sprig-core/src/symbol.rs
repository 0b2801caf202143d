// sprig-core - Value model, symbols, vars and namespaces for the Sprig language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Symbols are identifiers that may be optionally namespaced.
//!
//! Symbols are interned (see [`crate::intern`]), so equality and hashing are
//! pointer operations. Ordering is textual: unqualified symbols sort before
//! qualified ones, then by namespace, then by name.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::intern::{self, Kind, Name};

/// A symbol with optional namespace.
#[derive(Clone)]
pub struct Symbol {
    inner: Arc<Name>,
}

impl Symbol {
    /// Create a new symbol with no namespace.
    pub fn new(name: &str) -> Self {
        Symbol {
            inner: intern::intern(Kind::Symbol, None, name),
        }
    }

    /// Create a new symbol with a namespace.
    pub fn with_namespace(namespace: &str, name: &str) -> Self {
        Symbol {
            inner: intern::intern(Kind::Symbol, Some(namespace), name),
        }
    }

    /// Parse a symbol from a string like "foo" or "ns/foo".
    pub fn parse(s: &str) -> Self {
        match intern::split_qualified(s) {
            (Some(ns), name) => Symbol::with_namespace(ns, name),
            (None, name) => Symbol::new(name),
        }
    }

    /// Get the namespace, if any.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.inner.namespace.as_deref()
    }

    /// Get the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Check if this symbol has a namespace.
    #[must_use]
    pub fn has_namespace(&self) -> bool {
        self.inner.namespace.is_some()
    }

    /// The same name with the namespace dropped.
    #[must_use]
    pub fn unqualified(&self) -> Symbol {
        if self.has_namespace() {
            Symbol::new(self.name())
        } else {
            self.clone()
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.namespace {
            Some(ns) => write!(f, "{}/{}", ns, self.inner.name),
            None => f.write_str(&self.inner.name),
        }
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self)
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Symbol {}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        self.namespace()
            .cmp(&other.namespace())
            .then_with(|| self.name().cmp(other.name()))
    }
}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.inner).hash(state);
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::parse(s)
    }
}
