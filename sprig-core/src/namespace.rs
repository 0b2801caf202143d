// sprig-core - Value model, symbols, vars and namespaces for the Sprig language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Namespaces: named registries of Vars.
//!
//! A namespace owns a mapping from unqualified symbols to Vars and a list of
//! referred namespaces. Unqualified lookups fall back to namespaces referred
//! with `all`; qualified lookups go through the alias (or name) a namespace
//! was referred under.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::trace;

use crate::symbol::Symbol;
use crate::value::Value;
use crate::var::Var;

/// A namespace handle. Clones share the same registry.
#[derive(Clone)]
pub struct Namespace {
    inner: Rc<NamespaceInner>,
}

struct NamespaceInner {
    name: Rc<str>,
    registry: RefCell<HashMap<Symbol, Var>>,
    /// Insertion-ordered; unqualified fallback walks it front to back.
    refers: RefCell<Vec<Refer>>,
}

struct Refer {
    key: Rc<str>,
    ns: Namespace,
    all: bool,
}

impl Namespace {
    /// Create a new, empty namespace.
    pub fn new(name: &str) -> Self {
        Namespace {
            inner: Rc::new(NamespaceInner {
                name: Rc::from(name),
                registry: RefCell::new(HashMap::new()),
                refers: RefCell::new(Vec::new()),
            }),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Bind `name` to `value` in this namespace, creating the Var if needed.
    /// An existing Var keeps its identity and gets a new root.
    pub fn def(&self, name: &str, value: Value) -> Var {
        let var = self.intern(&Symbol::new(name));
        var.set_root(value);
        var
    }

    /// Find the Var for `sym` in this namespace's own registry, creating it
    /// with a nil root if absent. The symbol's namespace part is ignored.
    pub fn intern(&self, sym: &Symbol) -> Var {
        let key = sym.unqualified();
        if let Some(var) = self.inner.registry.borrow().get(&key) {
            return var.clone();
        }
        trace!("interning {}/{}", self.name(), key);
        let var = Var::new(self.name(), key.clone(), Value::Nil);
        self.inner.registry.borrow_mut().insert(key, var.clone());
        var
    }

    /// Look up a Var in the own registry only.
    #[must_use]
    pub fn find_var(&self, sym: &Symbol) -> Option<Var> {
        self.inner.registry.borrow().get(&sym.unqualified()).cloned()
    }

    /// Resolve a symbol without creating anything.
    ///
    /// Unqualified: own registry, then each refer-all namespace in the order
    /// it was referred. Qualified: the own registry when the qualifier is this
    /// namespace's name, else the namespace referred under that key.
    #[must_use]
    pub fn lookup(&self, sym: &Symbol) -> Option<Var> {
        match sym.namespace() {
            None => self.find_var(sym).or_else(|| {
                self.inner
                    .refers
                    .borrow()
                    .iter()
                    .filter(|r| r.all)
                    .find_map(|r| r.ns.find_var(sym))
            }),
            Some(qualifier) if qualifier == self.name() => self.find_var(sym),
            Some(qualifier) => self
                .inner
                .refers
                .borrow()
                .iter()
                .find(|r| &*r.key == qualifier)
                .and_then(|r| r.ns.find_var(sym)),
        }
    }

    /// [`lookup`](Self::lookup), creating the Var in this namespace when the
    /// symbol is unqualified or qualified with this namespace's name. A
    /// symbol qualified with an unknown namespace resolves to `None`.
    pub fn lookup_or_intern(&self, sym: &Symbol) -> Option<Var> {
        if let Some(var) = self.lookup(sym) {
            return Some(var);
        }
        match sym.namespace() {
            None => Some(self.intern(sym)),
            Some(qualifier) if qualifier == self.name() => Some(self.intern(sym)),
            Some(_) => None,
        }
    }

    /// Refer another namespace under `alias` (or its own name). With `all`,
    /// its Vars also resolve unqualified. Referring again under the same key
    /// replaces the earlier entry.
    pub fn refer(&self, ns: &Namespace, alias: Option<&str>, all: bool) {
        let key: Rc<str> = Rc::from(alias.unwrap_or(ns.name()));
        let mut refers = self.inner.refers.borrow_mut();
        let refer = Refer {
            key: key.clone(),
            ns: ns.clone(),
            all,
        };
        match refers.iter_mut().find(|r| r.key == key) {
            Some(existing) => *existing = refer,
            None => refers.push(refer),
        }
    }

    /// Symbols bound in the own registry, sorted.
    #[must_use]
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut syms: Vec<Symbol> = self.inner.registry.borrow().keys().cloned().collect();
        syms.sort();
        syms
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<ns {}>", self.inner.name)
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl PartialEq for Namespace {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Namespace {}

impl PartialOrd for Namespace {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Namespace {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner
            .name
            .cmp(&other.inner.name)
            .then_with(|| Rc::as_ptr(&self.inner).cmp(&Rc::as_ptr(&other.inner)))
    }
}
