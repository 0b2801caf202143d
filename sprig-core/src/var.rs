// sprig-core - Value model, symbols, vars and namespaces for the Sprig language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Vars: named, mutable cells owned by a namespace.
//!
//! Compiled code holds the `Var` itself rather than its value, so storing a
//! new root is visible to every function that references it on its next
//! dereference.

use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::symbol::Symbol;
use crate::value::Value;

struct VarInner {
    ns: Rc<str>,
    name: Symbol,
    root: RefCell<Value>,
    is_macro: Cell<bool>,
}

/// A shared handle to a namespace-owned cell. Clones share the cell.
#[derive(Clone)]
pub struct Var {
    inner: Rc<VarInner>,
}

impl Var {
    /// Create a Var named `name` in namespace `ns` holding `value`.
    pub fn new(ns: &str, name: Symbol, value: Value) -> Self {
        Var {
            inner: Rc::new(VarInner {
                ns: Rc::from(ns),
                name,
                root: RefCell::new(value),
                is_macro: Cell::new(false),
            }),
        }
    }

    /// Get the current root value.
    pub fn deref(&self) -> Value {
        self.inner.root.borrow().clone()
    }

    /// Replace the root value.
    pub fn set_root(&self, value: Value) {
        *self.inner.root.borrow_mut() = value;
    }

    pub fn is_macro(&self) -> bool {
        self.inner.is_macro.get()
    }

    /// Flag (or unflag) this Var as a macro. Calls naming a macro Var in
    /// function position are expanded at compile time.
    pub fn set_macro(&self, is_macro: bool) {
        self.inner.is_macro.set(is_macro);
    }

    /// Name of the owning namespace.
    pub fn ns(&self) -> &str {
        &self.inner.ns
    }

    /// The unqualified name.
    pub fn name(&self) -> &Symbol {
        &self.inner.name
    }

    /// `ns/name`.
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.inner.ns, self.inner.name)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#'{}/{}", self.inner.ns, self.inner.name)
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl PartialEq for Var {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Var {}

impl PartialOrd for Var {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Var {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner
            .ns
            .cmp(&other.inner.ns)
            .then_with(|| self.inner.name.cmp(&other.inner.name))
            .then_with(|| Rc::as_ptr(&self.inner).cmp(&Rc::as_ptr(&other.inner)))
    }
}
