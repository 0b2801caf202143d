// sprig-core - Value model, symbols, vars and namespaces for the Sprig language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Keywords are self-evaluating identifiers that may be optionally namespaced.
//!
//! Keywords share the symbol interner but live in their own identity space,
//! so `:foo` and `foo` never compare equal. Invoked as a function, a keyword
//! looks itself up in a map (see [`Keyword::lookup`]).

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::intern::{self, Kind, Name};
use crate::value::Value;

/// A keyword with optional namespace. Printed with a leading `:`.
#[derive(Clone)]
pub struct Keyword {
    inner: Arc<Name>,
}

impl Keyword {
    /// Create a new keyword with no namespace.
    pub fn new(name: &str) -> Self {
        Keyword {
            inner: intern::intern(Kind::Keyword, None, name),
        }
    }

    /// Create a new keyword with a namespace.
    pub fn with_namespace(namespace: &str, name: &str) -> Self {
        Keyword {
            inner: intern::intern(Kind::Keyword, Some(namespace), name),
        }
    }

    /// Parse a keyword from a string like "foo" or "ns/foo" (without colon).
    pub fn parse(s: &str) -> Self {
        match intern::split_qualified(s) {
            (Some(ns), name) => Keyword::with_namespace(ns, name),
            (None, name) => Keyword::new(name),
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

    /// Keyword-as-function: `(:k m)` is the value at `:k` in `m` or nil,
    /// `(:k m default)` returns `default` when the key is absent. Anything
    /// other than a map is treated as having no keys.
    pub fn lookup(&self, args: &[Value]) -> Result<Value> {
        let (target, default) = match args {
            [target] => (target, Value::Nil),
            [target, default] => (target, default.clone()),
            _ => return Err(Error::arity_range(1, 2, args.len()).named(self.to_string())),
        };
        let found = match target {
            Value::Map(map) => map.get(&Value::Keyword(self.clone())).cloned(),
            _ => None,
        };
        Ok(found.unwrap_or(default))
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.namespace {
            Some(ns) => write!(f, ":{}/{}", ns, self.inner.name),
            None => write!(f, ":{}", self.inner.name),
        }
    }
}

impl fmt::Debug for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keyword({})", self)
    }
}

impl PartialEq for Keyword {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Keyword {}

impl PartialOrd for Keyword {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Keyword {
    fn cmp(&self, other: &Self) -> Ordering {
        self.namespace()
            .cmp(&other.namespace())
            .then_with(|| self.name().cmp(other.name()))
    }
}

impl Hash for Keyword {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.inner).hash(state);
    }
}
