// sprig-core - Value model, symbols, vars and namespaces for the Sprig language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Process-wide name interner shared by symbols and keywords.
//!
//! Interned names are never deallocated. The table holds an `Arc` to every
//! distinct `(namespace, name)` pair seen so far, so two names with the same
//! text share one allocation and compare by pointer.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

/// Which identifier family a name belongs to. Symbols and keywords with the
/// same text are distinct identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Kind {
    Symbol,
    Keyword,
}

/// An interned, optionally qualified name.
#[derive(Debug)]
pub(crate) struct Name {
    pub(crate) namespace: Option<Arc<str>>,
    pub(crate) name: Arc<str>,
}

type Key = (Kind, Option<Arc<str>>, Arc<str>);

#[derive(Default)]
struct Interner {
    names: HashMap<Key, Arc<Name>>,
    strings: HashSet<Arc<str>>,
}

impl Interner {
    fn string(&mut self, s: &str) -> Arc<str> {
        if let Some(existing) = self.strings.get(s) {
            return Arc::clone(existing);
        }
        let interned: Arc<str> = Arc::from(s);
        self.strings.insert(Arc::clone(&interned));
        interned
    }

    fn name(&mut self, kind: Kind, namespace: Option<&str>, name: &str) -> Arc<Name> {
        let ns = namespace.map(|s| self.string(s));
        let n = self.string(name);
        self.names
            .entry((kind, ns.clone(), Arc::clone(&n)))
            .or_insert_with(|| {
                Arc::new(Name {
                    namespace: ns,
                    name: n,
                })
            })
            .clone()
    }
}

static INTERNER: OnceLock<Mutex<Interner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, Interner> {
    let lock = INTERNER.get_or_init(|| Mutex::new(Interner::default()));
    // A panic while holding the lock cannot leave the tables half-updated,
    // so a poisoned lock is still usable.
    lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub(crate) fn intern(kind: Kind, namespace: Option<&str>, name: &str) -> Arc<Name> {
    interner().name(kind, namespace, name)
}

/// Split `ns/name` on the first slash. A lone `/`, or a slash at either end,
/// leaves the text unqualified.
pub(crate) fn split_qualified(s: &str) -> (Option<&str>, &str) {
    match s.find('/') {
        Some(pos) if pos > 0 && pos + 1 < s.len() => (Some(&s[..pos]), &s[pos + 1..]),
        _ => (None, s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_text_same_pointer() {
        let a = intern(Kind::Symbol, Some("user"), "x");
        let b = intern(Kind::Symbol, Some("user"), "x");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_kinds_are_distinct() {
        let a = intern(Kind::Symbol, None, "x");
        let b = intern(Kind::Keyword, None, "x");
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&a.name, &b.name));
    }

    #[test]
    fn test_split_qualified() {
        assert_eq!(split_qualified("a/b"), (Some("a"), "b"));
        assert_eq!(split_qualified("a/b/c"), (Some("a"), "b/c"));
        assert_eq!(split_qualified("/"), (None, "/"));
        assert_eq!(split_qualified("foo"), (None, "foo"));
    }
}
