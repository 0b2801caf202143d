// sprig-core - Value model, symbols, vars and namespaces for the Sprig language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The uniform tagged value type.
//!
//! Every runtime entity is a [`Value`]. Data values (numbers, strings,
//! collections, identifiers) compare structurally; functions, vars and
//! namespaces compare by identity. Lists and vectors are distinct kinds and
//! never compare equal to each other.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use im::{OrdMap, Vector};

use crate::error::{Error, Result};
use crate::function::Invoke;
use crate::keyword::Keyword;
use crate::namespace::Namespace;
use crate::symbol::Symbol;
use crate::var::Var;

/// The fixed type discriminant of a [`Value`].
///
/// Declaration order is the cross-type sort order used by `Ord for Value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeTag {
    Nil,
    Void,
    Boolean,
    Int,
    Char,
    String,
    Symbol,
    Keyword,
    List,
    Vector,
    Map,
    Fn,
    Var,
    Namespace,
    Type,
}

impl TypeTag {
    /// Lowercase name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Nil => "nil",
            TypeTag::Void => "void",
            TypeTag::Boolean => "boolean",
            TypeTag::Int => "int",
            TypeTag::Char => "char",
            TypeTag::String => "string",
            TypeTag::Symbol => "symbol",
            TypeTag::Keyword => "keyword",
            TypeTag::List => "list",
            TypeTag::Vector => "vector",
            TypeTag::Map => "map",
            TypeTag::Fn => "fn",
            TypeTag::Var => "var",
            TypeTag::Namespace => "namespace",
            TypeTag::Type => "type",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    Nil,
    /// Produced by the reader for comments and `#_` discards.
    Void,
    Bool(bool),
    Int(i64),
    Char(char),
    String(Rc<str>),
    Symbol(Symbol),
    Keyword(Keyword),
    List(Vector<Value>),
    Vector(Vector<Value>),
    Map(OrdMap<Value, Value>),
    Fn(Rc<dyn Invoke>),
    Var(Var),
    Namespace(Namespace),
    Type(TypeTag),
}

impl Value {
    pub fn nil() -> Self {
        Value::Nil
    }

    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    pub fn char(c: char) -> Self {
        Value::Char(c)
    }

    pub fn string(s: &str) -> Self {
        Value::String(Rc::from(s))
    }

    /// A symbol parsed from `name` or `ns/name`.
    pub fn symbol(s: &str) -> Self {
        Value::Symbol(Symbol::parse(s))
    }

    /// A keyword parsed from `name` or `ns/name`, without the colon.
    pub fn keyword(s: &str) -> Self {
        Value::Keyword(Keyword::parse(s))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    pub fn vector(items: Vec<Value>) -> Self {
        Value::Vector(items.into_iter().collect())
    }

    /// Later duplicate keys replace earlier ones.
    pub fn map(entries: Vec<(Value, Value)>) -> Self {
        Value::Map(entries.into_iter().collect())
    }

    pub fn func(f: impl Invoke + 'static) -> Self {
        Value::Fn(Rc::new(f))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Value::Void)
    }

    /// Only `nil` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Nil => TypeTag::Nil,
            Value::Void => TypeTag::Void,
            Value::Bool(_) => TypeTag::Boolean,
            Value::Int(_) => TypeTag::Int,
            Value::Char(_) => TypeTag::Char,
            Value::String(_) => TypeTag::String,
            Value::Symbol(_) => TypeTag::Symbol,
            Value::Keyword(_) => TypeTag::Keyword,
            Value::List(_) => TypeTag::List,
            Value::Vector(_) => TypeTag::Vector,
            Value::Map(_) => TypeTag::Map,
            Value::Fn(_) => TypeTag::Fn,
            Value::Var(_) => TypeTag::Var,
            Value::Namespace(_) => TypeTag::Namespace,
            Value::Type(_) => TypeTag::Type,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_tag().name()
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Value::Symbol(sym) => Some(sym),
            _ => None,
        }
    }

    /// Invoke this value with already-evaluated arguments.
    ///
    /// Functions run, keywords act as map accessors and vars invoke their
    /// current root. Everything else is not invocable.
    pub fn invoke(&self, args: &[Value]) -> Result<Value> {
        match self {
            Value::Fn(f) => f.invoke(args),
            Value::Keyword(k) => k.lookup(args),
            Value::Var(v) => v.deref().invoke(args),
            other => Err(Error::NotCallable(other.type_name())),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Nil
    }
}

// ============================================================================
// Printing
// ============================================================================

fn write_seq<'a>(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    items: impl Iterator<Item = &'a Value>,
    close: &str,
) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{}", item)?;
    }
    f.write_str(close)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Void => f.write_str("#<void>"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Char(c) => write!(f, "\\{}", format_char(*c)),
            Value::String(s) => write!(f, "\"{}\"", escape_string(s)),
            Value::Symbol(sym) => write!(f, "{}", sym),
            Value::Keyword(kw) => write!(f, "{}", kw),
            Value::List(items) => write_seq(f, "(", items.iter(), ")"),
            Value::Vector(items) => write_seq(f, "[", items.iter(), "]"),
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{} {}", k, v)?;
                }
                f.write_str("}")
            }
            Value::Fn(func) => match func.name() {
                Some(name) => write!(f, "#<fn {}>", name),
                None => f.write_str("#<fn>"),
            },
            Value::Var(v) => write!(f, "{}", v),
            Value::Namespace(ns) => write!(f, "#<ns {}>", ns.name()),
            Value::Type(tag) => write!(f, "#<type {}>", tag),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

fn format_char(c: char) -> String {
    match c {
        '\n' => "newline".to_string(),
        ' ' => "space".to_string(),
        '\t' => "tab".to_string(),
        '\r' => "return".to_string(),
        '\x08' => "backspace".to_string(),
        '\x0C' => "formfeed".to_string(),
        c if (c.is_control() || c.is_whitespace()) && (c as u32) <= 0xFFFF => {
            format!("u{:04X}", c as u32)
        }
        _ => c.to_string(),
    }
}

fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => result.push_str("\\n"),
            '\t' => result.push_str("\\t"),
            '\r' => result.push_str("\\r"),
            '\x08' => result.push_str("\\b"),
            '\x0C' => result.push_str("\\f"),
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            c if c.is_control() => result.push_str(&format!("\\u{:04X}", c as u32)),
            _ => result.push(c),
        }
    }
    result
}

// ============================================================================
// Equality and ordering
// ============================================================================

fn fn_addr(f: &Rc<dyn Invoke>) -> usize {
    Rc::as_ptr(f).cast::<()>() as usize
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Void, Value::Void) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Keyword(a), Value::Keyword(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Vector(a), Value::Vector(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Fn(a), Value::Fn(b)) => fn_addr(a) == fn_addr(b),
            (Value::Var(a), Value::Var(b)) => a == b,
            (Value::Namespace(a), Value::Namespace(b)) => a == b,
            (Value::Type(a), Value::Type(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_tag = self.type_tag().cmp(&other.type_tag());
        if by_tag != Ordering::Equal {
            return by_tag;
        }

        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Char(a), Value::Char(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Symbol(a), Value::Symbol(b)) => a.cmp(b),
            (Value::Keyword(a), Value::Keyword(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) => a.cmp(b),
            (Value::Vector(a), Value::Vector(b)) => a.cmp(b),
            (Value::Map(a), Value::Map(b)) => a.iter().cmp(b.iter()),
            (Value::Fn(a), Value::Fn(b)) => fn_addr(a).cmp(&fn_addr(b)),
            (Value::Var(a), Value::Var(b)) => a.cmp(b),
            (Value::Namespace(a), Value::Namespace(b)) => a.cmp(b),
            (Value::Type(a), Value::Type(b)) => a.cmp(b),
            // Nil and Void carry no payload
            _ => Ordering::Equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::NativeFn;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Int(0).is_truthy());
        assert!(Value::string("").is_truthy());
        assert!(Value::list(vec![]).is_truthy());
    }

    #[test]
    fn test_list_and_vector_are_distinct() {
        let items = vec![Value::Int(1), Value::Int(2)];
        assert_ne!(Value::list(items.clone()), Value::vector(items.clone()));
        assert_eq!(Value::vector(items.clone()), Value::vector(items));
    }

    #[test]
    fn test_type_tags() {
        assert_eq!(Value::Nil.type_tag(), TypeTag::Nil);
        assert_eq!(Value::Void.type_tag(), TypeTag::Void);
        assert_eq!(Value::keyword("a").type_tag(), TypeTag::Keyword);
        assert_eq!(Value::Type(TypeTag::Int).type_tag(), TypeTag::Type);
        assert_eq!(Value::map(vec![]).type_name(), "map");
    }

    #[test]
    fn test_display_literals() {
        assert_eq!(Value::Int(-42).to_string(), "-42");
        assert_eq!(Value::string("a\"b\n").to_string(), "\"a\\\"b\\n\"");
        assert_eq!(Value::Char('\n').to_string(), "\\newline");
        assert_eq!(Value::Char('x').to_string(), "\\x");
        assert_eq!(Value::Char('\u{1}').to_string(), "\\u0001");
        assert_eq!(Value::symbol("ns/foo").to_string(), "ns/foo");
        assert_eq!(
            Value::list(vec![Value::symbol("f"), Value::vector(vec![Value::Nil])]).to_string(),
            "(f [nil])"
        );
        assert_eq!(
            Value::map(vec![
                (Value::keyword("b"), Value::Int(2)),
                (Value::keyword("a"), Value::Int(1)),
            ])
            .to_string(),
            "{:a 1, :b 2}"
        );
    }

    #[test]
    fn test_functions_compare_by_identity() {
        let f = Value::func(NativeFn::new("id", |args| Ok(args[0].clone())));
        let g = Value::func(NativeFn::new("id", |args| Ok(args[0].clone())));
        assert_eq!(f, f.clone());
        assert_ne!(f, g);
    }

    #[test]
    fn test_invoke_non_callable() {
        assert_eq!(
            Value::Int(1).invoke(&[]),
            Err(Error::NotCallable("int"))
        );
    }

    #[test]
    fn test_cross_type_order() {
        let mut vals = vec![Value::string("a"), Value::Int(1), Value::Nil, Value::Bool(true)];
        vals.sort();
        assert_eq!(
            vals,
            vec![Value::Nil, Value::Bool(true), Value::Int(1), Value::string("a")]
        );
    }
}
