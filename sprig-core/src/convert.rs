// sprig-core - Value model, symbols, vars and namespaces for the Sprig language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Canonical conversion between Rust values and [`Value`].
//!
//! | Rust type | Sprig type |
//! |-----------|------------|
//! | `()` | `nil` |
//! | `bool` | `boolean` |
//! | `i64`, `i32`, `usize` | `int` |
//! | `char` | `char` |
//! | `String`, `&str` | `string` |
//! | `Symbol`, `Keyword` | `symbol`, `keyword` |
//! | `Vec<T>` | `vector` (a list also converts back) |
//! | `Option<T>` | `T` or `nil` |

use crate::error::{Error, Result};
use crate::keyword::Keyword;
use crate::symbol::Symbol;
use crate::value::Value;

/// Convert a Rust value into a [`Value`].
pub trait IntoValue {
    fn into_value(self) -> Value;
}

/// Convert a [`Value`] into a Rust value.
pub trait FromValue: Sized {
    fn from_value(val: &Value) -> Result<Self>;
}

/// Convenience wrapper for [`IntoValue::into_value`].
#[must_use]
pub fn to_value<T: IntoValue>(value: T) -> Value {
    value.into_value()
}

/// Convenience wrapper for [`FromValue::from_value`].
pub fn from_value<T: FromValue>(val: &Value) -> Result<T> {
    T::from_value(val)
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for Value {
    fn from_value(val: &Value) -> Result<Self> {
        Ok(val.clone())
    }
}

impl IntoValue for () {
    fn into_value(self) -> Value {
        Value::Nil
    }
}

impl FromValue for () {
    fn from_value(val: &Value) -> Result<Self> {
        match val {
            Value::Nil => Ok(()),
            other => Err(Error::type_error("nil", other.type_name())),
        }
    }
}

/// Types that map onto exactly one variant without loss.
macro_rules! direct_conversion {
    ($ty:ty, $variant:ident, $expected:literal) => {
        impl IntoValue for $ty {
            fn into_value(self) -> Value {
                Value::$variant(self)
            }
        }

        impl FromValue for $ty {
            fn from_value(val: &Value) -> Result<Self> {
                match val {
                    Value::$variant(x) => Ok(x.clone()),
                    other => Err(Error::type_error($expected, other.type_name())),
                }
            }
        }
    };
}

direct_conversion!(bool, Bool, "boolean");
direct_conversion!(i64, Int, "int");
direct_conversion!(char, Char, "char");
direct_conversion!(Symbol, Symbol, "symbol");
direct_conversion!(Keyword, Keyword, "keyword");

impl IntoValue for i32 {
    fn into_value(self) -> Value {
        Value::Int(i64::from(self))
    }
}

impl FromValue for i32 {
    fn from_value(val: &Value) -> Result<Self> {
        let n = i64::from_value(val)?;
        i32::try_from(n).map_err(|_| Error::Message(format!("integer {} out of range for i32", n)))
    }
}

impl IntoValue for usize {
    fn into_value(self) -> Value {
        // Saturates only above i64::MAX, which no collection reaches.
        Value::Int(i64::try_from(self).unwrap_or(i64::MAX))
    }
}

impl FromValue for usize {
    fn from_value(val: &Value) -> Result<Self> {
        match val {
            Value::Int(n) => usize::try_from(*n)
                .map_err(|_| Error::type_error("non-negative int", "negative int")),
            other => Err(Error::type_error("non-negative int", other.type_name())),
        }
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::String(self.into())
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::string(self)
    }
}

impl FromValue for String {
    fn from_value(val: &Value) -> Result<Self> {
        match val {
            Value::String(s) => Ok(s.to_string()),
            other => Err(Error::type_error("string", other.type_name())),
        }
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::Vector(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(val: &Value) -> Result<Self> {
        match val {
            Value::Vector(items) | Value::List(items) => items.iter().map(T::from_value).collect(),
            other => Err(Error::type_error("vector or list", other.type_name())),
        }
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Nil, IntoValue::into_value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(val: &Value) -> Result<Self> {
        match val {
            Value::Nil => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
