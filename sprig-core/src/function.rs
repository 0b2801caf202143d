// sprig-core - Value model, symbols, vars and namespaces for the Sprig language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The uniform invoke capability and host-exposed native functions.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::value::Value;

/// Anything that can be called with a slice of evaluated arguments.
///
/// Compiled functions, closures and host built-ins all implement this, so a
/// caller never needs to know which kind it holds.
pub trait Invoke {
    fn invoke(&self, args: &[Value]) -> Result<Value>;

    /// Name used when printing and in arity errors.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Allows callers to recover the concrete type.
    fn as_any(&self) -> &dyn Any;
}

type NativeImpl = Rc<dyn Fn(&[Value]) -> Result<Value>>;

/// A built-in function supplied by the host.
#[derive(Clone)]
pub struct NativeFn {
    name: String,
    arity: Option<usize>,
    func: NativeImpl,
}

impl NativeFn {
    /// A variadic native; the function checks its own arguments.
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + 'static,
    {
        NativeFn {
            name: name.to_string(),
            arity: None,
            func: Rc::new(func),
        }
    }

    /// A native taking exactly `arity` arguments, checked before the call.
    pub fn with_arity<F>(name: &str, arity: usize, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + 'static,
    {
        NativeFn {
            name: name.to_string(),
            arity: Some(arity),
            func: Rc::new(func),
        }
    }

    pub fn arity(&self) -> Option<usize> {
        self.arity
    }
}

impl Invoke for NativeFn {
    fn invoke(&self, args: &[Value]) -> Result<Value> {
        if let Some(arity) = self.arity {
            if args.len() != arity {
                return Err(Error::arity(arity, args.len()).named(&self.name));
            }
        }
        (self.func)(args)
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<native-fn {}>", self.name)
    }
}
