// sprig-vm - Bytecode compiler and virtual machine for the Sprig language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Evaluation stack for a single frame.

use sprig_core::{Error, Result, Value};

/// A frame's evaluation stack.
#[derive(Debug, Default)]
pub struct ValueStack {
    values: Vec<Value>,
}

fn underflow() -> Error {
    Error::bytecode("stack underflow")
}

impl ValueStack {
    pub fn new() -> Self {
        Self {
            values: Vec::with_capacity(16),
        }
    }

    #[inline]
    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    #[inline]
    pub fn pop(&mut self) -> Result<Value> {
        self.values.pop().ok_or_else(underflow)
    }

    /// Pop n values, returned in push order.
    pub fn pop_n(&mut self, n: usize) -> Result<Vec<Value>> {
        if n > self.values.len() {
            return Err(underflow());
        }
        let start = self.values.len() - n;
        Ok(self.values.drain(start..).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_n_keeps_order() {
        let mut stack = ValueStack::new();
        for n in 1..=4 {
            stack.push(Value::Int(n));
        }
        assert_eq!(
            stack.pop_n(2).unwrap(),
            vec![Value::Int(3), Value::Int(4)]
        );
        assert_eq!(stack.pop_n(2).unwrap(), vec![Value::Int(1), Value::Int(2)]);
        assert!(stack.pop().is_err());
    }

    #[test]
    fn test_underflow() {
        let mut stack = ValueStack::new();
        assert!(stack.pop().is_err());
        stack.push(Value::Nil);
        assert!(stack.pop_n(2).is_err());
        // a failed pop_n leaves the stack untouched
        assert_eq!(stack.pop(), Ok(Value::Nil));
    }
}
