//! Storage shared between the host program and compiled expressions.

use core::cell::RefCell;
use std::rc::Rc;

use crate::evaluator::RuntimeError;
use crate::values::{Float, Integer, Scalar, Value, ValueType};

/// A host-owned cell that expressions read and assign through.
///
/// Cloning a `Shared` clones the handle, not the value: every clone observes
/// the same storage.
#[derive(Debug, Default)]
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Shared(Rc::clone(&self.0))
    }
}

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Shared(Rc::new(RefCell::new(value)))
    }

    pub fn set(&self, value: T) {
        *self.0.borrow_mut() = value;
    }

    pub fn replace(&self, value: T) -> T {
        self.0.replace(value)
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow())
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }

    /// True when both handles point at the same storage.
    pub fn ptr_eq(&self, other: &Shared<T>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: Clone> Shared<T> {
    pub fn get(&self) -> T {
        self.0.borrow().clone()
    }
}

/// A registered host variable with its type erased.
#[derive(Debug, Clone)]
pub enum HostVar {
    Bool(Shared<bool>),
    Int(Shared<Integer>),
    Float(Shared<Float>),
    Str(Shared<String>),
}

impl HostVar {
    pub fn value_type(&self) -> ValueType {
        match self {
            HostVar::Bool(_) => ValueType::Boolean,
            HostVar::Int(_) => ValueType::Integer,
            HostVar::Float(_) => ValueType::Float,
            HostVar::Str(_) => ValueType::String,
        }
    }

    pub fn get(&self) -> Value {
        match self {
            HostVar::Bool(cell) => Value::Bool(cell.get()),
            HostVar::Int(cell) => Value::Int(cell.get()),
            HostVar::Float(cell) => Value::Float(cell.get()),
            HostVar::Str(cell) => Value::Str(cell.get()),
        }
    }

    /// Stores `value`, which must have exactly the variable's type.
    pub fn set(&self, value: Value) -> Result<(), RuntimeError> {
        match (self, value) {
            (HostVar::Bool(cell), Value::Bool(b)) => cell.set(b),
            (HostVar::Int(cell), Value::Int(i)) => cell.set(i),
            (HostVar::Float(cell), Value::Float(f)) => cell.set(f),
            (HostVar::Str(cell), Value::Str(s)) => cell.set(s),
            (_, value) => {
                return Err(RuntimeError::AssignmentType {
                    expected: self.value_type(),
                    found: value.value_type(),
                });
            }
        }
        Ok(())
    }

    pub fn ptr_eq(&self, other: &HostVar) -> bool {
        match (self, other) {
            (HostVar::Bool(a), HostVar::Bool(b)) => a.ptr_eq(b),
            (HostVar::Int(a), HostVar::Int(b)) => a.ptr_eq(b),
            (HostVar::Float(a), HostVar::Float(b)) => a.ptr_eq(b),
            (HostVar::Str(a), HostVar::Str(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl<T: Scalar> From<Shared<T>> for HostVar {
    fn from(shared: Shared<T>) -> Self {
        T::into_host(shared)
    }
}

impl<T: Scalar> From<&Shared<T>> for HostVar {
    fn from(shared: &Shared<T>) -> Self {
        T::into_host(shared.clone())
    }
}

/// Where a tree node keeps its value.
///
/// Variable nodes alias the host cell so assignments are visible to the host;
/// every other node owns its value.
#[derive(Debug, Clone)]
pub enum Slot {
    Owned(Value),
    Aliased(HostVar),
}

impl Slot {
    pub fn get(&self) -> Value {
        match self {
            Slot::Owned(value) => value.clone(),
            Slot::Aliased(var) => var.get(),
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Slot::Owned(value) => value.value_type(),
            Slot::Aliased(var) => var.value_type(),
        }
    }

    pub fn host(&self) -> Option<&HostVar> {
        match self {
            Slot::Aliased(var) => Some(var),
            Slot::Owned(_) => None,
        }
    }
}

impl Default for Slot {
    fn default() -> Self {
        Slot::Owned(Value::Void)
    }
}
