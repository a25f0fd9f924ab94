use core::fmt;

use bitflags::bitflags;

use crate::evaluator::RuntimeError;
use crate::values::{HostVar, Shared};

pub type Integer = i64;

#[cfg(not(feature = "single-precision"))]
pub type Float = f64;

#[cfg(feature = "single-precision")]
pub type Float = f32;

/// The type of a value or of an expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Boolean,
    Integer,
    Float,
    String,
    /// Result of a function that returns nothing. Never an operand.
    Void,
}

impl ValueType {
    /// Single-bit mask for this type. `Void` maps to the empty mask.
    pub fn mask(self) -> TypeMask {
        match self {
            ValueType::Boolean => TypeMask::BOOLEAN,
            ValueType::Integer => TypeMask::INTEGER,
            ValueType::Float => TypeMask::FLOAT,
            ValueType::String => TypeMask::STRING,
            ValueType::Void => TypeMask::empty(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueType::Boolean => "bool",
            ValueType::Integer => "int",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::Void => "void",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Set of value types an operator accepts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TypeMask: u8 {
        const BOOLEAN = 0b0001;
        const INTEGER = 0b0010;
        const FLOAT = 0b0100;
        const STRING = 0b1000;
        const NUMERIC = Self::INTEGER.bits() | Self::FLOAT.bits();
        const ALL = Self::BOOLEAN.bits() | Self::NUMERIC.bits() | Self::STRING.bits();
    }
}

impl TypeMask {
    pub fn accepts(self, ty: ValueType) -> bool {
        let bit = ty.mask();
        !bit.is_empty() && self.contains(bit)
    }
}

/// A computed value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Void,
    Bool(bool),
    Int(Integer),
    Float(Float),
    Str(String),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Void => ValueType::Void,
            Value::Bool(_) => ValueType::Boolean,
            Value::Int(_) => ValueType::Integer,
            Value::Float(_) => ValueType::Float,
            Value::Str(_) => ValueType::String,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Value::Void)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<Integer> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<Float> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Converts to a boolean the way the `(bool)` cast does.
    ///
    /// Integers are true when non-zero, floats when their truncation is
    /// non-zero and strings only when they are exactly `"true"`.
    pub fn to_bool(&self) -> Result<bool, RuntimeError> {
        match self {
            Value::Void => Err(RuntimeError::VoidValue),
            Value::Bool(b) => Ok(*b),
            Value::Int(i) => Ok(*i != 0),
            Value::Float(f) => Ok(truncate(*f) != 0),
            Value::Str(s) => Ok(s == "true"),
        }
    }

    /// Converts to an integer the way the `(int)` cast does.
    pub fn to_int(&self) -> Result<Integer, RuntimeError> {
        match self {
            Value::Void => Err(RuntimeError::VoidValue),
            Value::Bool(b) => Ok(Integer::from(*b)),
            Value::Int(i) => Ok(*i),
            Value::Float(f) => Ok(truncate(*f)),
            Value::Str(s) => s.trim().parse().map_err(|_| RuntimeError::InvalidCast {
                text: s.clone(),
                target: ValueType::Integer,
            }),
        }
    }

    /// Converts to a float the way the `(float)` cast does.
    pub fn to_float(&self) -> Result<Float, RuntimeError> {
        match self {
            Value::Void => Err(RuntimeError::VoidValue),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Value::Int(i) => Ok(*i as Float),
            Value::Float(f) => Ok(*f),
            Value::Str(s) => s.trim().parse().map_err(|_| RuntimeError::InvalidCast {
                text: s.clone(),
                target: ValueType::Float,
            }),
        }
    }

    /// Converts to text the way the `(string)` cast does.
    pub fn to_text(&self) -> Result<String, RuntimeError> {
        match self {
            Value::Void => Err(RuntimeError::VoidValue),
            other => Ok(other.to_string()),
        }
    }

    /// Converts to `target`. Converting to `Void` discards the value.
    pub fn convert(&self, target: ValueType) -> Result<Value, RuntimeError> {
        Ok(match target {
            ValueType::Boolean => Value::Bool(self.to_bool()?),
            ValueType::Integer => Value::Int(self.to_int()?),
            ValueType::Float => Value::Float(self.to_float()?),
            ValueType::String => Value::Str(self.to_text()?),
            ValueType::Void => Value::Void,
        })
    }
}

// Saturates at the integer bounds; NaN becomes zero.
fn truncate(f: Float) -> Integer {
    f as Integer
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            // Debug keeps a fractional part on whole numbers: `7.0`, not `7`.
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Integer> for Value {
    fn from(i: Integer) -> Self {
        Value::Int(i)
    }
}

impl From<Float> for Value {
    fn from(f: Float) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

/// Rust types that map one-to-one onto a non-void [`ValueType`].
pub trait Scalar: Sized + Clone + 'static {
    const TYPE: ValueType;

    fn into_value(self) -> Value;

    /// Extracts the payload when `value` has exactly this type.
    fn from_value(value: &Value) -> Option<Self>;

    /// Converts any value using cast semantics.
    fn coerce(value: &Value) -> Result<Self, RuntimeError>;

    fn into_host(shared: Shared<Self>) -> HostVar;
}

impl Scalar for bool {
    const TYPE: ValueType = ValueType::Boolean;

    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }

    fn coerce(value: &Value) -> Result<Self, RuntimeError> {
        value.to_bool()
    }

    fn into_host(shared: Shared<Self>) -> HostVar {
        HostVar::Bool(shared)
    }
}

impl Scalar for Integer {
    const TYPE: ValueType = ValueType::Integer;

    fn into_value(self) -> Value {
        Value::Int(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_int()
    }

    fn coerce(value: &Value) -> Result<Self, RuntimeError> {
        value.to_int()
    }

    fn into_host(shared: Shared<Self>) -> HostVar {
        HostVar::Int(shared)
    }
}

impl Scalar for Float {
    const TYPE: ValueType = ValueType::Float;

    fn into_value(self) -> Value {
        Value::Float(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_float()
    }

    fn coerce(value: &Value) -> Result<Self, RuntimeError> {
        value.to_float()
    }

    fn into_host(shared: Shared<Self>) -> HostVar {
        HostVar::Float(shared)
    }
}

impl Scalar for String {
    const TYPE: ValueType = ValueType::String;

    fn into_value(self) -> Value {
        Value::Str(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }

    fn coerce(value: &Value) -> Result<Self, RuntimeError> {
        value.to_text()
    }

    fn into_host(shared: Shared<Self>) -> HostVar {
        HostVar::Str(shared)
    }
}
