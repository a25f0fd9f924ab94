//! Numeric functions.
//!
//! Integer functions: `abs`, `min`, `max`.
//! Float functions: `sqrt`, `pow`, `floor`.

use crate::evaluator::RuntimeError;
use crate::registry::{Registry, RegistryError};
use crate::values::{Float, Integer, Value, ValueType};

pub fn register_math_functions(registry: &mut Registry) -> Result<(), RegistryError> {
    // `abs(MIN)` has no result, so this one reports overflow itself.
    registry.register_function("abs", ValueType::Integer, &[ValueType::Integer], |args| {
        match args {
            [Value::Int(i)] => i
                .checked_abs()
                .map(Value::Int)
                .ok_or(RuntimeError::IntegerOverflow),
            _ => Err(RuntimeError::ArgumentType {
                expected: ValueType::Integer,
            }),
        }
    })?;
    registry.register_fn("min", |a: Integer, b: Integer| a.min(b))?;
    registry.register_fn("max", |a: Integer, b: Integer| a.max(b))?;
    registry.register_fn("sqrt", |x: Float| x.sqrt())?;
    registry.register_fn("pow", |x: Float, y: Float| x.powf(y))?;
    registry.register_fn("floor", |x: Float| x.floor())?;
    Ok(())
}

#[cfg(test)]
#[path = "math_test.rs"]
mod math_test;
