//! String functions: `len`, `upper`, `lower` and `print`.

use crate::registry::{Registry, RegistryError};
use crate::values::Integer;

pub fn register_string_functions(registry: &mut Registry) -> Result<(), RegistryError> {
    // Length in characters, not bytes.
    registry.register_fn("len", |s: String| s.chars().count() as Integer)?;
    registry.register_fn("upper", |s: String| s.to_uppercase())?;
    registry.register_fn("lower", |s: String| s.to_lowercase())?;
    registry.register_fn("print", |s: String| println!("{s}"))?;
    Ok(())
}

#[cfg(test)]
#[path = "string_test.rs"]
mod string_test;
