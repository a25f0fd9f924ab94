//! Standard library functions.
//!
//! Nothing here is registered by default. Hosts that want the functions
//! call [`register_stdlib`] or one of the per-area helpers.

use crate::registry::{Registry, RegistryError};

pub mod math;
pub mod string;

pub use math::register_math_functions;
pub use string::register_string_functions;

/// Registers every standard library function.
pub fn register_stdlib(registry: &mut Registry) -> Result<(), RegistryError> {
    register_math_functions(registry)?;
    register_string_functions(registry)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_every_function() {
        let mut registry = Registry::new();
        register_stdlib(&mut registry).unwrap();
        for name in [
            "abs", "min", "max", "sqrt", "pow", "floor", "len", "upper", "lower", "print",
        ] {
            assert!(registry.function(name).is_some(), "{name}");
        }
    }
}
