//! Shared engine setup with stdlib and command-line bindings.

use calx::{Engine, EngineOptions, Error, Float, Integer, Shared, register_stdlib};

use crate::cli::Bindings;

/// Build an engine with the standard library and the given bindings.
///
/// Later bindings of the same name replace earlier ones. The engine keeps
/// the shared cells alive, so callers read them back through the registry.
pub fn build_engine(bindings: &Bindings) -> Result<Engine, Error> {
    let mut engine = Engine::new(EngineOptions::default());
    register_stdlib(engine.registry_mut())?;
    bind_all(&mut engine, bindings)?;
    Ok(engine)
}

/// Bind every `--int/--float/--bool/--str` option on `engine`.
pub fn bind_all(engine: &mut Engine, bindings: &Bindings) -> Result<(), Error> {
    for binding in &bindings.ints {
        let (name, value) = split_binding(binding)?;
        let value: Integer = parse_value(name, value, "an integer")?;
        engine.register_variable(name, Shared::new(value))?;
    }
    for binding in &bindings.floats {
        let (name, value) = split_binding(binding)?;
        let value: Float = parse_value(name, value, "a float")?;
        engine.register_variable(name, Shared::new(value))?;
    }
    for binding in &bindings.bools {
        let (name, value) = split_binding(binding)?;
        let value: bool = parse_value(name, value, "`true` or `false`")?;
        engine.register_variable(name, Shared::new(value))?;
    }
    for binding in &bindings.strs {
        let (name, value) = split_binding(binding)?;
        engine.register_variable(name, Shared::new(value.to_string()))?;
    }
    Ok(())
}

fn split_binding(binding: &str) -> Result<(&str, &str), Error> {
    binding
        .split_once('=')
        .map(|(name, value)| (name.trim(), value))
        .ok_or_else(|| Error::Api(format!("expected NAME=VALUE, got `{binding}`")))
}

fn parse_value<T: std::str::FromStr>(name: &str, value: &str, what: &str) -> Result<T, Error> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Api(format!("value for `{name}` must be {what}, got `{value}`")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use calx::Value;

    fn bindings() -> Bindings {
        Bindings {
            ints: vec!["x=3".into(), "n = 4".into()],
            floats: vec!["rate=0.5".into()],
            bools: vec!["on=true".into()],
            strs: vec!["who=a=b".into()],
        }
    }

    #[test]
    fn bindings_become_variables() {
        let engine = build_engine(&bindings()).unwrap();
        let registry = engine.registry();
        assert_eq!(registry.variable("x").unwrap().get(), Value::Int(3));
        assert_eq!(registry.variable("n").unwrap().get(), Value::Int(4));
        assert_eq!(registry.variable("rate").unwrap().get(), Value::Float(0.5));
        assert_eq!(registry.variable("on").unwrap().get(), Value::Bool(true));
        assert_eq!(
            registry.variable("who").unwrap().get(),
            Value::Str("a=b".to_string())
        );
        assert!(registry.function("sqrt").is_some());
    }

    #[test]
    fn malformed_bindings_are_rejected() {
        let missing_value = Bindings {
            ints: vec!["x".into()],
            ..Default::default()
        };
        assert!(matches!(build_engine(&missing_value), Err(Error::Api(_))));

        let not_a_number = Bindings {
            ints: vec!["x=1.5".into()],
            ..Default::default()
        };
        assert!(matches!(build_engine(&not_a_number), Err(Error::Api(_))));

        let bad_name = Bindings {
            bools: vec!["true=false".into()],
            ..Default::default()
        };
        assert!(matches!(build_engine(&bad_name), Err(Error::Api(_))));
    }
}
