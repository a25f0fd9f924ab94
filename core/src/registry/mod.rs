//! Catalog of operators, host variables and host functions.
//!
//! Each [`Engine`](crate::api::Engine) owns one registry. Every pipeline
//! stage reads from it; evaluation also uses it to look up operator
//! implementations and to re-fetch variable bindings.

pub mod operators;

use std::rc::Rc;

use hashbrown::HashMap;
use thiserror::Error;
use tracing::debug;

use crate::evaluator::RuntimeError;
use crate::evaluator::operators::{OperatorFn, builtin_operator_fns};
use crate::lexer::grammar::is_identifier;
use crate::values::{HostFunction, HostVar, NativeFn, Value, ValueType};

pub use operators::{
    Associativity, BUILTIN_OPERATORS, Fixity, MatchInfo, OperatorForm, OperatorInfo,
    OperatorKind, ResultType, UNARY_PRECEDENCE,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("'{0}' is not a valid identifier")]
    InvalidName(String),

    #[error("'{0}' is reserved")]
    ReservedName(String),
}

/// A registered host function.
#[derive(Clone)]
pub struct FunctionInfo {
    return_type: ValueType,
    params: Vec<ValueType>,
    callable: Rc<NativeFn>,
}

impl FunctionInfo {
    pub fn return_type(&self) -> ValueType {
        self.return_type
    }

    pub fn params(&self) -> &[ValueType] {
        &self.params
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, RuntimeError> {
        (self.callable)(args)
    }
}

impl core::fmt::Debug for FunctionInfo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FunctionInfo")
            .field("return_type", &self.return_type)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

pub struct Registry {
    operators: Vec<OperatorInfo>,
    operator_index: HashMap<&'static str, usize>,
    operator_fns: HashMap<OperatorKind, OperatorFn>,
    variables: HashMap<String, HostVar>,
    functions: HashMap<String, FunctionInfo>,
}

impl Registry {
    /// Creates a registry holding the built-in operators and no names.
    pub fn new() -> Self {
        let operators = BUILTIN_OPERATORS.to_vec();
        let operator_index = operators
            .iter()
            .enumerate()
            .map(|(i, info)| (info.symbol, i))
            .collect();
        let operator_fns = builtin_operator_fns().iter().copied().collect();
        Self {
            operators,
            operator_index,
            operator_fns,
            variables: HashMap::new(),
            functions: HashMap::new(),
        }
    }

    pub fn operators(&self) -> &[OperatorInfo] {
        &self.operators
    }

    pub fn operator(&self, symbol: &str) -> Option<&OperatorInfo> {
        self.operator_index.get(symbol).map(|&i| &self.operators[i])
    }

    pub fn operator_fn(&self, kind: OperatorKind) -> Option<OperatorFn> {
        self.operator_fns.get(&kind).copied()
    }

    /// Counts the operators whose symbol starts with `prefix`.
    pub fn count_operator_matches(&self, prefix: &str) -> MatchInfo {
        self.operators
            .iter()
            .filter(|info| info.symbol.starts_with(prefix))
            .fold(MatchInfo::default(), |acc, info| MatchInfo {
                count: acc.count + 1,
                full_match: acc.full_match || info.symbol == prefix,
            })
    }

    /// Binds `name` to a host variable, replacing any previous binding.
    ///
    /// Expressions compiled earlier pick up the new binding on their next
    /// evaluation if its type is unchanged.
    pub fn register_variable(
        &mut self,
        name: impl Into<String>,
        var: impl Into<HostVar>,
    ) -> Result<(), RegistryError> {
        let name = validate_name(name.into())?;
        let var = var.into();
        debug!(name = %name, ty = %var.value_type(), "Registering variable");
        self.variables.insert(name, var);
        Ok(())
    }

    pub fn unregister_variable(&mut self, name: &str) -> Option<HostVar> {
        self.variables.remove(name)
    }

    pub fn variable(&self, name: &str) -> Option<&HostVar> {
        self.variables.get(name)
    }

    /// All bound variables, sorted by name.
    pub fn variables(&self) -> Vec<(&str, &HostVar)> {
        let mut vars: Vec<_> = self
            .variables
            .iter()
            .map(|(name, var)| (name.as_str(), var))
            .collect();
        vars.sort_unstable_by_key(|(name, _)| *name);
        vars
    }

    /// Binds `name` to a type-erased callable with an explicit signature.
    pub fn register_function(
        &mut self,
        name: impl Into<String>,
        return_type: ValueType,
        params: &[ValueType],
        callable: impl Fn(&[Value]) -> Result<Value, RuntimeError> + 'static,
    ) -> Result<(), RegistryError> {
        let name = validate_name(name.into())?;
        let info = FunctionInfo {
            return_type,
            params: params.to_vec(),
            callable: Rc::new(callable),
        };
        debug!(name = %name, params = ?info.params, ret = %return_type, "Registering function");
        self.functions.insert(name, info);
        Ok(())
    }

    /// Binds `name` to a Rust closure, deriving the signature from its types.
    pub fn register_fn<Args, F>(&mut self, name: impl Into<String>, f: F) -> Result<(), RegistryError>
    where
        F: HostFunction<Args>,
    {
        self.register_function(name, F::return_type(), &F::param_types(), move |args| {
            f.invoke(args)
        })
    }

    pub fn unregister_function(&mut self, name: &str) -> Option<FunctionInfo> {
        self.functions.remove(name)
    }

    pub fn function(&self, name: &str) -> Option<&FunctionInfo> {
        self.functions.get(name)
    }

    pub fn call_function(&self, name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
        self.function(name)
            .ok_or_else(|| RuntimeError::UnknownFunction(name.to_string()))?
            .call(args)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("operators", &self.operators.len())
            .field("variables", &self.variables.len())
            .field("functions", &self.functions.len())
            .finish()
    }
}

fn validate_name(name: String) -> Result<String, RegistryError> {
    if !is_identifier(&name) {
        return Err(RegistryError::InvalidName(name));
    }
    if name == "true" || name == "false" {
        return Err(RegistryError::ReservedName(name));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::{Integer, Shared};

    #[test]
    fn count_operator_matches() {
        let registry = Registry::new();
        assert_eq!(
            registry.count_operator_matches("<"),
            MatchInfo {
                count: 4,
                full_match: true
            }
        );
        assert_eq!(
            registry.count_operator_matches("<<"),
            MatchInfo {
                count: 2,
                full_match: true
            }
        );
        assert_eq!(
            registry.count_operator_matches("(i"),
            MatchInfo {
                count: 1,
                full_match: false
            }
        );
        assert_eq!(registry.count_operator_matches("@"), MatchInfo::default());
    }

    #[test]
    fn every_operator_has_an_implementation() {
        let registry = Registry::new();
        for info in registry.operators() {
            assert_eq!(
                registry.operator_fn(info.kind).is_some(),
                !info.kind.is_punctuation(),
                "{}",
                info.symbol
            );
        }
    }

    #[test]
    fn rejects_invalid_names() {
        let mut registry = Registry::new();
        let cell = Shared::new(0 as Integer);
        assert_eq!(
            registry.register_variable("1x", &cell),
            Err(RegistryError::InvalidName("1x".to_string()))
        );
        assert_eq!(
            registry.register_variable("true", &cell),
            Err(RegistryError::ReservedName("true".to_string()))
        );
        assert!(registry.register_variable("_x1", &cell).is_ok());
    }

    #[test]
    fn re_registration_replaces_binding() {
        let mut registry = Registry::new();
        let a = Shared::new(1 as Integer);
        let b = Shared::new(2 as Integer);
        registry.register_variable("x", &a).unwrap();
        registry.register_variable("x", &b).unwrap();
        assert_eq!(registry.variable("x").unwrap().get(), Value::Int(2));
        assert_eq!(registry.variables().len(), 1);
    }

    #[test]
    fn typed_functions_are_callable() {
        let mut registry = Registry::new();
        registry
            .register_fn("plus", |a: Integer, b: Integer| a + b)
            .unwrap();
        let info = registry.function("plus").unwrap();
        assert_eq!(info.params(), &[ValueType::Integer, ValueType::Integer]);
        assert_eq!(info.return_type(), ValueType::Integer);
        assert_eq!(
            registry.call_function("plus", &[Value::Int(2), Value::Int(3)]),
            Ok(Value::Int(5))
        );
        assert_eq!(
            registry.call_function("minus", &[]),
            Err(RuntimeError::UnknownFunction("minus".to_string()))
        );
    }
}
