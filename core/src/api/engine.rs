//! The calx compilation engine.

use tracing::debug;

use super::{CompileOptionsOverride, CompiledExpression, EngineOptions, Error};
use crate::evaluator::{ExecutionError, RuntimeError};
use crate::registry::Registry;
use crate::syntax::Span;
use crate::values::{HostFunction, HostVar, Scalar, Value, ValueType};

/// The calx compilation and evaluation engine.
///
/// The engine owns:
/// - the registry of operators, host variables and host functions,
/// - the engine options,
/// - the most recently compiled expression.
///
/// Engines are independent of each other. Host variables are shared through
/// [`Shared`](crate::values::Shared) handles, which are not thread-safe, so
/// an engine stays on the thread that created it.
///
/// # Example
///
/// ```
/// use calx_core::api::{Engine, EngineOptions};
/// use calx_core::{Integer, Shared, Value};
///
/// let mut engine = Engine::new(EngineOptions::default());
/// let x = Shared::new(0 as Integer);
/// engine.register_variable("x", &x).unwrap();
///
/// engine.compile("x = 5").unwrap();
/// assert_eq!(engine.evaluate().unwrap(), Value::Int(5));
/// assert_eq!(x.get(), 5);
/// ```
#[derive(Debug, Default)]
pub struct Engine {
    registry: Registry,
    options: EngineOptions,
    current: Option<CompiledExpression>,
}

impl Engine {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            registry: Registry::new(),
            options,
            current: None,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Binds `name` to a host variable.
    ///
    /// A compiled expression sees the new binding on its next evaluation as
    /// long as the type is unchanged.
    pub fn register_variable(
        &mut self,
        name: impl Into<String>,
        var: impl Into<HostVar>,
    ) -> Result<(), Error> {
        Ok(self.registry.register_variable(name, var)?)
    }

    /// Binds `name` to a type-erased host function.
    pub fn register_function(
        &mut self,
        name: impl Into<String>,
        return_type: ValueType,
        params: &[ValueType],
        callable: impl Fn(&[Value]) -> Result<Value, RuntimeError> + 'static,
    ) -> Result<(), Error> {
        Ok(self
            .registry
            .register_function(name, return_type, params, callable)?)
    }

    /// Binds `name` to a Rust closure whose signature gives the parameter
    /// and return types.
    ///
    /// ```
    /// use calx_core::api::{Engine, EngineOptions};
    /// use calx_core::{Integer, Value};
    ///
    /// let mut engine = Engine::new(EngineOptions::default());
    /// engine.register_fn("p", |a: Integer, b: Integer| a * b).unwrap();
    /// engine.compile("p(6, 7)").unwrap();
    /// assert_eq!(engine.evaluate().unwrap(), Value::Int(42));
    /// ```
    pub fn register_fn<Args, F>(&mut self, name: impl Into<String>, f: F) -> Result<(), Error>
    where
        F: HostFunction<Args>,
    {
        Ok(self.registry.register_fn(name, f)?)
    }

    /// Compiles `source` without storing it.
    pub fn prepare(&self, source: &str) -> Result<CompiledExpression, Error> {
        CompiledExpression::compile(&self.registry, &self.options.default_compile_options, source)
    }

    /// Compiles `source` and makes it the expression [`evaluate`](Self::evaluate) runs.
    pub fn compile(&mut self, source: &str) -> Result<&CompiledExpression, Error> {
        self.compile_with(CompileOptionsOverride::default(), source)
    }

    /// Like [`compile`](Self::compile), with per-call option overrides.
    ///
    /// The previous expression is discarded first, so a failed compilation
    /// leaves nothing to evaluate.
    pub fn compile_with(
        &mut self,
        options_override: CompileOptionsOverride,
        source: &str,
    ) -> Result<&CompiledExpression, Error> {
        self.current = None;
        let mut options = self.options.default_compile_options.clone();
        options.override_with(&options_override);
        let compiled = CompiledExpression::compile(&self.registry, &options, source)?;
        debug!(
            nodes = compiled.node_count(),
            ty = %compiled.result_type(),
            "Compiled expression"
        );
        Ok(&*self.current.insert(compiled))
    }

    /// Evaluates the most recently compiled expression.
    pub fn evaluate(&mut self) -> Result<Value, Error> {
        let expr = self
            .current
            .as_mut()
            .ok_or_else(|| Error::Api("no compiled expression to evaluate".to_string()))?;
        expr.evaluate(&self.registry)
    }

    /// Compiles and evaluates `source`, converting the result to `T`.
    ///
    /// The conversion follows the cast operators, so an integer result read
    /// as `bool` is `true` when non-zero.
    pub fn evaluate_as<T: Scalar>(&mut self, source: &str) -> Result<T, Error> {
        self.compile(source)?;
        let value = self.evaluate()?;
        T::coerce(&value).map_err(|err| {
            ExecutionError::new(err, Span::new(0, source.len()))
                .with_source(source)
                .into()
        })
    }

    pub fn compiled(&self) -> Option<&CompiledExpression> {
        self.current.as_ref()
    }
}
