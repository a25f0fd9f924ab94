//! Public API for the calx expression engine.
//!
//! An [`Engine`] owns a registry of host variables and functions, compiles
//! source text into a [`CompiledExpression`] and evaluates it on demand.
//!
//! # Example
//!
//! ```
//! use calx_core::api::{Engine, EngineOptions};
//! use calx_core::{Integer, Shared, Value};
//!
//! let mut engine = Engine::new(EngineOptions::default());
//! let x = Shared::new(1 as Integer);
//! engine.register_variable("x", &x).unwrap();
//!
//! engine.compile("x++ * 10").unwrap();
//! assert_eq!(engine.evaluate().unwrap(), Value::Int(10));
//! assert_eq!(engine.evaluate().unwrap(), Value::Int(20));
//! assert_eq!(x.get(), 3);
//! ```

pub mod engine;
pub mod error;
pub mod expression;
pub mod options;

pub use engine::Engine;
pub use error::{Diagnostic, Error, RelatedInfo, Severity};
pub use expression::CompiledExpression;
pub use options::{CompileOptions, CompileOptionsOverride, EngineOptions};
