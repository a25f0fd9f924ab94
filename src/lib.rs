//! calx - an embeddable expression calculator
//!
//! # Overview
//!
//! calx compiles small C-like expressions over host-owned variables and
//! functions, then evaluates them as often as needed. Variables alias host
//! memory: an expression reads their live value and assignments write back.
//!
//! - Types: `bool`, 64-bit `int`, `float`, `string`.
//! - Operators: arithmetic, bitwise, comparison, logical, assignment,
//!   `++`/`--` and the casts `(bool)`, `(int)`, `(float)`, `(string)`.
//! - Operands of a binary operator must have the same type; only casts
//!   convert between types.
//!
//! # Quick Start
//!
//! ```
//! use calx::{Engine, EngineOptions, Integer, Shared, Value};
//!
//! let mut engine = Engine::new(EngineOptions::default());
//!
//! let x = Shared::new(0 as Integer);
//! engine.register_variable("x", &x).unwrap();
//!
//! engine.compile("x = 1 + 2 * 3").unwrap();
//! assert_eq!(engine.evaluate().unwrap(), Value::Int(7));
//! assert_eq!(x.get(), 7);
//! ```
//!
//! # Host Functions
//!
//! Plain Rust closures over `bool`, [`Integer`], [`Float`] and `String`
//! register directly; their signature becomes the function's type.
//!
//! ```
//! use calx::{Engine, EngineOptions, Float};
//!
//! let mut engine = Engine::new(EngineOptions::default());
//! engine.register_fn("hypot", |a: Float, b: Float| a.hypot(b)).unwrap();
//!
//! assert_eq!(engine.evaluate_as::<Float>("hypot(3.0, 4.0)").unwrap(), 5.0);
//! assert!(engine.compile("hypot(3, 4)").is_err());
//! ```

pub mod error_renderer;
pub use error_renderer::{CharSet, RenderConfig, render_error, render_error_to};

pub use calx_core::api::{
    CompileOptions, CompileOptionsOverride, CompiledExpression, Diagnostic, Engine, EngineOptions,
    Error, RelatedInfo, Severity,
};

pub use calx_core::registry::Registry;
pub use calx_core::stdlib::register_stdlib;
pub use calx_core::values::{
    self, Float, HostFunction, HostVar, Integer, Scalar, Shared, Value, ValueType,
};

// Host functions report failures with this type.
pub use calx_core::evaluator::RuntimeError;
