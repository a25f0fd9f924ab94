//! Core of the calx expression engine.
//!
//! Source text flows through a fixed pipeline:
//!
//! 1. [`lexer`] splits the text into lexemes using the registry's operator table.
//! 2. [`classifier`] resolves names against the registry and picks unary forms.
//! 3. [`tree`] builds the expression tree with a worklist, never recursing.
//! 4. [`checker`] assigns and validates the type of every node.
//! 5. [`evaluator`] computes the value, writing through to host variables.
//!
//! Most users only need [`api::Engine`].

pub mod api;
pub mod checker;
pub mod classifier;
pub mod diagnostics;
pub mod evaluator;
pub mod lexer;
pub mod registry;
pub mod stdlib;
pub mod syntax;
pub mod tree;
pub mod values;

pub use api::{Engine, Error};
pub use values::{Float, HostVar, Integer, Shared, Value, ValueType};
