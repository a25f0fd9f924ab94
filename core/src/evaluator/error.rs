use thiserror::Error;

use crate::api::{Diagnostic, Severity};
use crate::syntax::Span;
use crate::values::{Integer, ValueType};

/// Failures raised while evaluating a compiled tree, or by host functions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow")]
    IntegerOverflow,

    #[error("shift amount {0} is out of range")]
    InvalidShift(Integer),

    #[error("cannot convert {text:?} to {target}")]
    InvalidCast { text: String, target: ValueType },

    #[error("expression produced no value")]
    VoidValue,

    #[error("cannot assign {found} to a {expected} variable")]
    AssignmentType {
        expected: ValueType,
        found: ValueType,
    },

    #[error("variable {0} is no longer registered")]
    VariableUnbound(String),

    #[error("variable {name} was re-registered as {found}, expected {expected}")]
    VariableRebound {
        name: String,
        expected: ValueType,
        found: ValueType,
    },

    #[error("operator {0} needs a variable operand")]
    NotAnLvalue(&'static str),

    #[error("operator {0} is missing an operand")]
    MissingOperand(&'static str),

    #[error("operator {0} has no implementation")]
    MissingOperator(&'static str),

    #[error("operator {op} cannot be applied to {ty}")]
    UnsupportedOperand { op: &'static str, ty: ValueType },

    #[error("function {0} is not registered")]
    UnknownFunction(String),

    #[error("function {name} returned {found}, expected {expected}")]
    ReturnType {
        name: String,
        expected: ValueType,
        found: ValueType,
    },

    #[error("expected {expected} argument(s), found {found}")]
    ArgumentCount { expected: usize, found: usize },

    #[error("argument has the wrong type, expected {expected}")]
    ArgumentType { expected: ValueType },

    /// Raised by host functions.
    #[error("{0}")]
    Host(String),
}

/// A [`RuntimeError`] located at the node that raised it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct ExecutionError {
    pub kind: RuntimeError,
    pub span: Span,
    pub source_text: String,
}

impl ExecutionError {
    pub fn new(kind: RuntimeError, span: Span) -> Self {
        Self {
            kind,
            span,
            source_text: String::new(),
        }
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source_text = source.to_string();
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let help = match &self.kind {
            RuntimeError::VariableUnbound(_) | RuntimeError::VariableRebound { .. } => {
                vec!["recompile the expression after changing variable bindings".to_string()]
            }
            _ => Vec::new(),
        };
        Diagnostic {
            severity: Severity::Error,
            message: self.kind.to_string(),
            span: self.span.clone(),
            related: Vec::new(),
            help,
            code: None,
        }
    }
}
