//! Public error types for the calx API.
//!
//! Internal errors are converted to these types at the API boundary.

use core::fmt;

use crate::diagnostics::{CompileError, CompileErrorKind};
use crate::evaluator::ExecutionError;
use crate::registry::RegistryError;
use crate::syntax::Span;

/// Public error type for all calx operations.
#[derive(Debug)]
pub enum Error {
    /// Invalid API usage (e.g., evaluating before compiling, a bad variable name).
    Api(String),

    /// The expression did not compile.
    ///
    /// Compilation stops at the first error, so this holds one diagnostic.
    Compilation {
        diagnostics: Vec<Diagnostic>,
        source: String,
        filename: Option<String>,
    },

    /// Evaluation failed (e.g., division by zero, a failing host function).
    Runtime {
        diagnostic: Diagnostic,
        source: String,
        filename: Option<String>,
    },

    /// The tree builder hit its pass limit.
    ResourceExceeded(String),
}

impl Error {
    /// Set the filename for this error.
    pub fn with_filename(self, filename: impl Into<String>) -> Self {
        let filename = Some(filename.into());
        match self {
            Error::Compilation {
                diagnostics,
                source,
                ..
            } => Error::Compilation {
                diagnostics,
                source,
                filename,
            },
            Error::Runtime {
                diagnostic,
                source,
                ..
            } => Error::Runtime {
                diagnostic,
                source,
                filename,
            },
            other => other,
        }
    }

    pub fn filename(&self) -> Option<&str> {
        match self {
            Error::Compilation { filename, .. } | Error::Runtime { filename, .. } => {
                filename.as_deref()
            }
            _ => None,
        }
    }

    /// The first diagnostic attached to this error, if any.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Error::Compilation { diagnostics, .. } => diagnostics.first(),
            Error::Runtime { diagnostic, .. } => Some(diagnostic),
            _ => None,
        }
    }

    pub fn source_text(&self) -> Option<&str> {
        match self {
            Error::Compilation { source, .. } | Error::Runtime { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Api(msg) => write!(f, "API error: {}", msg),
            Error::Compilation { diagnostics, .. } => match diagnostics.first() {
                Some(diagnostic) => write!(f, "Compilation failed: {}", diagnostic.message),
                None => write!(f, "Compilation failed"),
            },
            Error::Runtime { diagnostic, .. } => {
                write!(f, "Runtime error: {}", diagnostic.message)
            }
            Error::ResourceExceeded(msg) => write!(f, "Resource limit exceeded: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// A diagnostic message with source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,

    /// Primary diagnostic message.
    pub message: String,

    /// Byte range of the primary issue.
    pub span: Span,

    /// Related locations that provide additional context.
    pub related: Vec<RelatedInfo>,

    /// Help messages suggesting how to fix the issue.
    pub help: Vec<String>,

    /// Stable error code (e.g., "E0008"); runtime errors have none.
    pub code: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Related information for a diagnostic (e.g., "this is int").
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedInfo {
    pub span: Span,
    pub message: String,
}

// ============================================================================
// Conversion from internal errors
// ============================================================================

impl From<CompileError> for Error {
    fn from(err: CompileError) -> Self {
        if let CompileErrorKind::PassLimitExceeded(_) = err.kind {
            return Error::ResourceExceeded(err.kind.to_string());
        }
        Error::Compilation {
            diagnostics: vec![err.to_diagnostic()],
            source: err.source_text,
            filename: None,
        }
    }
}

impl From<ExecutionError> for Error {
    fn from(err: ExecutionError) -> Self {
        Error::Runtime {
            diagnostic: err.to_diagnostic(),
            source: err.source_text,
            filename: None,
        }
    }
}

impl From<RegistryError> for Error {
    fn from(err: RegistryError) -> Self {
        Error::Api(err.to_string())
    }
}
