//! Compile-time errors raised by the lexer, classifier, tree builder and
//! type checker.

use thiserror::Error;

use crate::api::{Diagnostic, RelatedInfo, Severity};
use crate::syntax::Span;
use crate::values::ValueType;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileErrorKind {
    #[error("wrong bracket order")]
    BracketOrder,

    #[error("bracket balance is broken")]
    BracketBalance,

    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("integer literal '{0}' does not fit in 64 bits")]
    LiteralOutOfRange(String),

    #[error("invalid numeric literal '{0}'")]
    InvalidLiteral(String),

    #[error("unknown function {0}")]
    UnknownFunction(String),

    #[error("unknown variable {0}")]
    UnknownVariable(String),

    #[error("no suitable lvalue for operator {0}")]
    NoLvalue(String),

    #[error("unexpected '{0}'")]
    UnexpectedToken(String),

    #[error("unexpected ',' outside of a function call")]
    UnexpectedComma,

    #[error("empty expression")]
    EmptyExpression,

    #[error("empty argument in call to {0}")]
    EmptyArgument(String),

    #[error("missing operand for operator {0}")]
    MissingOperand(String),

    #[error("cannot resolve operator {0}")]
    UnresolvedOperator(String),

    #[error("operator {op} does not accept {ty} operands")]
    UnsupportedOperandType { op: String, ty: ValueType },

    #[error("operator {op} needs operands of the same type, found {left} and {right}")]
    OperandTypeMismatch {
        op: String,
        left: ValueType,
        right: ValueType,
    },

    #[error("operator {0} can only be applied to a variable")]
    NotAnLvalue(String),

    #[error("operator {op} expects {expected} operand(s), found {found}")]
    OperandCount {
        op: String,
        expected: usize,
        found: usize,
    },

    #[error("function {name} expects {expected} argument(s), found {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("argument {index} of {name} must be {expected}, found {found}")]
    ArgumentType {
        name: String,
        index: usize,
        expected: ValueType,
        found: ValueType,
    },

    #[error("internal error: unresolved reference while linking the tree")]
    UnresolvedReference,

    #[error("internal error: {0} node(s) left unlinked")]
    DanglingNodes(usize),

    #[error("expression did not reduce within {0} worklist passes")]
    PassLimitExceeded(usize),
}

impl CompileErrorKind {
    pub fn code(&self) -> &'static str {
        use CompileErrorKind::*;
        match self {
            BracketOrder => "E0001",
            BracketBalance => "E0002",
            UnexpectedCharacter(_) => "E0003",
            UnterminatedString => "E0004",
            LiteralOutOfRange(_) => "E0005",
            InvalidLiteral(_) => "E0006",
            UnknownFunction(_) => "E0007",
            UnknownVariable(_) => "E0008",
            NoLvalue(_) => "E0009",
            UnexpectedToken(_) => "E0010",
            UnexpectedComma => "E0011",
            EmptyExpression => "E0012",
            EmptyArgument(_) => "E0013",
            MissingOperand(_) => "E0014",
            UnresolvedOperator(_) => "E0015",
            UnsupportedOperandType { .. } => "E0016",
            OperandTypeMismatch { .. } => "E0017",
            NotAnLvalue(_) => "E0018",
            OperandCount { .. } => "E0019",
            ArityMismatch { .. } => "E0020",
            ArgumentType { .. } => "E0021",
            UnresolvedReference => "E0022",
            DanglingNodes(_) => "E0023",
            PassLimitExceeded(_) => "E0024",
        }
    }

    fn help(&self) -> Option<String> {
        use CompileErrorKind::*;
        match self {
            BracketOrder | BracketBalance => {
                Some("every '(' needs a matching ')' after it".to_string())
            }
            UnknownFunction(_) | UnknownVariable(_) => {
                Some("names must be registered with the engine before compiling".to_string())
            }
            NoLvalue(op) => Some(format!("{op} must be placed directly before or after a variable")),
            UnexpectedComma => Some("commas only separate function arguments".to_string()),
            OperandTypeMismatch { .. } => Some(
                "use a cast such as (int), (float), (bool) or (string) to convert one side"
                    .to_string(),
            ),
            PassLimitExceeded(_) => {
                Some("raise `max_worklist_passes` in the compile options".to_string())
            }
            _ => None,
        }
    }

    /// Failures that indicate a defect in the tree builder rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            CompileErrorKind::UnresolvedReference | CompileErrorKind::DanglingNodes(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct CompileError {
    pub kind: CompileErrorKind,
    pub span: Span,
    pub related: Vec<(Span, String)>,
    /// Filled in once the error leaves the pipeline.
    pub source_text: String,
}

impl CompileError {
    pub fn new(kind: CompileErrorKind, span: Span) -> Self {
        Self {
            kind,
            span,
            related: Vec::new(),
            source_text: String::new(),
        }
    }

    pub fn with_related(mut self, span: Span, message: impl Into<String>) -> Self {
        self.related.push((span, message.into()));
        self
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source_text = source.to_string();
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic {
            severity: Severity::Error,
            message: self.kind.to_string(),
            span: self.span.clone(),
            related: self
                .related
                .iter()
                .map(|(span, message)| RelatedInfo {
                    span: span.clone(),
                    message: message.clone(),
                })
                .collect(),
            help: self.kind.help().into_iter().collect(),
            code: Some(self.kind.code().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_carries_code_and_help() {
        let err = CompileError::new(
            CompileErrorKind::UnknownVariable("foo".to_string()),
            Span::new(0, 3),
        );
        let diagnostic = err.to_diagnostic();
        assert_eq!(diagnostic.message, "unknown variable foo");
        assert_eq!(diagnostic.code.as_deref(), Some("E0008"));
        assert_eq!(diagnostic.span, Span::new(0, 3));
        assert_eq!(diagnostic.help.len(), 1);
    }

    #[test]
    fn related_spans_become_related_info() {
        let err = CompileError::new(
            CompileErrorKind::OperandTypeMismatch {
                op: "+".to_string(),
                left: ValueType::Integer,
                right: ValueType::String,
            },
            Span::new(0, 5),
        )
        .with_related(Span::new(0, 1), "this is int")
        .with_related(Span::new(2, 5), "this is string");

        let diagnostic = err.to_diagnostic();
        assert_eq!(diagnostic.related.len(), 2);
        assert_eq!(diagnostic.related[1].message, "this is string");
        assert!(!err.kind.is_internal());
    }
}
