use crate::registry::{Associativity, OperatorInfo, OperatorKind};
use crate::syntax::Span;
use crate::values::{HostVar, Value};

/// Handle to a sublist of lexemes in the tree builder's worklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListId(pub(crate) u32);

impl ListId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An operator occurrence. Form, precedence and associativity start out as
/// the table's and are narrowed once `++`/`--` pick a side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatorLexeme {
    pub info: OperatorInfo,
    pub form: crate::registry::OperatorForm,
    pub precedence: u8,
    pub associativity: Associativity,
}

impl OperatorLexeme {
    pub fn new(info: OperatorInfo) -> Self {
        Self {
            info,
            form: info.form,
            precedence: info.precedence,
            associativity: info.associativity,
        }
    }

    pub fn kind(&self) -> OperatorKind {
        self.info.kind
    }
}

#[derive(Debug, Clone)]
pub struct FunctionCallRef {
    pub name: String,
    pub arguments: Vec<ListId>,
}

#[derive(Debug, Clone)]
pub enum LexemeKind {
    /// Identifier not yet looked up.
    Unprocessed,
    Operator(OperatorLexeme),
    /// Registered function name directly followed by `(`.
    Function,
    Constant(Value),
    Variable(HostVar),
    /// Placeholder for a sublist that is still being reduced.
    Reference(ListId),
    /// Function name with its argument sublists.
    FunctionCall(FunctionCallRef),
}

#[derive(Debug, Clone)]
pub struct Lexeme {
    pub text: String,
    pub span: Span,
    /// Ordinal in the input token stream; breaks precedence ties.
    pub pos: usize,
    pub kind: LexemeKind,
}

impl Lexeme {
    pub fn new(text: impl Into<String>, span: Span, pos: usize, kind: LexemeKind) -> Self {
        Self {
            text: text.into(),
            span,
            pos,
            kind,
        }
    }

    pub fn operator(&self) -> Option<&OperatorLexeme> {
        match &self.kind {
            LexemeKind::Operator(op) => Some(op),
            _ => None,
        }
    }

    fn is_operator_kind(&self, kind: OperatorKind) -> bool {
        self.operator().is_some_and(|op| op.kind() == kind)
    }

    pub fn is_open_group(&self) -> bool {
        self.is_operator_kind(OperatorKind::OpenGroup)
    }

    pub fn is_close_group(&self) -> bool {
        self.is_operator_kind(OperatorKind::CloseGroup)
    }

    pub fn is_comma(&self) -> bool {
        self.is_operator_kind(OperatorKind::Comma)
    }

    /// A real operator, as opposed to grouping punctuation.
    pub fn is_operator(&self) -> bool {
        self.operator().is_some_and(|op| !op.kind().is_punctuation())
    }

    /// Something that produces a value once reduced.
    pub fn is_evaluable(&self) -> bool {
        matches!(
            self.kind,
            LexemeKind::Constant(_)
                | LexemeKind::Variable(_)
                | LexemeKind::Reference(_)
                | LexemeKind::FunctionCall(_)
        )
    }

    pub fn is_lvalue(&self) -> bool {
        matches!(self.kind, LexemeKind::Variable(_))
    }
}
