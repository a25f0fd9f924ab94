//! Operator metadata: the built-in operator table and the types describing it.

use bitflags::bitflags;

use crate::values::{TypeMask, ValueType};

/// Precedence given to prefix/postfix forms once an operator is resolved as unary.
pub const UNARY_PRECEDENCE: u8 = 15;

/// Identity of a built-in operator; keys the evaluation function table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulus,
    LeftShift,
    RightShift,
    LessThan,
    GreaterThan,
    LessOrEqual,
    GreaterOrEqual,
    Equal,
    NotEqual,
    BitwiseAnd,
    BitwiseXor,
    BitwiseOr,
    LogicalAnd,
    LogicalOr,
    Assignment,
    AddAssign,
    SubtractAssign,
    MultiplyAssign,
    DivideAssign,
    ModulusAssign,
    BitwiseAndAssign,
    BitwiseOrAssign,
    BitwiseXorAssign,
    LeftShiftAssign,
    RightShiftAssign,
    LogicalNot,
    Complement,
    Increment,
    Decrement,
    CastBool,
    CastInt,
    CastFloat,
    CastString,
    OpenGroup,
    CloseGroup,
    Comma,
}

impl OperatorKind {
    /// Grouping and separator tokens. They never reach the tree.
    pub fn is_punctuation(self) -> bool {
        matches!(
            self,
            OperatorKind::OpenGroup | OperatorKind::CloseGroup | OperatorKind::Comma
        )
    }
}

bitflags! {
    /// Syntactic forms an operator may take.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OperatorForm: u8 {
        const BINARY = 0b0001;
        const PREFIX = 0b0010;
        const POSTFIX = 0b0100;
        /// The first operand must be a variable.
        const LVALUE_ONLY = 0b1000;
    }
}

impl OperatorForm {
    /// Binary combined with a unary form, like `+` and `-`.
    pub fn is_indefinite(self) -> bool {
        self.contains(OperatorForm::BINARY)
            && self.intersects(OperatorForm::PREFIX | OperatorForm::POSTFIX)
    }

    /// Unary lvalue operators whose side is decided from their neighbours.
    pub fn needs_lvalue_side(self) -> bool {
        self.contains(OperatorForm::LVALUE_ONLY)
            && self.contains(OperatorForm::PREFIX | OperatorForm::POSTFIX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    LeftToRight,
    RightToLeft,
}

/// The form an operator node was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    Binary,
    Prefix,
    Postfix,
}

impl Fixity {
    pub fn operand_count(self) -> usize {
        match self {
            Fixity::Binary => 2,
            Fixity::Prefix | Fixity::Postfix => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultType {
    SameAsOperand,
    Fixed(ValueType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperatorInfo {
    pub symbol: &'static str,
    pub kind: OperatorKind,
    pub precedence: u8,
    pub form: OperatorForm,
    pub operand_types: TypeMask,
    pub result: ResultType,
    pub associativity: Associativity,
}

/// Tally of operators a partial symbol could still become.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchInfo {
    /// Operators whose symbol starts with the prefix.
    pub count: usize,
    /// Whether one of them is exactly the prefix.
    pub full_match: bool,
}

const fn op(
    symbol: &'static str,
    kind: OperatorKind,
    precedence: u8,
    form: OperatorForm,
    operand_types: TypeMask,
    result: ResultType,
    associativity: Associativity,
) -> OperatorInfo {
    OperatorInfo {
        symbol,
        kind,
        precedence,
        form,
        operand_types,
        result,
        associativity,
    }
}

const fn binary(
    symbol: &'static str,
    kind: OperatorKind,
    precedence: u8,
    operand_types: TypeMask,
) -> OperatorInfo {
    op(
        symbol,
        kind,
        precedence,
        OperatorForm::BINARY,
        operand_types,
        ResultType::SameAsOperand,
        Associativity::LeftToRight,
    )
}

const fn comparison(symbol: &'static str, kind: OperatorKind, precedence: u8) -> OperatorInfo {
    op(
        symbol,
        kind,
        precedence,
        OperatorForm::BINARY,
        TypeMask::ALL,
        ResultType::Fixed(ValueType::Boolean),
        Associativity::LeftToRight,
    )
}

const fn assignment(symbol: &'static str, kind: OperatorKind, operand_types: TypeMask) -> OperatorInfo {
    op(
        symbol,
        kind,
        3,
        OperatorForm::BINARY.union(OperatorForm::LVALUE_ONLY),
        operand_types,
        ResultType::SameAsOperand,
        Associativity::RightToLeft,
    )
}

const fn prefix(symbol: &'static str, kind: OperatorKind, operand_types: TypeMask) -> OperatorInfo {
    op(
        symbol,
        kind,
        UNARY_PRECEDENCE,
        OperatorForm::PREFIX,
        operand_types,
        ResultType::SameAsOperand,
        Associativity::RightToLeft,
    )
}

const fn cast(symbol: &'static str, kind: OperatorKind, target: ValueType) -> OperatorInfo {
    op(
        symbol,
        kind,
        16,
        OperatorForm::PREFIX,
        TypeMask::ALL,
        ResultType::Fixed(target),
        Associativity::RightToLeft,
    )
}

const fn step(symbol: &'static str, kind: OperatorKind) -> OperatorInfo {
    op(
        symbol,
        kind,
        UNARY_PRECEDENCE,
        OperatorForm::PREFIX
            .union(OperatorForm::POSTFIX)
            .union(OperatorForm::LVALUE_ONLY),
        TypeMask::INTEGER,
        ResultType::SameAsOperand,
        Associativity::RightToLeft,
    )
}

const fn punctuation(symbol: &'static str, kind: OperatorKind) -> OperatorInfo {
    op(
        symbol,
        kind,
        1,
        OperatorForm::empty(),
        TypeMask::empty(),
        ResultType::SameAsOperand,
        Associativity::LeftToRight,
    )
}

const INT: TypeMask = TypeMask::INTEGER;
const NUMERIC: TypeMask = TypeMask::NUMERIC;
const TEXTUAL: TypeMask = TypeMask::NUMERIC.union(TypeMask::STRING);

/// Operators every registry starts with.
pub static BUILTIN_OPERATORS: &[OperatorInfo] = &[
    op(
        "+",
        OperatorKind::Addition,
        12,
        OperatorForm::BINARY.union(OperatorForm::PREFIX),
        TEXTUAL,
        ResultType::SameAsOperand,
        Associativity::LeftToRight,
    ),
    op(
        "-",
        OperatorKind::Subtraction,
        12,
        OperatorForm::BINARY.union(OperatorForm::PREFIX),
        NUMERIC,
        ResultType::SameAsOperand,
        Associativity::LeftToRight,
    ),
    binary("*", OperatorKind::Multiplication, 13, NUMERIC),
    binary("/", OperatorKind::Division, 13, NUMERIC),
    binary("%", OperatorKind::Modulus, 13, INT),
    binary("<<", OperatorKind::LeftShift, 11, INT),
    binary(">>", OperatorKind::RightShift, 11, INT),
    comparison("<", OperatorKind::LessThan, 10),
    comparison(">", OperatorKind::GreaterThan, 10),
    comparison("<=", OperatorKind::LessOrEqual, 10),
    comparison(">=", OperatorKind::GreaterOrEqual, 10),
    comparison("==", OperatorKind::Equal, 9),
    comparison("!=", OperatorKind::NotEqual, 9),
    binary("&", OperatorKind::BitwiseAnd, 8, INT),
    binary("^", OperatorKind::BitwiseXor, 7, INT),
    binary("|", OperatorKind::BitwiseOr, 6, INT),
    binary("&&", OperatorKind::LogicalAnd, 5, TypeMask::BOOLEAN),
    binary("||", OperatorKind::LogicalOr, 4, TypeMask::BOOLEAN),
    assignment("=", OperatorKind::Assignment, TypeMask::ALL),
    assignment("+=", OperatorKind::AddAssign, TEXTUAL),
    assignment("-=", OperatorKind::SubtractAssign, NUMERIC),
    assignment("*=", OperatorKind::MultiplyAssign, NUMERIC),
    assignment("/=", OperatorKind::DivideAssign, NUMERIC),
    assignment("%=", OperatorKind::ModulusAssign, INT),
    assignment("&=", OperatorKind::BitwiseAndAssign, INT),
    assignment("|=", OperatorKind::BitwiseOrAssign, INT),
    assignment("^=", OperatorKind::BitwiseXorAssign, INT),
    assignment("<<=", OperatorKind::LeftShiftAssign, INT),
    assignment(">>=", OperatorKind::RightShiftAssign, INT),
    prefix("!", OperatorKind::LogicalNot, TypeMask::BOOLEAN),
    prefix("~", OperatorKind::Complement, INT),
    step("++", OperatorKind::Increment),
    step("--", OperatorKind::Decrement),
    cast("(bool)", OperatorKind::CastBool, ValueType::Boolean),
    cast("(int)", OperatorKind::CastInt, ValueType::Integer),
    cast("(float)", OperatorKind::CastFloat, ValueType::Float),
    cast("(string)", OperatorKind::CastString, ValueType::String),
    punctuation("(", OperatorKind::OpenGroup),
    punctuation(")", OperatorKind::CloseGroup),
    punctuation(",", OperatorKind::Comma),
];
