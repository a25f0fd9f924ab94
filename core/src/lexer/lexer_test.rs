use pretty_assertions::assert_eq;

use super::*;
use crate::diagnostics::CompileErrorKind;
use crate::values::Value;

fn texts(source: &str) -> Vec<String> {
    let registry = Registry::new();
    tokenize(&registry, source)
        .unwrap()
        .into_iter()
        .map(|lexeme| lexeme.text)
        .collect()
}

fn error(source: &str) -> CompileError {
    let registry = Registry::new();
    tokenize(&registry, source).unwrap_err()
}

fn constants(source: &str) -> Vec<Value> {
    let registry = Registry::new();
    tokenize(&registry, source)
        .unwrap()
        .into_iter()
        .filter_map(|lexeme| match lexeme.kind {
            LexemeKind::Constant(value) => Some(value),
            _ => None,
        })
        .collect()
}

#[test]
fn splits_on_whitespace_and_operators() {
    assert_eq!(texts("1+2 * x"), ["1", "+", "2", "*", "x"]);
    assert_eq!(texts(" \t\r\nx\n"), ["x"]);
    assert_eq!(texts(""), Vec::<String>::new());
}

#[test]
fn backtracks_to_longest_full_operator() {
    assert_eq!(texts("a<<x"), ["a", "<<", "x"]);
    assert_eq!(texts("a<<=x"), ["a", "<<=", "x"]);
    assert_eq!(texts("a<=x"), ["a", "<=", "x"]);
    assert_eq!(texts("a<x"), ["a", "<", "x"]);
    assert_eq!(texts("x+++y"), ["x", "++", "+", "y"]);
    assert_eq!(texts("a&&b&c"), ["a", "&&", "b", "&", "c"]);
}

#[test]
fn casts_are_single_lexemes() {
    assert_eq!(texts("(int)x"), ["(int)", "x"]);
    assert_eq!(texts("(string)(float)1"), ["(string)", "(float)", "1"]);
}

#[test]
fn parenthesised_identifier_is_not_a_cast() {
    assert_eq!(texts("(i)"), ["(", "i", ")"]);
    assert_eq!(texts("(integer)"), ["(", "integer", ")"]);
    assert_eq!(texts("(in"), ["(", "in"]);
}

#[test]
fn numbers_back_off_to_longest_literal() {
    assert_eq!(texts("3-2"), ["3", "-", "2"]);
    assert_eq!(texts("1e5"), ["1e5"]);
    assert_eq!(texts("2e+x"), ["2", "e", "+", "x"]);
    assert_eq!(
        error("1.5.2").kind,
        CompileErrorKind::UnexpectedCharacter('.')
    );
}

#[test]
fn literal_values() {
    assert_eq!(
        constants(r#"42 2.5 7. 6e2 "hi there" true false"#),
        [
            Value::Int(42),
            Value::Float(2.5),
            Value::Float(7.0),
            Value::Float(600.0),
            Value::from("hi there"),
            Value::Bool(true),
            Value::Bool(false),
        ]
    );
}

#[test]
fn booleans_must_match_exactly() {
    let registry = Registry::new();
    let lexemes = tokenize(&registry, "trueish").unwrap();
    assert_eq!(lexemes.len(), 1);
    assert!(matches!(lexemes[0].kind, LexemeKind::Unprocessed));
}

#[test]
fn nul_ends_input() {
    assert_eq!(texts("1+2\0garbage $"), ["1", "+", "2"]);
}

#[test]
fn spans_and_positions() {
    let registry = Registry::new();
    let lexemes = tokenize(&registry, "ab <<= \"é\"").unwrap();
    let spans: Vec<_> = lexemes.iter().map(|l| (l.span.clone(), l.pos)).collect();
    assert_eq!(
        spans,
        [
            (Span::new(0, 2), 0),
            (Span::new(3, 6), 1),
            (Span::new(7, 11), 2),
        ]
    );
}

#[test]
fn unexpected_character() {
    let err = error("1 $ 2");
    assert_eq!(err.kind, CompileErrorKind::UnexpectedCharacter('$'));
    assert_eq!(err.span, Span::new(2, 3));
}

#[test]
fn unterminated_string() {
    let err = error(r#"x + "abc"#);
    assert_eq!(err.kind, CompileErrorKind::UnterminatedString);
    assert_eq!(err.span, Span::new(4, 8));
}

#[test]
fn integer_out_of_range() {
    let err = error("99999999999999999999");
    assert_eq!(
        err.kind,
        CompileErrorKind::LiteralOutOfRange("99999999999999999999".to_string())
    );
}
