//! Resolves identifiers against the registry and fixes the side of `++`/`--`.

use tracing::debug;

use crate::diagnostics::{CompileError, CompileErrorKind};
use crate::lexer::grammar::is_identifier;
use crate::lexer::{Lexeme, LexemeKind, OperatorLexeme};
use crate::registry::{Associativity, OperatorForm, OperatorKind, Registry, UNARY_PRECEDENCE};

/// Classifies every `Unprocessed` lexeme in place.
pub fn classify(registry: &Registry, lexemes: &mut [Lexeme]) -> Result<(), CompileError> {
    check_brackets(lexemes)?;
    for i in 0..lexemes.len() {
        if matches!(lexemes[i].kind, LexemeKind::Unprocessed) {
            let next_is_group = lexemes.get(i + 1).is_some_and(Lexeme::is_open_group);
            lexemes[i].kind = resolve(registry, &lexemes[i], next_is_group)?;
        }
    }
    resolve_unary_sides(lexemes)?;
    resolve_signs(lexemes);
    debug!(count = lexemes.len(), "Classified lexemes");
    Ok(())
}

fn check_brackets(lexemes: &[Lexeme]) -> Result<(), CompileError> {
    let mut depth = 0usize;
    let mut first_open = None;
    for lexeme in lexemes {
        if lexeme.is_open_group() {
            depth += 1;
            first_open.get_or_insert_with(|| lexeme.span.clone());
        } else if lexeme.is_close_group() {
            depth = depth.checked_sub(1).ok_or_else(|| {
                CompileError::new(CompileErrorKind::BracketOrder, lexeme.span.clone())
            })?;
        }
    }
    match (depth, first_open) {
        (0, _) => Ok(()),
        (_, span) => Err(CompileError::new(
            CompileErrorKind::BracketBalance,
            span.unwrap_or_default(),
        )),
    }
}

fn resolve(
    registry: &Registry,
    lexeme: &Lexeme,
    next_is_group: bool,
) -> Result<LexemeKind, CompileError> {
    let name = lexeme.text.as_str();
    if let Some(info) = registry.operator(name) {
        return Ok(LexemeKind::Operator(OperatorLexeme::new(*info)));
    }
    if next_is_group && registry.function(name).is_some() {
        return Ok(LexemeKind::Function);
    }
    if !next_is_group {
        if let Some(var) = registry.variable(name) {
            return Ok(LexemeKind::Variable(var.clone()));
        }
    }
    let kind = if !is_identifier(name) {
        CompileErrorKind::UnexpectedToken(name.to_string())
    } else if next_is_group {
        CompileErrorKind::UnknownFunction(name.to_string())
    } else {
        CompileErrorKind::UnknownVariable(name.to_string())
    };
    Err(CompileError::new(kind, lexeme.span.clone()))
}

/// `++`/`--` become prefix when a variable follows them, else postfix when
/// one precedes them.
fn resolve_unary_sides(lexemes: &mut [Lexeme]) -> Result<(), CompileError> {
    for i in 0..lexemes.len() {
        let Some(op) = lexemes[i].operator() else {
            continue;
        };
        if !op.form.needs_lvalue_side() {
            continue;
        }
        let side = if lexemes.get(i + 1).is_some_and(Lexeme::is_lvalue) {
            OperatorForm::PREFIX
        } else if i > 0 && lexemes[i - 1].is_lvalue() {
            OperatorForm::POSTFIX
        } else {
            return Err(CompileError::new(
                CompileErrorKind::NoLvalue(lexemes[i].text.clone()),
                lexemes[i].span.clone(),
            ));
        };
        if let LexemeKind::Operator(op) = &mut lexemes[i].kind {
            op.form = side | OperatorForm::LVALUE_ONLY;
            op.precedence = UNARY_PRECEDENCE;
            op.associativity = Associativity::RightToLeft;
        }
    }
    Ok(())
}

/// `+`/`-` with nothing before them that yields a value are prefix
/// operators and bind as tightly as the other unary operators.
fn resolve_signs(lexemes: &mut [Lexeme]) {
    for i in 0..lexemes.len() {
        let is_sign = lexemes[i]
            .operator()
            .is_some_and(|op| op.form.is_indefinite());
        if !is_sign || (i > 0 && ends_operand(&lexemes[i - 1])) {
            continue;
        }
        if let LexemeKind::Operator(op) = &mut lexemes[i].kind {
            op.form = op.form.difference(OperatorForm::BINARY);
            op.precedence = UNARY_PRECEDENCE;
            op.associativity = Associativity::RightToLeft;
        }
    }
}

fn ends_operand(lexeme: &Lexeme) -> bool {
    match lexeme.operator() {
        None => true,
        Some(op) => op.kind() == OperatorKind::CloseGroup || op.form.contains(OperatorForm::POSTFIX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::values::{Integer, Shared, Value, ValueType};

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register_variable("x", Shared::new(1 as Integer))
            .unwrap();
        registry
            .register_function("f", ValueType::Integer, &[], |_| Ok(Value::Int(0)))
            .unwrap();
        registry
    }

    fn classified(source: &str) -> Result<Vec<Lexeme>, CompileError> {
        let registry = registry();
        let mut lexemes = tokenize(&registry, source)?;
        classify(&registry, &mut lexemes)?;
        Ok(lexemes)
    }

    #[test]
    fn resolves_names_by_call_shape() {
        let lexemes = classified("f() + x").unwrap();
        assert!(matches!(lexemes[0].kind, LexemeKind::Function));
        assert!(matches!(lexemes[4].kind, LexemeKind::Variable(_)));
    }

    #[test]
    fn unknown_names() {
        let err = classified("foo").unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::UnknownVariable("foo".into()));

        let err = classified("foo(1)").unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::UnknownFunction("foo".into()));

        // A variable used with call syntax is looked up as a function.
        let err = classified("x(1)").unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::UnknownFunction("x".into()));

        // And a function without a call is looked up as a variable.
        let err = classified("f + 1").unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::UnknownVariable("f".into()));
    }

    #[test]
    fn bracket_checks_run_first() {
        let err = classified(")foo(").unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::BracketOrder);

        let err = classified("(((1)").unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::BracketBalance);
    }

    #[test]
    fn increment_side_follows_the_variable() {
        let lexemes = classified("++x").unwrap();
        let op = lexemes[0].operator().unwrap();
        assert_eq!(op.form, OperatorForm::PREFIX | OperatorForm::LVALUE_ONLY);

        let lexemes = classified("x--").unwrap();
        let op = lexemes[1].operator().unwrap();
        assert_eq!(op.form, OperatorForm::POSTFIX | OperatorForm::LVALUE_ONLY);
        assert_eq!(op.precedence, UNARY_PRECEDENCE);
    }

    #[test]
    fn leading_signs_are_prefix() {
        let lexemes = classified("-x * -(x) - x-- - +1").unwrap();
        let forms: Vec<_> = lexemes
            .iter()
            .filter_map(Lexeme::operator)
            .filter(|op| op.form.is_indefinite() || op.precedence == UNARY_PRECEDENCE)
            .map(|op| (op.info.symbol, op.form.contains(OperatorForm::BINARY)))
            .collect();
        assert_eq!(
            forms,
            [
                ("-", false),
                ("-", false),
                ("-", true),
                ("--", false),
                ("-", true),
                ("+", false),
            ]
        );
    }

    #[test]
    fn increment_needs_a_variable() {
        let err = classified("1 + ++2").unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::NoLvalue("++".into()));

        // Only a bare variable next to the operator counts.
        let err = classified("++f()").unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::NoLvalue("++".into()));
        let err = classified("(x)--").unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::NoLvalue("--".into()));
    }
}
