//! Integration tests for the public API.
//!
//! These tests validate that the public API works end-to-end with real
//! lexing, classification, tree building, type checking, and evaluation.

use calx_core::api::{CompileOptionsOverride, Engine, EngineOptions, Error};
use calx_core::{Float, Integer, Shared, Value, ValueType};

fn engine() -> Engine {
    Engine::new(EngineOptions::default())
}

fn eval(engine: &mut Engine, source: &str) -> Result<Value, Error> {
    engine.compile(source)?;
    engine.evaluate()
}

fn compile_message(engine: &mut Engine, source: &str) -> String {
    match engine.compile(source) {
        Err(Error::Compilation { diagnostics, .. }) => diagnostics[0].message.clone(),
        Err(other) => panic!("expected a compilation error for {source:?}, got {other}"),
        Ok(_) => panic!("expected {source:?} to fail"),
    }
}

#[test]
fn test_literals_round_trip() {
    let mut engine = engine();
    assert_eq!(eval(&mut engine, "true").unwrap(), Value::Bool(true));
    assert_eq!(eval(&mut engine, "42").unwrap(), Value::Int(42));
    assert_eq!(eval(&mut engine, "3.14").unwrap(), Value::Float(3.14));
    assert_eq!(eval(&mut engine, "\"hi\"").unwrap(), Value::from("hi"));

    let compiled = engine.compile("3.14").unwrap();
    assert_eq!(compiled.result_type(), ValueType::Float);
}

#[test]
fn test_precedence() {
    let mut engine = engine();
    assert_eq!(eval(&mut engine, "1+2*3").unwrap(), Value::Int(7));
    assert_eq!(eval(&mut engine, "(1+2)*3").unwrap(), Value::Int(9));
}

#[test]
fn test_assignment_writes_to_host() {
    let mut engine = engine();
    let x = Shared::new(0 as Integer);
    engine.register_variable("x", &x).unwrap();

    assert_eq!(eval(&mut engine, "x=5").unwrap(), Value::Int(5));
    assert_eq!(x.get(), 5);
}

#[test]
fn test_prefix_and_postfix_increment() {
    let mut engine = engine();
    let x = Shared::new(1 as Integer);
    engine.register_variable("x", &x).unwrap();

    assert_eq!(eval(&mut engine, "++x").unwrap(), Value::Int(2));
    assert_eq!(x.get(), 2);

    x.set(1);
    assert_eq!(eval(&mut engine, "x++").unwrap(), Value::Int(1));
    assert_eq!(x.get(), 2);
}

#[test]
fn test_unknown_identifiers() {
    let mut engine = engine();
    assert_eq!(compile_message(&mut engine, "foo"), "unknown variable foo");
    assert_eq!(compile_message(&mut engine, "foo()"), "unknown function foo");
}

#[test]
fn test_bracket_imbalance() {
    let mut engine = engine();
    let message = compile_message(&mut engine, "(1+2");
    assert!(message.contains("bracket"), "{message}");
}

#[test]
fn test_binary_operands_must_share_a_type() {
    let mut engine = engine();
    let message = compile_message(&mut engine, "1+\"a\"");
    assert!(message.contains("int") && message.contains("string"), "{message}");
    assert_eq!(eval(&mut engine, "1+2").unwrap(), Value::Int(3));
    assert_eq!(eval(&mut engine, "\"a\"+\"b\"").unwrap(), Value::from("ab"));
}

#[test]
fn test_function_arity_and_types() {
    let mut engine = engine();
    engine
        .register_fn("p", |a: Integer, b: Integer| a * 10 + b)
        .unwrap();

    match engine.compile("p(1)") {
        Err(Error::Compilation { diagnostics, .. }) => {
            assert_eq!(diagnostics[0].code.as_deref(), Some("E0020"));
        }
        other => panic!("expected an arity error, got {:?}", other.err()),
    }
    match engine.compile("p(1,\"a\")") {
        Err(Error::Compilation { diagnostics, .. }) => {
            assert_eq!(diagnostics[0].code.as_deref(), Some("E0021"));
        }
        other => panic!("expected an argument type error, got {:?}", other.err()),
    }
    assert_eq!(eval(&mut engine, "p(1,2)").unwrap(), Value::Int(12));
}

#[test]
fn test_reevaluation_sees_host_changes() {
    let mut engine = engine();
    let rate = Shared::new(0.5 as Float);
    engine.register_variable("rate", &rate).unwrap();
    engine.compile("rate * 10.0").unwrap();

    let first = engine.evaluate().unwrap();
    let second = engine.evaluate().unwrap();
    assert_eq!(first, second);
    assert_eq!(first, Value::Float(5.0));

    rate.set(0.25);
    assert_eq!(engine.evaluate().unwrap(), Value::Float(2.5));
}

#[test]
fn test_type_erased_function() {
    let mut engine = engine();
    engine
        .register_function(
            "join",
            ValueType::String,
            &[ValueType::String, ValueType::Integer],
            |args| match args {
                [Value::Str(s), Value::Int(n)] => Ok(Value::Str(s.repeat(*n as usize))),
                _ => Ok(Value::Void),
            },
        )
        .unwrap();
    assert_eq!(
        eval(&mut engine, "join(\"ab\", 3)").unwrap(),
        Value::from("ababab")
    );
}

#[test]
fn test_runtime_error_has_span() {
    let mut engine = engine();
    let zero = Shared::new(0 as Integer);
    engine.register_variable("zero", &zero).unwrap();
    match eval(&mut engine, "10 % zero") {
        Err(Error::Runtime {
            diagnostic, source, ..
        }) => {
            assert_eq!(diagnostic.message, "division by zero");
            assert_eq!(source, "10 % zero");
            assert_eq!(diagnostic.span.start(), 0);
            assert_eq!(diagnostic.span.end(), 9);
        }
        other => panic!("expected a runtime error, got {other:?}"),
    }
}

#[test]
fn test_independent_engines() {
    let mut a = engine();
    let mut b = engine();
    a.register_variable("v", Shared::new(1 as Integer)).unwrap();
    assert_eq!(eval(&mut a, "v").unwrap(), Value::Int(1));
    assert!(b.compile("v").is_err());
}

#[test]
fn test_deep_nesting() {
    let depth = 2_000;
    let mut engine = engine();

    let source = format!("{}7{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(eval(&mut engine, &source).unwrap(), Value::Int(7));

    let source = format!("{}1", "!".repeat(depth));
    assert!(eval(&mut engine, &source).is_err(), "`!` needs a bool");
    let source = format!("{}true", "!".repeat(depth + 1));
    assert_eq!(eval(&mut engine, &source).unwrap(), Value::Bool(false));
}

#[test]
fn test_pass_limit_override() {
    let mut engine = engine();
    let tight = CompileOptionsOverride {
        max_worklist_passes: Some(3),
    };
    let source = "1 + 2 * 3 - 4 / 5";
    assert!(matches!(
        engine.compile_with(tight, source),
        Err(Error::ResourceExceeded(_))
    ));
    assert!(engine.compile(source).is_ok());
}
