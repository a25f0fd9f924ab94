use crate::api::{Engine, EngineOptions};
use crate::stdlib::register_stdlib;
use crate::values::{Value, ValueType};

fn eval(source: &str) -> Value {
    let mut engine = Engine::new(EngineOptions::default());
    register_stdlib(engine.registry_mut()).unwrap();
    engine.compile(source).unwrap();
    engine.evaluate().unwrap()
}

#[test]
fn length_counts_characters() {
    assert_eq!(eval("len(\"héllo\")"), Value::Int(5));
    assert_eq!(eval("len(\"\")"), Value::Int(0));
}

#[test]
fn case_mapping() {
    assert_eq!(eval("upper(\"abc\") + lower(\"DEF\")"), Value::from("ABCdef"));
}

#[test]
fn print_returns_nothing() {
    let mut engine = Engine::new(EngineOptions::default());
    register_stdlib(engine.registry_mut()).unwrap();
    let compiled = engine.compile("print(\"hi\")").unwrap();
    assert_eq!(compiled.result_type(), ValueType::Void);
    assert_eq!(engine.evaluate().unwrap(), Value::Void);
}
