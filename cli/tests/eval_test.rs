//! Integration tests for the `eval` command.

use assert_cmd::Command;
use predicates::prelude::*;

fn calx() -> Command {
    Command::new(env!("CARGO_BIN_EXE_calx"))
}

#[test]
fn eval_simple_expression() {
    calx()
        .args(["eval", "1 + 2"])
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn eval_precedence() {
    calx()
        .args(["eval", "10 * 5 - 3 << 1"])
        .assert()
        .success()
        .stdout("94\n");
}

#[test]
fn eval_float_and_cast() {
    calx()
        .args(["eval", "(float)7 / 2.0"])
        .assert()
        .success()
        .stdout("3.5\n");
}

#[test]
fn eval_string() {
    calx()
        .args(["eval", r#""hello""#])
        .assert()
        .success()
        .stdout("\"hello\"\n");
}

#[test]
fn eval_boolean() {
    calx()
        .args(["eval", "true && !false"])
        .assert()
        .success()
        .stdout("true\n");
}

#[test]
fn eval_stdlib_function() {
    calx()
        .args(["eval", "max(abs(-4), 3)"])
        .assert()
        .success()
        .stdout("4\n");
}

#[test]
fn eval_bindings_and_show_vars() {
    calx()
        .args([
            "eval",
            "x = x * 2 + (int)rate",
            "--int",
            "x=20",
            "--float",
            "rate=2.9",
            "--str",
            "who=world",
            "--bool",
            "on=false",
            "--show-vars",
        ])
        .assert()
        .success()
        .stdout("42\non = false\nrate = 2.9\nwho = \"world\"\nx = 42\n");
}

#[test]
fn eval_void_prints_nothing() {
    calx()
        .args(["eval", "print(\"hi\")"])
        .assert()
        .success()
        .stdout("hi\n");
}

#[test]
fn eval_tree() {
    calx()
        .args(["eval", "--tree", "1 + 2 * 3"])
        .assert()
        .success()
        .stdout("(+ 1 (* 2 3))\n7\n");
}

#[test]
fn eval_unknown_identifier() {
    calx()
        .args(["--no-color", "eval", "foo + 1"])
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("foo"));
}

#[test]
fn eval_type_mismatch() {
    calx()
        .args(["eval", "--no-color", r#"1 + "a""#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn eval_division_by_zero() {
    calx()
        .args(["eval", "--no-color", "1 / 0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("division by zero"));
}

#[test]
fn eval_bad_binding() {
    calx()
        .args(["eval", "--no-color", "x", "--int", "x=abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be an integer"));
}

#[test]
fn eval_missing_expression() {
    calx().args(["eval"]).assert().failure();
}
