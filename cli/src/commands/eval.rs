//! The `eval` command - evaluate an expression.

use calx::{Engine, Value};

use crate::cli::EvalArgs;
use crate::common::{CliResult, engine::build_engine};

/// Run the eval command.
pub fn run(args: EvalArgs) -> CliResult<()> {
    let mut engine = build_engine(&args.bindings)?;

    let value = interpret_input(&mut engine, &args.expression, args.tree)?;
    if let Some(line) = format_value(&value) {
        println!("{line}");
    }

    if args.show_vars {
        for (name, var) in engine.registry().variables() {
            println!("{name} = {}", format_value(&var.get()).unwrap_or_default());
        }
    }
    Ok(())
}

/// Compile and evaluate one expression on `engine`.
///
/// With `show_tree`, the compiled tree is printed before evaluating.
pub fn interpret_input(engine: &mut Engine, input: &str, show_tree: bool) -> CliResult<Value> {
    let compiled = engine.compile(input)?;
    if show_tree {
        println!("{}", compiled.to_sexpr());
    }
    engine.evaluate()
}

/// The line to print for a result; void prints nothing.
pub fn format_value(value: &Value) -> Option<String> {
    match value {
        Value::Void => None,
        Value::Str(s) => Some(format!("\"{s}\"")),
        other => Some(other.to_string()),
    }
}
