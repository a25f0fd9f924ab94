//! Command-line interface definitions.
//!
//! This module contains only clap struct definitions - no business logic.
//! All command implementations are in the `commands` module.

use clap::{Args, Parser, Subcommand};

/// calx - an embeddable expression calculator
#[derive(Parser, Debug)]
#[command(name = "calx", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate an expression
    Eval(EvalArgs),

    /// Start interactive REPL
    Repl(ReplArgs),
}

/// Host variables to bind before compiling, as `NAME=VALUE`.
#[derive(Args, Debug, Default, Clone)]
pub struct Bindings {
    /// Bind an integer variable
    #[arg(long = "int", value_name = "NAME=VALUE")]
    pub ints: Vec<String>,

    /// Bind a float variable
    #[arg(long = "float", value_name = "NAME=VALUE")]
    pub floats: Vec<String>,

    /// Bind a boolean variable
    #[arg(long = "bool", value_name = "NAME=VALUE")]
    pub bools: Vec<String>,

    /// Bind a string variable
    #[arg(long = "str", value_name = "NAME=VALUE")]
    pub strs: Vec<String>,
}

/// Arguments for the `eval` command.
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Expression to evaluate
    pub expression: String,

    #[command(flatten)]
    pub bindings: Bindings,

    /// Print every bound variable after evaluating
    #[arg(long)]
    pub show_vars: bool,

    /// Print the expression tree instead of only the value
    #[arg(long)]
    pub tree: bool,
}

/// Arguments for the `repl` command.
#[derive(Args, Debug)]
pub struct ReplArgs {
    #[command(flatten)]
    pub bindings: Bindings,
}
