//! calx CLI - an embeddable expression calculator.

mod cli;
mod commands;
mod common;

use clap::Parser;
use cli::{Cli, Command};

fn main() {
    use tracing_subscriber::{EnvFilter, fmt};

    // RUST_LOG controls the log level; WARN otherwise.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Eval(args) => commands::eval::run(args),
        Command::Repl(args) => commands::repl::run(args, cli.no_color),
    };

    if let Err(e) = result {
        common::error::render_and_exit(e, cli.no_color);
    }
}
