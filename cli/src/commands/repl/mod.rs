//! The `repl` command - interactive REPL.

pub mod highlighter;
pub mod lexer;

use calx::{Integer, Shared};
use nu_ansi_term::Style;
use reedline::{
    DefaultPrompt, DefaultPromptSegment, EditCommand, Emacs, FileBackedHistory, KeyCode,
    KeyModifiers, Reedline, ReedlineEvent, Signal, ValidationResult, default_emacs_keybindings,
};
use tracing::warn;

use crate::cli::ReplArgs;
use crate::common::{CliResult, engine::build_engine, error::render};
use highlighter::Highlighter;
use lexer::calculate_depth;

use super::eval::{format_value, interpret_input};

/// A `reedline` validator that waits for more input while a parenthesis
/// is still open.
///
/// An unclosed string also counts as incomplete. Anything else is handed
/// to the engine, which reports real syntax errors.
///
/// To split a complete expression across multiple lines for readability,
/// users can press `Alt + Enter` to insert a newline manually.
struct CalxValidator;

impl reedline::Validator for CalxValidator {
    fn validate(&self, input: &str) -> ValidationResult {
        match calculate_depth(input) {
            Some(0) => ValidationResult::Complete,
            Some(_) => ValidationResult::Incomplete,
            None if input.matches('"').count() % 2 == 1 => ValidationResult::Incomplete,
            None => ValidationResult::Complete,
        }
    }
}

fn setup_reedline() -> (Reedline, DefaultPrompt) {
    let mut keybindings = default_emacs_keybindings();
    keybindings.add_binding(
        KeyModifiers::ALT,
        KeyCode::Enter,
        ReedlineEvent::Edit(vec![EditCommand::InsertNewline]),
    );
    let edit_mode = Box::new(Emacs::new(keybindings));

    let history = dirs::config_dir()
        .map(|p| p.join("calx/history"))
        .and_then(|p| FileBackedHistory::with_file(10000, p).ok());

    let mut line_editor = Reedline::create()
        .with_highlighter(Box::new(Highlighter::new()))
        .with_validator(Box::new(CalxValidator))
        .with_edit_mode(edit_mode);
    match history {
        Some(h) => line_editor = line_editor.with_history(Box::new(h)),
        None => warn!("Could not open the history file, using in-memory history"),
    }

    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic("  ".into()),
        DefaultPromptSegment::Empty,
    );

    (line_editor, prompt)
}

/// Run the REPL command.
///
/// `x` and `y` start out as the integers 1 and 2; command-line bindings
/// are applied afterwards and may replace them.
pub fn run(args: ReplArgs, no_color: bool) -> CliResult<()> {
    let mut engine = build_engine(&Default::default())?;
    engine.register_variable("x", Shared::new(1 as Integer))?;
    engine.register_variable("y", Shared::new(2 as Integer))?;
    crate::common::engine::bind_all(&mut engine, &args.bindings)?;

    let (mut line_editor, prompt) = setup_reedline();

    let style = Style::new().dimmed();
    println!(
        "calx REPL. {}",
        style.paint("Empty line or Ctrl+D to exit; Ctrl+C to abort entry")
    );

    loop {
        let sig = match line_editor.read_line(&prompt) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Reedline error: {e}");
                return Ok(());
            }
        };

        match sig {
            Signal::Success(buffer) if buffer.trim().is_empty() => {
                println!("Goodbye!");
                return Ok(());
            }
            Signal::Success(buffer) => match interpret_input(&mut engine, &buffer, false) {
                Ok(value) => {
                    if let Some(line) = format_value(&value) {
                        println!("{line}");
                    }
                }
                Err(e) => render(&e, no_color),
            },
            Signal::CtrlD => {
                println!("\nGoodbye!");
                return Ok(());
            }
            Signal::CtrlC => {
                continue;
            }
        }
    }
}
