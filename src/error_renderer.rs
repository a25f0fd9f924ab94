//! Error rendering using ariadne.
//!
//! Diagnostics are drawn against the expression source with the primary
//! span, any related spans and help notes.

use crate::{Diagnostic, Error, Severity};
use ariadne::{ColorGenerator, IndexType, Label, Report, ReportKind, Source};
use std::io::Write;

/// Character set for rendering error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharSet {
    /// Use Unicode characters for rich visual output.
    #[default]
    Unicode,
    /// Use ASCII-only characters for compatibility.
    Ascii,
}

/// Configuration for error rendering.
#[derive(Debug, Clone)]
pub struct RenderConfig<'a> {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
    /// The filename to display in error messages.
    ///
    /// Falls back to the error's own filename, then to "<input>".
    pub filename: Option<&'a str>,
    /// The character set to use for rendering.
    /// Defaults to Unicode for rich visual output.
    pub charset: CharSet,
}

impl Default for RenderConfig<'_> {
    fn default() -> Self {
        RenderConfig::default()
    }
}

impl RenderConfig<'_> {
    const fn default() -> Self {
        Self {
            color: true,
            filename: None,
            charset: CharSet::Unicode,
        }
    }
}

/// Render an error to stderr using the default config.
///
/// # Example
/// ```no_run
/// use calx::{Engine, EngineOptions, render_error};
///
/// let mut engine = Engine::new(EngineOptions::default());
/// if let Err(e) = engine.compile("1 + true") {
///     render_error(&e);
/// }
/// ```
pub fn render_error(error: &Error) {
    render_error_to(error, &mut std::io::stderr(), &RenderConfig::default()).ok();
}

/// Render an error to a writer with the given configuration.
///
/// # Example
/// ```
/// use calx::{Engine, EngineOptions, RenderConfig, render_error_to};
///
/// let mut engine = Engine::new(EngineOptions::default());
/// let err = engine.compile("(1 + 2").unwrap_err();
///
/// let mut buf = Vec::new();
/// let config = RenderConfig { color: false, ..Default::default() };
/// render_error_to(&err, &mut buf, &config).unwrap();
/// let output = String::from_utf8_lossy(&buf);
/// assert!(output.contains("bracket balance is broken"));
/// ```
pub fn render_error_to(
    error: &Error,
    writer: &mut dyn Write,
    config: &RenderConfig,
) -> std::io::Result<()> {
    let filename = config
        .filename
        .or_else(|| error.filename())
        .unwrap_or("<input>");

    match error {
        Error::Compilation {
            diagnostics,
            source,
            ..
        } => render_diagnostics(source, diagnostics, writer, config, filename),
        Error::Runtime {
            diagnostic, source, ..
        } => render_diagnostics(
            source,
            core::slice::from_ref(diagnostic),
            writer,
            config,
            filename,
        ),
        Error::ResourceExceeded(msg) => {
            writeln!(writer, "Resource limit exceeded: {}", msg)
        }
        Error::Api(msg) => {
            writeln!(writer, "API error: {}", msg)
        }
    }
}

fn render_diagnostics(
    source: &str,
    diagnostics: &[Diagnostic],
    writer: &mut dyn Write,
    config: &RenderConfig,
    filename: &str,
) -> std::io::Result<()> {
    for diag in diagnostics {
        let mut colors = ColorGenerator::new();
        colors.next(); // Skip the first color.

        let kind = match diag.severity {
            Severity::Error => ReportKind::Error,
            Severity::Warning => ReportKind::Warning,
            Severity::Info => ReportKind::Advice,
        };

        let ariadne_charset = match config.charset {
            CharSet::Unicode => ariadne::CharSet::Unicode,
            CharSet::Ascii => ariadne::CharSet::Ascii,
        };
        // Spans are byte offsets into the source.
        let ariadne_config = ariadne::Config::default()
            .with_color(config.color)
            .with_char_set(ariadne_charset)
            .with_index_type(IndexType::Byte);

        let mut report = Report::build(kind, (filename, diag.span.0.clone()))
            .with_message(&diag.message)
            .with_config(ariadne_config);

        if let Some(code) = &diag.code {
            report = report.with_code(code);
        }

        // Primary label with the main error span
        let color = colors.next();
        report = report.with_label(
            Label::new((filename, diag.span.0.clone()))
                .with_message(&diag.message)
                .with_color(color),
        );

        // Related spans, e.g. the two operands of a type mismatch.
        for related in &diag.related {
            let color = colors.next();
            report = report.with_label(
                Label::new((filename, related.span.0.clone()))
                    .with_message(&related.message)
                    .with_color(color),
            );
        }

        for help_msg in &diag.help {
            report = report.with_help(help_msg);
        }

        report
            .finish()
            .write((filename, Source::from(source)), &mut *writer)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Engine, EngineOptions, Integer, Shared};
    use expect_test::{Expect, expect};
    use pretty_assertions::assert_eq;

    const UNICODE_CONFIG: RenderConfig = RenderConfig {
        color: false,
        filename: Some("test.calx"),
        charset: CharSet::Unicode,
    };

    const ASCII_CONFIG: RenderConfig = RenderConfig {
        color: false,
        filename: Some("test.calx"),
        charset: CharSet::Ascii,
    };

    fn render(error: &Error, config: &RenderConfig) -> String {
        let mut buf = Vec::new();
        render_error_to(error, &mut buf, config).unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn render_compile_error(source: &str, config: &RenderConfig) -> String {
        let mut engine = Engine::new(EngineOptions::default());
        match engine.compile(source) {
            Err(e) => render(&e, config),
            Ok(_) => panic!("Expected compilation error for source: {source}"),
        }
    }

    fn check_error(source: &str, config: &RenderConfig, expected: Expect) {
        let output = render_compile_error(source, config);
        expected.assert_eq(&output);
    }

    #[test]
    fn test_unknown_variable_unicode() {
        check_error(
            "foo + 1",
            &UNICODE_CONFIG,
            expect![[r#"
                [E0008] Error: unknown variable foo
                   ╭─[ test.calx:1:1 ]
                   │
                 1 │ foo + 1
                   │ ─┬─  
                   │  ╰─── unknown variable foo
                   │ 
                   │ Help: names must be registered with the engine before compiling
                ───╯
            "#]],
        );
    }

    #[test]
    fn test_unknown_variable_ascii() {
        check_error(
            "foo + 1",
            &ASCII_CONFIG,
            expect![[r#"
                [E0008] Error: unknown variable foo
                   ,-[ test.calx:1:1 ]
                   |
                 1 | foo + 1
                   | ^|^  
                   |  `--- unknown variable foo
                   | 
                   | Help: names must be registered with the engine before compiling
                ---'
            "#]],
        );
    }

    #[test]
    fn test_type_mismatch_shows_both_operands() {
        let output = render_compile_error("1 + \"a\"", &ASCII_CONFIG);
        assert!(output.contains("[E0017]"), "{output}");
        assert!(output.contains("this is int"), "{output}");
        assert!(output.contains("this is string"), "{output}");
        assert!(output.contains("Help: use a cast"), "{output}");
    }

    #[test]
    fn test_non_ascii_source() {
        let output = render_compile_error("\"é\" + bar", &ASCII_CONFIG);
        assert!(output.contains("unknown variable bar"), "{output}");
    }

    #[test]
    fn test_runtime_error() {
        let mut engine = Engine::new(EngineOptions::default());
        engine
            .register_variable("n", Shared::new(0 as Integer))
            .unwrap();
        engine.compile("10 / n").unwrap();
        let err = engine.evaluate().unwrap_err();
        let output = render(&err, &ASCII_CONFIG);
        assert!(output.starts_with("Error: division by zero"), "{output}");
    }

    #[test]
    fn test_filename_falls_back_to_the_error() {
        let mut engine = Engine::new(EngineOptions::default());
        let err = engine.compile("(").unwrap_err().with_filename("rules.calx");
        let config = RenderConfig {
            color: false,
            ..Default::default()
        };
        assert!(render(&err, &config).contains("rules.calx"));
    }

    #[test]
    fn test_api_error_is_plain_text() {
        let err = Error::Api("no compiled expression to evaluate".to_string());
        assert_eq!(
            render(&err, &ASCII_CONFIG),
            "API error: no compiled expression to evaluate\n"
        );
    }

    #[test]
    fn test_render_config_default_charset() {
        let config = RenderConfig::default();
        assert_eq!(config.charset, CharSet::Unicode);
        assert!(config.color);
    }
}
