//! Lexer for highlighting and tracking nesting depth in the REPL.

use logos::Logos;

/// Token classes for REPL editing.
///
/// This lexer is not the engine's lexer: it never consults the registry and
/// only needs to be good enough to color a line and count parentheses.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(",")]
    Comma,

    /// Cast target, e.g. the `int` of `(int)`.
    #[token("bool")]
    #[token("int")]
    #[token("float")]
    #[token("string")]
    TypeName,

    #[token("true")]
    #[token("false")]
    Bool,

    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?")]
    Number,

    /// Double quoted string with no embedded quote.
    #[regex(r#""[^"]*""#)]
    Str,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r"[-+*/%<>=!&|^~]+")]
    Operator,
}

/// Calculates the nesting depth of parentheses in the given buffer.
///
/// Returns `Some(depth)` where depth is the net nesting level (≥ 0),
/// or `None` if the buffer contains an unclosed string or an unknown
/// character.
pub fn calculate_depth(buffer: &str) -> Option<usize> {
    let mut depth: isize = 0;

    for token in Token::lexer(buffer) {
        match token {
            Ok(Token::LParen) => depth += 1,
            Ok(Token::RParen) => depth -= 1,
            Ok(_) => {}
            Err(()) => return None,
        }
    }

    Some(depth.max(0) as usize)
}
