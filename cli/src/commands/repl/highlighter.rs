//! Syntax highlighter for the REPL.

use logos::Logos;
use nu_ansi_term::{Color, Style};
use reedline::StyledText;

use super::lexer::Token;

fn style_for(token: Result<Token, ()>) -> Style {
    let fg = match token {
        Ok(Token::Bool | Token::Number) => Color::Cyan,
        Ok(Token::Str) => Color::Green,
        Ok(Token::TypeName) => Color::Yellow,
        Ok(Token::Ident) => Color::Red,
        Ok(Token::Operator | Token::LParen | Token::RParen | Token::Comma) => Color::White,
        Err(()) => return Style::new().fg(Color::White).on(Color::Rgb(0x80, 0x22, 0x3e)),
    };
    Style::new().fg(fg)
}

#[derive(Debug, Default)]
pub struct Highlighter;

impl Highlighter {
    pub fn new() -> Self {
        Self
    }
}

impl reedline::Highlighter for Highlighter {
    fn highlight(&self, line: &str, _: usize) -> StyledText {
        let mut output = StyledText::new();
        let plain = Style::new().fg(Color::White);
        let mut curr_end = 0;

        for (token, span) in Token::lexer(line).spanned() {
            if span.start > curr_end {
                output.push((plain, line[curr_end..span.start].to_string()));
            }
            output.push((style_for(token), line[span.clone()].to_string()));
            curr_end = span.end;
        }
        if curr_end < line.len() {
            output.push((plain, line[curr_end..].to_string()));
        }

        output
    }
}
