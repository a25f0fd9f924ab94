//! Splits source text into lexemes.
//!
//! Operators are matched against the registry's operator table by growing a
//! candidate one character at a time and backtracking to the longest full
//! match, so `<<x` yields `<<` and `x` even though `<<=` shares the prefix.
//! Anything else is an identifier, a numeric literal or a string literal.

pub mod grammar;
mod lexeme;

pub use lexeme::{FunctionCallRef, Lexeme, LexemeKind, ListId, OperatorLexeme};

use tracing::{debug, trace};

use crate::diagnostics::{CompileError, CompileErrorKind};
use crate::registry::Registry;
use crate::syntax::Span;
use crate::values::{Integer, Value};
use grammar::{
    is_float_prefix, is_identifier_continue, is_identifier_start, is_integer_literal,
    is_numeric_literal,
};

/// Tokenizes `source`. A NUL character ends the input.
pub fn tokenize(registry: &Registry, source: &str) -> Result<Vec<Lexeme>, CompileError> {
    let lexemes = Lexer::new(registry, source).run()?;
    debug!(count = lexemes.len(), "Tokenized expression");
    Ok(lexemes)
}

struct Lexer<'r, 's> {
    registry: &'r Registry,
    source: &'s str,
    chars: Vec<(usize, char)>,
    /// Byte offset where input ends.
    limit: usize,
    index: usize,
    lexemes: Vec<Lexeme>,
}

impl<'r, 's> Lexer<'r, 's> {
    fn new(registry: &'r Registry, source: &'s str) -> Self {
        let limit = source.find('\0').unwrap_or(source.len());
        let chars = source[..limit].char_indices().collect();
        Self {
            registry,
            source,
            chars,
            limit,
            index: 0,
            lexemes: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Lexeme>, CompileError> {
        while let Some(&(_, c)) = self.chars.get(self.index) {
            if matches!(c, ' ' | '\t' | '\r' | '\n') {
                self.index += 1;
                continue;
            }
            if let Some(end) = self.scan_operator() {
                self.push_operator(end)?;
            } else if is_identifier_start(c) {
                self.scan_identifier();
            } else if c == '"' {
                self.scan_string()?;
            } else if c.is_ascii_digit() {
                self.scan_number()?;
            } else {
                return Err(CompileError::new(
                    CompileErrorKind::UnexpectedCharacter(c),
                    self.span(self.index, self.index + 1),
                ));
            }
        }
        Ok(self.lexemes)
    }

    /// Byte offset of the char at `index`, or the input end.
    fn offset(&self, index: usize) -> usize {
        self.chars.get(index).map_or(self.limit, |&(offset, _)| offset)
    }

    fn span(&self, start: usize, end: usize) -> Span {
        Span::new(self.offset(start), self.offset(end))
    }

    fn slice(&self, start: usize, end: usize) -> &'s str {
        &self.source[self.offset(start)..self.offset(end)]
    }

    fn push(&mut self, start: usize, end: usize, kind: LexemeKind) {
        let lexeme = Lexeme::new(
            self.slice(start, end),
            self.span(start, end),
            self.lexemes.len(),
            kind,
        );
        trace!(text = %lexeme.text, pos = lexeme.pos, "Lexeme");
        self.lexemes.push(lexeme);
        self.index = end;
    }

    /// Returns the end of the longest operator starting here, if any.
    fn scan_operator(&self) -> Option<usize> {
        let start = self.index;
        let mut best = None;
        let mut end = start;
        while end < self.chars.len() {
            end += 1;
            let info = self.registry.count_operator_matches(self.slice(start, end));
            match info.count {
                0 => return best,
                1 if info.full_match => return Some(end),
                _ if info.full_match => best = Some(end),
                _ => {}
            }
        }
        best
    }

    fn push_operator(&mut self, end: usize) -> Result<(), CompileError> {
        let text = self.slice(self.index, end);
        let info = self.registry.operator(text).copied().ok_or_else(|| {
            CompileError::new(
                CompileErrorKind::UnexpectedToken(text.to_string()),
                self.span(self.index, end),
            )
        })?;
        self.push(
            self.index,
            end,
            LexemeKind::Operator(OperatorLexeme::new(info)),
        );
        Ok(())
    }

    fn scan_identifier(&mut self) {
        let start = self.index;
        let end = self.scan_while(start + 1, is_identifier_continue);
        let kind = match self.slice(start, end) {
            "true" => LexemeKind::Constant(Value::Bool(true)),
            "false" => LexemeKind::Constant(Value::Bool(false)),
            _ => LexemeKind::Unprocessed,
        };
        self.push(start, end, kind);
    }

    fn scan_while(&self, mut end: usize, pred: impl Fn(char) -> bool) -> usize {
        while self.chars.get(end).is_some_and(|&(_, c)| pred(c)) {
            end += 1;
        }
        end
    }

    fn scan_string(&mut self) -> Result<(), CompileError> {
        let start = self.index;
        let close = (start + 1..self.chars.len()).find(|&i| self.chars[i].1 == '"');
        let Some(close) = close else {
            return Err(CompileError::new(
                CompileErrorKind::UnterminatedString,
                self.span(start, self.chars.len()),
            ));
        };
        let value = Value::Str(self.slice(start + 1, close).to_string());
        self.push(start, close + 1, LexemeKind::Constant(value));
        Ok(())
    }

    /// Grows the literal while it remains a valid prefix, then backs off to
    /// the longest complete literal.
    fn scan_number(&mut self) -> Result<(), CompileError> {
        let start = self.index;
        let mut best = start;
        let mut end = start;
        while end < self.chars.len() && is_float_prefix(self.slice(start, end + 1)) {
            end += 1;
            if is_numeric_literal(self.slice(start, end)) {
                best = end;
            }
        }
        let text = self.slice(start, best);
        let value = if is_integer_literal(text) {
            text.parse::<Integer>().map(Value::Int).map_err(|_| {
                CompileErrorKind::LiteralOutOfRange(text.to_string())
            })
        } else {
            text.parse().map(Value::Float).map_err(|_| {
                CompileErrorKind::InvalidLiteral(text.to_string())
            })
        }
        .map_err(|kind| CompileError::new(kind, self.span(start, best)))?;
        self.push(start, best, LexemeKind::Constant(value));
        Ok(())
    }
}

#[cfg(test)]
mod lexer_test;
