//! Character-level grammars for identifiers and literals.

pub fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(is_identifier_start) && chars.all(is_identifier_continue)
}

/// Optional sign followed by one or more digits.
pub fn is_integer_literal(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Whether `text` could still grow into a float (or integer) literal.
///
/// A `.` or exponent marker must follow a digit, and each may appear once.
/// The exponent may carry its own sign.
pub fn is_float_prefix(text: &str) -> bool {
    let mut seen_dot = false;
    let mut seen_exp = false;
    let mut last_digit = false;
    let mut prev = None;
    for (i, c) in text.chars().enumerate() {
        let ok = match c {
            '0'..='9' => true,
            '+' | '-' => i == 0 || matches!(prev, Some('e' | 'E')),
            '.' => last_digit && !seen_dot && !seen_exp,
            'e' | 'E' => last_digit && !seen_exp,
            _ => false,
        };
        if !ok {
            return false;
        }
        seen_dot |= c == '.';
        seen_exp |= matches!(c, 'e' | 'E');
        last_digit = c.is_ascii_digit();
        prev = Some(c);
    }
    true
}

/// A complete float literal: `1.5`, `2.`, `3e8`, `6.02e-23`.
pub fn is_float_literal(text: &str) -> bool {
    if !is_float_prefix(text) {
        return false;
    }
    let body = text.strip_prefix(['+', '-']).unwrap_or(text);
    let complete_end = body.ends_with(|c: char| c.is_ascii_digit() || c == '.');
    let mantissa = body.split(['e', 'E']).next().unwrap_or("");
    complete_end && mantissa.bytes().any(|b| b.is_ascii_digit())
}

pub fn is_numeric_literal(text: &str) -> bool {
    is_integer_literal(text) || is_float_literal(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert!(is_identifier("x"));
        assert!(is_identifier("_tmp2"));
        assert!(!is_identifier("2x"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("a-b"));
    }

    #[test]
    fn integers() {
        assert!(is_integer_literal("42"));
        assert!(is_integer_literal("-7"));
        assert!(is_integer_literal("+0"));
        assert!(!is_integer_literal("-"));
        assert!(!is_integer_literal("4.2"));
    }

    #[test]
    fn floats() {
        for ok in ["1.5", "2.", "3e8", "6.02e-23", "1E+5", "-0.5"] {
            assert!(is_float_literal(ok), "{ok}");
        }
        for bad in ["1e", "1e+", ".5", "1..2", "1.2.3", "1e5e5", "1.e5", "e5"] {
            assert!(!is_float_literal(bad), "{bad}");
        }
    }

    #[test]
    fn float_prefixes_allow_incomplete_exponents() {
        assert!(is_float_prefix("1e"));
        assert!(is_float_prefix("1e-"));
        assert!(!is_float_prefix("1e-+"));
        assert!(!is_float_prefix("1-"));
    }
}
