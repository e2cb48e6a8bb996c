//! Parse error types.

use thiserror::Error;

/// Parse error with source location.
///
/// Every parse failure is reported as data with a 1-based line and column;
/// the parser never panics on malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {line}:{column}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub line: u32,
    pub column: u32,
}

/// Category of parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A specific token was expected but a different one was found.
    UnexpectedToken,

    /// End of input reached while a construct was incomplete.
    UnexpectedEof,

    /// Tokens are present but violate the kernel grammar (e.g. a trait
    /// profile with the wrong number of weights).
    InvalidSyntax,

    /// A block appeared out of canonical order, or a required block is
    /// missing. Blocks are never silently reordered.
    BlockOrder,

    /// An unrecognized character reported by the tokenizer.
    Lex,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, message: String, line: u32, column: u32) -> Self {
        Self {
            kind,
            message,
            line,
            column,
        }
    }

    /// Error for a tokenizer error token.
    pub fn lex(slice: &str, line: u32, column: u32) -> Self {
        Self::new(
            ParseErrorKind::Lex,
            format!("unrecognized character '{slice}'"),
            line,
            column,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_location() {
        let err = ParseError::new(
            ParseErrorKind::UnexpectedToken,
            "expected ',', found '}'".to_string(),
            3,
            14,
        );
        assert_eq!(err.to_string(), "expected ',', found '}' at 3:14");
    }

    #[test]
    fn test_lex_error_names_character() {
        let err = ParseError::lex("`", 1, 7);
        assert_eq!(err.kind, ParseErrorKind::Lex);
        assert!(err.message.contains('`'));
    }
}
