//! Token stream wrapper for the hand-written parser.
//!
//! [`TokenStream`] provides lookahead, token expectation, line/column
//! bookkeeping, and the raw-slice helpers that recover free-form expression
//! text from the source between token spans.

use ctn_dsl_lexer::{Lexeme, Token};

use crate::ast::Span;
use crate::error::{ParseError, ParseErrorKind};

/// Byte offsets of line starts, for line/column lookup.
///
/// `starts[0]` is always 0; one extra entry per `\n` in the source.
pub struct LineIndex {
    starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                starts.push(i as u32 + 1);
            }
        }
        Self { starts }
    }

    /// 1-based line and column (in characters) of a byte offset.
    pub fn line_col(&self, source: &str, byte: usize) -> (u32, u32) {
        let line = self.starts.partition_point(|&s| s as usize <= byte);
        let line_start = self.starts[line - 1] as usize;
        let byte = byte.min(source.len());
        let column = source[line_start..byte].chars().count() as u32 + 1;
        (line as u32, column)
    }

    /// Byte offset of the end of the line containing `byte` (the position
    /// of its `\n`, or the end of the source for the last line).
    pub fn line_end(&self, source: &str, byte: usize) -> usize {
        let line = self.starts.partition_point(|&s| s as usize <= byte);
        match self.starts.get(line) {
            Some(&next_start) => next_start as usize - 1,
            None => source.len(),
        }
    }
}

/// Whether a token is one of the seven block keywords.
pub fn is_block_keyword(token: &Token) -> bool {
    matches!(
        token,
        Token::KernelSchema
            | Token::KernelInit
            | Token::CognitiveTensors
            | Token::StrategicSolver
            | Token::BoundaryControl
            | Token::DecoderManifold
            | Token::SelfErase
    )
}

/// Cursor over the lexeme sequence with one token of lookahead.
pub struct TokenStream<'src> {
    source: &'src str,
    lexemes: &'src [Lexeme],
    pos: usize,
    lines: LineIndex,
}

impl<'src> TokenStream<'src> {
    pub fn new(source: &'src str, lexemes: &'src [Lexeme]) -> Self {
        Self {
            source,
            lexemes,
            pos: 0,
            lines: LineIndex::new(source),
        }
    }

    /// Peek at the current token without consuming it.
    pub fn peek(&self) -> Option<&Token> {
        self.lexemes.get(self.pos).map(|l| &l.token)
    }

    /// Advance past the current token.
    pub fn advance(&mut self) -> Option<&Lexeme> {
        let lexeme = self.lexemes.get(self.pos);
        if lexeme.is_some() {
            self.pos += 1;
        }
        lexeme
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.lexemes.len()
    }

    pub fn current_pos(&self) -> usize {
        self.pos
    }

    /// Whether the current token has the same discriminant as `expected`.
    pub fn check(&self, expected: &Token) -> bool {
        matches!(self.peek(), Some(t) if std::mem::discriminant(t) == std::mem::discriminant(expected))
    }

    /// 1-based line/column of a byte offset.
    pub fn line_col(&self, byte: usize) -> (u32, u32) {
        self.lines.line_col(self.source, byte)
    }

    /// Line/column of the current token (or of end of input).
    pub fn current_line_col(&self) -> (u32, u32) {
        let byte = self
            .lexemes
            .get(self.pos)
            .map(|l| l.span.start)
            .unwrap_or(self.source.len());
        self.line_col(byte)
    }

    /// Build an "expected X, found Y" error at the current position.
    pub fn unexpected(&self, expected: &str) -> ParseError {
        let (line, column) = self.current_line_col();
        match self.peek() {
            Some(found) => ParseError::new(
                ParseErrorKind::UnexpectedToken,
                format!("expected {expected}, found '{found}'"),
                line,
                column,
            ),
            None => ParseError::new(
                ParseErrorKind::UnexpectedEof,
                format!("expected {expected}, found end of input"),
                line,
                column,
            ),
        }
    }

    /// Expect a specific token and consume it.
    pub fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if self.check(&expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{expected}'")))
        }
    }

    /// Expect a specific ASCII identifier and consume it.
    pub fn expect_ident(&mut self, name: &str) -> Result<(), ParseError> {
        match self.peek() {
            Some(Token::Ident(s)) if s == name => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(self.unexpected(&format!("'{name}'"))),
        }
    }

    /// Expect a specific glyph symbol and consume it.
    pub fn expect_glyph(&mut self, name: &str) -> Result<(), ParseError> {
        match self.peek() {
            Some(Token::Glyph(s)) if s == name => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(self.unexpected(&format!("'{name}'"))),
        }
    }

    /// Expect a numeric literal and return its value.
    pub fn number(&mut self) -> Result<f64, ParseError> {
        match self.peek() {
            Some(Token::Number(n)) => {
                let n = *n;
                self.pos += 1;
                Ok(n)
            }
            _ => Err(self.unexpected("a number")),
        }
    }

    /// Recover free-form expression text as a raw source slice.
    ///
    /// Consumes tokens until one of `stops` appears at bracket depth 0, an
    /// unbalanced closing delimiter is reached, or the line of the first
    /// consumed token ends. The stop token itself is not consumed. Returns
    /// the source text between the first and last consumed token, which
    /// preserves interior spacing exactly.
    pub fn raw_until(&mut self, stops: &[Token]) -> String {
        let mut depth = 0usize;
        let mut first: Option<usize> = None;
        let mut last = 0usize;
        let mut eol = usize::MAX;

        while let Some(lexeme) = self.lexemes.get(self.pos) {
            if lexeme.span.start >= eol {
                break;
            }
            let token = &lexeme.token;
            if depth == 0
                && stops
                    .iter()
                    .any(|s| std::mem::discriminant(s) == std::mem::discriminant(token))
            {
                break;
            }
            match token {
                Token::LParen | Token::LBrace | Token::LBracket => depth += 1,
                Token::RParen | Token::RBrace | Token::RBracket => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            if first.is_none() {
                first = Some(lexeme.span.start);
                eol = self.lines.line_end(self.source, lexeme.span.start);
            }
            last = lexeme.span.end;
            self.pos += 1;
        }

        match first {
            Some(f) => self.source[f..last].to_string(),
            None => String::new(),
        }
    }

    /// Consume the remainder of the line of the last consumed token and
    /// return it as raw text. Empty if nothing else is on that line.
    pub fn rest_of_line(&mut self) -> String {
        let anchor = if self.pos > 0 {
            self.lexemes[self.pos - 1].span.end
        } else {
            0
        };
        let eol = self.lines.line_end(self.source, anchor);

        let mut first: Option<usize> = None;
        let mut last = anchor;
        while let Some(lexeme) = self.lexemes.get(self.pos) {
            if lexeme.span.start >= eol {
                break;
            }
            first.get_or_insert(lexeme.span.start);
            last = lexeme.span.end;
            self.pos += 1;
        }

        match first {
            Some(f) => self.source[f..last].to_string(),
            None => String::new(),
        }
    }

    /// Consume the whole line of the *next* token and return it as raw
    /// text. Returns empty without consuming anything if the next token is
    /// a block keyword (the line belongs to the next block).
    pub fn next_line_text(&mut self) -> String {
        match self.peek() {
            None => String::new(),
            Some(token) if is_block_keyword(token) => String::new(),
            Some(_) => {
                let start = self.lexemes[self.pos].span.start;
                let eol = self.lines.line_end(self.source, start);
                let mut last = start;
                while let Some(lexeme) = self.lexemes.get(self.pos) {
                    if lexeme.span.start >= eol {
                        break;
                    }
                    last = lexeme.span.end;
                    self.pos += 1;
                }
                self.source[start..last].to_string()
            }
        }
    }

    /// Skip forward to the next block keyword (consuming at least one
    /// token), so parsing can continue after a block-level error.
    pub fn synchronize(&mut self) {
        self.advance();
        while let Some(token) = self.peek() {
            if is_block_keyword(token) {
                break;
            }
            self.pos += 1;
        }
    }

    /// Span from the lexeme at `start` through the last consumed lexeme.
    pub fn span_from(&self, start: usize) -> Span {
        let start_byte = self
            .lexemes
            .get(start)
            .map(|l| l.span.start)
            .unwrap_or(self.source.len());
        let end_byte = if self.pos > 0 {
            self.lexemes
                .get(self.pos - 1)
                .map(|l| l.span.end)
                .unwrap_or(start_byte)
        } else {
            start_byte
        };
        let (line, _) = self.line_col(start_byte);
        Span::new(start_byte as u32, end_byte.max(start_byte) as u32, line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctn_dsl_lexer::tokenize;

    fn stream_of(source: &str) -> (Vec<Lexeme>, String) {
        (tokenize(source), source.to_string())
    }

    #[test]
    fn test_line_index() {
        let source = "abc\ndef\nghi";
        let lines = LineIndex::new(source);
        assert_eq!(lines.line_col(source, 0), (1, 1));
        assert_eq!(lines.line_col(source, 4), (2, 1));
        assert_eq!(lines.line_col(source, 6), (2, 3));
        assert_eq!(lines.line_end(source, 0), 3);
        assert_eq!(lines.line_end(source, 9), 11);
    }

    #[test]
    fn test_line_col_counts_characters_not_bytes() {
        let source = "ℬ_int x";
        let lines = LineIndex::new(source);
        // 'x' is the 7th character but starts at byte 8.
        assert_eq!(lines.line_col(source, 8), (1, 7));
    }

    #[test]
    fn test_expect_and_check() {
        let (lexemes, source) = stream_of("Auth: x");
        let mut stream = TokenStream::new(&source, &lexemes);
        stream.expect_ident("Auth").unwrap();
        assert!(stream.check(&Token::Colon));
        stream.expect(Token::Colon).unwrap();
        let err = stream.expect(Token::Comma).unwrap_err();
        assert!(err.message.contains("expected ','"));
    }

    #[test]
    fn test_raw_until_stops_at_depth_zero() {
        let (lexemes, source) = stream_of("ϑ(Truth): rest");
        let mut stream = TokenStream::new(&source, &lexemes);
        let key = stream.raw_until(&[Token::Colon]);
        assert_eq!(key, "ϑ(Truth)");
        assert!(stream.check(&Token::Colon));
    }

    #[test]
    fn test_raw_until_preserves_interior_spacing() {
        let (lexemes, source) = stream_of("argmax_{z ∈ U} [ϑ(z) - λ₁·Proj(z, W)],");
        let mut stream = TokenStream::new(&source, &lexemes);
        let text = stream.raw_until(&[Token::Comma]);
        assert_eq!(text, "argmax_{z ∈ U} [ϑ(z) - λ₁·Proj(z, W)]");
    }

    #[test]
    fn test_raw_until_stops_at_unbalanced_closer() {
        let (lexemes, source) = stream_of("Leak(ℓ) }");
        let mut stream = TokenStream::new(&source, &lexemes);
        let text = stream.raw_until(&[Token::Comma]);
        assert_eq!(text, "Leak(ℓ)");
        assert!(stream.check(&Token::RBrace));
    }

    #[test]
    fn test_raw_until_stops_at_end_of_line() {
        let (lexemes, source) = stream_of("first line\nsecond");
        let mut stream = TokenStream::new(&source, &lexemes);
        let text = stream.raw_until(&[Token::Comma]);
        assert_eq!(text, "first line");
    }

    #[test]
    fn test_rest_of_line() {
        let (lexemes, source) = stream_of("Invariant: ℬ_int ∩ Output = ∅\nnext");
        let mut stream = TokenStream::new(&source, &lexemes);
        stream.expect_ident("Invariant").unwrap();
        stream.expect(Token::Colon).unwrap();
        assert_eq!(stream.rest_of_line(), "ℬ_int ∩ Output = ∅");
        assert_eq!(stream.peek(), Some(&Token::Ident("next".to_string())));
    }

    #[test]
    fn test_rest_of_line_empty_when_line_exhausted() {
        let (lexemes, source) = stream_of("Enforcement:\nnext");
        let mut stream = TokenStream::new(&source, &lexemes);
        stream.expect_ident("Enforcement").unwrap();
        stream.expect(Token::Colon).unwrap();
        assert_eq!(stream.rest_of_line(), "");
    }

    #[test]
    fn test_next_line_text_guards_block_keywords() {
        let (lexemes, source) = stream_of("BOUNDARY_CONTROL(ζ):");
        let mut stream = TokenStream::new(&source, &lexemes);
        assert_eq!(stream.next_line_text(), "");
        assert!(stream.check(&Token::BoundaryControl));
    }

    #[test]
    fn test_synchronize_skips_to_block_keyword() {
        let (lexemes, source) = stream_of("garbage tokens here STRATEGIC_SOLVER");
        let mut stream = TokenStream::new(&source, &lexemes);
        stream.synchronize();
        assert!(stream.check(&Token::StrategicSolver));
    }
}
