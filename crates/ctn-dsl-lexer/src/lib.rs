//! Lexical analysis for the CTN DSL.
//!
//! Tokenization of kernel DSL text using logos.
//!
//! # Design
//!
//! - [`Token`] — all token classes: the seven block keywords, the four
//!   structural operators, delimiters, literals, and a distinguished
//!   [`Token::Glyph`] class for the Greek/mathematical symbols the DSL uses
//!   as identifiers and inside free-form expressions
//! - [`tokenize`] — single pass over the source; unrecognized characters
//!   become [`Token::Error`] lexemes carrying the offending text and its
//!   span rather than being dropped, so the parser can report a precise
//!   location
//! - Whitespace and line breaks are skipped; the parser recovers line and
//!   column numbers from byte spans
//!
//! # Examples
//!
//! ```
//! use ctn_dsl_lexer::{tokenize, Token};
//!
//! let lexemes = tokenize("Mode: Analysis");
//! assert_eq!(lexemes[0].token, Token::Ident("Mode".to_string()));
//! assert_eq!(lexemes[1].token, Token::Colon);
//! ```

use logos::Logos;
use std::ops::Range;

/// CTN DSL token.
///
/// The multi-character operators (`←`, `≫`, `⇒`) are atomic tokens with
/// raised priority so they are never absorbed into a [`Token::Glyph`] run.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    // === Block keywords ===
    #[token("CTN_KERNEL_SCHEMA")]
    KernelSchema,
    #[token("SYS_KERNEL_INIT")]
    KernelInit,
    #[token("COGNITIVE_TENSORS")]
    CognitiveTensors,
    #[token("STRATEGIC_SOLVER")]
    StrategicSolver,
    #[token("BOUNDARY_CONTROL")]
    BoundaryControl,
    #[token("DECODER_MANIFOLD")]
    DecoderManifold,
    #[token("SELF_ERASE")]
    SelfErase,

    // === Operators ===
    /// Assignment arrow `←`
    #[token("←", priority = 10)]
    Arrow,
    /// Strict precedence `≫`
    #[token("≫", priority = 10)]
    StrictPrec,
    /// Implication `⇒`
    #[token("⇒", priority = 10)]
    Implies,
    /// Equals `=`
    #[token("=")]
    Eq,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,

    // === Literals ===
    /// Numeric literal (e.g. 0.8, 1000)
    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    /// ASCII identifier (e.g. Auth, Analysis, C_net, v1)
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    /// Greek/mathematical glyph symbol.
    ///
    /// A non-ASCII glyph continued by glyphs, alphanumerics, or underscores
    /// (`Σ_CTN`, `λ₄`, `ℬ_int`, `∞`), or a single ASCII math punctuation
    /// character appearing inside free-form expression text.
    #[regex(r"[^\x00-\x7F]([^\x00-\x7F]|[a-zA-Z0-9_])*", |lex| lex.slice().to_string())]
    #[regex(r"[\\/*+<>|.!?;'^~@$%&#-]", |lex| lex.slice().to_string())]
    Glyph(String),

    /// Unrecognized character, kept in the stream with its position.
    ///
    /// Lowest-priority catch-all: any character no other class claims.
    #[regex(r".", |lex| lex.slice().to_string(), priority = 0)]
    Error(String),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::KernelSchema => f.write_str("CTN_KERNEL_SCHEMA"),
            Token::KernelInit => f.write_str("SYS_KERNEL_INIT"),
            Token::CognitiveTensors => f.write_str("COGNITIVE_TENSORS"),
            Token::StrategicSolver => f.write_str("STRATEGIC_SOLVER"),
            Token::BoundaryControl => f.write_str("BOUNDARY_CONTROL"),
            Token::DecoderManifold => f.write_str("DECODER_MANIFOLD"),
            Token::SelfErase => f.write_str("SELF_ERASE"),
            Token::Arrow => f.write_str("←"),
            Token::StrictPrec => f.write_str("≫"),
            Token::Implies => f.write_str("⇒"),
            Token::Eq => f.write_str("="),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::LBrace => f.write_str("{"),
            Token::RBrace => f.write_str("}"),
            Token::LBracket => f.write_str("["),
            Token::RBracket => f.write_str("]"),
            Token::Comma => f.write_str(","),
            Token::Colon => f.write_str(":"),
            Token::Number(n) => write!(f, "{n}"),
            Token::Ident(s) | Token::Glyph(s) => f.write_str(s),
            Token::Error(s) => write!(f, "unrecognized '{s}'"),
        }
    }
}

/// A token with its byte span in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub token: Token,
    pub span: Range<usize>,
}

impl Lexeme {
    pub fn new(token: Token, span: Range<usize>) -> Self {
        Self { token, span }
    }
}

/// Tokenize DSL source into spanned lexemes.
///
/// Never fails: characters that match no token class are emitted as
/// [`Token::Error`] lexemes so downstream parsing can report them with
/// line/column information.
pub fn tokenize(source: &str) -> Vec<Lexeme> {
    let mut lexer = Token::lexer(source);
    let mut lexemes = Vec::new();

    while let Some(result) = lexer.next() {
        let token = match result {
            Ok(token) => token,
            Err(()) => Token::Error(lexer.slice().to_string()),
        };
        lexemes.push(Lexeme::new(token, lexer.span()));
    }

    lexemes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        tokenize(source).into_iter().map(|l| l.token).collect()
    }

    #[test]
    fn test_block_keywords() {
        let toks = tokens("CTN_KERNEL_SCHEMA SYS_KERNEL_INIT SELF_ERASE");
        assert_eq!(
            toks,
            vec![Token::KernelSchema, Token::KernelInit, Token::SelfErase]
        );
    }

    #[test]
    fn test_operators_are_atomic() {
        let toks = tokens("← ≫ ⇒ =");
        assert_eq!(
            toks,
            vec![Token::Arrow, Token::StrictPrec, Token::Implies, Token::Eq]
        );
    }

    #[test]
    fn test_delimiters() {
        let toks = tokens("( ) { } [ ] , :");
        assert_eq!(
            toks,
            vec![
                Token::LParen,
                Token::RParen,
                Token::LBrace,
                Token::RBrace,
                Token::LBracket,
                Token::RBracket,
                Token::Comma,
                Token::Colon,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let toks = tokens("0.8 1000 0.95");
        assert_eq!(
            toks,
            vec![Token::Number(0.8), Token::Number(1000.0), Token::Number(0.95)]
        );
    }

    #[test]
    fn test_identifiers() {
        let toks = tokens("Auth C_net v1 Internal_Spec");
        assert_eq!(
            toks,
            vec![
                Token::Ident("Auth".to_string()),
                Token::Ident("C_net".to_string()),
                Token::Ident("v1".to_string()),
                Token::Ident("Internal_Spec".to_string()),
            ]
        );
    }

    #[test]
    fn test_glyph_symbols() {
        let toks = tokens("Σ_CTN λ₄ ϑ ℬ_int ∞");
        assert_eq!(
            toks,
            vec![
                Token::Glyph("Σ_CTN".to_string()),
                Token::Glyph("λ₄".to_string()),
                Token::Glyph("ϑ".to_string()),
                Token::Glyph("ℬ_int".to_string()),
                Token::Glyph("∞".to_string()),
            ]
        );
    }

    #[test]
    fn test_ascii_math_punctuation_as_glyphs() {
        let toks = tokens(r"U \ S");
        assert_eq!(
            toks,
            vec![
                Token::Ident("U".to_string()),
                Token::Glyph("\\".to_string()),
                Token::Ident("S".to_string()),
            ]
        );
    }

    #[test]
    fn test_precedence_chain() {
        let toks = tokens("Precedence: ϑ ≫ β ≫ ζ,");
        assert_eq!(
            toks,
            vec![
                Token::Ident("Precedence".to_string()),
                Token::Colon,
                Token::Glyph("ϑ".to_string()),
                Token::StrictPrec,
                Token::Glyph("β".to_string()),
                Token::StrictPrec,
                Token::Glyph("ζ".to_string()),
                Token::Comma,
            ]
        );
    }

    #[test]
    fn test_schema_header_line() {
        let toks = tokens("CTN_KERNEL_SCHEMA(Σ_CTN) ← {");
        assert_eq!(
            toks,
            vec![
                Token::KernelSchema,
                Token::LParen,
                Token::Glyph("Σ_CTN".to_string()),
                Token::RParen,
                Token::Arrow,
                Token::LBrace,
            ]
        );
    }

    #[test]
    fn test_profile_vector_line() {
        let toks = tokens("τ = [0.8, 0.9]");
        assert_eq!(
            toks,
            vec![
                Token::Glyph("τ".to_string()),
                Token::Eq,
                Token::LBracket,
                Token::Number(0.8),
                Token::Comma,
                Token::Number(0.9),
                Token::RBracket,
            ]
        );
    }

    #[test]
    fn test_lambda_infinity_line() {
        let toks = tokens("λ₄ → ∞");
        assert_eq!(
            toks,
            vec![
                Token::Glyph("λ₄".to_string()),
                Token::Glyph("→".to_string()),
                Token::Glyph("∞".to_string()),
            ]
        );
    }

    #[test]
    fn test_unrecognized_char_becomes_error_token() {
        let lexemes = tokenize("Auth: `");
        let last = lexemes.last().unwrap();
        assert_eq!(last.token, Token::Error("`".to_string()));
        assert_eq!(last.span, 6..7);
    }

    #[test]
    fn test_whitespace_and_crlf_skipped() {
        let toks = tokens("Mode:\tAnalysis\r\n");
        assert_eq!(
            toks,
            vec![
                Token::Ident("Mode".to_string()),
                Token::Colon,
                Token::Ident("Analysis".to_string()),
            ]
        );
    }

    #[test]
    fn test_every_char_maps_to_a_token() {
        // No character of a canonical free-form expression is dropped.
        let source = "argmax_{z ∈ U} [ϑ(z) - λ₁·Proj(z, W)]";
        let lexemes = tokenize(source);
        assert!(lexemes.iter().all(|l| !matches!(l.token, Token::Error(_))));
        // Spans cover every non-whitespace byte.
        let covered: usize = lexemes.iter().map(|l| l.span.len()).sum();
        let non_ws: usize = source
            .split_whitespace()
            .map(|w| w.len())
            .sum();
        assert_eq!(covered, non_ws);
    }
}
