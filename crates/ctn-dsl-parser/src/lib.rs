//! Recursive descent parser for CTN kernel DSL text.
//!
//! Turns a kernel document back into a [`KernelAst`] (and from there a
//! `CtnKernel` value via [`KernelAst::into_kernel`]), so that compiled text
//! can be verified, diffed, and re-compiled.
//!
//! # Design
//!
//! The grammar is positional and shallow: one schema header, then six inner
//! blocks in registry order, with no nesting beyond a block's own
//! delimiters. The parser is therefore a plain recursive descent over the
//! token stream, with single-token lookahead and no backtracking.
//!
//! Structural syntax (keywords, delimiters, `←`, `≫`, `=`) is matched token
//! by token. Free-form mathematical expressions (the solver target, the
//! boundary clauses, the decoder objective, and friends) are not given a
//! grammar at all: they are recovered verbatim as raw source slices between
//! token spans, delimited by bracket depth and line boundaries. This is
//! what makes parsing lossless for expression text the kernel model treats
//! as opaque strings.
//!
//! Errors are collected, not thrown: each carries a 1-based line and
//! column, and after a failed block the parser resynchronizes at the next
//! block keyword so the remaining blocks are still checked.

mod ast;
mod blocks;
mod error;
mod stream;

pub use ast::{BlockNode, KernelAst, SchemaNode, Span, VectorLine};
pub use error::{ParseError, ParseErrorKind};
pub use stream::TokenStream;

use ctn_dsl_lexer::{tokenize, Token};

/// Parse a kernel document.
///
/// Tokenizer error tokens are reported as [`ParseErrorKind::Lex`] errors
/// alongside any grammar errors; `Ok` is returned only for a document with
/// no errors of either kind.
pub fn parse(source: &str) -> Result<KernelAst, Vec<ParseError>> {
    let lexemes = tokenize(source);
    let mut stream = TokenStream::new(source, &lexemes);

    let mut errors: Vec<ParseError> = lexemes
        .iter()
        .filter_map(|lexeme| match &lexeme.token {
            Token::Error(slice) => {
                let (line, column) = stream.line_col(lexeme.span.start);
                Some(ParseError::lex(slice, line, column))
            }
            _ => None,
        })
        .collect();

    match blocks::parse_kernel(&mut stream) {
        Ok(ast) if errors.is_empty() => Ok(ast),
        Ok(_) => Err(errors),
        Err(mut parse_errors) => {
            errors.append(&mut parse_errors);
            Err(errors)
        }
    }
}
