//! Per-block parse functions.
//!
//! The kernel grammar is positional: the schema header comes first and the
//! six inner blocks follow in registry order. Each block parser consumes
//! exactly its own block; the driver in [`parse_kernel`] checks the order,
//! reports a [`ParseErrorKind::BlockOrder`] error for any misplaced or
//! missing block, and resynchronizes at the next block keyword so one bad
//! block does not mask errors in the rest of the source.
//!
//! Structural punctuation (keywords, delimiters, `←`, `≫`, `=`) is matched
//! token by token; free-form expression fields (auth, solver target,
//! boundary clauses, decoder objective) are recovered as raw source slices
//! via [`TokenStream::raw_until`] and [`TokenStream::rest_of_line`], which
//! preserves their text exactly.

use std::str::FromStr;

use ctn_dsl_lexer::Token;
use ctn_kernel_types::{
    BlockKind, BoundaryParams, DecoderParams, InitParams, LeakPenalty, Precedence, SolverMode,
    SolverParams, TraitProfile, BLOCK_ORDER,
};

use crate::ast::{BlockNode, KernelAst, SchemaNode, VectorLine};
use crate::error::{ParseError, ParseErrorKind};
use crate::stream::TokenStream;

fn keyword_token(kind: BlockKind) -> Token {
    match kind {
        BlockKind::Schema => Token::KernelSchema,
        BlockKind::Init => Token::KernelInit,
        BlockKind::Tensors => Token::CognitiveTensors,
        BlockKind::Solver => Token::StrategicSolver,
        BlockKind::Boundary => Token::BoundaryControl,
        BlockKind::Decoder => Token::DecoderManifold,
        BlockKind::SelfErase => Token::SelfErase,
    }
}

/// Parse a whole kernel document.
///
/// Collects every error it can recover from rather than stopping at the
/// first one; returns `Ok` only when no error was recorded.
pub fn parse_kernel(stream: &mut TokenStream) -> Result<KernelAst, Vec<ParseError>> {
    let mut errors = Vec::new();

    let schema = match parse_schema(stream) {
        Ok(node) => Some(node),
        Err(err) => {
            errors.push(err);
            stream.synchronize();
            None
        }
    };

    let mut blocks = Vec::new();
    for kind in &BLOCK_ORDER[1..] {
        if stream.check(&keyword_token(*kind)) {
            match parse_block(stream, *kind) {
                Ok(node) => blocks.push(node),
                Err(err) => {
                    errors.push(err);
                    stream.synchronize();
                }
            }
        } else {
            // Do not consume: the current token may open a later block.
            let (line, column) = stream.current_line_col();
            errors.push(ParseError::new(
                ParseErrorKind::BlockOrder,
                format!("misplaced or missing block: expected {}", kind.keyword()),
                line,
                column,
            ));
        }
    }

    if !stream.at_end() {
        errors.push(stream.unexpected("end of input"));
    }

    match (errors.is_empty(), schema) {
        (true, Some(schema)) => Ok(KernelAst { schema, blocks }),
        _ => Err(errors),
    }
}

fn parse_block(stream: &mut TokenStream, kind: BlockKind) -> Result<BlockNode, ParseError> {
    match kind {
        BlockKind::Schema => unreachable!("schema header is parsed separately"),
        BlockKind::Init => parse_init(stream),
        BlockKind::Tensors => parse_tensors(stream),
        BlockKind::Solver => parse_solver(stream),
        BlockKind::Boundary => parse_boundary(stream),
        BlockKind::Decoder => parse_decoder(stream),
        BlockKind::SelfErase => parse_self_erase(stream),
    }
}

/// `CTN_KERNEL_SCHEMA(id) ← { ref, ref, ..., SELF_ERASE }`
///
/// The reference list must name the six inner blocks in registry order.
fn parse_schema(stream: &mut TokenStream) -> Result<SchemaNode, ParseError> {
    let start = stream.current_pos();
    stream.expect(Token::KernelSchema)?;
    stream.expect(Token::LParen)?;
    let id = stream.raw_until(&[Token::RParen]);
    stream.expect(Token::RParen)?;
    stream.expect(Token::Arrow)?;
    stream.expect(Token::LBrace)?;

    let mut block_refs = Vec::with_capacity(BLOCK_ORDER.len() - 1);
    for (i, kind) in BLOCK_ORDER[1..].iter().enumerate() {
        stream.expect(keyword_token(*kind))?;
        // SELF_ERASE is referenced bare, the others carry their symbol.
        if stream.check(&Token::LParen) {
            stream.expect(Token::LParen)?;
            stream.raw_until(&[Token::RParen]);
            stream.expect(Token::RParen)?;
        }
        block_refs.push(*kind);
        if i + 1 < BLOCK_ORDER.len() - 1 {
            stream.expect(Token::Comma)?;
        }
    }

    stream.expect(Token::RBrace)?;
    Ok(SchemaNode {
        id,
        block_refs,
        span: stream.span_from(start),
    })
}

/// `SYS_KERNEL_INIT(Ψ_global) ← { Auth: ..., Filter: ..., Precedence: a ≫ b ≫ c, key: { value }, ... }`
fn parse_init(stream: &mut TokenStream) -> Result<BlockNode, ParseError> {
    let start = stream.current_pos();
    stream.expect(Token::KernelInit)?;
    stream.expect(Token::LParen)?;
    stream.expect_glyph("Ψ_global")?;
    stream.expect(Token::RParen)?;
    stream.expect(Token::Arrow)?;
    stream.expect(Token::LBrace)?;

    stream.expect_ident("Auth")?;
    stream.expect(Token::Colon)?;
    let auth = stream.raw_until(&[Token::Comma]);
    stream.expect(Token::Comma)?;

    stream.expect_ident("Filter")?;
    stream.expect(Token::Colon)?;
    let filter = stream.raw_until(&[Token::Comma]);
    stream.expect(Token::Comma)?;

    stream.expect_ident("Precedence")?;
    stream.expect(Token::Colon)?;
    let primary = stream.raw_until(&[Token::StrictPrec, Token::Comma]);
    stream.expect(Token::StrictPrec)?;
    let secondary = stream.raw_until(&[Token::StrictPrec, Token::Comma]);
    stream.expect(Token::StrictPrec)?;
    let tertiary = stream.raw_until(&[Token::Comma]);

    let mut objectives = indexmap::IndexMap::new();
    while stream.check(&Token::Comma) {
        stream.expect(Token::Comma)?;
        let key = stream.raw_until(&[Token::Colon]);
        stream.expect(Token::Colon)?;
        stream.expect(Token::LBrace)?;
        let value = stream.raw_until(&[Token::RBrace]);
        stream.expect(Token::RBrace)?;
        objectives.insert(key, value);
    }

    stream.expect(Token::RBrace)?;
    Ok(BlockNode::Init {
        params: InitParams {
            auth,
            filter,
            precedence: Precedence {
                primary,
                secondary,
                tertiary,
            },
            objectives,
        },
        span: stream.span_from(start),
    })
}

/// `COGNITIVE_TENSORS(U): τ = [w, ...]` followed by the `C_net` line and the
/// nine per-vector reference lines.
fn parse_tensors(stream: &mut TokenStream) -> Result<BlockNode, ParseError> {
    let start = stream.current_pos();
    stream.expect(Token::CognitiveTensors)?;
    stream.expect(Token::LParen)?;
    stream.expect_ident("U")?;
    stream.expect(Token::RParen)?;
    stream.expect(Token::Colon)?;

    stream.expect_glyph("τ")?;
    let (tau_line, tau_column) = stream.current_line_col();
    stream.expect(Token::Eq)?;
    stream.expect(Token::LBracket)?;
    let mut weights = Vec::with_capacity(9);
    if !stream.check(&Token::RBracket) {
        loop {
            weights.push(stream.number()?);
            if stream.check(&Token::Comma) {
                stream.expect(Token::Comma)?;
            } else {
                break;
            }
        }
    }
    stream.expect(Token::RBracket)?;
    let profile = TraitProfile::from_slice(&weights).map_err(|e| {
        ParseError::new(
            ParseErrorKind::InvalidSyntax,
            format!("trait profile τ must have 9 weights, found {}", e.len),
            tau_line,
            tau_column,
        )
    })?;

    // The aggregation line is fixed text; its content is not modeled.
    stream.expect_ident("C_net")?;
    stream.expect(Token::Eq)?;
    stream.rest_of_line();

    let mut vector_lines = Vec::with_capacity(9);
    for id in 1u8..=9 {
        stream.expect_ident(&format!("v{id}"))?;
        stream.expect(Token::Eq)?;
        stream.expect(Token::LBrace)?;
        let limit_expression = stream.raw_until(&[Token::Comma]);
        stream.expect(Token::Comma)?;
        let name = stream.raw_until(&[Token::RBrace]);
        stream.expect(Token::RBrace)?;
        vector_lines.push(VectorLine {
            id,
            limit_expression,
            name,
        });
    }

    Ok(BlockNode::Tensors {
        profile,
        vector_lines,
        span: stream.span_from(start),
    })
}

/// `STRATEGIC_SOLVER(Ω): Mode: ..., z* = ..., optional null-check line.`
fn parse_solver(stream: &mut TokenStream) -> Result<BlockNode, ParseError> {
    let start = stream.current_pos();
    stream.expect(Token::StrategicSolver)?;
    stream.expect(Token::LParen)?;
    stream.expect_glyph("Ω")?;
    stream.expect(Token::RParen)?;
    stream.expect(Token::Colon)?;

    stream.expect_ident("Mode")?;
    stream.expect(Token::Colon)?;
    let (mode_line, mode_column) = stream.current_line_col();
    let mode = match stream.peek() {
        Some(Token::Ident(name)) => SolverMode::from_str(name).map_err(|msg| {
            ParseError::new(ParseErrorKind::InvalidSyntax, msg, mode_line, mode_column)
        })?,
        _ => return Err(stream.unexpected("a solver mode")),
    };
    stream.advance();

    stream.expect_ident("z")?;
    stream.expect_glyph("*")?;
    stream.expect(Token::Eq)?;
    let target = stream.rest_of_line();

    // Anything left of the block is the null-assumption line; it may be
    // absent entirely.
    let null_check = stream.next_line_text();

    Ok(BlockNode::Solver {
        params: SolverParams {
            mode,
            target,
            null_check,
        },
        span: stream.span_from(start),
    })
}

/// Parse a brace-delimited symbol set, `{ a, b, c }` or `{ }`.
fn parse_symbol_set(stream: &mut TokenStream) -> Result<Vec<String>, ParseError> {
    stream.expect(Token::LBrace)?;
    let mut elements = Vec::new();
    loop {
        let element = stream.raw_until(&[Token::Comma, Token::RBrace]);
        if !element.is_empty() {
            elements.push(element);
        }
        if stream.check(&Token::Comma) {
            stream.expect(Token::Comma)?;
        } else {
            break;
        }
    }
    stream.expect(Token::RBrace)?;
    Ok(elements)
}

/// `BOUNDARY_CONTROL(ζ):` with the two symbol sets and three clause lines.
fn parse_boundary(stream: &mut TokenStream) -> Result<BlockNode, ParseError> {
    let start = stream.current_pos();
    stream.expect(Token::BoundaryControl)?;
    stream.expect(Token::LParen)?;
    stream.expect_glyph("ζ")?;
    stream.expect(Token::RParen)?;
    stream.expect(Token::Colon)?;

    stream.expect_glyph("ℬ_int")?;
    stream.expect(Token::Eq)?;
    let internal_set = parse_symbol_set(stream)?;

    stream.expect_glyph("ℬ_ext")?;
    stream.expect(Token::Eq)?;
    let external_set = parse_symbol_set(stream)?;

    stream.expect_ident("Invariant")?;
    stream.expect(Token::Colon)?;
    let invariant = stream.rest_of_line();

    stream.expect_ident("Enforcement")?;
    stream.expect(Token::Colon)?;
    let enforcement = stream.rest_of_line();

    stream.expect_ident("Violation")?;
    stream.expect(Token::Colon)?;
    let violation = stream.rest_of_line();

    Ok(BlockNode::Boundary {
        params: BoundaryParams {
            internal_set,
            external_set,
            invariant,
            enforcement,
            violation,
        },
        span: stream.span_from(start),
    })
}

/// `DECODER_MANIFOLD(D):` with the emission objective and the λ line.
///
/// The leak penalty accepts either `λ₄ → ∞` (unbounded) or `λ₄ = n`.
fn parse_decoder(stream: &mut TokenStream) -> Result<BlockNode, ParseError> {
    let start = stream.current_pos();
    stream.expect(Token::DecoderManifold)?;
    stream.expect(Token::LParen)?;
    stream.expect_ident("D")?;
    stream.expect(Token::RParen)?;
    stream.expect(Token::Colon)?;

    stream.expect_glyph("ℓ")?;
    stream.expect_glyph("*")?;
    stream.expect(Token::Eq)?;
    let objective = stream.rest_of_line();

    stream.expect_glyph("λ₁")?;
    stream.expect(Token::Eq)?;
    let lambda1 = stream.number()?;
    stream.expect(Token::Comma)?;
    stream.expect_glyph("λ₂")?;
    stream.expect(Token::Eq)?;
    let lambda2 = stream.number()?;
    stream.expect(Token::Comma)?;
    stream.expect_glyph("λ₃")?;
    stream.expect(Token::Eq)?;
    let lambda3 = stream.number()?;
    stream.expect(Token::Comma)?;
    stream.expect_glyph("λ₄")?;
    let lambda4 = if stream.check(&Token::Eq) {
        stream.expect(Token::Eq)?;
        LeakPenalty::Finite(stream.number()?)
    } else {
        stream.expect_glyph("→")?;
        stream.expect_glyph("∞")?;
        LeakPenalty::Unbounded
    };

    Ok(BlockNode::Decoder {
        params: DecoderParams {
            objective,
            lambda1,
            lambda2,
            lambda3,
            lambda4,
        },
        span: stream.span_from(start),
    })
}

/// `SELF_ERASE:` followed by the discard directive.
fn parse_self_erase(stream: &mut TokenStream) -> Result<BlockNode, ParseError> {
    let start = stream.current_pos();
    stream.expect(Token::SelfErase)?;
    stream.expect(Token::Colon)?;
    stream.expect_ident("Discard")?;
    stream.expect(Token::LParen)?;
    stream.raw_until(&[Token::RParen]);
    stream.expect(Token::RParen)?;

    Ok(BlockNode::SelfErase {
        span: stream.span_from(start),
    })
}
