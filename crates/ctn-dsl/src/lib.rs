//! CTN kernel DSL: model, compiler, validator, and parser.
//!
//! A kernel is a typed configuration value ([`CtnKernel`]): one schema
//! identifier plus six inner blocks drawn from a fixed registry. This crate
//! ties the pipeline together:
//!
//! - [`compile`] renders a kernel to canonical DSL text, deterministically.
//! - [`validate`] reports structural errors, warnings, and the three
//!   kernel invariants without refusing anything.
//! - [`parse`] reads DSL text back into a kernel, so for any valid kernel
//!   `parse(compile(k)) == k`.
//!
//! The tokenizer and parser live in their own crates
//! (`ctn-dsl-lexer`, `ctn-dsl-parser`) and are re-exported here.

pub mod compiler;
pub mod invariants;
pub mod validator;

pub use compiler::{compile, CompileError, CompileOptions};
pub use invariants::{
    check_all, check_epistemic_anchor, check_null_assumption, check_syntax_firewall,
    is_well_formed, InvariantResult,
};
pub use validator::{validate, ValidationError, ValidationReport, ValidationWarning};

pub use ctn_dsl_lexer::{tokenize, Lexeme, Token};
pub use ctn_dsl_parser::{parse, KernelAst, ParseError, ParseErrorKind};
pub use ctn_kernel_types::{
    BlockDefinition, BlockKind, BoundaryParams, CtnKernel, DecoderParams, InitParams, LeakPenalty,
    Precedence, SolverMode, SolverParams, TensorParams, TraitProfile, VectorDefinition,
    BLOCKS, BLOCK_ORDER, VECTORS,
};

/// Parse DSL text all the way down to a kernel value.
pub fn parse_kernel(source: &str) -> Result<CtnKernel, Vec<ParseError>> {
    parse(source).map(KernelAst::into_kernel)
}
