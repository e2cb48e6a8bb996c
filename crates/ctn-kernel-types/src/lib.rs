//! Kernel data model for the CTN DSL.
//!
//! This crate defines the value types shared by the compiler, validator,
//! and parser:
//!
//! - [`VectorDefinition`] / [`VECTORS`] — the fixed 9-dimensional cognitive
//!   basis catalog
//! - [`BlockKind`] / [`BLOCKS`] — the fixed 7-block structural registry
//! - [`CtnKernel`] — one complete kernel specification instance
//!
//! All types are plain values: `Clone + PartialEq + serde`, no shared
//! mutable state, no lifecycle beyond a single call. The two registries are
//! immutable statics initialized at process start and never written, so they
//! are safe for unrestricted concurrent reads.

pub mod blocks;
pub mod kernel;
pub mod vectors;

pub use blocks::{BlockDefinition, BlockKind, BLOCKS, BLOCK_ORDER};
pub use kernel::{
    BoundaryParams, CtnKernel, DecoderParams, InitParams, LeakPenalty, Precedence, SolverMode,
    SolverParams, TensorParams,
};
pub use vectors::{TraitProfile, TraitProfileError, VectorDefinition, VECTORS};
