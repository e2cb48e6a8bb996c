//! Kernel AST.
//!
//! The parser produces a [`KernelAst`]: the schema header node plus the six
//! inner block nodes in canonical order, each carrying its source span.
//! [`KernelAst::into_kernel`] lowers the AST to a plain [`CtnKernel`] value
//! for comparison and re-compilation.

use ctn_kernel_types::{
    BlockKind, BoundaryParams, CtnKernel, DecoderParams, InitParams, SolverParams, TensorParams,
    TraitProfile,
};

/// Source location of one AST node: a byte range plus the 1-based line of
/// its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: u32,
    pub end: u32,
    pub line: u32,
}

impl Span {
    pub fn new(start: u32, end: u32, line: u32) -> Self {
        Self { start, end, line }
    }
}

/// The schema header: container identifier plus the inner block kinds it
/// names, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub id: String,
    pub block_refs: Vec<BlockKind>,
    pub span: Span,
}

/// One per-vector reference line of the tensors block
/// (`v1 = { ε_hid → 0⁺, Atomic_Derivation }`).
#[derive(Debug, Clone, PartialEq)]
pub struct VectorLine {
    pub id: u8,
    pub limit_expression: String,
    pub name: String,
}

/// One inner block of the kernel, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockNode {
    Init { params: InitParams, span: Span },
    Tensors {
        profile: TraitProfile,
        vector_lines: Vec<VectorLine>,
        span: Span,
    },
    Solver { params: SolverParams, span: Span },
    Boundary { params: BoundaryParams, span: Span },
    Decoder { params: DecoderParams, span: Span },
    SelfErase { span: Span },
}

impl BlockNode {
    /// Registry kind of this node.
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockNode::Init { .. } => BlockKind::Init,
            BlockNode::Tensors { .. } => BlockKind::Tensors,
            BlockNode::Solver { .. } => BlockKind::Solver,
            BlockNode::Boundary { .. } => BlockKind::Boundary,
            BlockNode::Decoder { .. } => BlockKind::Decoder,
            BlockNode::SelfErase { .. } => BlockKind::SelfErase,
        }
    }
}

/// A parsed kernel: schema header plus the six inner blocks in canonical
/// order (the parser rejects any other arrangement).
#[derive(Debug, Clone, PartialEq)]
pub struct KernelAst {
    pub schema: SchemaNode,
    pub blocks: Vec<BlockNode>,
}

impl KernelAst {
    /// Lower the AST to a kernel value.
    ///
    /// The per-vector reference lines come from the catalog at compile time
    /// and the free-form `tensors.vectors` annotation is never rendered, so
    /// the lowered kernel carries an empty annotation.
    pub fn into_kernel(self) -> CtnKernel {
        let mut init = None;
        let mut tensors = None;
        let mut solver = None;
        let mut boundary = None;
        let mut decoder = None;
        let mut self_erase = false;

        for block in self.blocks {
            match block {
                BlockNode::Init { params, .. } => init = Some(params),
                BlockNode::Tensors { profile, .. } => {
                    tensors = Some(TensorParams {
                        profile,
                        vectors: Vec::new(),
                    });
                }
                BlockNode::Solver { params, .. } => solver = Some(params),
                BlockNode::Boundary { params, .. } => boundary = Some(params),
                BlockNode::Decoder { params, .. } => decoder = Some(params),
                BlockNode::SelfErase { .. } => self_erase = true,
            }
        }

        CtnKernel {
            schema: self.schema.id,
            init: init.expect("BUG: parsed kernel AST without init block"),
            tensors: tensors.expect("BUG: parsed kernel AST without tensors block"),
            solver: solver.expect("BUG: parsed kernel AST without solver block"),
            boundary: boundary.expect("BUG: parsed kernel AST without boundary block"),
            decoder: decoder.expect("BUG: parsed kernel AST without decoder block"),
            self_erase,
        }
    }
}
