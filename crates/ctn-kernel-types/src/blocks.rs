//! Block registry.
//!
//! The 7 structural block kinds of the CTN DSL, in canonical order. The
//! order index is the single source of truth for the block sequence: the
//! compiler emits blocks in this order and the parser accepts no other.
//!
//! Kinds form a closed enum, so "unknown kind" is unrepresentable and
//! registry lookup is direct indexing rather than a runtime search.

use serde::{Deserialize, Serialize};

/// One of the seven fixed block kinds.
///
/// Discriminants equal the canonical order index, which makes
/// [`BlockKind::definition`] a direct array index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BlockKind {
    Schema = 0,
    Init = 1,
    Tensors = 2,
    Solver = 3,
    Boundary = 4,
    Decoder = 5,
    SelfErase = 6,
}

/// Registry metadata for one block kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDefinition {
    pub kind: BlockKind,
    /// Block symbol; empty only for the terminal self-erase kind
    pub symbol: &'static str,
    /// Always true in this DSL version
    pub required: bool,
    /// Canonical emission order, 0..=6
    pub order: u8,
    pub description: &'static str,
}

/// The fixed block registry, indexed by order.
pub const BLOCKS: [BlockDefinition; 7] = [
    BlockDefinition {
        kind: BlockKind::Schema,
        symbol: "Σ_CTN",
        required: true,
        order: 0,
        description: "Schema container declaration",
    },
    BlockDefinition {
        kind: BlockKind::Init,
        symbol: "Ψ_global",
        required: true,
        order: 1,
        description: "Global preconditions and auth",
    },
    BlockDefinition {
        kind: BlockKind::Tensors,
        symbol: "U",
        required: true,
        order: 2,
        description: "Cognitive basis vectors",
    },
    BlockDefinition {
        kind: BlockKind::Solver,
        symbol: "Ω",
        required: true,
        order: 3,
        description: "Reasoning optimization target",
    },
    BlockDefinition {
        kind: BlockKind::Boundary,
        symbol: "ζ",
        required: true,
        order: 4,
        description: "Syntax firewall (ζ-invariant)",
    },
    BlockDefinition {
        kind: BlockKind::Decoder,
        symbol: "D",
        required: true,
        order: 5,
        description: "Output projection constraints",
    },
    BlockDefinition {
        kind: BlockKind::SelfErase,
        symbol: "",
        required: true,
        order: 6,
        description: "Kernel hygiene directive",
    },
];

/// Canonical block sequence.
pub const BLOCK_ORDER: [BlockKind; 7] = [
    BlockKind::Schema,
    BlockKind::Init,
    BlockKind::Tensors,
    BlockKind::Solver,
    BlockKind::Boundary,
    BlockKind::Decoder,
    BlockKind::SelfErase,
];

impl BlockKind {
    /// Registry metadata for this kind (O(1) indexed lookup).
    pub const fn definition(self) -> &'static BlockDefinition {
        &BLOCKS[self as usize]
    }

    /// DSL keyword for this kind.
    pub const fn keyword(self) -> &'static str {
        match self {
            BlockKind::Schema => "CTN_KERNEL_SCHEMA",
            BlockKind::Init => "SYS_KERNEL_INIT",
            BlockKind::Tensors => "COGNITIVE_TENSORS",
            BlockKind::Solver => "STRATEGIC_SOLVER",
            BlockKind::Boundary => "BOUNDARY_CONTROL",
            BlockKind::Decoder => "DECODER_MANIFOLD",
            BlockKind::SelfErase => "SELF_ERASE",
        }
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}
