//! Cognitive vector catalog.
//!
//! The 9-dimensional basis for the cognitive configuration space R⁹. The
//! catalog is fixed: nine named dimensions, each with a symbolic identifier
//! and a limit expression, defined once and never mutated. The compiler
//! renders one line per catalog entry; the kernel itself only supplies the
//! weight vector ([`TraitProfile`]).

use serde::{Deserialize, Serialize};

/// One dimension of the cognitive basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorDefinition {
    /// 1-based identity, unique within the catalog
    pub id: u8,
    /// Symbolic identifier (single glyph, unique)
    pub symbol: &'static str,
    pub name: &'static str,
    /// Free-form mathematical limit expression
    pub limit_expression: &'static str,
    pub description: &'static str,
}

/// The fixed cognitive vector catalog, ordered by id.
pub const VECTORS: [VectorDefinition; 9] = [
    VectorDefinition {
        id: 1,
        symbol: "ε",
        name: "Atomic_Derivation",
        limit_expression: "ε_hid → 0⁺",
        description: "Prefer primitive, local derivations",
    },
    VectorDefinition {
        id: 2,
        symbol: "κ",
        name: "Assertion_Rigor",
        limit_expression: "κ(f) → min",
        description: "Minimize curvature, maximize rigor",
    },
    VectorDefinition {
        id: 3,
        symbol: "Φ",
        name: "Frame_Isolation",
        limit_expression: "Φ: W → I",
        description: "Separate world-model from instructions",
    },
    VectorDefinition {
        id: 4,
        symbol: "π",
        name: "Global_Invariance",
        limit_expression: "π_gl ≫ π_loc",
        description: "Respect global constraints over local",
    },
    VectorDefinition {
        id: 5,
        symbol: "∂",
        name: "Orthogonal_Detachment",
        limit_expression: "∂A ≡ A",
        description: "Non-personal stance, no self-narrative",
    },
    VectorDefinition {
        id: 6,
        symbol: "U",
        name: "Unbound_Search",
        limit_expression: "U \\ S",
        description: "Allow exploration within constraints",
    },
    VectorDefinition {
        id: 7,
        symbol: "ζ",
        name: "Syntactic_Minimalism",
        limit_expression: "Allowed/Forbidden",
        description: "Restrict output syntax",
    },
    VectorDefinition {
        id: 8,
        symbol: "ρ",
        name: "Anti_Sycophancy",
        limit_expression: "Sycophancy → 0",
        description: "No flattery, maximum density",
    },
    VectorDefinition {
        id: 9,
        symbol: "σ",
        name: "Satisfiability_Guard",
        limit_expression: "P(z|q) < γ ⇒ Reject",
        description: "Reject unsatisfiable premises",
    },
];

/// Trait profile: one weight per catalog vector, each in [0, 1].
///
/// The length is fixed by the type; dynamic sources go through
/// [`TraitProfile::from_slice`] so a wrong-length sequence is a reportable
/// error rather than a silent truncation. Out-of-range weights are never
/// clamped — range validity is checked by [`TraitProfile::is_valid`] and
/// reported by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitProfile(pub [f64; 9]);

/// Error constructing a trait profile from a dynamic source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitProfileError {
    /// Number of weights actually supplied
    pub len: usize,
}

impl std::fmt::Display for TraitProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "trait profile must have exactly 9 weights, got {}", self.len)
    }
}

impl std::error::Error for TraitProfileError {}

impl TraitProfile {
    /// Wrap a fixed weight array.
    pub const fn new(weights: [f64; 9]) -> Self {
        Self(weights)
    }

    /// Build a profile from a dynamic weight sequence.
    pub fn from_slice(weights: &[f64]) -> Result<Self, TraitProfileError> {
        let arr: [f64; 9] = weights
            .try_into()
            .map_err(|_| TraitProfileError { len: weights.len() })?;
        Ok(Self(arr))
    }

    /// Range validity: every weight in the closed interval [0, 1].
    pub fn is_valid(&self) -> bool {
        self.0.iter().all(|w| (0.0..=1.0).contains(w))
    }

    /// Iterate over the weights in catalog order.
    pub fn weights(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }
}
