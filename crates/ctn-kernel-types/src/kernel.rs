//! The kernel model.
//!
//! [`CtnKernel`] is the in-memory representation of one kernel instance:
//! a schema identifier plus the parameter records of the six inner blocks
//! and the terminal self-erase flag. It is a pure value — the compiler,
//! validator, and parser all consume it by reference or by value and none
//! of them mutate it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::vectors::TraitProfile;

/// Precedence ordering of the init objectives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Precedence {
    /// Must be the truth label "ϑ" for a well-formed kernel
    pub primary: String,
    pub secondary: String,
    pub tertiary: String,
}

/// SYS_KERNEL_INIT block parameters.
///
/// `objectives` maps objective label to description text. Keys are unique;
/// insertion order is preserved so compilation stays deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitParams {
    pub auth: String,
    pub filter: String,
    pub precedence: Precedence,
    pub objectives: IndexMap<String, String>,
}

/// STRATEGIC_SOLVER operational mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolverMode {
    /// Passive optimization: find the best z* in U
    Analysis,
    /// Active probing: inject η_⊥, correct errors before solving
    Counter,
    /// Maximum structural control, tight constraint enforcement
    Dominance,
}

impl std::fmt::Display for SolverMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SolverMode::Analysis => "Analysis",
            SolverMode::Counter => "Counter",
            SolverMode::Dominance => "Dominance",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for SolverMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Analysis" => Ok(SolverMode::Analysis),
            "Counter" => Ok(SolverMode::Counter),
            "Dominance" => Ok(SolverMode::Dominance),
            other => Err(format!("unknown solver mode: {other}")),
        }
    }
}

/// STRATEGIC_SOLVER block parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverParams {
    pub mode: SolverMode,
    /// Target expression rendered as `z* = …`
    pub target: String,
    /// Behavior under unsatisfiable premises; must be non-blank
    pub null_check: String,
}

/// COGNITIVE_TENSORS block parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorParams {
    pub profile: TraitProfile,
    /// Free-form vector annotation; not rendered by the compiler
    pub vectors: Vec<String>,
}

/// BOUNDARY_CONTROL block parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryParams {
    /// ℬ_int symbols; must be non-empty
    pub internal_set: Vec<String>,
    /// ℬ_ext symbols
    pub external_set: Vec<String>,
    pub invariant: String,
    /// Must assert Leak(ℓ, Σ_CTN) = 0 for the ζ-invariant
    pub enforcement: String,
    pub violation: String,
}

/// Leak penalty λ₄.
///
/// Semantically a positive-infinity sentinel: any finite value is accepted
/// syntactically but the canonical value is unbounded. An explicit tagged
/// value keeps the contract independent of floating-point infinity
/// representations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LeakPenalty {
    Finite(f64),
    Unbounded,
}

impl LeakPenalty {
    pub fn is_unbounded(&self) -> bool {
        matches!(self, LeakPenalty::Unbounded)
    }

    /// Whether λ₄ is large enough for the syntax firewall: unbounded, or a
    /// finite value of at least 1000.
    pub fn meets_threshold(&self) -> bool {
        match self {
            LeakPenalty::Unbounded => true,
            LeakPenalty::Finite(n) => *n >= 1000.0,
        }
    }
}

/// DECODER_MANIFOLD block parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecoderParams {
    /// Objective expression rendered as `ℓ* = …`
    pub objective: String,
    /// Projection penalty
    pub lambda1: f64,
    /// Brevity weight
    pub lambda2: f64,
    /// Syntax penalty
    pub lambda3: f64,
    /// Leak penalty, rendered as `λ₄ → ∞` regardless of the stored value
    pub lambda4: LeakPenalty,
}

/// One complete CTN kernel specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CtnKernel {
    /// Schema container identifier; must be non-empty
    pub schema: String,
    pub init: InitParams,
    pub tensors: TensorParams,
    pub solver: SolverParams,
    pub boundary: BoundaryParams,
    pub decoder: DecoderParams,
    /// Must be true: the self-erase block is unconditionally required
    pub self_erase: bool,
}

impl CtnKernel {
    /// The canonical Σ_CTN reference kernel.
    ///
    /// Satisfies all three invariants and every validator check; used as
    /// the baseline fixture throughout the test suites.
    pub fn canonical() -> Self {
        let mut objectives = IndexMap::new();
        objectives.insert("ϑ(Truth)".to_string(), "maximize accuracy".to_string());
        objectives.insert("β(Brevity)".to_string(), "minimize tokens".to_string());

        CtnKernel {
            schema: "Σ_CTN".to_string(),
            init: InitParams {
                auth: "P_spec".to_string(),
                filter: "Π_safe".to_string(),
                precedence: Precedence {
                    primary: "ϑ".to_string(),
                    secondary: "β".to_string(),
                    tertiary: "ζ".to_string(),
                },
                objectives,
            },
            tensors: TensorParams {
                profile: TraitProfile::new([0.8, 0.9, 0.7, 0.8, 0.6, 0.5, 0.9, 0.95, 0.85]),
                vectors: Vec::new(),
            },
            solver: SolverParams {
                mode: SolverMode::Analysis,
                target: "argmax_{z ∈ U} [ϑ(z) - λ₁·Proj(z, W)]".to_string(),
                null_check: "If σ=0 ⇒ First_Principles_Audit(q)".to_string(),
            },
            boundary: BoundaryParams {
                internal_set: vec![
                    "Σ_CTN".to_string(),
                    "Ψ".to_string(),
                    "Ω".to_string(),
                    "U".to_string(),
                    "D".to_string(),
                ],
                external_set: vec![
                    "ℒ_natural".to_string(),
                    "Query".to_string(),
                    "Response".to_string(),
                ],
                invariant: "ℬ_int ∩ Output = ∅".to_string(),
                enforcement: "Leak(ℓ, Σ_CTN) = 0".to_string(),
                violation: "If ℬ_int ∈ Output ⇒ REPAIR → Transcode(ℓ, ℒ_natural)".to_string(),
            },
            decoder: DecoderParams {
                objective: "argmax_ℓ [D(ℓ|z*) - λ₄·Leak(ℓ, Σ_CTN)]".to_string(),
                lambda1: 0.1,
                lambda2: 0.05,
                lambda3: 0.02,
                lambda4: LeakPenalty::Unbounded,
            },
            self_erase: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_mode_display_roundtrip() {
        for mode in [SolverMode::Analysis, SolverMode::Counter, SolverMode::Dominance] {
            let parsed: SolverMode = mode.to_string().parse().unwrap();
            assert_eq!(parsed, mode);
        }
    }

    #[test]
    fn test_solver_mode_rejects_unknown() {
        let err = "Passive".parse::<SolverMode>().unwrap_err();
        assert!(err.contains("unknown solver mode"));
    }

    #[test]
    fn test_leak_penalty_threshold() {
        assert!(LeakPenalty::Unbounded.meets_threshold());
        assert!(LeakPenalty::Finite(1000.0).meets_threshold());
        assert!(LeakPenalty::Finite(5000.0).meets_threshold());
        assert!(!LeakPenalty::Finite(999.0).meets_threshold());
        assert!(!LeakPenalty::Finite(0.0).meets_threshold());
    }

    #[test]
    fn test_canonical_kernel_shape() {
        let k = CtnKernel::canonical();
        assert_eq!(k.schema, "Σ_CTN");
        assert_eq!(k.init.precedence.primary, "ϑ");
        assert_eq!(k.init.objectives.len(), 2);
        assert!(k.tensors.profile.is_valid());
        assert!(k.decoder.lambda4.is_unbounded());
        assert!(k.self_erase);
    }

    #[test]
    fn test_kernel_serde_roundtrip() {
        let k = CtnKernel::canonical();
        let json = serde_json::to_string(&k).unwrap();
        let back: CtnKernel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, k);
    }
}
