//! The three structural invariants of a well-formed kernel.
//!
//! Each check is independent and pure: it inspects one part of the kernel
//! and returns a [`InvariantResult`] without touching the others, so a
//! kernel violating all three reports all three.

use ctn_kernel_types::CtnKernel;
use serde::Serialize;

/// Outcome of a single invariant check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvariantResult {
    pub valid: bool,
    /// Stable invariant name, e.g. `ϑ-Invariant`.
    pub invariant: &'static str,
    /// Violation message; `None` when the invariant holds.
    pub message: Option<String>,
}

impl InvariantResult {
    fn holds(invariant: &'static str) -> Self {
        Self {
            valid: true,
            invariant,
            message: None,
        }
    }

    fn violated(invariant: &'static str, message: String) -> Self {
        Self {
            valid: false,
            invariant,
            message: Some(message),
        }
    }
}

/// Epistemic anchor: truth (ϑ) must be the primary precedence objective.
pub fn check_epistemic_anchor(kernel: &CtnKernel) -> InvariantResult {
    let primary = &kernel.init.precedence.primary;
    if primary == "ϑ" {
        InvariantResult::holds("ϑ-Invariant")
    } else {
        InvariantResult::violated(
            "ϑ-Invariant",
            format!("Truth (ϑ) must be primary in precedence, found: {primary}"),
        )
    }
}

/// Syntax firewall: the boundary enforcement clause must pin leakage to
/// zero. The clause is free-form text, so this is a substring check.
pub fn check_syntax_firewall(kernel: &CtnKernel) -> InvariantResult {
    let enforcement = &kernel.boundary.enforcement;
    if enforcement.contains("Leak") && enforcement.contains('0') {
        InvariantResult::holds("ζ-Invariant")
    } else {
        InvariantResult::violated(
            "ζ-Invariant",
            "Boundary must enforce Leak(ℓ, Σ_CTN) = 0".to_string(),
        )
    }
}

/// Null-assumption guard: the solver must say what happens when no
/// satisfiable answer exists.
pub fn check_null_assumption(kernel: &CtnKernel) -> InvariantResult {
    if kernel.solver.null_check.trim().is_empty() {
        InvariantResult::violated(
            "σ-Invariant",
            "Solver must define null-assumption handling".to_string(),
        )
    } else {
        InvariantResult::holds("σ-Invariant")
    }
}

/// Run all three checks, in declaration order.
pub fn check_all(kernel: &CtnKernel) -> [InvariantResult; 3] {
    [
        check_epistemic_anchor(kernel),
        check_syntax_firewall(kernel),
        check_null_assumption(kernel),
    ]
}

/// Whether every invariant holds.
pub fn is_well_formed(kernel: &CtnKernel) -> bool {
    check_all(kernel).iter().all(|r| r.valid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_kernel_is_well_formed() {
        let kernel = CtnKernel::canonical();
        assert!(is_well_formed(&kernel));
        for result in check_all(&kernel) {
            assert!(result.valid);
            assert_eq!(result.message, None);
        }
    }

    #[test]
    fn test_epistemic_anchor_requires_truth_primary() {
        let mut kernel = CtnKernel::canonical();
        kernel.init.precedence.primary = "β".to_string();
        let result = check_epistemic_anchor(&kernel);
        assert!(!result.valid);
        assert_eq!(
            result.message.as_deref(),
            Some("Truth (ϑ) must be primary in precedence, found: β")
        );
    }

    #[test]
    fn test_syntax_firewall_needs_leak_and_zero() {
        let mut kernel = CtnKernel::canonical();
        kernel.boundary.enforcement = "Leak(ℓ, Σ_CTN) minimized".to_string();
        assert!(!check_syntax_firewall(&kernel).valid);

        kernel.boundary.enforcement = "no leakage at all".to_string();
        assert!(!check_syntax_firewall(&kernel).valid);

        kernel.boundary.enforcement = "Leak(ℓ, Σ_CTN) = 0".to_string();
        assert!(check_syntax_firewall(&kernel).valid);
    }

    #[test]
    fn test_null_assumption_rejects_blank_text() {
        let mut kernel = CtnKernel::canonical();
        kernel.solver.null_check = "   ".to_string();
        let result = check_null_assumption(&kernel);
        assert!(!result.valid);
        assert_eq!(
            result.message.as_deref(),
            Some("Solver must define null-assumption handling")
        );
    }

    #[test]
    fn test_checks_are_independent() {
        let mut kernel = CtnKernel::canonical();
        kernel.init.precedence.primary = "ζ".to_string();
        kernel.boundary.enforcement = String::new();
        kernel.solver.null_check = String::new();
        let results = check_all(&kernel);
        assert!(results.iter().all(|r| !r.valid));
        assert_eq!(
            results.map(|r| r.invariant),
            ["ϑ-Invariant", "ζ-Invariant", "σ-Invariant"]
        );
    }
}
