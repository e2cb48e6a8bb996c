//! Kernel validator: structural checks plus the invariant suite.
//!
//! Unlike the compiler pre-checks, which refuse to render, validation is a
//! report: every finding is collected with a stable code and the path of
//! the offending field. Errors make the kernel invalid; warnings do not.
//!
//! The severity split deliberately differs from the compiler on one point:
//! a weak leak penalty (λ₄) blocks compilation but only warns here, so a
//! kernel under construction can be inspected without being rejected
//! outright.

use ctn_kernel_types::CtnKernel;
use serde::Serialize;

use crate::invariants::{check_all, InvariantResult};

/// One validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Stable code: `E001`..`E004` for structural checks, `INV_`-prefixed
    /// for invariant violations.
    pub code: String,
    pub message: String,
    /// Dotted path of the offending field, e.g. `tensors.profile`; absent
    /// for invariant re-emissions, which concern the kernel as a whole.
    pub path: Option<String>,
}

/// One non-fatal finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationWarning {
    pub code: String,
    pub message: String,
    pub path: Option<String>,
}

/// Full validation outcome for one kernel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    /// True when no error was recorded; warnings are allowed.
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    /// Raw invariant results, including the passing ones.
    pub invariants: [InvariantResult; 3],
}

fn error(code: &str, message: impl Into<String>, path: &str) -> ValidationError {
    ValidationError {
        code: code.to_string(),
        message: message.into(),
        path: Some(path.to_string()),
    }
}

/// Validate a kernel and report every finding.
pub fn validate(kernel: &CtnKernel) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if kernel.schema.trim().is_empty() {
        errors.push(error("E001", "Missing schema declaration", "schema"));
    }

    if !kernel.tensors.profile.is_valid() {
        errors.push(error(
            "E002",
            "Invalid trait profile: all values must be in [0, 1]",
            "tensors.profile",
        ));
    }

    if !kernel.decoder.lambda4.meets_threshold() {
        warnings.push(ValidationWarning {
            code: "W001".to_string(),
            message: "λ₄ (leak penalty) should be very large or Infinity for proper syntax firewall"
                .to_string(),
            path: Some("decoder.lambda4".to_string()),
        });
    }

    if kernel.boundary.internal_set.is_empty() {
        errors.push(error(
            "E003",
            "Internal symbol set (ℬ_int) cannot be empty",
            "boundary.internal_set",
        ));
    }

    if !kernel.self_erase {
        errors.push(error(
            "E004",
            "SELF_ERASE directive is required",
            "self_erase",
        ));
    }

    let invariants = check_all(kernel);
    for result in &invariants {
        if let Some(message) = &result.message {
            errors.push(ValidationError {
                code: format!("INV_{}", result.invariant),
                message: message.clone(),
                path: None,
            });
        }
    }

    tracing::debug!(
        errors = errors.len(),
        warnings = warnings.len(),
        "kernel validated"
    );

    ValidationReport {
        valid: errors.is_empty(),
        errors,
        warnings,
        invariants,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctn_kernel_types::{LeakPenalty, TraitProfile};

    #[test]
    fn test_canonical_kernel_is_valid() {
        let report = validate(&CtnKernel::canonical());
        assert!(report.valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
        assert!(report.invariants.iter().all(|r| r.valid));
    }

    #[test]
    fn test_missing_schema_is_e001() {
        let mut kernel = CtnKernel::canonical();
        kernel.schema = String::new();
        let report = validate(&kernel);
        assert!(!report.valid);
        assert_eq!(report.errors[0].code, "E001");
        assert_eq!(report.errors[0].path.as_deref(), Some("schema"));
    }

    #[test]
    fn test_out_of_range_profile_is_e002() {
        let mut kernel = CtnKernel::canonical();
        kernel.tensors.profile =
            TraitProfile::new([0.8, 0.9, 0.7, 0.8, 0.6, 0.5, 0.9, 0.95, -0.1]);
        let report = validate(&kernel);
        assert_eq!(report.errors[0].code, "E002");
        assert_eq!(report.errors[0].path.as_deref(), Some("tensors.profile"));
    }

    #[test]
    fn test_weak_leak_penalty_warns_but_stays_valid() {
        let mut kernel = CtnKernel::canonical();
        kernel.decoder.lambda4 = LeakPenalty::Finite(999.0);
        let report = validate(&kernel);
        assert!(report.valid);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].code, "W001");
        assert_eq!(report.warnings[0].path.as_deref(), Some("decoder.lambda4"));
    }

    #[test]
    fn test_leak_penalty_threshold_boundary() {
        let mut kernel = CtnKernel::canonical();
        kernel.decoder.lambda4 = LeakPenalty::Finite(1000.0);
        assert!(validate(&kernel).warnings.is_empty());

        kernel.decoder.lambda4 = LeakPenalty::Finite(999.999);
        assert_eq!(validate(&kernel).warnings.len(), 1);
    }

    #[test]
    fn test_empty_internal_set_is_e003() {
        let mut kernel = CtnKernel::canonical();
        kernel.boundary.internal_set.clear();
        let report = validate(&kernel);
        assert!(report
            .errors
            .iter()
            .any(|e| e.code == "E003" && e.path.as_deref() == Some("boundary.internal_set")));
    }

    #[test]
    fn test_missing_self_erase_is_e004() {
        let mut kernel = CtnKernel::canonical();
        kernel.self_erase = false;
        let report = validate(&kernel);
        assert!(report.errors.iter().any(|e| e.code == "E004"));
    }

    #[test]
    fn test_invariant_violations_reported_with_inv_codes() {
        let mut kernel = CtnKernel::canonical();
        kernel.init.precedence.primary = "β".to_string();
        kernel.solver.null_check = String::new();
        let report = validate(&kernel);
        let codes: Vec<&str> = report.errors.iter().map(|e| e.code.as_str()).collect();
        assert!(codes.contains(&"INV_ϑ-Invariant"));
        assert!(codes.contains(&"INV_σ-Invariant"));
        assert!(!codes.contains(&"INV_ζ-Invariant"));
    }

    #[test]
    fn test_invariant_errors_carry_no_field_path() {
        let mut kernel = CtnKernel::canonical();
        kernel.solver.null_check = String::new();
        let report = validate(&kernel);
        let inv = report
            .errors
            .iter()
            .find(|e| e.code == "INV_σ-Invariant")
            .unwrap();
        assert_eq!(inv.path, None);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let mut kernel = CtnKernel::canonical();
        kernel.schema = String::new();
        kernel.solver.null_check = String::new();
        let report = validate(&kernel);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["errors"][0]["code"], "E001");
        assert_eq!(json["errors"][0]["path"], "schema");
        assert!(json["errors"][1]["path"].is_null());
        assert_eq!(json["invariants"][2]["valid"], false);
    }

    #[test]
    fn test_all_findings_collected_together() {
        let mut kernel = CtnKernel::canonical();
        kernel.schema = String::new();
        kernel.boundary.internal_set.clear();
        kernel.decoder.lambda4 = LeakPenalty::Finite(1.0);
        let report = validate(&kernel);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.warnings.len(), 1);
        assert!(!report.valid);
    }
}
