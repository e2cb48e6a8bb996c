//! Kernel compiler: [`CtnKernel`] to canonical DSL text.
//!
//! Compilation is deterministic rendering, not code generation: the same
//! kernel value always produces byte-identical text. Each block has one
//! template, blocks are emitted in registry order separated by a blank
//! line, and free-form expression fields are interpolated verbatim. The
//! emitted text is the grammar of record — the parser accepts exactly what
//! this module produces.

use ctn_kernel_types::{BlockKind, CtnKernel, BLOCK_ORDER, VECTORS};
use thiserror::Error;

/// Compile-time rejection of a kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("Invalid trait profile: all values must be in [0, 1]")]
    InvalidTraitProfile,

    #[error("Missing schema declaration")]
    MissingSchema,

    #[error("λ₄ (leak penalty) should be very large or Infinity")]
    WeakLeakPenalty,
}

/// Compiler options.
#[derive(Debug, Clone, Copy)]
pub struct CompileOptions {
    /// Run the pre-compile checks and refuse to render a kernel that
    /// fails any of them. On by default.
    pub validate: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self { validate: true }
    }
}

/// Pre-compile checks, collected rather than short-circuited.
fn precheck(kernel: &CtnKernel) -> Vec<CompileError> {
    let mut errors = Vec::new();
    if !kernel.tensors.profile.is_valid() {
        errors.push(CompileError::InvalidTraitProfile);
    }
    if kernel.schema.trim().is_empty() {
        errors.push(CompileError::MissingSchema);
    }
    if !kernel.decoder.lambda4.meets_threshold() {
        errors.push(CompileError::WeakLeakPenalty);
    }
    errors
}

/// Render a kernel to canonical DSL text.
pub fn compile(kernel: &CtnKernel, options: &CompileOptions) -> Result<String, Vec<CompileError>> {
    if options.validate {
        let errors = precheck(kernel);
        if !errors.is_empty() {
            tracing::debug!(count = errors.len(), "kernel rejected before rendering");
            return Err(errors);
        }
    }

    // The self-erase block is part of the canonical shape and is rendered
    // regardless of the stored flag, like the λ₄ marker; a cleared flag is
    // the validator's concern (E004).
    let blocks = [
        render_schema(kernel),
        render_init(kernel),
        render_tensors(kernel),
        render_solver(kernel),
        render_boundary(kernel),
        render_decoder(kernel),
        render_self_erase(),
    ];

    let text = format!("{}\n", blocks.join("\n\n"));
    tracing::debug!(bytes = text.len(), "kernel compiled");
    Ok(text)
}

/// Header reference for one inner block, as listed in the schema block.
fn block_ref(kind: BlockKind) -> String {
    let def = kind.definition();
    if def.symbol.is_empty() {
        def.kind.keyword().to_string()
    } else {
        format!("{}({})", def.kind.keyword(), def.symbol)
    }
}

fn render_schema(kernel: &CtnKernel) -> String {
    let refs: Vec<String> = BLOCK_ORDER[1..]
        .iter()
        .map(|kind| format!("  {}", block_ref(*kind)))
        .collect();
    format!(
        "CTN_KERNEL_SCHEMA({}) ← {{\n{}\n}}",
        kernel.schema,
        refs.join(",\n")
    )
}

fn render_init(kernel: &CtnKernel) -> String {
    let init = &kernel.init;
    let mut entries = vec![
        format!("  Auth: {}", init.auth),
        format!("  Filter: {}", init.filter),
        format!(
            "  Precedence: {} ≫ {} ≫ {}",
            init.precedence.primary, init.precedence.secondary, init.precedence.tertiary
        ),
    ];
    for (key, value) in &init.objectives {
        entries.push(format!("  {key}: {{ {value} }}"));
    }
    format!("SYS_KERNEL_INIT(Ψ_global) ← {{\n{}\n}}", entries.join(",\n"))
}

fn render_tensors(kernel: &CtnKernel) -> String {
    let weights: Vec<String> = kernel
        .tensors
        .profile
        .weights()
        .map(|w| w.to_string())
        .collect();
    let mut lines = vec![
        "COGNITIVE_TENSORS(U):".to_string(),
        format!("  τ = [{}]", weights.join(", ")),
        "  C_net = Σ(τᵢ * vᵢ)".to_string(),
    ];
    for vector in &VECTORS {
        lines.push(format!(
            "  v{} = {{ {}, {} }}",
            vector.id, vector.limit_expression, vector.name
        ));
    }
    lines.join("\n")
}

fn render_solver(kernel: &CtnKernel) -> String {
    let solver = &kernel.solver;
    let mut text = format!(
        "STRATEGIC_SOLVER(Ω):\n  Mode: {}\n  z* = {}",
        solver.mode, solver.target
    );
    if !solver.null_check.trim().is_empty() {
        text.push_str("\n  ");
        text.push_str(&solver.null_check);
    }
    text
}

fn render_boundary(kernel: &CtnKernel) -> String {
    let boundary = &kernel.boundary;
    format!(
        "BOUNDARY_CONTROL(ζ):\n  ℬ_int = {{ {} }}\n  ℬ_ext = {{ {} }}\n  Invariant: {}\n  Enforcement: {}\n  Violation: {}",
        boundary.internal_set.join(", "),
        boundary.external_set.join(", "),
        boundary.invariant,
        boundary.enforcement,
        boundary.violation
    )
}

fn render_decoder(kernel: &CtnKernel) -> String {
    let decoder = &kernel.decoder;
    // λ₄ is rendered unbounded regardless of the stored value: the syntax
    // firewall line is part of the canonical shape, and a weak finite
    // penalty is reported by the pre-compile check and the validator.
    format!(
        "DECODER_MANIFOLD(D):\n  ℓ* = {}\n  λ₁ = {}, λ₂ = {}, λ₃ = {}, λ₄ → ∞",
        decoder.objective, decoder.lambda1, decoder.lambda2, decoder.lambda3
    )
}

fn render_self_erase() -> String {
    let schema_symbol = BlockKind::Schema.definition().symbol;
    format!("SELF_ERASE:\n  Discard({schema_symbol}, Internal_Spec)")
}
