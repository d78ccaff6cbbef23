//! Module failure reporting.

use super::module::ModulePhase;

/// One isolated module failure, with enough context to be actionable.
#[derive(Debug, Clone)]
pub struct ModuleFailure {
    pub handle: String,
    pub phase: ModulePhase,
    /// Rendered error chain from the module.
    pub error: String,
}

impl std::fmt::Display for ModuleFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "module `{}` failed during {}: {}",
            self.handle, self.phase, self.error
        )
    }
}

/// External error-reporting collaborator. Module-scoped failures are pushed
/// here; they never surface as run-level failures.
pub trait DiagnosticsSink: Send {
    fn report(&mut self, failure: &ModuleFailure);
}

/// Default sink: log through `tracing` and move on.
#[derive(Debug, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn report(&mut self, failure: &ModuleFailure) {
        tracing::warn!("[PARSER] {failure}");
    }
}
