//! The analysis pipeline.
//!
//! This module is the runtime every analysis module plugs into:
//!
//! - **Meta**: named bundles of module descriptors, merged per run
//! - **Container**: dependency resolution and ordered instantiation
//! - **Module**: the lifecycle contract (configure, normalise, hooks, output)
//! - **Parser**: the orchestrator driving the two-phase event pass and
//!   collecting results
//!
//! ```text
//! Meta bundles ──merge──▶ descriptor set ──resolve──▶ ordered instances
//!                                                          │
//!                              configure (async, dep order)│
//!                                                          ▼
//!     raw events ──▶ normalise pipeline ──▶ hook dispatch ──▶ results
//! ```

mod container;
mod context;
mod diagnostics;
mod meta;
mod module;
mod parser;
mod result;

#[cfg(test)]
mod container_tests;

pub use container::{instantiate, resolve};
pub use context::AnalysisContext;
pub use diagnostics::{DiagnosticsSink, ModuleFailure, TracingSink};
pub use meta::{Meta, ModuleDescriptor, ModuleGate};
pub use module::{
    ActorFilter, BoxError, EventFilter, Module, ModulePhase, ModuleSlot, ModuleState, Peers,
};
pub use parser::Parser;
pub use result::{AnalysisResult, ResultBoard, display_order};

use thiserror::Error;

/// Fatal resolution failures: no valid execution order exists for the run.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("cyclic module dependency: {}", cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    #[error("module `{dependent}` depends on unknown handle `{missing}`")]
    UnresolvedDependency { dependent: String, missing: String },

    #[error("module `{dependent}` requires `{dependency}`, which does not apply to this run")]
    InapplicableDependency {
        dependent: String,
        dependency: String,
    },

    #[error("duplicate module handle `{handle}` (declared in `{first}` and `{second}`)")]
    DuplicateHandle {
        handle: String,
        first: String,
        second: String,
    },
}
