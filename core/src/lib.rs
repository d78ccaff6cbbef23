pub mod analysis;
pub mod combat_log;
pub mod game_data;
pub mod modules;

// Re-exports for convenience
pub use analysis::{
    AnalysisContext, AnalysisResult, DiagnosticsSink, EventFilter, Meta, Module, ModuleDescriptor,
    ModuleGate, Parser, ResolveError,
};
pub use combat_log::{ActorId, CombatEvent, EventKind, EventTag};
pub use game_data::{Actor, EncounterInfo, Job, Role};
