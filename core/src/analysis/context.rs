//! Shared per-run context handed to every module.

use crate::combat_log::ActorId;
use crate::game_data::{Actor, EncounterInfo, Job, Role};

/// Run metadata and timing utilities shared by all modules.
///
/// Built once from the report's metadata before configuration and treated as
/// read-only for the rest of the run.
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    pub encounter: EncounterInfo,
    pub actors: Vec<Actor>,
    /// The participant this run analyses.
    pub subject: ActorId,
}

impl AnalysisContext {
    pub fn new(encounter: EncounterInfo, actors: Vec<Actor>, subject: ActorId) -> Self {
        Self {
            encounter,
            actors,
            subject,
        }
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    pub fn subject_actor(&self) -> Option<&Actor> {
        self.actor(self.subject)
    }

    pub fn subject_job(&self) -> Option<Job> {
        self.subject_actor().and_then(|a| a.job)
    }

    pub fn subject_role(&self) -> Option<Role> {
        self.subject_job().map(|j| j.role())
    }

    pub fn duration_ms(&self) -> i64 {
        self.encounter.duration_ms
    }

    /// Express a millisecond tally as a percentage of the encounter window.
    pub fn percent_of_duration(&self, millis: i64) -> f64 {
        if self.encounter.duration_ms <= 0 {
            return 0.0;
        }
        (millis as f64 / self.encounter.duration_ms as f64 * 100.0).clamp(0.0, 100.0)
    }
}
