//! Actor roster tracking.
//!
//! Consumes `CombatantInfo` snapshots and `Death` events to maintain
//! per-actor state for the run. Produces no result of its own; it exists as
//! a dependency target for modules that need roster or death-state data.

use std::any::Any;
use std::collections::HashMap;

use crate::analysis::{AnalysisContext, BoxError, EventFilter, Module, ModuleDescriptor, Peers};
use crate::combat_log::{ActorId, CombatEvent, EventKind, EventTag};
use crate::game_data::Job;

pub const HANDLE: &str = "actors";

pub fn descriptor() -> ModuleDescriptor {
    ModuleDescriptor::new(HANDLE, Actors::boxed)
}

#[derive(Debug, Default)]
pub struct Actors {
    jobs: HashMap<ActorId, Job>,
    names: HashMap<ActorId, String>,
    deaths: HashMap<ActorId, u32>,
    death_times: HashMap<ActorId, Vec<i64>>,
}

impl Actors {
    pub fn boxed() -> Box<dyn Module> {
        Box::new(Self::default())
    }

    /// Job reported by the actor's combatant-info snapshot, if one was seen.
    pub fn job(&self, id: ActorId) -> Option<Job> {
        self.jobs.get(&id).copied()
    }

    pub fn name(&self, id: ActorId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn deaths(&self, id: ActorId) -> u32 {
        self.deaths.get(&id).copied().unwrap_or(0)
    }

    /// Encounter-relative times at which the actor died.
    pub fn death_times(&self, id: ActorId) -> &[i64] {
        self.death_times.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[async_trait::async_trait]
impl Module for Actors {
    fn event_filter(&self) -> Option<EventFilter> {
        Some(EventFilter::kinds(&[EventTag::CombatantInfo, EventTag::Death]))
    }

    fn on_event(
        &mut self,
        event: &CombatEvent,
        _ctx: &AnalysisContext,
        _peers: &Peers<'_>,
    ) -> Result<(), BoxError> {
        match &event.kind {
            EventKind::CombatantInfo { name, job } => {
                self.names.insert(event.source, name.clone());
                if let Some(job) = job {
                    self.jobs.insert(event.source, *job);
                }
            }
            EventKind::Death => {
                *self.deaths.entry(event.source).or_default() += 1;
                self.death_times
                    .entry(event.source)
                    .or_default()
                    .push(event.timestamp);
            }
            _ => {}
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
