//! Cooldown usage cadence for tank runs.
//!
//! Tracks the subject's off-global casts per ability and summarises use
//! counts and the mean gap between uses. Gated to tank runs; other roles
//! never instantiate it.

use std::any::Any;
use std::collections::HashMap;

use serde_json::json;
use vigil_types::{DisplayMode, formatting};

use crate::analysis::{
    AnalysisContext, AnalysisResult, BoxError, EventFilter, Module, ModuleDescriptor, ModuleGate,
    Peers, ResultBoard, display_order,
};
use crate::combat_log::{AbilityId, CombatEvent, EventKind, EventTag};
use crate::game_data::Role;

pub const HANDLE: &str = "cooldowns";

pub fn descriptor() -> ModuleDescriptor {
    ModuleDescriptor::new(HANDLE, Cooldowns::boxed).gated(ModuleGate::Role(Role::Tank))
}

#[derive(Debug, Default)]
pub struct Cooldowns {
    casts: HashMap<AbilityId, Vec<i64>>,
}

impl Cooldowns {
    pub fn boxed() -> Box<dyn Module> {
        Box::new(Self::default())
    }

    pub fn uses(&self, ability: AbilityId) -> usize {
        self.casts.get(&ability).map(Vec::len).unwrap_or(0)
    }

    fn mean_gap_ms(times: &[i64]) -> Option<i64> {
        if times.len() < 2 {
            return None;
        }
        let span = times.last()? - times.first()?;
        Some(span / (times.len() as i64 - 1))
    }
}

#[async_trait::async_trait]
impl Module for Cooldowns {
    fn event_filter(&self) -> Option<EventFilter> {
        let mut filter = EventFilter::kinds(&[EventTag::Cast]).from_subject();
        filter.predicate = Some(|ev| matches!(ev.kind, EventKind::Cast { gcd: false, .. }));
        Some(filter)
    }

    fn on_event(
        &mut self,
        event: &CombatEvent,
        _ctx: &AnalysisContext,
        _peers: &Peers<'_>,
    ) -> Result<(), BoxError> {
        if let EventKind::Cast { ability, gcd: false } = event.kind {
            self.casts.entry(ability).or_default().push(event.timestamp);
        }
        Ok(())
    }

    fn output(
        &self,
        _ctx: &AnalysisContext,
        _peers: &Peers<'_>,
        _board: &mut ResultBoard,
    ) -> Result<Option<AnalysisResult>, BoxError> {
        if self.casts.is_empty() {
            return Ok(None);
        }

        let mut abilities: Vec<(&AbilityId, &Vec<i64>)> = self.casts.iter().collect();
        abilities.sort_by_key(|(id, _)| id.0);

        let rows: Vec<serde_json::Value> = abilities
            .iter()
            .map(|(id, times)| {
                json!({
                    "ability": id.0,
                    "uses": times.len(),
                    "first_use": formatting::format_duration(times[0], false),
                    "mean_gap": Self::mean_gap_ms(times)
                        .map(|ms| formatting::format_duration(ms, false)),
                })
            })
            .collect();

        Ok(Some(AnalysisResult {
            handle: HANDLE.to_string(),
            title: "Cooldown usage".to_string(),
            order: display_order::DEFAULT,
            mode: DisplayMode::Collapsible,
            content: json!({ "abilities": rows }),
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
