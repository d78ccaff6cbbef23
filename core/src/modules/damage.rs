//! Damage dealt by the analysed participant.
//!
//! Sums single-target damage from the subject after AoE splitting has run,
//! so multi-target events contribute one tally per struck target. Produces
//! a compact total and the crit rate over all counted hits.

use std::any::Any;

use serde_json::json;
use vigil_types::{DisplayMode, formatting};

use crate::analysis::{
    AnalysisContext, AnalysisResult, BoxError, EventFilter, Module, ModuleDescriptor, Peers,
    ResultBoard, display_order,
};
use crate::combat_log::{CombatEvent, EventKind, EventTag};

pub const HANDLE: &str = "damage";

pub fn descriptor() -> ModuleDescriptor {
    ModuleDescriptor::new(HANDLE, DamageDone::boxed)
}

#[derive(Debug, Default)]
pub struct DamageDone {
    total: i64,
    hits: u64,
    crits: u64,
}

impl DamageDone {
    pub fn boxed() -> Box<dyn Module> {
        Box::new(Self::default())
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    fn crit_percent(&self) -> f64 {
        if self.hits == 0 {
            return 0.0;
        }
        self.crits as f64 / self.hits as f64 * 100.0
    }
}

#[async_trait::async_trait]
impl Module for DamageDone {
    fn event_filter(&self) -> Option<EventFilter> {
        Some(EventFilter::kinds(&[EventTag::Damage]).from_subject())
    }

    fn on_event(
        &mut self,
        event: &CombatEvent,
        _ctx: &AnalysisContext,
        _peers: &Peers<'_>,
    ) -> Result<(), BoxError> {
        if let EventKind::Damage { amount, critical, .. } = event.kind {
            self.total += amount;
            self.hits += 1;
            if critical {
                self.crits += 1;
            }
        }
        Ok(())
    }

    fn output(
        &self,
        _ctx: &AnalysisContext,
        _peers: &Peers<'_>,
        _board: &mut ResultBoard,
    ) -> Result<Option<AnalysisResult>, BoxError> {
        if self.hits == 0 {
            return Ok(None);
        }

        Ok(Some(AnalysisResult {
            handle: HANDLE.to_string(),
            title: "Damage dealt".to_string(),
            order: display_order::DEFAULT,
            mode: DisplayMode::Collapsible,
            content: json!({
                "total": formatting::format_compact(self.total),
                "hits": self.hits,
                "crit_rate": formatting::format_percent(self.crit_percent()),
            }),
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
