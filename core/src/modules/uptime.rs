//! Status uptime tracking for the analysed participant.
//!
//! Open-interval accumulation: an `ApplyBuff` from the subject opens an
//! interval for that status, the matching `RemoveBuff` closes it, and
//! anything still open at the end of the run is closed at the encounter's
//! end. Uptimes feed a checklist rule plus a per-status payload.

use std::any::Any;
use std::collections::HashMap;

use serde_json::json;
use vigil_types::{ChecklistRequirement, ChecklistRule, DisplayMode, formatting};

use crate::analysis::{
    AnalysisContext, AnalysisResult, BoxError, EventFilter, Module, ModuleDescriptor, Peers,
    ResultBoard, display_order,
};
use crate::combat_log::{CombatEvent, EventKind, EventTag, StatusId};

pub const HANDLE: &str = "uptime";

/// Uptime every tracked status should reach.
const UPTIME_TARGET_PERCENT: f64 = 90.0;

pub fn descriptor() -> ModuleDescriptor {
    ModuleDescriptor::new(HANDLE, Uptime::boxed)
}

#[derive(Debug, Default)]
struct Interval {
    active_since: Option<i64>,
    total_ms: i64,
}

impl Interval {
    fn open(&mut self, at: i64) {
        // Re-application while active refreshes, it does not stack intervals
        if self.active_since.is_none() {
            self.active_since = Some(at);
        }
    }

    fn close(&mut self, at: i64) {
        if let Some(since) = self.active_since.take() {
            self.total_ms += (at - since).max(0);
        }
    }

    fn total_at(&self, end: i64) -> i64 {
        match self.active_since {
            Some(since) => self.total_ms + (end - since).max(0),
            None => self.total_ms,
        }
    }
}

#[derive(Debug, Default)]
pub struct Uptime {
    statuses: HashMap<StatusId, Interval>,
}

impl Uptime {
    pub fn boxed() -> Box<dyn Module> {
        Box::new(Self::default())
    }

    /// Accumulated uptime for one status, intervals still open counted up
    /// to `end`.
    pub fn uptime_ms(&self, status: StatusId, end: i64) -> i64 {
        self.statuses
            .get(&status)
            .map(|i| i.total_at(end))
            .unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl Module for Uptime {
    fn event_filter(&self) -> Option<EventFilter> {
        Some(EventFilter::kinds(&[EventTag::ApplyBuff, EventTag::RemoveBuff]).from_subject())
    }

    fn on_event(
        &mut self,
        event: &CombatEvent,
        _ctx: &AnalysisContext,
        _peers: &Peers<'_>,
    ) -> Result<(), BoxError> {
        match event.kind {
            EventKind::ApplyBuff { status } => {
                self.statuses.entry(status).or_default().open(event.timestamp);
            }
            EventKind::RemoveBuff { status } => {
                if let Some(interval) = self.statuses.get_mut(&status) {
                    interval.close(event.timestamp);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn output(
        &self,
        ctx: &AnalysisContext,
        _peers: &Peers<'_>,
        board: &mut ResultBoard,
    ) -> Result<Option<AnalysisResult>, BoxError> {
        if self.statuses.is_empty() {
            return Ok(None);
        }

        let end = ctx.duration_ms();
        let mut statuses: Vec<(StatusId, i64)> = self
            .statuses
            .iter()
            .map(|(&id, interval)| (id, interval.total_at(end)))
            .collect();
        statuses.sort_by_key(|(id, _)| id.0);

        let requirements: Vec<ChecklistRequirement> = statuses
            .iter()
            .map(|&(id, ms)| ChecklistRequirement {
                name: format!("Status {} uptime", id.0),
                percent: ctx.percent_of_duration(ms),
            })
            .collect();

        board.add_rule(ChecklistRule {
            module: HANDLE.to_string(),
            name: "Keep your effects active".to_string(),
            description: "Effects you apply only contribute while they are running; \
                          refresh them before they fall off."
                .to_string(),
            target: UPTIME_TARGET_PERCENT,
            requirements,
        });

        let payload: Vec<serde_json::Value> = statuses
            .iter()
            .map(|&(id, ms)| {
                json!({
                    "status": id.0,
                    "uptime": formatting::format_duration(ms, false),
                    "percent": ctx.percent_of_duration(ms),
                })
            })
            .collect();

        Ok(Some(AnalysisResult {
            handle: HANDLE.to_string(),
            title: "Status uptimes".to_string(),
            order: display_order::DEFAULT,
            mode: DisplayMode::Collapsible,
            content: json!({ "statuses": payload }),
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
