//! Weaving analysis: off-global casts squeezed between GCD casts.
//!
//! Each GCD cast closes a "weave window"; the off-global casts seen since
//! the previous GCD cast are its weaves. Windows holding more than the
//! allowed count delay the next GCD and cost uptime, so they are flagged.

use std::any::Any;

use serde_json::json;
use vigil_types::{DisplayMode, Severity, SeverityTiers, Suggestion, formatting};

use super::actors::Actors;
use crate::analysis::{
    AnalysisContext, AnalysisResult, BoxError, EventFilter, Module, ModuleDescriptor, Peers,
    ResultBoard, display_order,
};
use crate::combat_log::{CombatEvent, EventKind, EventTag};

pub const HANDLE: &str = "weaving";

/// Off-global casts that fit in one window without clipping.
const MAX_WEAVES: usize = 2;

pub fn descriptor() -> ModuleDescriptor {
    ModuleDescriptor::new(HANDLE, Weaving::boxed).with_optional(&[super::actors::HANDLE])
}

#[derive(Debug, Clone)]
struct OverweaveIssue {
    timestamp: i64,
    weaves: usize,
}

#[derive(Debug, Default)]
pub struct Weaving {
    pending_weaves: usize,
    issues: Vec<OverweaveIssue>,
}

impl Weaving {
    pub fn boxed() -> Box<dyn Module> {
        Box::new(Self::default())
    }

    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }
}

#[async_trait::async_trait]
impl Module for Weaving {
    fn event_filter(&self) -> Option<EventFilter> {
        Some(EventFilter::kinds(&[EventTag::Cast]).from_subject())
    }

    fn on_event(
        &mut self,
        event: &CombatEvent,
        _ctx: &AnalysisContext,
        _peers: &Peers<'_>,
    ) -> Result<(), BoxError> {
        let EventKind::Cast { gcd, .. } = event.kind else {
            return Ok(());
        };

        if gcd {
            if self.pending_weaves > MAX_WEAVES {
                self.issues.push(OverweaveIssue {
                    timestamp: event.timestamp,
                    weaves: self.pending_weaves,
                });
            }
            self.pending_weaves = 0;
        } else {
            self.pending_weaves += 1;
        }
        Ok(())
    }

    fn output(
        &self,
        ctx: &AnalysisContext,
        peers: &Peers<'_>,
        board: &mut ResultBoard,
    ) -> Result<Option<AnalysisResult>, BoxError> {
        if self.issues.is_empty() {
            return Ok(None);
        }

        // Prefer the job reported in-log over the roster's, when present
        let job = peers
            .get_as::<Actors>(super::actors::HANDLE)
            .and_then(|a| a.job(ctx.subject))
            .or_else(|| ctx.subject_job());

        let tiers = SeverityTiers::new(vec![
            (1, Severity::Minor),
            (2, Severity::Medium),
            (5, Severity::Major),
        ]);
        if let Some(severity) = tiers.rate(self.issues.len() as i64) {
            board.add_suggestion(Suggestion {
                module: HANDLE.to_string(),
                content: format!(
                    "Avoid weaving more than {MAX_WEAVES} off-global actions between GCD casts; \
                     extra weaves delay your next GCD."
                ),
                why: format!("{} overweave window(s) detected.", self.issues.len()),
                severity,
            });
        }

        let issues: Vec<serde_json::Value> = self
            .issues
            .iter()
            .map(|issue| {
                json!({
                    "at": formatting::format_duration(issue.timestamp, true),
                    "weaves": issue.weaves,
                })
            })
            .collect();

        Ok(Some(AnalysisResult {
            handle: HANDLE.to_string(),
            title: "Weaving".to_string(),
            order: display_order::DEFAULT,
            mode: DisplayMode::Collapsible,
            content: json!({
                "job": job,
                "maxWeaves": MAX_WEAVES,
                "issues": issues,
            }),
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ModuleSlot;
    use crate::combat_log::{AbilityId, ActorId};
    use crate::game_data::EncounterInfo;

    fn ctx() -> AnalysisContext {
        AnalysisContext::new(
            EncounterInfo {
                id: 1,
                name: "t".into(),
                start_time: None,
                duration_ms: 60_000,
            },
            vec![],
            ActorId(1),
        )
    }

    fn cast(timestamp: i64, gcd: bool) -> CombatEvent {
        CombatEvent {
            timestamp,
            source: ActorId(1),
            target: None,
            kind: EventKind::Cast {
                ability: AbilityId(9),
                gcd,
            },
        }
    }

    #[test]
    fn double_weave_is_fine() {
        let mut weaving = Weaving::default();
        let ctx = ctx();
        let slots: Vec<ModuleSlot> = vec![];
        let peers = Peers::new(&slots);

        for ev in [cast(0, true), cast(500, false), cast(1_000, false), cast(2_500, true)] {
            weaving.on_event(&ev, &ctx, &peers).unwrap();
        }
        assert_eq!(weaving.issue_count(), 0);
    }

    #[test]
    fn triple_weave_is_flagged_at_closing_gcd() {
        let mut weaving = Weaving::default();
        let ctx = ctx();
        let slots: Vec<ModuleSlot> = vec![];
        let peers = Peers::new(&slots);

        for ev in [
            cast(0, true),
            cast(400, false),
            cast(800, false),
            cast(1_200, false),
            cast(3_000, true),
        ] {
            weaving.on_event(&ev, &ctx, &peers).unwrap();
        }

        assert_eq!(weaving.issue_count(), 1);
        assert_eq!(weaving.issues[0].timestamp, 3_000);
        assert_eq!(weaving.issues[0].weaves, 3);
    }

    #[test]
    fn trailing_weaves_without_closing_gcd_are_not_flagged() {
        let mut weaving = Weaving::default();
        let ctx = ctx();
        let slots: Vec<ModuleSlot> = vec![];
        let peers = Peers::new(&slots);

        for ev in [cast(0, true), cast(400, false), cast(800, false), cast(1_200, false)] {
            weaving.on_event(&ev, &ctx, &peers).unwrap();
        }
        assert_eq!(weaving.issue_count(), 0);
    }

    #[test]
    fn clean_run_produces_no_result() {
        let weaving = Weaving::default();
        let ctx = ctx();
        let slots: Vec<ModuleSlot> = vec![];
        let peers = Peers::new(&slots);
        let mut board = ResultBoard::new();

        assert!(weaving.output(&ctx, &peers, &mut board).unwrap().is_none());
        assert!(board.suggestions().is_empty());
    }
}
