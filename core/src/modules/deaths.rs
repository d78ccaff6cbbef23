//! Death reporting for the analysed participant.
//!
//! Reads death state from the `actors` roster module rather than counting
//! events itself; demonstrates a required dependency read through the peer
//! view. If `actors` failed mid-run this module degrades to no result.

use std::any::Any;

use serde_json::json;
use vigil_types::{DisplayMode, Severity, Suggestion, formatting};

use super::actors::Actors;
use crate::analysis::{
    AnalysisContext, AnalysisResult, BoxError, Module, ModuleDescriptor, Peers, ResultBoard,
    display_order,
};

pub const HANDLE: &str = "deaths";

pub fn descriptor() -> ModuleDescriptor {
    ModuleDescriptor::new(HANDLE, Deaths::boxed).with_dependencies(&[super::actors::HANDLE])
}

#[derive(Debug, Default)]
pub struct Deaths;

impl Deaths {
    pub fn boxed() -> Box<dyn Module> {
        Box::new(Self)
    }
}

#[async_trait::async_trait]
impl Module for Deaths {
    fn output(
        &self,
        ctx: &AnalysisContext,
        peers: &Peers<'_>,
        board: &mut ResultBoard,
    ) -> Result<Option<AnalysisResult>, BoxError> {
        // Degraded dependency: actors failed before reaching ready
        let Some(actors) = peers.get_as::<Actors>(super::actors::HANDLE) else {
            return Ok(None);
        };

        let times = actors.death_times(ctx.subject);
        if times.is_empty() {
            return Ok(None);
        }

        board.add_suggestion(Suggestion {
            module: HANDLE.to_string(),
            content: "Avoid dying. Every death costs uptime and a damage-down on revival."
                .to_string(),
            why: format!("{} death(s) during the encounter.", times.len()),
            severity: Severity::Major,
        });

        let formatted: Vec<String> = times
            .iter()
            .map(|&t| formatting::format_duration(t, false))
            .collect();

        Ok(Some(AnalysisResult {
            handle: HANDLE.to_string(),
            title: "Deaths".to_string(),
            order: display_order::TOP,
            mode: DisplayMode::Full,
            content: json!({
                "count": times.len(),
                "times": formatted,
            }),
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
