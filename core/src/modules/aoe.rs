//! AoE splitting normaliser.
//!
//! Downstream modules reason about single-target damage only. This module
//! rewrites every multi-target `AoeDamage` event into one `Damage` event per
//! struck target, at the same timestamp, before any domain logic runs.

use std::any::Any;

use crate::analysis::{BoxError, Module, ModuleDescriptor};
use crate::combat_log::{CombatEvent, EventKind};

pub const HANDLE: &str = "aoe";

pub fn descriptor() -> ModuleDescriptor {
    ModuleDescriptor::new(HANDLE, AoeNormaliser::boxed)
}

#[derive(Debug, Default)]
pub struct AoeNormaliser;

impl AoeNormaliser {
    pub fn boxed() -> Box<dyn Module> {
        Box::new(Self)
    }
}

#[async_trait::async_trait]
impl Module for AoeNormaliser {
    fn normalise(&mut self, events: Vec<CombatEvent>) -> Result<Vec<CombatEvent>, BoxError> {
        let mut out = Vec::with_capacity(events.len());
        for event in events {
            match event.kind {
                EventKind::AoeDamage { ability, hits } => {
                    for hit in hits {
                        out.push(CombatEvent {
                            timestamp: event.timestamp,
                            source: event.source,
                            target: Some(hit.target),
                            kind: EventKind::Damage {
                                ability,
                                amount: hit.amount,
                                critical: hit.critical,
                            },
                        });
                    }
                }
                _ => out.push(event),
            }
        }
        Ok(out)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
