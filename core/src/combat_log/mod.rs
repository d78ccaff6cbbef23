//! Combat log event model.
//!
//! `CombatEvent` is the immutable value type flowing through the analysis
//! pipeline: an encounter-relative timestamp, source/target actor ids, and a
//! closed payload enum for the event kind. Modules never mutate events during
//! consumption; a module that needs to rewrite the stream does so in the
//! normalisation phase by producing a new sequence.

use serde::{Deserialize, Serialize};

/// Stable identifier for one actor (player, pet, or enemy) within a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub u32);

/// Identifier for an action/ability as logged by the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbilityId(pub u32);

/// Identifier for a status effect (buff/debuff) as logged by the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusId(pub u32);

/// One timestamped occurrence in the combat log.
///
/// `timestamp` is milliseconds since encounter start and is non-decreasing
/// across the sequence handed to the pipeline. `target` is absent for events
/// with no meaningful target (deaths, combatant info).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatEvent {
    pub timestamp: i64,
    pub source: ActorId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<ActorId>,
    pub kind: EventKind,
}

/// One struck target inside a multi-target damage event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AoeHit {
    pub target: ActorId,
    pub amount: i64,
    #[serde(default)]
    pub critical: bool,
}

/// Closed payload set for combat events.
///
/// Multi-target damage arrives as a single `AoeDamage` event; the core aoe
/// normaliser splits it into per-target `Damage` events before any module's
/// domain logic sees the stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    Damage {
        ability: AbilityId,
        amount: i64,
        #[serde(default)]
        critical: bool,
    },
    AoeDamage {
        ability: AbilityId,
        hits: Vec<AoeHit>,
    },
    Heal {
        ability: AbilityId,
        amount: i64,
        #[serde(default)]
        overheal: i64,
    },
    ApplyBuff {
        status: StatusId,
    },
    RemoveBuff {
        status: StatusId,
    },
    Cast {
        ability: AbilityId,
        /// Whether the cast occupies the global cooldown.
        #[serde(default)]
        gcd: bool,
    },
    /// `source` is the actor that died.
    Death,
    /// Initial state snapshot for `source`, emitted once near the start.
    CombatantInfo {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        job: Option<crate::game_data::Job>,
    },
}

/// Field-less discriminant for `EventKind`, used by event filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTag {
    Damage,
    AoeDamage,
    Heal,
    ApplyBuff,
    RemoveBuff,
    Cast,
    Death,
    CombatantInfo,
}

impl CombatEvent {
    pub fn tag(&self) -> EventTag {
        match self.kind {
            EventKind::Damage { .. } => EventTag::Damage,
            EventKind::AoeDamage { .. } => EventTag::AoeDamage,
            EventKind::Heal { .. } => EventTag::Heal,
            EventKind::ApplyBuff { .. } => EventTag::ApplyBuff,
            EventKind::RemoveBuff { .. } => EventTag::RemoveBuff,
            EventKind::Cast { .. } => EventTag::Cast,
            EventKind::Death => EventTag::Death,
            EventKind::CombatantInfo { .. } => EventTag::CombatantInfo,
        }
    }
}

/// Check that a sequence respects the non-decreasing timestamp invariant.
pub fn is_time_ordered(events: &[CombatEvent]) -> bool {
    events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(timestamp: i64, kind: EventKind) -> CombatEvent {
        CombatEvent {
            timestamp,
            source: ActorId(1),
            target: None,
            kind,
        }
    }

    #[test]
    fn tag_matches_kind() {
        let ev = event(0, EventKind::Death);
        assert_eq!(ev.tag(), EventTag::Death);
    }

    #[test]
    fn time_order_check() {
        let ordered = vec![event(0, EventKind::Death), event(5, EventKind::Death)];
        assert!(is_time_ordered(&ordered));

        let equal = vec![event(5, EventKind::Death), event(5, EventKind::Death)];
        assert!(is_time_ordered(&equal));

        let broken = vec![event(5, EventKind::Death), event(0, EventKind::Death)];
        assert!(!is_time_ordered(&broken));
    }

    #[test]
    fn event_kind_json_shape() {
        let ev = event(
            12,
            EventKind::Damage {
                ability: AbilityId(100),
                amount: 2500,
                critical: true,
            },
        );
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["kind"]["type"], "damage");
        assert_eq!(json["kind"]["amount"], 2500);
        let back: CombatEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, ev);
    }
}
