//! Static game data: jobs, roles, and per-run metadata types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::combat_log::ActorId;

/// Broad combat role, used to gate role-scoped analysis modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Tank,
    Healer,
    Melee,
    PhysicalRanged,
    Caster,
}

/// Playable job of the analysed participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Job {
    Paladin,
    Warrior,
    DarkKnight,
    WhiteMage,
    Scholar,
    Monk,
    Dragoon,
    Reaper,
    Bard,
    Machinist,
    BlackMage,
    RedMage,
}

impl Job {
    pub fn role(&self) -> Role {
        match self {
            Job::Paladin | Job::Warrior | Job::DarkKnight => Role::Tank,
            Job::WhiteMage | Job::Scholar => Role::Healer,
            Job::Monk | Job::Dragoon | Job::Reaper => Role::Melee,
            Job::Bard | Job::Machinist => Role::PhysicalRanged,
            Job::BlackMage | Job::RedMage => Role::Caster,
        }
    }
}

/// One participant in the encounter, from the report's actor roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<Job>,
    /// False for enemies and neutral NPCs.
    #[serde(default)]
    pub friendly: bool,
}

/// Identity and time window of the encounter being analysed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterInfo {
    pub id: u64,
    pub name: String,
    /// Wall-clock start, when the data source knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveDateTime>,
    /// Length of the analysed window in milliseconds.
    pub duration_ms: i64,
}
