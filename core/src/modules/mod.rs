//! Built-in analysis modules and their bundles.
//!
//! Module *content* lives here; the contract they implement lives in
//! [`crate::analysis`]. Bundles are merged per run: `core_meta` applies to
//! every participant, role bundles add role-scoped modules whose gates
//! exclude them from other runs.

pub mod actors;
pub mod aoe;
pub mod cooldowns;
pub mod damage;
pub mod deaths;
pub mod uptime;
pub mod weaving;

pub use actors::Actors;
pub use aoe::AoeNormaliser;
pub use cooldowns::Cooldowns;
pub use damage::DamageDone;
pub use deaths::Deaths;
pub use uptime::Uptime;
pub use weaving::Weaving;

use crate::analysis::Meta;

/// Generic rules that apply to every run.
pub fn core_meta() -> Meta {
    Meta::new(
        "core",
        vec![
            actors::descriptor(),
            aoe::descriptor(),
            damage::descriptor(),
            deaths::descriptor(),
            uptime::descriptor(),
            weaving::descriptor(),
        ],
    )
}

/// Tank-scoped rules; gated out of non-tank runs by their descriptors.
pub fn tank_meta() -> Meta {
    Meta::new("tank", vec![cooldowns::descriptor()])
}
