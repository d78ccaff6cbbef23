//! Module descriptor bundles and their merge.
//!
//! A `Meta` is a named, composable collection of module descriptors for one
//! analysis scope (generic core rules, an encounter, a role or job). Bundles
//! are defined statically, merged per run, and never hold instances.

use super::ResolveError;
use super::module::Module;
use crate::game_data::{Job, Role};

/// Applicability gate evaluated against the analysed participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleGate {
    Always,
    /// Applies only when the subject's job maps to this role.
    Role(Role),
    /// Applies only when the subject plays this job.
    Job(Job),
}

impl ModuleGate {
    pub fn admits(&self, job: Option<Job>) -> bool {
        match self {
            ModuleGate::Always => true,
            ModuleGate::Role(role) => job.map(|j| j.role()) == Some(*role),
            ModuleGate::Job(wanted) => job == Some(*wanted),
        }
    }
}

/// Identifies a module constructor, its stable handle, and its declared
/// dependencies. Created at bundle-definition time and never mutated.
#[derive(Clone, Copy)]
pub struct ModuleDescriptor {
    /// Stable string identifier, unique within one merged bundle set.
    pub handle: &'static str,
    /// Handles this module requires. Resolution fails if any is missing or
    /// gated out of the run.
    pub dependencies: &'static [&'static str],
    /// Handles this module can use but tolerates being absent.
    pub optional_dependencies: &'static [&'static str],
    pub gate: ModuleGate,
    pub factory: fn() -> Box<dyn Module>,
}

impl ModuleDescriptor {
    pub const fn new(handle: &'static str, factory: fn() -> Box<dyn Module>) -> Self {
        Self {
            handle,
            dependencies: &[],
            optional_dependencies: &[],
            gate: ModuleGate::Always,
            factory,
        }
    }

    pub const fn with_dependencies(mut self, dependencies: &'static [&'static str]) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub const fn with_optional(mut self, optional: &'static [&'static str]) -> Self {
        self.optional_dependencies = optional;
        self
    }

    pub const fn gated(mut self, gate: ModuleGate) -> Self {
        self.gate = gate;
        self
    }
}

impl std::fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("handle", &self.handle)
            .field("dependencies", &self.dependencies)
            .field("optional_dependencies", &self.optional_dependencies)
            .field("gate", &self.gate)
            .finish()
    }
}

/// A named bundle of module descriptors.
#[derive(Debug, Clone)]
pub struct Meta {
    pub name: &'static str,
    descriptors: Vec<ModuleDescriptor>,
}

impl Meta {
    pub fn new(name: &'static str, descriptors: Vec<ModuleDescriptor>) -> Self {
        Self { name, descriptors }
    }

    pub fn descriptors(&self) -> &[ModuleDescriptor] {
        &self.descriptors
    }

    /// Merge bundles into one declaration-ordered descriptor set.
    ///
    /// The merge is associative and order-independent in outcome: the same
    /// handle declared twice (across bundles or within one) fails regardless
    /// of merge order.
    pub fn merge_all(bundles: &[Meta]) -> Result<Vec<ModuleDescriptor>, ResolveError> {
        let mut merged: Vec<ModuleDescriptor> = Vec::new();
        let mut owners: Vec<(&'static str, &'static str)> = Vec::new();

        for bundle in bundles {
            for descriptor in &bundle.descriptors {
                if let Some((_, first)) = owners.iter().find(|(h, _)| *h == descriptor.handle) {
                    return Err(ResolveError::DuplicateHandle {
                        handle: descriptor.handle.to_string(),
                        first: first.to_string(),
                        second: bundle.name.to_string(),
                    });
                }
                owners.push((descriptor.handle, bundle.name));
                merged.push(*descriptor);
            }
        }

        Ok(merged)
    }
}
