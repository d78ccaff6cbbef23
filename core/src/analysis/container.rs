//! Dependency container: resolution order and module instantiation.
//!
//! Resolution is a depth-first topological sort with three-colour marking.
//! Roots are visited in declaration order and each module's declared
//! dependencies are visited in declared order, so mutually-independent
//! modules keep their declaration order and repeated calls with the same
//! input produce the same sequence.

use std::collections::HashMap;

use super::ResolveError;
use super::meta::ModuleDescriptor;
use super::module::{ModuleSlot, ModuleState};
use crate::game_data::Job;

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Resolve a merged descriptor set into a topologically valid order.
///
/// Returns indices into `descriptors` such that every dependency appears
/// strictly before its dependents. Optional dependencies order the output
/// when present but are not required to exist.
pub fn resolve(descriptors: &[ModuleDescriptor]) -> Result<Vec<usize>, ResolveError> {
    let index: HashMap<&str, usize> = descriptors
        .iter()
        .enumerate()
        .map(|(i, d)| (d.handle, i))
        .collect();

    let mut marks = vec![Mark::Unvisited; descriptors.len()];
    let mut path: Vec<usize> = Vec::new();
    let mut order: Vec<usize> = Vec::with_capacity(descriptors.len());

    for root in 0..descriptors.len() {
        visit(root, descriptors, &index, &mut marks, &mut path, &mut order)?;
    }

    Ok(order)
}

fn visit(
    idx: usize,
    descriptors: &[ModuleDescriptor],
    index: &HashMap<&str, usize>,
    marks: &mut [Mark],
    path: &mut Vec<usize>,
    order: &mut Vec<usize>,
) -> Result<(), ResolveError> {
    match marks[idx] {
        Mark::Done => return Ok(()),
        Mark::InProgress => {
            // Revisiting an in-progress node closes a cycle; report the
            // chain from its first occurrence back to itself.
            let start = path.iter().position(|&p| p == idx).unwrap_or(0);
            let mut cycle: Vec<String> = path[start..]
                .iter()
                .map(|&p| descriptors[p].handle.to_string())
                .collect();
            cycle.push(descriptors[idx].handle.to_string());
            return Err(ResolveError::CyclicDependency { cycle });
        }
        Mark::Unvisited => {}
    }

    marks[idx] = Mark::InProgress;
    path.push(idx);

    let descriptor = &descriptors[idx];
    for dep in descriptor.dependencies {
        let Some(&dep_idx) = index.get(dep) else {
            return Err(ResolveError::UnresolvedDependency {
                dependent: descriptor.handle.to_string(),
                missing: dep.to_string(),
            });
        };
        visit(dep_idx, descriptors, index, marks, path, order)?;
    }
    for dep in descriptor.optional_dependencies {
        if let Some(&dep_idx) = index.get(dep) {
            visit(dep_idx, descriptors, index, marks, path, order)?;
        }
    }

    path.pop();
    marks[idx] = Mark::Done;
    order.push(idx);
    Ok(())
}

/// Resolve, gate, and instantiate a descriptor set.
///
/// Modules whose gate rejects the subject's job are excluded from the
/// instance set; a module *requiring* an excluded module is a configuration
/// error. Optional dependencies on excluded modules are simply absent at
/// runtime. Each surviving module is constructed exactly once, dependencies
/// strictly before dependents.
pub fn instantiate(
    descriptors: &[ModuleDescriptor],
    subject_job: Option<Job>,
) -> Result<Vec<ModuleSlot>, ResolveError> {
    let order = resolve(descriptors)?;

    let applicable: Vec<bool> = descriptors
        .iter()
        .map(|d| d.gate.admits(subject_job))
        .collect();

    let index: HashMap<&str, usize> = descriptors
        .iter()
        .enumerate()
        .map(|(i, d)| (d.handle, i))
        .collect();

    for (i, descriptor) in descriptors.iter().enumerate() {
        if !applicable[i] {
            continue;
        }
        for dep in descriptor.dependencies {
            if let Some(&dep_idx) = index.get(dep)
                && !applicable[dep_idx]
            {
                return Err(ResolveError::InapplicableDependency {
                    dependent: descriptor.handle.to_string(),
                    dependency: dep.to_string(),
                });
            }
        }
    }

    let slots: Vec<ModuleSlot> = order
        .into_iter()
        .filter(|&i| applicable[i])
        .map(|i| ModuleSlot::new(descriptors[i], (descriptors[i].factory)()))
        .collect();

    debug_assert!(slots.iter().all(|s| s.state == ModuleState::Constructed));
    tracing::debug!(
        "[CONTAINER] resolved {} module(s): {:?}",
        slots.len(),
        slots.iter().map(|s| s.handle()).collect::<Vec<_>>()
    );

    Ok(slots)
}
