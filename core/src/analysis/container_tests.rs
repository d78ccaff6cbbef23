//! Tests for dependency resolution and instantiation.

use super::container::{instantiate, resolve};
use super::meta::{ModuleDescriptor, ModuleGate};
use super::module::Module;
use super::ResolveError;
use crate::game_data::{Job, Role};

struct Noop;

#[async_trait::async_trait]
impl Module for Noop {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

fn noop() -> Box<dyn Module> {
    Box::new(Noop)
}

fn descriptor(handle: &'static str, deps: &'static [&'static str]) -> ModuleDescriptor {
    ModuleDescriptor::new(handle, noop).with_dependencies(deps)
}

fn handles(descriptors: &[ModuleDescriptor], order: &[usize]) -> Vec<&'static str> {
    order.iter().map(|&i| descriptors[i].handle).collect()
}

#[test]
fn dependency_precedes_dependent() {
    let set = vec![
        descriptor("a", &[]),
        descriptor("b", &["a"]),
        descriptor("c", &["a"]),
    ];
    let order = resolve(&set).unwrap();
    assert_eq!(handles(&set, &order), vec!["a", "b", "c"]);
}

#[test]
fn independent_modules_keep_declaration_order() {
    let set = vec![
        descriptor("x", &[]),
        descriptor("y", &[]),
        descriptor("z", &[]),
    ];
    let order = resolve(&set).unwrap();
    assert_eq!(handles(&set, &order), vec!["x", "y", "z"]);
}

#[test]
fn diamond_resolves_depth_first() {
    // d -> {b, c} -> a, declared dependent-first
    let set = vec![
        descriptor("d", &["b", "c"]),
        descriptor("b", &["a"]),
        descriptor("c", &["a"]),
        descriptor("a", &[]),
    ];
    let order = resolve(&set).unwrap();
    let sorted = handles(&set, &order);
    let pos = |h: &str| sorted.iter().position(|&s| s == h).unwrap();
    assert!(pos("a") < pos("b"));
    assert!(pos("a") < pos("c"));
    assert!(pos("b") < pos("d"));
    assert!(pos("c") < pos("d"));
    // Depth-first from declaration order is fully deterministic
    assert_eq!(sorted, vec!["a", "b", "c", "d"]);
}

#[test]
fn resolve_is_deterministic_across_calls() {
    let set = vec![
        descriptor("d", &["b", "c"]),
        descriptor("b", &["a"]),
        descriptor("c", &["a"]),
        descriptor("a", &[]),
    ];
    assert_eq!(resolve(&set).unwrap(), resolve(&set).unwrap());
}

#[test]
fn cycle_is_reported_with_its_handles() {
    let set = vec![
        descriptor("a", &["b"]),
        descriptor("b", &["c"]),
        descriptor("c", &["a"]),
    ];
    match resolve(&set).unwrap_err() {
        ResolveError::CyclicDependency { cycle } => {
            assert_eq!(cycle.first(), cycle.last());
            for handle in ["a", "b", "c"] {
                assert!(cycle.iter().any(|h| h == handle), "missing {handle} in {cycle:?}");
            }
        }
        other => panic!("expected CyclicDependency, got {other:?}"),
    }
}

#[test]
fn self_dependency_is_a_cycle() {
    let set = vec![descriptor("a", &["a"])];
    match resolve(&set).unwrap_err() {
        ResolveError::CyclicDependency { cycle } => assert_eq!(cycle, vec!["a", "a"]),
        other => panic!("expected CyclicDependency, got {other:?}"),
    }
}

#[test]
fn unknown_dependency_fails_resolution() {
    let set = vec![descriptor("a", &[]), descriptor("b", &["ghost"])];
    match resolve(&set).unwrap_err() {
        ResolveError::UnresolvedDependency { dependent, missing } => {
            assert_eq!(dependent, "b");
            assert_eq!(missing, "ghost");
        }
        other => panic!("expected UnresolvedDependency, got {other:?}"),
    }
}

#[test]
fn optional_dependency_orders_when_present() {
    let set = vec![
        ModuleDescriptor::new("b", noop).with_optional(&["a"]),
        descriptor("a", &[]),
    ];
    let order = resolve(&set).unwrap();
    assert_eq!(handles(&set, &order), vec!["a", "b"]);
}

#[test]
fn optional_dependency_may_be_missing() {
    let set = vec![ModuleDescriptor::new("b", noop).with_optional(&["ghost"])];
    let order = resolve(&set).unwrap();
    assert_eq!(order, vec![0]);
}

#[test]
fn gated_module_is_excluded_from_instances() {
    let set = vec![
        descriptor("a", &[]),
        ModuleDescriptor::new("tank_only", noop).gated(ModuleGate::Role(Role::Tank)),
    ];
    let slots = instantiate(&set, Some(Job::Reaper)).unwrap();
    let handles: Vec<_> = slots.iter().map(|s| s.handle()).collect();
    assert_eq!(handles, vec!["a"]);

    let slots = instantiate(&set, Some(Job::Paladin)).unwrap();
    let handles: Vec<_> = slots.iter().map(|s| s.handle()).collect();
    assert_eq!(handles, vec!["a", "tank_only"]);
}

#[test]
fn required_dependency_on_gated_module_is_an_error() {
    let set = vec![
        ModuleDescriptor::new("tank_only", noop).gated(ModuleGate::Role(Role::Tank)),
        descriptor("b", &["tank_only"]),
    ];
    match instantiate(&set, Some(Job::Reaper)).unwrap_err() {
        ResolveError::InapplicableDependency { dependent, dependency } => {
            assert_eq!(dependent, "b");
            assert_eq!(dependency, "tank_only");
        }
        other => panic!("expected InapplicableDependency, got {other:?}"),
    }
}

#[test]
fn optional_dependency_on_gated_module_is_tolerated() {
    let set = vec![
        ModuleDescriptor::new("tank_only", noop).gated(ModuleGate::Role(Role::Tank)),
        ModuleDescriptor::new("b", noop).with_optional(&["tank_only"]),
    ];
    let slots = instantiate(&set, Some(Job::Reaper)).unwrap();
    let handles: Vec<_> = slots.iter().map(|s| s.handle()).collect();
    assert_eq!(handles, vec!["b"]);
}

#[test]
fn gated_dependent_does_not_drag_its_dependencies_into_error() {
    // The gated module's own requirements don't matter once it is excluded
    let set = vec![
        ModuleDescriptor::new("healer_only", noop).gated(ModuleGate::Role(Role::Healer)),
        ModuleDescriptor::new("tank_only", noop)
            .with_dependencies(&["healer_only"])
            .gated(ModuleGate::Role(Role::Tank)),
    ];
    let slots = instantiate(&set, Some(Job::Reaper)).unwrap();
    assert!(slots.is_empty());
}
