//! The module contract: lifecycle, event filters, and peer access.

use std::any::Any;
use std::fmt;

use async_trait::async_trait;

use super::context::AnalysisContext;
use super::meta::ModuleDescriptor;
use super::result::{AnalysisResult, ResultBoard};
use crate::combat_log::{ActorId, CombatEvent, EventTag};

/// Error payload carried out of a module phase. Wrapped with handle and
/// phase information at the parser's dispatch boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which lifecycle phase a module error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModulePhase {
    Configure,
    Normalise,
    Hook,
    Output,
}

impl fmt::Display for ModulePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModulePhase::Configure => "configure",
            ModulePhase::Normalise => "normalise",
            ModulePhase::Hook => "event hook",
            ModulePhase::Output => "output",
        };
        f.write_str(name)
    }
}

/// Per-instance lifecycle state.
///
/// `Constructed → Configuring → Ready → Consuming → Completed`, no state is
/// skipped. An error in any phase moves the module to `Failed` and it stays
/// there: later phases skip it and peers see it as never having been ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    Constructed,
    Configuring,
    Ready,
    Consuming,
    Completed,
    Failed(ModulePhase),
}

impl ModuleState {
    /// Whether peers may read this module's accessors.
    pub fn is_readable(&self) -> bool {
        matches!(
            self,
            ModuleState::Ready | ModuleState::Consuming | ModuleState::Completed
        )
    }
}

/// Filter on event source/target actors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActorFilter {
    #[default]
    Any,
    /// The analysed participant.
    Subject,
    Actor(ActorId),
}

impl ActorFilter {
    fn matches(&self, actor: Option<ActorId>, subject: ActorId) -> bool {
        match self {
            ActorFilter::Any => true,
            ActorFilter::Subject => actor == Some(subject),
            ActorFilter::Actor(id) => actor == Some(*id),
        }
    }
}

/// A module's declared interest in event subsets.
///
/// Collected once per module after configuration; during consumption every
/// event is dispatched to the modules whose filter matches, in dependency
/// order.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Matching event kinds. Empty matches every kind.
    pub kinds: Vec<EventTag>,
    pub source: ActorFilter,
    pub target: ActorFilter,
    /// Extra payload condition, applied after the structural checks.
    pub predicate: Option<fn(&CombatEvent) -> bool>,
}

impl EventFilter {
    pub fn kinds(kinds: &[EventTag]) -> Self {
        Self {
            kinds: kinds.to_vec(),
            ..Self::default()
        }
    }

    pub fn from_subject(mut self) -> Self {
        self.source = ActorFilter::Subject;
        self
    }

    pub fn on_subject(mut self) -> Self {
        self.target = ActorFilter::Subject;
        self
    }

    pub fn matches(&self, event: &CombatEvent, subject: ActorId) -> bool {
        if !self.kinds.is_empty() && !self.kinds.contains(&event.tag()) {
            return false;
        }
        if !self.source.matches(Some(event.source), subject) {
            return false;
        }
        if !self.target.matches(event.target, subject) {
            return false;
        }
        self.predicate.is_none_or(|p| p(event))
    }
}

/// The unit of analysis: a stateful object with a declared dependency set
/// and a lifecycle driven by the parser.
///
/// Default implementations make the minimal module a no-op: configuration
/// succeeds immediately, normalisation is the identity, no events are
/// requested, and no result is produced.
#[async_trait]
pub trait Module: Send {
    /// Asynchronous setup (e.g. fetching supplementary per-run data).
    /// Called once, after instantiation, before any event reaches the module.
    async fn configure(&mut self, _ctx: &AnalysisContext) -> Result<(), BoxError> {
        Ok(())
    }

    /// Rewrite the event stream before any module's domain logic sees it.
    /// Composes as a pipeline in dependency order; the default passes the
    /// sequence through unchanged.
    fn normalise(&mut self, events: Vec<CombatEvent>) -> Result<Vec<CombatEvent>, BoxError> {
        Ok(events)
    }

    /// Declared interest in event subsets. `None` means the module receives
    /// no event hooks at all.
    fn event_filter(&self) -> Option<EventFilter> {
        None
    }

    /// Synchronous per-event callback. Must not block or suspend; long
    /// running work is disallowed here.
    fn on_event(
        &mut self,
        _event: &CombatEvent,
        _ctx: &AnalysisContext,
        _peers: &Peers<'_>,
    ) -> Result<(), BoxError> {
        Ok(())
    }

    /// Produce this module's declared result, contribute to the shared
    /// board, or neither. Called once after all events are consumed.
    fn output(
        &self,
        _ctx: &AnalysisContext,
        _peers: &Peers<'_>,
        _board: &mut ResultBoard,
    ) -> Result<Option<AnalysisResult>, BoxError> {
        Ok(None)
    }

    /// Downcast support for typed peer access.
    fn as_any(&self) -> &dyn Any;
}

/// One instantiated module plus its runtime bookkeeping, owned by the parser.
pub struct ModuleSlot {
    pub descriptor: ModuleDescriptor,
    pub module: Box<dyn Module>,
    pub state: ModuleState,
    pub filter: Option<EventFilter>,
}

impl ModuleSlot {
    pub fn new(descriptor: ModuleDescriptor, module: Box<dyn Module>) -> Self {
        Self {
            descriptor,
            module,
            state: ModuleState::Constructed,
            filter: None,
        }
    }

    pub fn handle(&self) -> &'static str {
        self.descriptor.handle
    }
}

impl fmt::Debug for ModuleSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleSlot")
            .field("handle", &self.descriptor.handle)
            .field("state", &self.state)
            .finish()
    }
}

/// Read-only view over the modules that precede the current one in
/// dependency order.
///
/// Because dependencies are instantiated strictly before their dependents,
/// slicing the instance vector at the current module yields exactly the set
/// a module is allowed to read. A peer that failed (or was gated out of the
/// run) is absent; dependents on optional peers must tolerate `None`.
pub struct Peers<'a> {
    slots: &'a [ModuleSlot],
}

impl<'a> Peers<'a> {
    pub fn new(slots: &'a [ModuleSlot]) -> Self {
        Self { slots }
    }

    /// Look up a readable peer by handle.
    pub fn get(&self, handle: &str) -> Option<&dyn Module> {
        self.slots
            .iter()
            .find(|s| s.handle() == handle && s.state.is_readable())
            .map(|s| s.module.as_ref())
    }

    /// Look up a readable peer and downcast it to its concrete type.
    pub fn get_as<T: 'static>(&self, handle: &str) -> Option<&T> {
        self.get(handle).and_then(|m| m.as_any().downcast_ref())
    }

    /// Whether the peer exists and reached `Ready` (it may have failed later).
    pub fn is_ready(&self, handle: &str) -> bool {
        self.slots
            .iter()
            .any(|s| s.handle() == handle && s.state.is_readable())
    }
}
