//! Orchestrates the analysis run: container resolution, configuration, the
//! two-phase event pass, and result aggregation.
//!
//! Failure semantics: an error from any module phase is isolated to that
//! module. It is reported to the diagnostics sink, the module moves to
//! `Failed` and is skipped for the rest of the run, and every other module
//! keeps going. Only resolution itself is fatal.

use super::ResolveError;
use super::container::instantiate;
use super::context::AnalysisContext;
use super::diagnostics::{DiagnosticsSink, ModuleFailure, TracingSink};
use super::meta::ModuleDescriptor;
use super::module::{BoxError, ModulePhase, ModuleSlot, ModuleState, Peers};
use super::result::{AnalysisResult, ResultBoard};
use crate::combat_log::{CombatEvent, is_time_ordered};

pub struct Parser {
    ctx: AnalysisContext,
    slots: Vec<ModuleSlot>,
    board: ResultBoard,
    sink: Box<dyn DiagnosticsSink>,
    failures: Vec<ModuleFailure>,
}

impl Parser {
    /// Resolve and instantiate the merged descriptor set for this run.
    pub fn new(
        descriptors: &[ModuleDescriptor],
        ctx: AnalysisContext,
    ) -> Result<Self, ResolveError> {
        Self::with_sink(descriptors, ctx, Box::new(TracingSink))
    }

    pub fn with_sink(
        descriptors: &[ModuleDescriptor],
        ctx: AnalysisContext,
        sink: Box<dyn DiagnosticsSink>,
    ) -> Result<Self, ResolveError> {
        let slots = instantiate(descriptors, ctx.subject_job())?;
        Ok(Self {
            ctx,
            slots,
            board: ResultBoard::new(),
            sink,
            failures: Vec::new(),
        })
    }

    /// Run every module's asynchronous configuration, in dependency order.
    ///
    /// Sequential order makes "my configuration reads my dependency's
    /// configured state" correct by construction; a module whose configure
    /// fails is reported and skipped for the rest of the run.
    pub async fn configure(&mut self) {
        for i in 0..self.slots.len() {
            if self.slots[i].state != ModuleState::Constructed {
                continue;
            }
            self.slots[i].state = ModuleState::Configuring;

            let ctx = &self.ctx;
            let slot = &mut self.slots[i];
            match slot.module.configure(ctx).await {
                Ok(()) => {
                    slot.filter = slot.module.event_filter();
                    slot.state = ModuleState::Ready;
                }
                Err(error) => self.fail(i, ModulePhase::Configure, error),
            }
        }
    }

    /// Run the normalisation pipeline, then dispatch every event to the
    /// matching hooks in dependency order.
    ///
    /// Normalisation composes module by module: each module receives the
    /// previous module's output. Hook dispatch for event N completes fully
    /// before event N+1 begins.
    pub fn parse_events(&mut self, events: Vec<CombatEvent>) {
        let events = self.normalise(events);

        for slot in &mut self.slots {
            if slot.state == ModuleState::Ready {
                slot.state = ModuleState::Consuming;
            }
        }

        for event in &events {
            for i in 0..self.slots.len() {
                let hook_error = {
                    let (done, rest) = self.slots.split_at_mut(i);
                    let slot = &mut rest[0];
                    if slot.state != ModuleState::Consuming {
                        continue;
                    }
                    let Some(filter) = &slot.filter else {
                        continue;
                    };
                    if !filter.matches(event, self.ctx.subject) {
                        continue;
                    }
                    let peers = Peers::new(done);
                    slot.module.on_event(event, &self.ctx, &peers).err()
                };
                if let Some(error) = hook_error {
                    self.fail(i, ModulePhase::Hook, error);
                }
            }
        }

        for slot in &mut self.slots {
            if slot.state == ModuleState::Consuming {
                slot.state = ModuleState::Completed;
            }
        }
    }

    fn normalise(&mut self, mut events: Vec<CombatEvent>) -> Vec<CombatEvent> {
        for i in 0..self.slots.len() {
            if self.slots[i].state != ModuleState::Ready {
                continue;
            }
            // `normalise` consumes the sequence; keep a copy so a failing
            // module's rewrite can be discarded.
            let backup = events.clone();
            match self.slots[i].module.normalise(events) {
                Ok(rewritten) if is_time_ordered(&rewritten) => events = rewritten,
                Ok(_) => {
                    events = backup;
                    self.fail(
                        i,
                        ModulePhase::Normalise,
                        "normalised sequence breaks timestamp ordering".into(),
                    );
                }
                Err(error) => {
                    events = backup;
                    self.fail(i, ModulePhase::Normalise, error);
                }
            }
        }
        events
    }

    /// Invoke `output()` on every completed module in dependency order and
    /// return the non-empty results, board results included, ordered by
    /// display key.
    pub fn generate_results(&mut self) -> Vec<AnalysisResult> {
        let mut results = Vec::new();

        for i in 0..self.slots.len() {
            let outcome = {
                let (done, rest) = self.slots.split_at_mut(i);
                let slot = &rest[0];
                if slot.state != ModuleState::Completed {
                    continue;
                }
                let peers = Peers::new(done);
                slot.module.output(&self.ctx, &peers, &mut self.board)
            };
            match outcome {
                Ok(Some(result)) => results.push(result),
                Ok(None) => {}
                Err(error) => self.fail(i, ModulePhase::Output, error),
            }
        }

        results.extend(std::mem::take(&mut self.board).into_results());
        // Stable, so modules sharing an order key keep dependency order
        results.sort_by_key(|r| r.order);
        results
    }

    pub fn context(&self) -> &AnalysisContext {
        &self.ctx
    }

    /// Module handles in resolved execution order.
    pub fn module_order(&self) -> Vec<&'static str> {
        self.slots.iter().map(|s| s.handle()).collect()
    }

    pub fn state_of(&self, handle: &str) -> Option<ModuleState> {
        self.slots
            .iter()
            .find(|s| s.handle() == handle)
            .map(|s| s.state)
    }

    /// Isolated module failures recorded so far.
    pub fn failures(&self) -> &[ModuleFailure] {
        &self.failures
    }

    fn fail(&mut self, idx: usize, phase: ModulePhase, error: BoxError) {
        let slot = &mut self.slots[idx];
        slot.state = ModuleState::Failed(phase);
        let failure = ModuleFailure {
            handle: slot.handle().to_string(),
            phase,
            error: error.to_string(),
        };
        self.sink.report(&failure);
        self.failures.push(failure);
    }
}
