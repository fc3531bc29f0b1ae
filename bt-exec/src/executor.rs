use bt_core::{
    Blackboard, CancelToken, NodeError, NodeOutcome, NodeStatus, SharedClock, TickContext,
};
use bt_trace::{emit_with as trace_with, TraceEvent, TraceKind};

use crate::config::ExecutorConfig;
use crate::node::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The root reached a terminal status.
    Completed(NodeOutcome),
    /// The cancellation token was set; the root has been halted.
    Cancelled,
    /// `max_ticks` ran out while the root was still running; the root has been halted.
    TickBudgetExhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// Ticks performed during this run.
    pub ticks: u64,
}

/// Drives a root node on the calling thread.
///
/// Exactly one call is ever inside the tree: `tick` and `halt` both need `&mut self`. Nothing
/// here can interrupt a node that blocks; a blocking tick stalls the executor with it.
pub struct Executor {
    root: Box<dyn Node>,
    blackboard: Blackboard,
    clock: SharedClock,
    cancel: CancelToken,
    config: ExecutorConfig,
    ticks: u64,
}

impl Executor {
    pub fn new(root: Box<dyn Node>, clock: SharedClock) -> Self {
        Self {
            root,
            blackboard: Blackboard::new(),
            clock,
            cancel: CancelToken::new(),
            config: ExecutorConfig::default(),
            ticks: 0,
        }
    }

    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_blackboard(mut self, blackboard: Blackboard) -> Self {
        self.blackboard = blackboard;
        self
    }

    /// Use an existing token, e.g. one already shared with a supervisor.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn root(&self) -> &dyn Node {
        self.root.as_ref()
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut self.blackboard
    }

    /// Handle for requesting cancellation of `run_until_complete`, from this or another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Total ticks performed by this executor.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn tick_once(&mut self) -> Result<NodeStatus, NodeError> {
        let tick = self.ticks;
        self.ticks = self.ticks.saturating_add(1);
        let mut ctx = TickContext::new(tick, self.clock.as_clock(), &mut self.blackboard);
        self.root.tick(&mut ctx)
    }

    pub fn halt(&mut self) {
        let mut ctx = TickContext::new(self.ticks, self.clock.as_clock(), &mut self.blackboard);
        self.root.halt(&mut ctx);
    }

    /// Tick until the root reaches a terminal status, waiting `tick_interval` between ticks.
    ///
    /// Cancellation and the tick budget are checked before every tick and again before every
    /// wait. The wait itself returns early on cancellation (within [`bt_core::WAIT_SLICE`] on the
    /// wall clock), so a request made during a tick or a wait never costs a full interval.
    /// An `Err` from the root halts it and is returned as-is.
    pub fn run_until_complete(&mut self) -> Result<RunReport, NodeError> {
        let mut ticks = 0u64;
        loop {
            if let Some(report) = self.should_stop(ticks) {
                return Ok(report);
            }

            let status = match self.tick_once() {
                Ok(status) => status,
                Err(err) => {
                    tracing::debug!(node = self.root.name(), error = %err, "run aborted");
                    self.halt();
                    return Err(err);
                }
            };
            ticks += 1;

            if let Some(outcome) = status.outcome() {
                tracing::debug!(node = self.root.name(), ?outcome, ticks, "run completed");
                return Ok(RunReport {
                    outcome: RunOutcome::Completed(outcome),
                    ticks,
                });
            }

            if let Some(report) = self.should_stop(ticks) {
                return Ok(report);
            }

            self.clock.wait(self.config.tick_interval(), &self.cancel);
        }
    }

    /// Halts the root and builds the report if the run must end before its next tick.
    fn should_stop(&mut self, ticks: u64) -> Option<RunReport> {
        let (outcome, kind) = if self.cancel.is_cancelled() {
            (RunOutcome::Cancelled, TraceKind::RunCancelled { ticks })
        } else if self.config.max_ticks.is_some_and(|max| ticks >= max) {
            (
                RunOutcome::TickBudgetExhausted,
                TraceKind::BudgetExhausted { ticks },
            )
        } else {
            return None;
        };

        tracing::debug!(node = self.root.name(), ?outcome, ticks, "run stopped");
        self.halt();
        let tick = self.ticks;
        let root = &self.root;
        trace_with(&mut self.blackboard, || {
            TraceEvent::new(tick, root.name(), kind)
        });
        Some(RunReport { outcome, ticks })
    }
}
