use std::time::Duration;

use bt_core::{NodeConfig, NodeError, NodeOutcome, NodeStatus, TickContext};

use crate::node::Node;
use crate::stateful::{StatefulAction, StatefulActionNode};

/// What a node does when reading its configuration fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigErrorPolicy {
    /// Return the error to the caller.
    #[default]
    Propagate,
    /// Log it and report `Failure`, so the rest of the tree can react.
    Fail,
}

impl ConfigErrorPolicy {
    pub fn apply(self, err: NodeError) -> Result<NodeStatus, NodeError> {
        match self {
            ConfigErrorPolicy::Propagate => Err(err),
            ConfigErrorPolicy::Fail => {
                tracing::warn!(node = err.node(), error = %err, "configuration error, failing");
                Ok(NodeStatus::Failure)
            }
        }
    }
}

/// Leaf that finishes within a single tick.
///
/// The callback returns a `NodeOutcome`, so it cannot report `Running`; `halt` has nothing to
/// stop.
pub struct SyncAction<F> {
    config: NodeConfig,
    action: F,
}

impl<F> SyncAction<F>
where
    F: FnMut(&NodeConfig, &mut TickContext<'_>) -> Result<NodeOutcome, NodeError> + 'static,
{
    pub fn new(config: NodeConfig, action: F) -> Self {
        Self { config, action }
    }
}

impl<F> Node for SyncAction<F>
where
    F: FnMut(&NodeConfig, &mut TickContext<'_>) -> Result<NodeOutcome, NodeError> + 'static,
{
    fn name(&self) -> &str {
        self.config.name()
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<NodeStatus, NodeError> {
        (self.action)(&self.config, ctx).map(NodeStatus::from)
    }

    fn halt(&mut self, _ctx: &mut TickContext<'_>) {}
}

/// Input port holding the sleep duration in milliseconds.
pub const MSEC_PORT: &str = "msec";

/// Waits for `msec` milliseconds of clock time without blocking.
///
/// `on_start` stores a deadline; each later tick compares it with the clock. Non-positive
/// durations succeed immediately.
#[derive(Debug, Default)]
pub struct SleepAction {
    deadline: Option<Duration>,
    policy: ConfigErrorPolicy,
    halted: u32,
}

impl SleepAction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: ConfigErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Number of times an active sleep was halted.
    pub fn halted(&self) -> u32 {
        self.halted
    }
}

impl StatefulAction for SleepAction {
    fn on_start(
        &mut self,
        config: &NodeConfig,
        ctx: &mut TickContext<'_>,
    ) -> Result<NodeStatus, NodeError> {
        self.deadline = None;
        let msec = match config.get_input::<i64>(MSEC_PORT, &*ctx.blackboard) {
            Ok(msec) => msec,
            Err(err) => return self.policy.apply(err),
        };

        if msec <= 0 {
            return Ok(NodeStatus::Success);
        }

        self.deadline = Some(ctx.now() + Duration::from_millis(msec.unsigned_abs()));
        Ok(NodeStatus::Running)
    }

    fn on_running(
        &mut self,
        _config: &NodeConfig,
        ctx: &mut TickContext<'_>,
    ) -> Result<NodeStatus, NodeError> {
        // Polled without a prior start: nothing to wait for.
        let Some(deadline) = self.deadline else {
            return Ok(NodeStatus::Failure);
        };

        if ctx.now() >= deadline {
            self.deadline = None;
            Ok(NodeStatus::Success)
        } else {
            Ok(NodeStatus::Running)
        }
    }

    fn on_halted(&mut self, _config: &NodeConfig, _ctx: &mut TickContext<'_>) {
        self.deadline = None;
        self.halted = self.halted.saturating_add(1);
    }
}

pub type SleepNode = StatefulActionNode<SleepAction>;

pub fn sleep_node(config: NodeConfig) -> SleepNode {
    StatefulActionNode::new(config, SleepAction::new())
}
