use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use bt_core::{CancelToken, NodeConfig, NodeError, NodeOutcome, NodeStatus, TickContext};

use crate::stateful::{StatefulAction, StatefulActionNode};

const PENDING: u8 = 0;
const SUCCEEDED: u8 = 1;
const FAILED: u8 = 2;
const CANCELLED: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Succeeded,
    Failed,
    Cancelled,
}

impl TaskState {
    fn from_code(code: u8) -> Self {
        match code {
            SUCCEEDED => TaskState::Succeeded,
            FAILED => TaskState::Failed,
            CANCELLED => TaskState::Cancelled,
            _ => TaskState::Pending,
        }
    }
}

/// Thread-safe completion cell shared between a node and the worker doing its blocking work.
///
/// The state leaves `Pending` exactly once: through `complete` on the worker side or `cancel` on
/// the node side, whichever comes first. Every query is non-blocking.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    state: Arc<AtomicU8>,
    cancel: CancelToken,
}

impl TaskHandle {
    pub fn new() -> Self {
        Self {
            state: Arc::new(AtomicU8::new(PENDING)),
            cancel: CancelToken::new(),
        }
    }

    pub fn state(&self) -> TaskState {
        TaskState::from_code(self.state.load(Ordering::Acquire))
    }

    pub fn is_done(&self) -> bool {
        self.state() != TaskState::Pending
    }

    /// Workers should check this between units of work and stop early when it is set.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn cancel(&self) {
        // State first: a worker that sees the flag must also see `Cancelled`.
        let _ = self
            .state
            .compare_exchange(PENDING, CANCELLED, Ordering::AcqRel, Ordering::Acquire);
        self.cancel.cancel();
    }

    /// Report the worker's result. Returns `false` if the task was already finished or cancelled,
    /// in which case the result is dropped.
    pub fn complete(&self, outcome: NodeOutcome) -> bool {
        let code = match outcome {
            NodeOutcome::Success => SUCCEEDED,
            NodeOutcome::Failure => FAILED,
        };
        self.state
            .compare_exchange(PENDING, code, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Default for TaskHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Hands blocking work to a worker outside the tick thread and polls for its completion.
///
/// `spawn` receives a fresh [`TaskHandle`] for each episode and must return without waiting for
/// the work; where the work runs (thread, pool, async runtime) is up to the caller. Halting the
/// node cancels the handle. The node never joins or waits on the worker.
pub struct WorkerTaskAction<S> {
    spawn: S,
    handle: Option<TaskHandle>,
}

impl<S> WorkerTaskAction<S>
where
    S: FnMut(&NodeConfig, &mut TickContext<'_>, TaskHandle) -> Result<(), NodeError> + 'static,
{
    pub fn new(spawn: S) -> Self {
        Self {
            spawn,
            handle: None,
        }
    }

    /// Handle of the episode in progress, if any.
    pub fn handle(&self) -> Option<&TaskHandle> {
        self.handle.as_ref()
    }

    fn poll(&mut self) -> NodeStatus {
        let Some(handle) = self.handle.as_ref() else {
            return NodeStatus::Failure;
        };

        let status = match handle.state() {
            TaskState::Pending => return NodeStatus::Running,
            TaskState::Succeeded => NodeStatus::Success,
            // A worker that gave up on its own counts as a failed task.
            TaskState::Failed | TaskState::Cancelled => NodeStatus::Failure,
        };
        self.handle = None;
        status
    }
}

impl<S> StatefulAction for WorkerTaskAction<S>
where
    S: FnMut(&NodeConfig, &mut TickContext<'_>, TaskHandle) -> Result<(), NodeError> + 'static,
{
    fn on_start(
        &mut self,
        config: &NodeConfig,
        ctx: &mut TickContext<'_>,
    ) -> Result<NodeStatus, NodeError> {
        let handle = TaskHandle::new();
        (self.spawn)(config, ctx, handle.clone())?;
        self.handle = Some(handle);
        Ok(self.poll())
    }

    fn on_running(
        &mut self,
        _config: &NodeConfig,
        _ctx: &mut TickContext<'_>,
    ) -> Result<NodeStatus, NodeError> {
        Ok(self.poll())
    }

    fn on_halted(&mut self, config: &NodeConfig, _ctx: &mut TickContext<'_>) {
        if let Some(handle) = self.handle.take() {
            tracing::debug!(node = config.name(), "cancelling worker task");
            handle.cancel();
        }
    }
}

pub type WorkerTaskNode<S> = StatefulActionNode<WorkerTaskAction<S>>;

impl<S> WorkerTaskNode<S>
where
    S: FnMut(&NodeConfig, &mut TickContext<'_>, TaskHandle) -> Result<(), NodeError> + 'static,
{
    pub fn worker(config: NodeConfig, spawn: S) -> Self {
        StatefulActionNode::new(config, WorkerTaskAction::new(spawn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_transition_wins() {
        let handle = TaskHandle::new();
        assert_eq!(handle.state(), TaskState::Pending);

        assert!(handle.complete(NodeOutcome::Failure));
        assert!(!handle.complete(NodeOutcome::Success));
        handle.cancel();
        assert_eq!(handle.state(), TaskState::Failed);
        assert!(handle.is_cancelled());
    }

    #[test]
    fn completion_after_cancel_is_dropped() {
        let handle = TaskHandle::new();
        let worker_side = handle.clone();

        handle.cancel();
        assert!(worker_side.is_cancelled());
        assert!(!worker_side.complete(NodeOutcome::Success));
        assert_eq!(handle.state(), TaskState::Cancelled);
        assert!(handle.is_done());
    }
}
