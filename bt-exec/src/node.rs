use bt_core::{NodeError, NodeStatus, TickContext};

/// A unit of behavior the executor can tick and halt.
///
/// `tick` must return promptly whether or not the underlying work is done; blocking inside it
/// stalls the whole tree. Work that takes longer than one tick returns `Running` and keeps its
/// continuation state in fields.
///
/// `halt` asks an in-progress execution to stop. It is a no-op when nothing is running, may be
/// called repeatedly, and must leave the node ready to start a fresh episode on the next tick.
///
/// Task failure is `Ok(NodeStatus::Failure)`; `Err` is reserved for configuration problems.
pub trait Node: 'static {
    fn name(&self) -> &str;

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<NodeStatus, NodeError>;

    fn halt(&mut self, ctx: &mut TickContext<'_>);
}
