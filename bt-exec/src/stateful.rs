use bt_core::{NodeConfig, NodeError, NodeStatus, TickContext};
use bt_trace::{emit_with as trace_with, TraceEvent, TraceKind};

use crate::node::Node;

/// Start / poll / halt callbacks for a node whose work can span several ticks.
///
/// Wrap an implementation in [`StatefulActionNode`] to get a [`Node`]. The wrapper owns the
/// lifecycle, so implementations can rely on:
/// - `on_start` runs once per episode, before any `on_running` of that episode;
/// - `on_running` only follows an `on_start` (or `on_running`) that returned `Running`;
/// - `on_halted` runs at most once per episode, and only while it is still active.
pub trait StatefulAction: 'static {
    fn on_start(
        &mut self,
        config: &NodeConfig,
        ctx: &mut TickContext<'_>,
    ) -> Result<NodeStatus, NodeError>;

    fn on_running(
        &mut self,
        config: &NodeConfig,
        ctx: &mut TickContext<'_>,
    ) -> Result<NodeStatus, NodeError>;

    fn on_halted(&mut self, _config: &NodeConfig, _ctx: &mut TickContext<'_>) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    Idle,
    Active,
}

pub struct StatefulActionNode<A> {
    config: NodeConfig,
    action: A,
    state: ActionState,
    episodes: u64,
    polls: u64,
}

impl<A> StatefulActionNode<A>
where
    A: StatefulAction,
{
    pub fn new(config: NodeConfig, action: A) -> Self {
        Self {
            config,
            action,
            state: ActionState::Idle,
            episodes: 0,
            polls: 0,
        }
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn action(&self) -> &A {
        &self.action
    }

    pub fn action_mut(&mut self) -> &mut A {
        &mut self.action
    }

    pub fn state(&self) -> ActionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == ActionState::Active
    }

    /// Number of episodes started so far (calls to `on_start`).
    pub fn episodes(&self) -> u64 {
        self.episodes
    }

    /// Calls to `on_running` in the current (or last) episode.
    pub fn polls(&self) -> u64 {
        self.polls
    }

    fn trace(&self, ctx: &mut TickContext<'_>, kind: TraceKind) {
        let tick = ctx.tick;
        trace_with(ctx.blackboard, || {
            TraceEvent::new(tick, self.config.name(), kind)
        });
    }
}

impl<A> Node for StatefulActionNode<A>
where
    A: StatefulAction,
{
    fn name(&self) -> &str {
        self.config.name()
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<NodeStatus, NodeError> {
        let result = match self.state {
            ActionState::Idle => {
                self.episodes = self.episodes.saturating_add(1);
                self.polls = 0;
                tracing::debug!(node = self.config.name(), episode = self.episodes, "action start");
                self.trace(ctx, TraceKind::Started { episode: self.episodes });
                self.action.on_start(&self.config, ctx)
            }
            ActionState::Active => {
                self.polls = self.polls.saturating_add(1);
                tracing::trace!(node = self.config.name(), episode = self.episodes, "action poll");
                self.trace(
                    ctx,
                    TraceKind::Polled {
                        episode: self.episodes,
                        poll: self.polls,
                    },
                );
                self.action.on_running(&self.config, ctx)
            }
        };

        match result {
            Ok(NodeStatus::Running) => {
                self.state = ActionState::Active;
            }
            Ok(status) => {
                self.state = ActionState::Idle;
                tracing::debug!(node = self.config.name(), ?status, "action finished");
                if let Some(outcome) = status.outcome() {
                    self.trace(
                        ctx,
                        TraceKind::Finished {
                            episode: self.episodes,
                            outcome,
                            polls: self.polls,
                        },
                    );
                }
            }
            Err(ref err) => {
                // A configuration error ends the episode; the next tick starts over.
                self.state = ActionState::Idle;
                tracing::debug!(node = self.config.name(), error = %err, "action aborted");
                self.trace(ctx, TraceKind::Aborted { episode: self.episodes });
            }
        }

        result
    }

    fn halt(&mut self, ctx: &mut TickContext<'_>) {
        let was_active = self.state == ActionState::Active;
        if was_active {
            self.action.on_halted(&self.config, ctx);
            self.state = ActionState::Idle;
            tracing::debug!(node = self.config.name(), episode = self.episodes, "action halted");
        } else {
            tracing::trace!(node = self.config.name(), "halt ignored: not running");
        }
        self.trace(
            ctx,
            TraceKind::Halted {
                episode: self.episodes,
                was_active,
            },
        );
    }
}
