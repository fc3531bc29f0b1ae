#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use bt_core::{BbKey, Blackboard, NodeOutcome};

/// What happened to a node or a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TraceKind {
    /// `on_start` called for a new episode.
    Started { episode: u64 },
    /// `on_running` called; `poll` counts from 1 within the episode.
    Polled { episode: u64, poll: u64 },
    /// The episode reached a terminal status after `polls` calls to `on_running`.
    Finished {
        episode: u64,
        outcome: NodeOutcome,
        polls: u64,
    },
    /// A configuration error ended the episode.
    Aborted { episode: u64 },
    /// `halt` was called. `was_active` is false for an ignored halt on an idle node.
    Halted { episode: u64, was_active: bool },
    /// The executor stopped because the cancellation token was set.
    RunCancelled { ticks: u64 },
    /// The executor stopped because `max_ticks` ran out.
    BudgetExhausted { ticks: u64 },
}

impl TraceKind {
    pub fn tag(&self) -> &'static str {
        match self {
            TraceKind::Started { .. } => tags::ACTION_START,
            TraceKind::Polled { .. } => tags::ACTION_RUNNING,
            TraceKind::Finished { .. } => tags::ACTION_FINISH,
            TraceKind::Aborted { .. } => tags::ACTION_ABORT,
            TraceKind::Halted { .. } => tags::ACTION_HALT,
            TraceKind::RunCancelled { .. } => tags::EXEC_CANCELLED,
            TraceKind::BudgetExhausted { .. } => tags::EXEC_BUDGET_EXHAUSTED,
        }
    }

    /// Episode the event belongs to; `None` for executor events.
    pub fn episode(&self) -> Option<u64> {
        match *self {
            TraceKind::Started { episode }
            | TraceKind::Polled { episode, .. }
            | TraceKind::Finished { episode, .. }
            | TraceKind::Aborted { episode }
            | TraceKind::Halted { episode, .. } => Some(episode),
            TraceKind::RunCancelled { .. } | TraceKind::BudgetExhausted { .. } => None,
        }
    }
}

/// Stable string names for each [`TraceKind`], for filtering and display.
pub mod tags {
    pub const ACTION_START: &str = "bt.action.start";
    pub const ACTION_RUNNING: &str = "bt.action.running";
    pub const ACTION_FINISH: &str = "bt.action.finish";
    pub const ACTION_ABORT: &str = "bt.action.abort";
    pub const ACTION_HALT: &str = "bt.action.halt";
    pub const EXEC_CANCELLED: &str = "bt.exec.cancelled";
    pub const EXEC_BUDGET_EXHAUSTED: &str = "bt.exec.budget_exhausted";
}

/// One lifecycle transition, stamped with the executor tick and the node it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceEvent {
    pub tick: u64,
    pub node: String,
    pub kind: TraceKind,
}

impl TraceEvent {
    pub fn new(tick: u64, node: impl Into<String>, kind: TraceKind) -> Self {
        Self {
            tick,
            node: node.into(),
            kind,
        }
    }

    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }
}

pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

#[derive(Debug, Default)]
pub struct VecTraceSink {
    pub events: Vec<TraceEvent>,
}

impl TraceSink for VecTraceSink {
    fn emit(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    pub fn tags(&self) -> Vec<&'static str> {
        self.events.iter().map(TraceEvent::tag).collect()
    }

    pub fn count(&self, tag: &str) -> usize {
        self.events.iter().filter(|e| e.tag() == tag).count()
    }

    /// Events of one node, in emission order.
    pub fn for_node<'a>(
        &'a self,
        node: &'a str,
    ) -> impl DoubleEndedIterator<Item = &'a TraceEvent> + 'a {
        self.events.iter().filter(move |e| e.node == node)
    }

    /// How the most recent finished episode of `node` ended, if any did.
    pub fn last_outcome(&self, node: &str) -> Option<NodeOutcome> {
        self.for_node(node).rev().find_map(|e| match e.kind {
            TraceKind::Finished { outcome, .. } => Some(outcome),
            _ => None,
        })
    }
}

/// Blackboard key for collecting events in-memory.
pub const TRACE_LOG: BbKey<TraceLog> = BbKey::new("bt.trace.log");
/// Blackboard key for streaming events into a user-provided sink.
pub const TRACE_SINK: BbKey<Box<dyn TraceSink>> = BbKey::new("bt.trace.sink");

/// True when a log or sink is installed, i.e. when emitting does anything.
pub fn is_enabled(blackboard: &Blackboard) -> bool {
    blackboard.contains(TRACE_LOG) || blackboard.contains(TRACE_SINK)
}

pub fn emit(blackboard: &mut Blackboard, event: TraceEvent) {
    if let Some(log) = blackboard.get_mut(TRACE_LOG) {
        log.push(event.clone());
    }
    if let Some(sink) = blackboard.get_mut(TRACE_SINK) {
        sink.emit(event);
    }
}

/// Like [`emit`], but only builds the event when tracing is enabled.
pub fn emit_with(blackboard: &mut Blackboard, event: impl FnOnce() -> TraceEvent) {
    if is_enabled(blackboard) {
        emit(blackboard, event());
    }
}
