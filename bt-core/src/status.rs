#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of a single tick.
///
/// `Running` is the only non-terminal value: it asks the caller to tick the node again later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NodeStatus {
    Running,
    Success,
    Failure,
}

/// Terminal result of a node episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NodeOutcome {
    Success,
    Failure,
}

impl From<NodeOutcome> for NodeStatus {
    fn from(value: NodeOutcome) -> Self {
        match value {
            NodeOutcome::Success => NodeStatus::Success,
            NodeOutcome::Failure => NodeStatus::Failure,
        }
    }
}

impl From<bool> for NodeOutcome {
    fn from(value: bool) -> Self {
        if value {
            NodeOutcome::Success
        } else {
            NodeOutcome::Failure
        }
    }
}

impl NodeStatus {
    pub fn outcome(self) -> Option<NodeOutcome> {
        match self {
            NodeStatus::Running => None,
            NodeStatus::Success => Some(NodeOutcome::Success),
            NodeStatus::Failure => Some(NodeOutcome::Failure),
        }
    }

    pub fn is_terminal(self) -> bool {
        self != NodeStatus::Running
    }
}
