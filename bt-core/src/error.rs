use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlackboardError {
    #[error("blackboard entry `{key}` is missing")]
    Missing { key: String },

    #[error("blackboard entry `{key}` holds a different type than requested")]
    TypeMismatch { key: String },
}

/// Configuration errors raised while a node reads or writes its ports.
///
/// Ordinary task failure is never an error: it is reported as `NodeStatus::Failure`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    #[error("node `{node}`: required input `{port}` is missing")]
    MissingInput { node: String, port: String },

    #[error("node `{node}`: input `{port}` is malformed: {reason}")]
    MalformedInput {
        node: String,
        port: String,
        reason: String,
    },

    #[error("node `{node}`: port `{port}` has an unexpected type")]
    TypeMismatch { node: String, port: String },

    #[error("node `{node}`: output `{port}` is bound to a literal and cannot be written")]
    OutputNotWritable { node: String, port: String },
}

impl NodeError {
    pub(crate) fn from_blackboard(node: &str, port: &str, err: BlackboardError) -> Self {
        match err {
            BlackboardError::Missing { .. } => NodeError::MissingInput {
                node: node.to_owned(),
                port: port.to_owned(),
            },
            BlackboardError::TypeMismatch { .. } => NodeError::TypeMismatch {
                node: node.to_owned(),
                port: port.to_owned(),
            },
        }
    }

    pub fn node(&self) -> &str {
        match self {
            NodeError::MissingInput { node, .. }
            | NodeError::MalformedInput { node, .. }
            | NodeError::TypeMismatch { node, .. }
            | NodeError::OutputNotWritable { node, .. } => node,
        }
    }
}
