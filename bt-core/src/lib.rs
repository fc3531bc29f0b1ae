//! Single-threaded, cooperative behavior tree primitives.
//!
//! Everything here is shared by node implementations and the executor: status values, an
//! injectable clock, a cooperative cancellation flag, the blackboard and node port lookup.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod blackboard;
pub mod cancel;
pub mod clock;
pub mod error;
pub mod ports;
pub mod status;
pub mod tick;

pub use blackboard::{BbKey, Blackboard};
pub use cancel::CancelToken;
pub use clock::{Clock, ManualClock, MonotonicClock, Pacer, SharedClock, WAIT_SLICE};
pub use error::{BlackboardError, NodeError};
pub use ports::{NodeConfig, PortValue};
pub use status::{NodeOutcome, NodeStatus};
pub use tick::TickContext;
