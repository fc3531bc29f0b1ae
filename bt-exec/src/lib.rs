//! Cooperative behavior tree node execution built on `bt-core`.
//!
//! Nodes never block: long-running work is started once, then polled on later ticks until it
//! reaches a terminal status or is halted. The [`Executor`] drives a root node on a single
//! thread at a caller-chosen cadence.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod config;
pub mod executor;
pub mod node;
pub mod nodes;
pub mod stateful;
pub mod task;

pub use config::ExecutorConfig;
pub use executor::{Executor, RunOutcome, RunReport};
pub use node::Node;
pub use nodes::{sleep_node, ConfigErrorPolicy, SleepAction, SleepNode, SyncAction, MSEC_PORT};
pub use stateful::{ActionState, StatefulAction, StatefulActionNode};
pub use task::{TaskHandle, TaskState, WorkerTaskAction, WorkerTaskNode};
