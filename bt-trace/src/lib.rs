//! Deterministic lifecycle tracing for behavior tree nodes.
//!
//! Events are recorded through the blackboard, so node code never needs a handle to a logger.
//! Install a `TraceLog` to collect events in memory or a `TraceSink` to stream them elsewhere.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{
    emit, emit_with, is_enabled, tags, TraceEvent, TraceKind, TraceLog, TraceSink, VecTraceSink,
    TRACE_LOG, TRACE_SINK,
};
