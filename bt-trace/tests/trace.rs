use std::cell::RefCell;
use std::rc::Rc;

use bt_core::{Blackboard, NodeOutcome};
use bt_trace::{
    emit, emit_with, is_enabled, tags, TraceEvent, TraceKind, TraceLog, TraceSink, TRACE_LOG,
    TRACE_SINK,
};

#[derive(Clone, Default)]
struct RcSink(Rc<RefCell<Vec<TraceEvent>>>);

impl TraceSink for RcSink {
    fn emit(&mut self, event: TraceEvent) {
        self.0.borrow_mut().push(event);
    }
}

fn finished(tick: u64, node: &str, episode: u64, outcome: NodeOutcome) -> TraceEvent {
    TraceEvent::new(
        tick,
        node,
        TraceKind::Finished {
            episode,
            outcome,
            polls: 0,
        },
    )
}

#[test]
fn nothing_is_built_without_log_or_sink() {
    let mut bb = Blackboard::new();
    assert!(!is_enabled(&bb));

    emit_with(&mut bb, || panic!("event built while tracing is off"));
    emit(&mut bb, TraceEvent::new(0, "a", TraceKind::Started { episode: 1 }));
    assert!(bb.is_empty());
}

#[test]
fn log_keeps_lifecycle_payloads() {
    let mut bb = Blackboard::new();
    bb.set(TRACE_LOG, TraceLog::default());

    emit_with(&mut bb, || {
        TraceEvent::new(
            3,
            "door",
            TraceKind::Halted {
                episode: 2,
                was_active: true,
            },
        )
    });

    let log = bb.get(TRACE_LOG).unwrap();
    assert_eq!(log.tags(), vec![tags::ACTION_HALT]);
    let event = &log.events[0];
    assert_eq!(event.tick, 3);
    assert_eq!(event.node, "door");
    assert_eq!(event.kind.episode(), Some(2));
    assert!(matches!(event.kind, TraceKind::Halted { was_active: true, .. }));
}

#[test]
fn executor_events_have_no_episode() {
    assert_eq!(TraceKind::RunCancelled { ticks: 4 }.episode(), None);
    assert_eq!(
        TraceKind::BudgetExhausted { ticks: 5 }.tag(),
        tags::EXEC_BUDGET_EXHAUSTED
    );
}

#[test]
fn log_filters_by_node() {
    let mut log = TraceLog::default();
    log.push(TraceEvent::new(0, "left", TraceKind::Started { episode: 1 }));
    log.push(TraceEvent::new(0, "right", TraceKind::Started { episode: 1 }));
    log.push(finished(1, "left", 1, NodeOutcome::Failure));
    log.push(finished(2, "right", 1, NodeOutcome::Success));
    log.push(TraceEvent::new(3, "left", TraceKind::Started { episode: 2 }));

    assert_eq!(log.for_node("left").count(), 3);
    assert_eq!(log.last_outcome("left"), Some(NodeOutcome::Failure));
    assert_eq!(log.last_outcome("right"), Some(NodeOutcome::Success));
    assert_eq!(log.last_outcome("missing"), None);
    assert_eq!(log.count(tags::ACTION_START), 3);
}

#[test]
fn log_and_sink_both_receive_events() {
    let mut bb = Blackboard::new();
    bb.set(TRACE_LOG, TraceLog::default());

    let handle = RcSink::default();
    let shared = handle.0.clone();
    bb.set(TRACE_SINK, Box::new(handle) as Box<dyn TraceSink>);
    assert!(is_enabled(&bb));

    emit(&mut bb, TraceEvent::new(4, "fetch", TraceKind::Started { episode: 1 }));
    emit(
        &mut bb,
        TraceEvent::new(5, "fetch", TraceKind::Polled { episode: 1, poll: 1 }),
    );

    let log = bb.get(TRACE_LOG).unwrap();
    assert_eq!(log.tags(), vec![tags::ACTION_START, tags::ACTION_RUNNING]);

    let events = shared.borrow();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].kind, TraceKind::Polled { episode: 1, poll: 1 });
}
