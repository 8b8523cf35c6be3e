use goap_tools::{
    tags, NullTraceSink, SharedTraceLog, TraceEvent, TraceLog, TraceSink, VecTraceSink,
};

#[test]
fn vec_sink_records_events_in_order() {
    let mut sink = VecTraceSink::default();
    sink.emit(TraceEvent::new(1, 7, tags::GOAL_ACTIVATED).with_subject("gather").with_a(10));
    sink.emit(TraceEvent::new(1, 7, tags::PLAN_FOUND).with_a(3).with_b(3));

    assert_eq!(sink.events.len(), 2);
    assert_eq!(sink.events[0].agent, 7);
    assert_eq!(sink.events[0].subject(), Some("gather"));
    assert_eq!(sink.events[0].a, 10);
    assert_eq!(sink.events[1].tag, tags::PLAN_FOUND);
}

#[test]
fn null_sink_discards_events() {
    let mut sink: Box<dyn TraceSink> = Box::new(NullTraceSink);
    sink.emit(TraceEvent::new(0, 0, "anything"));
}

#[test]
fn shared_log_is_visible_through_clones() {
    let log = SharedTraceLog::new();
    let mut sink: Box<dyn TraceSink> = Box::new(log.clone());

    sink.emit(TraceEvent::new(2, 1, tags::ACTION_STARTED).with_subject("find_resource"));
    sink.emit(TraceEvent::new(3, 1, tags::ACTION_COMPLETED).with_subject("find_resource"));
    sink.emit(TraceEvent::new(3, 1, tags::ACTION_STARTED).with_subject("pickup_item"));

    assert_eq!(log.count(tags::ACTION_STARTED), 2);
    assert!(log.contains(tags::ACTION_COMPLETED, "find_resource"));
    assert!(!log.contains(tags::ACTION_COMPLETED, "pickup_item"));

    let snapshot = log.snapshot();
    assert_eq!(
        snapshot.tags(),
        vec![tags::ACTION_STARTED, tags::ACTION_COMPLETED, tags::ACTION_STARTED]
    );

    log.clear();
    assert!(log.snapshot().is_empty());
}

#[test]
fn trace_log_filters_by_tag() {
    let mut log = TraceLog::default();
    log.push(TraceEvent::new(0, 0, tags::PLAN_FAILED).with_subject("gather"));
    log.push(TraceEvent::new(1, 0, tags::PLAN_FAILED).with_subject("gather"));
    log.push(TraceEvent::new(2, 0, tags::PLAN_FOUND).with_subject("gather"));

    let ticks: Vec<u64> = log.with_tag(tags::PLAN_FAILED).map(|e| e.tick).collect();
    assert_eq!(ticks, vec![0, 1]);
    assert_eq!(log.len(), 3);
}
