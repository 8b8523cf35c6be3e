#![cfg(feature = "serde")]

use goap_tools::{tags, TraceEvent, TraceLog};

#[test]
fn trace_log_json_roundtrip() {
    let mut log = TraceLog::default();
    log.push(TraceEvent::new(4, 2, tags::GOAL_ACTIVATED).with_subject("refuel").with_a(50));
    log.push(TraceEvent::new(5, 2, tags::EXECUTOR_STOPPED));

    let json = serde_json::to_string(&log).unwrap();
    let back: TraceLog = serde_json::from_str(&json).unwrap();
    assert_eq!(back, log);
}
