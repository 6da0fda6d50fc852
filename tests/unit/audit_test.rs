//! Tests for audit sink

use automail_pool::core::{build_audit_event, AuditSink, InMemoryAuditSink};

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);

    let event = build_audit_event("mail1", Some(4), "dispatch", Some("floor 3".to_string()));

    sink.record(event.clone());
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0], event);
    assert_eq!(events[0].mail_id, "mail1");
    assert_eq!(events[0].action, "dispatch");
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event("m1", None, "intake", None));
    sink.record(build_audit_event("m2", None, "intake", None));
    sink.record(build_audit_event("m3", None, "intake", None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].mail_id, "m2"); // First one popped
    assert_eq!(events[1].mail_id, "m3");
}

#[test]
fn test_zero_capacity_sink_keeps_nothing() {
    let mut sink = InMemoryAuditSink::new(0);
    sink.record(build_audit_event("m1", None, "intake", None));
    assert!(sink.events().is_empty());
}

#[test]
fn test_build_audit_event() {
    let event = build_audit_event("mail1", Some(2), "requeue", Some("tube full".to_string()));

    assert_eq!(event.mail_id, "mail1");
    assert_eq!(event.robot, Some(2));
    assert_eq!(event.action, "requeue");
    assert_eq!(event.detail, Some("tube full".to_string()));
    assert!(event.created_at_ms > 0);
    assert_eq!(event.event_id.len(), 36);
    assert_ne!(event.event_id, build_audit_event("mail1", None, "requeue", None).event_id);
}
