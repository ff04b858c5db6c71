use super::*;

fn queue() -> NotificationQueue {
    NotificationQueue::new(Duration::from_secs(5))
}

#[test]
fn push_creates_notification_kind_entries_from_sistema() {
    let mut q = queue();
    q.push("✅ Observer conectado", Severity::Success, Instant::now());

    let first = q.active().next().unwrap();
    assert_eq!(first.severity, Severity::Success);
    assert_eq!(first.message.kind, MessageKind::Notification);
    assert_eq!(first.message.sender, "Sistema");
    assert_eq!(first.message.content, "✅ Observer conectado");
}

#[test]
fn expire_keeps_toasts_until_ttl_elapses() {
    let mut q = queue();
    let t0 = Instant::now();
    q.push("a", Severity::Info, t0);

    assert_eq!(q.expire(t0 + Duration::from_millis(4999)), 0);
    assert_eq!(q.len(), 1);
    assert_eq!(q.expire(t0 + Duration::from_secs(5)), 1);
    assert!(q.is_empty());
}

#[test]
fn expire_evicts_oldest_first() {
    let mut q = queue();
    let t0 = Instant::now();
    q.push("a", Severity::Info, t0);
    q.push("b", Severity::Warning, t0 + Duration::from_secs(2));
    q.push("c", Severity::Error, t0 + Duration::from_secs(4));

    assert_eq!(q.expire(t0 + Duration::from_secs(6)), 1);
    let remaining: Vec<_> = q.active().map(|n| n.message.content.as_str()).collect();
    assert_eq!(remaining, ["b", "c"]);

    assert_eq!(q.expire(t0 + Duration::from_secs(20)), 2);
    assert!(q.is_empty());
}

#[test]
fn expire_on_empty_queue_is_noop() {
    let mut q = queue();
    assert_eq!(q.expire(Instant::now()), 0);
}

#[test]
fn severity_display_is_lowercase() {
    assert_eq!(Severity::Warning.to_string(), "warning");
    assert_eq!(Severity::Success.to_string(), "success");
}
