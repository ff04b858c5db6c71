use time::macros::offset;

use super::*;

fn at(ms: i64) -> Message {
    Message { sender: SENDER_SYSTEM.to_owned(), content: "x".to_owned(), timestamp: ms, kind: MessageKind::System }
}

#[test]
fn message_new_stamps_current_time() {
    let before = now_ms();
    let msg = Message::new(SENDER_ROBOT, "🏔️ 15°C", MessageKind::Robot);
    assert!(msg.timestamp >= before);
    assert_eq!(msg.sender, "Robot");
    assert_eq!(msg.kind, MessageKind::Robot);
}

#[test]
fn clock_in_formats_time_of_day_at_offset() {
    // 1970-01-02 13:05:09.999 UTC
    let msg = at((86_400 + 13 * 3600 + 5 * 60 + 9) * 1000 + 999);
    assert_eq!(msg.clock_in(UtcOffset::UTC), "13:05:09");
    assert_eq!(msg.clock_in(offset!(-5)), "08:05:09");
    assert_eq!(at(0).clock_in(offset!(+2)), "02:00:00");
}

#[test]
fn clock_in_handles_pre_epoch_timestamps() {
    assert_eq!(at(-1000).clock_in(UtcOffset::UTC), "23:59:59");
}

#[test]
fn clock_uses_local_offset_or_utc() {
    let msg = at(1_704_078_245_000);
    let local = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    assert_eq!(msg.clock(), msg.clock_in(local));
}

#[test]
fn clock_out_of_range_is_placeholder() {
    assert_eq!(at(i64::MAX).clock_in(UtcOffset::UTC), "--:--:--");
}

#[test]
fn transcript_preserves_insertion_order() {
    let mut transcript = Transcript::default();
    for idx in 0..3 {
        transcript.push(Message::new(SENDER_USER, format!("m{idx}"), MessageKind::User));
    }
    let contents: Vec<_> = transcript.entries().iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, ["m0", "m1", "m2"]);
    assert_eq!(transcript.last().map(|m| m.content.as_str()), Some("m2"));
}

#[test]
fn since_returns_tail_and_tolerates_out_of_range() {
    let mut transcript = Transcript::default();
    assert!(transcript.is_empty());
    transcript.push(at(1));
    transcript.push(at(2));

    assert_eq!(transcript.since(1).len(), 1);
    assert_eq!(transcript.since(2).len(), 0);
    assert_eq!(transcript.since(10).len(), 0);
}
