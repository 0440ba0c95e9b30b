//! Envelope encoding used to multiplex events on one channel

use std::time::Duration;

use chrono::{TimeZone, Utc};
use uppe_events::scanner::tcp;
use uppe_events::{
    Beat, Check, CheckDelete, CheckInsert, CheckKind, CheckReplace, Event, EventError, EventTag,
    Ping, RunCheck,
};

use super::{http_event, tcp_event};

fn sample_events() -> Vec<Event> {
    let check = Check::new("chk_http", CheckKind::Http, "https://example.com").with_interval(30);
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    vec![
        CheckInsert::new(check.clone()).into(),
        CheckReplace::new(check.clone()).into(),
        CheckDelete::new(check).into(),
        RunCheck::new("chk_http").into(),
        http_event(200, Duration::from_millis(80)).into(),
        tcp_event(tcp::CheckResponse::failed("connection refused", Duration::ZERO)).into(),
        Beat::new("chk_http", "scan", at).into(),
        Ping::stamped(at).into(),
    ]
}

#[test]
fn test_envelope_decode_restores_event() {
    for event in sample_events() {
        let bytes = event.encode().unwrap();
        let decoded = Event::decode(&bytes).unwrap();
        assert_eq!(decoded, event);
        assert_eq!(decoded.tag(), event.tag());
    }
}

#[test]
fn test_sample_covers_every_tag() {
    let tags: Vec<EventTag> = sample_events().iter().map(Event::tag).collect();
    for tag in EventTag::ALL {
        assert!(tags.contains(&tag), "{tag} is not covered");
    }
}

#[test]
fn test_result_envelope_without_result_is_a_decode_error() {
    let bytes = br#"{"event_type":1001,"payload":{"check_id":"x","agent":"a","region":"r"}}"#;
    let error = Event::decode(bytes).unwrap_err();
    assert!(matches!(error, EventError::Decode(_)), "unexpected error: {error:?}");

    let bytes = br#"{"event_type":1003,"payload":{"check_id":"x","agent":"a","region":"r"}}"#;
    assert!(matches!(Event::decode(bytes), Err(EventError::Decode(_))));
}

#[test]
fn test_envelope_carries_tag_code() {
    let bytes = Event::from(RunCheck::new("chk_1")).encode().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["event_type"], EventTag::RUN_CHECK.code());
    assert_eq!(value["payload"]["check_id"], "chk_1");
}

#[test]
fn test_unknown_tag_is_rejected() {
    let _ = tracing_subscriber::fmt::try_init();

    let bytes = br#"{"event_type": 1500, "payload": {}}"#;
    let error = Event::decode(bytes).unwrap_err();
    assert!(matches!(error, EventError::UnknownTag(1500)));
}

#[test]
fn test_payload_must_match_tag() {
    // A ping payload under the run-check tag
    let bytes = br#"{"event_type": 1000, "payload": {"at": "2024-05-01T12:00:00Z"}}"#;
    let error = Event::decode(bytes).unwrap_err();
    assert!(matches!(error, EventError::Decode(_)));
}

#[test]
fn test_malformed_envelope_is_a_decode_error() {
    let error = Event::decode(b"not json").unwrap_err();
    assert!(matches!(error, EventError::Decode(_)));
}
