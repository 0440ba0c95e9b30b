//! Queue projection encoding

use std::time::Duration;

use uppe_events::scanner::{http, tcp};
use uppe_events::{EventError, HttpResult, ResultEvent, TcpResult};

use super::{http_event, tcp_event};

#[test]
fn test_http_queue_payload_decodes_to_the_result() {
    let event = HttpResult::new(
        "chk_http",
        "agent-ams-1",
        "eu-west",
        http::CheckResponse {
            status: 502,
            timing: http::Timing {
                name_lookup: Duration::from_micros(850),
                connect: Duration::from_millis(14),
                tls_handshake: Duration::from_millis(31),
                start_transfer: Duration::from_millis(220),
                total: Duration::from_millis(224),
            },
            error: String::new(),
        },
    );

    let payload = event.queue_payload().unwrap();
    let decoded: http::CheckResponse = serde_json::from_slice(&payload).unwrap();
    assert_eq!(&decoded, event.result());
}

#[test]
fn test_tcp_queue_payload_decodes_to_the_result() {
    let response = tcp::CheckResponse::failed("connection refused", Duration::from_millis(2));
    let event = tcp_event(response);

    let payload = event.queue_payload().unwrap();
    let decoded: tcp::CheckResponse = serde_json::from_slice(&payload).unwrap();
    assert_eq!(&decoded, event.result());
}

#[test]
fn test_queue_payload_leaves_out_envelope_metadata() {
    let payload = http_event(200, Duration::from_millis(5)).queue_payload().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&payload).unwrap();

    let object = value.as_object().unwrap();
    assert!(!object.contains_key("agent"));
    assert!(!object.contains_key("region"));
    assert!(!object.contains_key("check_id"));
    assert_eq!(value["status"], 200);
    assert_eq!(value["timing"]["total"], 5_000_000);
}

#[test]
fn test_queue_payload_is_deterministic() {
    let event = tcp_event(tcp::CheckResponse::open(Duration::from_millis(40)));
    assert_eq!(event.queue_payload().unwrap(), event.queue_payload().unwrap());
}

#[test]
fn test_unrepresentable_duration_is_an_encode_error() {
    let response = tcp::CheckResponse::open(Duration::MAX);
    let event = TcpResult::new("chk_tcp", "agent", "region", response);

    let error = event.queue_payload().unwrap_err();
    assert!(matches!(error, EventError::Encode(_)), "unexpected error: {error:?}");
    assert!(std::error::Error::source(&error).is_some());
}
