//! Metric projection key sets and values

use std::time::Duration;

use uppe_events::result::keys;
use uppe_events::scanner::{http, tcp};
use uppe_events::{HttpResult, MetricValue, Metrics, ResultEvent};

use super::{http_event, tcp_event};

fn sorted_keys(metrics: &Metrics) -> Vec<&'static str> {
    metrics.keys().copied().collect()
}

fn sorted(mut names: Vec<&'static str>) -> Vec<&'static str> {
    names.sort_unstable();
    names
}

#[test]
fn test_http_metric_payload_scenario() {
    let event = http_event(200, Duration::from_millis(120));
    let metrics = event.metric_payload();

    let expected = Metrics::from([
        ("time_NameLookup", MetricValue::Float(120.0)),
        ("time_Connect", MetricValue::Float(120.0)),
        ("time_TLSHandshake", MetricValue::Float(120.0)),
        ("time_StartTransfer", MetricValue::Float(120.0)),
        ("time_Total", MetricValue::Float(120.0)),
        ("status_code", MetricValue::Int(200)),
    ]);
    assert_eq!(metrics, expected);
}

#[test]
fn test_tcp_metric_payload_scenario() {
    let response = tcp::CheckResponse::failed("connection refused", Duration::from_millis(3));
    let event = tcp_event(response);
    let metrics = event.metric_payload();

    assert_eq!(metrics.len(), 3);
    assert_eq!(metrics["time_Total"], MetricValue::Float(3.0));
    assert_eq!(metrics["error"], MetricValue::Text("connection refused".to_string()));
    assert_eq!(metrics["port_open"], MetricValue::Bool(false));
}

#[test]
fn test_http_key_set_is_fixed() {
    let responses = vec![
        http::CheckResponse::new(200, http::Timing::uniform(Duration::from_millis(10))),
        http::CheckResponse::new(503, http::Timing::default()),
        http::CheckResponse::failed("tls handshake timeout", http::Timing::default()),
        http::CheckResponse::default(),
    ];

    for response in responses {
        let event = HttpResult::new("chk_http", "agent", "region", response);
        assert_eq!(sorted_keys(&event.metric_payload()), sorted(keys::HTTP_KEYS.to_vec()));
    }
}

#[test]
fn test_tcp_key_set_is_fixed() {
    let responses = vec![
        tcp::CheckResponse::open(Duration::from_millis(12)),
        tcp::CheckResponse::failed("no route to host", Duration::ZERO),
        tcp::CheckResponse::default(),
    ];

    for response in responses {
        let event = tcp_event(response);
        assert_eq!(sorted_keys(&event.metric_payload()), sorted(keys::TCP_KEYS.to_vec()));
    }
}

#[test]
fn test_phase_timings_map_to_their_keys() {
    let timing = http::Timing {
        name_lookup: Duration::from_millis(1),
        connect: Duration::from_millis(2),
        tls_handshake: Duration::from_millis(3),
        start_transfer: Duration::from_millis(4),
        total: Duration::from_millis(5),
    };
    let response = http::CheckResponse::new(301, timing);
    let event = HttpResult::new("chk_http", "agent", "region", response);
    let metrics = event.metric_payload();

    assert_eq!(metrics[keys::TIME_NAME_LOOKUP].as_f64(), Some(1.0));
    assert_eq!(metrics[keys::TIME_CONNECT].as_f64(), Some(2.0));
    assert_eq!(metrics[keys::TIME_TLS_HANDSHAKE].as_f64(), Some(3.0));
    assert_eq!(metrics[keys::TIME_START_TRANSFER].as_f64(), Some(4.0));
    assert_eq!(metrics[keys::TIME_TOTAL].as_f64(), Some(5.0));
    assert_eq!(metrics[keys::STATUS_CODE], MetricValue::Int(301));
}
