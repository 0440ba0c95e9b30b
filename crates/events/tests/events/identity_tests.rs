//! Identity and kind accessors of result events

use std::time::Duration;

use uppe_events::scanner::tcp;
use uppe_events::{Event, ResultEvent};

use super::{http_event, tcp_event};

#[test]
fn test_check_type_per_variant() {
    let http = http_event(200, Duration::from_millis(1));
    let tcp = tcp_event(tcp::CheckResponse::default());

    assert_eq!(ResultEvent::check_type(&http), "http");
    assert_eq!(ResultEvent::check_type(&tcp), "tcp");
}

#[test]
fn test_check_id_is_stable() {
    let event = http_event(404, Duration::from_millis(9));
    let first = ResultEvent::check_id(&event).to_string();
    let second = ResultEvent::check_id(&event).to_string();
    assert_eq!(first, second);
    assert_eq!(first, "chk_http");
}

#[test]
fn test_result_capabilities_through_event() {
    let events = vec![
        Event::from(http_event(200, Duration::from_millis(1))),
        Event::from(tcp_event(tcp::CheckResponse::open(Duration::from_millis(1)))),
    ];

    let types: Vec<&str> = events
        .iter()
        .filter_map(Event::as_result)
        .map(|result| result.check_type())
        .collect();
    assert_eq!(types, vec!["http", "tcp"]);
}
