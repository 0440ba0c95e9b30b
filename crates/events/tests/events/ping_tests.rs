//! Ping construction

use chrono::{Duration, Utc};
use uppe_events::{Event, EventTag, Ping, Tagged};

#[test]
fn test_new_ping_is_stamped_now() {
    let before = Utc::now();
    let ping = Ping::new();
    let after = Utc::now();

    assert_eq!(ping.tag(), EventTag::PING);
    assert!(ping.at() >= before && ping.at() <= after);
    assert!(after - ping.at() < Duration::seconds(1));
}

#[test]
fn test_ping_event_tag() {
    let event = Event::from(Ping::new());
    assert_eq!(event.tag().code(), 2000);
}
