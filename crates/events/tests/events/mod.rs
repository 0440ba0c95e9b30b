/// Event model tests
pub mod envelope_tests;
pub mod identity_tests;
pub mod metric_payload_tests;
pub mod ping_tests;
pub mod queue_payload_tests;

use std::time::Duration;

use uppe_events::scanner::{http, tcp};
use uppe_events::{HttpResult, TcpResult};

pub fn http_event(status: u16, every_phase: Duration) -> HttpResult {
    HttpResult::new(
        "chk_http",
        "agent-ams-1",
        "eu-west",
        http::CheckResponse::new(status, http::Timing::uniform(every_phase)),
    )
}

pub fn tcp_event(response: tcp::CheckResponse) -> TcpResult {
    TcpResult::new("chk_tcp", "agent-sgp-2", "ap-south", response)
}
