use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::duration_nanos;

/// Phase timings of one HTTP request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    #[serde(with = "duration_nanos")]
    pub name_lookup: Duration,

    #[serde(with = "duration_nanos")]
    pub connect: Duration,

    #[serde(with = "duration_nanos")]
    pub tls_handshake: Duration,

    /// Time until the first response byte
    #[serde(with = "duration_nanos")]
    pub start_transfer: Duration,

    #[serde(with = "duration_nanos")]
    pub total: Duration,
}

impl Timing {
    /// Same duration for every phase
    pub fn uniform(duration: Duration) -> Self {
        Self {
            name_lookup: duration,
            connect: duration,
            tls_handshake: duration,
            start_transfer: duration,
            total: duration,
        }
    }
}

/// Outcome of an HTTP probe.
///
/// A probe that never got a response has `status == 0` and a non-empty
/// `error`; timings cover whatever phases completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    pub status: u16,
    pub timing: Timing,
    #[serde(default)]
    pub error: String,
}

impl CheckResponse {
    pub fn new(status: u16, timing: Timing) -> Self {
        Self { status, timing, error: String::new() }
    }

    pub fn failed(error: impl Into<String>, timing: Timing) -> Self {
        Self { status: 0, timing, error: error.into() }
    }

    pub fn is_failure(&self) -> bool {
        self.status == 0 || !self.error.is_empty()
    }
}
