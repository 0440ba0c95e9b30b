use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::duration_nanos;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    #[serde(with = "duration_nanos")]
    pub total: Duration,
}

/// Outcome of a TCP connect probe
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    pub timing: Timing,
    /// Empty when the connection succeeded
    #[serde(default)]
    pub error: String,
    pub port_open: bool,
}

impl CheckResponse {
    pub fn open(total: Duration) -> Self {
        Self { timing: Timing { total }, error: String::new(), port_open: true }
    }

    pub fn failed(error: impl Into<String>, total: Duration) -> Self {
        Self { timing: Timing { total }, error: error.into(), port_open: false }
    }
}
