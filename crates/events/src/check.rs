use std::fmt;

use serde::{Deserialize, Serialize};

/// Type of probe a check runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    Http,
    Tcp,
}

impl CheckKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            CheckKind::Http => "http",
            CheckKind::Tcp => "tcp",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A monitored target as stored by the persistence layer.
///
/// The event model only relies on `id`; the remaining fields ride along so
/// consumers of lifecycle events do not need a second lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    /// Identifier assigned by the store
    pub id: String,

    pub kind: CheckKind,

    /// URL for HTTP checks, `host:port` for TCP checks
    pub target: String,

    /// Seconds between two runs
    pub interval_secs: u64,
}

impl Check {
    pub fn new(id: impl Into<String>, kind: CheckKind, target: impl Into<String>) -> Self {
        Self { id: id.into(), kind, target: target.into(), interval_secs: 60 }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs;
        self
    }
}
