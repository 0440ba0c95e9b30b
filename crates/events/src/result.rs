//! Projections shared by every result event.
//!
//! A result event is written twice: once as a flat set of metric fields for
//! the time-series backend, once as the raw scanner result for the durable
//! queue. Both shapes are part of the contract with the consumers.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EventError, Result};
use crate::event::{HttpResult, TcpResult};
use crate::kind::Tagged;

/// Metric field names
pub mod keys {
    pub const TIME_NAME_LOOKUP: &str = "time_NameLookup";
    pub const TIME_CONNECT: &str = "time_Connect";
    pub const TIME_TLS_HANDSHAKE: &str = "time_TLSHandshake";
    pub const TIME_START_TRANSFER: &str = "time_StartTransfer";
    pub const TIME_TOTAL: &str = "time_Total";
    pub const STATUS_CODE: &str = "status_code";
    pub const ERROR: &str = "error";
    pub const PORT_OPEN: &str = "port_open";

    pub const HTTP_KEYS: [&str; 6] = [
        TIME_NAME_LOOKUP,
        TIME_CONNECT,
        TIME_TLS_HANDSHAKE,
        TIME_START_TRANSFER,
        TIME_TOTAL,
        STATUS_CODE,
    ];

    pub const TCP_KEYS: [&str; 3] = [TIME_TOTAL, ERROR, PORT_OPEN];
}

/// A single metric field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl MetricValue {
    /// Milliseconds, keeping sub-millisecond precision
    pub fn millis(duration: Duration) -> Self {
        MetricValue::Float(duration.as_nanos() as f64 / 1_000_000.0)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Int(value) => Some(*value as f64),
            MetricValue::Float(value) => Some(*value),
            MetricValue::Bool(_) | MetricValue::Text(_) => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Bool(value) => write!(f, "{value}"),
            MetricValue::Int(value) => write!(f, "{value}"),
            MetricValue::Float(value) => write!(f, "{value}"),
            MetricValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<bool> for MetricValue {
    fn from(value: bool) -> Self {
        MetricValue::Bool(value)
    }
}

impl From<u16> for MetricValue {
    fn from(value: u16) -> Self {
        MetricValue::Int(i64::from(value))
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_owned())
    }
}

/// Metric fields keyed by name, ordered for stable output
pub type Metrics = BTreeMap<&'static str, MetricValue>;

/// Attributes sent next to a queue payload. They are not part
/// of the payload body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routing {
    pub check_id: String,
    pub check_type: String,
    pub agent: String,
    pub region: String,
}

/// Capabilities of an event carrying a scanner result
pub trait ResultEvent: Send + Sync {
    /// Check the result belongs to
    fn check_id(&self) -> &str;

    /// `"http"` or `"tcp"`
    fn check_type(&self) -> &'static str;

    /// Agent that ran the probe
    fn agent(&self) -> &str;

    /// Region the agent runs in
    fn region(&self) -> &str;

    /// Fields for the time-series backend. Every key of the variant is
    /// always present, failed probes included.
    fn metric_payload(&self) -> Metrics;

    /// JSON body of the wrapped scanner result, for the result queue
    fn queue_payload(&self) -> Result<Vec<u8>>;

    fn routing(&self) -> Routing {
        Routing {
            check_id: self.check_id().to_owned(),
            check_type: self.check_type().to_owned(),
            agent: self.agent().to_owned(),
            region: self.region().to_owned(),
        }
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(EventError::Encode)
}

impl ResultEvent for HttpResult {
    fn check_id(&self) -> &str {
        self.check_id()
    }

    fn check_type(&self) -> &'static str {
        "http"
    }

    fn agent(&self) -> &str {
        self.agent()
    }

    fn region(&self) -> &str {
        self.region()
    }

    fn metric_payload(&self) -> Metrics {
        let response = self.result();
        let timing = &response.timing;
        Metrics::from([
            (keys::TIME_NAME_LOOKUP, MetricValue::millis(timing.name_lookup)),
            (keys::TIME_CONNECT, MetricValue::millis(timing.connect)),
            (keys::TIME_TLS_HANDSHAKE, MetricValue::millis(timing.tls_handshake)),
            (keys::TIME_START_TRANSFER, MetricValue::millis(timing.start_transfer)),
            (keys::TIME_TOTAL, MetricValue::millis(timing.total)),
            (keys::STATUS_CODE, MetricValue::from(response.status)),
        ])
    }

    fn queue_payload(&self) -> Result<Vec<u8>> {
        let payload = encode(self.result())?;
        debug!(
            check_id = %self.check_id(),
            tag = %Self::TAG,
            size = payload.len(),
            "Encoded queue payload"
        );
        Ok(payload)
    }
}

impl ResultEvent for TcpResult {
    fn check_id(&self) -> &str {
        self.check_id()
    }

    fn check_type(&self) -> &'static str {
        "tcp"
    }

    fn agent(&self) -> &str {
        self.agent()
    }

    fn region(&self) -> &str {
        self.region()
    }

    fn metric_payload(&self) -> Metrics {
        let response = self.result();
        Metrics::from([
            (keys::TIME_TOTAL, MetricValue::millis(response.timing.total)),
            (keys::ERROR, MetricValue::from(response.error.as_str())),
            (keys::PORT_OPEN, MetricValue::from(response.port_open)),
        ])
    }

    fn queue_payload(&self) -> Result<Vec<u8>> {
        let payload = encode(self.result())?;
        debug!(
            check_id = %self.check_id(),
            tag = %Self::TAG,
            size = payload.len(),
            "Encoded queue payload"
        );
        Ok(payload)
    }
}
