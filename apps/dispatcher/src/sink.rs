//! Destinations for result events.
//!
//! The real time-series database and message queue sit behind these traits;
//! the dispatcher only hands over finished points and messages.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;
use uppe_events::{MetricValue, Metrics, ResultEvent, Routing};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Sink is closed")]
    Closed,

    #[error("Sink rejected {what}: {reason}")]
    Rejected { what: &'static str, reason: String },
}

/// One row for the time-series backend
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
    pub measurement: String,
    pub tags: BTreeMap<&'static str, String>,
    pub fields: Metrics,
    pub at: DateTime<Utc>,
}

impl MetricPoint {
    /// Point for `event`, tagged with its routing attributes
    pub fn from_result(prefix: &str, event: &dyn ResultEvent, at: DateTime<Utc>) -> Self {
        let tags = BTreeMap::from([
            ("check_id", event.check_id().to_owned()),
            ("agent", event.agent().to_owned()),
            ("region", event.region().to_owned()),
        ]);

        Self {
            measurement: format!("{prefix}_{}", event.check_type()),
            tags,
            fields: event.metric_payload(),
            at,
        }
    }

    /// Influx line protocol rendering
    pub fn to_line_protocol(&self) -> String {
        let mut line = escape(&self.measurement, &[',', ' ']);
        for (key, value) in &self.tags {
            line.push(',');
            line.push_str(key);
            line.push('=');
            line.push_str(&escape(value, &[',', '=', ' ']));
        }

        let fields: Vec<String> = self
            .fields
            .iter()
            .map(|(key, value)| format!("{key}={}", field_value(value)))
            .collect();
        line.push(' ');
        line.push_str(&fields.join(","));

        if let Some(nanos) = self.at.timestamp_nanos_opt() {
            line.push(' ');
            line.push_str(&nanos.to_string());
        }
        line
    }
}

/// Backslash-escape `special` characters. Measurements take `,` and space,
/// tag values additionally `=`.
fn escape(raw: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if special.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn field_value(value: &MetricValue) -> String {
    match value {
        MetricValue::Bool(value) => value.to_string(),
        MetricValue::Int(value) => format!("{value}i"),
        MetricValue::Float(value) => value.to_string(),
        MetricValue::Text(value) => {
            format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
        }
    }
}

/// One message for the result queue
#[derive(Debug, Clone, PartialEq)]
pub struct QueueMessage {
    pub topic: String,
    pub routing: Routing,
    pub body: Vec<u8>,
}

#[async_trait::async_trait]
pub trait MetricSink: Send + Sync {
    async fn write(&self, point: MetricPoint) -> Result<(), SinkError>;
}

#[async_trait::async_trait]
pub trait QueueSink: Send + Sync {
    async fn publish(&self, message: QueueMessage) -> Result<(), SinkError>;
}

/// Writes everything to the log. Used when no backend is configured.
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait::async_trait]
impl MetricSink for LogSink {
    async fn write(&self, point: MetricPoint) -> Result<(), SinkError> {
        info!(target: "uppe::metrics", line = %point.to_line_protocol(), "Metric point");
        Ok(())
    }
}

#[async_trait::async_trait]
impl QueueSink for LogSink {
    async fn publish(&self, message: QueueMessage) -> Result<(), SinkError> {
        info!(
            target: "uppe::queue",
            topic = %message.topic,
            check_id = %message.routing.check_id,
            check_type = %message.routing.check_type,
            agent = %message.routing.agent,
            region = %message.routing.region,
            body = %String::from_utf8_lossy(&message.body),
            "Queue message"
        );
        Ok(())
    }
}

/// Keeps everything it receives, for tests and dry runs
#[derive(Debug, Default)]
pub struct MemorySink {
    points: Mutex<Vec<MetricPoint>>,
    messages: Mutex<Vec<QueueMessage>>,
    closed: AtomicBool,
}

impl MemorySink {
    pub fn points(&self) -> Vec<MetricPoint> {
        self.points.lock().map(|points| points.clone()).unwrap_or_default()
    }

    pub fn messages(&self) -> Vec<QueueMessage> {
        self.messages.lock().map(|messages| messages.clone()).unwrap_or_default()
    }

    /// Every later write fails with [`SinkError::Closed`]
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn ensure_open(&self) -> Result<(), SinkError> {
        if self.closed.load(Ordering::SeqCst) { Err(SinkError::Closed) } else { Ok(()) }
    }
}

#[async_trait::async_trait]
impl MetricSink for MemorySink {
    async fn write(&self, point: MetricPoint) -> Result<(), SinkError> {
        self.ensure_open()?;
        self.points
            .lock()
            .map_err(|e| SinkError::Rejected { what: "metric point", reason: e.to_string() })?
            .push(point);
        Ok(())
    }
}

#[async_trait::async_trait]
impl QueueSink for MemorySink {
    async fn publish(&self, message: QueueMessage) -> Result<(), SinkError> {
        self.ensure_open()?;
        self.messages
            .lock()
            .map_err(|e| SinkError::Rejected { what: "queue message", reason: e.to_string() })?
            .push(message);
        Ok(())
    }
}
