//! Uppe events - the vocabulary shared by scanners, the dispatcher and the
//! metric/queue writers.
//!
//! Every value that crosses the monitoring pipeline is an [`Event`]: check
//! lifecycle notifications, run triggers, scanner results, heartbeats and
//! pings. Result events additionally implement [`ResultEvent`], which
//! provides the metric and queue projections consumers write out.

pub mod check;
pub mod error;
pub mod event;
pub mod kind;
pub mod result;
pub mod scanner;

// Re-export main types
pub use check::{Check, CheckKind};
pub use error::{EventError, Result};
pub use event::{
    Beat, CheckDelete, CheckInsert, CheckReplace, Event, HttpResult, Ping, RunCheck, TcpResult,
};
pub use kind::{Band, EventTag, LifecycleKind, LivenessKind, OperationalKind, Tagged};
pub use result::{MetricValue, Metrics, ResultEvent, Routing};
