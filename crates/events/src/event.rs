//! Event envelope family.
//!
//! Every struct here is an immutable notification built once by its
//! producer. [`Event`] multiplexes all of them on one channel; on the wire an
//! event is `{"event_type": <code>, "payload": {...}}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::check::Check;
use crate::error::{EventError, Result};
use crate::kind::{EventTag, LifecycleKind, LivenessKind, OperationalKind, Tagged};
use crate::result::ResultEvent;
use crate::scanner::{http, tcp};

macro_rules! lifecycle_event {
    ($(#[$meta:meta])* $name:ident, $tag:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name {
            check: Check,
        }

        impl $name {
            pub fn new(check: Check) -> Self {
                Self { check }
            }

            pub fn check(&self) -> &Check {
                &self.check
            }

            pub fn into_check(self) -> Check {
                self.check
            }
        }

        impl Tagged for $name {
            const TAG: EventTag = $tag;
        }
    };
}

lifecycle_event!(
    /// A check was created in the store
    CheckInsert,
    EventTag::CHECK_INSERT
);
lifecycle_event!(
    /// A check was overwritten in the store
    CheckReplace,
    EventTag::CHECK_REPLACE
);
lifecycle_event!(
    /// A check was removed from the store
    CheckDelete,
    EventTag::CHECK_DELETE
);

/// Command asking an agent to probe a check now
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCheck {
    check_id: String,
}

impl RunCheck {
    pub fn new(check_id: impl Into<String>) -> Self {
        Self { check_id: check_id.into() }
    }

    pub fn check_id(&self) -> &str {
        &self.check_id
    }
}

impl Tagged for RunCheck {
    const TAG: EventTag = EventTag::RUN_CHECK;
}

macro_rules! result_event {
    ($(#[$meta:meta])* $name:ident, $response:ty, $tag:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            check_id: String,
            agent: String,
            region: String,
            result: $response,
        }

        impl $name {
            /// The scanner result is taken by value: a result event without
            /// a result cannot be built.
            pub fn new(
                check_id: impl Into<String>,
                agent: impl Into<String>,
                region: impl Into<String>,
                result: $response,
            ) -> Self {
                Self {
                    check_id: check_id.into(),
                    agent: agent.into(),
                    region: region.into(),
                    result,
                }
            }

            pub fn check_id(&self) -> &str {
                &self.check_id
            }

            pub fn agent(&self) -> &str {
                &self.agent
            }

            pub fn region(&self) -> &str {
                &self.region
            }

            pub fn result(&self) -> &$response {
                &self.result
            }
        }

        impl Tagged for $name {
            const TAG: EventTag = $tag;
        }
    };
}

result_event!(
    /// Result of an HTTP probe
    HttpResult,
    http::CheckResponse,
    EventTag::CHECK_HTTP_RESULT
);
result_event!(
    /// Result of a TCP probe
    TcpResult,
    tcp::CheckResponse,
    EventTag::CHECK_TCP_RESULT
);

/// Periodic sign of agent activity for a check, whatever the probe outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beat {
    check_id: String,
    action: String,
    beat_at: DateTime<Utc>,
}

impl Beat {
    pub fn new(
        check_id: impl Into<String>,
        action: impl Into<String>,
        beat_at: DateTime<Utc>,
    ) -> Self {
        Self { check_id: check_id.into(), action: action.into(), beat_at }
    }

    pub fn check_id(&self) -> &str {
        &self.check_id
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn beat_at(&self) -> DateTime<Utc> {
        self.beat_at
    }
}

impl Tagged for Beat {
    const TAG: EventTag = EventTag::BEAT;
}

/// Bare liveness signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ping {
    at: DateTime<Utc>,
}

impl Ping {
    /// Ping stamped with the current time
    pub fn new() -> Self {
        Self { at: Utc::now() }
    }

    /// Ping carrying an already known timestamp, used when replaying
    pub fn stamped(at: DateTime<Utc>) -> Self {
        Self { at }
    }

    pub fn at(&self) -> DateTime<Utc> {
        self.at
    }
}

impl Default for Ping {
    fn default() -> Self {
        Self::new()
    }
}

impl Tagged for Ping {
    const TAG: EventTag = EventTag::PING;
}

/// Any event travelling through the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    CheckInsert(CheckInsert),
    CheckReplace(CheckReplace),
    CheckDelete(CheckDelete),
    RunCheck(RunCheck),
    HttpResult(HttpResult),
    Beat(Beat),
    TcpResult(TcpResult),
    Ping(Ping),
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    event_type: u16,
    payload: &'a T,
}

#[derive(Deserialize)]
struct RawEnvelope {
    event_type: u16,
    payload: serde_json::Value,
}

fn encode_envelope<T: Tagged + Serialize>(event: &T) -> Result<Vec<u8>> {
    let envelope = EnvelopeRef { event_type: T::TAG.code(), payload: event };
    serde_json::to_vec(&envelope).map_err(EventError::Encode)
}

fn payload<T: for<'de> Deserialize<'de>>(value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(EventError::Decode)
}

impl Event {
    pub fn tag(&self) -> EventTag {
        match self {
            Event::CheckInsert(event) => event.tag(),
            Event::CheckReplace(event) => event.tag(),
            Event::CheckDelete(event) => event.tag(),
            Event::RunCheck(event) => event.tag(),
            Event::HttpResult(event) => event.tag(),
            Event::Beat(event) => event.tag(),
            Event::TcpResult(event) => event.tag(),
            Event::Ping(event) => event.tag(),
        }
    }

    /// Result capabilities, for the two result-bearing kinds
    pub fn as_result(&self) -> Option<&dyn ResultEvent> {
        match self {
            Event::HttpResult(event) => Some(event),
            Event::TcpResult(event) => Some(event),
            Event::CheckInsert(_)
            | Event::CheckReplace(_)
            | Event::CheckDelete(_)
            | Event::RunCheck(_)
            | Event::Beat(_)
            | Event::Ping(_) => None,
        }
    }

    /// Check the event refers to. Pings are not tied to a check.
    pub fn check_id(&self) -> Option<&str> {
        match self {
            Event::CheckInsert(event) => Some(&event.check().id),
            Event::CheckReplace(event) => Some(&event.check().id),
            Event::CheckDelete(event) => Some(&event.check().id),
            Event::RunCheck(event) => Some(event.check_id()),
            Event::HttpResult(event) => Some(event.check_id()),
            Event::Beat(event) => Some(event.check_id()),
            Event::TcpResult(event) => Some(event.check_id()),
            Event::Ping(_) => None,
        }
    }

    /// Envelope bytes for a shared channel
    pub fn encode(&self) -> Result<Vec<u8>> {
        match self {
            Event::CheckInsert(event) => encode_envelope(event),
            Event::CheckReplace(event) => encode_envelope(event),
            Event::CheckDelete(event) => encode_envelope(event),
            Event::RunCheck(event) => encode_envelope(event),
            Event::HttpResult(event) => encode_envelope(event),
            Event::Beat(event) => encode_envelope(event),
            Event::TcpResult(event) => encode_envelope(event),
            Event::Ping(event) => encode_envelope(event),
        }
    }

    /// Decode envelope bytes. The payload is read as the struct belonging to
    /// the envelope's tag; unknown tags are rejected.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let raw: RawEnvelope = serde_json::from_slice(bytes).map_err(EventError::Decode)?;
        let Some(tag) = EventTag::from_code(raw.event_type) else {
            warn!(event_type = raw.event_type, "Rejecting event with unknown tag");
            return Err(EventError::UnknownTag(raw.event_type));
        };

        let event = match tag {
            EventTag::Lifecycle(LifecycleKind::CheckInsert) => {
                Event::CheckInsert(payload(raw.payload)?)
            }
            EventTag::Lifecycle(LifecycleKind::CheckReplace) => {
                Event::CheckReplace(payload(raw.payload)?)
            }
            EventTag::Lifecycle(LifecycleKind::CheckDelete) => {
                Event::CheckDelete(payload(raw.payload)?)
            }
            EventTag::Operational(OperationalKind::RunCheck) => {
                Event::RunCheck(payload(raw.payload)?)
            }
            EventTag::Operational(OperationalKind::CheckHttpResult) => {
                Event::HttpResult(payload(raw.payload)?)
            }
            EventTag::Operational(OperationalKind::Beat) => Event::Beat(payload(raw.payload)?),
            EventTag::Operational(OperationalKind::CheckTcpResult) => {
                Event::TcpResult(payload(raw.payload)?)
            }
            EventTag::Liveness(LivenessKind::Ping) => Event::Ping(payload(raw.payload)?),
        };

        Ok(event)
    }
}

macro_rules! impl_from_event {
    ($($name:ident),* $(,)?) => {
        $(
            impl From<$name> for Event {
                fn from(event: $name) -> Self {
                    Event::$name(event)
                }
            }
        )*
    };
}

impl_from_event!(
    CheckInsert,
    CheckReplace,
    CheckDelete,
    RunCheck,
    HttpResult,
    Beat,
    TcpResult,
    Ping,
);
