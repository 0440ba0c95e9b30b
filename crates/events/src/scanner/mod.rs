//! Result structures produced by the HTTP and TCP scanners.
//!
//! The scanners themselves live elsewhere; these are the shapes they hand
//! over, and the exact bodies written to the result queue.

pub mod http;
pub mod tcp;

/// Serde helpers writing a `Duration` as integer nanoseconds.
pub(crate) mod duration_nanos {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, ser::Error as _};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let nanos = u64::try_from(duration.as_nanos()).map_err(|_| {
            S::Error::custom(format!("duration {duration:?} does not fit in u64 nanoseconds"))
        })?;
        serializer.serialize_u64(nanos)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_nanos)
    }
}
