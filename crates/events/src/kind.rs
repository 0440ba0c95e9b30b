//! Event tags.
//!
//! Tags are split into numeric bands, one per event family, so lifecycle,
//! operational and liveness events can share a single channel without their
//! codes ever colliding.

use std::fmt;

/// Width of every band. Offsets inside a band must stay below this.
pub const BAND_WIDTH: u16 = 1000;

/// Family an event tag belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    Lifecycle,
    Operational,
    Liveness,
}

impl Band {
    /// First code of the band
    pub const fn base(self) -> u16 {
        match self {
            Band::Lifecycle => 0,
            Band::Operational => 1000,
            Band::Liveness => 2000,
        }
    }

    /// Band a raw code falls into, if any
    pub fn of_code(code: u16) -> Option<Self> {
        match code / BAND_WIDTH {
            0 => Some(Band::Lifecycle),
            1 => Some(Band::Operational),
            2 => Some(Band::Liveness),
            _ => None,
        }
    }
}

/// Check lifecycle changes, emitted after the store has been written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum LifecycleKind {
    CheckInsert = 0,
    CheckReplace = 1,
    CheckDelete = 2,
}

/// Triggers, scanner results and heartbeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum OperationalKind {
    RunCheck = 1000,
    CheckHttpResult = 1001,
    Beat = 1002,
    CheckTcpResult = 1003,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum LivenessKind {
    Ping = 2000,
}

/// Identity of an event on the dispatch channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTag {
    Lifecycle(LifecycleKind),
    Operational(OperationalKind),
    Liveness(LivenessKind),
}

impl EventTag {
    pub const CHECK_INSERT: Self = EventTag::Lifecycle(LifecycleKind::CheckInsert);
    pub const CHECK_REPLACE: Self = EventTag::Lifecycle(LifecycleKind::CheckReplace);
    pub const CHECK_DELETE: Self = EventTag::Lifecycle(LifecycleKind::CheckDelete);
    pub const RUN_CHECK: Self = EventTag::Operational(OperationalKind::RunCheck);
    pub const CHECK_HTTP_RESULT: Self = EventTag::Operational(OperationalKind::CheckHttpResult);
    pub const BEAT: Self = EventTag::Operational(OperationalKind::Beat);
    pub const CHECK_TCP_RESULT: Self = EventTag::Operational(OperationalKind::CheckTcpResult);
    pub const PING: Self = EventTag::Liveness(LivenessKind::Ping);

    /// Every known tag, in code order
    pub const ALL: [Self; 8] = [
        Self::CHECK_INSERT,
        Self::CHECK_REPLACE,
        Self::CHECK_DELETE,
        Self::RUN_CHECK,
        Self::CHECK_HTTP_RESULT,
        Self::BEAT,
        Self::CHECK_TCP_RESULT,
        Self::PING,
    ];

    /// Numeric value written on the wire
    pub const fn code(self) -> u16 {
        match self {
            EventTag::Lifecycle(kind) => kind as u16,
            EventTag::Operational(kind) => kind as u16,
            EventTag::Liveness(kind) => kind as u16,
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        let tag = match code {
            0 => Self::CHECK_INSERT,
            1 => Self::CHECK_REPLACE,
            2 => Self::CHECK_DELETE,
            1000 => Self::RUN_CHECK,
            1001 => Self::CHECK_HTTP_RESULT,
            1002 => Self::BEAT,
            1003 => Self::CHECK_TCP_RESULT,
            2000 => Self::PING,
            _ => return None,
        };
        Some(tag)
    }

    pub const fn band(self) -> Band {
        match self {
            EventTag::Lifecycle(_) => Band::Lifecycle,
            EventTag::Operational(_) => Band::Operational,
            EventTag::Liveness(_) => Band::Liveness,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            EventTag::Lifecycle(LifecycleKind::CheckInsert) => "check_insert",
            EventTag::Lifecycle(LifecycleKind::CheckReplace) => "check_replace",
            EventTag::Lifecycle(LifecycleKind::CheckDelete) => "check_delete",
            EventTag::Operational(OperationalKind::RunCheck) => "run_check",
            EventTag::Operational(OperationalKind::CheckHttpResult) => "check_http_result",
            EventTag::Operational(OperationalKind::Beat) => "beat",
            EventTag::Operational(OperationalKind::CheckTcpResult) => "check_tcp_result",
            EventTag::Liveness(LivenessKind::Ping) => "ping",
        }
    }
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.code())
    }
}

/// Implemented by every concrete event struct. The tag is tied to the type,
/// so a struct can never carry another family's tag.
pub trait Tagged {
    const TAG: EventTag;

    fn tag(&self) -> EventTag {
        Self::TAG
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<u16> = EventTag::ALL.iter().map(|tag| tag.code()).collect();
        assert_eq!(codes.len(), EventTag::ALL.len());
    }

    #[test]
    fn test_codes_stay_inside_their_band() {
        for tag in EventTag::ALL {
            let base = tag.band().base();
            assert!(tag.code() >= base && tag.code() < base + BAND_WIDTH, "{tag} out of band");
            assert_eq!(Band::of_code(tag.code()), Some(tag.band()));
        }
    }

    #[test]
    fn test_from_code_inverts_code() {
        for tag in EventTag::ALL {
            assert_eq!(EventTag::from_code(tag.code()), Some(tag));
        }
        assert_eq!(EventTag::from_code(3), None);
        assert_eq!(EventTag::from_code(1004), None);
        assert_eq!(EventTag::from_code(9000), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(EventTag::PING.to_string(), "ping(2000)");
        assert_eq!(EventTag::CHECK_HTTP_RESULT.to_string(), "check_http_result(1001)");
    }
}
