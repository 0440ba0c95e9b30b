use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uppe_events::{Beat, Check};

/// Last heartbeat seen for a check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastBeat {
    pub action: String,
    pub at: DateTime<Utc>,
}

/// View of the monitored checks, rebuilt from lifecycle notifications.
///
/// Notifications are delivered at least once, so every operation here is
/// idempotent.
#[derive(Debug, Default)]
pub struct CheckRegistry {
    checks: HashMap<String, Check>,
    beats: HashMap<String, LastBeat>,
    last_ping: Option<DateTime<Utc>>,
}

impl CheckRegistry {
    pub fn insert(&mut self, check: Check) {
        let id = check.id.clone();
        match self.checks.insert(id.clone(), check) {
            Some(previous) if self.checks.get(&id) != Some(&previous) => {
                warn!(check_id = %id, "Duplicate insert changed an existing check");
            }
            _ => {}
        }
    }

    pub fn replace(&mut self, check: Check) {
        if !self.checks.contains_key(&check.id) {
            debug!(check_id = %check.id, "Replace for an unknown check, treating as insert");
        }
        self.checks.insert(check.id.clone(), check);
    }

    pub fn remove(&mut self, check_id: &str) -> Option<Check> {
        self.beats.remove(check_id);
        let removed = self.checks.remove(check_id);
        if removed.is_none() {
            debug!(check_id, "Delete for an unknown check");
        }
        removed
    }

    /// Keeps the most recent beat of a registered check. Late beats and beats
    /// for checks that are unknown or already deleted are ignored.
    pub fn record_beat(&mut self, beat: &Beat) {
        if !self.checks.contains_key(beat.check_id()) {
            debug!(check_id = %beat.check_id(), "Ignoring beat for an unknown check");
            return;
        }

        let entry = self.beats.entry(beat.check_id().to_owned()).or_insert_with(|| LastBeat {
            action: beat.action().to_owned(),
            at: beat.beat_at(),
        });
        if beat.beat_at() >= entry.at {
            entry.action = beat.action().to_owned();
            entry.at = beat.beat_at();
        }
    }

    pub fn record_ping(&mut self, at: DateTime<Utc>) {
        if self.last_ping.is_none_or(|last| at > last) {
            self.last_ping = Some(at);
        }
    }

    pub fn get(&self, check_id: &str) -> Option<&Check> {
        self.checks.get(check_id)
    }

    pub fn last_beat(&self, check_id: &str) -> Option<&LastBeat> {
        self.beats.get(check_id)
    }

    pub fn last_ping(&self) -> Option<DateTime<Utc>> {
        self.last_ping
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}
