use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use sha2::{Digest, Sha256};

/// Which of the emails for a record a ledger key guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Owner,
    Confirmation,
}

impl NotificationKind {
    fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Owner => "owner",
            NotificationKind::Confirmation => "confirmation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    InFlight(Instant),
    Sent(Instant),
}

impl Slot {
    fn since(&self) -> Instant {
        match self {
            Slot::InFlight(at) | Slot::Sent(at) => *at,
        }
    }
}

/// Deterministic key for one email of one record.
pub fn dedup_key(record_id: &str, kind: NotificationKind) -> String {
    let mut hasher = Sha256::new();
    hasher.update(record_id.as_bytes());
    hasher.update(b":");
    hasher.update(kind.as_str().as_bytes());
    hex::encode(hasher.finalize())
}

/// Remembers which record emails were already sent so that redelivered
/// creation events do not notify twice. In-memory only.
pub struct NotificationLedger {
    /// dedup key -> slot state
    entries: DashMap<String, Slot>,
}

impl NotificationLedger {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Claim a key before sending. Returns `None` if the email was already sent
    /// or another delivery of the same event is sending it right now.
    pub fn claim(&self, key: &str) -> Option<ClaimGuard<'_>> {
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(vacant) => {
                vacant.insert(Slot::InFlight(Instant::now()));
                Some(ClaimGuard {
                    ledger: self,
                    key: key.to_string(),
                    completed: false,
                })
            }
        }
    }

    pub fn is_sent(&self, key: &str) -> bool {
        matches!(self.entries.get(key).as_deref(), Some(Slot::Sent(_)))
    }

    /// Remove entries older than the given duration.
    pub fn cleanup(&self, max_age: Duration) {
        let now = Instant::now();
        self.entries
            .retain(|_, slot| now.duration_since(slot.since()) < max_age);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for NotificationLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Held while an email is being sent. Dropping it without calling
/// [`ClaimGuard::complete`] releases the key so a redelivery can retry.
pub struct ClaimGuard<'a> {
    ledger: &'a NotificationLedger,
    key: String,
    completed: bool,
}

impl ClaimGuard<'_> {
    pub fn complete(mut self) {
        self.ledger
            .entries
            .insert(self.key.clone(), Slot::Sent(Instant::now()));
        self.completed = true;
    }
}

impl Drop for ClaimGuard<'_> {
    fn drop(&mut self) {
        if !self.completed {
            self.ledger.entries.remove(&self.key);
        }
    }
}
