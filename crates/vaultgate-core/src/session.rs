//! The session record the gate keeps in [`SessionStorage`].

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::error::StorageError;
use crate::storage::SessionStorage;

/// Storage key for the authenticated flag
pub const AUTHENTICATED_KEY: &str = "vault_authenticated";

/// Storage key for the issuance time (Unix epoch milliseconds)
pub const TIMESTAMP_KEY: &str = "vault_auth_timestamp";

/// Session lifetime in minutes. Edit here to change it.
pub const SESSION_TIMEOUT_MINUTES: i64 = 30;

/// Value stored under [`AUTHENTICATED_KEY`] for a logged-in session
const AUTHENTICATED_VALUE: &str = "true";

pub fn session_timeout() -> Duration {
    Duration::minutes(SESSION_TIMEOUT_MINUTES)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionRecord {
    pub authenticated: bool,
    pub issued_at: DateTime<Utc>,
}

impl SessionRecord {
    /// A fresh record for a login that just succeeded
    pub fn issue(now: DateTime<Utc>) -> Self {
        Self {
            authenticated: true,
            issued_at: now,
        }
    }

    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.issued_at
    }

    /// Strictly older than the timeout. A record issued in the future
    /// (clock skew) has negative age and is not expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.age(now) > session_timeout()
    }

    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.authenticated && !self.is_expired(now)
    }

    pub fn time_until_expiry(&self, now: DateTime<Utc>) -> Duration {
        session_timeout() - self.age(now)
    }

    /// Get minutes remaining until expiry (for display)
    pub fn minutes_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        self.time_until_expiry(now).num_minutes().max(0)
    }

    /// Read the record. Missing or unparseable entries yield `Ok(None)`;
    /// only backend failures are errors.
    pub fn load(storage: &impl SessionStorage) -> Result<Option<Self>, StorageError> {
        let flag = storage.get(AUTHENTICATED_KEY)?;
        let timestamp = storage.get(TIMESTAMP_KEY)?;

        let (Some(flag), Some(timestamp)) = (flag, timestamp) else {
            return Ok(None);
        };

        let Some(issued_at) = parse_timestamp(&timestamp) else {
            debug!(%timestamp, "Ignoring session record with malformed timestamp");
            return Ok(None);
        };

        Ok(Some(Self {
            authenticated: flag == AUTHENTICATED_VALUE,
            issued_at,
        }))
    }

    pub fn save(&self, storage: &impl SessionStorage) -> Result<(), StorageError> {
        let flag = if self.authenticated { AUTHENTICATED_VALUE } else { "false" };
        storage.set(AUTHENTICATED_KEY, flag)?;
        storage.set(TIMESTAMP_KEY, &self.issued_at.timestamp_millis().to_string())?;
        Ok(())
    }

    /// Delete both entries
    pub fn clear(storage: &impl SessionStorage) -> Result<(), StorageError> {
        storage.remove(AUTHENTICATED_KEY)?;
        storage.remove(TIMESTAMP_KEY)?;
        Ok(())
    }
}

/// Parse epoch milliseconds. Rejects instants whose expiry would fall
/// outside the representable range.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let millis: i64 = raw.parse().ok()?;
    let issued_at = DateTime::from_timestamp_millis(millis)?;
    issued_at.checked_add_signed(session_timeout())?;
    Some(issued_at)
}
