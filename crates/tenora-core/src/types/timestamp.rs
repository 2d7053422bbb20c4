//! Timestamp: a point in time, sampled once per transaction.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Tenor;

/// A point in time as whole unix seconds.
///
/// The core never reads a clock. Callers sample the time once at
/// transaction start and pass it in; it is constant for the duration of
/// that transaction.
///
/// The zero timestamp is reserved: an offer with `max_due_date == 0`
/// and an empty curve is the null offer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The zero timestamp.
    pub const ZERO: Self = Self(0);

    /// Creates a timestamp from whole unix seconds.
    #[must_use]
    pub const fn from_unix(seconds: u64) -> Self {
        Self(seconds)
    }

    /// Creates a timestamp from a [`chrono::DateTime`].
    ///
    /// Returns `None` for dates before the unix epoch.
    #[must_use]
    pub fn from_datetime(dt: DateTime<Utc>) -> Option<Self> {
        u64::try_from(dt.timestamp()).ok().map(Self)
    }

    /// Returns the timestamp as whole unix seconds.
    #[must_use]
    pub const fn as_unix(self) -> u64 {
        self.0
    }

    /// Returns true if this is the reserved zero timestamp.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Advances the timestamp by a tenor, checked.
    #[must_use]
    pub fn checked_add(self, tenor: Tenor) -> Option<Self> {
        self.0.checked_add(tenor.as_seconds()).map(Self)
    }

    /// Returns the tenor from `self` until `later`, or `None` when
    /// `later` is in the past.
    #[must_use]
    pub fn until(self, later: Self) -> Option<Tenor> {
        later.0.checked_sub(self.0).map(Tenor::from_seconds)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_add() {
        let t = Timestamp::from_unix(1_000);
        assert_eq!(
            t.checked_add(Tenor::from_seconds(500)),
            Some(Timestamp::from_unix(1_500))
        );
        assert_eq!(Timestamp::from_unix(u64::MAX).checked_add(Tenor::from_seconds(1)), None);
    }

    #[test]
    fn test_until() {
        let now = Timestamp::from_unix(1_000);
        let due = Timestamp::from_unix(1_000 + 86_400);
        assert_eq!(now.until(due), Some(Tenor::from_days(1)));
        assert_eq!(due.until(now), None);
    }

    #[test]
    fn test_from_datetime() {
        let dt = DateTime::parse_from_rfc3339("2025-06-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let ts = Timestamp::from_datetime(dt).unwrap();
        assert_eq!(ts.as_unix(), 1_748_736_000);
    }
}
