// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trial-expiry guard.
//!
//! Supported strategies:
//! - Absolute expiry instant in UTC (takes precedence)
//! - Relative trial duration from first use
//! - Disabled

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Trial length when no duration is configured (21 days).
pub const DEFAULT_TRIAL_DURATION_MS: i64 = 1_814_400_000;

/// How the access period is bounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpiryPolicy {
    Disabled,
    ExpiresAt(DateTime<Utc>),
    Trial { duration: Duration },
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        ExpiryPolicy::Trial {
            duration: Duration::milliseconds(DEFAULT_TRIAL_DURATION_MS),
        }
    }
}

/// Evaluated expiry state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExpiryStatus {
    pub expired: bool,
    /// Milliseconds left; `None` when expiry is disabled
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub remaining_ms: Option<i64>,
    /// Expiry instant (RFC3339)
    pub expires_at: Option<String>,
}

/// Guard bound to the instant the service was first used.
#[derive(Debug, Clone)]
pub struct ExpiryGuard {
    policy: ExpiryPolicy,
    first_seen: DateTime<Utc>,
}

impl ExpiryGuard {
    pub fn new(policy: ExpiryPolicy, first_seen: DateTime<Utc>) -> Self {
        Self { policy, first_seen }
    }

    pub fn disabled() -> Self {
        Self::new(ExpiryPolicy::Disabled, Utc::now())
    }

    /// Instant at which access ends, if any.
    ///
    /// A trial that runs past the representable range ends at the latest
    /// representable instant.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        match &self.policy {
            ExpiryPolicy::Disabled => None,
            ExpiryPolicy::ExpiresAt(at) => Some(*at),
            ExpiryPolicy::Trial { duration } => Some(
                self.first_seen
                    .checked_add_signed(*duration)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC),
            ),
        }
    }

    /// Evaluate the guard at `now`. Expired once `now` reaches the expiry.
    pub fn status(&self, now: DateTime<Utc>) -> ExpiryStatus {
        match self.expires_at() {
            None => ExpiryStatus {
                expired: false,
                remaining_ms: None,
                expires_at: None,
            },
            Some(at) => ExpiryStatus {
                expired: now >= at,
                remaining_ms: Some((at - now).num_milliseconds().max(0)),
                expires_at: Some(format_utc_rfc3339(at)),
            },
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.status(now).expired
    }
}

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_disabled_never_expires() {
        let guard = ExpiryGuard::new(ExpiryPolicy::Disabled, at(2020, 1, 1));
        let status = guard.status(at(2099, 1, 1));
        assert!(!status.expired);
        assert_eq!(status.remaining_ms, None);
        assert_eq!(status.expires_at, None);
    }

    #[test]
    fn test_absolute_expiry() {
        let guard = ExpiryGuard::new(ExpiryPolicy::ExpiresAt(at(2025, 12, 31)), at(2025, 1, 1));

        assert!(!guard.is_expired(at(2025, 12, 30)));
        assert!(guard.is_expired(at(2025, 12, 31)));

        let status = guard.status(at(2026, 1, 5));
        assert_eq!(status.remaining_ms, Some(0));
        assert_eq!(status.expires_at.as_deref(), Some("2025-12-31T00:00:00Z"));
    }

    #[test]
    fn test_trial_counts_from_first_seen() {
        let guard = ExpiryGuard::new(ExpiryPolicy::default(), at(2025, 1, 1));

        assert_eq!(guard.expires_at(), Some(at(2025, 1, 22)));
        let status = guard.status(at(2025, 1, 21));
        assert!(!status.expired);
        assert_eq!(status.remaining_ms, Some(86_400_000));
        assert!(guard.is_expired(at(2025, 1, 22)));
    }

    #[test]
    fn test_huge_trial_saturates() {
        let policy = ExpiryPolicy::Trial {
            duration: Duration::milliseconds(i64::MAX),
        };
        let guard = ExpiryGuard::new(policy, at(2025, 1, 1));

        assert_eq!(guard.expires_at(), Some(DateTime::<Utc>::MAX_UTC));
        let status = guard.status(at(2025, 6, 1));
        assert!(!status.expired);
        assert!(status.remaining_ms.unwrap() > 0);
    }
}
