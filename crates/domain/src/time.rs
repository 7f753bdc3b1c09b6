//! Time and timestamp helpers.
//!
//! Wall-clock [`Timestamp`]s are only used for reporting. Every debounce
//! decision uses monotonic [`Instant`]s.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

/// UTC timestamp used for status reporting (e.g. last completed cycle).
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Whether at least `delay` has passed between `since` and `now`.
///
/// A missing `since` means nothing has happened yet, so the window is
/// considered elapsed.
#[must_use]
pub fn has_elapsed(now: Instant, since: Option<Instant>, delay: Duration) -> bool {
    since.is_none_or(|since| now.saturating_duration_since(since) >= delay)
}
