// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 GridSentinel Labs

//! Time helpers for GridSentinel
//!
//! Thin wrappers over the platform's monotonic millisecond clock. All
//! arithmetic saturates; a clock that jumps backwards yields an elapsed
//! time of zero rather than a huge interval.

use crate::types::TimestampMs;

/// A point on the platform's monotonic millisecond clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Instant(TimestampMs);

impl Instant {
    /// Create from a raw millisecond timestamp
    #[must_use]
    pub const fn from_millis(ms: TimestampMs) -> Self {
        Self(ms)
    }

    /// Get the raw millisecond value
    #[must_use]
    pub const fn as_millis(&self) -> TimestampMs {
        self.0
    }

    /// Milliseconds elapsed between this instant and `now`
    #[must_use]
    pub const fn elapsed(&self, now: Self) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// Check whether `interval_ms` has passed since this instant
    #[must_use]
    pub const fn has_elapsed(&self, now: Self, interval_ms: u64) -> bool {
        self.elapsed(now) >= interval_ms
    }
}

impl From<TimestampMs> for Instant {
    fn from(value: TimestampMs) -> Self {
        Self(value)
    }
}

impl From<Instant> for TimestampMs {
    fn from(value: Instant) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_saturates_on_clock_regression() {
        let later = Instant::from_millis(1000);
        let earlier = Instant::from_millis(400);
        assert_eq!(later.elapsed(earlier), 0);
        assert_eq!(earlier.elapsed(later), 600);
    }

    #[test]
    fn interval_check() {
        let start = Instant::from_millis(100);
        assert!(!start.has_elapsed(Instant::from_millis(149), 50));
        assert!(start.has_elapsed(Instant::from_millis(150), 50));
    }
}
