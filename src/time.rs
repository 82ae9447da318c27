// SPDX-License-Identifier: Apache-2.0

//! An opaque, monotonic point in time.
//!
//! `Timestamp` values are sourced from the host transport's clock. Their
//! absolute value carries no calendar meaning; only differences between two
//! `Timestamp`s sourced from the same clock are meaningful. This mirrors how
//! `s2n_quic_core::time::Timestamp` is used so that the controller never
//! depends on `std::time::Instant`/`SystemTime` directly and stays trivially
//! drivable from synthetic clocks in tests.

use core::{fmt, time::Duration};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(Duration);

impl Timestamp {
    /// A `Timestamp` representing time zero on whatever clock produced it.
    pub const ZERO: Timestamp = Timestamp(Duration::ZERO);

    /// Constructs a `Timestamp` from a `Duration` elapsed since some
    /// unspecified epoch. Only meaningful relative to other `Timestamp`s
    /// constructed the same way.
    #[inline]
    pub const fn from_duration(duration: Duration) -> Self {
        Self(duration)
    }

    /// Returns the `Duration` that elapsed since an earlier `Timestamp`.
    ///
    /// Saturates at zero if `earlier` is actually later than `self`, since a
    /// host clock going backwards should never panic a congestion
    /// controller (§7: computed outputs saturate rather than overflow).
    #[inline]
    pub fn saturating_duration_since(self, earlier: Timestamp) -> Duration {
        self.0.saturating_sub(earlier.0)
    }

    #[inline]
    pub fn checked_add(self, duration: Duration) -> Option<Self> {
        self.0.checked_add(duration).map(Self)
    }
}

impl core::ops::Add<Duration> for Timestamp {
    type Output = Timestamp;

    #[inline]
    fn add(self, rhs: Duration) -> Timestamp {
        Timestamp(self.0 + rhs)
    }
}

impl core::ops::Sub for Timestamp {
    type Output = Duration;

    /// Returns the elapsed duration, saturating at zero instead of panicking
    /// when the right-hand side is later than `self`.
    #[inline]
    fn sub(self, rhs: Timestamp) -> Duration {
        self.saturating_duration_since(rhs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}
