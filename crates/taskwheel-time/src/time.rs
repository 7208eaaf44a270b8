//! Absolute/relative time newtypes and the default clock source.

/// An opaque point in time, expressed as nanoseconds since an
/// implementation-defined epoch.
///
/// Two `AbsTime` values are only meaningfully comparable if they came from
/// the same clock source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AbsTime(u64);

/// An opaque duration, expressed as nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelTime(u64);

impl AbsTime {
    /// The zero instant. Used as the default-clock reading before any real
    /// clock source has been installed.
    pub const ZERO: Self = Self(0);

    /// Builds an `AbsTime` from a raw nanosecond count.
    ///
    /// Intended for platform clock adapters and tests that need to
    /// construct specific instants; ordinary callers should obtain values
    /// from [`now`] or [`offset`].
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    /// Returns the raw nanosecond count since the epoch.
    #[must_use]
    pub const fn as_nanos(self) -> u64 {
        self.0
    }

    /// Returns `true` if `self` is strictly before `other`.
    #[must_use]
    pub const fn is_before(self, other: Self) -> bool {
        self.0 < other.0
    }

    /// Returns `true` if `self` is strictly after `other`.
    #[must_use]
    pub const fn is_after(self, other: Self) -> bool {
        self.0 > other.0
    }
}

impl RelTime {
    /// Builds a `RelTime` from a raw nanosecond count.
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    /// Returns the raw nanosecond count.
    #[must_use]
    pub const fn as_nanos(self) -> u64 {
        self.0
    }
}

/// Returns `abs` advanced by `rel`, saturating at `u64::MAX` rather than
/// wrapping.
#[must_use]
pub const fn offset(abs: AbsTime, rel: RelTime) -> AbsTime {
    AbsTime(abs.0.saturating_add(rel.0))
}

/// Returns the current time from the platform clock.
///
/// With the `std` feature enabled this is a monotonic clock anchored at the
/// first call (so repeated calls within a process are comparable). Without
/// `std`, no platform clock is available and this always returns
/// [`AbsTime::ZERO`]; a host firmware is expected to install its own clock
/// via the scheduler's time-function override.
#[must_use]
pub fn now() -> AbsTime {
    #[cfg(feature = "std")]
    {
        std_clock::now()
    }
    #[cfg(not(feature = "std"))]
    {
        AbsTime::ZERO
    }
}

#[cfg(feature = "std")]
mod std_clock {
    use super::AbsTime;
    use std::sync::OnceLock;
    use std::time::Instant;

    static EPOCH: OnceLock<Instant> = OnceLock::new();

    pub(super) fn now() -> AbsTime {
        let epoch = EPOCH.get_or_init(Instant::now);
        let nanos = u64::try_from(epoch.elapsed().as_nanos()).unwrap_or(u64::MAX);
        AbsTime::from_nanos(nanos)
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn ordering_matches_raw_nanos() {
        let a = AbsTime::from_nanos(5);
        let b = AbsTime::from_nanos(10);
        assert!(a.is_before(b));
        assert!(b.is_after(a));
        assert!(!a.is_after(b));
        assert!(!b.is_before(a));
    }

    #[test]
    fn equal_instants_are_neither_before_nor_after() {
        let a = AbsTime::from_nanos(7);
        let b = AbsTime::from_nanos(7);
        assert!(!a.is_before(b));
        assert!(!a.is_after(b));
    }

    #[test]
    fn offset_adds_relative_time() {
        let base = AbsTime::from_nanos(100);
        let delay = RelTime::from_nanos(5);
        assert_eq!(offset(base, delay), AbsTime::from_nanos(105));
    }

    #[test]
    fn offset_saturates_instead_of_wrapping() {
        let base = AbsTime::from_nanos(u64::MAX - 1);
        let delay = RelTime::from_nanos(10);
        assert_eq!(offset(base, delay), AbsTime::from_nanos(u64::MAX));
    }

    #[test]
    fn now_is_monotonic_non_decreasing() {
        let a = now();
        let b = now();
        assert!(!b.is_before(a));
    }
}
