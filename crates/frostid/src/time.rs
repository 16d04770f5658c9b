use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC
pub const TWITTER_EPOCH: Duration = Duration::from_millis(1_288_834_974_657);

/// Custom epoch: Wednesday, January 1, 2025 00:00:00 UTC
pub const CUSTOM_EPOCH: Duration = Duration::from_millis(1_735_689_600_000);

/// A trait for time sources that return a wall-clock timestamp.
///
/// This abstraction allows you to plug in the real system clock or a mocked
/// time source in tests.
///
/// The timestamp type `T` is generic (typically `u64`), and the unit is
/// expected to be **milliseconds** relative to a configurable origin.
///
/// # Example
///
/// ```
/// use frostid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource<u64> for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource<T> {
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> T;
}

/// A wall-clock time source that returns milliseconds elapsed since a
/// user-defined epoch.
///
/// Each reading goes through `SystemTime::now()`, so the values follow
/// whatever the operating system reports. If the system clock steps
/// backwards (NTP correction, manual adjustment), so do the readings; the
/// generators surface that as [`ClockMovedBackwards`] rather than papering
/// over it.
///
/// [`ClockMovedBackwards`]: crate::Error::ClockMovedBackwards
#[derive(Clone)]
pub struct WallClock {
    epoch: Duration,
}

impl Default for WallClock {
    /// Constructs a wall clock aligned to the default [`TWITTER_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(TWITTER_EPOCH)
    }
}

impl WallClock {
    /// Constructs a wall clock using a custom epoch as the origin (t = 0),
    /// specified as a [`Duration`] since 1970-01-01 UTC.
    ///
    /// The epoch defines the zero-point for all readings returned by this
    /// clock, and therefore for the timestamp field of every generated ID.
    /// The 41-bit timestamp field holds roughly 69 years of offsets, so pick
    /// an epoch near your deployment date to maximize the usable range.
    ///
    /// # Example
    ///
    /// ```
    /// use frostid::{CUSTOM_EPOCH, TimeSource, WallClock};
    ///
    /// let clock = WallClock::with_epoch(CUSTOM_EPOCH);
    /// let ts = clock.current_millis();
    /// ```
    pub fn with_epoch(epoch: Duration) -> Self {
        Self { epoch }
    }
}

impl TimeSource<u64> for WallClock {
    /// Returns the number of milliseconds since the configured epoch.
    ///
    /// Readings from before the epoch clamp to zero.
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("System clock before UNIX_EPOCH")
            .saturating_sub(self.epoch)
            .as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_clock_advances() {
        let clock = WallClock::default();
        let first = clock.current_millis();
        std::thread::sleep(Duration::from_millis(2));
        let second = clock.current_millis();
        assert!(second > first);
    }

    #[test]
    fn test_epoch_shifts_readings() {
        let unix = WallClock::with_epoch(Duration::from_millis(0));
        let twitter = WallClock::default();
        let diff = unix.current_millis() - twitter.current_millis();
        // Both readings happen within a few ms of each other, so the
        // difference stays within a tick or two of the epoch offset.
        let expected = TWITTER_EPOCH.as_millis() as u64;
        assert!(diff.abs_diff(expected) < 100);
    }
}
