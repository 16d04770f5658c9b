use core::{cell::Cell, cmp::Ordering};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::Result,
    generator::{
        DEFAULT_REPEAT_RATE, SnowflakeGenerator, check_machine_ids, cold_clock_behind,
        sample_index,
    },
    id::SnowflakeId,
    rand::RandSource,
    time::TimeSource,
};

/// A non-concurrent Snowflake ID generator suitable for single-threaded
/// environments.
///
/// This generator is lightweight and fast, but **not thread-safe**: it reads
/// and mutates its timestamp/sequence state without synchronization. Callers
/// that share one instance must serialize access themselves, or use
/// [`LockSnowflakeGenerator`] instead.
///
/// ## Recommended When
/// - You're in a single-threaded environment (no shared access)
/// - You want the fastest generator
///
/// ## See Also
/// - [`LockSnowflakeGenerator`]
///
/// [`LockSnowflakeGenerator`]: crate::generator::LockSnowflakeGenerator
pub struct BasicSnowflakeGenerator<T, R>
where
    T: TimeSource<u64>,
    R: RandSource<u8>,
{
    state: Cell<SnowflakeId>,
    time: T,
    rand: R,
}

impl<T, R> BasicSnowflakeGenerator<T, R>
where
    T: TimeSource<u64>,
    R: RandSource<u8>,
{
    /// Creates a new [`BasicSnowflakeGenerator`] for the given machine
    /// identity.
    ///
    /// The initial timestamp and sequence are zero; any live clock reading
    /// is strictly greater, so the first generated ID always takes the
    /// fresh-millisecond path.
    ///
    /// # Parameters
    ///
    /// - `worker_id`: identity of the issuing process within its data
    ///   center, externally assigned. Must fit 5 bits.
    /// - `data_center_id`: identity of the data center, externally assigned.
    ///   Must fit 5 bits.
    /// - `time`: a [`TimeSource`] implementation (e.g., [`WallClock`]) that
    ///   determines how timestamps are read.
    /// - `rand`: a [`RandSource`] implementation (e.g., [`ThreadRandom`])
    ///   used by [`Self::sample_n`] to pick the returned ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerIdOutOfRange`] or
    /// [`Error::DataCenterIdOutOfRange`] if either identifier exceeds its
    /// field. No partial generator is created.
    ///
    /// # Example
    /// ```
    /// use frostid::{BasicSnowflakeGenerator, ThreadRandom, WallClock};
    ///
    /// let generator =
    ///     BasicSnowflakeGenerator::new(1, 1, WallClock::default(), ThreadRandom).unwrap();
    ///
    /// let id = generator.try_next_id().unwrap();
    /// ```
    ///
    /// [`TimeSource`]: crate::time::TimeSource
    /// [`WallClock`]: crate::time::WallClock
    /// [`RandSource`]: crate::rand::RandSource
    /// [`ThreadRandom`]: crate::rand::ThreadRandom
    /// [`Error::WorkerIdOutOfRange`]: crate::Error::WorkerIdOutOfRange
    /// [`Error::DataCenterIdOutOfRange`]: crate::Error::DataCenterIdOutOfRange
    pub fn new(worker_id: u64, data_center_id: u64, time: T, rand: R) -> Result<Self> {
        Self::from_components(worker_id, data_center_id, 0, time, rand)
    }

    /// Creates a new ID generator from explicit component values.
    ///
    /// This constructor is primarily useful for controlling the starting
    /// sequence manually. The seed is truncated to the 12-bit field when
    /// packed and is discarded on the first rollover to a fresh millisecond,
    /// so callers should not rely on out-of-range seeding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerIdOutOfRange`] or
    /// [`Error::DataCenterIdOutOfRange`] if either identifier exceeds its
    /// field.
    ///
    /// [`Error::WorkerIdOutOfRange`]: crate::Error::WorkerIdOutOfRange
    /// [`Error::DataCenterIdOutOfRange`]: crate::Error::DataCenterIdOutOfRange
    pub fn from_components(
        worker_id: u64,
        data_center_id: u64,
        sequence: u64,
        time: T,
        rand: R,
    ) -> Result<Self> {
        check_machine_ids(worker_id, data_center_id)?;
        let id = SnowflakeId::from(0, data_center_id, worker_id, sequence);
        Ok(Self {
            state: Cell::new(id),
            time,
            rand,
        })
    }

    /// Generates the next available ID.
    ///
    /// Returns a new, time-ordered ID, unique for this generator's
    /// (worker, data center) identity. If the sequence space for the current
    /// millisecond is exhausted, the call spins until the clock advances and
    /// then rolls over.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockMovedBackwards`] carrying the regression
    /// magnitude when the time source reads behind the last issued
    /// timestamp. State is not mutated on that path and no retry happens
    /// internally; a later call with a valid reading succeeds normally.
    ///
    /// # Example
    /// ```
    /// use frostid::{BasicSnowflakeGenerator, ThreadRandom, WallClock};
    ///
    /// let generator =
    ///     BasicSnowflakeGenerator::new(0, 0, WallClock::default(), ThreadRandom).unwrap();
    ///
    /// let a = generator.try_next_id().unwrap();
    /// let b = generator.try_next_id().unwrap();
    /// assert!(a < b);
    /// ```
    ///
    /// [`Error::ClockMovedBackwards`]: crate::Error::ClockMovedBackwards
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_next_id(&self) -> Result<SnowflakeId> {
        let now = self.time.current_millis();
        let state = self.state.get();
        let last = state.timestamp();

        match now.cmp(&last) {
            Ordering::Equal => {
                let updated = if state.has_sequence_room() {
                    state.increment_sequence()
                } else {
                    state.rollover_to_timestamp(self.until_next_millis(last))
                };
                self.state.set(updated);
                Ok(updated)
            }
            Ordering::Greater => {
                let updated = state.rollover_to_timestamp(now);
                self.state.set(updated);
                Ok(updated)
            }
            Ordering::Less => Err(cold_clock_behind(now, last)),
        }
    }

    /// Generates `repeat_rate` IDs and returns the one at an index drawn
    /// from the random source.
    ///
    /// Strictly more expensive than [`Self::try_next_id`] (O(`repeat_rate`)
    /// calls); the batch only obscures call-order correlation for the
    /// caller. A `repeat_rate` of zero is treated as one.
    ///
    /// # Errors
    ///
    /// Propagates any error from the underlying [`Self::try_next_id`] calls.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn sample_n(&self, repeat_rate: usize) -> Result<SnowflakeId> {
        let repeat_rate = repeat_rate.max(1);
        let chosen = sample_index(self.rand.rand(), repeat_rate);

        let mut selected = self.try_next_id()?;
        for i in 1..repeat_rate {
            let id = self.try_next_id()?;
            if i == chosen {
                selected = id;
            }
        }
        Ok(selected)
    }

    /// [`Self::sample_n`] with the [`DEFAULT_REPEAT_RATE`] batch size.
    ///
    /// # Errors
    ///
    /// Propagates any error from the underlying [`Self::try_next_id`] calls.
    pub fn sample(&self) -> Result<SnowflakeId> {
        self.sample_n(DEFAULT_REPEAT_RATE)
    }

    /// Spins until the time source reads strictly past `last`, then returns
    /// the new reading.
    ///
    /// Unbounded by design: sequence exhaustion resolves in well under a
    /// millisecond on a live clock, but a stalled time source will hang the
    /// calling thread here.
    fn until_next_millis(&self, last: u64) -> u64 {
        loop {
            let now = self.time.current_millis();
            if now > last {
                break now;
            }
            core::hint::spin_loop();
        }
    }
}

impl<T, R> SnowflakeGenerator<T, R> for BasicSnowflakeGenerator<T, R>
where
    T: TimeSource<u64>,
    R: RandSource<u8>,
{
    fn new(worker_id: u64, data_center_id: u64, time: T, rand: R) -> Result<Self> {
        Self::new(worker_id, data_center_id, time, rand)
    }

    fn from_components(
        worker_id: u64,
        data_center_id: u64,
        sequence: u64,
        time: T,
        rand: R,
    ) -> Result<Self> {
        Self::from_components(worker_id, data_center_id, sequence, time, rand)
    }

    fn try_next_id(&self) -> Result<SnowflakeId> {
        self.try_next_id()
    }

    fn sample_n(&self, repeat_rate: usize) -> Result<SnowflakeId> {
        self.sample_n(repeat_rate)
    }
}
