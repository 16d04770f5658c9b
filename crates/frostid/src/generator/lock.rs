use core::cmp::Ordering;
use std::sync::{Arc, Mutex};

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

/// A lock-based Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// This generator wraps the Snowflake state in an [`Arc<Mutex<_>>`], allowing
/// safe shared use across threads. Clones share the same state, so every
/// clone draws from one sequence.
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - Deployment policy calls for an internal lock rather than caller-side
///   serialization
///
/// ## See Also
/// - [`BasicSnowflakeGenerator`]
///
/// [`BasicSnowflakeGenerator`]: crate::generator::BasicSnowflakeGenerator
#[derive(Clone)]
pub struct LockSnowflakeGenerator<T, R>
where
    T: TimeSource<u64>,
    R: RandSource<u8>,
{
    state: Arc<Mutex<SnowflakeId>>,
    time: T,
    rand: R,
}

impl<T, R> LockSnowflakeGenerator<T, R>
where
    T: TimeSource<u64>,
    R: RandSource<u8>,
{
    /// Creates a new [`LockSnowflakeGenerator`] for the given machine
    /// identity.
    ///
    /// See [`BasicSnowflakeGenerator::new`] for parameter semantics; the two
    /// constructors are identical apart from the state container.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerIdOutOfRange`] or
    /// [`Error::DataCenterIdOutOfRange`] if either identifier exceeds its
    /// field. No partial generator is created.
    ///
    /// # Example
    /// ```
    /// use frostid::{LockSnowflakeGenerator, ThreadRandom, WallClock};
    ///
    /// let generator =
    ///     LockSnowflakeGenerator::new(1, 1, WallClock::default(), ThreadRandom).unwrap();
    ///
    /// let id = generator.try_next_id().unwrap();
    /// ```
    ///
    /// [`BasicSnowflakeGenerator::new`]: crate::generator::BasicSnowflakeGenerator::new
    /// [`Error::WorkerIdOutOfRange`]: crate::Error::WorkerIdOutOfRange
    /// [`Error::DataCenterIdOutOfRange`]: crate::Error::DataCenterIdOutOfRange
    pub fn new(worker_id: u64, data_center_id: u64, time: T, rand: R) -> Result<Self> {
        Self::from_components(worker_id, data_center_id, 0, time, rand)
    }

    /// Creates a new ID generator from explicit component values.
    ///
    /// The sequence seed is truncated to the 12-bit field when packed and is
    /// discarded on the first rollover to a fresh millisecond.
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
            state: Arc::new(Mutex::new(id)),
            time,
            rand,
        })
    }

    /// Generates the next available ID.
    ///
    /// Identical algorithm to [`BasicSnowflakeGenerator::try_next_id`], with
    /// the critical section held under the lock. When the sequence space for
    /// the current millisecond is exhausted, the lock is held across the
    /// spin so concurrent callers cannot observe a stale timestamp.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockMovedBackwards`] when the time source reads behind
    ///   the last issued timestamp; state is not mutated.
    /// - [`Error::LockPoisoned`] if a holder of the lock panicked.
    ///
    /// [`BasicSnowflakeGenerator::try_next_id`]: crate::generator::BasicSnowflakeGenerator::try_next_id
    /// [`Error::ClockMovedBackwards`]: crate::Error::ClockMovedBackwards
    /// [`Error::LockPoisoned`]: crate::Error::LockPoisoned
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_next_id(&self) -> Result<SnowflakeId> {
        let now = self.time.current_millis();
        let mut id = self.state.lock()?;

        let last = id.timestamp();
        match now.cmp(&last) {
            Ordering::Equal => {
                *id = if id.has_sequence_room() {
                    id.increment_sequence()
                } else {
                    id.rollover_to_timestamp(self.until_next_millis(last))
                };
                Ok(*id)
            }
            Ordering::Greater => {
                *id = id.rollover_to_timestamp(now);
                Ok(*id)
            }
            Ordering::Less => Err(cold_clock_behind(now, last)),
        }
    }

    /// Generates `repeat_rate` IDs and returns the one at an index drawn
    /// from the random source.
    ///
    /// The lock is acquired per generated ID, so concurrent callers may
    /// interleave their batches; each caller still receives an ID its own
    /// batch produced.
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

impl<T, R> SnowflakeGenerator<T, R> for LockSnowflakeGenerator<T, R>
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
