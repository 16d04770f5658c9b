use crate::{
    error::{Error, Result},
    id::SnowflakeId,
    rand::RandSource,
    time::TimeSource,
};

/// Batch size used by [`SnowflakeGenerator::sample`].
///
/// Larger batches give the selection more entropy at a linear cost in
/// generated IDs.
pub const DEFAULT_REPEAT_RATE: usize = 100;

/// A minimal interface for generating Snowflake IDs.
pub trait SnowflakeGenerator<T, R>: Sized
where
    T: TimeSource<u64>,
    R: RandSource<u8>,
{
    /// Creates a new generator with the sequence starting at zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerIdOutOfRange`] or
    /// [`Error::DataCenterIdOutOfRange`] if either machine identifier does
    /// not fit its 5-bit field.
    ///
    /// [`Error::WorkerIdOutOfRange`]: crate::Error::WorkerIdOutOfRange
    /// [`Error::DataCenterIdOutOfRange`]: crate::Error::DataCenterIdOutOfRange
    fn new(worker_id: u64, data_center_id: u64, time: T, rand: R) -> Result<Self>;

    /// Creates a new generator from explicit component values, seeding the
    /// sequence counter.
    ///
    /// # Errors
    ///
    /// Same as [`SnowflakeGenerator::new`]. The sequence seed itself is not
    /// range checked; it is truncated to the field width when packed, and the
    /// first rollover to a fresh millisecond discards it.
    fn from_components(
        worker_id: u64,
        data_center_id: u64,
        sequence: u64,
        time: T,
        rand: R,
    ) -> Result<Self>;

    /// Generates the next available ID.
    ///
    /// Blocks (spinning) only when the sequence space for the current
    /// millisecond is exhausted, resuming as soon as the clock advances.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockMovedBackwards`] when the time source reads a
    /// value behind the last issued timestamp. Generator state is left
    /// untouched in that case.
    ///
    /// [`Error::ClockMovedBackwards`]: crate::Error::ClockMovedBackwards
    fn try_next_id(&self) -> Result<SnowflakeId>;

    /// Generates `repeat_rate` IDs through [`SnowflakeGenerator::try_next_id`]
    /// and returns the one at an index drawn from the random source.
    ///
    /// The batch obscures call-order correlation for consumers that expose
    /// IDs externally; uniqueness guarantees are unchanged. A `repeat_rate`
    /// of zero is treated as one.
    ///
    /// # Errors
    ///
    /// Propagates any error from the underlying
    /// [`SnowflakeGenerator::try_next_id`] calls.
    fn sample_n(&self, repeat_rate: usize) -> Result<SnowflakeId>;

    /// [`SnowflakeGenerator::sample_n`] with the [`DEFAULT_REPEAT_RATE`]
    /// batch size.
    ///
    /// # Errors
    ///
    /// Propagates any error from the underlying
    /// [`SnowflakeGenerator::try_next_id`] calls.
    fn sample(&self) -> Result<SnowflakeId> {
        self.sample_n(DEFAULT_REPEAT_RATE)
    }
}

/// Validates externally supplied machine identifiers against the packed
/// field widths.
///
/// The sequence seed is deliberately not checked here; packing truncates it
/// to the field width (see [`SnowflakeId::from`]).
pub(crate) fn check_machine_ids(worker_id: u64, data_center_id: u64) -> Result<()> {
    if worker_id > SnowflakeId::WORKER_ID_MASK {
        return Err(Error::WorkerIdOutOfRange {
            worker_id,
            max: SnowflakeId::WORKER_ID_MASK,
        });
    }
    if data_center_id > SnowflakeId::DATA_CENTER_ID_MASK {
        return Err(Error::DataCenterIdOutOfRange {
            data_center_id,
            max: SnowflakeId::DATA_CENTER_ID_MASK,
        });
    }
    Ok(())
}

/// Maps a random byte onto a batch index in `[0, repeat_rate)`.
pub(crate) fn sample_index(byte: u8, repeat_rate: usize) -> usize {
    usize::from(byte) * repeat_rate / 256
}

#[cold]
#[inline(never)]
pub(crate) fn cold_clock_behind(now: u64, last: u64) -> Error {
    Error::ClockMovedBackwards {
        backwards_ms: last - now,
    }
}
