use std::sync::{MutexGuard, PoisonError};

/// A result type defaulting to [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `frostid` can emit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The configured worker ID does not fit the 5-bit worker field.
    ///
    /// Raised once, at construction. No partial generator is created.
    #[error("worker id {worker_id} out of range 0..={max}")]
    WorkerIdOutOfRange {
        /// The rejected worker ID.
        worker_id: u64,
        /// The largest value the worker field can hold.
        max: u64,
    },

    /// The configured data center ID does not fit the 5-bit data center
    /// field.
    ///
    /// Raised once, at construction. No partial generator is created.
    #[error("data center id {data_center_id} out of range 0..={max}")]
    DataCenterIdOutOfRange {
        /// The rejected data center ID.
        data_center_id: u64,
        /// The largest value the data center field can hold.
        max: u64,
    },

    /// The wall clock read a value behind the last issued timestamp.
    ///
    /// Typically caused by an NTP step-back or a manual clock adjustment.
    /// The generator performs no sleep or correction; the caller decides
    /// whether to retry, abort, or alert. Generator state is left untouched,
    /// so a later call with a valid reading succeeds normally.
    #[error("clock moved backwards, refusing to generate an id for {backwards_ms}ms")]
    ClockMovedBackwards {
        /// Magnitude of the regression in milliseconds.
        backwards_ms: u64,
    },

    /// The operation failed because the generator lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock.
    #[error("generator lock poisoned")]
    LockPoisoned,
}

// Convert all poisoned lock errors to a simplified `LockPoisoned`
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
