use rand::{Rng, rng};

/// A trait for random sources that return random integers.
///
/// This abstraction allows you to plug in a real random source or a mocked
/// random source in tests.
///
/// # Example
/// ```
/// use frostid::RandSource;
///
/// struct FixedRand;
/// impl RandSource<u8> for FixedRand {
///     fn rand(&self) -> u8 {
///         42
///     }
/// }
///
/// let rng = FixedRand;
/// assert_eq!(rng.rand(), 42);
/// ```
pub trait RandSource<T> {
    /// Returns a random integer.
    fn rand(&self) -> T;
}

/// A `RandSource` that uses the thread-local RNG (`rand::rng()`).
///
/// This RNG is fast, cryptographically secure (ChaCha-based), and
/// automatically reseeded periodically.
///
/// Each OS thread has its own RNG instance, so calls from multiple threads
/// are contention-free and safe. This type does **not** store the RNG itself;
/// it simply accesses the thread-local generator on each call.
#[derive(Default, Clone, Debug)]
pub struct ThreadRandom;

impl RandSource<u8> for ThreadRandom {
    fn rand(&self) -> u8 {
        rng().random()
    }
}
