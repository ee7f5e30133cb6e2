//! Seedable 32-bit pseudo-random sources used by the random fill patterns.
//!
//! Buffers depend only on the [`SeededRandomSource`] contract: the same seed always
//! yields the same sequence of 32-bit values, and cloning a source duplicates its
//! generator state. The concrete algorithm is an implementation detail of
//! [`Random32`].

/// A 32-bit pseudo-random generator that can be re-seeded in place.
pub trait SeededRandomSource: Clone {
    /// Returns the next 32-bit value of the sequence.
    fn next32(&mut self) -> u32;

    /// Re-seeds the generator. After this call [`is_seeded`](Self::is_seeded)
    /// returns `true` and the sequence restarts deterministically.
    fn seed(&mut self, seed: u32);

    /// Returns `true` if the current sequence originates from an explicit seed.
    fn is_seeded(&self) -> bool;
}

/// The default [`SeededRandomSource`], backed by `fastrand`'s wyrand generator.
#[derive(Clone, Debug)]
pub struct Random32 {
    rng: fastrand::Rng,
    seeded: bool,
}

impl Random32 {
    /// Creates an unseeded generator, initialized from process entropy.
    pub fn new() -> Random32 {
        Random32 {
            rng: fastrand::Rng::new(),
            seeded: false,
        }
    }

    /// Creates a generator seeded with `seed`.
    pub fn with_seed(seed: u32) -> Random32 {
        Random32 {
            rng: fastrand::Rng::with_seed(u64::from(seed)),
            seeded: true,
        }
    }

    /// Discards the current state and returns to a fresh, unseeded generator.
    pub fn reset(&mut self) {
        *self = Random32::new();
    }
}

impl Default for Random32 {
    fn default() -> Self {
        Self::new()
    }
}

impl SeededRandomSource for Random32 {
    #[inline]
    fn next32(&mut self) -> u32 {
        self.rng.u32(..)
    }

    fn seed(&mut self, seed: u32) {
        self.rng.seed(u64::from(seed));
        self.seeded = true;
    }

    #[inline]
    fn is_seeded(&self) -> bool {
        self.seeded
    }
}
