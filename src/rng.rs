//! A fast, per-worker pseudorandom generator used only for steal-victim selection.

use std::cell::Cell;
use std::hash::{BuildHasher, RandomState};
use std::sync::atomic::{AtomicUsize, Ordering};

/// [xorshift*] is a fast pseudorandom number generator which will even
/// tolerate weak seeding, as long as the seed is not zero.
///
/// Each worker owns one of these rather than sharing a single generator
/// behind a lock, trading a theoretically "more random" shared generator
/// for a per-worker one that never contends with another worker's steal
/// attempt.
///
/// [xorshift*]: https://en.wikipedia.org/wiki/Xorshift#xorshift*
pub(crate) struct XorShift64Star {
    state: Cell<u64>,
}

const FIXED_STATE: u64 = 0x9a7013f475bb8c23;

impl XorShift64Star {
    /// A generator with a fixed seed, usable in `const` contexts. Always
    /// re-seeded via [`Self::seed_from_entropy`] before first use by a real
    /// worker thread.
    pub(crate) const fn fixed() -> Self {
        Self {
            state: Cell::new(FIXED_STATE),
        }
    }

    /// Reseeds this generator from a nondeterministic source.
    ///
    /// Any non-zero seed will do; this hashes a process-wide monotonic
    /// counter through `RandomState`'s per-process random keys, which is
    /// good enough for steal-victim selection without pulling in a
    /// dedicated entropy crate.
    pub(crate) fn seed_from_entropy(&self) {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);

        let rs = RandomState::new();
        let mut seed = 0;
        while seed == 0 {
            seed = rs.hash_one(COUNTER.fetch_add(1, Ordering::Relaxed));
        }
        self.state.set(seed);
    }

    fn next(&self) -> u64 {
        let mut x = self.state.get();
        debug_assert_ne!(x, 0);
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state.set(x);
        x.wrapping_mul(0x2545_f491_4f6c_dd1d)
    }

    /// Returns a value uniformly distributed over `0..n`.
    ///
    /// # Panics
    /// Panics if `n == 0`.
    pub(crate) fn next_usize(&self, n: usize) -> usize {
        (self.next() % n as u64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::XorShift64Star;

    #[test]
    fn stays_in_range() {
        let rng = XorShift64Star::fixed();
        rng.seed_from_entropy();
        for _ in 0..1000 {
            let v = rng.next_usize(7);
            assert!(v < 7);
        }
    }

    #[test]
    fn distinct_instances_eventually_diverge() {
        let a = XorShift64Star::fixed();
        let b = XorShift64Star::fixed();
        a.seed_from_entropy();
        b.seed_from_entropy();
        let seq_a: Vec<_> = (0..16).map(|_| a.next_usize(usize::MAX)).collect();
        let seq_b: Vec<_> = (0..16).map(|_| b.next_usize(usize::MAX)).collect();
        assert_ne!(seq_a, seq_b);
    }
}
