//! Deterministic random streams for gameplay and redeterminization.
//!
//! A game state carries two independent streams:
//!
//! - **gameplay**: consumed by rule logic (deck shuffles at setup, random
//!   punishments, rollout choices on working copies)
//! - **redeterminization**: consumed only when a state is copied for an
//!   observer, so resampled hidden information never correlates with the
//!   sequence of prior moves
//!
//! Both are [`GameRng`] values. The redeterminization stream is derived from
//! the game seed with [`GameRng::for_context`], and every copy of a state
//! receives a [`GameRng::fork`] of the gameplay stream.
//!
//! ```
//! use tabletop_mcts::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//! let mut copy_rng = rng.fork();
//!
//! // The fork runs its own sequence
//! let a: Vec<_> = (0..8).map(|_| rng.gen_range_usize(0..100)).collect();
//! let b: Vec<_> = (0..8).map(|_| copy_rng.gen_range_usize(0..100)).collect();
//! assert_ne!(a, b);
//!
//! // Forks are reproducible from the same parent position
//! let mut first = GameRng::new(42);
//! let mut second = GameRng::new(42);
//! assert_eq!(first.fork().seed(), second.fork().seed());
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hash::{Hash, Hasher};

/// Context label of the redeterminization stream.
pub const REDETERMINIZE_CONTEXT: &str = "redeterminize";

/// Deterministic ChaCha8-backed RNG with forking.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// The seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fork this RNG into an independent, deterministic branch.
    ///
    /// Advances only the fork counter of `self`, never its output sequence.
    /// The fork seed mixes the parent seed, the fork count and the parent's
    /// stream position, so a fork of a fork never lands on a sibling's seed.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let mut hasher = rustc_hash::FxHasher::default();
        self.seed.hash(&mut hasher);
        self.fork_counter.hash(&mut hasher);
        self.inner.get_word_pos().hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Derive a stream for a named purpose.
    ///
    /// The same seed and context always give the same stream.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let mut hasher = rustc_hash::FxHasher::default();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Uniform integer in `range`. Panics on an empty range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Uniform float in `[0, 1)`.
    pub fn gen_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }

    /// Choose a random index into a collection of `len` elements.
    pub fn choose_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.inner.gen_range(0..len))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(7);
        let mut rng2 = GameRng::new(7);

        for _ in 0..100 {
            assert_eq!(rng1.gen_range_usize(0..1000), rng2.gen_range_usize(0..1000));
        }
    }

    #[test]
    fn test_fork_does_not_advance_parent_sequence() {
        let mut forked_parent = GameRng::new(42);
        let mut plain_parent = GameRng::new(42);
        let _ = forked_parent.fork();

        for _ in 0..10 {
            assert_eq!(
                forked_parent.gen_range_usize(0..1000),
                plain_parent.gen_range_usize(0..1000)
            );
        }
    }

    #[test]
    fn test_successive_forks_differ() {
        let mut rng = GameRng::new(42);
        let first = rng.fork();
        let second = rng.fork();

        assert_ne!(first.seed(), second.seed());
    }

    #[test]
    fn test_nested_forks_do_not_collide() {
        let mut parent = GameRng::new(42);
        let mut first = parent.fork();
        let mut grandchild = first.fork();
        let mut second = parent.fork();

        assert_ne!(grandchild.seed(), second.seed());
        assert_ne!(grandchild.seed(), first.seed());

        let a: Vec<_> = (0..8).map(|_| grandchild.gen_range_usize(0..1000)).collect();
        let b: Vec<_> = (0..8).map(|_| second.gen_range_usize(0..1000)).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_fork_depends_on_parent_position() {
        let mut fresh = GameRng::new(42);
        let mut advanced = GameRng::new(42);
        let _ = advanced.gen_f64();

        assert_ne!(fresh.fork().seed(), advanced.fork().seed());
    }

    #[test]
    fn test_context_streams() {
        let rng = GameRng::new(42);
        let mut redet = rng.for_context(REDETERMINIZE_CONTEXT);
        let mut other = rng.for_context("setup");
        let mut redet_again = GameRng::new(42).for_context(REDETERMINIZE_CONTEXT);

        let a: Vec<_> = (0..10).map(|_| redet.gen_range_usize(0..1000)).collect();
        let b: Vec<_> = (0..10).map(|_| other.gen_range_usize(0..1000)).collect();
        let c: Vec<_> = (0..10).map(|_| redet_again.gen_range_usize(0..1000)).collect();

        assert_ne!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_shuffle_preserves_elements() {
        let mut rng = GameRng::new(42);
        let mut data: Vec<u32> = (1..=10).collect();

        rng.shuffle(&mut data);
        assert_ne!(data, (1..=10).collect::<Vec<_>>());

        data.sort_unstable();
        assert_eq!(data, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_choose_and_choose_index() {
        let mut rng = GameRng::new(3);
        let items = [4, 5, 6];

        assert!(items.contains(rng.choose(&items).unwrap()));
        assert!(rng.choose::<i32>(&[]).is_none());
        assert_eq!(rng.choose_index(0), None);
        assert!(rng.choose_index(3).unwrap() < 3);
    }

    #[test]
    fn test_gen_f64_unit_interval() {
        let mut rng = GameRng::new(11);
        for _ in 0..100 {
            let x = rng.gen_f64();
            assert!((0.0..1.0).contains(&x));
        }
    }
}
