//! Deterministic random number generator
//!
//! Uses a simple xorshift64 algorithm so the same seed replays the same
//! throws on every machine.

use serde::{Deserialize, Serialize};

/// A deterministic random number generator for dice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRng {
    state: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        // xorshift needs a non-zero state
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Create an RNG from a saved state
    pub fn from_state(state: u64) -> Self {
        Self::new(state)
    }

    /// Get the current state (useful for saving/loading)
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Generate the next raw u64 value
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate a random i64 in range [min, max]
    pub fn range_i64(&mut self, min: i64, max: i64) -> i64 {
        if min >= max {
            return min;
        }
        match max.abs_diff(min).checked_add(1) {
            Some(span) => min.wrapping_add((self.next_u64() % span) as i64),
            None => self.next_u64() as i64,
        }
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_range() {
        let mut rng = GameRng::new(42);

        for _ in 0..100 {
            let i = rng.range_i64(1, 20);
            assert!((1..=20).contains(&i));
        }
        assert_eq!(rng.range_i64(15, 15), 15);
    }

    #[test]
    fn test_zero_seed_and_state() {
        let mut rng = GameRng::new(0);
        assert_eq!(rng.state(), 1);
        rng.next_u64();

        let mut restored = GameRng::from_state(rng.state());
        assert_eq!(restored.next_u64(), rng.next_u64());
    }
}
