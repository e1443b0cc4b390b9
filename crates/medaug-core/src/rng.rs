//! Seeded pseudo-random number generation.
//!
//! This module provides a Mersenne Twister (MT19937) generator with the
//! classic scalar seeding scheme, so that a given seed reproduces the exact
//! draw sequences that the reference augmentation outputs were computed with.

const N: usize = 624;
const M: usize = 397;
const MATRIX_A: u32 = 0x9908_b0df;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7fff_ffff;

/// Seeded random state.
///
/// MT19937 with `init_genrand` seeding. Doubles are built from two tempered
/// 32-bit outputs (53-bit resolution), matching the convention used by the
/// reference implementation this crate is verified against.
#[derive(Debug, Clone)]
pub struct RandomState {
    key: [u32; N],
    pos: usize,
}

impl RandomState {
    /// Create a generator from a scalar seed.
    pub fn seed(seed: u32) -> Self {
        let mut key = [0u32; N];
        key[0] = seed;
        for i in 1..N {
            key[i] = 1_812_433_253u32
                .wrapping_mul(key[i - 1] ^ (key[i - 1] >> 30))
                .wrapping_add(i as u32);
        }
        Self { key, pos: N }
    }

    /// Reset this generator to the state produced by `seed`.
    pub fn reseed(&mut self, seed: u32) {
        *self = Self::seed(seed);
    }

    fn next_u32(&mut self) -> u32 {
        if self.pos >= N {
            for i in 0..N {
                let y = (self.key[i] & UPPER_MASK) | (self.key[(i + 1) % N] & LOWER_MASK);
                let mut v = self.key[(i + M) % N] ^ (y >> 1);
                if y & 1 == 1 {
                    v ^= MATRIX_A;
                }
                self.key[i] = v;
            }
            self.pos = 0;
        }

        let mut y = self.key[self.pos];
        self.pos += 1;
        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^ (y >> 18)
    }

    /// Draw a double in `[0, 1)`.
    pub fn random_sample(&mut self) -> f64 {
        let a = (self.next_u32() >> 5) as f64;
        let b = (self.next_u32() >> 6) as f64;
        (a * 67_108_864.0 + b) / 9_007_199_254_740_992.0
    }

    /// Draw a double uniformly from `[low, high)`.
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.random_sample()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_123_reference_sequence() {
        // First doubles of the reference generator under seed 123.
        let expected = [
            0.6964691855978616,
            0.28613933495037946,
            0.22685145356420311,
            0.5513147690828912,
            0.7194689697855631,
        ];
        let mut rng = RandomState::seed(123);
        for e in expected {
            assert!((rng.random_sample() - e).abs() < 1e-15);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = RandomState::seed(42);
        let mut b = RandomState::seed(42);
        for _ in 0..1000 {
            assert_eq!(a.random_sample(), b.random_sample());
        }
    }

    #[test]
    fn test_reseed_restarts_sequence() {
        let mut rng = RandomState::seed(7);
        let first = rng.random_sample();
        rng.random_sample();
        rng.reseed(7);
        assert_eq!(rng.random_sample(), first);
    }

    #[test]
    fn test_uniform_bounds_and_mapping() {
        let mut rng = RandomState::seed(123);
        let mut check = RandomState::seed(123);
        for _ in 0..100 {
            let v = rng.uniform(-2.0, 2.0);
            assert!((-2.0..2.0).contains(&v));
            let u = check.random_sample();
            assert!((v - (-2.0 + 4.0 * u)).abs() < 1e-15);
        }
    }
}
