//! Random sources for procedural placement.
//!
//! Generation code draws from the [`RandomSource`] trait so the browser can
//! seed from entropy (every page load gets a different galaxy) while tests
//! and the preview CLI replay a fixed seed.

/// A source of uniform draws in [0, 1).
pub trait RandomSource {
    /// Uniform draw in [0, 1).
    fn next_f64(&mut self) -> f64;

    /// Uniform draw in [min, max).
    fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Returns a value in [-half_width, half_width).
    fn next_spread(&mut self, width: f64) -> f64 {
        width * (0.5 - self.next_f64())
    }

    /// Returns `1.0` or `-1.0` with equal probability.
    fn next_sign(&mut self) -> f64 {
        if self.next_f64() < 0.5 {
            1.0
        } else {
            -1.0
        }
    }
}

/// Xorshift64 PRNG. Same seed always produces the same sequence.
///
/// Uses the standard shift parameters (13, 7, 17). Seed of 0 is replaced
/// with a non-zero fallback to avoid the all-zeros fixed point.
#[derive(Debug, Clone)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Seed 0 is remapped, any other seed is used as is.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Seeds from host-provided entropy samples (e.g. `Math.random()` and a
    /// timestamp in the browser).
    ///
    /// The samples are mixed with splitmix64 so nearby timestamps still
    /// produce unrelated sequences.
    pub fn from_entropy(samples: &[f64]) -> Self {
        let mut acc = 0x9E37_79B9_7F4A_7C15_u64;
        for sample in samples {
            acc = splitmix64(acc ^ sample.to_bits());
        }
        Self::new(acc)
    }

    /// Next raw 64-bit output.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }
}

impl RandomSource for Xorshift64 {
    /// Uses the upper 53 bits of `next_u64()` for full mantissa precision.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_42_first_output_is_stable() {
        let mut rng = Xorshift64::new(42);
        assert_eq!(rng.next_u64(), 45_454_805_674);
    }

    #[test]
    fn zero_seed_is_remapped() {
        let mut rng = Xorshift64::new(0);
        assert_ne!(rng.next_u64(), 0, "seed=0 guard failed");
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn equal_seeds_replay_the_same_galaxy_draws() {
        let mut a = Xorshift64::new(42);
        let mut b = Xorshift64::new(42);
        for i in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64(), "sequences diverged at index {i}");
        }
    }

    #[test]
    fn from_entropy_differs_for_different_samples() {
        let mut a = Xorshift64::from_entropy(&[0.25, 1_700_000_000_000.0]);
        let mut b = Xorshift64::from_entropy(&[0.25, 1_700_000_000_001.0]);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn from_entropy_with_no_samples_is_usable() {
        let mut rng = Xorshift64::from_entropy(&[]);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn next_spread_is_centered_on_zero() {
        let mut rng = Xorshift64::new(3);
        for _ in 0..10_000 {
            let v = rng.next_spread(80.0);
            assert!((-40.0..=40.0).contains(&v), "spread value {v} out of cube");
        }
    }

    #[test]
    fn next_sign_produces_both_signs() {
        let mut rng = Xorshift64::new(11);
        let signs: Vec<f64> = (0..200).map(|_| rng.next_sign()).collect();
        assert!(signs.contains(&1.0));
        assert!(signs.contains(&-1.0));
        assert!(signs.iter().all(|s| s.abs() == 1.0));
    }

    #[test]
    fn cloned_generator_continues_from_the_same_state() {
        let mut rng = Xorshift64::new(7);
        for _ in 0..50 {
            rng.next_u64();
        }
        let mut fork = rng.clone();
        for _ in 0..100 {
            assert_eq!(rng.next_f64(), fork.next_f64());
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn unit_draws_stay_in_range(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_f64();
                    prop_assert!((0.0..1.0).contains(&v), "next_f64() = {v} for seed {seed}");
                }
            }

            #[test]
            fn range_draws_respect_bounds(
                seed: u64,
                min in -1e6_f64..1e6,
                max in -1e6_f64..1e6,
            ) {
                prop_assume!(min < max);
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_range(min, max);
                    prop_assert!(v >= min && v < max, "next_range({min}, {max}) = {v}");
                }
            }
        }
    }
}
