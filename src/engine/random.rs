//! Injectable uniform random source used for forecast and trend jitter.

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Source of uniform samples in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;

    /// Symmetric jitter in `[-half_width, +half_width]`.
    fn jitter(&mut self, half_width: f64) -> f64 {
        (self.next_unit() - 0.5) * 2.0 * half_width
    }
}

/// Entropy- or seed-backed generator.
pub struct StdRandom(StdRng);

impl StdRandom {
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// Seeded when a seed is given, entropy otherwise.
    pub fn maybe_seeded(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }
}

impl RandomSource for StdRandom {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

/// Always yields the same value. `ConstantRandom::neutral()` disables jitter.
#[derive(Debug, Clone, Copy)]
pub struct ConstantRandom(pub f64);

impl ConstantRandom {
    pub fn neutral() -> Self {
        Self(0.5)
    }
}

impl RandomSource for ConstantRandom {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_source_has_zero_jitter() {
        let mut src = ConstantRandom::neutral();
        assert_eq!(src.jitter(3.0), 0.0);
        assert_eq!(src.jitter(1.5), 0.0);
    }

    #[test]
    fn jitter_stays_within_half_width() {
        let mut src = StdRandom::seeded(7);
        for _ in 0..1_000 {
            let j = src.jitter(2.5);
            assert!((-2.5..=2.5).contains(&j));
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = StdRandom::seeded(42);
        let mut b = StdRandom::seeded(42);
        for _ in 0..16 {
            assert_eq!(a.next_unit(), b.next_unit());
        }
    }
}
