//! Random duration sources for inter-arrival and service times.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Exp1;

/// Supplies independent exponential durations for a given rate.
pub trait VariateSource {
    /// Draw from Exp(`rate`); mean `1 / rate`. Callers guarantee `rate > 0`.
    fn exponential(&mut self, rate: f64) -> f64;
}

/// Exponential variates from a seeded `StdRng`, reproducible bit-for-bit
#[derive(Debug, Clone)]
pub struct SeededExponential {
    rng: StdRng,
}

impl SeededExponential {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Independent arrival and service streams for one run.
    ///
    /// Splitting the streams keeps the service sequence fixed when only the
    /// arrival rate changes between runs with the same seed.
    pub fn stream_pair(seed: u64) -> (Self, Self) {
        (Self::new(seed), Self::new(seed.wrapping_add(1)))
    }
}

impl VariateSource for SeededExponential {
    fn exponential(&mut self, rate: f64) -> f64 {
        let unit: f64 = self.rng.sample(Exp1);
        unit / rate
    }
}
