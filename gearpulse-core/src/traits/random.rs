//! Pseudo-random numbers for the divergence meter

use rand::{Rng, RngCore};

/// Source of uniformly distributed integers
pub trait RandomSource {
    /// Uniform integer in `0..bound`; `0` when `bound` is `0`
    fn below(&mut self, bound: u32) -> u32;
}

/// [`RandomSource`] backed by any `rand` generator
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl<R: RngCore> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl<R: RngCore> RandomSource for RngSource<R> {
    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.0.random_range(0..bound)
    }
}
