//! ADC noise seed
//!
//! A floating ADC input (GP26-GP29 with no pull) picks up enough noise in
//! its low bits to seed the pseudo-random generator at boot.

use embassy_rp::adc::{Adc, Async, Channel, Error};

/// Samples folded into the seed
pub const SEED_SAMPLES: usize = 64;

/// Read [`SEED_SAMPLES`] conversions from `channel` and fold them into a
/// 64-bit seed
pub async fn noise_seed(adc: &mut Adc<'_, Async>, channel: &mut Channel<'_>) -> Result<u64, Error> {
    let mut seed = 0;
    for _ in 0..SEED_SAMPLES {
        let sample = adc.read(channel).await?;
        seed = mix(seed, sample);
    }
    Ok(seed)
}

/// Fold one sample into the running seed (splitmix64 finalizer)
pub fn mix(seed: u64, sample: u16) -> u64 {
    let mut z = (seed.rotate_left(7) ^ u64::from(sample)).wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_spreads_single_bit() {
        let a = mix(0, 2048);
        let b = mix(0, 2049);
        assert_ne!(a, b);
        assert!((a ^ b).count_ones() > 8);
    }

    #[test]
    fn test_mix_depends_on_history() {
        let flat = (0..SEED_SAMPLES).fold(0, |seed, _| mix(seed, 1000));
        let noisy = (0..SEED_SAMPLES).fold(0, |seed, i| mix(seed, 1000 + (i as u16 & 3)));
        assert_ne!(flat, noisy);
        assert_eq!(flat, (0..SEED_SAMPLES).fold(0, |seed, _| mix(seed, 1000)));
    }
}
