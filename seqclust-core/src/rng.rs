//! Random-number source for posterior seeding.
//!
//! The engine owns exactly one RNG handle, created here at construction
//! time and consumed only by the seeding methods; every later computation
//! is deterministic given the seeded posterior.

use rand::SeedableRng;
use rand_pcg::Pcg64;
use sha2::{Digest, Sha256};

/// Creates an RNG, deterministically seeded when a non-empty seed string
/// is given.
///
/// The string is digested with SHA-256 and the first eight bytes become
/// the stream seed, so any two runs with the same seed string draw the
/// same values. With `None` or an empty string the generator seeds itself
/// from operating-system entropy.
#[must_use]
pub fn rng_from(seed: Option<&str>) -> Pcg64 {
    match seed {
        Some(seed) if !seed.is_empty() => {
            let digest = Sha256::digest(seed.as_bytes());
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(&digest[..8]);
            Pcg64::seed_from_u64(u64::from_le_bytes(bytes))
        }
        _ => Pcg64::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn identical_seed_strings_give_identical_streams() {
        let mut a = rng_from(Some("classification"));
        let mut b = rng_from(Some("classification"));
        for _ in 0..32 {
            assert_eq!(a.gen::<u64>(), b.gen::<u64>());
        }
    }

    #[test]
    fn different_seed_strings_diverge() {
        let mut a = rng_from(Some("seed-a"));
        let mut b = rng_from(Some("seed-b"));
        let draws_a: Vec<u64> = (0..8).map(|_| a.gen()).collect();
        let draws_b: Vec<u64> = (0..8).map(|_| b.gen()).collect();
        assert_ne!(draws_a, draws_b);
    }

    #[test]
    fn empty_seed_falls_back_to_entropy() {
        // cannot assert on the values, only that construction works
        let mut rng = rng_from(Some(""));
        let _: u64 = rng.gen();
        let mut rng = rng_from(None);
        let _: u64 = rng.gen();
    }
}
