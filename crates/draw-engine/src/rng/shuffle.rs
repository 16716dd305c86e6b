//! Deterministic Fisher-Yates shuffle
//!
//! Swap partners come from HMAC-SHA256 keyed by the seed, with the step
//! index as the message. Each step's draw is independently reproducible
//! without the running shuffled state, which is what makes per-step
//! audits possible. The HMAC key is the ASCII bytes of the canonical
//! lowercase hex seed string, not the raw seed bytes; this matches the
//! already-published audit records and must not change.

use crate::seed::Seed;
use hmac::{Hmac, Mac};
use primitive_types::U256;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Return a seeded permutation of `items`.
///
/// The input is never mutated; concurrent callers may share it freely.
/// The swap loop itself is inherently sequential: step `i`'s draw depends
/// only on `i`, but the array state it swaps into depends on every prior
/// swap, so this must not be parallelized.
pub fn shuffle<T: Clone>(items: &[T], seed: &Seed) -> Vec<T> {
    let mut shuffled = items.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = swap_partner(seed, i as u32, (i + 1) as u64);
        shuffled.swap(i, j);
    }
    shuffled
}

/// Swap partner for step `i`: `HMAC(seed, be32(i)) mod (i + 1)`.
fn swap_partner(seed: &Seed, step: u32, modulus: u64) -> usize {
    let mut mac = HmacSha256::new_from_slice(seed.as_hex().as_bytes())
        .expect("hmac-sha256 accepts keys of any length");
    mac.update(&step.to_be_bytes());
    let digest = mac.finalize().into_bytes();
    let value = U256::from_big_endian(&digest);
    (value % U256::from(modulus)).low_u64() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn zero_seed() -> Seed {
        Seed::parse(&"0".repeat(64)).unwrap()
    }

    #[test]
    fn pinned_permutations() {
        let items: Vec<u32> = (1..=5).collect();
        assert_eq!(shuffle(&items, &zero_seed()), vec![1, 5, 4, 3, 2]);

        let items: Vec<u32> = (1..=8).collect();
        assert_eq!(shuffle(&items, &zero_seed()), vec![1, 5, 8, 6, 7, 3, 2, 4]);

        let seed =
            Seed::parse("81d68e36cc1ba5d895b9af7d7acdd8031030f02dceacac30ff3546bb8611b5cc")
                .unwrap();
        let items: Vec<u32> = (1..=5).collect();
        assert_eq!(shuffle(&items, &seed), vec![2, 5, 1, 4, 3]);
    }

    #[test]
    fn pinned_swap_partner() {
        assert_eq!(swap_partner(&zero_seed(), 4, 5), 1);
    }

    #[test]
    fn output_is_a_permutation() {
        let items: Vec<u32> = (0..997).collect();
        let shuffled = shuffle(&items, &zero_seed());
        assert_eq!(shuffled.len(), items.len());
        let original: BTreeSet<u32> = items.iter().copied().collect();
        let permuted: BTreeSet<u32> = shuffled.iter().copied().collect();
        assert_eq!(original, permuted);
    }

    #[test]
    fn deterministic_across_invocations() {
        let items: Vec<u32> = (0..100).collect();
        let seed = zero_seed();
        assert_eq!(shuffle(&items, &seed), shuffle(&items, &seed));
    }

    #[test]
    fn input_is_untouched() {
        let items: Vec<u32> = (0..10).collect();
        let before = items.clone();
        let _ = shuffle(&items, &zero_seed());
        assert_eq!(items, before);
    }

    #[test]
    fn trivial_inputs() {
        let empty: Vec<u32> = vec![];
        assert!(shuffle(&empty, &zero_seed()).is_empty());
        assert_eq!(shuffle(&[42], &zero_seed()), vec![42]);
    }
}
