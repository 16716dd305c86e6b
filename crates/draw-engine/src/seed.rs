//! Seed handling for verifiable draws
//!
//! A seed is a public 256-bit entropy value, in practice a Bitcoin block
//! hash. Its canonical form is 64 lowercase hex characters; every derived
//! value in a round can be recomputed by third parties from it alone.

use crate::error::{Error, Result};
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    bytes: [u8; 32],
    hex: String,
}

impl Seed {
    /// Parse a seed from its hex form.
    ///
    /// Input is lowercased and left-zero-padded to 64 characters before
    /// validation, so truncated hashes with leading zeros stripped still
    /// parse to the same canonical value.
    pub fn parse(input: &str) -> Result<Self> {
        let lowered = input.trim().to_lowercase();
        let canonical = if lowered.len() < 64 {
            format!("{lowered:0>64}")
        } else {
            lowered
        };

        if canonical.len() != 64
            || !canonical
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        {
            return Err(Error::MalformedSeed(input.to_string()));
        }

        let raw = hex::decode(&canonical).map_err(|_| Error::MalformedSeed(input.to_string()))?;
        Self::from_bytes(&raw)
    }

    /// Build a seed from raw bytes; must be exactly 32.
    pub fn from_bytes(raw: &[u8]) -> Result<Self> {
        let bytes: [u8; 32] = raw
            .try_into()
            .map_err(|_| Error::InvalidSeedLength(raw.len()))?;
        Ok(Self {
            hex: hex::encode(bytes),
            bytes,
        })
    }

    /// Generate a process-local random seed.
    ///
    /// Only valid for test and dry-run paths. A draw made with a random
    /// seed is not independently verifiable, so this always logs loudly.
    pub fn random() -> Self {
        warn!("no block hash supplied, generating a random seed; this draw is NOT auditable");
        let bytes: [u8; 32] = rand::random();
        Self {
            hex: hex::encode(bytes),
            bytes,
        }
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Canonical 64-character lowercase hex form.
    pub fn as_hex(&self) -> &str {
        &self.hex
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK_HASH: &str = "81d68e36cc1ba5d895b9af7d7acdd8031030f02dceacac30ff3546bb8611b5cc";

    #[test]
    fn parses_canonical_hash() {
        let seed = Seed::parse(BLOCK_HASH).unwrap();
        assert_eq!(seed.as_hex(), BLOCK_HASH);
        assert_eq!(seed.as_bytes().len(), 32);
    }

    #[test]
    fn lowercases_input() {
        let seed = Seed::parse(&BLOCK_HASH.to_uppercase()).unwrap();
        assert_eq!(seed.as_hex(), BLOCK_HASH);
    }

    #[test]
    fn pads_short_hex_on_the_left() {
        let seed = Seed::parse("ff").unwrap();
        assert_eq!(seed.as_hex(), format!("{:0>64}", "ff"));
        assert_eq!(seed.as_bytes()[31], 0xff);
        assert_eq!(seed.as_bytes()[0], 0);
    }

    #[test]
    fn rejects_non_hex_and_oversized() {
        assert!(matches!(
            Seed::parse("zz"),
            Err(Error::MalformedSeed(_))
        ));
        let long = "a".repeat(65);
        assert!(matches!(Seed::parse(&long), Err(Error::MalformedSeed(_))));
    }

    #[test]
    fn rejects_wrong_byte_length() {
        assert!(matches!(
            Seed::from_bytes(&[0u8; 31]),
            Err(Error::InvalidSeedLength(31))
        ));
    }

    #[test]
    fn random_seeds_differ() {
        assert_ne!(Seed::random(), Seed::random());
    }
}
