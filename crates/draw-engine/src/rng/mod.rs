//! Deterministic randomness primitives
//!
//! Three distinct derivation schemes are in use across the draw pipeline:
//! double SHA-256 keyed by index, double SHA-256 keyed by raw address
//! bytes (both in [`stream`]), and HMAC-SHA256 keyed by the seed (in
//! [`shuffle`]). They are deliberately kept as separate named primitives:
//! published audit records depend on the exact scheme used at each call
//! site, so unifying them would break reproducibility.

pub mod shuffle;
pub mod stream;
