//! Deterministic world generation backed by keyed hashing.
//!
//! Every spawn decision and initial coin count derives from a digest of a
//! coordinate key, so identical keys reproduce identical worlds across runs
//! and across process restarts without storing any per-cell state up front.

use geocoin_core::GridCoord;
use sha2::{Digest, Sha256};

const MANTISSA_BITS: u32 = 53;

/// Maps an arbitrary string key to a reproducible float in `[0, 1)`.
///
/// The key is hashed with SHA-256 and the leading 53 bits of the digest are
/// scaled into the unit interval, which keeps the result strictly below one
/// and bit-identical for identical keys on every platform.
#[must_use]
pub fn luck(key: &str) -> f64 {
    let digest = Sha256::digest(key.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    let bits = u64::from_be_bytes(prefix) >> (64 - MANTISSA_BITS);
    bits as f64 / (1u64 << MANTISSA_BITS) as f64
}

/// Decides whether a cache spawns at the provided coordinate.
///
/// Uses the `"i,j"` key so the decision is a pure function of the
/// coordinate and the configured probability.
#[must_use]
pub fn cache_spawns_at(cell: GridCoord, probability: f64) -> bool {
    luck(&cell.to_string()) < probability
}

/// Number of coins a freshly spawned cache holds, in `1..=max`.
///
/// Uses the `"i,j,coins"` key so the count is independent of the spawn
/// decision drawn for the same coordinate.
#[must_use]
pub fn initial_coin_count(cell: GridCoord, max: u32) -> u32 {
    (luck(&format!("{cell},coins")) * f64::from(max)) as u32 + 1
}

#[cfg(test)]
mod tests {
    use super::{cache_spawns_at, initial_coin_count, luck};
    use geocoin_core::GridCoord;

    #[test]
    fn luck_is_pure() {
        for key in ["0,0", "-3,17", "0,0,coins", "somewhere else"] {
            assert_eq!(luck(key).to_bits(), luck(key).to_bits());
        }
    }

    #[test]
    fn luck_stays_in_unit_interval() {
        for i in -50..50 {
            for j in -50..50 {
                let value = luck(&GridCoord::new(i, j).to_string());
                assert!((0.0..1.0).contains(&value), "luck out of range: {value}");
            }
        }
    }

    #[test]
    fn distinct_keys_produce_distinct_values() {
        assert_ne!(luck("0,0"), luck("0,1"));
        assert_ne!(luck("0,0"), luck("0,0,coins"));
    }

    #[test]
    fn spawn_decision_respects_probability_extremes() {
        let cell = GridCoord::new(4, -2);
        assert!(cache_spawns_at(cell, 1.1));
        assert!(!cache_spawns_at(cell, 0.0));
    }

    #[test]
    fn initial_coin_count_stays_within_bounds() {
        for i in -20..20 {
            for j in -20..20 {
                let count = initial_coin_count(GridCoord::new(i, j), 10);
                assert!((1..=10).contains(&count), "count out of range: {count}");
            }
        }
    }

    #[test]
    fn initial_coin_count_is_reproducible() {
        let cell = GridCoord::new(-7, 13);
        assert_eq!(initial_coin_count(cell, 10), initial_coin_count(cell, 10));
    }
}
