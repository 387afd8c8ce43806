//! Per-read auxiliary filters: mean quality and DUST complexity
//!
//! Homopolymer and N-gap detection are not here; they are ordinary patterns
//! in the automaton.

use rustc_hash::FxHashMap;

/// Arithmetic mean of the raw quality byte values
///
/// The Phred offset is deliberately not subtracted, so thresholds must be
/// given in raw-byte terms (e.g. Phred+33 Q20 is 53). Returns 0.0 for an
/// empty quality string; callers treat that as "quality unavailable".
pub fn mean_quality(qual: &[u8]) -> f64 {
    if qual.is_empty() {
        return 0.0;
    }
    let sum: u64 = qual.iter().map(|&q| q as u64).sum();
    sum as f64 / qual.len() as f64
}

/// Simplified DUST low-complexity score of a sequence
///
/// Bases map through `N=1, A=2, C=3, G=4, T=5` (anything else contributes 0)
/// into a base-10 rolling hash of width `k`; every full window increments a
/// bucket, and the final score is the bucket-wise running total of
/// `c * (c - 1) / 2` divided by the window count. Buckets are accumulated in
/// ascending hash order so the score is deterministic. `k` must be in
/// `1..=9` so the hash fits 32 bits; sequences shorter than `k` score 0.
pub fn dust_score(seq: &[u8], k: usize) -> f64 {
    debug_assert!((1..=9).contains(&k));
    if seq.len() < k {
        return 0.0;
    }

    let mut counts: FxHashMap<u32, u32> = FxHashMap::default();
    let max_pow = 10u32.pow(k as u32 - 1);
    let mut hash = 0u32;
    for (i, &raw) in seq.iter().enumerate() {
        let digit = match raw.to_ascii_uppercase() {
            b'N' => 1,
            b'A' => 2,
            b'C' => 3,
            b'G' => 4,
            b'T' => 5,
            _ => 0,
        };
        hash = hash * 10 + digit;
        if i >= k - 1 {
            *counts.entry(hash).or_insert(0) += 1;
            hash %= max_pow;
        }
    }

    let mut buckets: Vec<(u32, u32)> = counts.into_iter().collect();
    buckets.sort_unstable_by_key(|&(hash, _)| hash);

    let mut score = 0.0;
    let mut total = 0.0;
    for (_, count) in buckets {
        let count = count as f64;
        score += count * (count - 1.0) / 2.0;
        total += score;
    }
    total / (seq.len() - k + 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_quality_raw_bytes() {
        // 'I' is 73, '!' is 33
        assert_eq!(mean_quality(b"IIII"), 73.0);
        assert_eq!(mean_quality(b"!I"), 53.0);
        assert_eq!(mean_quality(b""), 0.0);
    }

    #[test]
    fn test_dust_homopolymer() {
        // All windows hash identically: score is (m - 1) / 2 for m windows
        let seq = b"AAAAAAAAAAAAAAAAAAAA"; // n = 20, k = 4 -> m = 17
        let score = dust_score(seq, 4);
        assert!((score - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_dust_high_complexity_is_low() {
        // Every 4-mer of this sequence is distinct
        let seq = b"ACGTAGCTTGCAGATCCTAG";
        assert!(dust_score(seq, 4) < 1.0);
    }

    #[test]
    fn test_dust_short_sequence() {
        assert_eq!(dust_score(b"ACG", 4), 0.0);
        assert_eq!(dust_score(b"", 4), 0.0);
    }

    #[test]
    fn test_dust_case_insensitive() {
        let upper = dust_score(b"ACGTACGTACGTACGT", 4);
        let lower = dust_score(b"acgtacgtacgtacgt", 4);
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_dust_monotone_in_repetitiveness() {
        let random = dust_score(b"ACGTAGCTTGCAGATCCTAGGATC", 4);
        let repetitive = dust_score(b"ACACACACACACACACACACACAC", 4);
        let homopolymer = dust_score(b"AAAAAAAAAAAAAAAAAAAAAAAA", 4);
        assert!(random < repetitive);
        assert!(repetitive < homopolymer);
    }
}
