//! Read classification: thresholds, verdicts, and check ordering
//!
//! The classifier applies the cheap checks first and reports the first
//! failing one: length, then mean quality, then DUST, then the automaton
//! scan. The ordering is a contract; a read failing several filters is always
//! attributed to the earliest.

use crate::automaton::Automaton;
use crate::error::{Result, SiftError};
use crate::filters::{dust_score, mean_quality};
use crate::pattern::{PatternKind, PatternTable};
use crate::scan::Scanner;
use serde::Serialize;

/// Filtering thresholds
///
/// A zero value disables the corresponding filter throughout.
#[derive(Debug, Clone, Serialize)]
pub struct FilterConfig {
    /// Mismatch budget for adapter matching (0, 1 or 2)
    pub errors: u8,
    /// Minimum read length; shorter reads are rejected
    pub min_length: usize,
    /// DUST window width
    pub dust_k: usize,
    /// DUST score cutoff; scores above it are rejected
    pub dust_cutoff: u32,
    /// Length of the injected poly-G/poly-C patterns
    pub poly_len: usize,
    /// Mean quality threshold in raw byte terms (Phred offset not subtracted)
    pub mean_quality: u8,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            errors: 0,
            min_length: 0,
            dust_k: 4,
            dust_cutoff: 0,
            poly_len: 0,
            mean_quality: 0,
        }
    }
}

impl FilterConfig {
    /// Validate threshold combinations
    pub fn validate(&self) -> Result<()> {
        if self.errors > 2 {
            return Err(SiftError::Config(format!(
                "possible errors count are 0, 1, 2 (got {})",
                self.errors
            )));
        }
        if !(1..=9).contains(&self.dust_k) {
            return Err(SiftError::Config(format!(
                "dust_k must be between 1 and 9 (got {})",
                self.dust_k
            )));
        }
        Ok(())
    }

    /// Threshold-parameterized verdict name, as written in reports
    ///
    /// Downstream tools recover the filter configuration from these names,
    /// e.g. `polyG13`, `length50`, `dust4_20`.
    pub fn verdict_name(&self, verdict: Verdict) -> String {
        match verdict {
            Verdict::Ok => "ok".to_string(),
            Verdict::Adapter => "match".to_string(),
            Verdict::NGap => "n".to_string(),
            Verdict::PolyG => format!("polyG{}", self.poly_len),
            Verdict::PolyC => format!("polyC{}", self.poly_len),
            Verdict::TooShort => format!("length{}", self.min_length),
            Verdict::LowQuality => format!("quality{}", self.mean_quality),
            Verdict::LowComplexity => format!("dust{}_{}", self.dust_k, self.dust_cutoff),
        }
    }
}

/// Disposition of a single read
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verdict {
    /// Passes every filter
    Ok,
    /// Contains an adapter fragment
    Adapter,
    /// Contains an N gap
    NGap,
    /// Contains a poly-G run
    PolyG,
    /// Contains a poly-C run
    PolyC,
    /// Shorter than the minimum length
    TooShort,
    /// Mean quality below the threshold
    LowQuality,
    /// DUST score above the cutoff
    LowComplexity,
}

impl From<PatternKind> for Verdict {
    fn from(kind: PatternKind) -> Self {
        match kind {
            PatternKind::Adapter => Verdict::Adapter,
            PatternKind::NGap => Verdict::NGap,
            PatternKind::PolyG => Verdict::PolyG,
            PatternKind::PolyC => Verdict::PolyC,
        }
    }
}

/// Classifier combining the automaton with the auxiliary filters
///
/// Built once; `classify` is read-only, so one classifier serves any number
/// of scan contexts.
pub struct ReadClassifier {
    config: FilterConfig,
    automaton: Automaton,
}

impl ReadClassifier {
    /// Build a classifier from a frozen pattern table and thresholds
    pub fn new(table: &PatternTable, config: FilterConfig) -> Result<Self> {
        config.validate()?;
        let automaton = Automaton::build(table, config.errors)?;
        Ok(Self { config, automaton })
    }

    /// The thresholds this classifier was built with
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// The underlying automaton
    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// Create a scan context; each worker owns one
    pub fn scanner(&self) -> Scanner<'_> {
        Scanner::new(&self.automaton)
    }

    /// Classify one read, reporting the first failing check
    ///
    /// An empty `qual` means quality is unavailable and skips the
    /// mean-quality filter.
    pub fn classify(&self, scanner: &mut Scanner<'_>, seq: &[u8], qual: &[u8]) -> Verdict {
        let cfg = &self.config;
        if cfg.min_length > 0 && seq.len() < cfg.min_length {
            return Verdict::TooShort;
        }
        if cfg.mean_quality > 0
            && !qual.is_empty()
            && mean_quality(qual) < cfg.mean_quality as f64
        {
            return Verdict::LowQuality;
        }
        if cfg.dust_cutoff > 0 && dust_score(seq, cfg.dust_k) > cfg.dust_cutoff as f64 {
            return Verdict::LowComplexity;
        }
        let kind = if cfg.errors > 0 {
            scanner.search_inexact(seq)
        } else {
            scanner.search_any(seq)
        };
        kind.map_or(Verdict::Ok, Verdict::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier(adapters: &[&str], config: FilterConfig) -> ReadClassifier {
        let table = PatternTable::from_adapters(adapters, config.poly_len).unwrap();
        ReadClassifier::new(&table, config).unwrap()
    }

    #[test]
    fn test_clean_read() {
        let c = classifier(&["AGATCGGAAGAGC"], FilterConfig::default());
        let mut scanner = c.scanner();
        assert_eq!(
            c.classify(&mut scanner, b"ACGTACGTAGCTTGCA", b"IIIIIIIIIIIIIIII"),
            Verdict::Ok
        );
    }

    #[test]
    fn test_length_precedes_adapter() {
        let config = FilterConfig {
            min_length: 50,
            ..FilterConfig::default()
        };
        let c = classifier(&["AGATCGGAAGAGC"], config);
        let mut scanner = c.scanner();
        // 40bp read with an embedded adapter is reported short, not matched
        let seq = b"ACGTACGTACGTAGATCGGAAGAGCACGTACGTACGTACG";
        assert_eq!(seq.len(), 40);
        assert_eq!(c.classify(&mut scanner, seq, b""), Verdict::TooShort);
    }

    #[test]
    fn test_quality_precedes_dust() {
        let config = FilterConfig {
            mean_quality: 60,
            dust_cutoff: 2,
            ..FilterConfig::default()
        };
        let c = classifier(&["AGATCGGAAGAGC"], config);
        let mut scanner = c.scanner();
        // Homopolymer read (fails DUST) with low quality: quality wins
        let seq = b"AAAAAAAAAAAAAAAAAAAA";
        let qual = vec![b'5'; seq.len()]; // '5' is 53 < 60
        assert_eq!(c.classify(&mut scanner, seq, &qual), Verdict::LowQuality);
        // With quality unavailable the same read falls through to DUST
        assert_eq!(c.classify(&mut scanner, seq, b""), Verdict::LowComplexity);
    }

    #[test]
    fn test_dust_precedes_scan() {
        let config = FilterConfig {
            dust_cutoff: 2,
            poly_len: 6,
            ..FilterConfig::default()
        };
        let c = classifier(&["AGATCGGAAGAGC"], config);
        let mut scanner = c.scanner();
        // Poly-G read fails DUST before the automaton sees it
        assert_eq!(
            c.classify(&mut scanner, b"GGGGGGGGGGGGGGGGGGGG", b""),
            Verdict::LowComplexity
        );
    }

    #[test]
    fn test_scan_verdicts_map_to_kinds() {
        let config = FilterConfig {
            poly_len: 6,
            ..FilterConfig::default()
        };
        let c = classifier(&["AGATCGGAAGAGC"], config);
        let mut scanner = c.scanner();
        assert_eq!(
            c.classify(&mut scanner, b"TTAGATCGGAAGAGCTT", b""),
            Verdict::Adapter
        );
        assert_eq!(c.classify(&mut scanner, b"ACGTNNACGT", b""), Verdict::NGap);
        assert_eq!(
            c.classify(&mut scanner, b"TTGGGGGGTTACGTACA", b""),
            Verdict::PolyG
        );
    }

    #[test]
    fn test_inexact_scan_selected() {
        let config = FilterConfig {
            errors: 1,
            ..FilterConfig::default()
        };
        let c = classifier(&["AGATCGGAAGAGC"], config);
        let mut scanner = c.scanner();
        assert_eq!(
            c.classify(&mut scanner, b"CCCCAGATCGGAAGTGCTTTT", b""),
            Verdict::Adapter
        );
    }

    #[test]
    fn test_verdict_names() {
        let config = FilterConfig {
            errors: 1,
            min_length: 50,
            dust_k: 4,
            dust_cutoff: 20,
            poly_len: 13,
            mean_quality: 53,
        };
        assert_eq!(config.verdict_name(Verdict::Ok), "ok");
        assert_eq!(config.verdict_name(Verdict::Adapter), "match");
        assert_eq!(config.verdict_name(Verdict::NGap), "n");
        assert_eq!(config.verdict_name(Verdict::PolyG), "polyG13");
        assert_eq!(config.verdict_name(Verdict::PolyC), "polyC13");
        assert_eq!(config.verdict_name(Verdict::TooShort), "length50");
        assert_eq!(config.verdict_name(Verdict::LowComplexity), "dust4_20");
        assert_eq!(config.verdict_name(Verdict::LowQuality), "quality53");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let table = PatternTable::from_adapters(&["ACGT"], 0).unwrap();
        let bad_errors = FilterConfig {
            errors: 3,
            ..FilterConfig::default()
        };
        assert!(ReadClassifier::new(&table, bad_errors).is_err());
        let bad_k = FilterConfig {
            dust_k: 0,
            ..FilterConfig::default()
        };
        assert!(ReadClassifier::new(&table, bad_k).is_err());
    }
}
