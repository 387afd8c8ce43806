//! Per-file statistics on processed reads
//!
//! Counters are keyed by verdict; the text report reproduces the layout
//! consumed by downstream tooling: the source filename, one tab-indented
//! line per observed verdict, the clean fraction, and for paired runs the
//! single-end/paired-end salvage counts.

use crate::classify::{FilterConfig, Verdict};
use serde_json::json;
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Verdict counters for one input file
#[derive(Debug, Clone)]
pub struct FilterStats {
    /// Source file the counters describe
    pub source: String,
    counts: BTreeMap<Verdict, u64>,
    total: u64,
    se: u64,
    pe: u64,
}

impl FilterStats {
    /// Fresh counters for a source file
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            counts: BTreeMap::new(),
            total: 0,
            se: 0,
            pe: 0,
        }
    }

    /// Count a read from a single-end stream or the broken half of a pair
    pub fn record(&mut self, verdict: Verdict) {
        self.update(verdict, false);
    }

    /// Count a read whose whole pair passed
    pub fn record_paired(&mut self, verdict: Verdict) {
        self.update(verdict, true);
    }

    fn update(&mut self, verdict: Verdict, paired: bool) {
        *self.counts.entry(verdict).or_insert(0) += 1;
        self.total += 1;
        if verdict == Verdict::Ok {
            if paired {
                self.pe += 1;
            } else {
                self.se += 1;
            }
        }
    }

    /// Total reads counted
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Count for one verdict
    pub fn count(&self, verdict: Verdict) -> u64 {
        self.counts.get(&verdict).copied().unwrap_or(0)
    }

    /// Fraction of reads that passed every filter
    pub fn ok_fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let bad: u64 = self
            .counts
            .iter()
            .filter(|(v, _)| **v != Verdict::Ok)
            .map(|(_, n)| n)
            .sum();
        (self.total - bad) as f64 / self.total as f64
    }

    /// Write the text report
    pub fn write_text<W: Write>(&self, out: &mut W, config: &FilterConfig) -> io::Result<()> {
        writeln!(out, "{}", self.source)?;
        for (&verdict, &count) in &self.counts {
            writeln!(out, "\t{}\t{}", config.verdict_name(verdict), count)?;
        }
        writeln!(out, "\tfraction\t{}", self.ok_fraction())?;
        if self.pe > 0 {
            writeln!(out, "\tse\t{}", self.se)?;
            writeln!(out, "\tpe\t{}", self.pe)?;
        }
        Ok(())
    }

    /// Render the same report as JSON
    pub fn to_json(&self, config: &FilterConfig) -> serde_json::Value {
        let counts: serde_json::Map<String, serde_json::Value> = self
            .counts
            .iter()
            .map(|(&v, &n)| (config.verdict_name(v), json!(n)))
            .collect();
        let mut value = json!({
            "file": self.source,
            "total": self.total,
            "counts": counts,
            "fraction": self.ok_fraction(),
            "config": config,
        });
        if self.pe > 0 {
            value["se"] = json!(self.se);
            value["pe"] = json!(self.pe);
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FilterConfig {
        FilterConfig {
            min_length: 50,
            poly_len: 13,
            ..FilterConfig::default()
        }
    }

    #[test]
    fn test_counts_and_fraction() {
        let mut stats = FilterStats::new("reads.fastq");
        stats.record(Verdict::Ok);
        stats.record(Verdict::Ok);
        stats.record(Verdict::Adapter);
        stats.record(Verdict::TooShort);

        assert_eq!(stats.total(), 4);
        assert_eq!(stats.count(Verdict::Ok), 2);
        assert_eq!(stats.count(Verdict::Adapter), 1);
        assert!((stats.ok_fraction() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_text_report_single_end() {
        let mut stats = FilterStats::new("reads.fastq");
        stats.record(Verdict::Ok);
        stats.record(Verdict::Adapter);

        let mut out = Vec::new();
        stats.write_text(&mut out, &config()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("reads.fastq\n"));
        assert!(text.contains("\tok\t1\n"));
        assert!(text.contains("\tmatch\t1\n"));
        assert!(text.contains("\tfraction\t0.5\n"));
        // No pe/se lines for single-end runs
        assert!(!text.contains("\tpe\t"));
    }

    #[test]
    fn test_text_report_paired() {
        let mut stats = FilterStats::new("reads_1.fastq");
        stats.record_paired(Verdict::Ok);
        stats.record_paired(Verdict::Ok);
        stats.record(Verdict::Ok); // salvaged mate of a broken pair
        stats.record(Verdict::Adapter);

        let mut out = Vec::new();
        stats.write_text(&mut out, &config()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("\tse\t1\n"));
        assert!(text.contains("\tpe\t2\n"));
    }

    #[test]
    fn test_empty_stats() {
        let stats = FilterStats::new("empty.fastq");
        assert_eq!(stats.ok_fraction(), 0.0);

        let mut out = Vec::new();
        stats.write_text(&mut out, &config()).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("\tfraction\t0\n"));
    }

    #[test]
    fn test_json_report() {
        let mut stats = FilterStats::new("reads.fastq");
        stats.record(Verdict::Ok);
        stats.record(Verdict::TooShort);

        let value = stats.to_json(&config());
        assert_eq!(value["file"], "reads.fastq");
        assert_eq!(value["total"], 2);
        assert_eq!(value["counts"]["ok"], 1);
        assert_eq!(value["counts"]["length50"], 1);
    }
}
