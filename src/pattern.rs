//! Canonical store of adapter and contaminant patterns
//!
//! Patterns are loaded once at startup from a fragments file (one pattern per
//! line, anything after the first tab ignored) and frozen. The table always
//! carries the `NN` gap pattern and, when a homopolymer length is configured,
//! the poly-G/poly-C patterns. Pattern indices are stable and assigned in
//! insertion order.

use crate::error::{Result, SiftError};
use std::io::BufRead;

/// What a pattern means when it is found in a read
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PatternKind {
    /// Synthetic adapter fragment; the only kind subject to approximate matching
    Adapter,
    /// A run of undetermined bases (`NN`)
    NGap,
    /// Poly-G homopolymer
    PolyG,
    /// Poly-C homopolymer
    PolyC,
}

/// A single uppercase DNA pattern with its kind
#[derive(Debug, Clone)]
pub struct Pattern {
    seq: String,
    kind: PatternKind,
}

impl Pattern {
    fn new(seq: String, kind: PatternKind) -> Result<Self> {
        if seq.is_empty() {
            return Err(SiftError::Config("empty pattern".to_string()));
        }
        if let Some(bad) = seq
            .bytes()
            .find(|&b| !matches!(b, b'A' | b'C' | b'G' | b'T' | b'N'))
        {
            return Err(SiftError::Config(format!(
                "invalid character '{}' in pattern '{}' (expected A, C, G, T or N)",
                bad as char, seq
            )));
        }
        Ok(Self { seq, kind })
    }

    /// Pattern text (uppercase)
    pub fn seq(&self) -> &str {
        &self.seq
    }

    /// Pattern text as bytes
    pub fn bytes(&self) -> &[u8] {
        self.seq.as_bytes()
    }

    /// Pattern length in bases
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    /// True for the degenerate empty pattern (never stored)
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// Pattern kind
    pub fn kind(&self) -> PatternKind {
        self.kind
    }
}

/// Frozen table of patterns, indexed by insertion order
#[derive(Debug, Clone)]
pub struct PatternTable {
    patterns: Vec<Pattern>,
}

impl PatternTable {
    /// Load adapter patterns from a fragments file
    ///
    /// One pattern per line; anything after the first tab on a line is
    /// discarded; patterns are upper-cased; empty lines are skipped. The `NN`
    /// gap pattern is always appended, and a positive `poly_len` additionally
    /// appends the poly-G and poly-C homopolymer patterns of that length.
    pub fn load<R: BufRead>(reader: R, poly_len: usize) -> Result<Self> {
        let mut adapters = Vec::new();
        for line in reader.lines() {
            let mut line = line?;
            if let Some(tab) = memchr::memchr(b'\t', line.as_bytes()) {
                line.truncate(tab);
            }
            if line.ends_with('\r') {
                line.pop();
            }
            if line.is_empty() {
                continue;
            }
            line.make_ascii_uppercase();
            adapters.push(line);
        }
        Self::from_adapters(&adapters, poly_len)
    }

    /// Build a table from in-memory adapter strings
    ///
    /// Applies the same canonicalization and auxiliary-pattern injection as
    /// [`PatternTable::load`].
    pub fn from_adapters<S: AsRef<str>>(adapters: &[S], poly_len: usize) -> Result<Self> {
        let mut patterns = Vec::with_capacity(adapters.len() + 3);
        for adapter in adapters {
            let seq = adapter.as_ref().to_ascii_uppercase();
            patterns.push(Pattern::new(seq, PatternKind::Adapter)?);
        }
        if patterns.is_empty() {
            return Err(SiftError::Config("no adapter patterns loaded".to_string()));
        }
        patterns.push(Pattern::new("NN".to_string(), PatternKind::NGap)?);
        if poly_len > 0 {
            patterns.push(Pattern::new("G".repeat(poly_len), PatternKind::PolyG)?);
            patterns.push(Pattern::new("C".repeat(poly_len), PatternKind::PolyC)?);
        }
        Ok(Self { patterns })
    }

    /// Pattern by its stable index
    pub fn get(&self, pid: usize) -> &Pattern {
        &self.patterns[pid]
    }

    /// Number of patterns in the table
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True if the table holds no patterns
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Iterate over `(pid, pattern)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Pattern)> {
        self.patterns.iter().enumerate()
    }
}
