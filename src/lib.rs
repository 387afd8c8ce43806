//! Readsift - Fast Adapter and Contaminant Filter for Sequencing Reads
//!
//! Readsift partitions high-throughput FASTQ streams into clean and filtered
//! reads by matching every read against a set of adapter fragments, with an
//! optional mismatch budget, plus length, mean-quality, low-complexity (DUST)
//! and homopolymer checks.
//!
//! # Quick Start
//!
//! ```rust
//! use readsift::{FilterConfig, PatternTable, ReadClassifier, Verdict};
//!
//! // One automaton serves the whole run
//! let table = PatternTable::from_adapters(&["AGATCGGAAGAGC"], 0)?;
//! let config = FilterConfig { errors: 1, ..FilterConfig::default() };
//! let classifier = ReadClassifier::new(&table, config)?;
//!
//! // Each worker owns a scan context
//! let mut scanner = classifier.scanner();
//! let verdict = classifier.classify(&mut scanner, b"CCCCAGATCGGAAGTGCTTTT", b"");
//! assert_eq!(verdict, Verdict::Adapter);
//! # Ok::<(), readsift::SiftError>(())
//! ```
//!
//! # Architecture
//!
//! Patterns feed an Aho-Corasick automaton; adapter patterns are additionally
//! split into pigeonhole seeds so occurrences with up to two substitutions
//! are still caught:
//!
//! ```text
//! fragments file ──▶ PatternTable ──▶ Automaton (trie + failure links,
//!                                       │         seed records)
//!                read ──▶ Classifier ───┤
//!                          length       │ exact scan     (errors = 0)
//!                          mean quality │ two-phase scan (errors = 1, 2)
//!                          DUST         ▼
//!                               Verdict ──▶ ok / filtered streams + counters
//! ```
//!
//! The built automaton is immutable and shared; every scan context owns only
//! its traversal state, so concurrent scanning needs no synchronization.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Module declarations
pub mod automaton;
/// Read classification and filtering thresholds
pub mod classify;
/// Error types for readsift operations
pub mod error;
/// FASTQ streaming I/O with gzip support
pub mod fastq;
pub mod filters;
pub mod pattern;
/// Streaming filter drivers
pub mod pipeline;
pub mod scan;
/// Per-file verdict counters
pub mod stats;

// Re-exports for library consumers

pub use crate::automaton::{Automaton, AutomatonBuilder, NodeId};
pub use crate::classify::{FilterConfig, ReadClassifier, Verdict};
pub use crate::error::{Result, SiftError};
pub use crate::fastq::{FastqReader, FastqRecord, FastqWriter};
pub use crate::filters::{dust_score, mean_quality};
pub use crate::pattern::{Pattern, PatternKind, PatternTable};
pub use crate::scan::Scanner;
pub use crate::stats::FilterStats;

// Version information
/// Library version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
