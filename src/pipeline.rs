//! Streaming drivers for single-end and paired-end filtering
//!
//! The drivers own nothing but the loop: they pull records, classify them
//! against a shared classifier, update counters, and route records to
//! whichever sinks are present. A sink left as `None` drops its stream, which
//! is how the count-only and extract variants are expressed.

use crate::classify::{ReadClassifier, Verdict};
use crate::error::Result;
use crate::fastq::{FastqReader, FastqRecord, FastqWriter};
use crate::stats::FilterStats;
use std::io::{BufRead, Write};

/// Reads between progress callbacks
const PROGRESS_INTERVAL: u64 = 1_000_000;

/// Output streams for a single-end run
pub struct SingleSinks<W> {
    /// Clean reads
    pub ok: Option<FastqWriter<W>>,
    /// Rejected reads, annotated with their verdict
    pub filtered: Option<FastqWriter<W>>,
}

impl<W> SingleSinks<W> {
    /// No outputs at all (count-only mode)
    pub fn none() -> Self {
        Self {
            ok: None,
            filtered: None,
        }
    }
}

/// Output streams for a paired-end run
pub struct PairedSinks<W> {
    /// Clean pairs, side 1
    pub ok1: Option<FastqWriter<W>>,
    /// Clean pairs, side 2
    pub ok2: Option<FastqWriter<W>>,
    /// Rejected reads, side 1
    pub filtered1: Option<FastqWriter<W>>,
    /// Rejected reads, side 2
    pub filtered2: Option<FastqWriter<W>>,
    /// Clean mates of broken pairs, side 1
    pub se1: Option<FastqWriter<W>>,
    /// Clean mates of broken pairs, side 2
    pub se2: Option<FastqWriter<W>>,
}

impl<W> PairedSinks<W> {
    /// No outputs at all (count-only mode)
    pub fn none() -> Self {
        Self {
            ok1: None,
            ok2: None,
            filtered1: None,
            filtered2: None,
            se1: None,
            se2: None,
        }
    }
}

/// Filter one single-end stream
pub fn run_single<R: BufRead, W: Write>(
    reader: &mut FastqReader<R>,
    classifier: &ReadClassifier,
    sinks: &mut SingleSinks<W>,
    stats: &mut FilterStats,
    progress: Option<&dyn Fn(u64)>,
) -> Result<()> {
    let mut scanner = classifier.scanner();
    let mut record = FastqRecord::default();
    let mut processed = 0u64;

    while reader.read_into(&mut record)? {
        let verdict =
            classifier.classify(&mut scanner, record.seq.as_bytes(), record.qual.as_bytes());
        stats.record(verdict);

        if verdict == Verdict::Ok {
            if let Some(sink) = sinks.ok.as_mut() {
                sink.write_record(&record)?;
            }
        } else if let Some(sink) = sinks.filtered.as_mut() {
            record.annotate(&classifier.config().verdict_name(verdict));
            sink.write_record(&record)?;
        }

        processed += 1;
        if processed % PROGRESS_INTERVAL == 0 {
            if let Some(callback) = progress {
                callback(processed);
            }
        }
    }

    if let Some(sink) = sinks.ok.as_mut() {
        sink.flush()?;
    }
    if let Some(sink) = sinks.filtered.as_mut() {
        sink.flush()?;
    }
    Ok(())
}

/// Filter two mate streams in lockstep
///
/// A pair is kept only when both mates pass; the clean mate of a broken pair
/// goes to the single-end salvage stream. Processing stops at the end of the
/// shorter stream.
pub fn run_paired<R: BufRead, W: Write>(
    reader1: &mut FastqReader<R>,
    reader2: &mut FastqReader<R>,
    classifier: &ReadClassifier,
    sinks: &mut PairedSinks<W>,
    stats1: &mut FilterStats,
    stats2: &mut FilterStats,
    progress: Option<&dyn Fn(u64)>,
) -> Result<()> {
    let mut scanner = classifier.scanner();
    let mut record1 = FastqRecord::default();
    let mut record2 = FastqRecord::default();
    let mut processed = 0u64;

    while reader1.read_into(&mut record1)? && reader2.read_into(&mut record2)? {
        let verdict1 =
            classifier.classify(&mut scanner, record1.seq.as_bytes(), record1.qual.as_bytes());
        let verdict2 =
            classifier.classify(&mut scanner, record2.seq.as_bytes(), record2.qual.as_bytes());

        if verdict1 == Verdict::Ok && verdict2 == Verdict::Ok {
            stats1.record_paired(verdict1);
            stats2.record_paired(verdict2);
            if let Some(sink) = sinks.ok1.as_mut() {
                sink.write_record(&record1)?;
            }
            if let Some(sink) = sinks.ok2.as_mut() {
                sink.write_record(&record2)?;
            }
        } else {
            stats1.record(verdict1);
            stats2.record(verdict2);

            if verdict1 == Verdict::Ok {
                if let Some(sink) = sinks.se1.as_mut() {
                    sink.write_record(&record1)?;
                }
            } else if let Some(sink) = sinks.filtered1.as_mut() {
                record1.annotate(&classifier.config().verdict_name(verdict1));
                sink.write_record(&record1)?;
            }

            if verdict2 == Verdict::Ok {
                if let Some(sink) = sinks.se2.as_mut() {
                    sink.write_record(&record2)?;
                }
            } else if let Some(sink) = sinks.filtered2.as_mut() {
                record2.annotate(&classifier.config().verdict_name(verdict2));
                sink.write_record(&record2)?;
            }
        }

        processed += 1;
        if processed % PROGRESS_INTERVAL == 0 {
            if let Some(callback) = progress {
                callback(processed);
            }
        }
    }

    for sink in [
        sinks.ok1.as_mut(),
        sinks.ok2.as_mut(),
        sinks.filtered1.as_mut(),
        sinks.filtered2.as_mut(),
        sinks.se1.as_mut(),
        sinks.se2.as_mut(),
    ]
    .into_iter()
    .flatten()
    {
        sink.flush()?;
    }
    Ok(())
}
