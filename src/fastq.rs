//! Streaming FASTQ reader/writer with automatic gzip support
//!
//! Files ending in `.gz` (case-insensitive) are transparently decompressed on
//! read and compressed on write; the path `-` means stdin or stdout. Records
//! are the usual four lines: `@id`, sequence, `+`, quality.

use crate::error::{Result, SiftError};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, stdin, stdout, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Buffer size for file I/O (128KB)
const BUFFER_SIZE: usize = 128 * 1024;

/// One sequencing read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FastqRecord {
    /// Full ID line, including the leading `@`
    pub id: String,
    /// Base sequence
    pub seq: String,
    /// Per-base quality string (raw bytes)
    pub qual: String,
}

impl FastqRecord {
    /// Append `:<label>` to the read ID
    ///
    /// Used to annotate rejected reads with their verdict before they are
    /// written to a filtered stream.
    pub fn annotate(&mut self, label: &str) {
        self.id.push(':');
        self.id.push_str(label);
    }
}

/// Open a file for reading with automatic gzip detection by extension
///
/// The path `-` reads from stdin.
pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn BufRead + Send>> {
    let path = path.as_ref();

    if path.to_str() == Some("-") {
        return Ok(Box::new(BufReader::with_capacity(BUFFER_SIZE, stdin())));
    }

    let file = File::open(path)?;
    if is_gzip(path) {
        let decoder = GzDecoder::new(file);
        Ok(Box::new(BufReader::with_capacity(BUFFER_SIZE, decoder)))
    } else {
        Ok(Box::new(BufReader::with_capacity(BUFFER_SIZE, file)))
    }
}

/// Create a file for writing, gzip-compressing when the name ends in `.gz`
///
/// The path `-` writes to stdout.
pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn Write + Send>> {
    let path = path.as_ref();

    if path.to_str() == Some("-") {
        return Ok(Box::new(BufWriter::with_capacity(BUFFER_SIZE, stdout())));
    }

    let file = File::create(path)?;
    if is_gzip(path) {
        let encoder = GzEncoder::new(
            BufWriter::with_capacity(BUFFER_SIZE, file),
            Compression::default(),
        );
        Ok(Box::new(encoder))
    } else {
        Ok(Box::new(BufWriter::with_capacity(BUFFER_SIZE, file)))
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
}

/// Streaming FASTQ reader
pub struct FastqReader<R> {
    reader: R,
    line: String,
    records: u64,
}

impl FastqReader<Box<dyn BufRead + Send>> {
    /// Open a FASTQ file (plain, `.gz`, or `-` for stdin)
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(open(path)?))
    }
}

impl<R: BufRead> FastqReader<R> {
    /// Wrap an arbitrary buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            records: 0,
        }
    }

    /// Read the next record into `record`
    ///
    /// Returns `Ok(false)` at a clean end of input. A record that ends
    /// mid-way, lacks its `+` separator, or whose quality length differs
    /// from its sequence length is a [`SiftError::Fastq`] error.
    pub fn read_into(&mut self, record: &mut FastqRecord) -> Result<bool> {
        record.id.clear();
        record.seq.clear();
        record.qual.clear();

        if !self.next_line()? {
            return Ok(false);
        }
        record.id.push_str(self.trimmed());
        // A trailing blank line is tolerated
        if record.id.is_empty() {
            return Ok(false);
        }
        if !record.id.starts_with('@') {
            return Err(self.malformed("record ID does not start with '@'"));
        }

        if !self.next_line()? {
            return Err(self.malformed("truncated record: missing sequence"));
        }
        record.seq.push_str(self.trimmed());

        if !self.next_line()? {
            return Err(self.malformed("truncated record: missing '+' separator"));
        }
        if !self.line.starts_with('+') {
            return Err(self.malformed("expected '+' separator"));
        }

        if !self.next_line()? {
            return Err(self.malformed("truncated record: missing quality"));
        }
        record.qual.push_str(self.trimmed());
        if record.qual.len() != record.seq.len() {
            return Err(self.malformed("quality length differs from sequence length"));
        }

        self.records += 1;
        Ok(true)
    }

    fn next_line(&mut self) -> Result<bool> {
        self.line.clear();
        Ok(self.reader.read_line(&mut self.line)? != 0)
    }

    fn trimmed(&self) -> &str {
        self.line.trim_end_matches(['\n', '\r'])
    }

    fn malformed(&self, msg: &str) -> SiftError {
        SiftError::Fastq(format!("{} (record {})", msg, self.records + 1))
    }

    /// Number of records read so far
    pub fn records(&self) -> u64 {
        self.records
    }
}

/// Streaming FASTQ writer
pub struct FastqWriter<W> {
    writer: W,
}

impl FastqWriter<Box<dyn Write + Send>> {
    /// Create an output file (plain, `.gz`, or `-` for stdout)
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(create(path)?))
    }
}

impl<W: Write> FastqWriter<W> {
    /// Wrap an arbitrary writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write one record in four-line form
    pub fn write_record(&mut self, record: &FastqRecord) -> Result<()> {
        self.writer.write_all(record.id.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.write_all(record.seq.as_bytes())?;
        self.writer.write_all(b"\n+\n")?;
        self.writer.write_all(record.qual.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Flush buffered output
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Consume the writer and return the underlying sink
    pub fn into_inner(self) -> W {
        self.writer
    }
}
