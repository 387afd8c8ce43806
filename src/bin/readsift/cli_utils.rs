//! Shared helpers for the readsift CLI commands

use anyhow::{Context, Result};
use readsift::{FilterConfig, PatternTable, ReadClassifier};
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Base name of a reads file with its extensions stripped
///
/// Removes the final extension, and a remaining `.fastq`/`.fq` as well, so
/// `dir/sample.fastq.gz` and `dir/sample.fastq` both become `sample`.
pub fn read_stem(path: &Path) -> String {
    let mut stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("reads")
        .to_string();
    for ext in [".fastq", ".fq"] {
        if let Some(base) = stem.strip_suffix(ext) {
            stem = base.to_string();
            break;
        }
    }
    stem
}

/// Output path `<out_dir>/<stem>.<tag>.fastq`
pub fn output_path(out_dir: &Path, stem: &str, tag: &str) -> PathBuf {
    out_dir.join(format!("{}.{}.fastq", stem, tag))
}

/// Create the output directory if it does not exist
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))
}

/// Load the fragments file and build the classifier
pub fn build_classifier(fragments: &Path, config: FilterConfig) -> Result<ReadClassifier> {
    let file = fs::File::open(fragments)
        .with_context(|| format!("Cannot open fragments file: {}", fragments.display()))?;
    let table = PatternTable::load(BufReader::new(file), config.poly_len)
        .with_context(|| format!("Failed to load patterns from {}", fragments.display()))?;
    ReadClassifier::new(&table, config).context("Invalid filter configuration")
}

/// Stderr progress reporter
pub fn report_progress(processed: u64) {
    eprintln!("Processed: {}", processed);
}

/// Print the per-file reports to stdout, as text or JSON
pub fn emit_stats(stats: &[&readsift::FilterStats], config: &FilterConfig, json: bool) -> Result<()> {
    if json {
        let mut values: Vec<_> = stats.iter().map(|s| s.to_json(config)).collect();
        let value = if values.len() == 1 {
            values.pop().unwrap()
        } else {
            serde_json::Value::Array(values)
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        for s in stats {
            s.write_text(&mut out, config)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_stem() {
        assert_eq!(read_stem(Path::new("data/sample.fastq")), "sample");
        assert_eq!(read_stem(Path::new("data/sample.fastq.gz")), "sample");
        assert_eq!(read_stem(Path::new("sample.fq")), "sample");
        assert_eq!(read_stem(Path::new("sample.txt")), "sample");
        assert_eq!(read_stem(Path::new("sample")), "sample");
    }

    #[test]
    fn test_output_path() {
        let path = output_path(Path::new("out"), "sample", "ok");
        assert_eq!(path, PathBuf::from("out/sample.ok.fastq"));
    }
}
