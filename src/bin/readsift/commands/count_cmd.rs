use anyhow::{bail, Context, Result};
use readsift::pipeline::{run_paired, run_single, PairedSinks, SingleSinks};
use readsift::{FastqReader, FilterConfig, FilterStats};
use std::io::Write;
use std::path::PathBuf;

use crate::cli_utils::{build_classifier, emit_stats, report_progress};

#[allow(clippy::too_many_arguments)]
pub fn cmd_count(
    input: Option<PathBuf>,
    reads1: Option<PathBuf>,
    reads2: Option<PathBuf>,
    fragments: PathBuf,
    errors: u8,
    length: usize,
    polyg: usize,
    dust_k: usize,
    dust_cutoff: u32,
    mean_quality: u8,
    progress: bool,
    json: bool,
) -> Result<()> {
    let config = FilterConfig {
        errors,
        min_length: length,
        dust_k,
        dust_cutoff,
        poly_len: polyg,
        mean_quality,
    };
    let classifier = build_classifier(&fragments, config)?;

    let callback = report_progress;
    let progress: Option<&dyn Fn(u64)> = progress.then_some(&callback as &dyn Fn(u64));

    match (input, reads1, reads2) {
        (Some(input), None, None) => {
            let mut reader = FastqReader::open(&input)
                .with_context(|| format!("Cannot open reads file: {}", input.display()))?;
            let mut sinks = SingleSinks::<Box<dyn Write + Send>>::none();
            let mut stats = FilterStats::new(input.display().to_string());

            run_single(&mut reader, &classifier, &mut sinks, &mut stats, progress)
                .with_context(|| format!("Failed while counting {}", input.display()))?;

            emit_stats(&[&stats], classifier.config(), json)
        }
        (None, Some(reads1), Some(reads2)) => {
            let mut reader1 = FastqReader::open(&reads1)
                .with_context(|| format!("Cannot open reads file: {}", reads1.display()))?;
            let mut reader2 = FastqReader::open(&reads2)
                .with_context(|| format!("Cannot open reads file: {}", reads2.display()))?;
            let mut sinks = PairedSinks::<Box<dyn Write + Send>>::none();
            let mut stats1 = FilterStats::new(reads1.display().to_string());
            let mut stats2 = FilterStats::new(reads2.display().to_string());

            run_paired(
                &mut reader1,
                &mut reader2,
                &classifier,
                &mut sinks,
                &mut stats1,
                &mut stats2,
                progress,
            )
            .context("Failed while counting paired reads")?;

            emit_stats(&[&stats1, &stats2], classifier.config(), json)
        }
        _ => bail!("specify either -i for single-end or both -1 and -2 for paired-end input"),
    }
}
