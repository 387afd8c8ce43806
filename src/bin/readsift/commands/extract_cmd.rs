use anyhow::{bail, Context, Result};
use readsift::pipeline::{run_paired, run_single, PairedSinks, SingleSinks};
use readsift::{FastqReader, FastqWriter, FilterConfig, FilterStats};
use std::path::PathBuf;

use crate::cli_utils::{
    build_classifier, emit_stats, ensure_dir, output_path, read_stem, report_progress,
};

#[allow(clippy::too_many_arguments)]
pub fn cmd_extract(
    input: Option<PathBuf>,
    reads1: Option<PathBuf>,
    reads2: Option<PathBuf>,
    out_dir: PathBuf,
    fragments: PathBuf,
    errors: u8,
    progress: bool,
    json: bool,
) -> Result<()> {
    let config = FilterConfig {
        errors,
        ..FilterConfig::default()
    };
    let classifier = build_classifier(&fragments, config)?;
    ensure_dir(&out_dir)?;

    let callback = report_progress;
    let progress: Option<&dyn Fn(u64)> = progress.then_some(&callback as &dyn Fn(u64));

    match (input, reads1, reads2) {
        (Some(input), None, None) => {
            let stem = read_stem(&input);
            let mut reader = FastqReader::open(&input)
                .with_context(|| format!("Cannot open reads file: {}", input.display()))?;
            // Clean reads are dropped; only rejected reads are written
            let mut sinks = SingleSinks {
                ok: None,
                filtered: Some(FastqWriter::create(output_path(&out_dir, &stem, "filtered"))?),
            };
            let mut stats = FilterStats::new(input.display().to_string());

            run_single(&mut reader, &classifier, &mut sinks, &mut stats, progress)
                .with_context(|| format!("Failed while extracting from {}", input.display()))?;

            emit_stats(&[&stats], classifier.config(), json)
        }
        (None, Some(reads1), Some(reads2)) => {
            let stem1 = read_stem(&reads1);
            let stem2 = read_stem(&reads2);
            let mut reader1 = FastqReader::open(&reads1)
                .with_context(|| format!("Cannot open reads file: {}", reads1.display()))?;
            let mut reader2 = FastqReader::open(&reads2)
                .with_context(|| format!("Cannot open reads file: {}", reads2.display()))?;
            // Clean pairs are dropped; broken pairs keep the clean mate in
            // the single-end salvage stream
            let mut sinks = PairedSinks {
                ok1: None,
                ok2: None,
                filtered1: Some(FastqWriter::create(output_path(&out_dir, &stem1, "filtered"))?),
                filtered2: Some(FastqWriter::create(output_path(&out_dir, &stem2, "filtered"))?),
                se1: Some(FastqWriter::create(output_path(&out_dir, &stem1, "se"))?),
                se2: Some(FastqWriter::create(output_path(&out_dir, &stem2, "se"))?),
            };
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
            .context("Failed while extracting from paired reads")?;

            emit_stats(&[&stats1, &stats2], classifier.config(), json)
        }
        _ => bail!("specify either -i for single-end or both -1 and -2 for paired-end input"),
    }
}
