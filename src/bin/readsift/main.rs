mod cli_utils;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{cmd_count, cmd_extract, cmd_filter};

#[derive(Parser)]
#[command(name = "readsift")]
#[command(
    about = "Filter FASTQ sequencing reads by adapters, quality and complexity",
    long_about = "readsift - Fast adapter and contaminant filter for FASTQ sequencing reads\n\n\
    Scans every read against a set of adapter fragments with an Aho-Corasick\n\
    automaton, tolerating up to two mismatches via pigeonhole seed matching,\n\
    and additionally rejects reads that are too short, low quality, low\n\
    complexity (DUST), or contain N gaps and long homopolymer runs.\n\n\
    Features:\n\
      • Exact and approximate adapter matching (0, 1 or 2 mismatches)\n\
      • Single-end and paired-end modes with single-end salvage\n\
      • Transparent gzip input and output (.gz extension)\n\
      • Per-file verdict statistics, text or JSON\n\n\
    Examples:\n\
      readsift filter -i reads.fastq.gz -o out --fragments adapters.txt -e 1\n\
      readsift filter -1 r1.fastq -2 r2.fastq -o out --fragments adapters.txt --length 50 --polyg 13\n\
      readsift extract -i reads.fastq -o out --fragments adapters.txt\n\
      readsift count -i reads.fastq --fragments adapters.txt --dust-cutoff 20"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter reads into clean and rejected output files
    Filter {
        /// Single-end FASTQ input (plain or .gz), or "-" for stdin
        #[arg(short = 'i', long, value_name = "FILE", conflicts_with_all = ["reads1", "reads2"])]
        input: Option<PathBuf>,

        /// Paired-end FASTQ input, side 1
        #[arg(short = '1', long, value_name = "FILE", requires = "reads2")]
        reads1: Option<PathBuf>,

        /// Paired-end FASTQ input, side 2
        #[arg(short = '2', long, value_name = "FILE", requires = "reads1")]
        reads2: Option<PathBuf>,

        /// Output directory (created if missing)
        #[arg(short, long, value_name = "DIR")]
        out_dir: PathBuf,

        /// Adapter fragments file, one pattern per line
        #[arg(short = 'a', long, value_name = "FILE")]
        fragments: PathBuf,

        /// Number of tolerated mismatches per adapter (0, 1 or 2)
        #[arg(short, long, default_value = "0")]
        errors: u8,

        /// Minimum read length; 0 disables the check
        #[arg(short, long, default_value = "0")]
        length: usize,

        /// Length of poly-G/poly-C patterns to inject; 0 disables
        #[arg(short, long = "polyg", default_value = "0")]
        polyg: usize,

        /// DUST window width
        #[arg(long, default_value = "4")]
        dust_k: usize,

        /// DUST score cutoff; 0 disables the check
        #[arg(long, default_value = "0")]
        dust_cutoff: u32,

        /// Mean quality threshold in raw byte terms; 0 disables
        #[arg(long, default_value = "0")]
        mean_quality: u8,

        /// Report progress to stderr every million reads
        #[arg(long)]
        progress: bool,

        /// Print statistics as JSON instead of the text report
        #[arg(long)]
        json: bool,
    },

    /// Write only rejected reads (and salvaged mates), dropping clean pairs
    Extract {
        /// Single-end FASTQ input (plain or .gz), or "-" for stdin
        #[arg(short = 'i', long, value_name = "FILE", conflicts_with_all = ["reads1", "reads2"])]
        input: Option<PathBuf>,

        /// Paired-end FASTQ input, side 1
        #[arg(short = '1', long, value_name = "FILE", requires = "reads2")]
        reads1: Option<PathBuf>,

        /// Paired-end FASTQ input, side 2
        #[arg(short = '2', long, value_name = "FILE", requires = "reads1")]
        reads2: Option<PathBuf>,

        /// Output directory (created if missing)
        #[arg(short, long, value_name = "DIR")]
        out_dir: PathBuf,

        /// Adapter fragments file, one pattern per line
        #[arg(short = 'a', long, value_name = "FILE")]
        fragments: PathBuf,

        /// Number of tolerated mismatches per adapter (0, 1 or 2)
        #[arg(short, long, default_value = "0")]
        errors: u8,

        /// Report progress to stderr every million reads
        #[arg(long)]
        progress: bool,

        /// Print statistics as JSON instead of the text report
        #[arg(long)]
        json: bool,
    },

    /// Classify reads and report statistics without writing any output files
    Count {
        /// Single-end FASTQ input (plain or .gz), or "-" for stdin
        #[arg(short = 'i', long, value_name = "FILE", conflicts_with_all = ["reads1", "reads2"])]
        input: Option<PathBuf>,

        /// Paired-end FASTQ input, side 1
        #[arg(short = '1', long, value_name = "FILE", requires = "reads2")]
        reads1: Option<PathBuf>,

        /// Paired-end FASTQ input, side 2
        #[arg(short = '2', long, value_name = "FILE", requires = "reads1")]
        reads2: Option<PathBuf>,

        /// Adapter fragments file, one pattern per line
        #[arg(short = 'a', long, value_name = "FILE")]
        fragments: PathBuf,

        /// Number of tolerated mismatches per adapter (0, 1 or 2)
        #[arg(short, long, default_value = "0")]
        errors: u8,

        /// Minimum read length; 0 disables the check
        #[arg(short, long, default_value = "0")]
        length: usize,

        /// Length of poly-G/poly-C patterns to inject; 0 disables
        #[arg(short, long = "polyg", default_value = "0")]
        polyg: usize,

        /// DUST window width
        #[arg(long, default_value = "4")]
        dust_k: usize,

        /// DUST score cutoff; 0 disables the check
        #[arg(long, default_value = "0")]
        dust_cutoff: u32,

        /// Mean quality threshold in raw byte terms; 0 disables
        #[arg(long, default_value = "0")]
        mean_quality: u8,

        /// Report progress to stderr every million reads
        #[arg(long)]
        progress: bool,

        /// Print statistics as JSON instead of the text report
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Filter {
            input,
            reads1,
            reads2,
            out_dir,
            fragments,
            errors,
            length,
            polyg,
            dust_k,
            dust_cutoff,
            mean_quality,
            progress,
            json,
        } => cmd_filter(
            input,
            reads1,
            reads2,
            out_dir,
            fragments,
            errors,
            length,
            polyg,
            dust_k,
            dust_cutoff,
            mean_quality,
            progress,
            json,
        ),
        Commands::Extract {
            input,
            reads1,
            reads2,
            out_dir,
            fragments,
            errors,
            progress,
            json,
        } => cmd_extract(input, reads1, reads2, out_dir, fragments, errors, progress, json),
        Commands::Count {
            input,
            reads1,
            reads2,
            fragments,
            errors,
            length,
            polyg,
            dust_k,
            dust_cutoff,
            mean_quality,
            progress,
            json,
        } => cmd_count(
            input,
            reads1,
            reads2,
            fragments,
            errors,
            length,
            polyg,
            dust_k,
            dust_cutoff,
            mean_quality,
            progress,
            json,
        ),
    }
}
