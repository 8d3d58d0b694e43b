//! cigarmap CLI entry point
//!
//! Maps transcript-local offsets to reference coordinates from CIGAR strings.

use clap::{Parser, Subcommand, ValueEnum};
use cigarmap::core::{BuildPolicy, MapConfig, SupportedOps, TranscriptMapIndex};
use cigarmap::formats::{self, ReportConfig};
use std::path::PathBuf;
use std::time::Instant;

/// Index build policy (CLI enum)
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum PolicyArg {
    /// Abort on the first transcript whose CIGAR cannot be mapped
    #[default]
    #[value(name = "batch")]
    Batch,
    /// Skip failing transcripts and index the rest
    #[value(name = "partial")]
    Partial,
}

impl From<PolicyArg> for BuildPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Batch => BuildPolicy::BatchFail,
            PolicyArg::Partial => BuildPolicy::PartialSuccess,
        }
    }
}

#[derive(Parser)]
#[command(name = "cigarmap")]
#[command(about = "Map transcript-local offsets to reference coordinates using CIGAR strings")]
#[command(version)]
#[command(author = "cigarmap Contributors")]
struct Cli {
    /// Index build policy: 'batch' aborts on the first bad CIGAR, 'partial' skips it
    #[arg(long = "policy", global = true, default_value = "batch")]
    policy: PolicyArg,

    /// CIGAR operations to accept (subset of MXID)
    #[arg(long = "ops", global = true, default_value = "MXID")]
    ops: String,

    /// Number of threads for building maps
    #[arg(short = 't', long, global = true, default_value = "1")]
    threads: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve queries against the transcript maps
    Query {
        /// Mapping table: transcript_id, chromosome, reference_start, cigar
        #[arg(long = "cigar-path", alias = "cigar_path")]
        cigar_path: PathBuf,
        /// Query table: transcript_id, local_offset
        #[arg(long = "query-path", alias = "query_path")]
        query_path: PathBuf,
        /// Output file
        #[arg(short = 'o', long, default_value = formats::report::DEFAULT_OUTPUT)]
        output: PathBuf,
    },
    /// Write every local offset of every transcript with its reference coordinate
    Dump {
        /// Mapping table: transcript_id, chromosome, reference_start, cigar
        #[arg(long = "cigar-path", alias = "cigar_path")]
        cigar_path: PathBuf,
        /// Output file
        #[arg(short = 'o', long, default_value = "map_dump.txt")]
        output: PathBuf,
    },
}

fn load_index(cigar_path: &PathBuf, config: &MapConfig) -> anyhow::Result<TranscriptMapIndex> {
    let start = Instant::now();
    eprintln!("Loading mapping table: {:?}", cigar_path);

    let records = formats::read_transcript_records(cigar_path)
        .map_err(|e| anyhow::anyhow!("Failed to load mapping table: {}", e))?;
    let total = records.len();

    let built = TranscriptMapIndex::build_with_config(records, config)
        .map_err(|e| anyhow::anyhow!("Failed to build coordinate maps: {}", e))?;

    for failure in &built.failures {
        eprintln!("Skipped {}", failure);
    }
    eprintln!(
        "Indexed {}/{} transcripts ({} offsets) in {:.2}s",
        built.index.len(),
        total,
        built.index.total_offsets(),
        start.elapsed().as_secs_f64()
    );

    Ok(built.index)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    let config = MapConfig {
        supported: SupportedOps::from_chars(&cli.ops)?,
        policy: cli.policy.into(),
        threads: cli.threads.max(1),
    };

    match config.policy {
        BuildPolicy::PartialSuccess => eprintln!("Build policy: partial (failing transcripts are skipped)"),
        BuildPolicy::BatchFail => {}
    }

    match cli.command {
        Commands::Query { cigar_path, query_path, output } => {
            let index = load_index(&cigar_path, &config)?;
            let queries = formats::read_queries(&query_path)
                .map_err(|e| anyhow::anyhow!("Failed to load query table: {}", e))?;

            let report = ReportConfig {
                output,
                ..ReportConfig::default()
            };
            let rows = formats::resolve_queries(&index, &queries);
            let stats = formats::write_report(&rows, &report)?;

            eprintln!("Results file: {}", report.output.display());
            eprintln!("\n=== Query Statistics ===");
            eprintln!("Total queries:   {}", stats.total);
            eprintln!("Mapped:          {}", stats.mapped);
            eprintln!("Not found:       {}", stats.not_found);
            eprintln!("Out of range:    {}", stats.out_of_range);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::Dump { cigar_path, output } => {
            let index = load_index(&cigar_path, &config)?;
            let rows = formats::write_dump(&index, &output)?;

            eprintln!("Dump file: {}", output.display());
            eprintln!("\n=== Dump Statistics ===");
            eprintln!("Transcripts:     {}", index.len());
            eprintln!("Rows:            {}", rows);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }
    }

    Ok(())
}
