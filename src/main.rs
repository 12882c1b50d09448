use annotools::annot_utils::GFF_SUFFIX;
use annotools::options::{AttributeSlot, CompareOptions, ReduceOptions};
use annotools::options::{DEFAULT_LINEAGE_TABLE, DEFAULT_REFERENCE};
use annotools::{run_comparison, run_reduction};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "annotools")]
#[command(author, version, about = "Gene length comparison and lineage rank reduction for annotation tables")]
struct Cli {
    /// Log debug messages
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare gene lengths of GFF3 annotations against a reference annotation
    CompareGenes(CompareArgs),

    /// Reduce the lineage columns of a summary table to six rank columns
    ReduceLineage {
        /// Tab-separated summary table (plain or gzipped)
        #[arg(short, long, default_value = DEFAULT_LINEAGE_TABLE)]
        input: PathBuf,

        /// Write the reduced table here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct CompareArgs {
    /// Comparison annotations; when none are given they are discovered in --dir
    files: Vec<PathBuf>,

    /// Reference annotation
    #[arg(short, long, default_value = DEFAULT_REFERENCE)]
    reference: PathBuf,

    /// Directory searched for comparison annotations
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// File name suffix of discovered comparison annotations
    #[arg(long, default_value = GFF_SUFFIX)]
    suffix: String,

    /// Skip discovered files whose name contains this token (repeatable)
    #[arg(long, default_value = "NC")]
    exclude: Vec<String>,

    /// Do not skip discovered files by name token
    #[arg(long, conflicts_with = "exclude")]
    no_exclude: bool,

    /// Attribute pair holding the gene name in the reference
    #[arg(long, default_value_t = 0)]
    reference_slot: usize,

    /// Attribute key stripped from the reference gene name
    #[arg(long, default_value = "ID")]
    reference_key: String,

    /// Attribute pair holding the gene name in comparison annotations
    #[arg(long, default_value_t = 1)]
    comparison_slot: usize,

    /// Attribute key stripped from comparison gene names
    #[arg(long, default_value = "Name")]
    comparison_key: String,

    /// Write the reports here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl From<CompareArgs> for CompareOptions {
    fn from(args: CompareArgs) -> CompareOptions {
        CompareOptions {
            reference: args.reference,
            comparisons: args.files,
            dir: args.dir,
            suffix: args.suffix,
            exclude: if args.no_exclude {
                Vec::new()
            } else {
                args.exclude
            },
            reference_slot: AttributeSlot::new(args.reference_slot, args.reference_key),
            comparison_slot: AttributeSlot::new(args.comparison_slot, args.comparison_key),
        }
    }
}

fn init_logging(cli: &Cli) {
    let default_level = if cli.quiet {
        "warn"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // reports go to stdout, logs to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn get_writer(output: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    match output {
        Some(p) => {
            let file = File::create(p)
                .with_context(|| format!("Could not create the output file {}", p.display()))?;
            debug!("writing output to {}", p.display());
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(std::io::stdout().lock()))),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    match cli.command {
        Commands::CompareGenes(args) => {
            let mut writer = get_writer(args.output.as_deref())?;
            let opts = CompareOptions::from(args);
            run_comparison(&opts, &mut writer)?;
        }
        Commands::ReduceLineage { input, output } => {
            let mut writer = get_writer(output.as_deref())?;
            run_reduction(&ReduceOptions { input }, &mut writer)?;
        }
    }
    Ok(())
}
