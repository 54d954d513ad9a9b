use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use rust_schemacompare::collect::{ProgressReporter, SilentProgress, TracingProgress};
use rust_schemacompare::compare::Presentation;
use rust_schemacompare::config::DEFAULT_CONFIG_FILE;
use rust_schemacompare::logging::init_logging;
use rust_schemacompare::{compare, dump, CompareOptions, DumpOptions, DEFAULT_FILTER};

#[derive(Parser)]
#[command(name = "rust-schemacompare")]
#[command(author, version, about = "Structural schema comparison for Databricks catalogs and notebook projects")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Recorded catalog (JSON list of query/rows items) used for schema sides
    #[arg(long, global = true)]
    catalog_snapshot: Option<PathBuf>,

    /// Disable progress events
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two sides and report every difference
    Compare {
        /// Source schema names (a+b), schema group or project folder
        source: String,

        /// Target schema names (a+b), schema group or project folder
        target: String,

        /// Filter objects to compare using a glob pattern
        #[arg(short, long, default_value = DEFAULT_FILTER)]
        filter: String,

        /// Print a separation line between objects
        #[arg(long)]
        sep: bool,

        /// Report results as a raw list
        #[arg(long)]
        raw: bool,
    },
    /// Dump one side's definitions as JSON, with no comparison
    Dump {
        /// Schema names (a+b), schema group or project folder
        source: String,

        /// Filter objects using a glob pattern
        #[arg(short, long, default_value = DEFAULT_FILTER)]
        filter: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut progress: Box<dyn ProgressReporter> = if cli.no_progress {
        Box::new(SilentProgress)
    } else {
        Box::new(TracingProgress::new())
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Compare {
            source,
            target,
            filter,
            sep,
            raw,
        } => {
            let options = CompareOptions {
                source,
                target,
                filter,
                presentation: if raw {
                    Presentation::Narrative
                } else {
                    Presentation::Table { separators: sep }
                },
                config_path: cli.config,
                catalog_snapshot: cli.catalog_snapshot,
            };

            let report = compare(&options, progress.as_mut())?;
            report.write_to(&mut out)?;
        }
        Commands::Dump { source, filter } => {
            let options = DumpOptions {
                source,
                filter,
                config_path: cli.config,
                catalog_snapshot: cli.catalog_snapshot,
            };

            let json = dump(&options, progress.as_mut())?;
            writeln!(out, "{json}")?;
        }
    }

    Ok(())
}
