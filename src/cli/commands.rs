use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "confirm-verify")]
#[command(about = "Cross-check ledger addresses of confirmation targets against the Kakao Local API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file (extension optional)
    #[arg(short, long, global = true, default_value = "config/default")]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate every company in an input table and write a report
    Run {
        /// Input table (.xlsx, .xls, .ods or .csv)
        #[arg(short, long)]
        input: PathBuf,

        /// Report file (.xlsx or .csv); defaults to report.output_path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Minimum similarity (1-100) for a match verdict
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=100))]
        threshold: Option<u8>,

        /// Number of records looked up at once
        #[arg(long)]
        concurrency: Option<usize>,

        /// Console output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Print every outcome, not just the summary
        #[arg(short, long)]
        verbose: bool,
    },

    /// Score two addresses without calling the API
    Score {
        first: String,
        second: String,
    },

    /// Run a single geocoding lookup
    Lookup {
        query: String,

        /// Use the keyword (place) search instead of the address search
        #[arg(short, long)]
        keyword: bool,
    },

    /// Check configuration and credentials
    Check,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
