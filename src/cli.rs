use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use yfetch::domain::TimeSpan;
use yfetch::records::RecordFormat;

#[derive(Parser)]
#[command(name = "yfetch")]
#[command(about = "Batch quote and price-history retrieval for Yahoo Finance symbols")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Client configuration JSON; builtin defaults are used when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Suppress per-symbol progress logging
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Current quotes for any number of symbols
    Quotes(SymbolArgs),

    /// Price history per symbol
    History {
        #[command(flatten)]
        symbols: SymbolArgs,

        /// Sampling interval (1m, 5m, 1h, 1d, 1wk, 1mo, ...)
        #[arg(short, long, default_value = "1d", value_parser = parse_interval)]
        interval: TimeSpan,

        /// First day of the window (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// Last day of the window (YYYY-MM-DD)
        #[arg(long)]
        end: String,

        /// Dispatch requests concurrently instead of one after another
        #[arg(long)]
        burst: bool,

        /// Apply the configured timeout to bursts without raising it
        #[arg(long)]
        strict_timeout: bool,

        /// Cap on concurrently running burst requests
        #[arg(long)]
        max_in_flight: Option<usize>,

        /// Directory to save one file per symbol; results are printed when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// File format used with --output
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Quote summary modules for one symbol
    Summary {
        symbol: String,

        /// Module names, e.g. price summaryDetail assetProfile
        #[arg(short, long, num_args = 1.., required = true)]
        modules: Vec<String>,
    },

    /// Currencies known to the provider
    Currencies,

    /// Headline market indices
    Markets,
}

#[derive(Args)]
pub struct SymbolArgs {
    /// Symbols to fetch (e.g., AAPL MSFT ^GSPC)
    pub symbols: Vec<String>,

    /// CSV file whose first column lists symbols
    #[arg(short = 'f', long)]
    pub symbols_file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl From<OutputFormat> for RecordFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => RecordFormat::Json,
            OutputFormat::Csv => RecordFormat::Csv,
        }
    }
}

fn parse_interval(value: &str) -> Result<TimeSpan, String> {
    value.parse::<TimeSpan>().map_err(|err| err.to_string())
}
