use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors (default)
    Warn,
    /// Informational messages
    Info,
    /// Debug messages: query text, AST and plan
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Row output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned table, one column per field
    Table,
    /// JSON array of objects
    Json,
}

#[derive(Parser)]
#[command(name = "boic")]
#[command(about = "boic - browse and query a jewel of markdown shards")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Jewel root directory
    #[arg(short, long, global = true, env = "JEWEL_PATH", default_value = ".")]
    pub jewel: PathBuf,

    /// Set log level (off, error, warn, info, debug, trace)
    /// If not specified, uses RUST_LOG or defaults to 'warn'
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Level requested on the command line, if any
    pub fn level_filter(&self) -> Option<LevelFilter> {
        if let Some(level) = self.log_level {
            return Some(level.into());
        }
        match self.verbose {
            0 => None,
            1 => Some(LevelFilter::INFO),
            2 => Some(LevelFilter::DEBUG),
            _ => Some(LevelFilter::TRACE),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a ShQL query
    Execute {
        /// Query text; read from stdin up to the first line ending with ';' when omitted
        query: Option<String>,

        /// Maximum walk depth (overrides jewel.yml)
        #[arg(short, long)]
        depth: Option<usize>,

        /// Print the query plan instead of running it
        #[arg(long)]
        explain: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// List shards with a summary of their fields
    List {
        /// Only shards of this type
        #[arg(short = 't', long = "type")]
        shard_type: Option<String>,

        /// Maximum walk depth (overrides jewel.yml)
        #[arg(short, long)]
        depth: Option<usize>,
    },

    /// Print the filesystem location of a jewel path
    Resolve {
        /// Jewel path (`jewel://a/b` or `a/b`)
        path: String,
    },

    /// Print the directories visited by the corpus walker
    Walk {
        /// Starting jewel path (defaults to the root)
        path: Option<String>,

        /// Maximum walk depth (overrides jewel.yml)
        #[arg(short, long)]
        depth: Option<usize>,
    },
}
