//! CLI argument parsing
//!
//! Three commands:
//! - `derive` prints the derived client configuration
//! - `gen-config` writes a settings file holding the defaults
//! - `check` validates a settings file and its resource files

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Main application arguments
#[derive(Parser, Debug)]
#[command(name = "hdfs-config", author, version, about, long_about = None)]
pub struct HdfsConfigArgs {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

impl HdfsConfigArgs {
    /// Parse arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Derive the client configuration and print it
    Derive {
        /// Settings file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Properties)]
        format: OutputFormat,

        /// Extra resource file, merged after those in the settings file
        #[arg(short, long = "resource")]
        resources: Vec<PathBuf>,
    },

    /// Generate a settings file holding the defaults
    GenConfig {
        /// Output path; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate settings and resource files without printing the result
    Check {
        /// Settings file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Rendering of the derived configuration
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Java properties, one `key=value` per line
    Properties,
    /// Pretty-printed JSON object
    Json,
}
