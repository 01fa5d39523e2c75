//! CLI parse: clap types for amalgam. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Amalgam CLI - configuration amalgamation and change detection
#[derive(Parser, Debug)]
#[command(name = "amalgam")]
#[command(about = "Merge agent config sources and inspect the amalgamated result")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (overrides the user settings file)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Config file or directory read by the filesystem plugin
    #[arg(long)]
    pub config_path: Option<PathBuf>,

    /// Config plugin to activate
    #[arg(long)]
    pub config_plugin: Option<String>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the amalgamated configuration
    Show,
    /// Print the digest of the amalgamated configuration
    Digest,
    /// List scheduled queries
    Schedule {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List watched-file categories
    Watched {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Read one value by dotted path (e.g. options.verbose)
    Get {
        path: String,
    },
    /// Merge extra files on top of the loaded configuration and report the result
    Merge {
        /// Files merged in file-name order, later ones winning
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Keep the configuration refreshed until interrupted
    Watch {
        /// Seconds between refreshes (overrides settings)
        #[arg(long)]
        interval: Option<u64>,
    },
}
