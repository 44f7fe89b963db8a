//! Command-Line Interface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Swing Analyzer - Turning-point and revolution analysis for tracked throws
#[derive(Parser, Debug)]
#[command(name = "swing-analyzer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze an exported trajectory (`Frame,X,Y` CSV or sample-array JSON)
    Analyze {
        /// Input trajectory file
        input: PathBuf,

        /// Video duration in seconds, used for the plausibility check
        /// (derived from timestamps when omitted)
        #[arg(short, long)]
        duration: Option<f64>,

        /// Frame rate assumed when the input is a CSV without timestamps
        #[arg(short, long, default_value = "30.0")]
        frame_rate: f64,

        /// Emit the full detection result as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// View or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the default configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
