use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Nested installer metadata checker for package catalog manifests
#[derive(Parser)]
#[command(name = "nested-installer")]
#[command(about = "Resolve and validate nested installer metadata in package manifests")]
#[command(version)]
pub struct Cli {
    /// Log resolution and lifecycle details (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Validation policy file (JSON); built-in defaults when omitted
    #[arg(short, long, global = true)]
    pub policy: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate every installer's nested metadata in a manifest
    Validate {
        /// Path to the manifest JSON file
        manifest: PathBuf,
    },
    /// Print the published form of every valid installer
    Resolve {
        /// Path to the manifest JSON file
        manifest: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
