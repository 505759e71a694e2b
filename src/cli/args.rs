//! CLI argument structures
//!
//! This module defines the command-line interface of `minuta`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Render contract documents from templates
#[derive(Parser)]
#[command(name = "minuta")]
#[command(about = "minuta - Render contract documents from templates", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a template against one or more JSON context records
    #[command(name = "render")]
    Render {
        /// Template file ("-" reads stdin)
        template: PathBuf,

        /// JSON object file with field values; later files override earlier ones
        #[arg(short = 'c', long = "context", value_name = "FILE")]
        contexts: Vec<PathBuf>,

        /// Configuration file (defaults to ./minuta.toml when present)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Keep unresolved {{...}} tokens in the output
        #[arg(long)]
        no_cleanup: bool,

        /// Do not localize date fields
        #[arg(long)]
        no_format_dates: bool,

        /// Text written for empty or undefined fields
        #[arg(long, value_name = "TEXT")]
        placeholder: Option<String>,

        /// Fail instead of writing an unformatted date
        #[arg(long)]
        strict: bool,

        /// Write the document to a file instead of stdout
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Check directive structure of a template
    #[command(name = "validate")]
    Validate {
        /// Template file ("-" reads stdin)
        template: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the fields a template reads
    #[command(name = "variables")]
    Variables {
        /// Template file ("-" reads stdin)
        template: PathBuf,

        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a sample context for a template
    #[command(name = "sample")]
    Sample {
        /// Template file ("-" reads stdin)
        template: PathBuf,

        /// Render the template with the sample context instead
        #[arg(long)]
        render: bool,
    },
}
