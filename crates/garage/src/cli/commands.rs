//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::render::SurfaceFormat;

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Check-in command arguments.
#[derive(Debug, Args)]
pub struct CheckInCommand {
    /// Vehicle description
    #[arg(short, long, default_value = "")]
    pub name: String,

    /// Licence plate (AAA-1234)
    #[arg(short, long, default_value = "")]
    pub licence: String,

    /// Owner name; defaults to the remembered operator name
    #[arg(short, long)]
    pub owner: Option<String>,
}

/// Check-out command arguments.
#[derive(Debug, Args)]
pub struct CheckOutCommand {
    /// Licence plate of the parked vehicle
    pub licence: String,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// History command arguments.
///
/// The report options only apply to showing history, so they cannot be
/// combined with `clear`.
#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true)]
pub struct HistoryCommand {
    /// Clear history instead of showing it
    #[command(subcommand)]
    pub action: Option<HistoryAction>,

    /// Write the report as a static HTML page to this file
    #[arg(long, value_name = "FILE")]
    pub html: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// History subcommands.
#[derive(Debug, Subcommand)]
pub enum HistoryAction {
    /// Discard every stored vehicle, parked and checked out
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Operator command arguments.
#[derive(Debug, Args)]
pub struct OperatorCommand {
    /// Change the remembered operator name
    #[command(subcommand)]
    pub action: Option<OperatorAction>,
}

/// Operator subcommands.
#[derive(Debug, Subcommand)]
pub enum OperatorAction {
    /// Remember an operator name
    Set {
        /// The name to prefill as owner
        name: String,
    },

    /// Forget the operator name
    Clear,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Formatted table
    #[default]
    Table,
    /// JSON output
    Json,
}

impl From<OutputFormat> for SurfaceFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Table => Self::Table,
            OutputFormat::Json => Self::Json,
        }
    }
}
