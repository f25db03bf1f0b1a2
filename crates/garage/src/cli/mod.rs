//! Command-line interface for garage.
//!
//! This module provides the CLI structure, the terminal confirmation prompt,
//! and the [`Session`] that runs parking commands against a store.

mod commands;
mod prompt;
mod session;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    CheckInCommand, CheckOutCommand, ConfigCommand, HistoryAction, HistoryCommand, ListCommand,
    OperatorAction, OperatorCommand, OutputFormat,
};
pub use prompt::TerminalConfirm;
pub use session::Session;

/// garage - Keep track of the vehicles in your parking lot
///
/// Check vehicles in and out, see what is parked right now, and review
/// the history of past check-outs.
#[derive(Debug, Parser)]
#[command(name = "garage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the vehicles currently parked
    List(ListCommand),

    /// Check a vehicle in
    CheckIn(CheckInCommand),

    /// Check a parked vehicle out
    CheckOut(CheckOutCommand),

    /// Show or clear the history of checked-out vehicles
    History(HistoryCommand),

    /// Show or change the remembered operator name
    Operator(OperatorCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Info,
                2 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
