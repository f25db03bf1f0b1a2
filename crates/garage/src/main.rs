//! `garage` - CLI for the garage parking tracker
//!
//! This binary opens the local store, then checks vehicles in and out and
//! shows the active table or the history of past check-outs.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, Stdout};

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use garage::cli::{
    Cli, Command, ConfigCommand, HistoryAction, HistoryCommand, Session, TerminalConfirm,
};
use garage::{init_logging, Config, Garage, SqliteStore, SurfaceFormat, TerminalSurface};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::List(cmd) => open_session(&config, stdout_surface(cmd.format.into()))?.list()?,
        Command::CheckIn(cmd) => open_session(&config, stdout_surface(SurfaceFormat::Table))?
            .check_in(&cmd)?,
        Command::CheckOut(cmd) => open_session(&config, stdout_surface(SurfaceFormat::Table))?
            .check_out(&cmd, &mut TerminalConfirm::stdio())?,
        Command::History(cmd) => handle_history(&config, cmd)?,
        Command::Operator(cmd) => {
            open_session(&config, stdout_surface(SurfaceFormat::Table))?
                .operator(cmd.action.as_ref())?;
        }
        Command::Config(config_cmd) => handle_config(&config, config_cmd)?,
    }
    Ok(())
}

fn stdout_surface(format: SurfaceFormat) -> TerminalSurface<Stdout> {
    TerminalSurface::new(io::stdout()).with_format(format)
}

fn open_session(
    config: &Config,
    surface: TerminalSurface<Stdout>,
) -> anyhow::Result<Session<SqliteStore, Stdout>> {
    let path = config.database_path();
    debug!("Opening store at {}", path.display());
    let store = SqliteStore::open(&path)
        .with_context(|| format!("could not open garage store at {}", path.display()))?;
    let garage = Garage::from_config(store, config)?;
    Ok(Session::new(garage, surface).with_check_out_confirmation(config.checkout.confirm))
}

fn handle_history(config: &Config, cmd: HistoryCommand) -> anyhow::Result<()> {
    match cmd.action {
        Some(HistoryAction::Clear { yes }) => {
            open_session(config, stdout_surface(SurfaceFormat::Table))?
                .clear_history(yes, &mut TerminalConfirm::stdio())?;
        }
        None => {
            let surface = stdout_surface(cmd.format.into()).with_html_output(cmd.html);
            open_session(config, surface)?.history()?;
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Display]");
                println!("  Time zone:          {}", config.display.timezone);
                println!();
                println!("[Check-in]");
                println!("  Licence pattern:    {}", config.checkin.licence_pattern);
                println!();
                println!("[Check-out]");
                println!("  Confirm:            {}", config.checkout.confirm);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
