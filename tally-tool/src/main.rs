mod config;
mod error;
mod render;
mod shell;
mod store;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tally_core::{ItemId, SessionError};
use tracing_subscriber::EnvFilter;

use crate::config::resolve_store_config;
use crate::error::TallyError;
use crate::render::{item_line, total_line, write_list, write_rejected};
use crate::store::{AnyStoreError, AppContext, StoreType};

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Keep a running tally of meals and calories", long_about = None)]
struct Cli {
    /// Store type: fjall or rocks
    #[arg(long, global = true)]
    store_type: Option<StoreType>,

    /// Path to the tally store
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Key the meal list is stored under
    #[arg(long, global = true)]
    key: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show every meal and the total
    List,

    /// Show the total calories
    Total,

    /// Record a meal
    Add {
        name: String,
        #[arg(allow_hyphen_values = true)]
        calories: String,
    },

    /// Change the name and calories of a meal
    Update {
        id: ItemId,
        name: String,
        #[arg(allow_hyphen_values = true)]
        calories: String,
    },

    /// Delete a meal
    Delete { id: ItemId },

    /// Delete every meal
    Clear,

    /// Start an interactive session
    Shell,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tally={level},tally_core={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Rejected input is reported on stderr and ends the command with a failure
/// status; nothing was changed. Other session errors are fatal.
fn reject(error: SessionError<AnyStoreError>) -> anyhow::Result<ExitCode> {
    let mut stderr = io::stderr().lock();
    match error {
        SessionError::Input(input_error) => write_rejected(&mut stderr, &input_error)?,
        SessionError::IdsExhausted(exhausted) => writeln!(stderr, "{}", exhausted)?,
        other => return Err(TallyError::from(other).into()),
    }
    Ok(ExitCode::FAILURE)
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = resolve_store_config(cli.store_type, cli.store, cli.key);
    let AppContext { mut session } =
        AppContext::open(settings.store_type, settings.path, settings.key)?;

    let mut stdout = io::stdout().lock();

    match cli.command {
        Command::List => write_list(&mut stdout, session.items(), session.total())?,
        Command::Total => writeln!(stdout, "{}", total_line(session.total()))?,
        Command::Add { name, calories } => match session.submit_add(&name, &calories) {
            Ok(item) => {
                writeln!(stdout, "Added {}", item_line(&item))?;
                writeln!(stdout, "{}", total_line(session.total()))?;
            }
            Err(error) => return reject(error),
        },
        Command::Update { id, name, calories } => {
            session.begin_edit(id).ok_or(TallyError::ItemNotFound(id))?;
            match session.submit_update(&name, &calories) {
                Ok(Some(item)) => {
                    writeln!(stdout, "Updated {}", item_line(&item))?;
                    writeln!(stdout, "{}", total_line(session.total()))?;
                }
                Ok(None) => return Err(TallyError::ItemNotFound(id).into()),
                Err(error) => return reject(error),
            }
        }
        Command::Delete { id } => {
            session.begin_edit(id).ok_or(TallyError::ItemNotFound(id))?;
            if let Some(item) = session.submit_delete()? {
                writeln!(stdout, "Deleted {}", item_line(&item))?;
                writeln!(stdout, "{}", total_line(session.total()))?;
            }
        }
        Command::Clear => {
            session.clear_all()?;
            writeln!(stdout, "Cleared all meals.")?;
        }
        Command::Shell => {
            let stdin = io::stdin().lock();
            let mut stderr = io::stderr().lock();
            shell::run(&mut session, stdin, &mut stdout, &mut stderr)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
