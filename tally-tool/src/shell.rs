//! Line-oriented interactive front end.
//!
//! One [`Session`] lives for the whole run, so a meal selected with `edit`
//! stays selected until it is updated, deleted or abandoned with `back`.

use std::io::{self, BufRead, Write};

use tally_core::{ItemId, Mode, Session, SessionError, Store};
use thiserror::Error;
use tracing::debug;

use crate::render::{item_line, total_line, write_list, write_rejected};

const HELP: &str = "\
Commands:
  add <name> <calories>     record a meal
  edit <id>                 select a meal for editing
  update <name> <calories>  change the selected meal
  delete [id]               delete the selected meal (or select <id> first)
  back                      stop editing
  clear                     delete every meal
  list                      show all meals
  total                     show total calories
  help                      show this help
  quit                      leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Add { name: String, quantity: String },
    Edit(ItemId),
    Update { name: String, quantity: String },
    Delete(Option<ItemId>),
    Back,
    Clear,
    List,
    Total,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty line")]
    Empty,
    #[error("unknown command: {0} (try `help`)")]
    UnknownCommand(String),
    #[error("missing {0}")]
    MissingArgument(&'static str),
    #[error("not a meal id: {0}")]
    InvalidId(String),
}

#[derive(Debug, Error)]
pub enum ShellError<E: std::error::Error + 'static> {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Session(#[from] SessionError<E>),
}

impl std::str::FromStr for ShellCommand {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let Some(command) = tokens.next() else {
            return Err(ParseError::Empty);
        };
        let args: Vec<&str> = tokens.collect();

        match command.to_lowercase().as_str() {
            "add" => {
                let (name, quantity) = split_name_quantity(&args)?;
                Ok(ShellCommand::Add { name, quantity })
            }
            "update" => {
                let (name, quantity) = split_name_quantity(&args)?;
                Ok(ShellCommand::Update { name, quantity })
            }
            "edit" => {
                let id = args.first().ok_or(ParseError::MissingArgument("meal id"))?;
                Ok(ShellCommand::Edit(parse_id(id)?))
            }
            "delete" => Ok(ShellCommand::Delete(
                args.first().map(|id| parse_id(id)).transpose()?,
            )),
            "back" => Ok(ShellCommand::Back),
            "clear" => Ok(ShellCommand::Clear),
            "list" | "ls" => Ok(ShellCommand::List),
            "total" => Ok(ShellCommand::Total),
            "help" | "?" => Ok(ShellCommand::Help),
            "quit" | "exit" => Ok(ShellCommand::Quit),
            other => Err(ParseError::UnknownCommand(other.to_string())),
        }
    }
}

/// The last argument is the quantity, everything before it is the name.
fn split_name_quantity(args: &[&str]) -> Result<(String, String), ParseError> {
    match args {
        [] => Err(ParseError::MissingArgument("name")),
        [_] => Err(ParseError::MissingArgument("calories")),
        [name @ .., quantity] => Ok((name.join(" "), quantity.to_string())),
    }
}

fn parse_id(text: &str) -> Result<ItemId, ParseError> {
    text.trim_start_matches('#')
        .parse()
        .map_err(|_| ParseError::InvalidId(text.to_string()))
}

fn prompt<S: Store>(session: &Session<S>) -> String {
    match session.mode() {
        Mode::Add => "tally> ".to_string(),
        Mode::Edit(id) => format!("tally (editing #{})> ", id),
    }
}

/// Reads commands from `input` until `quit` or end of input.
///
/// Results go to `out`. Rejected input and unparseable lines are reported on
/// `err` and leave the session unchanged.
pub fn run<S: Store>(
    session: &mut Session<S>,
    input: impl BufRead,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<(), ShellError<S::Error>> {
    write!(out, "{}", prompt(session))?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        match line.parse::<ShellCommand>() {
            Ok(ShellCommand::Quit) => return Ok(()),
            Ok(command) => execute(session, command, out, err)?,
            Err(ParseError::Empty) => {}
            Err(parse_err) => writeln!(err, "{}", parse_err)?,
        }
        write!(out, "{}", prompt(session))?;
        out.flush()?;
    }

    writeln!(out)?;
    Ok(())
}

fn execute<S: Store>(
    session: &mut Session<S>,
    command: ShellCommand,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<(), ShellError<S::Error>> {
    debug!(?command, "shell command");
    match command {
        ShellCommand::Add { name, quantity } => match session.submit_add(&name, &quantity) {
            Ok(item) => {
                writeln!(out, "Added {}", item_line(&item))?;
                writeln!(out, "{}", total_line(session.total()))?;
            }
            Err(error) => report_rejected(error, err)?,
        },
        ShellCommand::Edit(id) => match session.begin_edit(id) {
            Some(item) => writeln!(out, "Editing {}", item_line(&item))?,
            None => writeln!(out, "Meal not found: #{}", id)?,
        },
        ShellCommand::Update { name, quantity } => {
            if session.mode() == Mode::Add {
                writeln!(out, "Nothing selected; use `edit <id>` first.")?;
                return Ok(());
            }
            match session.submit_update(&name, &quantity) {
                Ok(Some(item)) => {
                    writeln!(out, "Updated {}", item_line(&item))?;
                    writeln!(out, "{}", total_line(session.total()))?;
                }
                Ok(None) => writeln!(out, "The selected meal no longer exists.")?,
                Err(error) => report_rejected(error, err)?,
            }
        }
        ShellCommand::Delete(id) => {
            if let Some(id) = id {
                if session.begin_edit(id).is_none() {
                    writeln!(out, "Meal not found: #{}", id)?;
                    return Ok(());
                }
            }
            match session.submit_delete()? {
                Some(item) => {
                    writeln!(out, "Deleted {}", item_line(&item))?;
                    writeln!(out, "{}", total_line(session.total()))?;
                }
                None => writeln!(out, "Nothing selected; use `edit <id>` first.")?,
            }
        }
        ShellCommand::Back => {
            session.back();
            writeln!(out, "Back to adding meals.")?;
        }
        ShellCommand::Clear => {
            session.clear_all()?;
            writeln!(out, "Cleared all meals.")?;
            writeln!(out, "{}", total_line(session.total()))?;
        }
        ShellCommand::List => write_list(out, session.items(), session.total())?,
        ShellCommand::Total => writeln!(out, "{}", total_line(session.total()))?,
        ShellCommand::Help => writeln!(out, "{}", HELP)?,
        ShellCommand::Quit => {}
    }
    Ok(())
}

/// Writes rejected input to `err`; any other session error ends the shell.
fn report_rejected<E: std::error::Error + 'static>(
    error: SessionError<E>,
    err: &mut impl Write,
) -> Result<(), ShellError<E>> {
    match error {
        SessionError::Input(input_error) => write_rejected(err, &input_error)?,
        SessionError::IdsExhausted(exhausted) => writeln!(err, "{}", exhausted)?,
        other => return Err(other.into()),
    }
    Ok(())
}
