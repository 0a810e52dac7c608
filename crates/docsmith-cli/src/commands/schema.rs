use clap::Command;
use docsmith::snapshot;

use crate::commands::CommandResult;
use crate::error::{CliError, ExitStatus};

pub fn command() -> Command {
    Command::new("schema").about("Print the JSON schema of the snapshot format")
}

pub fn run() -> Result<CommandResult, CliError> {
    let raw = snapshot::schema()?;
    let schema = serde_json::from_str(&raw)
        .map_err(|err| CliError::new(err.to_string(), ExitStatus::Software))?;
    Ok(CommandResult::Schema { schema })
}
