use clap::{ArgMatches, Command};

use crate::commands::{CommandResult, EditorReport};
use crate::context::CliSession;
use crate::error::CliError;

pub fn command() -> Command {
    Command::new("status").about("Show the current selection, its steps, and unsaved changes")
}

pub fn run(session: &CliSession, _matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let editor = session.open_editor()?;
    let frameworks = editor.tree().frameworks().map(str::to_string).collect();
    Ok(CommandResult::Status {
        frameworks,
        report: EditorReport::from_editor(&editor),
    })
}
