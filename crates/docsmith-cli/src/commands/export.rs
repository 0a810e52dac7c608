use std::path::PathBuf;

use clap::{Arg, ArgMatches, Command};

use crate::commands::CommandResult;
use crate::context::CliSession;
use crate::error::CliError;
use crate::util::workspace_relative;

pub fn command() -> Command {
    Command::new("export")
        .about("Write the selected framework's documentation as <framework>Docs.json")
        .arg(
            Arg::new("out")
                .long("out")
                .value_name("DIR")
                .help("Directory to write into. Defaults to <workspace>/exports."),
        )
}

pub fn run(session: &CliSession, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let editor = session.open_editor()?;
    let artifact = editor.export()?;
    let out = matches.get_one::<String>("out").map(PathBuf::from);
    let persisted = session
        .persistence
        .write_export(&artifact, out.as_deref())?;
    tracing::info!(path = %persisted.path.display(), "exported documentation");

    Ok(CommandResult::Exported {
        file_name: persisted.file_name,
        path: workspace_relative(session.workspace_paths.root(), &persisted.path),
    })
}
