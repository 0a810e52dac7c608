use clap::{Arg, ArgMatches, Command};
use docsmith::{Mutation, Reorder, ReorderScope, ReviewKind};

use crate::commands::module::index;
use crate::commands::{CommandResult, apply_and_commit, index_arg, reorder_and_commit, string_arg};
use crate::context::CliSession;
use crate::error::CliError;
use crate::util;

pub fn command() -> Command {
    Command::new("submodule")
        .about("Manage submodules of the selected module")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Append a submodule and select it")
                .arg(Arg::new("name").required(true)),
        )
        .subcommand(
            Command::new("edit")
                .about("Rename a submodule")
                .arg(index("index"))
                .arg(Arg::new("name").required(true)),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a submodule and its steps")
                .arg(index("index")),
        )
        .subcommand(
            Command::new("move")
                .about("Move a submodule to another position")
                .arg(index("from"))
                .arg(index("to")),
        )
        .subcommand(
            Command::new("submit")
                .about("Submit a submodule for review")
                .arg(index("index")),
        )
}

pub fn run(session: &CliSession, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let mut editor = session.open_editor()?;
    let module = util::require_module(&editor)?;
    let count = editor
        .resolved()
        .module
        .map(|parent| parent.submodules.len())
        .unwrap_or_default();

    match matches.subcommand() {
        Some(("add", sub)) => {
            let name = util::validate_name(&string_arg(sub, "name")?, "submodule")?;
            apply_and_commit(session, &mut editor, Mutation::AddSubmodule { name })
        }
        Some(("edit", sub)) => {
            let submodule = index_arg(sub, "index")?;
            util::ensure_index(submodule, count, "submodule")?;
            let name = util::validate_name(&string_arg(sub, "name")?, "submodule")?;
            apply_and_commit(
                session,
                &mut editor,
                Mutation::EditSubmodule { submodule, name },
            )
        }
        Some(("delete", sub)) => {
            let submodule = index_arg(sub, "index")?;
            util::ensure_index(submodule, count, "submodule")?;
            apply_and_commit(session, &mut editor, Mutation::DeleteSubmodule { submodule })
        }
        Some(("move", sub)) => {
            let from = index_arg(sub, "from")?;
            let to = index_arg(sub, "to")?;
            util::ensure_index(from, count, "submodule")?;
            util::ensure_index(to, count, "submodule")?;
            reorder_and_commit(
                session,
                &mut editor,
                Reorder::new(ReorderScope::Submodules { module }, from, to),
            )
        }
        Some(("submit", sub)) => {
            let submodule = index_arg(sub, "index")?;
            util::ensure_index(submodule, count, "submodule")?;
            crate::commands::review::submit(session, &mut editor, ReviewKind::Submodule, submodule)
        }
        _ => Err(CliError::usage("unsupported submodule command")),
    }
}
