use clap::{Arg, ArgMatches, Command, value_parser};
use docsmith::{Mutation, Reorder, ReorderScope, ReviewKind};

use crate::commands::{CommandResult, apply_and_commit, index_arg, reorder_and_commit, string_arg};
use crate::context::CliSession;
use crate::error::CliError;
use crate::util;

pub fn command() -> Command {
    Command::new("module")
        .about("Manage modules of the selected framework")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Append a module and select it")
                .arg(Arg::new("name").required(true)),
        )
        .subcommand(
            Command::new("edit")
                .about("Rename a module")
                .arg(index("index"))
                .arg(Arg::new("name").required(true)),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a module with its steps and submodules")
                .arg(index("index")),
        )
        .subcommand(
            Command::new("move")
                .about("Move a module to another position")
                .arg(index("from"))
                .arg(index("to")),
        )
        .subcommand(
            Command::new("submit")
                .about("Submit a module for review")
                .arg(index("index")),
        )
}

pub(crate) fn index(name: &'static str) -> Arg {
    Arg::new(name)
        .required(true)
        .value_parser(value_parser!(usize))
}

pub fn run(session: &CliSession, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let mut editor = session.open_editor()?;
    let count = editor.tree().modules(&editor.selection().framework).len();

    match matches.subcommand() {
        Some(("add", sub)) => {
            let name = util::validate_name(&string_arg(sub, "name")?, "module")?;
            apply_and_commit(session, &mut editor, Mutation::AddModule { name })
        }
        Some(("edit", sub)) => {
            let module = index_arg(sub, "index")?;
            util::ensure_index(module, count, "module")?;
            let name = util::validate_name(&string_arg(sub, "name")?, "module")?;
            apply_and_commit(session, &mut editor, Mutation::EditModule { module, name })
        }
        Some(("delete", sub)) => {
            let module = index_arg(sub, "index")?;
            util::ensure_index(module, count, "module")?;
            apply_and_commit(session, &mut editor, Mutation::DeleteModule { module })
        }
        Some(("move", sub)) => {
            let from = index_arg(sub, "from")?;
            let to = index_arg(sub, "to")?;
            util::ensure_index(from, count, "module")?;
            util::ensure_index(to, count, "module")?;
            reorder_and_commit(
                session,
                &mut editor,
                Reorder::new(ReorderScope::Modules, from, to),
            )
        }
        Some(("submit", sub)) => {
            let module = index_arg(sub, "index")?;
            util::ensure_index(module, count, "module")?;
            crate::commands::review::submit(session, &mut editor, ReviewKind::Module, module)
        }
        _ => Err(CliError::usage("unsupported module command")),
    }
}
