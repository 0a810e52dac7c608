use clap::{Arg, ArgMatches, Command};
use docsmith::{Mutation, Reorder, ReorderScope};

use crate::commands::module::index;
use crate::commands::{
    CommandResult, EditorReport, apply_and_commit, index_arg, reorder_and_commit, string_arg,
};
use crate::context::CliSession;
use crate::error::CliError;
use crate::util;

pub fn command() -> Command {
    Command::new("step")
        .about("Manage steps of the selected module or submodule")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Append a step")
                .arg(Arg::new("title").required(true)),
        )
        .subcommand(
            Command::new("edit")
                .about("Change a step title")
                .arg(index("index"))
                .arg(Arg::new("title").required(true)),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a step and its blocks")
                .arg(index("index")),
        )
        .subcommand(
            Command::new("move")
                .about("Move a step to another position")
                .arg(index("from"))
                .arg(index("to")),
        )
        .subcommand(
            Command::new("focus")
                .about("Point the step cursor at a step")
                .arg(index("index")),
        )
}

pub fn run(session: &CliSession, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let mut editor = session.open_editor()?;
    let list = util::require_step_list(&editor)?;
    let count = editor.resolved().steps.len();

    match matches.subcommand() {
        Some(("add", sub)) => {
            let title = util::validate_name(&string_arg(sub, "title")?, "step")?;
            apply_and_commit(
                session,
                &mut editor,
                Mutation::AddStep {
                    title,
                    blocks: Vec::new(),
                },
            )
        }
        Some(("edit", sub)) => {
            let step = index_arg(sub, "index")?;
            util::ensure_index(step, count, "step")?;
            let title = util::validate_name(&string_arg(sub, "title")?, "step")?;
            apply_and_commit(session, &mut editor, Mutation::EditStep { step, title })
        }
        Some(("delete", sub)) => {
            let step = index_arg(sub, "index")?;
            util::ensure_index(step, count, "step")?;
            apply_and_commit(session, &mut editor, Mutation::DeleteStep { step })
        }
        Some(("move", sub)) => {
            let from = index_arg(sub, "from")?;
            let to = index_arg(sub, "to")?;
            util::ensure_index(from, count, "step")?;
            util::ensure_index(to, count, "step")?;
            reorder_and_commit(
                session,
                &mut editor,
                Reorder::new(ReorderScope::Steps { list }, from, to),
            )
        }
        Some(("focus", sub)) => {
            let step = index_arg(sub, "index")?;
            util::ensure_index(step, count, "step")?;
            editor.focus_step(step);
            session.commit(&mut editor)?;
            Ok(CommandResult::Selected {
                report: EditorReport::from_editor(&editor),
            })
        }
        _ => Err(CliError::usage("unsupported step command")),
    }
}
