use clap::{Arg, ArgMatches, Command};
use docsmith::{EditorSession, ReviewKind};

use crate::commands::{CommandResult, string_arg};
use crate::context::CliSession;
use crate::error::CliError;

pub fn command() -> Command {
    Command::new("review")
        .about("Work with the remote review queue")
        .subcommand_required(true)
        .subcommand(Command::new("list").about("List pending review items"))
        .subcommand(
            Command::new("approve")
                .about("Approve a pending item")
                .arg(Arg::new("id").required(true)),
        )
        .subcommand(
            Command::new("reject")
                .about("Reject a pending item")
                .arg(Arg::new("id").required(true))
                .arg(
                    Arg::new("reason")
                        .long("reason")
                        .value_name("TEXT")
                        .help("Reason shown to the submitter"),
                ),
        )
}

pub fn run(session: &CliSession, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let mut workflow = session.review_workflow()?;
    match matches.subcommand() {
        Some(("list", _)) => {
            let items = workflow.pending()?;
            Ok(CommandResult::ReviewQueue { items })
        }
        Some(("approve", sub)) => {
            let id = string_arg(sub, "id")?;
            let mut editor = session.open_editor()?;
            let outcome = editor.approve(&mut workflow, &id)?;
            Ok(CommandResult::ReviewDecided {
                outcome,
                message: notice_message(&editor),
            })
        }
        Some(("reject", sub)) => {
            let id = string_arg(sub, "id")?;
            let reason = sub
                .get_one::<String>("reason")
                .cloned()
                .unwrap_or_default();
            let mut editor = session.open_editor()?;
            let outcome = editor.reject(&mut workflow, &id, &reason)?;
            Ok(CommandResult::ReviewDecided {
                outcome,
                message: notice_message(&editor),
            })
        }
        _ => Err(CliError::usage("unsupported review command")),
    }
}

/// Submits the module or submodule at `index`. The local tree is left untouched.
pub fn submit(
    session: &CliSession,
    editor: &mut EditorSession,
    kind: ReviewKind,
    index: usize,
) -> Result<CommandResult, CliError> {
    let mut workflow = session.review_workflow()?;
    let submission = editor.submit_for_review(&mut workflow, kind, index)?;
    Ok(CommandResult::Submitted { submission })
}

fn notice_message(editor: &EditorSession) -> String {
    editor
        .notice()
        .map(|notice| notice.message.clone())
        .unwrap_or_default()
}
