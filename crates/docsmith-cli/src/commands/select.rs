use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command, value_parser};
use docsmith::{Direction, EditorSession, Selection};

use crate::commands::{CommandResult, EditorReport};
use crate::context::CliSession;
use crate::error::CliError;
use crate::util;

pub fn command() -> Command {
    Command::new("select")
        .about("Choose the framework, module, and submodule to edit")
        .arg(
            Arg::new("framework")
                .value_name("FRAMEWORK")
                .help("Framework key, such as android or ios"),
        )
        .arg(
            Arg::new("module")
                .long("module")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .requires("framework")
                .help("Module index within the framework"),
        )
        .arg(
            Arg::new("submodule")
                .long("submodule")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .requires("module")
                .help("Submodule index within the module"),
        )
        .arg(
            Arg::new("next")
                .long("next")
                .action(ArgAction::SetTrue)
                .help("Move to the next module or submodule"),
        )
        .arg(
            Arg::new("prev")
                .long("prev")
                .action(ArgAction::SetTrue)
                .help("Move to the previous module or submodule"),
        )
        .group(
            ArgGroup::new("target")
                .args(["framework", "next", "prev"])
                .required(true),
        )
}

pub fn run(session: &CliSession, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let mut editor = session.open_editor()?;

    if matches.get_flag("next") {
        step(&mut editor, Direction::Next)?;
    } else if matches.get_flag("prev") {
        step(&mut editor, Direction::Previous)?;
    } else {
        let selection = requested_selection(&editor, matches)?;
        editor.select(selection);
    }

    session.commit(&mut editor)?;
    Ok(CommandResult::Selected {
        report: EditorReport::from_editor(&editor),
    })
}

fn step(editor: &mut EditorSession, direction: Direction) -> Result<(), CliError> {
    match editor.navigate(direction) {
        Some(entry) => {
            tracing::debug!(entry = entry.label(), "navigated");
            Ok(())
        }
        None => Err(CliError::usage(match direction {
            Direction::Next => "already at the last module",
            Direction::Previous => "already at the first module",
        })),
    }
}

fn requested_selection(
    editor: &EditorSession,
    matches: &ArgMatches,
) -> Result<Selection, CliError> {
    let framework = matches
        .get_one::<String>("framework")
        .map(|raw| raw.trim().to_string())
        .unwrap_or_default();
    let tree = editor.tree();
    if !tree.contains_framework(&framework) {
        let available: Vec<&str> = tree.frameworks().collect();
        return Err(CliError::usage(format!(
            "unknown framework '{framework}' (available: {})",
            available.join(", ")
        )));
    }

    let Some(module) = matches.get_one::<usize>("module").copied() else {
        return Ok(Selection::framework(framework));
    };
    let modules = tree.modules(&framework);
    util::ensure_index(module, modules.len(), "module")?;

    match matches.get_one::<usize>("submodule").copied() {
        Some(submodule) => {
            util::ensure_index(submodule, modules[module].submodules.len(), "submodule")?;
            Ok(Selection::submodule(framework, module, submodule))
        }
        None => Ok(Selection::module(framework, module)),
    }
}
