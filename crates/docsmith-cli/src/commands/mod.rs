use docsmith::{
    EditorSession, Mutation, NavEntry, Reorder, ReviewItem, ReviewOutcome, SessionView,
    Submission, navigation,
};
use serde::Serialize;

use crate::context::CliSession;
use crate::error::{CliError, ExitStatus};

pub mod block;
pub mod export;
pub mod init;
pub mod module;
pub mod review;
pub mod schema;
pub mod select;
pub mod status;
pub mod step;
pub mod submodule;

/// Block of the focused step, as listed by `status`.
#[derive(Clone, Debug, Serialize)]
pub struct BlockSummary {
    pub index: usize,
    pub kind: String,
    pub summary: String,
}

/// Everything `status` prints about the current position.
#[derive(Clone, Debug, Serialize)]
pub struct EditorReport {
    pub view: SessionView,
    pub outline: Vec<NavEntry>,
    pub focused_blocks: Vec<BlockSummary>,
}

impl EditorReport {
    pub fn from_editor(editor: &EditorSession) -> Self {
        let focused_blocks = editor
            .resolved()
            .steps
            .get(editor.step_cursor())
            .map(|step| {
                step.blocks
                    .iter()
                    .enumerate()
                    .map(|(index, block)| BlockSummary {
                        index,
                        kind: block.kind().to_string(),
                        summary: block.content().summary().to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            view: editor.view(),
            outline: navigation(editor.tree(), &editor.selection().framework),
            focused_blocks,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandResult {
    WorkspaceInitialized {
        root: String,
        dot_docsmith: String,
        created: bool,
        seeded: bool,
        dry_run: bool,
    },
    Status {
        frameworks: Vec<String>,
        report: EditorReport,
    },
    Selected {
        report: EditorReport,
    },
    Mutated {
        op: String,
        mutated: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        created_step: Option<String>,
        report: EditorReport,
    },
    Reordered {
        reorder: Reorder,
        moved: bool,
        report: EditorReport,
    },
    Exported {
        file_name: String,
        path: String,
    },
    Submitted {
        submission: Option<Submission>,
    },
    ReviewQueue {
        items: Vec<ReviewItem>,
    },
    ReviewDecided {
        outcome: ReviewOutcome,
        message: String,
    },
    Schema {
        schema: serde_json::Value,
    },
}

impl CommandResult {
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            CommandResult::Submitted { submission: None } => ExitStatus::Data,
            _ => ExitStatus::Ok,
        }
    }
}

/// Applies `mutation`, persists the result, and reports the new position.
pub fn apply_and_commit(
    session: &CliSession,
    editor: &mut EditorSession,
    mutation: Mutation,
) -> Result<CommandResult, CliError> {
    let applied = editor.apply(&mutation);
    session.commit(editor)?;
    Ok(CommandResult::Mutated {
        op: mutation.label().to_string(),
        mutated: applied.mutated,
        created_step: applied.created_step.map(|id| id.to_string()),
        report: EditorReport::from_editor(editor),
    })
}

pub fn reorder_and_commit(
    session: &CliSession,
    editor: &mut EditorSession,
    reorder: Reorder,
) -> Result<CommandResult, CliError> {
    let moved = editor.reorder(&reorder);
    session.commit(editor)?;
    Ok(CommandResult::Reordered {
        reorder,
        moved,
        report: EditorReport::from_editor(editor),
    })
}

pub fn index_arg(matches: &clap::ArgMatches, name: &str) -> Result<usize, CliError> {
    matches
        .get_one::<usize>(name)
        .copied()
        .ok_or_else(|| CliError::usage(format!("<{name}> is required")))
}

pub fn string_arg(matches: &clap::ArgMatches, name: &str) -> Result<String, CliError> {
    matches
        .get_one::<String>(name)
        .cloned()
        .ok_or_else(|| CliError::usage(format!("<{name}> is required")))
}
