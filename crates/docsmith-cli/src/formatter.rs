use std::process::ExitCode;

use docsmith::{Reorder, ReorderScope, Severity};
use serde_json::json;

use crate::commands::{CommandResult, EditorReport};
use crate::error::CliError;

pub enum OutputFormat {
    Text,
    Json,
}

/// Renders a `CommandResult` as human-readable text or a single JSON line, then maps
/// the outcome to its exit code.
pub fn emit_result(result: CommandResult, format: OutputFormat) -> Result<ExitCode, CliError> {
    match format {
        OutputFormat::Text => print_text(&result),
        OutputFormat::Json => print_json(&result),
    };
    Ok(ExitCode::from(result.exit_status().code()))
}

fn print_text(result: &CommandResult) {
    match result {
        CommandResult::WorkspaceInitialized {
            root,
            dot_docsmith,
            created,
            seeded,
            dry_run,
        } => {
            let content = if *seeded { "sample" } else { "empty" };
            if *dry_run {
                if *created {
                    println!(
                        "Dry run: would initialize workspace at {root} (.docsmith at {dot_docsmith}, {content} docs)"
                    );
                } else {
                    println!(
                        "Dry run: workspace already initialized at {root} (.docsmith at {dot_docsmith})"
                    );
                }
            } else if *created {
                println!(
                    "Initialized workspace at {root} (.docsmith: {dot_docsmith}, {content} docs)"
                );
            } else {
                println!("Workspace already initialized at {root} (.docsmith: {dot_docsmith})");
            }
        }
        CommandResult::Status { frameworks, report } => {
            println!("Frameworks: {}", frameworks.join(", "));
            print_report(report);
        }
        CommandResult::Selected { report } => print_report(report),
        CommandResult::Mutated {
            op,
            mutated,
            created_step,
            report,
        } => {
            if *mutated {
                match created_step {
                    Some(id) => println!("Applied {op} (step id {id})"),
                    None => println!("Applied {op}"),
                }
            } else {
                println!("No change: {op} did not match anything in the current tree");
            }
            print_report(report);
        }
        CommandResult::Reordered {
            reorder,
            moved,
            report,
        } => {
            if *moved {
                println!("Moved {}", describe_reorder(reorder));
            } else {
                println!("No change: {} left in place", scope_label(&reorder.scope));
            }
            print_report(report);
        }
        CommandResult::Exported { file_name, path } => {
            println!("Exported {file_name} to {path}");
        }
        CommandResult::Submitted { submission } => match submission {
            Some(submission) => {
                let id = submission
                    .id
                    .as_deref()
                    .map(|id| format!(" as {id}"))
                    .unwrap_or_default();
                println!(
                    "Submitted for review! {} '{}'{id} is {}",
                    submission.kind, submission.name, submission.state
                );
            }
            None => println!("Nothing to submit at that index"),
        },
        CommandResult::ReviewQueue { items } => {
            println!("Pending reviews ({}):", items.len());
            for item in items {
                let kind = item
                    .kind
                    .map(|kind| kind.to_string())
                    .unwrap_or_else(|| "module".to_string());
                println!(
                    "  - {} {kind} '{}' by {} at {}",
                    item.id,
                    item.name().unwrap_or("(unnamed)"),
                    or_unknown(&item.submitter),
                    or_unknown(&item.submitted_at)
                );
            }
        }
        CommandResult::ReviewDecided { outcome, message } => {
            println!("{message} {} is {}", outcome.id, outcome.state);
            if let Some(reason) = &outcome.reason {
                println!("  Reason: {reason}");
            }
        }
        CommandResult::Schema { schema } => match serde_json::to_string_pretty(schema) {
            Ok(pretty) => println!("{pretty}"),
            Err(_) => println!("{schema}"),
        },
    }
}

fn print_json(result: &CommandResult) {
    let payload = json!(result);
    println!("{payload}");
}

fn print_report(report: &EditorReport) {
    let view = &report.view;
    println!("Framework: {}", view.selection.framework);
    match (&view.module, &view.submodule) {
        (Some(module), Some(submodule)) => println!("Selected: {module} / {submodule}"),
        (Some(module), None) => println!("Selected: {module}"),
        _ => println!("Selected: (no module)"),
    }

    if report.outline.is_empty() {
        println!("Modules: (none)");
    } else {
        println!("Modules:");
        for entry in &report.outline {
            println!("  - {}", entry.label());
        }
    }

    if view.module.is_some() {
        println!("Steps ({}):", view.steps.len());
        for step in &view.steps {
            let marker = if step.index == view.step_cursor { ">" } else { " " };
            println!(
                " {marker} {}. {} ({} block(s), id {})",
                step.index, step.title, step.blocks, step.id
            );
        }
        for block in &report.focused_blocks {
            println!("      [{}] {}: {}", block.index, block.kind, block.summary);
        }
    }

    if let Some(previous) = &view.neighbors.previous {
        println!("Previous: {}", previous.label());
    }
    if let Some(next) = &view.neighbors.next {
        println!("Next: {}", next.label());
    }
    if view.dirty {
        println!("Unsaved changes");
    }
    if let Some(notice) = &view.notice {
        match notice.severity {
            Severity::Success => println!("{}", notice.message),
            Severity::Error => println!("Error: {}", notice.message),
        }
    }
}

fn describe_reorder(reorder: &Reorder) -> String {
    match reorder.to {
        Some(to) => format!("{} {} -> {to}", scope_label(&reorder.scope), reorder.from),
        None => format!("{} {}", scope_label(&reorder.scope), reorder.from),
    }
}

fn scope_label(scope: &ReorderScope) -> &'static str {
    match scope {
        ReorderScope::Modules => "module",
        ReorderScope::Submodules { .. } => "submodule",
        ReorderScope::Steps { .. } => "step",
        ReorderScope::Blocks { .. } => "block",
    }
}

fn or_unknown(value: &str) -> &str {
    if value.is_empty() { "unknown" } else { value }
}
