use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

use clap::{Arg, ArgAction, ArgMatches, Command};
use docsmith::workspace::{DOT_DIR, FilesystemWorkspaceLocator, WorkspacePaths};
use docsmith::{DocumentTree, EditorConfig, SnapshotAdapter, WorkspacePersistence, seed, snapshot};

use crate::commands::CommandResult;
use crate::error::{CliError, ExitStatus};

pub fn command() -> Command {
    Command::new("init")
        .about("Initialize a Docsmith workspace")
        .arg(
            Arg::new("path")
                .value_name("PATH")
                .help("Workspace root to initialize. Defaults to the current directory."),
        )
        .arg(
            Arg::new("empty")
                .long("empty")
                .action(ArgAction::SetTrue)
                .help("Start with empty frameworks instead of the sample documentation."),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Show the resolved workspace root without writing to disk."),
        )
}

pub fn run(
    workspace_override: Option<String>,
    matches: &ArgMatches,
) -> Result<CommandResult, CliError> {
    let positional = matches.get_one::<String>("path").cloned();
    let target = workspace_override
        .or(positional)
        .unwrap_or_else(|| ".".to_string());
    let dry_run = matches.get_flag("dry-run");
    let seeded = !matches.get_flag("empty");

    let root = absolutize(&target)?;
    let plan = plan_workspace(&root)?;

    if dry_run {
        return Ok(CommandResult::WorkspaceInitialized {
            root: plan.paths.root().display().to_string(),
            dot_docsmith: plan.paths.dot_docsmith().display().to_string(),
            created: !plan.already_initialized,
            seeded: seeded && !plan.already_initialized,
            dry_run: true,
        });
    }

    let created = apply_init(&plan, seeded)?;
    Ok(CommandResult::WorkspaceInitialized {
        root: plan.paths.root().display().to_string(),
        dot_docsmith: plan.paths.dot_docsmith().display().to_string(),
        created,
        seeded: seeded && created,
        dry_run: false,
    })
}

struct InitPlan {
    paths: WorkspacePaths,
    already_initialized: bool,
}

fn plan_workspace(root: &Path) -> Result<InitPlan, CliError> {
    if root.exists() && !root.is_dir() {
        return Err(CliError::usage(format!(
            "workspace root {} is not a directory",
            root.display()
        )));
    }

    let paths = WorkspacePaths::at(root);
    let already_initialized = paths.dot_docsmith().is_dir();
    for ancestor in root.ancestors().skip(1) {
        let existing = ancestor.join(DOT_DIR);
        if existing.is_dir() {
            return Err(CliError::usage(format!(
                "cannot initialize workspace at {}; ancestor workspace already exists at {}",
                root.display(),
                existing.display()
            )));
        }
    }

    Ok(InitPlan {
        paths,
        already_initialized,
    })
}

/// Creates `.docsmith/` with a default config and the initial snapshot. Existing
/// workspaces are left untouched.
fn apply_init(plan: &InitPlan, seeded: bool) -> Result<bool, CliError> {
    if plan.already_initialized {
        return Ok(false);
    }

    let config = EditorConfig::default();
    fs::create_dir_all(plan.paths.dot_docsmith())?;
    fs::write(plan.paths.config_file(), config.to_yaml()?)?;

    let tree = if seeded {
        seed::seed_tree()?
    } else {
        let mut tree = DocumentTree::new();
        for framework in &config.frameworks {
            tree.ensure_framework(framework);
        }
        tree
    };
    let persistence =
        WorkspacePersistence::new(FilesystemWorkspaceLocator::new(plan.paths.root()));
    persistence.save_snapshot(&config.storage_key, &snapshot::save(&tree)?)?;

    tracing::info!(
        root = %plan.paths.root().display(),
        seeded,
        "initialized workspace"
    );
    Ok(true)
}

fn absolutize(raw: &str) -> Result<PathBuf, CliError> {
    let candidate = PathBuf::from(raw);
    let base = if candidate.is_absolute() {
        candidate
    } else {
        env::current_dir()
            .map_err(|err| CliError::new(err.to_string(), ExitStatus::Io))?
            .join(candidate)
    };

    Ok(lexical_normalize(&base))
}

fn lexical_normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    let mut pending_parents: usize = 0;

    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if normalized
                    .components()
                    .next_back()
                    .is_some_and(|c| matches!(c, Component::Normal(_)))
                {
                    normalized.pop();
                } else if !normalized.is_absolute() {
                    pending_parents += 1;
                }
            }
            Component::Normal(part) => {
                for _ in 0..pending_parents {
                    normalized.push("..");
                }
                pending_parents = 0;
                normalized.push(part);
            }
        }
    }

    for _ in 0..pending_parents {
        normalized.push("..");
    }

    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexical_normalize_collapses_dots() {
        assert_eq!(
            lexical_normalize(Path::new("/work/./docs/../guides")),
            PathBuf::from("/work/guides")
        );
        assert_eq!(lexical_normalize(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(
            lexical_normalize(Path::new("../a/./b")),
            PathBuf::from("../a/b")
        );
    }
}
