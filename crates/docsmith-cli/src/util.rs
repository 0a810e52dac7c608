use std::path::Path;

use docsmith::resolve::visible_step_list;
use docsmith::{EditorSession, StepListAddress};

use crate::error::CliError;

#[derive(Clone, Copy, Debug, Default)]
pub struct Verbosity {
    pub json: bool,
    pub verbose: bool,
}

pub fn validate_name(value: &str, kind: &str) -> Result<String, CliError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CliError::usage(format!("{kind} name must not be empty")));
    }
    Ok(trimmed.to_string())
}

const SELECT_MODULE_HINT: &str = "select a module first (docsmith select <framework> --module N)";

/// Module index the submodule commands operate under.
pub fn require_module(editor: &EditorSession) -> Result<usize, CliError> {
    editor
        .resolved()
        .module
        .and(editor.selection().selected_module())
        .ok_or_else(|| CliError::usage(SELECT_MODULE_HINT))
}

/// Step list the step and block commands operate on.
pub fn require_step_list(editor: &EditorSession) -> Result<StepListAddress, CliError> {
    visible_step_list(editor.tree(), editor.selection())
        .ok_or_else(|| CliError::usage(SELECT_MODULE_HINT))
}

pub fn ensure_index(index: usize, len: usize, kind: &str) -> Result<(), CliError> {
    if index >= len {
        return Err(CliError::usage(format!(
            "{kind} index {index} is out of range ({len} available)"
        )));
    }
    Ok(())
}

pub fn workspace_relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .map(|relative| relative.display().to_string())
        .unwrap_or_else(|_| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_name_trims_and_rejects_blank() {
        assert_eq!(validate_name("  Push ", "module").unwrap(), "Push");
        assert!(validate_name("   ", "module").is_err());
    }

    #[test]
    fn ensure_index_reports_range() {
        assert!(ensure_index(1, 2, "step").is_ok());
        let err = ensure_index(2, 2, "step").unwrap_err();
        assert_eq!(err.to_string(), "step index 2 is out of range (2 available)");
    }

    #[test]
    fn workspace_relative_strips_root() {
        let root = Path::new("/work/docs");
        assert_eq!(
            workspace_relative(root, Path::new("/work/docs/exports/iosDocs.json")),
            "exports/iosDocs.json"
        );
        assert_eq!(
            workspace_relative(root, Path::new("/tmp/out.json")),
            "/tmp/out.json"
        );
    }
}
