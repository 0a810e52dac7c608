use std::fs;
use std::path::{Path, PathBuf};

use crate::adapter::SnapshotAdapter;
use crate::error::DocsmithError;
use crate::session::SessionState;
use crate::snapshot::ExportArtifact;
use crate::workspace::{WorkspaceLocator, WorkspacePaths};

/// Result of writing an export artifact to disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersistedExport {
    pub file_name: String,
    pub path: PathBuf,
}

/// Stores snapshots, session state, and exports inside a workspace's `.docsmith` folder.
pub struct WorkspacePersistence<L: WorkspaceLocator> {
    locator: L,
}

impl<L: WorkspaceLocator> WorkspacePersistence<L> {
    pub fn new(locator: L) -> Self {
        Self { locator }
    }

    pub fn workspace(&self) -> Result<WorkspacePaths, DocsmithError> {
        self.locator.workspace()
    }

    /// `.docsmith/snapshots/<key>.json`
    pub fn snapshot_path(&self, key: &str) -> Result<PathBuf, DocsmithError> {
        ensure_safe_name(key)?;
        Ok(self
            .locator
            .workspace()?
            .snapshots_dir()
            .join(format!("{key}.json")))
    }

    /// Writes `artifact` into `dir`, or the workspace's exports folder when `dir` is absent.
    pub fn write_export(
        &self,
        artifact: &ExportArtifact,
        dir: Option<&Path>,
    ) -> Result<PersistedExport, DocsmithError> {
        let dir = match dir {
            Some(dir) => dir.to_path_buf(),
            None => self.locator.workspace()?.exports_dir(),
        };
        write_export(&dir, artifact)
    }

    /// Reads the saved selection and cursor. An unreadable record is treated as absent so
    /// the editor starts from defaults.
    pub fn load_session_state(&self) -> Result<Option<SessionState>, DocsmithError> {
        let path = self.locator.workspace()?.session_file();
        let Some(raw) = read_optional(&path)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(state) => Ok(Some(state)),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "ignoring unreadable session state"
                );
                Ok(None)
            }
        }
    }

    pub fn save_session_state(&self, state: &SessionState) -> Result<(), DocsmithError> {
        let path = self.locator.workspace()?.session_file();
        let body = serde_json::to_string_pretty(state)?;
        write_atomic(&path, &body)
    }
}

impl<L: WorkspaceLocator> SnapshotAdapter for WorkspacePersistence<L> {
    fn load_snapshot(&self, key: &str) -> Result<Option<String>, DocsmithError> {
        read_optional(&self.snapshot_path(key)?)
    }

    fn save_snapshot(&self, key: &str, blob: &str) -> Result<(), DocsmithError> {
        let path = self.snapshot_path(key)?;
        write_atomic(&path, blob)?;
        tracing::debug!(path = %path.display(), bytes = blob.len(), "saved snapshot");
        Ok(())
    }
}

/// Writes an export artifact into `dir`, creating the directory as needed.
pub fn write_export(dir: &Path, artifact: &ExportArtifact) -> Result<PersistedExport, DocsmithError> {
    ensure_safe_name(&artifact.file_name)?;
    let path = dir.join(&artifact.file_name);
    write_atomic(&path, &artifact.body)?;
    Ok(PersistedExport {
        file_name: artifact.file_name.clone(),
        path,
    })
}

fn read_optional(path: &Path) -> Result<Option<String>, DocsmithError> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Writes through a sibling temp file so readers never observe a partial body.
fn write_atomic(path: &Path, body: &str) -> Result<(), DocsmithError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, body)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn ensure_safe_name(name: &str) -> Result<(), DocsmithError> {
    if name.is_empty() {
        return Err(DocsmithError::Workspace("file name must not be empty".into()));
    }

    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(DocsmithError::Workspace(format!(
            "file name `{name}` must not contain path separators"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Selection;
    use crate::workspace::{DOT_DIR, FilesystemWorkspaceLocator};
    use tempfile::tempdir;

    fn setup_workspace() -> (
        tempfile::TempDir,
        WorkspacePersistence<FilesystemWorkspaceLocator>,
    ) {
        let temp = tempdir().unwrap();
        let root = temp.path().join("workspace");
        fs::create_dir_all(root.join(DOT_DIR)).unwrap();
        let locator = FilesystemWorkspaceLocator::new(root);
        (temp, WorkspacePersistence::new(locator))
    }

    #[test]
    fn snapshot_round_trips_through_dot_folder() {
        let (_temp, persistence) = setup_workspace();
        assert!(
            persistence
                .load_snapshot("integrationDocs-localDocs")
                .unwrap()
                .is_none()
        );

        persistence
            .save_snapshot("integrationDocs-localDocs", "{\"ios\":{\"modules\":[]}}")
            .unwrap();

        let path = persistence.snapshot_path("integrationDocs-localDocs").unwrap();
        assert!(path.ends_with(".docsmith/snapshots/integrationDocs-localDocs.json"));
        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(
            persistence
                .load_snapshot("integrationDocs-localDocs")
                .unwrap()
                .as_deref(),
            Some("{\"ios\":{\"modules\":[]}}")
        );
    }

    #[test]
    fn snapshot_key_rejects_path_separators() {
        let (_temp, persistence) = setup_workspace();
        let err = persistence.save_snapshot("../escape", "{}").unwrap_err();
        assert!(matches!(err, DocsmithError::Workspace(_)));
    }

    #[test]
    fn export_defaults_to_workspace_exports_dir() {
        let (_temp, persistence) = setup_workspace();
        let artifact = ExportArtifact {
            file_name: "iosDocs.json".into(),
            body: "{\n  \"modules\": []\n}".into(),
        };
        let written = persistence.write_export(&artifact, None).unwrap();
        assert!(written.path.ends_with("exports/iosDocs.json"));
        assert_eq!(fs::read_to_string(&written.path).unwrap(), artifact.body);
    }

    #[test]
    fn session_state_is_optional_until_saved() {
        let (_temp, persistence) = setup_workspace();
        assert!(persistence.load_session_state().unwrap().is_none());

        let state = SessionState {
            selection: Selection::submodule("android", 1, 0),
            step_cursor: 2,
        };
        persistence.save_session_state(&state).unwrap();
        assert_eq!(persistence.load_session_state().unwrap(), Some(state));
    }

    #[test]
    fn corrupt_session_state_reads_as_absent() {
        let (_temp, persistence) = setup_workspace();
        let path = persistence.workspace().unwrap().session_file();
        fs::write(&path, "{oops").unwrap();
        assert!(persistence.load_session_state().unwrap().is_none());

        let state = SessionState::default();
        persistence.save_session_state(&state).unwrap();
        assert_eq!(persistence.load_session_state().unwrap(), Some(state));
    }
}
