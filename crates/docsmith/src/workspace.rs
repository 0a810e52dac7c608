use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::DocsmithError;

pub const DOT_DIR: &str = ".docsmith";

/// Layout of a workspace rooted at a directory holding `.docsmith/`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkspacePaths {
    root: PathBuf,
}

impl WorkspacePaths {
    /// Paths for a workspace rooted at `root`, whether or not it exists yet.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dot_docsmith(&self) -> PathBuf {
        self.root.join(DOT_DIR)
    }

    pub fn config_file(&self) -> PathBuf {
        self.dot_docsmith().join("config.yaml")
    }

    /// One `<storage key>.json` blob per saved tree.
    pub fn snapshots_dir(&self) -> PathBuf {
        self.dot_docsmith().join("snapshots")
    }

    pub fn session_file(&self) -> PathBuf {
        self.dot_docsmith().join("session.json")
    }

    /// Export target when no directory is given. Lives outside `.docsmith` so the files
    /// are easy to hand off.
    pub fn exports_dir(&self) -> PathBuf {
        self.root.join("exports")
    }
}

pub trait WorkspaceLocator: Send + Sync {
    fn workspace(&self) -> Result<WorkspacePaths, DocsmithError>;
}

impl<L: WorkspaceLocator + ?Sized> WorkspaceLocator for Arc<L> {
    fn workspace(&self) -> Result<WorkspacePaths, DocsmithError> {
        (**self).workspace()
    }
}

/// Finds the workspace above a starting path and remembers it until its `.docsmith`
/// folder disappears.
pub struct FilesystemWorkspaceLocator {
    start: PathBuf,
    found: Mutex<Option<WorkspacePaths>>,
}

impl FilesystemWorkspaceLocator {
    pub fn new(start: impl Into<PathBuf>) -> Self {
        Self {
            start: start.into(),
            found: Mutex::new(None),
        }
    }

    pub fn from_current_dir() -> Result<Self, DocsmithError> {
        Ok(Self::new(env::current_dir()?))
    }
}

impl WorkspaceLocator for FilesystemWorkspaceLocator {
    fn workspace(&self) -> Result<WorkspacePaths, DocsmithError> {
        let mut found = self.found.lock();
        if let Some(paths) = found.as_ref().filter(|paths| paths.dot_docsmith().is_dir()) {
            return Ok(paths.clone());
        }
        let paths = discover(&self.start)?;
        *found = Some(paths.clone());
        Ok(paths)
    }
}

/// Returns the nearest directory at or above `start` that contains `.docsmith/`.
/// `start` may name a file or a path that does not exist yet.
pub fn discover(start: impl AsRef<Path>) -> Result<WorkspacePaths, DocsmithError> {
    let start = start.as_ref();
    let existing = start
        .ancestors()
        .find(|path| path.exists())
        .ok_or_else(|| {
            DocsmithError::Workspace(format!("{} has no existing ancestor", start.display()))
        })?;
    let base = fs::canonicalize(existing)?;

    base.ancestors()
        .find(|dir| dir.join(DOT_DIR).is_dir())
        .map(WorkspacePaths::at)
        .ok_or_else(|| {
            DocsmithError::Workspace(format!(
                "no {DOT_DIR} directory at or above {}",
                base.display()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn discovery_climbs_from_nested_folders_and_files() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("docs");
        let nested = root.join("exports").join("ios");
        fs::create_dir_all(root.join(DOT_DIR)).unwrap();
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("ios.json"), "{}").unwrap();

        let expected = root.canonicalize().unwrap();
        assert_eq!(discover(&nested).unwrap().root(), expected.as_path());
        assert_eq!(
            discover(nested.join("ios.json")).unwrap().root(),
            expected.as_path()
        );
        assert_eq!(
            discover(nested.join("missing").join("deeper")).unwrap().root(),
            expected.as_path()
        );
    }

    #[test]
    fn paths_hang_off_the_dot_folder() {
        let paths = WorkspacePaths::at("/work/docs");
        assert_eq!(paths.dot_docsmith(), Path::new("/work/docs/.docsmith"));
        assert!(paths.config_file().ends_with(".docsmith/config.yaml"));
        assert!(paths.session_file().ends_with(".docsmith/session.json"));
        assert_eq!(paths.exports_dir(), Path::new("/work/docs/exports"));
    }

    #[test]
    fn discovery_fails_without_dot_folder() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("orphaned");
        fs::create_dir_all(&root).unwrap();

        let err = discover(&root).expect_err("no workspace above an orphaned folder");
        assert!(matches!(err, DocsmithError::Workspace(_)));
    }

    #[test]
    fn locator_forgets_a_workspace_whose_dot_folder_is_gone() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("workspace");
        fs::create_dir_all(root.join(DOT_DIR)).unwrap();
        let locator = FilesystemWorkspaceLocator::new(root.join("not-yet-created"));

        let first = locator.workspace().unwrap();
        assert_eq!(first.root(), root.canonicalize().unwrap().as_path());

        fs::remove_dir_all(first.dot_docsmith()).unwrap();
        let err = locator.workspace().expect_err("stale workspace is rediscovered");
        assert!(matches!(err, DocsmithError::Workspace(_)));
    }
}
